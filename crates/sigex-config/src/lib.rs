//! Runtime configuration: layered YAML, the `Config` struct, and secret
//! resolution. No component reads the environment directly — everything
//! needed at runtime is resolved once here and threaded through by value.

mod consumption;
mod loader;
mod secrets;

pub use consumption::{
    consumed_pointers, report_unused_keys, ConfigMode, UnusedKeyPolicy, UnusedKeysReport,
};
pub use loader::{load_layered_yaml, load_layered_yaml_from_strings, LoadedConfig};
pub use secrets::{resolve_secrets_for_mode, ResolvedAlertWebhooks, ResolvedSecrets};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskSection {
    pub risk_per_trade: f64,
    pub max_concurrent_risk: f64,
    pub max_positions: u32,
    pub min_slots: u32,
    pub max_equity_exposure: f64,
    pub daily_loss_limit: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AntiSpamSection {
    pub cooldown_seconds: u32,
    pub direction_lock_seconds: u32,
    pub etf_lock_ttl_seconds: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierSection {
    pub tier_a_tickers: Vec<String>,
    pub tier_b_tickers: Vec<String>,
    pub bench_tickers: Vec<String>,
    pub tier_a_cadence_seconds: u32,
    pub tier_b_cadence_seconds: u32,
    pub bench_cadence_seconds: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenBucketSection {
    pub tokens_a: u32,
    pub tokens_b: u32,
    pub reserve: u32,
    pub refill_period_seconds: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmGateSection {
    pub min_signal_score: f64,
    pub daily_call_limit: u32,
    pub required_events: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasketDef {
    pub members: Vec<String>,
    pub target_etf: String,
    pub min_signals: u32,
    pub neg_fraction: f64,
    pub mean_threshold: f64,
    pub window_seconds: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EodSection {
    pub flatten_minutes_before_close: u32,
    pub opg_cleanup_window_seconds: u32,
}

/// Root config, built from a layered YAML tree via [`load_layered_yaml`].
///
/// `signal_cutoff` backs both the mixer's emit threshold and the
/// suppression chain's `below_cutoff` gate — the loader rejects any input
/// that tries to set a distinct `mixer_threshold`, since the two existing
/// as separately-configurable knobs is exactly the footgun this single
/// field exists to close.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub risk: RiskSection,
    pub signal_cutoff: f64,
    pub anti_spam: AntiSpamSection,
    pub tiers: TierSection,
    pub tokens: TokenBucketSection,
    pub llm: LlmGateSection,
    pub baskets: HashMap<String, BasketDef>,
    pub inverse_etfs: Vec<String>,
    pub leveraged_etfs: Vec<String>,
    pub eod: EodSection,
    pub auto_mode: bool,
    #[serde(default)]
    pub fractional_enabled: bool,
}

impl Config {
    /// Build a [`Config`] from a loaded, merged config tree.
    ///
    /// Rejects a config that sets `mixer_threshold` separately from
    /// `signal_cutoff` — the spec requires the two to be identical, and the
    /// only way to make that unconditionally true is to not let the
    /// duplicate field exist post-load.
    pub fn from_loaded(loaded: &LoadedConfig) -> Result<Self> {
        if let Some(mixer) = loaded.config_json.pointer("/mixer_threshold") {
            let cutoff = loaded
                .config_json
                .pointer("/signal_cutoff")
                .context("signal_cutoff must be set when mixer_threshold is present")?;
            if mixer != cutoff {
                bail!(
                    "mixer_threshold ({mixer}) must equal signal_cutoff ({cutoff}); \
                     configure signal_cutoff only"
                );
            }
        }
        serde_json::from_value(loaded.config_json.clone()).context("config does not match schema")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_yaml() -> &'static str {
        r#"
signal_cutoff: 0.55
risk:
  risk_per_trade: 0.005
  max_concurrent_risk: 0.02
  max_positions: 6
  min_slots: 4
  max_equity_exposure: 0.8
  daily_loss_limit: 0.03
anti_spam:
  cooldown_seconds: 60
  direction_lock_seconds: 300
  etf_lock_ttl_seconds: 120
tiers:
  tier_a_tickers: ["AAPL"]
  tier_b_tickers: ["MSFT"]
  bench_tickers: ["SPY"]
  tier_a_cadence_seconds: 15
  tier_b_cadence_seconds: 30
  bench_cadence_seconds: 300
tokens:
  tokens_a: 60
  tokens_b: 30
  reserve: 10
  refill_period_seconds: 60
llm:
  min_signal_score: 0.6
  daily_call_limit: 200
  required_events: ["earnings"]
baskets: {}
inverse_etfs: ["SQQQ"]
leveraged_etfs: ["TQQQ"]
eod:
  flatten_minutes_before_close: 10
  opg_cleanup_window_seconds: 300
auto_mode: true
"#
    }

    #[test]
    fn builds_from_loaded_config() {
        let loaded = load_layered_yaml_from_strings(&[sample_yaml()]).unwrap();
        let config = Config::from_loaded(&loaded).unwrap();
        assert_eq!(config.signal_cutoff, 0.55);
        assert_eq!(config.risk.max_positions, 6);
        assert!(!config.fractional_enabled);
    }

    #[test]
    fn rejects_mismatched_mixer_threshold() {
        let yaml = format!("{}\nmixer_threshold: 0.9\n", sample_yaml());
        let loaded = load_layered_yaml_from_strings(&[&yaml]).unwrap();
        let err = Config::from_loaded(&loaded).unwrap_err();
        assert!(err.to_string().contains("must equal signal_cutoff"));
    }

    #[test]
    fn accepts_matching_mixer_threshold() {
        let yaml = format!("{}\nmixer_threshold: 0.55\n", sample_yaml());
        let loaded = load_layered_yaml_from_strings(&[&yaml]).unwrap();
        assert!(Config::from_loaded(&loaded).is_ok());
    }
}
