//! Secret resolution.
//!
//! Config YAML stores only env var *names* (e.g. `"BROKER_API_KEY_PAPER"`);
//! callers resolve them once at startup via [`resolve_secrets_for_mode`] and
//! pass the result to constructors rather than scattering `std::env::var`
//! calls through the codebase. `Debug` on every secret-carrying struct
//! redacts values, and error messages name the env var, never its value.
//!
//! Mode enforcement: `LIVE` requires broker key + secret and the quote
//! provider key; `PAPER` requires only the broker key + secret. Alert
//! webhooks are optional in both modes.

use crate::consumption::ConfigMode;
use anyhow::{bail, Result};
use serde_json::Value;

#[derive(Clone)]
pub struct ResolvedAlertWebhooks {
    /// Risk/integrity alerts: kill-switch trips, suppression storms.
    pub alerts: Option<String>,
    /// Periodic heartbeat pings.
    pub heartbeat: Option<String>,
}

impl std::fmt::Debug for ResolvedAlertWebhooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedAlertWebhooks")
            .field("alerts", &self.alerts.as_ref().map(|_| "<REDACTED>"))
            .field("heartbeat", &self.heartbeat.as_ref().map(|_| "<REDACTED>"))
            .finish()
    }
}

#[derive(Clone)]
pub struct ResolvedSecrets {
    pub broker_api_key: Option<String>,
    pub broker_api_secret: Option<String>,
    pub quote_provider_api_key: Option<String>,
    pub webhooks: ResolvedAlertWebhooks,
}

impl std::fmt::Debug for ResolvedSecrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedSecrets")
            .field(
                "broker_api_key",
                &self.broker_api_key.as_ref().map(|_| "<REDACTED>"),
            )
            .field(
                "broker_api_secret",
                &self.broker_api_secret.as_ref().map(|_| "<REDACTED>"),
            )
            .field(
                "quote_provider_api_key",
                &self.quote_provider_api_key.as_ref().map(|_| "<REDACTED>"),
            )
            .field("webhooks", &self.webhooks)
            .finish()
    }
}

struct SecretEnvNames {
    broker_api_key_var: String,
    broker_api_secret_var: String,
    quote_provider_api_key_var: String,
    alerts_var: Option<String>,
    heartbeat_var: Option<String>,
}

fn read_str_at(config: &Value, pointer: &str) -> Option<String> {
    let s = config.pointer(pointer)?.as_str()?;
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn resolve_env(var_name: &str) -> Option<String> {
    match std::env::var(var_name) {
        Ok(v) if !v.trim().is_empty() => Some(v),
        _ => None,
    }
}

fn parse_env_names(config_json: &Value) -> SecretEnvNames {
    SecretEnvNames {
        broker_api_key_var: read_str_at(config_json, "/broker/keys_env/api_key")
            .unwrap_or_else(|| "SIGEX_BROKER_API_KEY".to_string()),
        broker_api_secret_var: read_str_at(config_json, "/broker/keys_env/api_secret")
            .unwrap_or_else(|| "SIGEX_BROKER_API_SECRET".to_string()),
        quote_provider_api_key_var: read_str_at(config_json, "/data/provider/api_key_env")
            .unwrap_or_else(|| "SIGEX_QUOTE_PROVIDER_API_KEY".to_string()),
        alerts_var: read_str_at(config_json, "/webhooks/alerts"),
        heartbeat_var: read_str_at(config_json, "/webhooks/heartbeat"),
    }
}

/// Resolve all secrets from the environment for the given mode.
///
/// Returns `Err` naming the first missing required env var; never the value.
pub fn resolve_secrets_for_mode(config_json: &Value, mode: ConfigMode) -> Result<ResolvedSecrets> {
    let names = parse_env_names(config_json);

    let broker_api_key = resolve_env(&names.broker_api_key_var);
    let broker_api_secret = resolve_env(&names.broker_api_secret_var);
    let quote_provider_api_key = resolve_env(&names.quote_provider_api_key_var);

    if broker_api_key.is_none() {
        bail!(
            "SECRETS_MISSING mode={:?}: required env var '{}' (broker api_key) is not set or empty",
            mode,
            names.broker_api_key_var,
        );
    }
    if broker_api_secret.is_none() {
        bail!(
            "SECRETS_MISSING mode={:?}: required env var '{}' (broker api_secret) is not set or empty",
            mode,
            names.broker_api_secret_var,
        );
    }
    if mode == ConfigMode::Live && quote_provider_api_key.is_none() {
        bail!(
            "SECRETS_MISSING mode=Live: required env var '{}' (quote provider api_key) is not set or empty",
            names.quote_provider_api_key_var,
        );
    }

    let webhooks = ResolvedAlertWebhooks {
        alerts: names.alerts_var.as_deref().and_then(resolve_env),
        heartbeat: names.heartbeat_var.as_deref().and_then(resolve_env),
    };

    Ok(ResolvedSecrets {
        broker_api_key,
        broker_api_secret,
        quote_provider_api_key,
        webhooks,
    })
}
