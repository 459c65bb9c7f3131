//! Which config subtree each run mode actually reads.
//!
//! Used by the audit trail to flag config keys a given mode ignores, so a
//! stray key under `/execution` in a paper-mode layer doesn't silently do
//! nothing and get mistaken for an active setting.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigMode {
    Paper,
    Live,
}

pub fn consumed_pointers(mode: ConfigMode) -> &'static [&'static str] {
    match mode {
        ConfigMode::Paper => PAPER,
        ConfigMode::Live => LIVE,
    }
}

static PAPER: &[&str] = &[
    "/runtime/mode",
    "/broker",
    "/risk",
    "/execution",
    "/signal",
    "/suppression",
    "/baskets",
    "/eod",
];

static LIVE: &[&str] = &[
    "/runtime/mode",
    "/broker",
    "/risk",
    "/execution",
    "/signal",
    "/suppression",
    "/baskets",
    "/eod",
    "/llm",
];

/// Policy applied to config keys no component reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnusedKeyPolicy {
    Warn,
    Fail,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnusedKeysReport {
    pub unused_leaf_pointers: Vec<String>,
}

impl UnusedKeysReport {
    pub fn is_clean(&self) -> bool {
        self.unused_leaf_pointers.is_empty()
    }
}

/// Walk every leaf in `config_json` and flag ones no pointer in `mode`'s
/// consumed set covers. A leaf is covered if some consumed pointer is an
/// exact prefix of its path on a `/`-segment boundary — `/risk` covers
/// `/risk/daily_loss_limit` but not `/risk_extra`.
pub fn report_unused_keys(
    mode: ConfigMode,
    config_json: &serde_json::Value,
    policy: UnusedKeyPolicy,
) -> anyhow::Result<UnusedKeysReport> {
    let consumed = consumed_pointers(mode);
    let mut unused = Vec::new();
    collect_unused_leaves(config_json, String::new(), consumed, &mut unused);
    unused.sort();

    if policy == UnusedKeyPolicy::Fail && !unused.is_empty() {
        anyhow::bail!("CONFIG_UNUSED_KEYS: {} key(s) unused: {:?}", unused.len(), unused);
    }

    Ok(UnusedKeysReport {
        unused_leaf_pointers: unused,
    })
}

fn is_covered(pointer: &str, consumed: &[&str]) -> bool {
    consumed
        .iter()
        .any(|c| pointer == *c || pointer.starts_with(&format!("{c}/")))
}

fn collect_unused_leaves(
    v: &serde_json::Value,
    path: String,
    consumed: &[&str],
    out: &mut Vec<String>,
) {
    match v {
        serde_json::Value::Object(map) => {
            for (k, val) in map {
                collect_unused_leaves(val, format!("{path}/{k}"), consumed, out);
            }
        }
        _ => {
            if !is_covered(&path, consumed) {
                out.push(path);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn live_consumes_llm_pointer_paper_does_not() {
        assert!(consumed_pointers(ConfigMode::Live).contains(&"/llm"));
        assert!(!consumed_pointers(ConfigMode::Paper).contains(&"/llm"));
    }
}
