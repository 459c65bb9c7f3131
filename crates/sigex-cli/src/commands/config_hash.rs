//! `sigex-cli config-hash` — load a layered config and print its canonical
//! hash, plus any keys the given mode does not read.

use anyhow::Result;
use sigex_config::{report_unused_keys, UnusedKeyPolicy};

use super::parse_config_mode;

pub fn config_hash(paths: Vec<String>, mode: Option<String>) -> Result<()> {
    let path_refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
    let loaded = sigex_config::load_layered_yaml(&path_refs)?;

    println!("config_hash={}", loaded.config_hash);
    println!("{}", loaded.canonical_json);

    if let Some(mode) = mode {
        let cfg_mode = parse_config_mode(&mode)?;
        let report = report_unused_keys(cfg_mode, &loaded.config_json, UnusedKeyPolicy::Warn)?;
        if report.is_clean() {
            println!("unused_keys=none");
        } else {
            for p in &report.unused_leaf_pointers {
                println!("unused_key={p}");
            }
        }
    }

    Ok(())
}
