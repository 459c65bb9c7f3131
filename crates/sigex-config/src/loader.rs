//! Layered YAML config loading with deterministic canonicalization.
//!
//! Config files are loaded in order and deep-merged (later files override
//! earlier ones). The merged tree is canonicalized — object keys sorted
//! recursively, compact encoding — before being hashed, so two runs given
//! the same layered inputs always produce the same `config_hash`, which the
//! audit trail records alongside every decision.

use anyhow::{Context, Result};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fs;

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config_json: Value,
    pub canonical_json: String,
    pub config_hash: String,
}

/// Load and merge YAML files from disk, in order.
pub fn load_layered_yaml(paths: &[&str]) -> Result<LoadedConfig> {
    let mut contents = Vec::with_capacity(paths.len());
    for p in paths {
        contents.push(fs::read_to_string(p).with_context(|| format!("read config: {p}"))?);
    }
    let refs: Vec<&str> = contents.iter().map(String::as_str).collect();
    load_layered_yaml_from_strings(&refs)
}

/// Load and merge YAML documents already in memory, in order. This is the
/// primitive `load_layered_yaml` wraps; tests exercise it directly to avoid
/// touching the filesystem.
pub fn load_layered_yaml_from_strings(docs: &[&str]) -> Result<LoadedConfig> {
    let mut merged = Value::Object(Default::default());

    for (i, doc) in docs.iter().enumerate() {
        let yaml_val: serde_yaml::Value =
            serde_yaml::from_str(doc).with_context(|| format!("parse yaml layer {i}"))?;
        let json_val = serde_json::to_value(yaml_val).context("yaml->json conversion failed")?;
        deep_merge(&mut merged, json_val);
    }

    reject_literal_secrets(&merged, String::new())?;

    let canonical = canonicalize_json(&merged);

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    let hash = hex::encode(hasher.finalize());

    Ok(LoadedConfig {
        config_json: serde_json::from_str(&canonical).context("canonical json parse failed")?,
        canonical_json: canonical,
        config_hash: hash,
    })
}

/// Config files store env var *names*, never secret values. Reject anything
/// that looks like a live credential so a pasted-in key doesn't end up in
/// the audit trail's canonical config hash.
fn reject_literal_secrets(v: &Value, path: String) -> Result<()> {
    match v {
        Value::Object(map) => {
            for (k, val) in map {
                reject_literal_secrets(val, format!("{path}/{k}"))?;
            }
        }
        Value::Array(arr) => {
            for (i, val) in arr.iter().enumerate() {
                reject_literal_secrets(val, format!("{path}[{i}]"))?;
            }
        }
        Value::String(s) => {
            if looks_like_secret(s) {
                anyhow::bail!("CONFIG_SECRET_DETECTED: literal secret-like value at '{path}'");
            }
        }
        _ => {}
    }
    Ok(())
}

fn looks_like_secret(s: &str) -> bool {
    const LITERAL_PREFIXES: &[&str] = &["sk-", "AKIA", "ghp_", "xox"];
    if LITERAL_PREFIXES.iter().any(|p| s.starts_with(p)) {
        return true;
    }
    s.contains("PRIVATE KEY")
}

fn deep_merge(dst: &mut Value, src: Value) {
    match (dst, src) {
        (Value::Object(dst_map), Value::Object(src_map)) => {
            for (k, v) in src_map {
                match dst_map.get_mut(&k) {
                    Some(existing) => deep_merge(existing, v),
                    None => {
                        dst_map.insert(k, v);
                    }
                }
            }
        }
        (dst_slot, src_val) => {
            *dst_slot = src_val;
        }
    }
}

fn canonicalize_json(v: &Value) -> String {
    let sorted = sort_keys(v);
    serde_json::to_string(&sorted).expect("json serialization must not fail")
}

fn sort_keys(v: &Value) -> Value {
    match v {
        Value::Object(map) => {
            let mut keys: Vec<_> = map.keys().cloned().collect();
            keys.sort();
            let mut new = serde_json::Map::new();
            for k in keys {
                new.insert(k.clone(), sort_keys(&map[&k]));
            }
            Value::Object(new)
        }
        Value::Array(arr) => Value::Array(arr.iter().map(sort_keys).collect()),
        _ => v.clone(),
    }
}
