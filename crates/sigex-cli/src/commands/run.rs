//! Run-lifecycle command handlers.
//!
//! Covers `sigex-cli run {start,stop,halt,status}`. These are thin HTTP
//! clients against the daemon's status/control surface
//! (`/v1/run/{start,stop,halt}`, `/v1/status`) — the CLI holds no run state
//! of its own, it just drives the daemon the same way an operator dashboard
//! would.

use anyhow::{Context, Result};
use serde_json::Value;

async fn post(addr: &str, path: &str) -> Result<Value> {
    let url = format!("{}{}", addr.trim_end_matches('/'), path);
    let resp = reqwest::Client::new()
        .post(&url)
        .send()
        .await
        .with_context(|| format!("POST {url} failed"))?;
    let status = resp.status();
    let body: Value = resp
        .json()
        .await
        .with_context(|| format!("POST {url} returned non-JSON body"))?;
    if !status.is_success() {
        anyhow::bail!("POST {url} returned {status}: {body}");
    }
    Ok(body)
}

async fn get(addr: &str, path: &str) -> Result<Value> {
    let url = format!("{}{}", addr.trim_end_matches('/'), path);
    let resp = reqwest::Client::new()
        .get(&url)
        .send()
        .await
        .with_context(|| format!("GET {url} failed"))?;
    let status = resp.status();
    let body: Value = resp
        .json()
        .await
        .with_context(|| format!("GET {url} returned non-JSON body"))?;
    if !status.is_success() {
        anyhow::bail!("GET {url} returned {status}: {body}");
    }
    Ok(body)
}

fn print_snapshot(v: &Value) {
    println!("state={}", v["state"].as_str().unwrap_or("unknown"));
    println!(
        "active_run_id={}",
        v["active_run_id"].as_str().unwrap_or("")
    );
    println!(
        "kill_switched={}",
        v["kill_switched"].as_bool().unwrap_or(false)
    );
}

pub async fn run_start(addr: &str) -> Result<()> {
    let snap = post(addr, "/v1/run/start").await?;
    print_snapshot(&snap);
    Ok(())
}

pub async fn run_stop(addr: &str) -> Result<()> {
    let snap = post(addr, "/v1/run/stop").await?;
    print_snapshot(&snap);
    Ok(())
}

pub async fn run_halt(addr: &str) -> Result<()> {
    let snap = post(addr, "/v1/run/halt").await?;
    print_snapshot(&snap);
    Ok(())
}

pub async fn run_status(addr: &str) -> Result<()> {
    let snap = get(addr, "/v1/status").await?;
    print_snapshot(&snap);
    Ok(())
}
