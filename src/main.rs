// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::Context;
use std::env;
use tracing_subscriber::EnvFilter;

use dispatch_context::backends::memory::InMemoryDispatcher;
use dispatch_context::config::load_and_validate_config;
use dispatch_context::context::RequestContext;
use dispatch_context::engine::DispatchFacade;
use dispatch_context::traits::TaskHandle;
use dispatch_context::utils::metadata_from_pairs;

const TRACE_ID_VAR: &str = "TRACE_ID";
const TENANT_ID_VAR: &str = "TENANT_ID";
const PROGRAM_NAME: &str = "dispatch-context";

fn program_name(args: &[String]) -> &str {
    args.first().map_or(PROGRAM_NAME, String::as_str)
}

/// Split `key=value` arguments. Arguments without `=` are rejected.
fn parse_pairs(args: &[String]) -> anyhow::Result<Vec<(&str, &str)>> {
    args.iter()
        .map(|arg| {
            arg.split_once('=')
                .filter(|(key, _)| !key.is_empty())
                .with_context(|| format!("expected key=value, got '{}'", arg))
        })
        .collect()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("dispatch_context=info,warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        let program = program_name(&args);
        eprintln!("Usage: {} <config.yaml> <template> [key=value ...]", program);
        eprintln!("Example: TRACE_ID=req-42 {} configs/demo.yaml nightly priority=high", program);
        std::process::exit(1);
    }

    let cfg = load_and_validate_config(&args[1])
        .with_context(|| format!("failed to load config '{}'", args[1]))?;
    let template = cfg.template(&args[2])?;
    let extra = metadata_from_pairs(parse_pairs(&args[3..])?);

    // Environment variables stand in for inbound request headers.
    let trace_id = env::var(TRACE_ID_VAR).unwrap_or_default();
    let tenant_id = env::var(TENANT_ID_VAR).unwrap_or_default();
    let headers = [
        (cfg.context.trace_header.as_str(), trace_id.as_str()),
        (cfg.context.tenant_header.as_str(), tenant_id.as_str()),
    ];
    let ctx = RequestContext::from_headers(headers, &cfg.context);

    let facade = DispatchFacade::new(ctx, InMemoryDispatcher::new()).with_defaults(cfg.defaults.clone());
    let handle = facade.send(template, &extra, cfg.deep)?;

    let sent = facade
        .dispatcher()
        .submitted_as(handle.id())
        .context("dispatched graph was not recorded")?;

    println!("task id: {}", handle.id());
    println!("{}", serde_json::to_string_pretty(&sent)?);
    Ok(())
}
