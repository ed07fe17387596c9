// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output formatting for CLI commands

use std::collections::BTreeMap;

use clap::ValueEnum;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Print the per-service status mapping in the specified format.
pub fn print_status(services: &BTreeMap<String, bool>, format: OutputFormat) {
    match format {
        OutputFormat::Text => {
            for (service, healthy) in services {
                let state = if *healthy { "OK" } else { "FAILED" };
                println!("{}: {}", service, state);
            }
        }
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(services) {
                println!("{}", json);
            }
        }
    }
}
