// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `rsw status` - show per-service backup status

use std::net::SocketAddr;

use anyhow::Result;
use clap::Args;

use crate::client::QueryClient;
use crate::output::{self, OutputFormat};

#[derive(Args)]
pub struct StatusArgs {
    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

pub async fn handle(addr: SocketAddr, args: StatusArgs) -> Result<()> {
    let mut client = QueryClient::connect(addr).await?;
    let services = client.status().await?;
    client.close().await?;

    if services.is_empty() {
        if let OutputFormat::Text = args.format {
            println!("No backups recorded");
            return Ok(());
        }
    }

    output::print_status(&services, args.format);
    Ok(())
}
