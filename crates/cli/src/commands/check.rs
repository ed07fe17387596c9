// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `rsw check` - health check against the daemon's status server

use std::net::SocketAddr;

use anyhow::Result;

use crate::client::QueryClient;
use crate::output::{self, OutputFormat};

/// Print one `<service>: OK` or `<service>: FAILED` line per recorded backup.
///
/// Returns exit code 1 when any service's last backup failed, so the command
/// can back a container HEALTHCHECK directly.
pub async fn handle(addr: SocketAddr) -> Result<i32> {
    let mut client = QueryClient::connect(addr).await?;
    let services = client.status().await?;
    client.close().await?;

    output::print_status(&services, OutputFormat::Text);

    let healthy = services.values().all(|ok| *ok);
    Ok(if healthy { 0 } else { 1 })
}
