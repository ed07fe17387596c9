// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon client for CLI commands

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::time::Duration;

use rsw_daemon::protocol::{self, ProtocolError};
use rsw_daemon::{Request, Response};
use thiserror::Error;
use tokio::net::TcpStream;

// Timeout configuration (env vars in milliseconds)
fn parse_duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

/// Timeout for a single request/response exchange
pub fn timeout_ipc() -> Duration {
    parse_duration_ms("RSW_TIMEOUT_IPC_MS").unwrap_or(Duration::from_secs(5))
}

/// Timeout for establishing the connection
pub fn timeout_connect() -> Duration {
    parse_duration_ms("RSW_TIMEOUT_CONNECT_MS").unwrap_or(Duration::from_secs(5))
}

/// Client errors
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Request rejected: {0}")]
    Rejected(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Session-oriented client for the daemon's status query server.
pub struct QueryClient {
    stream: TcpStream,
}

impl QueryClient {
    /// Connect to a running daemon.
    pub async fn connect(addr: SocketAddr) -> Result<Self, ClientError> {
        let stream = tokio::time::timeout(timeout_connect(), TcpStream::connect(addr))
            .await
            .map_err(|_| ProtocolError::Timeout)??;
        Ok(Self { stream })
    }

    /// Send a request and receive a response on the open session.
    async fn send(&mut self, request: &Request) -> Result<Response, ClientError> {
        let data = protocol::encode(request)?;
        tokio::time::timeout(
            timeout_ipc(),
            protocol::write_message(&mut self.stream, &data),
        )
        .await
        .map_err(|_| ProtocolError::Timeout)??;

        let response_bytes =
            tokio::time::timeout(timeout_ipc(), protocol::read_message(&mut self.stream))
                .await
                .map_err(|_| ProtocolError::Timeout)??;

        Ok(protocol::decode(&response_bytes)?)
    }

    /// Fetch the per-service status mapping.
    pub async fn status(&mut self) -> Result<BTreeMap<String, bool>, ClientError> {
        match self.send(&Request::Status).await? {
            Response::Status { services } => Ok(services),
            Response::Error { message } => Err(ClientError::Rejected(message)),
        }
    }

    /// End the session. The server closes the connection without replying.
    pub async fn close(mut self) -> Result<(), ClientError> {
        let data = protocol::encode(&Request::Close)?;
        tokio::time::timeout(
            timeout_ipc(),
            protocol::write_message(&mut self.stream, &data),
        )
        .await
        .map_err(|_| ProtocolError::Timeout)??;
        Ok(())
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
