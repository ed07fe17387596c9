// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Socket server and connection handling.

use rsw_core::StatusStore;
use tokio::net::TcpStream;
use tracing::{debug, error};

use crate::protocol::{self, Request, Response, DEFAULT_TIMEOUT};

/// Handle a single client connection.
///
/// Requests are served one at a time until the client sends `close` or
/// disconnects. An unreadable request gets an error response and the
/// session continues.
pub async fn handle_connection(status: StatusStore, stream: TcpStream) -> Result<(), ServerError> {
    let (mut reader, mut writer) = stream.into_split();

    loop {
        let request = match protocol::read_request(&mut reader, DEFAULT_TIMEOUT).await {
            Ok(req) => req,
            Err(protocol::ProtocolError::ConnectionClosed) => {
                debug!("client disconnected");
                return Ok(());
            }
            Err(protocol::ProtocolError::Timeout) => {
                error!("request read timeout");
                return Err(ServerError::Timeout);
            }
            Err(protocol::ProtocolError::Json(e)) => {
                debug!("unreadable request: {}", e);
                let response = Response::Error {
                    message: format!("invalid request: {e}"),
                };
                protocol::write_response(&mut writer, &response, DEFAULT_TIMEOUT)
                    .await
                    .map_err(ServerError::Protocol)?;
                continue;
            }
            Err(e) => {
                error!("failed to read request: {}", e);
                return Err(ServerError::Protocol(e));
            }
        };

        debug!("received request: {:?}", request);

        match request {
            Request::Status => {
                let response = Response::Status {
                    services: status.snapshot(),
                };
                protocol::write_response(&mut writer, &response, DEFAULT_TIMEOUT)
                    .await
                    .map_err(ServerError::Protocol)?;
            }
            Request::Close => {
                debug!("client closed session");
                return Ok(());
            }
        }
    }
}

/// Server errors
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Protocol error: {0}")]
    Protocol(#[from] protocol::ProtocolError),

    #[error("Request timeout")]
    Timeout,
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
