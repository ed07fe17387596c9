// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Connection handling tests over real TCP sockets

use std::collections::BTreeMap;
use std::net::SocketAddr;

use rsw_core::StatusStore;
use tokio::net::{TcpListener, TcpStream};

use super::*;
use crate::protocol::{self, ProtocolError};

async fn start_server(status: StatusStore) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                break;
            };
            let status = status.clone();
            tokio::spawn(async move {
                let _ = handle_connection(status, stream).await;
            });
        }
    });
    addr
}

async fn send(stream: &mut TcpStream, request: &Request) {
    let data = protocol::encode(request).unwrap();
    protocol::write_message(stream, &data).await.unwrap();
}

async fn recv(stream: &mut TcpStream) -> Response {
    let bytes = protocol::read_message(stream).await.unwrap();
    protocol::decode(&bytes).unwrap()
}

#[tokio::test]
async fn status_returns_current_snapshot() {
    let status = StatusStore::new();
    status.record("svc-1", true);
    status.record("svc-2", false);
    let addr = start_server(status).await;

    let mut stream = TcpStream::connect(addr).await.unwrap();
    send(&mut stream, &Request::Status).await;

    assert_eq!(
        recv(&mut stream).await,
        Response::Status {
            services: BTreeMap::from([
                ("svc-1".to_string(), true),
                ("svc-2".to_string(), false),
            ]),
        }
    );
}

#[tokio::test]
async fn session_serves_repeated_requests() {
    let status = StatusStore::new();
    let addr = start_server(status.clone()).await;

    let mut stream = TcpStream::connect(addr).await.unwrap();
    send(&mut stream, &Request::Status).await;
    assert_eq!(
        recv(&mut stream).await,
        Response::Status {
            services: BTreeMap::new()
        }
    );

    // A write after the first read is visible on the same session.
    status.record("svc-1", true);
    send(&mut stream, &Request::Status).await;
    assert_eq!(
        recv(&mut stream).await,
        Response::Status {
            services: BTreeMap::from([("svc-1".to_string(), true)]),
        }
    );
}

#[tokio::test]
async fn unknown_request_gets_error_and_keeps_session() {
    let status = StatusStore::new();
    status.record("svc-1", true);
    let addr = start_server(status).await;

    let mut stream = TcpStream::connect(addr).await.unwrap();
    protocol::write_message(&mut stream, br#"{"type":"bogus"}"#)
        .await
        .unwrap();

    assert!(matches!(
        recv(&mut stream).await,
        Response::Error { .. }
    ));

    // The session is still usable afterwards.
    send(&mut stream, &Request::Status).await;
    assert!(matches!(recv(&mut stream).await, Response::Status { .. }));
}

#[tokio::test]
async fn malformed_json_gets_error_response() {
    let addr = start_server(StatusStore::new()).await;

    let mut stream = TcpStream::connect(addr).await.unwrap();
    protocol::write_message(&mut stream, b"not json at all")
        .await
        .unwrap();

    assert!(matches!(
        recv(&mut stream).await,
        Response::Error { .. }
    ));
}

#[tokio::test]
async fn close_ends_session_without_reply() {
    let addr = start_server(StatusStore::new()).await;

    let mut stream = TcpStream::connect(addr).await.unwrap();
    send(&mut stream, &Request::Close).await;

    let result = protocol::read_message(&mut stream).await;
    assert!(matches!(result, Err(ProtocolError::ConnectionClosed)));
}

#[tokio::test]
async fn serves_concurrent_clients() {
    let status = StatusStore::new();
    status.record("svc-1", true);
    let addr = start_server(status).await;

    let mut first = TcpStream::connect(addr).await.unwrap();
    let mut second = TcpStream::connect(addr).await.unwrap();

    // Both sessions are served while the other stays open.
    send(&mut first, &Request::Status).await;
    send(&mut second, &Request::Status).await;

    let expected = Response::Status {
        services: BTreeMap::from([("svc-1".to_string(), true)]),
    };
    assert_eq!(recv(&mut second).await, expected);
    assert_eq!(recv(&mut first).await, expected);
}
