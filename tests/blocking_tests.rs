//! Blocking client against a mock server.
//!
//! The blocking client must not run inside an async runtime, so these are
//! plain tests that drive the mock server through a separate runtime.

#![cfg(feature = "blocking")]

mod common;

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use serde_json::json;
use tokio::runtime::Runtime;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use domo_sdk::api::ImportMethod;
use domo_sdk::auth::AuthStrategy;
use domo_sdk::blocking::{DomoClient, Transport};
use domo_sdk::{Error, PageOptions};

use common::{developer_auth, init_logging, jwt_valid_for, oauth_auth, DEV_TOKEN};

fn start() -> (Runtime, MockServer) {
    init_logging();
    let rt = Runtime::new().unwrap();
    let server = rt.block_on(MockServer::start());
    (rt, server)
}

fn developer_client(server: &MockServer) -> DomoClient {
    DomoClient::from_transport(Arc::new(Transport::new(developer_auth(server))))
}

#[test]
fn test_list_stream_pages_lazily() {
    let (rt, server) = start();
    rt.block_on(async {
        for (offset, body) in [
            ("0", json!([{"id": 1}, {"id": 2}])),
            ("2", json!([{"id": 3}])),
            ("4", json!([])),
        ] {
            Mock::given(method("GET"))
                .and(path("/api/v1/users"))
                .and(header("x-domo-developer-token", DEV_TOKEN))
                .and(query_param("limit", "2"))
                .and(query_param("offset", offset))
                .respond_with(ResponseTemplate::new(200).set_body_json(body))
                .expect(1)
                .mount(&server)
                .await;
        }
    });

    let client = developer_client(&server);
    let ids: Vec<u64> = client
        .users()
        .list_stream(PageOptions::new().per_page(2))
        .unwrap()
        .map(|user| user.unwrap()["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 2, 3]);

    rt.block_on(server.verify());
}

#[test]
fn test_not_found() {
    let (rt, server) = start();
    rt.block_on(
        Mock::given(method("GET"))
            .and(path("/api/v1/datasets/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server),
    );

    let err = developer_client(&server).datasets().get("missing").unwrap_err();
    assert!(matches!(err, Error::NotFound { path } if path == "/v1/datasets/missing"));
}

#[test]
fn test_invalid_page_size() {
    let (_rt, server) = start();
    let client = developer_client(&server);
    assert!(matches!(
        client.groups().list_stream(PageOptions::new().per_page(51)),
        Err(Error::Validation(_))
    ));
}

#[test]
fn test_oauth_token_fetched_once() {
    let (rt, server) = start();
    rt.block_on(async {
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"access_token": jwt_valid_for(3600)})),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/authorization/v1/roles"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1}])))
            .expect(3)
            .mount(&server)
            .await;
    });

    let client = DomoClient::from_transport(Arc::new(Transport::new(oauth_auth(&server))));
    for _ in 0..3 {
        assert_eq!(client.roles().list().unwrap().len(), 1);
    }

    rt.block_on(server.verify());
}

#[test]
fn test_concurrent_threads_share_one_refresh() {
    let (rt, server) = start();
    rt.block_on(
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"access_token": jwt_valid_for(3600)}))
                    .set_delay(Duration::from_millis(200)),
            )
            .expect(1)
            .mount(&server),
    );

    let auth = oauth_auth(&server);
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let auth = auth.clone();
            thread::spawn(move || auth.blocking_headers())
        })
        .collect();

    for handle in handles {
        let headers = handle.join().unwrap().unwrap();
        assert!(headers["authorization"].to_str().unwrap().starts_with("bearer "));
    }

    rt.block_on(server.verify());
}

#[test]
fn test_close_then_reuse() {
    let (rt, server) = start();
    rt.block_on(
        Mock::given(method("GET"))
            .and(path("/api/v1/pages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(2)
            .mount(&server),
    );

    let client = developer_client(&server);
    client.pages().list().unwrap();
    client.close();
    client.close();
    assert!(!client.transport().is_open());

    client.pages().list().unwrap();
    assert!(client.transport().is_open());

    rt.block_on(server.verify());
}

#[test]
fn test_gzip_import_headers() {
    let (rt, server) = start();
    rt.block_on(
        Mock::given(method("PUT"))
            .and(path("/api/v1/datasets/abc/data"))
            .and(query_param("updateMethod", "REPLACE"))
            .and(header("content-type", "text/csv"))
            .and(header("content-encoding", "gzip"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server),
    );

    developer_client(&server)
        .datasets()
        .data_import_gzip("abc", b"a,b\n1,2\n", ImportMethod::Replace)
        .unwrap();

    rt.block_on(server.verify());
}
