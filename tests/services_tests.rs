//! Resource services end to end against a mock server.

mod common;

use std::io::Read;

use flate2::read::GzDecoder;
use futures_util::TryStreamExt;
use serde_json::{json, Value};
use wiremock::matchers::{body_json, body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use domo_sdk::api::{ActivityLogQuery, DatasetListQuery, ImportMethod};
use domo_sdk::{Error, PageOptions};

use common::{developer_client, init_logging, jwt_valid_for, oauth_client};

fn items(ids: std::ops::Range<u32>) -> Value {
    Value::Array(ids.map(|id| json!({ "id": id })).collect())
}

async fn mount_page(server: &MockServer, route: &str, limit: &str, offset: &str, body: Value, calls: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .and(query_param("limit", limit))
        .and(query_param("offset", offset))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(calls)
        .mount(server)
        .await;
}

// =============================================================================
// Pagination
// =============================================================================

mod pagination {
    use super::*;

    #[tokio::test]
    async fn test_declared_size_continues_past_short_page() {
        init_logging();
        let server = MockServer::start().await;
        mount_page(&server, "/api/v1/users", "2", "0", items(0..2), 1).await;
        mount_page(&server, "/api/v1/users", "2", "2", items(2..3), 1).await;
        mount_page(&server, "/api/v1/users", "2", "4", json!([]), 1).await;

        let client = developer_client(&server);
        let users = client.users().list(PageOptions::new().per_page(2)).await.unwrap();
        assert_eq!(users.len(), 3);
        server.verify().await;
    }

    #[tokio::test]
    async fn test_limit_caps_items_and_requests() {
        let server = MockServer::start().await;
        mount_page(&server, "/api/v1/datasets", "2", "0", items(0..2), 1).await;
        mount_page(&server, "/api/v1/datasets", "1", "2", items(2..4), 1).await;

        let client = developer_client(&server);
        let datasets = client
            .datasets()
            .list(PageOptions::new().per_page(2).limit(3), DatasetListQuery::new())
            .await
            .unwrap();

        let ids: Vec<_> = datasets.iter().map(|d| d["id"].as_u64().unwrap()).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        server.verify().await;
    }

    #[tokio::test]
    async fn test_list_query_is_merged_with_page_params() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/datasets"))
            .and(query_param("nameLike", "sales"))
            .and(query_param("sort", "name"))
            .and(query_param("limit", "50"))
            .and(query_param("offset", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let client = developer_client(&server);
        let found = client
            .datasets()
            .list(PageOptions::new(), DatasetListQuery::new().name_like("sales").sort("name"))
            .await
            .unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_short_page_stops_group_stream() {
        let server = MockServer::start().await;
        mount_page(&server, "/api/v1/groups", "3", "0", items(0..3), 1).await;
        mount_page(&server, "/api/v1/groups", "3", "3", items(3..5), 1).await;
        mount_page(&server, "/api/v1/groups", "3", "5", json!([]), 0).await;
        mount_page(&server, "/api/v1/groups", "3", "6", json!([]), 0).await;

        let client = developer_client(&server);
        let groups: Vec<Value> = client
            .groups()
            .list_stream(PageOptions::new().per_page(3))
            .unwrap()
            .try_collect()
            .await
            .unwrap();
        assert_eq!(groups.len(), 5);
        server.verify().await;
    }

    #[tokio::test]
    async fn test_stream_is_lazy() {
        let server = MockServer::start().await;
        mount_page(&server, "/api/v1/accounts", "2", "0", items(0..2), 1).await;
        mount_page(&server, "/api/v1/accounts", "2", "2", items(2..4), 0).await;

        let client = developer_client(&server);
        let mut stream = client
            .accounts()
            .list_stream(PageOptions::new().per_page(2))
            .unwrap();
        assert_eq!(stream.try_next().await.unwrap(), Some(json!({"id": 0})));
        assert_eq!(stream.try_next().await.unwrap(), Some(json!({"id": 1})));
        drop(stream);
        server.verify().await;
    }

    #[tokio::test]
    async fn test_stream_ends_after_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/streams"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let client = developer_client(&server);
        let mut stream = client.streams().list_stream(PageOptions::new()).unwrap();
        assert!(matches!(
            stream.try_next().await,
            Err(Error::Api { status: 503, .. })
        ));
        assert!(stream.try_next().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_invalid_page_size_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(0)
            .mount(&server)
            .await;

        let client = developer_client(&server);
        assert!(matches!(
            client.users().list(PageOptions::new().per_page(51)).await,
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            client.datasets().list_stream(PageOptions::new().per_page(0), DatasetListQuery::new()),
            Err(Error::Validation(_))
        ));
        assert!(matches!(client.groups().list(100, 0).await, Err(Error::Validation(_))));
        assert!(matches!(
            client.search().search_datasets("x", 51, 0).await,
            Err(Error::Validation(_))
        ));
        server.verify().await;
    }

    #[tokio::test]
    async fn test_non_array_list_payload_is_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/pages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"pages": []})))
            .mount(&server)
            .await;

        let err = developer_client(&server).pages().list().await.unwrap_err();
        assert!(matches!(err, Error::Api { status: 200, .. }));
    }

    #[tokio::test]
    async fn test_activity_log_stream_sends_filters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/audit"))
            .and(query_param("user", "42"))
            .and(query_param("start", "1000"))
            .and(query_param("end", "2000"))
            .and(query_param("offset", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(items(0..1)))
            .expect(1)
            .mount(&server)
            .await;

        let client = developer_client(&server);
        let query = ActivityLogQuery::new().user(42).between(1000, 2000);
        let entries: Vec<Value> = client
            .activity_log()
            .stream(query, PageOptions::new().per_page(10))
            .unwrap()
            .try_collect()
            .await
            .unwrap();
        assert_eq!(entries.len(), 1);
    }
}

// =============================================================================
// Search
// =============================================================================

mod search {
    use super::*;

    #[tokio::test]
    async fn test_developer_token_uses_datasource_search() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/data/ui/v3/datasources/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "dataSources": [{"id": "ds-1", "name": "Sales"}],
                "totalCount": 1,
            })))
            .expect(1)
            .mount(&server)
            .await;

        let found = developer_client(&server)
            .search()
            .search_datasets("sales", 10, 0)
            .await
            .unwrap();
        assert_eq!(found, vec![json!({"id": "ds-1", "name": "Sales"})]);

        let requests = server.received_requests().await.unwrap();
        let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(body["filters"][0]["query"], "*sales*");
        assert_eq!(body["count"], 10);
    }

    #[tokio::test]
    async fn test_oauth_uses_public_dataset_listing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"access_token": jwt_valid_for(3600)})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/datasets"))
            .and(query_param("nameLike", "sales"))
            .and(query_param("limit", "5"))
            .and(query_param("offset", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "ds-2"}])))
            .expect(1)
            .mount(&server)
            .await;

        let found = oauth_client(&server)
            .search()
            .search_datasets("sales", 5, 10)
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
    }
}

// =============================================================================
// Datasets and Streams
// =============================================================================

mod data {
    use super::*;

    #[tokio::test]
    async fn test_data_import_puts_csv() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/v1/datasets/abc/data"))
            .and(query_param("updateMethod", "APPEND"))
            .and(header("content-type", "text/csv"))
            .and(body_string("a,b\n1,2\n"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        developer_client(&server)
            .datasets()
            .data_import("abc", "a,b\n1,2\n", ImportMethod::Append)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_data_import_gzip_compresses_body() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/v1/datasets/abc/data"))
            .and(query_param("updateMethod", "REPLACE"))
            .and(header("content-type", "text/csv"))
            .and(header("content-encoding", "gzip"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let csv = b"region,total\nwest,10\neast,20\n";
        developer_client(&server)
            .datasets()
            .data_import_gzip("abc", csv, ImportMethod::Replace)
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        let mut decoded = Vec::new();
        GzDecoder::new(requests[0].body.as_slice())
            .read_to_end(&mut decoded)
            .unwrap();
        assert_eq!(decoded, csv);
    }

    #[tokio::test]
    async fn test_data_export_returns_csv_text() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/datasets/abc/data"))
            .and(query_param("includeHeader", "true"))
            .and(header("accept", "text/csv"))
            .respond_with(ResponseTemplate::new(200).set_body_string("region,total\nwest,10\n"))
            .mount(&server)
            .await;

        let csv = developer_client(&server)
            .datasets()
            .data_export("abc", true)
            .await
            .unwrap();
        assert_eq!(csv, "region,total\nwest,10\n");
    }

    #[tokio::test]
    async fn test_query_posts_sql() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/datasets/query/execute/abc"))
            .and(body_json(json!({"sql": "SELECT * FROM table"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"numRows": 0, "rows": []})))
            .expect(1)
            .mount(&server)
            .await;

        let result = developer_client(&server)
            .datasets()
            .query("abc", "SELECT * FROM table")
            .await
            .unwrap();
        assert_eq!(result["numRows"], 0);
    }

    #[tokio::test]
    async fn test_stream_upload_cycle() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/streams/9/executions"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 3})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/api/v1/streams/9/executions/3/part/1"))
            .and(header("content-type", "text/csv"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/api/v1/streams/9/executions/3/commit"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"currentState": "SUCCESS"})))
            .expect(1)
            .mount(&server)
            .await;

        let streams = developer_client(&server).streams();
        let execution = streams.create_execution(9).await.unwrap();
        let execution_id = execution["id"].as_u64().unwrap();
        streams.upload_part(9, execution_id, 1, "a\n1\n").await.unwrap();
        let committed = streams.commit_execution(9, execution_id).await.unwrap();
        assert_eq!(committed["currentState"], "SUCCESS");
    }
}

// =============================================================================
// Other Services
// =============================================================================

mod misc {
    use super::*;

    #[tokio::test]
    async fn test_create_user_sends_invite_flag() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/users"))
            .and(query_param("sendInvite", "true"))
            .and(body_json(json!({"email": "ada@example.com", "role": "Participant"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 11})))
            .expect(1)
            .mount(&server)
            .await;

        let user = developer_client(&server)
            .users()
            .create(&json!({"email": "ada@example.com", "role": "Participant"}), true)
            .await
            .unwrap();
        assert_eq!(user["id"], 11);
    }

    #[tokio::test]
    async fn test_account_update_uses_patch() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/api/v1/accounts/acc-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "acc-1"})))
            .expect(1)
            .mount(&server)
            .await;

        developer_client(&server)
            .accounts()
            .update("acc-1", &json!({"name": "renamed"}))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_embed_token_body_includes_card_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/cards/embed/auth"))
            .and(body_json(json!({"sessionLength": 60, "cardId": "c1"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"authentication": "t"})))
            .expect(1)
            .mount(&server)
            .await;

        let token = developer_client(&server)
            .embed()
            .create_card_token("c1", json!({"sessionLength": 60}))
            .await
            .unwrap();
        assert_eq!(token["authentication"], "t");
    }

    #[tokio::test]
    async fn test_alert_subscription() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/social/v4/alerts/4/subscribe"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/social/v4/alerts/4/subscribe"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let alerts = developer_client(&server).alerts();
        alerts.subscribe(4).await.unwrap();
        alerts.unsubscribe(4).await.unwrap();
    }

    #[tokio::test]
    async fn test_ai_text_to_sql() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/ai/v1/text/sql"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"output": "SELECT 1"})))
            .expect(1)
            .mount(&server)
            .await;

        let result = developer_client(&server)
            .ai()
            .text()
            .to_sql(&json!({"input": "one"}))
            .await
            .unwrap();
        assert_eq!(result["output"], "SELECT 1");
    }

    #[tokio::test]
    async fn test_file_download_returns_text() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/data/v1/data-files/8/revision/2"))
            .respond_with(ResponseTemplate::new(200).set_body_string("file contents"))
            .mount(&server)
            .await;

        let text = developer_client(&server).files().download(8, 2).await.unwrap();
        assert_eq!(text, "file contents");
    }

    #[tokio::test]
    async fn test_role_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/authorization/v1/roles/99"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = developer_client(&server).roles().get(99).await.unwrap_err();
        assert!(matches!(err, Error::NotFound { path } if path == "/authorization/v1/roles/99"));
    }
}
