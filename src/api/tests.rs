//! Tests for the users API.

#[cfg(test)]
mod api_tests {
    use std::time::Duration;
    use serde_json::{json, Value};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    use crate::api::{register_routes, ApiError, Envelope, Status, SERVICE_NAME};
    use crate::parser::Error as ParserError;
    use crate::server::{Error as ServerError, HttpServer, ServerConfig, StatusCode};
    use crate::store::{Error as StoreError, SharedUserStore, UserStore};

    struct Reply {
        status: u16,
        headers: String,
        body: Value,
    }

    async fn app() -> (HttpServer, SharedUserStore) {
        let store = UserStore::with_seed_users().into_shared();
        let server = HttpServer::new(ServerConfig::default());
        register_routes(&server, store.clone()).await;
        (server, store)
    }

    async fn call(server: &HttpServer, method: &str, path: &str, body: Option<&str>) -> Reply {
        let mut raw = format!("{method} {path} HTTP/1.1\r\nHost: localhost\r\n");
        if let Some(body) = body {
            raw.push_str(&format!(
                "Content-Type: application/json\r\nContent-Length: {len}\r\n",
                len = body.len()
            ));
        }
        raw.push_str("\r\n");
        raw.push_str(body.unwrap_or_default());
        send_raw(server, raw.as_bytes()).await
    }

    async fn send_raw(server: &HttpServer, raw: &[u8]) -> Reply {
        let (mut client, mut socket) = tokio::io::duplex(64 * 1024);
        client.write_all(raw).await.unwrap();

        let routes = server.routes.clone();
        let _ = HttpServer::handle_connection(&mut socket, routes, &server.config).await;
        drop(socket);

        let mut out = Vec::new();
        client.read_to_end(&mut out).await.unwrap();
        let text = String::from_utf8(out).unwrap();
        let (head, body) = text.split_once("\r\n\r\n").unwrap();

        let status = head
            .split_whitespace()
            .nth(1)
            .and_then(|code| code.parse().ok())
            .unwrap();

        Reply {
            status,
            headers: head.to_string(),
            body: serde_json::from_str(body).unwrap_or(Value::Null),
        }
    }

    fn ids(reply: &Reply) -> Vec<u64> {
        reply.body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|u| u["id"].as_u64().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_health_check() {
        let (server, _) = app().await;
        let reply = call(&server, "GET", "/api/v1/health", None).await;

        assert_eq!(reply.status, 200);
        assert!(reply.headers.contains("Content-Type: application/json"));
        assert_eq!(reply.body["status"], "success");
        assert_eq!(reply.body["message"], "Server is running");
        assert_eq!(reply.body["data"]["service"], SERVICE_NAME);
        assert!(reply.body["data"]["timestamp"].as_u64().unwrap() > 0);
    }

    #[tokio::test]
    async fn test_api_info() {
        let (server, _) = app().await;
        let reply = call(&server, "GET", "/", None).await;

        assert_eq!(reply.status, 200);
        assert_eq!(reply.body["data"]["version"], env!("CARGO_PKG_VERSION"));
        assert_eq!(
            reply.body["data"]["endpoints"],
            json!([
                "GET /api/v1/health",
                "GET /api/v1/users",
                "POST /api/v1/users",
                "GET /api/v1/users/{id}",
                "PUT /api/v1/users/{id}",
                "DELETE /api/v1/users/{id}",
            ])
        );
    }

    #[tokio::test]
    async fn test_list_users() {
        let (server, _) = app().await;
        let reply = call(&server, "GET", "/api/v1/users", None).await;

        assert_eq!(reply.status, 200);
        assert_eq!(reply.body["message"], "Users retrieved successfully");
        assert_eq!(
            reply.body["data"],
            json!([
                {"id": 1, "name": "John Doe", "email": "john@example.com"},
                {"id": 2, "name": "Jane Smith", "email": "jane@example.com"},
            ])
        );
    }

    #[tokio::test]
    async fn test_list_users_empty_store() {
        let server = HttpServer::new(ServerConfig::default());
        register_routes(&server, UserStore::new().into_shared()).await;

        let reply = call(&server, "GET", "/api/v1/users", None).await;
        assert_eq!(reply.status, 200);
        assert_eq!(reply.body["data"], json!([]));
    }

    #[tokio::test]
    async fn test_get_user() {
        let (server, _) = app().await;
        let reply = call(&server, "GET", "/api/v1/users/1", None).await;

        assert_eq!(reply.status, 200);
        assert_eq!(
            reply.body,
            json!({
                "status": "success",
                "message": "User found",
                "data": {"id": 1, "name": "John Doe", "email": "john@example.com"},
            })
        );
    }

    #[tokio::test]
    async fn test_get_missing_user() {
        let (server, _) = app().await;
        let reply = call(&server, "GET", "/api/v1/users/999", None).await;

        assert_eq!(reply.status, 404);
        assert_eq!(reply.body, json!({"status": "error", "message": "User not found"}));
    }

    #[tokio::test]
    async fn test_malformed_ids() {
        let (server, _) = app().await;

        for (method, path) in [
            ("GET", "/api/v1/users/abc"),
            ("GET", "/api/v1/users/-1"),
            ("DELETE", "/api/v1/users/1.5"),
            ("GET", "/api/v1/users/+1"),
            ("DELETE", "/api/v1/users/+2"),
        ] {
            let reply = call(&server, method, path, None).await;
            assert_eq!(reply.status, 400, "{method} {path}");
            assert_eq!(reply.body, json!({"status": "error", "message": "Invalid user ID"}));
        }

        // The id is checked before the body
        let reply = call(&server, "PUT", "/api/v1/users/abc", Some("not json")).await;
        assert_eq!(reply.status, 400);
        assert_eq!(reply.body["message"], "Invalid user ID");
    }

    #[tokio::test]
    async fn test_stalled_create_times_out() {
        let store = UserStore::with_seed_users().into_shared();
        let server = HttpServer::new(ServerConfig {
            read_timeout: Duration::from_millis(50),
            ..ServerConfig::default()
        });
        register_routes(&server, store.clone()).await;

        // The client stays connected without sending the rest of the body
        let (mut client, mut socket) = tokio::io::duplex(64 * 1024);
        let head = b"POST /api/v1/users HTTP/1.1\r\nHost: x\r\nContent-Length: 100\r\n\r\n";
        client.write_all(head).await.unwrap();
        client.write_all(b"{\"name\"").await.unwrap();

        let result =
            HttpServer::handle_connection(&mut socket, server.routes.clone(), &server.config).await;
        assert!(matches!(result, Err(ServerError::RequestTimeout(_))));
        drop(socket);

        let mut out = String::new();
        client.read_to_string(&mut out).await.unwrap();
        assert!(out.starts_with("HTTP/1.1 408 Request Timeout\r\n"));
        assert_eq!(store.lock().await.len(), 2);
    }

    #[tokio::test]
    async fn test_create_user() {
        let (server, store) = app().await;
        let reply = call(
            &server,
            "POST",
            "/api/v1/users",
            Some(r#"{"name":"Bob","email":"bob@example.com"}"#),
        )
        .await;

        assert_eq!(reply.status, 201);
        assert_eq!(reply.body["message"], "User created successfully");
        assert_eq!(
            reply.body["data"],
            json!({"id": 3, "name": "Bob", "email": "bob@example.com"})
        );
        assert_eq!(store.lock().await.len(), 3);
    }

    #[tokio::test]
    async fn test_create_ignores_supplied_id() {
        let (server, store) = app().await;
        let reply = call(
            &server,
            "POST",
            "/api/v1/users",
            Some(r#"{"id":1,"name":"Mallory","email":"m@example.com"}"#),
        )
        .await;

        assert_eq!(reply.status, 201);
        assert_eq!(reply.body["data"]["id"], 3);
        assert_eq!(store.lock().await.get(1).unwrap().name, "John Doe");
    }

    #[tokio::test]
    async fn test_consecutive_creates() {
        let (server, _) = app().await;
        let first = call(&server, "POST", "/api/v1/users", Some(r#"{"name":"A"}"#)).await;
        let second = call(&server, "POST", "/api/v1/users", Some(r#"{"name":"B"}"#)).await;

        let first_id = first.body["data"]["id"].as_u64().unwrap();
        let second_id = second.body["data"]["id"].as_u64().unwrap();
        assert_eq!(second_id, first_id + 1);
        assert_eq!(first.body["data"]["email"], "");
    }

    #[tokio::test]
    async fn test_create_with_invalid_json() {
        let (server, store) = app().await;
        let reply = call(&server, "POST", "/api/v1/users", Some(r#"{"name":"Bob","#)).await;

        assert_eq!(reply.status, 400);
        assert_eq!(reply.body, json!({"status": "error", "message": "Invalid JSON payload"}));
        assert_eq!(store.lock().await.len(), 2);
        assert_eq!(store.lock().await.next_id(), 3);
    }

    #[tokio::test]
    async fn test_create_with_wrong_content_type() {
        let (server, _) = app().await;
        let body = r#"{"name":"Bob"}"#;
        let raw = format!(
            "POST /api/v1/users HTTP/1.1\r\nHost: localhost\r\n\
             Content-Type: text/plain\r\nContent-Length: {len}\r\n\r\n{body}",
            len = body.len()
        );

        let reply = send_raw(&server, raw.as_bytes()).await;
        assert_eq!(reply.status, 400);
        assert_eq!(reply.body["message"], "Invalid JSON payload");
    }

    #[tokio::test]
    async fn test_create_without_content_type() {
        let (server, _) = app().await;
        let body = r#"{"name":"Bob","email":"bob@example.com"}"#;
        let raw = format!(
            "POST /api/v1/users HTTP/1.1\r\nHost: localhost\r\nContent-Length: {len}\r\n\r\n{body}",
            len = body.len()
        );

        let reply = send_raw(&server, raw.as_bytes()).await;
        assert_eq!(reply.status, 201);
        assert_eq!(reply.body["data"]["name"], "Bob");
    }

    #[tokio::test]
    async fn test_update_user() {
        let (server, store) = app().await;
        let reply = call(
            &server,
            "PUT",
            "/api/v1/users/2",
            Some(r#"{"id":7,"name":"Jane X","email":"jx@example.com"}"#),
        )
        .await;

        assert_eq!(reply.status, 200);
        assert_eq!(reply.body["message"], "User updated successfully");
        assert_eq!(
            reply.body["data"],
            json!({"id": 2, "name": "Jane X", "email": "jx@example.com"})
        );

        let store = store.lock().await;
        assert_eq!(store.get(2).unwrap().name, "Jane X");
        assert_eq!(store.get(7), Err(StoreError::NotFound(7)));
    }

    #[tokio::test]
    async fn test_update_missing_user() {
        let (server, _) = app().await;
        let reply = call(&server, "PUT", "/api/v1/users/999", Some(r#"{"name":"X"}"#)).await;

        assert_eq!(reply.status, 404);
        assert_eq!(reply.body["message"], "User not found");
    }

    #[tokio::test]
    async fn test_update_with_invalid_json() {
        let (server, store) = app().await;
        let reply = call(&server, "PUT", "/api/v1/users/1", Some("[1, 2")).await;

        assert_eq!(reply.status, 400);
        assert_eq!(reply.body["message"], "Invalid JSON payload");
        assert_eq!(store.lock().await.get(1).unwrap().name, "John Doe");
    }

    #[tokio::test]
    async fn test_delete_user() {
        let (server, _) = app().await;
        let reply = call(&server, "DELETE", "/api/v1/users/1", None).await;

        assert_eq!(reply.status, 200);
        assert_eq!(
            reply.body,
            json!({"status": "success", "message": "User deleted successfully"})
        );

        let reply = call(&server, "GET", "/api/v1/users/1", None).await;
        assert_eq!(reply.status, 404);

        let reply = call(&server, "DELETE", "/api/v1/users/1", None).await;
        assert_eq!(reply.status, 404);
    }

    #[tokio::test]
    async fn test_seeded_scenario() {
        let (server, _) = app().await;

        let reply = call(
            &server,
            "POST",
            "/api/v1/users",
            Some(r#"{"name":"Bob","email":"bob@example.com"}"#),
        )
        .await;
        assert_eq!(reply.body["data"]["id"], 3);
        assert_eq!(ids(&call(&server, "GET", "/api/v1/users", None).await), vec![1, 2, 3]);

        assert_eq!(call(&server, "DELETE", "/api/v1/users/1", None).await.status, 200);
        assert_eq!(call(&server, "GET", "/api/v1/users/1", None).await.status, 404);
        assert_eq!(ids(&call(&server, "GET", "/api/v1/users", None).await), vec![2, 3]);

        let reply = call(
            &server,
            "PUT",
            "/api/v1/users/2",
            Some(r#"{"name":"Jane X","email":"jx@example.com"}"#),
        )
        .await;
        assert_eq!(
            reply.body["data"],
            json!({"id": 2, "name": "Jane X", "email": "jx@example.com"})
        );
    }

    #[tokio::test]
    async fn test_unsupported_method() {
        let (server, _) = app().await;
        let reply = call(&server, "PATCH", "/api/v1/users/1", None).await;

        assert_eq!(reply.status, 405);
        assert!(reply.headers.contains("Allow: GET, PUT, DELETE"));
    }

    #[tokio::test]
    async fn test_unknown_path() {
        let (server, _) = app().await;
        let reply = call(&server, "GET", "/api/v2/users", None).await;
        assert_eq!(reply.status, 404);
        assert_eq!(reply.body, Value::Null);
    }

    #[test]
    fn test_envelope_serialization() {
        let done = serde_json::to_value(Envelope::<()>::done("ok")).unwrap();
        assert_eq!(done, json!({"status": "success", "message": "ok"}));

        let with_data = serde_json::to_value(Envelope::success("ok", vec![1, 2])).unwrap();
        assert_eq!(with_data, json!({"status": "success", "message": "ok", "data": [1, 2]}));

        let parsed: Envelope<Value> =
            serde_json::from_str(r#"{"status":"error","message":"nope"}"#).unwrap();
        assert_eq!(parsed.status, Status::Error);
        assert!(parsed.data.is_none());
    }

    #[test]
    fn test_api_error_status_codes() {
        assert_eq!(ApiError::from(StoreError::NotFound(1)).status_code(), StatusCode::NotFound);
        assert_eq!(ApiError::InvalidId("x".to_string()).status_code(), StatusCode::BadRequest);
        assert_eq!(
            ApiError::from(ParserError::MissingHost).status_code(),
            StatusCode::BadRequest
        );
        assert_eq!(
            ApiError::from(ServerError::InternalError("x".to_string())).status_code(),
            StatusCode::InternalServerError
        );
    }

    #[test]
    fn test_internal_error_envelope() {
        let response = ApiError::from(ServerError::InternalError("disk on fire".to_string()))
            .into_response()
            .unwrap();

        assert_eq!(response.status, StatusCode::InternalServerError);
        let body: Value = serde_json::from_slice(&response.body).unwrap();
        assert_eq!(body, json!({"status": "error", "message": "Internal server error"}));
    }
}
