//! End-to-end tests of the stub server through its HTTP interface.

use std::net::SocketAddr;

use axum::http::{Method, StatusCode};
use axum::routing::get;
use axum::Router;
use axum_test::TestServer;
use serde_json::{json, Value};

use http_stub_rs::http::{build_router, AppState};

fn stub_server() -> TestServer {
    let state = AppState::builder().build().expect("valid configuration");
    TestServer::new(build_router(state)).expect("test server")
}

fn sample_content() -> Value {
    json!({"key1": "value1", "key2": "value2", "key3": {"subkey1": "subvalue1"}})
}

async fn configure_content(server: &TestServer, options: Value) {
    server.post("/configure_content").json(&options).await.assert_status(StatusCode::CREATED);
}

async fn configure_content_sample(server: &TestServer) {
    configure_content(
        server,
        json!({"path": "/something", "content": sample_content(), "type": "json"}),
    )
    .await;
}

async fn configure_content_post_sample(server: &TestServer) {
    configure_content(
        server,
        json!({"path": "/something", "content": sample_content(), "type": "json", "method": "POST"}),
    )
    .await;
}

/// Start a remote file server answering `/file.xml` with the given status.
async fn spawn_file_server(status: u16) -> SocketAddr {
    let status = StatusCode::from_u16(status).expect("valid status");
    let app = Router::new().route(
        "/file.xml",
        get(move || async move {
            (status, [("content-type", "application/xml")], "<xml><my-data></my-data></xml>")
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind file server");
    let addr = listener.local_addr().expect("local address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("file server");
    });
    addr
}

mod simple {
    use super::*;

    /// Test an unconfigured route answers 418.
    #[tokio::test]
    async fn test_unconfigured_route() {
        let server = stub_server();
        let response = server.get("/something").await;
        response.assert_status(StatusCode::IM_A_TEAPOT);
        assert!(response.text().contains("The requested service does not exist"));
    }

    /// Test the status endpoint.
    #[tokio::test]
    async fn test_status() {
        let server = stub_server();
        let response = server.get("/status").await;
        response.assert_status_ok();
        response.assert_text("");
    }

    /// Test bad configure arguments.
    #[tokio::test]
    async fn test_configure_bad_arguments() {
        let server = stub_server();
        server.post("/configure").json(&json!({"hello": "world"})).await.assert_status_bad_request();
        server
            .post("/configure_content")
            .json(&json!({"hello": "world"}))
            .await
            .assert_status_bad_request();

        // Nothing was registered
        server
            .get("/routes/undefined/methods/get/stats/count")
            .await
            .assert_status(StatusCode::IM_A_TEAPOT);
    }

    /// Test a proxied file keeps the remote status by default.
    #[tokio::test]
    async fn test_file_with_remote_status() {
        let remote = spawn_file_server(215).await;
        let server = stub_server();

        let response = server
            .post("/configure")
            .json(&json!({"path": "/something", "file": format!("http://{remote}/file.xml")}))
            .await;
        response.assert_status(StatusCode::CREATED);
        response.assert_text("Configured");

        let response = server.get("/something").await;
        assert_eq!(response.status_code().as_u16(), 215);
        response.assert_text("<xml><my-data></my-data></xml>");
        assert_eq!(response.header("content-type"), "application/xml");
    }

    /// Test a proxied file with a configured status.
    #[tokio::test]
    async fn test_file_with_configured_status() {
        let remote = spawn_file_server(205).await;
        let server = stub_server();

        server
            .post("/configure")
            .json(&json!({
                "path": "/something",
                "file": format!("http://{remote}/file.xml"),
                "code": 223
            }))
            .await
            .assert_status(StatusCode::CREATED);

        let response = server.get("/something").await;
        assert_eq!(response.status_code().as_u16(), 223);
        response.assert_text("<xml><my-data></my-data></xml>");
    }

    /// Test query parameters must match a file stub.
    #[tokio::test]
    async fn test_file_query_params_mismatch() {
        let server = stub_server();
        server
            .post("/configure")
            .json(&json!({"path": "/something", "file": "http://127.0.0.1:1/file.xml"}))
            .await
            .assert_status(StatusCode::CREATED);

        server
            .get("/something")
            .add_query_param("param", "true")
            .await
            .assert_status(StatusCode::IM_A_TEAPOT);
    }

    /// Test skipQueryParams on a file stub.
    #[tokio::test]
    async fn test_file_skip_query_params() {
        let remote = spawn_file_server(215).await;
        let server = stub_server();

        server
            .post("/configure")
            .json(&json!({
                "path": "/something",
                "file": format!("http://{remote}/file.xml"),
                "skipQueryParams": true
            }))
            .await
            .assert_status(StatusCode::CREATED);

        let response = server.get("/something").add_query_param("param", "true").await;
        assert_eq!(response.status_code().as_u16(), 215);
        response.assert_text("<xml><my-data></my-data></xml>");
    }

    /// Test an unreachable remote file is a gateway error, not 418.
    #[tokio::test]
    async fn test_file_unreachable() {
        let server = stub_server();
        server
            .post("/configure")
            .json(&json!({"path": "/something", "file": "http://127.0.0.1:1/file.xml"}))
            .await
            .assert_status(StatusCode::CREATED);

        server.get("/something").await.assert_status(StatusCode::BAD_GATEWAY);
    }

    /// Test JSON content is served with 200 by default.
    #[tokio::test]
    async fn test_json_content() {
        let server = stub_server();
        configure_content_sample(&server).await;

        let response = server.get("/something").await;
        response.assert_status_ok();
        response.assert_json(&sample_content());
    }

    /// Test JSON content with a configured status.
    #[tokio::test]
    async fn test_json_content_with_status() {
        let server = stub_server();
        configure_content(
            &server,
            json!({"path": "/something", "content": sample_content(), "type": "json", "code": 234}),
        )
        .await;

        let response = server.get("/something").await;
        assert_eq!(response.status_code().as_u16(), 234);
        response.assert_json(&sample_content());
    }

    /// Test the request method must match.
    #[tokio::test]
    async fn test_method_mismatch() {
        let server = stub_server();
        let json_body = json!({"json": {"my": "data"}});
        configure_content(
            &server,
            json!({
                "path": "/some-other-thing",
                "method": "POST",
                "body": json_body,
                "bodyType": "json",
                "content": sample_content(),
                "type": "json"
            }),
        )
        .await;

        server.get("/some-other-thing").json(&json_body).await.assert_status(StatusCode::IM_A_TEAPOT);
    }

    /// Test other verbs on a configured route.
    #[tokio::test]
    async fn test_other_method() {
        let server = stub_server();
        configure_content(&server, json!({"path": "/configure", "method": "put", "content": "ok"})).await;

        let response = server.method(Method::PUT, "/configure").await;
        response.assert_status_ok();
        response.assert_text("ok");
    }

    /// Test query parameters must match a content stub.
    #[tokio::test]
    async fn test_content_query_params_mismatch() {
        let server = stub_server();
        configure_content_sample(&server).await;

        server
            .get("/something")
            .add_query_param("param", "true")
            .await
            .assert_status(StatusCode::IM_A_TEAPOT);
    }

    /// Test skipQueryParams on a content stub.
    #[tokio::test]
    async fn test_content_skip_query_params() {
        let server = stub_server();
        configure_content(
            &server,
            json!({"path": "/something", "content": sample_content(), "type": "json", "skipQueryParams": true}),
        )
        .await;

        let response = server.get("/something").add_query_param("param", "true").await;
        response.assert_status_ok();
        response.assert_json(&sample_content());
    }

    /// Test contents configured for the same route are returned alternately.
    #[tokio::test]
    async fn test_round_robin() {
        let server = stub_server();
        let first = json!({"order": "first", "number": 1});
        let second = json!({"order": "second", "number": 2});
        let third = json!({"order": "third", "number": 3});

        for content in [&first, &second, &third] {
            configure_content(&server, json!({"path": "/something", "content": content, "type": "json"}))
                .await;
        }

        for expected in [&first, &second, &third, &first, &second] {
            server.get("/something").await.assert_json(expected);
        }
    }

    /// Test file stubs take precedence over content stubs.
    #[tokio::test]
    async fn test_file_precedence() {
        let remote = spawn_file_server(200).await;
        let server = stub_server();
        configure_content_sample(&server).await;
        server
            .post("/configure")
            .json(&json!({"path": "/something", "file": format!("http://{remote}/file.xml")}))
            .await
            .assert_status(StatusCode::CREATED);

        server.get("/something").await.assert_text("<xml><my-data></my-data></xml>");
        server.get("/routes/something/methods/get/stats/count").await.assert_text("0");
    }
}

mod complex {
    use super::*;

    /// Test a 418 when the request body does not match.
    #[tokio::test]
    async fn test_body_mismatch() {
        let server = stub_server();
        configure_content(
            &server,
            json!({
                "path": "/something",
                "body": "<xml><my-data></my-data></xml>",
                "content": sample_content(),
                "type": "json"
            }),
        )
        .await;

        server
            .get("/something")
            .text("<xml><my-other-data></my-other-data></xml>")
            .await
            .assert_status(StatusCode::IM_A_TEAPOT);
    }

    /// Test a matching text body.
    #[tokio::test]
    async fn test_text_body_match() {
        let server = stub_server();
        configure_content(
            &server,
            json!({
                "path": "/something",
                "body": "My expected data sent",
                "content": sample_content(),
                "type": "json"
            }),
        )
        .await;

        server.get("/something").text("My expected data sent").await.assert_status_ok();
    }

    /// Test XML bodies are compared structurally.
    #[tokio::test]
    async fn test_xml_body() {
        let server = stub_server();
        configure_content(
            &server,
            json!({
                "path": "/something",
                "body": "<xml><d/></xml>",
                "bodyType": "xml",
                "content": {"a": 1},
                "method": "POST"
            }),
        )
        .await;

        server
            .post("/something")
            .text("<xml><other/></xml>")
            .await
            .assert_status(StatusCode::IM_A_TEAPOT);

        let response = server.post("/something").text("<xml>\n  <d></d>\n</xml>").await;
        response.assert_status_ok();
        response.assert_json(&json!({"a": 1}));
    }

    /// Test JSON bodies are compared in serialized form.
    #[tokio::test]
    async fn test_json_body() {
        let server = stub_server();
        configure_content(
            &server,
            json!({
                "path": "/some-other-thing",
                "method": "POST",
                "body": {"json": {"my": "data"}},
                "bodyType": "json",
                "content": sample_content(),
                "type": "json"
            }),
        )
        .await;

        server
            .post("/some-other-thing")
            .json(&json!({"json": {"my": "data"}}))
            .await
            .assert_status_ok();
        server
            .post("/some-other-thing")
            .json(&json!({"json": {"my": "other"}}))
            .await
            .assert_status(StatusCode::IM_A_TEAPOT);
    }
}

mod stats {
    use super::*;

    /// Test a 418 when the stat route is not configured.
    #[tokio::test]
    async fn test_route_not_configured() {
        let server = stub_server();
        let response = server.get("/routes/unconfigured/methods/get/stats/count").await;
        response.assert_status(StatusCode::IM_A_TEAPOT);
        response.assert_text("Route /unconfigured not configured for method GET");
    }

    /// Test a 404 when the stat does not exist.
    #[tokio::test]
    async fn test_stat_not_found() {
        let server = stub_server();
        configure_content_sample(&server).await;

        let response = server.get("/routes/something/methods/get/stats/sheep").await;
        response.assert_status_not_found();
        assert!(response.text().contains("sheep"));
    }

    /// Test stats of a route that contains a `/methods/` segment.
    #[tokio::test]
    async fn test_route_containing_methods() {
        let server = stub_server();
        configure_content(&server, json!({"path": "/api/methods/list", "content": "listed"})).await;
        server.get("/api/methods/list").await.assert_text("listed");

        let response = server.get("/routes/api/methods/list/methods/get/stats/count").await;
        response.assert_status_ok();
        response.assert_text("1");
    }

    /// Test the count stat, zero included.
    #[tokio::test]
    async fn test_count() {
        let server = stub_server();
        configure_content_sample(&server).await;
        server.get("/routes/something/methods/get/stats/count").await.assert_text("0");

        for _ in 0..3 {
            server.get("/something").await.assert_status_ok();
        }

        let response = server.get("/routes/something/methods/get/stats/count").await;
        response.assert_status_ok();
        response.assert_text("3");
    }

    /// Test the scenario of a single JSON content stub.
    #[tokio::test]
    async fn test_configure_request_count() {
        let server = stub_server();
        configure_content(&server, json!({"path": "/something", "content": {"a": 1}, "type": "json"}))
            .await;

        server.get("/something").await.assert_json(&json!({"a": 1}));
        server.get("/routes/something/methods/get/stats/count").await.assert_text("1");
    }

    /// Test paths with slashes.
    #[tokio::test]
    async fn test_count_with_slashes() {
        let server = stub_server();
        configure_content(
            &server,
            json!({"path": "/something/with/slashes", "content": sample_content(), "type": "json"}),
        )
        .await;

        for _ in 0..3 {
            server.get("/something/with/slashes").await.assert_status_ok();
        }

        server
            .get("/routes/something/with/slashes/methods/get/stats/count")
            .await
            .assert_text("3");
    }

    /// Test the last request's body.
    #[tokio::test]
    async fn test_last_request() {
        let server = stub_server();
        configure_content_post_sample(&server).await;

        let body_sent = json!({"test": true});
        server.post("/something").json(&body_sent).await.assert_status_ok();

        let response = server.get("/routes/something/methods/post/stats/requests/last").await;
        response.assert_status_ok();
        response.assert_json(&json!({"requestBody": body_sent.to_string()}));
    }

    /// Test the n-th request's body.
    #[tokio::test]
    async fn test_nth_request() {
        let server = stub_server();
        configure_content_post_sample(&server).await;

        for flag in [true, false, true] {
            server.post("/something").json(&json!({"test": flag})).await.assert_status_ok();
        }

        server
            .get("/routes/something/methods/post/stats/requests/1")
            .await
            .assert_json(&json!({"requestBody": json!({"test": true}).to_string()}));
        server
            .get("/routes/something/methods/post/stats/requests/2")
            .await
            .assert_json(&json!({"requestBody": json!({"test": false}).to_string()}));
        server
            .get("/routes/something/methods/post/stats/requests/last/requestBody")
            .await
            .assert_text(json!({"test": true}).to_string());
    }

    /// Test a route with several responses keeps one count.
    #[tokio::test]
    async fn test_count_with_several_responses() {
        let server = stub_server();
        configure_content_sample(&server).await;
        configure_content_sample(&server).await;

        for _ in 0..3 {
            server.get("/something").await.assert_status_ok();
        }

        server.get("/routes/something/methods/get/stats/count").await.assert_text("3");
    }

    /// Test the last request with several responses.
    #[tokio::test]
    async fn test_last_request_with_several_responses() {
        let server = stub_server();
        configure_content_post_sample(&server).await;
        configure_content_post_sample(&server).await;

        for flag in [true, false, true] {
            server.post("/something").json(&json!({"test": flag})).await.assert_status_ok();
        }

        server
            .get("/routes/something/methods/post/stats/requests/last")
            .await
            .assert_json(&json!({"requestBody": json!({"test": true}).to_string()}));
        server.get("/routes/something/methods/post/stats/count").await.assert_text("3");
    }

    /// Test non-GET stat paths are served as stubbed requests.
    #[tokio::test]
    async fn test_stat_path_other_method() {
        let server = stub_server();
        configure_content_sample(&server).await;

        server
            .post("/routes/something/methods/get/stats/count")
            .await
            .assert_status(StatusCode::IM_A_TEAPOT);
    }
}

mod isolation {
    use super::*;

    /// Test independent servers do not share stubs.
    #[tokio::test]
    async fn test_independent_servers() {
        let first = stub_server();
        let second = stub_server();
        configure_content_sample(&first).await;

        first.get("/something").await.assert_status_ok();
        second.get("/something").await.assert_status(StatusCode::IM_A_TEAPOT);
    }
}
