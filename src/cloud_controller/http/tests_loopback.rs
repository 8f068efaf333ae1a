//! Tests driving [`HttpCloudController`] against a loopback HTTP server.
//!
//! The server answers one canned response per connection and records each
//! request line, so the tests see exactly which pages were fetched. Every
//! response closes its connection, which keeps the client from reusing one.

use rstest::{fixture, rstest};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::runtime::Runtime;

use super::HttpCloudController;
use crate::cloud_controller::{Application, ApplicationClient, Job, JobClient};
use crate::config::AppConfig;
use crate::error::ApiError;
use crate::warnings::Warned;

// =============================================================================
// Fixtures
// =============================================================================

#[fixture]
fn runtime() -> Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("runtime should build")
}

fn client_for(listener: &TcpListener) -> HttpCloudController {
    let address = listener.local_addr().expect("listener should have an address");
    let config = AppConfig {
        api_endpoint: Some(format!("http://{address}")),
        ..AppConfig::default()
    };
    HttpCloudController::new(&config).expect("client should build")
}

fn response(status: &str, warnings: Option<&str>, body: &str) -> String {
    let warnings_header = warnings
        .map(|value| format!("X-Cf-Warnings: {value}\r\n"))
        .unwrap_or_default();
    format!(
        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\n{warnings_header}Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    )
}

fn app_page(guid: &str, next_url: Option<&str>) -> String {
    let next = next_url.map_or_else(|| String::from("null"), |url| format!("\"{url}\""));
    format!(
        r#"{{"next_url":{next},"resources":[{{"metadata":{{"guid":"{guid}"}},"entity":{{"name":"{guid}","space_guid":"space-1"}}}}]}}"#
    )
}

/// Answers each connection with the next canned response and returns the
/// request lines in arrival order.
async fn serve(listener: TcpListener, responses: Vec<String>) -> Vec<String> {
    let mut request_lines = Vec::new();
    for canned in responses {
        let (mut stream, _) = listener.accept().await.expect("accept should succeed");
        let mut received = Vec::new();
        let mut chunk = [0_u8; 1024];
        while !received.windows(4).any(|window| window == b"\r\n\r\n") {
            let read = stream.read(&mut chunk).await.expect("read should succeed");
            if read == 0 {
                break;
            }
            received.extend_from_slice(chunk.get(..read).unwrap_or_default());
        }
        let request = String::from_utf8_lossy(&received);
        request_lines.push(request.lines().next().unwrap_or_default().to_owned());
        stream
            .write_all(canned.as_bytes())
            .await
            .expect("write should succeed");
        stream.shutdown().await.ok();
    }
    request_lines
}

fn guids(reply: &Warned<Result<Vec<Application>, ApiError>>) -> Vec<&str> {
    reply
        .value
        .as_ref()
        .map(|apps| apps.iter().map(|app| app.guid.as_str()).collect())
        .unwrap_or_default()
}

fn warnings_of<T>(reply: &Warned<T>) -> Vec<&str> {
    reply.warnings.iter().map(String::as_str).collect()
}

// =============================================================================
// Paging
// =============================================================================

#[rstest]
fn list_follows_next_url_and_keeps_every_page_warning(runtime: Runtime) {
    let (reply, request_lines) = runtime.block_on(async {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind should succeed");
        let client = client_for(&listener);
        let server = tokio::spawn(serve(
            listener,
            vec![
                response("200 OK", Some("w1"), &app_page("a", Some("/v2/apps?page=2"))),
                response("200 OK", Some("w+two"), &app_page("b", None)),
            ],
        ));

        let reply = client.get_applications(&[]).await;
        let lines = server.await.expect("server task should finish");
        (reply, lines)
    });

    assert_eq!(
        request_lines,
        ["GET /v2/apps HTTP/1.1", "GET /v2/apps?page=2 HTTP/1.1"]
    );
    assert_eq!(guids(&reply), ["a", "b"]);
    assert_eq!(warnings_of(&reply), ["w1", "w two"]);
}

#[rstest]
fn failing_page_keeps_warnings_from_earlier_pages(runtime: Runtime) {
    let reply = runtime.block_on(async {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind should succeed");
        let client = client_for(&listener);
        let server = tokio::spawn(serve(
            listener,
            vec![
                response("200 OK", Some("w1"), &app_page("a", Some("/v2/apps?page=2"))),
                response(
                    "500 Internal Server Error",
                    Some("w2"),
                    r#"{"code":10001,"error_code":"CF-ServerError","description":"boom"}"#,
                ),
            ],
        ));

        let reply = client.get_applications(&[]).await;
        server.await.expect("server task should finish");
        reply
    });

    assert!(matches!(
        reply.value,
        Err(ApiError::UnexpectedResponse { status: 500, .. })
    ));
    assert_eq!(warnings_of(&reply), ["w1", "w2"]);
}

// =============================================================================
// Error responses
// =============================================================================

#[rstest]
fn not_found_response_is_classified_and_keeps_its_warning(runtime: Runtime) {
    let reply: Warned<Result<Job, ApiError>> = runtime.block_on(async {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind should succeed");
        let client = client_for(&listener);
        let server = tokio::spawn(serve(
            listener,
            vec![response(
                "404 Not Found",
                Some("w3"),
                r#"{"code":10000,"error_code":"CF-NotFound","description":"Unknown request"}"#,
            )],
        ));

        let reply = client.get_job("job-1").await;
        server.await.expect("server task should finish");
        reply
    });

    assert!(matches!(reply.value, Err(ApiError::ResourceNotFound { .. })));
    assert_eq!(warnings_of(&reply), ["w3"]);
}
