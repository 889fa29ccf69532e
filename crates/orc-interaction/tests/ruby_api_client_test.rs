use orc_core::compiler::RemoteCompiler;
use orc_interaction::RubyApiClient;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Captured request: the request line and the raw body.
struct Captured {
    request_line: String,
    body: String,
}

/// Serves exactly one HTTP response on a random local port.
async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];

        let header_end = loop {
            let n = socket.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed before headers were complete");
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = find(&buf, b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let headers = String::from_utf8_lossy(&buf[..header_end]).to_string();
        let content_length = headers
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);

        while buf.len() < header_end + content_length {
            let n = socket.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed before body was complete");
            buf.extend_from_slice(&chunk[..n]);
        }

        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();

        Captured {
            request_line: headers.lines().next().unwrap_or_default().to_string(),
            body: String::from_utf8_lossy(&buf[header_end..header_end + content_length])
                .to_string(),
        }
    });

    (format!("http://{addr}"), handle)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn client(base_url: &str) -> RubyApiClient {
    let http = reqwest::Client::builder().no_proxy().build().unwrap();
    RubyApiClient::with_client(http, base_url)
}

#[tokio::test]
async fn test_compile_posts_code_and_task_id() {
    let (base, server) = serve_once(
        "200 OK",
        r#"{"task_id":"T1","compile_err":"","rbs":"ARTIFACT"}"#,
    )
    .await;

    let response = client(&base).compile("x = y.", Some("T0")).await.unwrap();

    assert_eq!(response.task_id, "T1");
    assert_eq!(response.rbs, "ARTIFACT");
    assert!(response.is_success());

    let captured = server.await.unwrap();
    assert_eq!(captured.request_line, "POST /ruby/compile HTTP/1.1");
    let sent: serde_json::Value = serde_json::from_str(&captured.body).unwrap();
    assert_eq!(sent, serde_json::json!({"code": "x = y.", "task_id": "T0"}));
}

#[tokio::test]
async fn test_compile_without_task_id_omits_field() {
    let (base, server) = serve_once(
        "200 OK",
        r#"{"task_id":"T1","compile_err":"ERR","rbs":""}"#,
    )
    .await;

    let response = client(&base).compile("bad", None).await.unwrap();
    assert!(!response.is_success());
    assert_eq!(response.compile_err, "ERR");

    let captured = server.await.unwrap();
    let sent: serde_json::Value = serde_json::from_str(&captured.body).unwrap();
    assert_eq!(sent, serde_json::json!({"code": "bad"}));
}

#[tokio::test]
async fn test_run_posts_task_and_input() {
    let (base, server) = serve_once(
        "200 OK",
        r#"{"output":"O","err":"","task_id":"T2"}"#,
    )
    .await;

    let response = client(&base).run("T1", "1 0 1").await.unwrap();
    assert_eq!(response.output, "O");
    assert_eq!(response.refreshed_task_id(), Some("T2"));

    let captured = server.await.unwrap();
    assert_eq!(captured.request_line, "POST /ruby/run HTTP/1.1");
    let sent: serde_json::Value = serde_json::from_str(&captured.body).unwrap();
    assert_eq!(sent, serde_json::json!({"task_id": "T1", "input": "1 0 1"}));
}

#[tokio::test]
async fn test_visualize_returns_graph_text() {
    let (base, server) = serve_once(
        "200 OK",
        r#"{"output":"digraph circuit {\n}\n"}"#,
    )
    .await;

    let response = client(&base).visualize("T1", "").await.unwrap();
    assert_eq!(response.output, "digraph circuit {\n}\n");

    let captured = server.await.unwrap();
    assert_eq!(captured.request_line, "POST /ruby/viz HTTP/1.1");
}

#[tokio::test]
async fn test_error_status_with_run_reply_is_returned() {
    let (base, server) = serve_once(
        "400 Bad Request",
        r#"{"output":"","err":"unknown task T9"}"#,
    )
    .await;

    let response = client(&base).run("T9", "").await.unwrap();
    assert_eq!(response.err, "unknown task T9");
    assert_eq!(response.output, "");

    server.await.unwrap();
}

#[tokio::test]
async fn test_error_status_with_compile_diagnostic_is_returned() {
    let (base, server) = serve_once(
        "422 Unprocessable Entity",
        r#"{"task_id":"T1","compile_err":"syntax error","rbs":""}"#,
    )
    .await;

    let response = client(&base).compile("bad", None).await.unwrap();
    assert!(!response.is_success());
    assert_eq!(response.task_id, "T1");
    assert_eq!(response.compile_err, "syntax error");

    server.await.unwrap();
}

#[tokio::test]
async fn test_error_status_without_reply_is_transport_error() {
    let (base, server) = serve_once("500 Internal Server Error", "upstream exploded").await;

    let err = client(&base).run("T1", "").await.unwrap_err();
    assert!(err.is_transport());
    assert!(err.to_string().contains("HTTP 500"));
    assert!(err.to_string().contains("upstream exploded"));

    server.await.unwrap();
}

#[tokio::test]
async fn test_unreachable_service_is_transport_error() {
    // Bind and drop to get a port nothing listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(&format!("http://{addr}"))
        .compile("x.", None)
        .await
        .unwrap_err();
    assert!(err.is_transport());
    assert!(err.to_string().contains("compile"));
}
