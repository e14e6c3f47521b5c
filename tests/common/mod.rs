//! Minimal one-shot HTTP responder shared by the integration tests

#![allow(dead_code)]

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A captured HTTP request
pub struct CapturedRequest {
    pub head: String,
    pub body: String,
}

/// Accept one connection, capture the request, reply with `status_line` and no body
pub async fn respond_once(status_line: &str) -> (String, JoinHandle<CapturedRequest>) {
    respond_with(status_line, &[], "").await
}

/// Accept one connection, capture the request, reply with the given status, headers and body
pub async fn respond_with(
    status_line: &str,
    headers: &[(&str, &str)],
    body: &str,
) -> (String, JoinHandle<CapturedRequest>) {
    let mut response = format!("HTTP/1.1 {}\r\n", status_line);
    for (name, value) in headers {
        response.push_str(&format!("{}: {}\r\n", name, value));
    }
    response.push_str(&format!(
        "Content-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    ));

    // keep any system proxy away from the local responder
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];

        let header_end = loop {
            let n = stream.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed before headers were complete");
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
        let content_length = head
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);

        while buf.len() < header_end + content_length {
            let n = stream.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }
        let body = String::from_utf8_lossy(&buf[header_end..]).to_string();

        stream.write_all(response.as_bytes()).await.unwrap();
        stream.shutdown().await.ok();

        CapturedRequest { head, body }
    });

    (url, handle)
}

