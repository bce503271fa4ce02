//! # Keep-Alive Stub
//!
//! Minimal HTTP responder so uptime monitors (and free hosting platforms
//! that sleep idle processes) can ping the bot. Every request gets the same
//! fixed answer; nothing is routed.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: true

use anyhow::Result;
use log::{debug, info, warn};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

const RESPONSE_BODY: &str = "Bot is alive!";

/// Bind the keep-alive listener on all interfaces and serve until the
/// process exits.
pub async fn keep_alive(port: u16) -> Result<()> {
    let listener = TcpListener::bind(("0.0.0.0", port)).await?;
    info!("💓 Keep-alive listening on port {port}");
    serve(listener).await
}

async fn serve(listener: TcpListener) -> Result<()> {
    loop {
        let (mut socket, peer) = match listener.accept().await {
            Ok(conn) => conn,
            Err(e) => {
                warn!("Keep-alive accept failed: {e}");
                continue;
            }
        };

        tokio::spawn(async move {
            // Drain whatever request arrives; the reply never varies.
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await;

            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{RESPONSE_BODY}",
                RESPONSE_BODY.len()
            );
            if let Err(e) = socket.write_all(response.as_bytes()).await {
                debug!("Keep-alive reply to {peer} failed: {e}");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpStream;

    #[tokio::test]
    async fn test_answers_any_request_with_alive_body() {
        let listener = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = serve(listener).await;
        });

        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(b"GET / HTTP/1.1\r\nHost: localhost\r\n\r\n")
            .await
            .unwrap();

        let mut response = Vec::new();
        stream.read_to_end(&mut response).await.unwrap();
        let response = String::from_utf8(response).unwrap();

        assert!(response.starts_with("HTTP/1.1 200 OK"));
        assert!(response.ends_with(RESPONSE_BODY));
    }
}
