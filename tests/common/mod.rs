//! Shared utilities for integration testing.
#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use feed_proxy::config::ProxyConfig;
use feed_proxy::forwarder::{Allowlist, FeedFetcher, Forwarder};
use feed_proxy::lifecycle::Shutdown;
use feed_proxy::resilience::TimeoutPolicy;
use feed_proxy::HttpServer;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Canned response for the mock feed host.
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub headers: Vec<(&'static str, String)>,
    pub body: String,
    pub delay: Duration,
    pub body_delay: Duration,
    pub declared_len: Option<usize>,
}

impl MockResponse {
    pub fn feed(body: &str) -> Self {
        Self {
            status: 200,
            headers: vec![("Content-Type", "application/rss+xml; charset=utf-8".into())],
            body: body.to_string(),
            delay: Duration::ZERO,
            body_delay: Duration::ZERO,
            declared_len: None,
        }
    }

    pub fn status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    pub fn without_headers(mut self) -> Self {
        self.headers.clear();
        self
    }

    pub fn header(mut self, name: &'static str, value: &str) -> Self {
        self.headers.push((name, value.to_string()));
        self
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Advertise `len` bytes in Content-Length regardless of the real body.
    pub fn declared_len(mut self, len: usize) -> Self {
        self.declared_len = Some(len);
        self
    }

    /// Send the head immediately and hold the body back for `delay`.
    pub fn slow_body(mut self, delay: Duration) -> Self {
        self.body_delay = delay;
        self
    }
}

/// Raw request heads received by a mock feed host.
pub type RequestLog = Arc<Mutex<Vec<String>>>;

/// Start a programmable feed host on an ephemeral port.
///
/// The closure receives the request path and decides the response.
pub async fn start_feed_backend<F, Fut>(f: F) -> (SocketAddr, RequestLog)
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = MockResponse> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let log: RequestLog = Arc::default();
    let f = Arc::new(f);

    let requests = log.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    let requests = requests.clone();
                    tokio::spawn(async move {
                        let head = read_request_head(&mut socket).await;
                        let path = head
                            .split_whitespace()
                            .nth(1)
                            .unwrap_or("/")
                            .to_string();
                        requests.lock().unwrap().push(head);

                        let response = f(path).await;
                        tokio::time::sleep(response.delay).await;

                        let mut preamble = format!("HTTP/1.1 {} Mock\r\n", response.status);
                        for (name, value) in &response.headers {
                            preamble.push_str(&format!("{}: {}\r\n", name, value));
                        }
                        preamble.push_str(&format!(
                            "Content-Length: {}\r\nConnection: close\r\n\r\n",
                            response.declared_len.unwrap_or(response.body.len())
                        ));
                        let _ = socket.write_all(preamble.as_bytes()).await;
                        let _ = socket.flush().await;

                        tokio::time::sleep(response.body_delay).await;
                        let _ = socket.write_all(response.body.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, log)
}

/// Start a feed host that always answers with `response`.
pub async fn start_static_backend(response: MockResponse) -> (SocketAddr, RequestLog) {
    start_feed_backend(move |_| {
        let response = response.clone();
        async move { response }
    })
    .await
}

async fn read_request_head(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// A port on localhost with nothing listening.
pub async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}

/// A fetcher whose client resolves `hosts` to `127.0.0.1`.
pub fn local_fetcher(hosts: &[&str]) -> FeedFetcher {
    let loopback: SocketAddr = "127.0.0.1:0".parse().unwrap();
    let mut builder = FeedFetcher::client_builder().no_proxy();
    for host in hosts {
        builder = builder.resolve(host, loopback);
    }
    FeedFetcher::with_client(builder.build().unwrap())
}

/// Forwarder with the builtin allowlist whose allowlisted `hosts` resolve to localhost.
pub fn local_forwarder(hosts: &[&str], timeouts: TimeoutPolicy) -> Forwarder {
    Forwarder::new(Allowlist::builtin(), timeouts, local_fetcher(hosts))
}

/// A running proxy instance.
pub struct TestProxy {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub client: reqwest::Client,
}

impl TestProxy {
    /// Serve `forwarder` on an ephemeral port.
    pub async fn start(forwarder: Forwarder) -> Self {
        let server = HttpServer::with_forwarder(ProxyConfig::default(), forwarder);
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let shutdown = Shutdown::new();
        let server_shutdown = shutdown.subscribe();
        tokio::spawn(async move {
            let _ = server.run(listener, server_shutdown).await;
        });

        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(0)
            .no_proxy()
            .build()
            .unwrap();

        Self {
            addr,
            shutdown,
            client,
        }
    }

    pub fn endpoint(&self) -> String {
        format!("http://{}/api/rss-proxy", self.addr)
    }

    /// GET the proxy endpoint with `url` as the target feed.
    pub async fn get_feed(&self, url: &str) -> reqwest::Response {
        self.client
            .get(self.endpoint())
            .query(&[("url", url)])
            .send()
            .await
            .expect("Proxy unreachable")
    }
}

impl Drop for TestProxy {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}
