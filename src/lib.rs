//! CORS-friendly RSS/Atom feed proxy library.

pub mod config;
pub mod forwarder;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;

pub use config::schema::ProxyConfig;
pub use forwarder::{Allowlist, Forwarder};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
