//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, single endpoint)
//!     → request.rs (request ID, `url` extraction)
//!     → forwarder (validate, fetch)
//!     → response.rs (relay feed or error, CORS + cache headers)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{MakeRequestUuid, X_REQUEST_ID};
pub use server::HttpServer;
