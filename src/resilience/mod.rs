//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to feed host:
//!     → timeouts.rs (pick deadline from the target URL, race the fetch)
//!     → On timeout: in-flight fetch dropped, caller answers 504
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every outbound fetch has a deadline
//! - No retries: every failure is terminal for the request, callers retry

pub mod timeouts;

pub use timeouts::{with_deadline, DeadlineExceeded, TimeoutPolicy};
