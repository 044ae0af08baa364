//! Store access subsystem.
//!
//! # Data Flow
//! ```text
//! inbound request path
//!     → path.rs (canonical key under the store namespace)
//!     → client.rs (REST call against the tree database)
//!     → raw JSON snapshot / generated key
//! ```
//!
//! # Design Decisions
//! - Path resolution is pure; only the client performs I/O
//! - The store seam is a trait so handlers can be tested with doubles

pub mod client;
pub mod path;

pub use client::{DocumentStore, RtdbClient, StoreError};
pub use path::PathResolver;
