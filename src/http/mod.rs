//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → auth gate (policy-driven bearer verification)
//!     → handlers.rs (list / get / create against the store)
//!     → error.rs (uniform {error} response mapping)
//! ```

pub mod error;
pub mod handlers;
pub mod server;

pub use error::ApiError;
pub use server::{AppState, HttpServer};
