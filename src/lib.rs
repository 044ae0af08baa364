//! Posts API gateway.
//!
//! A thin HTTP gateway in front of a hierarchical realtime-tree document
//! store: reads are public snapshots, writes require a verified bearer token
//! and sanitized content.
//!
//! ```text
//! Client ──▶ http (router, middleware) ──▶ auth (gate, verifier) ─┐
//!                                                                 ▼
//!              response mapping ◀── http::handlers ◀── store (resolver, client)
//! ```

// Core subsystems
pub mod auth;
pub mod config;
pub mod http;
pub mod model;
pub mod sanitize;
pub mod store;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
