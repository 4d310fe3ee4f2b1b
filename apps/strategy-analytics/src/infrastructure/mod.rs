//! Infrastructure Layer
//!
//! Driver adapters exposing the analytics engine to the outside world:
//!
//! - `http/`: REST API controllers (axum)

pub mod http;
