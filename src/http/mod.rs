//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, routes)
//!     → request.rs (request ID, body parsing, required fields)
//!     → handlers.rs (Move chain endpoints) / entity.rs (EVM endpoints)
//!     → response.rs (status mapping, error bodies, metrics)
//!     → Send to client
//! ```

pub mod entity;
pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use response::ApiError;
pub use server::{build_router, AppState, HttpServer};
