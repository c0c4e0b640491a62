//! # HTTP Server Module
//!
//! Axum server for the config change tracker API.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/changes` - Create and list config changes
//! - `/changes/list` - Filtered listing by type and time range
//! - `/changes/{id}` - Read, update and delete a single change

pub mod change_routes;
pub mod config;
pub mod errors;
pub mod health_routes;
pub mod server;

pub use change_routes::ChangeState;
pub use config::HttpServerConfig;
pub use errors::{ApiError, ApiResult, ErrorResponse};
pub use server::HttpServer;
