//! config-change-tracker - records configuration-change events over HTTP
//!
//! - `model`: the `ConfigChange` record and payload validation
//! - `storage`: the `ChangeStore` contract and its in-memory implementation
//! - `http_server`: axum routes, errors and server bootstrap
//! - `observability`: tracing subscriber setup
//! - `cli`: command-line entry point

pub mod cli;
pub mod http_server;
pub mod model;
pub mod observability;
pub mod storage;
