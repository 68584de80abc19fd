//! HTTP layer: axum handlers, routers, extractors, and error mapping.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod query;
pub mod response;
pub mod routes;
pub mod state;
