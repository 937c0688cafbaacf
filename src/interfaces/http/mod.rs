//! HTTP REST API interfaces
//!
//! - `common`: response envelope, error-to-status mapping, validated JSON
//! - `modules`: handlers and DTOs per resource
//! - `router`: route table and middleware stack

pub mod common;
pub mod modules;
pub mod router;

pub use router::{create_api_router, AppState};
