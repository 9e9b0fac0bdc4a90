//! # Turnstile API
//!
//! Actix-web gateway translating HTTP requests into token lifecycle
//! operations.

pub mod app;
pub mod config;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;

pub use app::{create_app, AppState};
