//! Fairplay HTTP API
//!
//! JSON over HTTP for the round lifecycle, game plays and offline
//! verification.

pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod server;

pub use server::{build_app, ApiServer};
