//! genai-gateway: validates image and text generation requests, forwards
//! each to OpenAI with a single call and normalizes the result.

pub mod config;
pub mod dtos;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;

pub use startup::{build_router, AppState, Application};
