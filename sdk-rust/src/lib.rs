pub mod api;
mod client;
mod client_utils;
mod credential;
mod errors;
mod opentelemetry;
mod portal_backend;
pub mod portal_sdk_test;
mod types;

pub use client::{PortalClient, PortalClientOptions, BASE_URL_ENV, DEFAULT_BASE_URL};
pub use credential::Credential;
pub use errors::*;
pub use portal_backend::PortalBackend;
pub use reqwest::StatusCode;
pub use types::*;
