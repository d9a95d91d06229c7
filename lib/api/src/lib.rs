//! REST client for the PharmaEC backend.
//!
//! This crate provides:
//! - The transport seam (`HttpTransport`) and its `reqwest` implementation
//! - `ApiClient`: bearer authentication with a single refresh-and-replay on 401
//! - Authentication endpoints (login, logout, current principal)
//! - Typed resource endpoints and paginated lists (`Page`, `ListQuery`)

pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod reqwest_transport;
pub mod resources;
pub mod transport;

pub use client::{API_PREFIX, ApiClient, LogoutHook, REFRESH_PATH, TokenPair};
pub use error::{ApiError, TransportError};
pub use reqwest_transport::ReqwestTransport;
pub use resources::{DEFAULT_PAGE_SIZE, ListQuery, Page, Resource};
pub use transport::{ApiRequest, ApiResponse, Body, HttpTransport, Method};
