//! Fake JWT bearer SDK
//!
//! This crate provides the public API of the fake JWT bearer scheme:
//!
//! - [`AuthenticationHandler`] - Handler trait consumed by hosts
//! - [`AuthenticateResult`] - Outcome of one authentication attempt
//! - [`FakeJwtBearerError`] - Error types
//! - [`JwtBearerEvents`] - Extension points invoked by the pipeline
//! - [`client`] - Helpers that put fake tokens on outgoing requests
//!
//! ## Usage
//!
//! ```ignore
//! use fake_jwt_bearer_sdk::client::FakeBearerRequestExt;
//!
//! let request = http::Request::builder()
//!     .uri("/api/weatherforecast")
//!     .fake_bearer_user_with_roles("Bob", &["admin"])
//!     .body(())?;
//! ```
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod api;
pub mod client;
pub mod error;
pub mod events;
pub mod models;

// Re-export main types at crate root
pub use api::AuthenticationHandler;
pub use error::FakeJwtBearerError;
pub use events::{
    AuthenticationFailedContext, ChallengeContext, DefaultEvents, ForbiddenContext,
    JwtBearerEvents, MessageReceivedContext, TokenValidatedContext,
};
pub use models::{
    ACCESS_TOKEN, AuthenticateResult, AuthenticationProperties, AuthenticationTicket,
    AuthenticationToken,
};

/// Default scheme name and `Authorization` header keyword.
///
/// Deliberately distinct from `Bearer` so a real bearer middleware in the
/// same pipeline never picks the fake tokens up.
pub const FAKE_BEARER_SCHEME: &str = "FakeBearer";
