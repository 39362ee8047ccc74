//! Fake JWT bearer authentication scheme
//!
//! Accepts `Authorization: FakeBearer <token>` where the token is a plain
//! claim set (JSON, base64 JSON, or an unverified JWT) and turns it into a
//! [`fake_jwt_security::ClaimsIdentity`] without any signature or lifetime
//! checks. Meant for integration tests and local development only.
//!
//! - [`FakeJwtBearerHandler`] - the authentication pipeline
//! - [`FakeJwtBearerConfig`] - scheme options
//! - [`axum_ext`] - tower layer and extractors
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod axum_ext;
pub mod config;
pub mod domain;

pub use axum_ext::{AuthScheme, Authenticated, FakeJwtBearerLayer, forbidden_response};
pub use config::{BearerValueType, ClaimsHandlerOptions, FakeJwtBearerConfig};
pub use domain::{FakeJwtBearerClaimsHandler, FakeJwtBearerHandler, SecurityTokenClaimsHandler};
