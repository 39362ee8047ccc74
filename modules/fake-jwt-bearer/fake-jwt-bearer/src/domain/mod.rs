//! Domain layer for the fake JWT bearer scheme.

pub mod challenge;
pub mod claim_type_map;
pub mod claims_handler;
pub mod decoder;
pub mod handler;
pub mod jwt;

pub use claims_handler::{FakeJwtBearerClaimsHandler, SecurityTokenClaimsHandler};
pub use decoder::{DecodedToken, RawClaimSet, RawClaimValue};
pub use handler::FakeJwtBearerHandler;
