//! Claims model shared by the fake JWT bearer scheme and its consumers.
//!
//! - [`Claim`] - one `(type, value, issuer, original issuer)` fact
//! - [`ClaimsIdentity`] - ordered claims plus name/role claim-type designations
//! - [`constants`] - well-known claim-type and value-type URIs
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod claim;
pub mod constants;
pub mod identity;

pub use claim::{Claim, ClaimError};
pub use identity::{ClaimsIdentity, ClaimsIdentityBuilder};
