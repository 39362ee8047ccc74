use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use crate::constants::{DEFAULT_ISSUER, claim_types, claim_value_types};

/// Errors raised while constructing claims.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClaimError {
    /// The claim type is reserved and cannot be synthesized from a token.
    #[error("{claim_type} is not supported")]
    UnsupportedClaimType { claim_type: String },
}

/// A single fact asserted about an identity.
///
/// Immutable once constructed: the only way to obtain a `Claim` is through
/// [`Claim::new`] (or its shorthands), which rejects the actor claim type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Claim {
    #[serde(rename = "type")]
    claim_type: String,
    value: String,
    value_type: String,
    issuer: String,
    original_issuer: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    properties: BTreeMap<String, String>,
}

impl Claim {
    /// Create a claim with explicit value type and issuers.
    ///
    /// # Errors
    ///
    /// Returns [`ClaimError::UnsupportedClaimType`] when `claim_type` is the
    /// actor claim type.
    pub fn new(
        claim_type: impl Into<String>,
        value: impl Into<String>,
        value_type: impl Into<String>,
        issuer: impl Into<String>,
        original_issuer: impl Into<String>,
    ) -> Result<Self, ClaimError> {
        let claim_type = claim_type.into();
        if claim_type == claim_types::ACTOR {
            return Err(ClaimError::UnsupportedClaimType { claim_type });
        }

        Ok(Self {
            claim_type,
            value: value.into(),
            value_type: value_type.into(),
            issuer: issuer.into(),
            original_issuer: original_issuer.into(),
            properties: BTreeMap::new(),
        })
    }

    /// String-valued claim issued by [`DEFAULT_ISSUER`].
    ///
    /// # Errors
    ///
    /// Same as [`Claim::new`].
    pub fn local(
        claim_type: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self, ClaimError> {
        Self::new(
            claim_type,
            value,
            claim_value_types::STRING,
            DEFAULT_ISSUER,
            DEFAULT_ISSUER,
        )
    }

    /// Attach an auxiliary property (e.g. the short claim name before mapping).
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn claim_type(&self) -> &str {
        &self.claim_type
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    #[must_use]
    pub fn value_type(&self) -> &str {
        &self.value_type
    }

    #[must_use]
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    #[must_use]
    pub fn original_issuer(&self) -> &str {
        &self.original_issuer
    }

    #[must_use]
    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    #[must_use]
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }
}
