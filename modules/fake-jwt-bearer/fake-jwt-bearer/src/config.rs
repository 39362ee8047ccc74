//! Configuration for the fake JWT bearer scheme.

use std::collections::BTreeSet;

use fake_jwt_bearer_sdk::FAKE_BEARER_SCHEME;
use fake_jwt_security::constants::{DEFAULT_ISSUER, claim_types};
use serde::{Deserialize, Serialize};

/// Scheme options.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct FakeJwtBearerConfig {
    /// Name the scheme is registered under.
    pub scheme: String,

    /// Keyword expected in front of the token in the `Authorization` header.
    pub authentication_header_type: String,

    /// Wire format of the token.
    pub bearer_value_type: BearerValueType,

    /// Store the raw token as `access_token` in the ticket properties.
    pub save_token: bool,

    /// Put `error` / `error_description` into the `WWW-Authenticate` header
    /// when a challenge follows a failed attempt.
    pub include_error_details: bool,

    /// Leading literal of the `WWW-Authenticate` header.
    pub challenge: String,

    /// Claim mapping options.
    pub claims: ClaimsHandlerOptions,
}

impl Default for FakeJwtBearerConfig {
    fn default() -> Self {
        Self {
            scheme: FAKE_BEARER_SCHEME.to_owned(),
            authentication_header_type: FAKE_BEARER_SCHEME.to_owned(),
            bearer_value_type: BearerValueType::Json,
            save_token: true,
            include_error_details: true,
            challenge: FAKE_BEARER_SCHEME.to_owned(),
            claims: ClaimsHandlerOptions::default(),
        }
    }
}

/// How the token after the header keyword is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BearerValueType {
    /// Plain JSON object text.
    #[default]
    Json,
    /// Standard base64 (with padding) of the JSON object text.
    Base64,
    /// Unsigned or signed JWT in compact serialization. Signatures are
    /// never verified.
    Jwt,
}

/// Options consumed by the claims mapper.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClaimsHandlerOptions {
    /// Ignore the token's `iss` and always use the configured issuers.
    pub override_issuer: bool,

    /// Issuer used when the token carries no `iss` (or it is overridden).
    pub issuer: String,

    /// Original issuer used alongside [`ClaimsHandlerOptions::issuer`].
    pub original_issuer: String,

    /// Translate short claim names (`sub`, `role`, ...) into canonical URIs.
    pub map_inbound_claims: bool,

    /// Claim type designating the identity's name.
    pub name_claim_type: String,

    /// Claim type designating the identity's roles.
    pub role_claim_type: String,

    /// Short claim names dropped entirely while mapping.
    pub inbound_claim_filter: BTreeSet<String>,
}

impl Default for ClaimsHandlerOptions {
    fn default() -> Self {
        Self {
            override_issuer: false,
            issuer: DEFAULT_ISSUER.to_owned(),
            original_issuer: DEFAULT_ISSUER.to_owned(),
            map_inbound_claims: true,
            name_claim_type: claim_types::NAME.to_owned(),
            role_claim_type: claim_types::ROLE.to_owned(),
            inbound_claim_filter: BTreeSet::new(),
        }
    }
}
