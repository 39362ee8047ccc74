//! Error types for the fake JWT bearer scheme.

use fake_jwt_security::ClaimError;
use thiserror::Error;

/// Errors produced while authenticating a request.
///
/// The decode/mapping variants are raised by the pipeline itself. The
/// token-validation family (`InvalidAudience` .. `InvalidSignature`) is never
/// raised by the pipeline, since signatures and lifetimes are not checked, but
/// hooks may fail an attempt with them and the challenge then describes them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FakeJwtBearerError {
    /// Malformed JSON, bad base64 or a malformed signed-token structure.
    #[error("failed to decode token: {0}")]
    Decode(String),

    /// A claim value is neither a string nor an array of strings.
    #[error("unsupported value kind for claim '{claim}'")]
    UnsupportedValueKind { claim: String },

    /// The token tried to synthesize the actor claim.
    #[error("{claim_type} is not supported")]
    UnsupportedClaimType { claim_type: String },

    /// `iss` is present but not a string.
    #[error("the iss claim is not a string")]
    InvalidIssuerClaim,

    #[error("the audience '{}' is invalid", or_null(.audience))]
    InvalidAudience { audience: Option<String> },

    #[error("the issuer '{}' is invalid", or_null(.issuer))]
    InvalidIssuer { issuer: Option<String> },

    #[error("the token has no expiration")]
    NoExpiration,

    #[error(
        "the token lifetime is invalid; not before '{}', expires '{}'",
        or_null(.not_before),
        or_null(.expires)
    )]
    InvalidLifetime {
        not_before: Option<String>,
        expires: Option<String>,
    },

    #[error("the token is not valid before '{not_before}'")]
    NotYetValid { not_before: String },

    #[error("the token expired at '{expires}'")]
    Expired { expires: String },

    #[error("the signature key was not found")]
    SignatureKeyNotFound,

    #[error("the signature is invalid")]
    InvalidSignature,

    /// Several failures at once; challenge descriptions unwrap it.
    #[error("{} authentication failures", failure_count(.0))]
    Aggregate(Vec<FakeJwtBearerError>),

    /// Sign-in and sign-out are never supported by this scheme.
    #[error("{operation} is not supported by the fake JWT bearer scheme")]
    NotSupported { operation: String },

    #[error("{0}")]
    Other(String),
}

impl FakeJwtBearerError {
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    #[must_use]
    pub fn unsupported_value_kind(claim: impl Into<String>) -> Self {
        Self::UnsupportedValueKind {
            claim: claim.into(),
        }
    }

    #[must_use]
    pub fn not_supported(operation: impl Into<String>) -> Self {
        Self::NotSupported {
            operation: operation.into(),
        }
    }
}

impl From<ClaimError> for FakeJwtBearerError {
    fn from(e: ClaimError) -> Self {
        match e {
            ClaimError::UnsupportedClaimType { claim_type } => {
                Self::UnsupportedClaimType { claim_type }
            }
        }
    }
}

#[allow(clippy::ref_option)]
fn or_null(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("(null)")
}

fn failure_count(errors: &[FakeJwtBearerError]) -> usize {
    errors.len()
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn claim_error_converts_to_unsupported_claim_type() {
        let err: FakeJwtBearerError = ClaimError::UnsupportedClaimType {
            claim_type: "actor".to_owned(),
        }
        .into();
        assert_eq!(
            err,
            FakeJwtBearerError::UnsupportedClaimType {
                claim_type: "actor".to_owned()
            }
        );
    }

    #[test]
    fn missing_values_render_as_null() {
        let err = FakeJwtBearerError::InvalidAudience { audience: None };
        assert_eq!(err.to_string(), "the audience '(null)' is invalid");
    }

    #[test]
    fn not_supported_names_the_operation() {
        let err = FakeJwtBearerError::not_supported("sign-in");
        assert_eq!(
            err.to_string(),
            "sign-in is not supported by the fake JWT bearer scheme"
        );
    }
}
