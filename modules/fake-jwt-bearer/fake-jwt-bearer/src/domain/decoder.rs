//! Decoding of the raw bearer value into claims.
//!
//! JSON and base64 tokens decode into a [`RawClaimSet`]: an ordered map from
//! claim name to either a single string or a list of strings. Any other JSON
//! value kind is kept as [`RawClaimValue::Unsupported`] and rejected by the
//! claims handler, after the `iss` check. JWT tokens are only checked for
//! structure here and handed on verbatim, since the permissive flattening
//! lives in the claims handler.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use fake_jwt_bearer_sdk::FakeJwtBearerError;
use serde_json::{Map, Value};

use crate::config::BearerValueType;
use crate::domain::jwt::UnverifiedJwt;

/// Value of one raw claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawClaimValue {
    Single(String),
    Multiple(Vec<String>),
    /// Any other JSON value, including arrays with a non-string element.
    Unsupported(Value),
}

impl RawClaimValue {
    /// Every string carried by the value, in order. Each becomes one claim.
    /// An unsupported value carries none.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        match self {
            Self::Single(value) => std::slice::from_ref(value).iter(),
            Self::Multiple(values) => values.iter(),
            Self::Unsupported(_) => std::slice::Iter::default(),
        }
        .map(String::as_str)
    }

    #[must_use]
    pub fn as_single(&self) -> Option<&str> {
        match self {
            Self::Single(value) => Some(value),
            Self::Multiple(_) | Self::Unsupported(_) => None,
        }
    }

    #[must_use]
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unsupported(_))
    }

    fn from_json(value: Value) -> Self {
        match value {
            Value::String(value) => Self::Single(value),
            Value::Array(items) if items.iter().all(Value::is_string) => Self::Multiple(
                items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::String(value) => Some(value),
                        _ => None,
                    })
                    .collect(),
            ),
            other => Self::Unsupported(other),
        }
    }
}

impl From<&str> for RawClaimValue {
    fn from(value: &str) -> Self {
        Self::Single(value.to_owned())
    }
}

impl From<Vec<&str>> for RawClaimValue {
    fn from(values: Vec<&str>) -> Self {
        Self::Multiple(values.into_iter().map(str::to_owned).collect())
    }
}

/// Claim names mapped to values, in the order the token asserted them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawClaimSet {
    entries: Vec<(String, RawClaimValue)>,
}

impl RawClaimSet {
    /// Build a claim set from a decoded JSON object, keeping member order.
    #[must_use]
    pub fn from_json_object(object: Map<String, Value>) -> Self {
        let entries = object
            .into_iter()
            .map(|(key, value)| (key, RawClaimValue::from_json(value)))
            .collect();
        Self { entries }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&RawClaimValue> {
        self.entries
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawClaimValue)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<RawClaimValue>> FromIterator<(K, V)> for RawClaimSet {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut set = Self::default();
        for (key, value) in iter {
            let key = key.into();
            let value = value.into();
            match set.entries.iter_mut().find(|(name, _)| *name == key) {
                Some(entry) => entry.1 = value,
                None => set.entries.push((key, value)),
            }
        }
        set
    }
}

/// Result of decoding a bearer value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedToken {
    /// Strict claim set from a JSON or base64 token.
    Claims(RawClaimSet),
    /// Structurally valid compact JWT, kept verbatim.
    SignedToken(String),
}

/// Decode `raw` according to the configured wire format.
///
/// # Errors
///
/// Returns `Decode` for malformed JSON, a non-object JSON value, bad base64
/// or a malformed JWT.
pub fn decode(raw: &str, value_type: BearerValueType) -> Result<DecodedToken, FakeJwtBearerError> {
    match value_type {
        BearerValueType::Json => parse_claim_set(raw).map(DecodedToken::Claims),
        BearerValueType::Base64 => {
            let bytes = STANDARD
                .decode(raw)
                .map_err(|e| FakeJwtBearerError::decode(format!("invalid base64: {e}")))?;
            let json = String::from_utf8(bytes)
                .map_err(|e| FakeJwtBearerError::decode(format!("invalid UTF-8: {e}")))?;
            parse_claim_set(&json).map(DecodedToken::Claims)
        }
        BearerValueType::Jwt => {
            UnverifiedJwt::parse(raw)?;
            Ok(DecodedToken::SignedToken(raw.to_owned()))
        }
    }
}

fn parse_claim_set(json: &str) -> Result<RawClaimSet, FakeJwtBearerError> {
    let object: Map<String, Value> =
        serde_json::from_str(json).map_err(|e| FakeJwtBearerError::decode(e.to_string()))?;
    Ok(RawClaimSet::from_json_object(object))
}
