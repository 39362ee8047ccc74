//! Permissive reading of compact JWTs.
//!
//! Only the structure is checked: three dot-separated segments, the first two
//! base64url-encoded JSON objects. The signature segment is ignored and may be
//! empty, so `alg: none` tokens and tokens signed with any key are accepted
//! alike.

use base64::Engine as _;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use fake_jwt_bearer_sdk::FakeJwtBearerError;
use fake_jwt_security::constants::claim_value_types;
use serde_json::{Map, Value};

/// base64url that accepts segments with or without trailing padding.
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// A JWT whose header and payload have been decoded but not verified.
#[derive(Debug, Clone)]
pub struct UnverifiedJwt {
    header: Map<String, Value>,
    payload: Map<String, Value>,
}

impl UnverifiedJwt {
    /// # Errors
    ///
    /// Returns `Decode` when the token is not three segments, or when the
    /// header or payload is not base64url-encoded JSON object text.
    pub fn parse(token: &str) -> Result<Self, FakeJwtBearerError> {
        let segments: Vec<&str> = token.split('.').collect();
        let [header, payload, _signature] = segments.as_slice() else {
            return Err(FakeJwtBearerError::decode(format!(
                "a JWT has 3 segments, found {}",
                segments.len()
            )));
        };

        Ok(Self {
            header: decode_segment("header", header)?,
            payload: decode_segment("payload", payload)?,
        })
    }

    /// The `alg` header, if it is a string.
    #[must_use]
    pub fn algorithm(&self) -> Option<&str> {
        self.header.get("alg").and_then(Value::as_str)
    }

    /// The `iss` claim, stringified when it is not a JSON string.
    #[must_use]
    pub fn issuer(&self) -> Option<String> {
        match self.payload.get("iss")? {
            Value::Null => None,
            Value::String(issuer) => Some(issuer.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Flatten the payload into one claim per value.
    ///
    /// Arrays yield one claim per element. Numbers and booleans are rendered
    /// as text and tagged with their XML schema value type. Objects and nested
    /// arrays keep their JSON text.
    #[must_use]
    pub fn claims(&self) -> Vec<JwtClaim> {
        let mut claims = Vec::with_capacity(self.payload.len());
        for (name, value) in &self.payload {
            match value {
                Value::Array(items) => {
                    claims.extend(items.iter().map(|item| JwtClaim::from_json(name, item)));
                }
                _ => claims.push(JwtClaim::from_json(name, value)),
            }
        }
        claims
    }
}

/// One flattened payload entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JwtClaim {
    pub claim_type: String,
    pub value: String,
    pub value_type: &'static str,
}

impl JwtClaim {
    fn from_json(name: &str, value: &Value) -> Self {
        let (value, value_type) = match value {
            Value::Null => (String::new(), claim_value_types::JSON_NULL),
            Value::Bool(flag) => (flag.to_string(), claim_value_types::BOOLEAN),
            Value::Number(number) if number.is_f64() => {
                (number.to_string(), claim_value_types::DOUBLE)
            }
            Value::Number(number) => {
                let fits_i32 = number.as_i64().is_some_and(|n| i32::try_from(n).is_ok());
                let value_type = if fits_i32 {
                    claim_value_types::INTEGER
                } else {
                    claim_value_types::INTEGER64
                };
                (number.to_string(), value_type)
            }
            Value::String(text) => (text.clone(), claim_value_types::STRING),
            Value::Array(_) => (value.to_string(), claim_value_types::JSON_ARRAY),
            Value::Object(_) => (value.to_string(), claim_value_types::JSON),
        };

        Self {
            claim_type: name.to_owned(),
            value,
            value_type,
        }
    }
}

fn decode_segment(name: &str, segment: &str) -> Result<Map<String, Value>, FakeJwtBearerError> {
    let bytes = URL_SAFE_LENIENT
        .decode(segment)
        .map_err(|e| FakeJwtBearerError::decode(format!("invalid JWT {name} encoding: {e}")))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| FakeJwtBearerError::decode(format!("invalid JWT {name}: {e}")))
}
