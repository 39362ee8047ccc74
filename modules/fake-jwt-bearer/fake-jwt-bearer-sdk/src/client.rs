//! Helpers that put fake tokens on outgoing requests.
//!
//! The JSON produced here is the wire contract of the `json` bearer value
//! type: `{"sub":..,"unique_name":..,"role":[..],..extra}`.

use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use http::header::{AUTHORIZATION, HeaderValue, InvalidHeaderValue};
use serde_json::{Map, Value};
use time::{Duration, OffsetDateTime};

use crate::FAKE_BEARER_SCHEME;

const SUB: &str = "sub";
const UNIQUE_NAME: &str = "unique_name";
const ROLE: &str = "role";

/// Lifetime stamped on unsigned JWTs.
const JWT_LIFETIME_DAYS: i64 = 7;

/// A set of claims serialized into a fake token.
///
/// Keys keep insertion order, so the serialized JSON is stable byte-for-byte.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FakeToken {
    claims: Map<String, Value>,
}

impl FakeToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_claims(claims: Map<String, Value>) -> Self {
        Self { claims }
    }

    /// `{"sub": username, "unique_name": username}`
    #[must_use]
    pub fn user(username: &str) -> Self {
        Self::new()
            .claim(SUB, username)
            .claim(UNIQUE_NAME, username)
    }

    /// `{"sub": username, "unique_name": username, "role": [roles..]}`
    #[must_use]
    pub fn user_with_roles(username: &str, roles: &[&str]) -> Self {
        Self::user(username).claim(ROLE, roles.to_vec())
    }

    /// Same as [`FakeToken::user_with_roles`] followed by `extra`.
    ///
    /// `sub`, `unique_name` and `role` from `extra` are overridden by the
    /// user name and roles.
    #[must_use]
    pub fn user_with_claims(username: &str, roles: &[&str], extra: Map<String, Value>) -> Self {
        let mut token = Self::user_with_roles(username, roles);
        for (key, value) in extra {
            if !token.claims.contains_key(&key) {
                token.claims.insert(key, value);
            }
        }
        token
    }

    #[must_use]
    pub fn claim(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.claims.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn claims(&self) -> &Map<String, Value> {
        &self.claims
    }

    /// Token for the `json` bearer value type.
    #[must_use]
    pub fn to_json(&self) -> String {
        Value::Object(self.claims.clone()).to_string()
    }

    /// Token for the `base64` bearer value type.
    #[must_use]
    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.to_json())
    }

    /// Unsigned (`alg: none`) JWT for the `jwt` bearer value type.
    ///
    /// `nbf` and `iat` default to now, `exp` to seven days from now.
    #[must_use]
    pub fn to_unsigned_jwt(&self) -> String {
        let now = OffsetDateTime::now_utc();
        let expires = now + Duration::days(JWT_LIFETIME_DAYS);

        let mut payload = self.claims.clone();
        payload
            .entry("nbf")
            .or_insert_with(|| now.unix_timestamp().into());
        payload
            .entry("exp")
            .or_insert_with(|| expires.unix_timestamp().into());
        payload
            .entry("iat")
            .or_insert_with(|| now.unix_timestamp().into());

        let header = serde_json::json!({ "alg": "none", "typ": "JWT" });
        format!(
            "{}.{}.",
            URL_SAFE_NO_PAD.encode(header.to_string()),
            URL_SAFE_NO_PAD.encode(Value::Object(payload).to_string())
        )
    }
}

/// Build an `Authorization` header value `<scheme> <token>`.
///
/// # Errors
///
/// Returns `InvalidHeaderValue` if the token contains characters not allowed
/// in a header.
pub fn authorization_header(scheme: &str, token: &str) -> Result<HeaderValue, InvalidHeaderValue> {
    HeaderValue::from_str(&format!("{scheme} {token}"))
}

/// Extension methods putting fake tokens on a request under construction.
///
/// All methods use the [`FAKE_BEARER_SCHEME`] keyword except
/// [`FakeBearerRequestExt::bearer_token`].
pub trait FakeBearerRequestExt: Sized {
    /// Set `Authorization: <scheme> <token>` verbatim.
    #[must_use]
    fn bearer_token(self, scheme: &str, token: &str) -> Self;

    /// Serialize an arbitrary JSON value as the token.
    #[must_use]
    fn fake_bearer_json(self, value: &Value) -> Self {
        self.bearer_token(FAKE_BEARER_SCHEME, &value.to_string())
    }

    #[must_use]
    fn fake_bearer_token(self, token: &FakeToken) -> Self {
        self.bearer_token(FAKE_BEARER_SCHEME, &token.to_json())
    }

    #[must_use]
    fn fake_bearer_user(self, username: &str) -> Self {
        self.fake_bearer_token(&FakeToken::user(username))
    }

    #[must_use]
    fn fake_bearer_user_with_roles(self, username: &str, roles: &[&str]) -> Self {
        self.fake_bearer_token(&FakeToken::user_with_roles(username, roles))
    }

    #[must_use]
    fn fake_bearer_user_with_claims(
        self,
        username: &str,
        roles: &[&str],
        extra: Map<String, Value>,
    ) -> Self {
        self.fake_bearer_token(&FakeToken::user_with_claims(username, roles, extra))
    }

    /// Send the claims as an unsigned JWT.
    #[must_use]
    fn fake_jwt_bearer_token(self, claims: Map<String, Value>) -> Self {
        self.bearer_token(
            FAKE_BEARER_SCHEME,
            &FakeToken::from_claims(claims).to_unsigned_jwt(),
        )
    }
}

impl FakeBearerRequestExt for http::request::Builder {
    fn bearer_token(self, scheme: &str, token: &str) -> Self {
        self.header(AUTHORIZATION, format!("{scheme} {token}"))
    }
}

/// Replaces any existing `Authorization` header. A token that is not a valid
/// header value leaves the map untouched.
impl FakeBearerRequestExt for http::HeaderMap {
    fn bearer_token(mut self, scheme: &str, token: &str) -> Self {
        if let Ok(value) = authorization_header(scheme, token) {
            self.insert(AUTHORIZATION, value);
        }
        self
    }
}
