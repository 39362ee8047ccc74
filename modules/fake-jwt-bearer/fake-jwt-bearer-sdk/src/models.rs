//! Domain models for the fake JWT bearer scheme.

use std::collections::BTreeMap;

use fake_jwt_security::ClaimsIdentity;
use secrecy::SecretString;

use crate::error::FakeJwtBearerError;

/// Name under which the raw token is stored when `save_token` is enabled.
pub const ACCESS_TOKEN: &str = "access_token";

/// A named token kept alongside an authentication ticket.
///
/// The value is wrapped in `SecretString` so `Debug` redacts it.
#[derive(Debug, Clone)]
pub struct AuthenticationToken {
    pub name: String,
    pub value: SecretString,
}

impl AuthenticationToken {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: SecretString::from(value.into()),
        }
    }
}

/// Free-form state attached to an authentication ticket or challenge.
#[derive(Debug, Clone, Default)]
pub struct AuthenticationProperties {
    items: BTreeMap<String, String>,
    tokens: Vec<AuthenticationToken>,
}

impl AuthenticationProperties {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn item(&self, key: &str) -> Option<&str> {
        self.items.get(key).map(String::as_str)
    }

    pub fn set_item(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.items.insert(key.into(), value.into());
    }

    /// Replace the stored tokens.
    pub fn store_tokens(&mut self, tokens: impl IntoIterator<Item = AuthenticationToken>) {
        self.tokens = tokens.into_iter().collect();
    }

    #[must_use]
    pub fn tokens(&self) -> &[AuthenticationToken] {
        &self.tokens
    }

    #[must_use]
    pub fn token(&self, name: &str) -> Option<&SecretString> {
        self.tokens
            .iter()
            .find(|t| t.name == name)
            .map(|t| &t.value)
    }
}

/// The identity produced by a successful authentication, with its properties.
#[derive(Debug, Clone)]
pub struct AuthenticationTicket {
    principal: ClaimsIdentity,
    properties: AuthenticationProperties,
    scheme: String,
}

impl AuthenticationTicket {
    #[must_use]
    pub fn new(
        principal: ClaimsIdentity,
        properties: AuthenticationProperties,
        scheme: impl Into<String>,
    ) -> Self {
        Self {
            principal,
            properties,
            scheme: scheme.into(),
        }
    }

    #[must_use]
    pub fn principal(&self) -> &ClaimsIdentity {
        &self.principal
    }

    #[must_use]
    pub fn properties(&self) -> &AuthenticationProperties {
        &self.properties
    }

    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.scheme
    }
}

/// Outcome of one authentication attempt.
#[derive(Debug, Clone)]
pub enum AuthenticateResult {
    /// No token for this scheme; it has nothing to say about the request.
    NoResult,
    /// Authentication succeeded.
    Success(Box<AuthenticationTicket>),
    /// Authentication failed with the given cause.
    Fail(FakeJwtBearerError),
}

impl AuthenticateResult {
    #[must_use]
    pub fn success(ticket: AuthenticationTicket) -> Self {
        Self::Success(Box::new(ticket))
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    #[must_use]
    pub fn is_no_result(&self) -> bool {
        matches!(self, Self::NoResult)
    }

    #[must_use]
    pub fn ticket(&self) -> Option<&AuthenticationTicket> {
        match self {
            Self::Success(ticket) => Some(ticket),
            Self::NoResult | Self::Fail(_) => None,
        }
    }

    #[must_use]
    pub fn principal(&self) -> Option<&ClaimsIdentity> {
        self.ticket().map(AuthenticationTicket::principal)
    }

    #[must_use]
    pub fn failure(&self) -> Option<&FakeJwtBearerError> {
        match self {
            Self::Fail(err) => Some(err),
            Self::NoResult | Self::Success(_) => None,
        }
    }
}
