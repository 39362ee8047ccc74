//! Public API trait for the fake JWT bearer scheme.
//!
//! Hosts drive authentication through this trait; the implementation crate
//! provides `FakeJwtBearerHandler`.

use async_trait::async_trait;
use fake_jwt_security::ClaimsIdentity;
use http::request::Parts;

use crate::error::FakeJwtBearerError;
use crate::models::{AuthenticateResult, AuthenticationProperties};

/// Authentication scheme handler.
///
/// ```ignore
/// let handler: Arc<dyn AuthenticationHandler> = Arc::new(FakeJwtBearerHandler::new(cfg));
///
/// let (parts, body) = request.into_parts();
/// match handler.authenticate(&parts).await? {
///     AuthenticateResult::Success(ticket) => { /* ticket.principal() */ }
///     AuthenticateResult::NoResult | AuthenticateResult::Fail(_) => {
///         return handler.challenge(&parts, AuthenticationProperties::new()).await;
///     }
/// }
/// ```
#[async_trait]
pub trait AuthenticationHandler: Send + Sync {
    /// Scheme name this handler is registered under.
    fn scheme(&self) -> &str;

    /// Authenticate the request from its head.
    ///
    /// # Errors
    ///
    /// - `Decode` if the token is malformed for the configured wire format
    /// - `UnsupportedValueKind`, `UnsupportedClaimType`, `InvalidIssuerClaim`
    ///   if the decoded claims cannot be turned into an identity
    ///
    /// Errors are returned only when the `authentication_failed` hook did not
    /// supply a result of its own.
    async fn authenticate(&self, request: &Parts) -> Result<AuthenticateResult, FakeJwtBearerError>;

    /// Like [`AuthenticationHandler::authenticate`], but folds a propagated
    /// error into [`AuthenticateResult::Fail`].
    async fn authenticate_safe(&self, request: &Parts) -> AuthenticateResult {
        self.authenticate(request)
            .await
            .unwrap_or_else(AuthenticateResult::Fail)
    }

    /// Build the response challenging an unauthenticated caller.
    async fn challenge(
        &self,
        request: &Parts,
        properties: AuthenticationProperties,
    ) -> http::Response<String>;

    /// Build the response rejecting an authenticated but unauthorized caller.
    async fn forbid(
        &self,
        request: &Parts,
        properties: AuthenticationProperties,
    ) -> http::Response<String>;

    /// # Errors
    ///
    /// Always fails with `NotSupported`.
    fn sign_in(
        &self,
        principal: &ClaimsIdentity,
        properties: &AuthenticationProperties,
    ) -> Result<(), FakeJwtBearerError>;

    /// # Errors
    ///
    /// Always fails with `NotSupported`.
    fn sign_out(&self, properties: &AuthenticationProperties) -> Result<(), FakeJwtBearerError>;
}
