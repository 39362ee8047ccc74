//! Extension points invoked by the authentication pipeline.
//!
//! Every hook receives a mutable context. Contexts that carry a result slot
//! (`MessageReceived`, `TokenValidated`, `AuthenticationFailed`) short-circuit
//! the pipeline as soon as a hook fills the slot via `success`, `fail` or
//! `no_result`. The challenge context instead exposes the RFC 6750 error
//! fields and a `handled` flag.

use async_trait::async_trait;
use fake_jwt_security::ClaimsIdentity;
use http::request::Parts;

use crate::error::FakeJwtBearerError;
use crate::models::{AuthenticateResult, AuthenticationProperties, AuthenticationTicket};

/// Hooks invoked by the pipeline, in order: `message_received`,
/// `token_validated` (or `authentication_failed`), and later `challenge` or
/// `forbidden`.
///
/// All methods default to no-ops, so implementors override only what they need.
/// The pipeline awaits each hook before moving on; hooks of one request never
/// run concurrently.
#[async_trait]
pub trait JwtBearerEvents: Send + Sync {
    /// Invoked when a request is first received. May supply the token from an
    /// alternative location or short-circuit the attempt.
    async fn message_received(&self, _ctx: &mut MessageReceivedContext<'_>) {}

    /// Invoked after the token has been decoded and an identity built.
    async fn token_validated(&self, _ctx: &mut TokenValidatedContext<'_>) {}

    /// Invoked when decoding or mapping failed. The error is propagated after
    /// this hook unless it sets a result.
    async fn authentication_failed(&self, _ctx: &mut AuthenticationFailedContext<'_>) {}

    /// Invoked before a challenge is sent back to the caller.
    async fn challenge(&self, _ctx: &mut ChallengeContext<'_>) {}

    /// Invoked before a 403 is sent back to the caller.
    async fn forbidden(&self, _ctx: &mut ForbiddenContext<'_>) {}
}

/// No-op events used when the host registers none.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultEvents;

impl JwtBearerEvents for DefaultEvents {}

pub struct MessageReceivedContext<'a> {
    pub request: &'a Parts,
    pub scheme: &'a str,
    /// Token to use instead of the one carried by the `Authorization` header.
    pub token: Option<String>,
    result: Option<AuthenticateResult>,
}

impl<'a> MessageReceivedContext<'a> {
    #[must_use]
    pub fn new(request: &'a Parts, scheme: &'a str) -> Self {
        Self {
            request,
            scheme,
            token: None,
            result: None,
        }
    }

    /// Authenticate the request as `principal`, skipping token processing.
    pub fn success(&mut self, principal: ClaimsIdentity) {
        self.result = Some(AuthenticateResult::success(AuthenticationTicket::new(
            principal,
            AuthenticationProperties::new(),
            self.scheme,
        )));
    }

    pub fn fail(&mut self, error: FakeJwtBearerError) {
        self.result = Some(AuthenticateResult::Fail(error));
    }

    pub fn no_result(&mut self) {
        self.result = Some(AuthenticateResult::NoResult);
    }

    #[must_use]
    pub fn result(&self) -> Option<&AuthenticateResult> {
        self.result.as_ref()
    }

    /// Split into the hook's result (if any) and the token it supplied.
    #[must_use]
    pub fn into_parts(self) -> (Option<AuthenticateResult>, Option<String>) {
        (self.result, self.token)
    }
}

pub struct TokenValidatedContext<'a> {
    pub request: &'a Parts,
    pub scheme: &'a str,
    /// The raw token the identity was built from.
    pub security_token: &'a str,
    /// Identity built from the token. Hooks may replace or enrich it.
    pub principal: ClaimsIdentity,
    pub properties: AuthenticationProperties,
    result: Option<AuthenticateResult>,
}

impl<'a> TokenValidatedContext<'a> {
    #[must_use]
    pub fn new(
        request: &'a Parts,
        scheme: &'a str,
        security_token: &'a str,
        principal: ClaimsIdentity,
    ) -> Self {
        Self {
            request,
            scheme,
            security_token,
            principal,
            properties: AuthenticationProperties::new(),
            result: None,
        }
    }

    /// Accept the current principal and properties as final.
    pub fn success(&mut self) {
        self.result = Some(AuthenticateResult::success(AuthenticationTicket::new(
            self.principal.clone(),
            self.properties.clone(),
            self.scheme,
        )));
    }

    pub fn fail(&mut self, error: FakeJwtBearerError) {
        self.result = Some(AuthenticateResult::Fail(error));
    }

    pub fn no_result(&mut self) {
        self.result = Some(AuthenticateResult::NoResult);
    }

    #[must_use]
    pub fn result(&self) -> Option<&AuthenticateResult> {
        self.result.as_ref()
    }

    /// Split into the hook's result (if any) and the principal/properties.
    #[must_use]
    pub fn into_parts(
        self,
    ) -> (
        Option<AuthenticateResult>,
        ClaimsIdentity,
        AuthenticationProperties,
    ) {
        (self.result, self.principal, self.properties)
    }
}

pub struct AuthenticationFailedContext<'a> {
    pub request: &'a Parts,
    pub scheme: &'a str,
    /// The failure raised while decoding or mapping the token.
    pub error: FakeJwtBearerError,
    result: Option<AuthenticateResult>,
}

impl<'a> AuthenticationFailedContext<'a> {
    #[must_use]
    pub fn new(request: &'a Parts, scheme: &'a str, error: FakeJwtBearerError) -> Self {
        Self {
            request,
            scheme,
            error,
            result: None,
        }
    }

    pub fn success(&mut self, principal: ClaimsIdentity) {
        self.result = Some(AuthenticateResult::success(AuthenticationTicket::new(
            principal,
            AuthenticationProperties::new(),
            self.scheme,
        )));
    }

    /// Turn the failure into a regular `Fail` outcome instead of an error.
    pub fn fail(&mut self, error: FakeJwtBearerError) {
        self.result = Some(AuthenticateResult::Fail(error));
    }

    pub fn no_result(&mut self) {
        self.result = Some(AuthenticateResult::NoResult);
    }

    #[must_use]
    pub fn result(&self) -> Option<&AuthenticateResult> {
        self.result.as_ref()
    }

    /// Split into the hook's result (if any) and the original error.
    #[must_use]
    pub fn into_parts(self) -> (Option<AuthenticateResult>, FakeJwtBearerError) {
        (self.result, self.error)
    }
}

/// State of a challenge being built.
///
/// `error`, `error_description` and `error_uri` end up in the
/// `WWW-Authenticate` header. A hook that wrote its own response calls
/// [`ChallengeContext::handle_response`] so the default 401 logic is skipped.
pub struct ChallengeContext<'a> {
    pub request: &'a Parts,
    pub scheme: &'a str,
    pub properties: AuthenticationProperties,
    /// Failure captured by re-running authentication, if any.
    pub authenticate_failure: Option<FakeJwtBearerError>,
    pub error: Option<String>,
    pub error_description: Option<String>,
    pub error_uri: Option<String>,
    /// Response under construction. Hooks may add headers or a body.
    pub response: http::Response<String>,
    handled: bool,
}

impl<'a> ChallengeContext<'a> {
    #[must_use]
    pub fn new(
        request: &'a Parts,
        scheme: &'a str,
        properties: AuthenticationProperties,
        authenticate_failure: Option<FakeJwtBearerError>,
    ) -> Self {
        Self {
            request,
            scheme,
            properties,
            authenticate_failure,
            error: None,
            error_description: None,
            error_uri: None,
            response: http::Response::new(String::new()),
            handled: false,
        }
    }

    /// Skip any default logic for this challenge.
    pub fn handle_response(&mut self) {
        self.handled = true;
    }

    #[must_use]
    pub fn is_handled(&self) -> bool {
        self.handled
    }
}

pub struct ForbiddenContext<'a> {
    pub request: &'a Parts,
    pub scheme: &'a str,
    pub properties: AuthenticationProperties,
    /// Response under construction; status is already 403.
    pub response: http::Response<String>,
}

impl<'a> ForbiddenContext<'a> {
    #[must_use]
    pub fn new(
        request: &'a Parts,
        scheme: &'a str,
        properties: AuthenticationProperties,
        response: http::Response<String>,
    ) -> Self {
        Self {
            request,
            scheme,
            properties,
            response,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn parts() -> Parts {
        http::Request::builder()
            .uri("/oauth")
            .body(())
            .unwrap()
            .into_parts()
            .0
    }

    #[tokio::test]
    async fn default_events_leave_contexts_untouched() {
        let parts = parts();
        let events = DefaultEvents;

        let mut received = MessageReceivedContext::new(&parts, "FakeBearer");
        events.message_received(&mut received).await;
        assert!(received.token.is_none());
        assert!(received.result().is_none());

        let mut challenge =
            ChallengeContext::new(&parts, "FakeBearer", AuthenticationProperties::new(), None);
        events.challenge(&mut challenge).await;
        assert!(!challenge.is_handled());
        assert!(challenge.error.is_none());
    }

    #[test]
    fn message_received_success_builds_ticket_for_scheme() {
        let parts = parts();
        let mut ctx = MessageReceivedContext::new(&parts, "Custom");
        ctx.success(ClaimsIdentity::anonymous());

        let (result, token) = ctx.into_parts();
        let result = result.unwrap();
        assert!(token.is_none());
        assert_eq!(result.ticket().map(AuthenticationTicket::scheme), Some("Custom"));
    }

    #[test]
    fn token_validated_success_uses_current_principal() {
        let parts = parts();
        let principal = ClaimsIdentity::builder()
            .authentication_type("FakeJwtBearer")
            .build();
        let mut ctx = TokenValidatedContext::new(&parts, "FakeBearer", "{}", principal.clone());
        ctx.properties.set_item("origin", "hook");
        ctx.success();

        let (result, _, _) = ctx.into_parts();
        let result = result.unwrap();
        assert_eq!(result.principal(), Some(&principal));
        assert_eq!(
            result.ticket().and_then(|t| t.properties().item("origin")),
            Some("hook")
        );
    }

    #[test]
    fn authentication_failed_keeps_original_error() {
        let parts = parts();
        let ctx = AuthenticationFailedContext::new(
            &parts,
            "FakeBearer",
            FakeJwtBearerError::decode("bad json"),
        );
        let (result, error) = ctx.into_parts();
        assert!(result.is_none());
        assert_eq!(error, FakeJwtBearerError::decode("bad json"));
    }
}
