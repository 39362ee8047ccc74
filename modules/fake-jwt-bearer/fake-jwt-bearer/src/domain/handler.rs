//! The authentication pipeline.
//!
//! `authenticate` runs: `message_received` hook, token extraction, decoding,
//! claims mapping, `token_validated` hook, token saving. Any decode or mapping
//! error goes to the `authentication_failed` hook and is propagated unless the
//! hook supplies an outcome. `challenge` re-runs `authenticate` to learn the
//! failure cause, so hooks fire again for the same request.

use std::sync::Arc;

use async_trait::async_trait;
use fake_jwt_bearer_sdk::{
    ACCESS_TOKEN, AuthenticateResult, AuthenticationFailedContext, AuthenticationHandler,
    AuthenticationProperties, AuthenticationTicket, AuthenticationToken, ChallengeContext,
    DefaultEvents, FakeJwtBearerError, ForbiddenContext, JwtBearerEvents, MessageReceivedContext,
    TokenValidatedContext,
};
use fake_jwt_security::ClaimsIdentity;
use http::header::{AUTHORIZATION, WWW_AUTHENTICATE};
use http::request::Parts;
use http::{HeaderMap, HeaderValue, StatusCode};
use tracing::{debug, info, warn};

use crate::config::FakeJwtBearerConfig;
use crate::domain::challenge::{INVALID_TOKEN, error_description, www_authenticate};
use crate::domain::claims_handler::{FakeJwtBearerClaimsHandler, SecurityTokenClaimsHandler};
use crate::domain::decoder::{DecodedToken, decode};

/// Fake JWT bearer scheme handler.
///
/// ```ignore
/// let handler = FakeJwtBearerHandler::new(FakeJwtBearerConfig::default())
///     .with_events(Arc::new(MyEvents));
/// ```
pub struct FakeJwtBearerHandler {
    config: FakeJwtBearerConfig,
    claims_handler: Arc<dyn SecurityTokenClaimsHandler>,
    events: Arc<dyn JwtBearerEvents>,
}

impl FakeJwtBearerHandler {
    /// Create a handler with no-op events and the default claims handler.
    #[must_use]
    pub fn new(config: FakeJwtBearerConfig) -> Self {
        warn!(
            scheme = %config.scheme,
            "Fake JWT bearer scheme registered; tokens are trusted without verification and must never reach production"
        );
        let claims_handler = Arc::new(FakeJwtBearerClaimsHandler::new(config.claims.clone()));
        Self {
            config,
            claims_handler,
            events: Arc::new(DefaultEvents),
        }
    }

    #[must_use]
    pub fn with_events(mut self, events: Arc<dyn JwtBearerEvents>) -> Self {
        self.events = events;
        self
    }

    /// Replace the claims handler. `config.claims` is then unused.
    #[must_use]
    pub fn with_claims_handler(
        mut self,
        claims_handler: Arc<dyn SecurityTokenClaimsHandler>,
    ) -> Self {
        self.claims_handler = claims_handler;
        self
    }

    #[must_use]
    pub fn config(&self) -> &FakeJwtBearerConfig {
        &self.config
    }

    fn token_from_headers(&self, headers: &HeaderMap) -> Option<String> {
        let header_type = self.config.authentication_header_type.as_str();

        let Some(authorization) = headers.get(AUTHORIZATION).filter(|v| !v.is_empty()) else {
            debug!("No Authorization header");
            return None;
        };

        // Claim values may carry non-ASCII text, so accept any UTF-8.
        let token = std::str::from_utf8(authorization.as_bytes())
            .ok()
            .and_then(|value| bearer_token(value, header_type));
        if token.is_none() {
            debug!(header_type, "Authorization header carries no token for this scheme");
        }
        token.map(str::to_owned)
    }

    async fn handle_authenticate(
        &self,
        request: &Parts,
    ) -> Result<AuthenticateResult, FakeJwtBearerError> {
        let scheme = self.config.scheme.as_str();

        let mut received = MessageReceivedContext::new(request, scheme);
        self.events.message_received(&mut received).await;
        let (result, supplied_token) = received.into_parts();
        if let Some(result) = result {
            debug!("message_received hook supplied the outcome");
            return Ok(result);
        }

        let Some(token) = supplied_token
            .filter(|token| !token.is_empty())
            .or_else(|| self.token_from_headers(&request.headers))
        else {
            return Ok(AuthenticateResult::NoResult);
        };

        let identity = match decode(&token, self.config.bearer_value_type)? {
            DecodedToken::Claims(claims) => self.claims_handler.create_claims_identity(&claims)?,
            DecodedToken::SignedToken(jwt) => {
                self.claims_handler.create_claims_identity_from_token(&jwt)?
            }
        };
        info!("Successfully validated the token.");

        let mut validated = TokenValidatedContext::new(request, scheme, &token, identity);
        self.events.token_validated(&mut validated).await;
        let (result, principal, mut properties) = validated.into_parts();
        if let Some(result) = result {
            debug!("token_validated hook supplied the outcome");
            return Ok(result);
        }

        if self.config.save_token {
            properties.store_tokens([AuthenticationToken::new(ACCESS_TOKEN, token)]);
        }

        Ok(AuthenticateResult::success(AuthenticationTicket::new(
            principal, properties, scheme,
        )))
    }
}

#[async_trait]
impl AuthenticationHandler for FakeJwtBearerHandler {
    fn scheme(&self) -> &str {
        &self.config.scheme
    }

    #[tracing::instrument(skip_all, fields(scheme = %self.config.scheme))]
    async fn authenticate(
        &self,
        request: &Parts,
    ) -> Result<AuthenticateResult, FakeJwtBearerError> {
        let error = match self.handle_authenticate(request).await {
            Ok(result) => return Ok(result),
            Err(error) => error,
        };
        info!(%error, "Failed to validate the token.");

        let mut failed = AuthenticationFailedContext::new(request, &self.config.scheme, error);
        self.events.authentication_failed(&mut failed).await;
        match failed.into_parts() {
            (Some(result), _) => {
                debug!("authentication_failed hook supplied the outcome");
                Ok(result)
            }
            (None, error) => Err(error),
        }
    }

    #[tracing::instrument(skip_all, fields(scheme = %self.config.scheme))]
    async fn challenge(
        &self,
        request: &Parts,
        properties: AuthenticationProperties,
    ) -> http::Response<String> {
        let failure = match self.authenticate_safe(request).await {
            AuthenticateResult::Fail(error) => Some(error),
            AuthenticateResult::NoResult | AuthenticateResult::Success(_) => None,
        };

        let mut ctx = ChallengeContext::new(request, &self.config.scheme, properties, failure);
        // No failure means no token: reporting invalid_token would be wrong.
        if self.config.include_error_details
            && let Some(failure) = &ctx.authenticate_failure
        {
            ctx.error = Some(INVALID_TOKEN.to_owned());
            ctx.error_description = Some(error_description(failure));
        }

        self.events.challenge(&mut ctx).await;
        if ctx.is_handled() {
            debug!("challenge hook handled the response");
            return ctx.response;
        }

        let challenge = www_authenticate(
            &self.config.challenge,
            ctx.error.as_deref(),
            ctx.error_description.as_deref(),
            ctx.error_uri.as_deref(),
        );
        let mut response = ctx.response;
        *response.status_mut() = StatusCode::UNAUTHORIZED;
        match HeaderValue::from_str(&challenge) {
            Ok(value) => {
                response.headers_mut().append(WWW_AUTHENTICATE, value);
            }
            Err(error) => {
                warn!(%error, "Challenge is not a valid header value, omitting WWW-Authenticate");
            }
        }
        response
    }

    #[tracing::instrument(skip_all, fields(scheme = %self.config.scheme))]
    async fn forbid(
        &self,
        request: &Parts,
        properties: AuthenticationProperties,
    ) -> http::Response<String> {
        let mut response = http::Response::new(String::new());
        *response.status_mut() = StatusCode::FORBIDDEN;

        let mut ctx = ForbiddenContext::new(request, &self.config.scheme, properties, response);
        self.events.forbidden(&mut ctx).await;
        ctx.response
    }

    fn sign_in(
        &self,
        _principal: &ClaimsIdentity,
        _properties: &AuthenticationProperties,
    ) -> Result<(), FakeJwtBearerError> {
        Err(FakeJwtBearerError::not_supported("sign-in"))
    }

    fn sign_out(&self, _properties: &AuthenticationProperties) -> Result<(), FakeJwtBearerError> {
        Err(FakeJwtBearerError::not_supported("sign-out"))
    }
}

/// Token following `header_type` (case-insensitive) and a space, trimmed.
/// `None` for another keyword or an empty token.
fn bearer_token<'a>(authorization: &'a str, header_type: &str) -> Option<&'a str> {
    let keyword = authorization.get(..header_type.len())?;
    if !keyword.eq_ignore_ascii_case(header_type) {
        return None;
    }
    let token = authorization
        .get(header_type.len()..)?
        .strip_prefix(' ')?
        .trim();
    (!token.is_empty()).then_some(token)
}
