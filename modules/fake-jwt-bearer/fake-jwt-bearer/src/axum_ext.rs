//! Axum extractors and middleware for the fake JWT bearer scheme

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::extract::{FromRequestParts, Request};
use axum::http::request::Parts;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use fake_jwt_bearer_sdk::{
    AuthenticateResult, AuthenticationHandler, AuthenticationProperties, AuthenticationTicket,
    FakeJwtBearerError,
};
use serde::Serialize;
use tower::{Layer, Service};

/// Handler registered by [`FakeJwtBearerLayer`], reachable from request extensions.
#[derive(Clone)]
struct SchemeHandler(Arc<dyn AuthenticationHandler>);

/// Layer that authenticates every request with the given handler.
///
/// On success the [`AuthenticationTicket`] is stored in request extensions.
/// `NoResult` and `Fail` let the request through unauthenticated; routes
/// decide with the [`Authenticated`] extractor. An error propagated by the
/// handler becomes a 500 problem response.
///
/// # Example
/// ```ignore
/// let handler = Arc::new(FakeJwtBearerHandler::new(FakeJwtBearerConfig::default()));
/// router = router.layer(FakeJwtBearerLayer::new(handler));
/// ```
#[derive(Clone)]
pub struct FakeJwtBearerLayer {
    handler: Arc<dyn AuthenticationHandler>,
}

impl FakeJwtBearerLayer {
    #[must_use]
    pub fn new(handler: Arc<dyn AuthenticationHandler>) -> Self {
        Self { handler }
    }
}

impl<S> Layer<S> for FakeJwtBearerLayer {
    type Service = FakeJwtBearerService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        FakeJwtBearerService {
            inner,
            handler: self.handler.clone(),
        }
    }
}

/// Service that authenticates requests before handing them on.
#[derive(Clone)]
pub struct FakeJwtBearerService<S> {
    inner: S,
    handler: Arc<dyn AuthenticationHandler>,
}

impl<S> Service<Request<Body>> for FakeJwtBearerService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        let handler = self.handler.clone();
        let not_ready_inner = self.inner.clone();
        let mut ready_inner = std::mem::replace(&mut self.inner, not_ready_inner);

        Box::pin(async move {
            let (mut parts, body) = request.into_parts();

            match handler.authenticate(&parts).await {
                Ok(AuthenticateResult::Success(ticket)) => {
                    parts.extensions.insert(*ticket);
                }
                Ok(AuthenticateResult::NoResult) => {}
                Ok(AuthenticateResult::Fail(error)) => {
                    tracing::debug!(%error, "Authentication failed, continuing unauthenticated");
                }
                Err(error) => return Ok(error_response(&error)),
            }

            parts.extensions.insert(SchemeHandler(handler));
            ready_inner.call(Request::from_parts(parts, body)).await
        })
    }
}

/// Extractor for the ticket of an authenticated request.
///
/// Rejects with the scheme's challenge (401 with `WWW-Authenticate`) when the
/// request carries no successful authentication.
#[derive(Debug, Clone)]
pub struct Authenticated(pub AuthenticationTicket);

impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(ticket) = parts.extensions.get::<AuthenticationTicket>() {
            return Ok(Self(ticket.clone()));
        }

        let scheme = AuthScheme::from_parts(parts)?;
        Err(scheme.challenge(AuthenticationProperties::new()).await)
    }
}

/// Extractor giving routes access to the scheme's challenge and forbid
/// responses, e.g. to reject an authenticated caller lacking a role.
#[derive(Clone)]
pub struct AuthScheme {
    handler: Arc<dyn AuthenticationHandler>,
    head: Parts,
}

impl AuthScheme {
    fn from_parts(parts: &Parts) -> Result<Self, Response> {
        let Some(SchemeHandler(handler)) = parts.extensions.get::<SchemeHandler>() else {
            tracing::error!("FakeJwtBearerLayer is not installed on this route");
            return Err(Problem::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error",
                "Authentication middleware not configured",
            )
            .into_response());
        };

        Ok(Self {
            handler: handler.clone(),
            head: parts.clone(),
        })
    }

    pub async fn challenge(&self, properties: AuthenticationProperties) -> Response {
        self.handler
            .challenge(&self.head, properties)
            .await
            .map(Body::from)
    }

    pub async fn forbid(&self, properties: AuthenticationProperties) -> Response {
        self.handler
            .forbid(&self.head, properties)
            .await
            .map(Body::from)
    }
}

impl<S> FromRequestParts<S> for AuthScheme
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Self::from_parts(parts)
    }
}

/// The scheme's 403 response for the current request.
pub async fn forbidden_response(scheme: &AuthScheme) -> Response {
    scheme.forbid(AuthenticationProperties::new()).await
}

/// RFC 9457 problem details.
#[derive(Debug, Serialize)]
struct Problem {
    #[serde(rename = "type")]
    problem_type: &'static str,
    title: &'static str,
    status: u16,
    detail: String,
}

impl Problem {
    fn new(status: StatusCode, title: &'static str, detail: impl Into<String>) -> Self {
        Self {
            problem_type: "about:blank",
            title,
            status: status.as_u16(),
            detail: detail.into(),
        }
    }
}

impl IntoResponse for Problem {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = serde_json::to_string(&self).unwrap_or_default();
        (
            status,
            [(header::CONTENT_TYPE, "application/problem+json")],
            body,
        )
            .into_response()
    }
}

fn error_response(error: &FakeJwtBearerError) -> Response {
    tracing::error!(%error, "Exception occurred while processing message.");
    Problem::new(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal Server Error",
        error.to_string(),
    )
    .into_response()
}
