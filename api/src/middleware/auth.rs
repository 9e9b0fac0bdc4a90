//! JWT bearer authentication middleware for protecting API endpoints.
//!
//! This middleware extracts the access token from the Authorization header,
//! verifies signature, expiry, issuer and audience with the shared
//! [`TokenSigner`], optionally checks a required role, and injects the
//! caller's [`AuthContext`] into the request.

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    error::ErrorUnauthorized,
    http::header::AUTHORIZATION,
    Error, FromRequest, HttpMessage, HttpRequest, HttpResponse,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
    task::{Context, Poll},
};
use ts_core::{authorize, ClaimSet, TokenSigner};
use ts_shared::types::StatusResponse;

/// Authenticated caller injected into requests
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Verified claims of the presented access token
    pub claims: ClaimSet,
}

impl AuthContext {
    pub fn from_claims(claims: ClaimSet) -> Self {
        Self { claims }
    }

    /// Username taken from the verified subject claim
    pub fn username(&self) -> &str {
        self.claims.username()
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.claims.has_role(role)
    }
}

/// JWT authentication middleware factory
pub struct JwtAuth {
    signer: Arc<TokenSigner>,
    /// Role the caller must hold, if any
    required_role: Option<String>,
}

impl JwtAuth {
    /// Creates a middleware that accepts any valid access token
    pub fn new(signer: Arc<TokenSigner>) -> Self {
        Self {
            signer,
            required_role: None,
        }
    }

    /// Additionally requires the token to carry `role`
    pub fn require_role(mut self, role: impl Into<String>) -> Self {
        self.required_role = Some(role.into());
        self
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
            signer: Arc::clone(&self.signer),
            required_role: self.required_role.clone(),
        }))
    }
}

/// JWT authentication middleware service
pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
    signer: Arc<TokenSigner>,
    required_role: Option<String>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let signer = Arc::clone(&self.signer);
        let required_role = self.required_role.clone();

        Box::pin(async move {
            let token = match extract_bearer_token(&req) {
                Some(token) => token,
                None => return Ok(reject(req, HttpResponse::Unauthorized(), "Unauthorized")),
            };

            let claims = match signer.validate_full(&token) {
                Ok(claims) => claims,
                Err(e) => {
                    log::debug!("bearer token rejected: {}", e);
                    return Ok(reject(req, HttpResponse::Unauthorized(), "Unauthorized"));
                }
            };

            if let Some(role) = required_role.as_deref() {
                if let Err(e) = authorize(&claims, &[role]) {
                    log::warn!("user {} lacks role {}", claims.username(), role);
                    return Ok(reject(req, HttpResponse::Forbidden(), &e.to_string()));
                }
            }

            req.extensions_mut().insert(AuthContext::from_claims(claims));

            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

/// Short-circuits the request with a failure status body
fn reject<B>(
    req: ServiceRequest,
    mut builder: actix_web::HttpResponseBuilder,
    message: &str,
) -> ServiceResponse<EitherBody<B>> {
    let response = builder.json(StatusResponse::failure(message));
    req.into_response(response).map_into_right_body()
}

/// Extracts Bearer token from Authorization header
fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|s| s.to_string())
}

/// Extractor for required authentication
impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = req
            .extensions()
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| ErrorUnauthorized("Authentication required"));

        ready(result)
    }
}
