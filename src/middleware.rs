use actix_service::{forward_ready, Service};
use actix_web::dev::{Payload, ServiceRequest, ServiceResponse, Transform};
use actix_web::error::ErrorInternalServerError;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{web, Error, FromRequest, HttpMessage, HttpRequest};
use futures::future::{ok, ready, LocalBoxFuture, Ready};
use std::rc::Rc;

use crate::error::ApiError;
use crate::models::Role;
use crate::state::AppState;
use crate::token::{bearer_token, Claims, Identity, TokenKeys};

/// Rejects requests without a valid bearer token and stores the decoded
/// [`Claims`] in the request extensions.
pub struct VerifyToken {
    keys: TokenKeys,
}

impl VerifyToken {
    pub fn new(keys: TokenKeys) -> Self {
        VerifyToken { keys }
    }
}

impl<S, B> Transform<S, ServiceRequest> for VerifyToken
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = VerifyTokenMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(VerifyTokenMiddleware {
            service: Rc::new(service),
            keys: self.keys.clone(),
        })
    }
}

pub struct VerifyTokenMiddleware<S> {
    service: Rc<S>,
    keys: TokenKeys,
}

impl<S, B> Service<ServiceRequest> for VerifyTokenMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let keys = self.keys.clone();
        let service = self.service.clone();

        Box::pin(async move {
            let header = req
                .headers()
                .get(AUTHORIZATION)
                .ok_or(ApiError::MissingToken)?;
            let token = header
                .to_str()
                .ok()
                .and_then(bearer_token)
                .ok_or_else(|| ApiError::InvalidToken("malformed authorization header".into()))?;

            let claims = keys.verify(token)?;
            req.extensions_mut().insert(claims);
            service.call(req).await
        })
    }
}

/// Admits the request only when the verified caller's directory record has
/// the required role. Must run after [`VerifyToken`].
pub struct RequireRole {
    required: Role,
}

impl RequireRole {
    pub fn new(required: Role) -> Self {
        RequireRole { required }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = RequireRoleMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(RequireRoleMiddleware {
            service: Rc::new(service),
            required: self.required,
        })
    }
}

pub struct RequireRoleMiddleware<S> {
    service: Rc<S>,
    required: Role,
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let required = self.required;
        let service = self.service.clone();

        Box::pin(async move {
            let email = req
                .extensions()
                .get::<Claims>()
                .map(|claims| claims.identity.email.clone())
                .ok_or(ApiError::MissingToken)?;
            let state = req
                .app_data::<web::Data<AppState>>()
                .cloned()
                .ok_or_else(|| ErrorInternalServerError("application state not configured"))?;

            state.directory.authorize(&email, required).await?;
            service.call(req).await
        })
    }
}

/// Handlers behind [`VerifyToken`] take the caller's identity as an argument.
impl FromRequest for Identity {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<Claims>()
                .map(|claims| claims.identity.clone())
                .ok_or_else(|| ApiError::MissingToken.into()),
        )
    }
}
