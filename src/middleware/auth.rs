use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::StatusCode,
    web, Error, HttpMessage, HttpResponse,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};

use crate::{
    services::auth_service::{self, AuthenticatedUser},
    state::AppState,
};

/// Name of the cookie carrying the session token
pub const SESSION_COOKIE: &str = "session";

/// Requires a valid session token (cookie or `Authorization: Bearer`) and
/// stores the resulting `AuthenticatedUser` in the request extensions.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService { service }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let token = match extract_token(&req) {
            Some(token) => token,
            None => return reject(req, StatusCode::UNAUTHORIZED, "Missing session token"),
        };

        let state = match req.app_data::<web::Data<AppState>>().cloned() {
            Some(state) => state,
            None => {
                log::error!("❌ AppState not registered; rejecting protected request");
                return reject(req, StatusCode::INTERNAL_SERVER_ERROR, "Server misconfigured");
            }
        };

        match auth_service::verify_session_token(&token, &state.session) {
            Ok(claims) => {
                req.extensions_mut().insert(AuthenticatedUser {
                    user_id: claims.sub,
                    username: claims.username,
                });

                let fut = self.service.call(req);
                Box::pin(async move {
                    let res = fut.await?;
                    Ok(res.map_into_left_body())
                })
            }
            Err(e) => {
                log::warn!("❌ Rejected session for {}: {}", req.path(), e);
                reject(req, StatusCode::UNAUTHORIZED, "Invalid or expired session")
            }
        }
    }
}

/// Bearer header wins over the cookie when both are present
fn extract_token(req: &ServiceRequest) -> Option<String> {
    let from_header = req
        .headers()
        .get(actix_web::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty());

    from_header.or_else(|| {
        req.cookie(SESSION_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .filter(|token| !token.is_empty())
    })
}

// Short-circuits with a JSON error body instead of calling the wrapped service
fn reject<B: 'static>(
    req: ServiceRequest,
    status: StatusCode,
    message: &str,
) -> LocalBoxFuture<'static, Result<ServiceResponse<EitherBody<B>>, Error>> {
    let response = HttpResponse::build(status)
        .json(serde_json::json!({
            "success": false,
            "error": message
        }))
        .map_into_right_body();

    let res = req.into_response(response);
    Box::pin(async move { Ok(res) })
}
