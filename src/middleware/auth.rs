use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, HttpMessage,
};
use chrono::{Duration, Utc};
use futures::future::{ready, LocalBoxFuture, Ready};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use log::{debug, error};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::error::ApiError;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,     // subject (email)
    pub exp: usize,      // expiration time
    pub iat: usize,      // issued at
    pub user_id: String, // hex ObjectId of the account
}

pub fn issue_token(email: &str, user_id: ObjectId, auth: &AuthConfig) -> Result<String, ApiError> {
    let now = Utc::now();
    let expires_at = Duration::try_hours(auth.token_ttl_hours)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .ok_or_else(|| ApiError::Internal("token lifetime out of range".into()))?;

    let claims = Claims {
        sub: email.to_string(),
        iat: now.timestamp() as usize,
        exp: expires_at.timestamp() as usize,
        user_id: user_id.to_hex(),
    };

    let header = Header::new(Algorithm::HS256);
    Ok(encode(
        &header,
        &claims,
        &EncodingKey::from_secret(auth.jwt_secret.as_bytes()),
    )?)
}

pub fn decode_token(token: &str, auth: &AuthConfig) -> Result<Claims, ApiError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.set_required_spec_claims(&["exp", "iat", "sub", "user_id"]);

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(auth.jwt_secret.as_bytes()),
        &validation,
    )?;
    Ok(token_data.claims)
}

fn bearer_token(req: &ServiceRequest) -> Option<&str> {
    req.headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

/// Validates bearer tokens and stores the [`Claims`] in request extensions.
///
/// `required()` rejects anonymous requests with 401. `optional()` lets them
/// through without claims so handlers can serve public data, but still
/// rejects a token that is present and invalid.
#[derive(Clone, Copy)]
pub struct AuthMiddleware {
    required: bool,
}

impl AuthMiddleware {
    pub fn required() -> Self {
        AuthMiddleware { required: true }
    }

    pub fn optional() -> Self {
        AuthMiddleware { required: false }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service,
            required: self.required,
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
    required: bool,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let Some(token) = bearer_token(&req) else {
            if self.required {
                return Box::pin(ready(Err(ApiError::Unauthorized.into())));
            }
            return Box::pin(self.service.call(req));
        };

        let Some(auth) = req.app_data::<web::Data<AuthConfig>>() else {
            error!("AuthConfig missing from app data");
            return Box::pin(ready(Err(
                ApiError::Internal("auth not configured".into()).into()
            )));
        };

        match decode_token(token, auth) {
            Ok(claims) => {
                req.extensions_mut().insert(claims);
                Box::pin(self.service.call(req))
            }
            Err(err) => {
                debug!("Rejected bearer token: {}", err);
                Box::pin(ready(Err(err.into())))
            }
        }
    }
}
