use std::future::{ready, Ready};

use actix_web::{dev::Payload, Error, FromRequest, HttpMessage, HttpRequest};
use mongodb::bson::oid::ObjectId;

use crate::error::ApiError;
use crate::middleware::auth::Claims;

#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: ObjectId,
    pub email: String,
}

fn user_from_claims(req: &HttpRequest) -> Result<Option<AuthenticatedUser>, ApiError> {
    let extensions = req.extensions();
    let Some(claims) = extensions.get::<Claims>() else {
        return Ok(None);
    };
    let user_id = ObjectId::parse_str(&claims.user_id).map_err(|_| ApiError::Unauthorized)?;
    Ok(Some(AuthenticatedUser {
        user_id,
        email: claims.sub.clone(),
    }))
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let result = user_from_claims(req)
            .and_then(|user| user.ok_or(ApiError::Unauthorized))
            .map_err(Error::from);
        ready(result)
    }
}

/// The caller when a valid token was sent, `None` for anonymous requests.
#[derive(Clone, Debug)]
pub struct MaybeUser(pub Option<AuthenticatedUser>);

impl MaybeUser {
    pub fn user_id(&self) -> Option<&ObjectId> {
        self.0.as_ref().map(|user| &user.user_id)
    }
}

impl FromRequest for MaybeUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(user_from_claims(req).map(MaybeUser).map_err(Error::from))
    }
}
