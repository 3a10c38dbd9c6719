use actix_web::{web, HttpResponse};
use chrono::{SecondsFormat, Utc};
use log::{info, warn};
use mongodb::bson::doc;
use mongodb::Database;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::config::AuthConfig;
use crate::db::mongo;
use crate::error::{ApiError, ApiResult};
use crate::middleware::auth::issue_token;
use crate::middleware::auth_context::AuthenticatedUser;
use crate::models::user::{SigninRequest, SignupRequest, User, UserSession};

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub auth_token: String,
}

/*
    POST /api/auth/signup
*/
pub async fn signup(
    db: web::Data<Database>,
    auth: web::Data<AuthConfig>,
    input: web::Json<SignupRequest>,
) -> ApiResult<HttpResponse> {
    let input = input.into_inner();
    let email = input.email.trim().to_lowercase();

    if !is_valid_email(&email) {
        return Err(ApiError::BadRequest("Invalid email address".into()));
    }
    if input.password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::BadRequest(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }

    let password = input.password;
    let hashed = web::block(move || bcrypt::hash(password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;

    let now = Utc::now();
    let user = User {
        id: None,
        email: email.clone(),
        password: hashed,
        full_name: input.full_name,
        avatar_url: None,
        last_signin: None,
        failed_signins: Some(0),
        created_at: Some(now),
        updated_at: Some(now),
    };

    let result = mongo::users(&db).insert_one(&user).await.map_err(|err| {
        if mongo::is_duplicate_key(&err) {
            ApiError::Conflict("User already exists".into())
        } else {
            ApiError::from(err)
        }
    })?;
    let user_id = result
        .inserted_id
        .as_object_id()
        .ok_or_else(|| ApiError::Internal("insert did not return an ObjectId".into()))?;

    info!("New account {}", user_id);
    let token = issue_token(&email, user_id, &auth)?;
    Ok(HttpResponse::Ok().json(TokenResponse { auth_token: token }))
}

/*
    POST /api/auth/signin
*/
pub async fn signin(
    db: web::Data<Database>,
    auth: web::Data<AuthConfig>,
    input: web::Json<SigninRequest>,
) -> ApiResult<HttpResponse> {
    let input = input.into_inner();
    let email = input.email.trim().to_lowercase();
    let users = mongo::users(&db);

    // Unknown email and wrong password look the same to the caller
    let Some(user) = users.find_one(doc! { "email": &email }).await? else {
        return Err(ApiError::Unauthorized);
    };

    let password = input.password;
    let hashed = user.password.clone();
    let verified = web::block(move || bcrypt::verify(password, &hashed))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .unwrap_or(false);

    if !verified {
        let failed_signins = user.failed_signins.unwrap_or(0) + 1;
        users
            .update_one(
                doc! { "email": &email },
                doc! { "$set": { "failed_signins": failed_signins } },
            )
            .await?;
        warn!("Failed signin for account {:?} ({} attempts)", user.id, failed_signins);
        return Err(ApiError::Unauthorized);
    }

    let user_id = user
        .id
        .ok_or_else(|| ApiError::Internal("stored user without id".into()))?;
    users
        .update_one(
            doc! { "_id": user_id },
            doc! {
                "$set": {
                    "last_signin": Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
                    "failed_signins": 0
                }
            },
        )
        .await?;

    let token = issue_token(&email, user_id, &auth)?;
    Ok(HttpResponse::Ok().json(TokenResponse { auth_token: token }))
}

/*
    GET /api/auth/session
*/
pub async fn user_session(
    user: AuthenticatedUser,
    db: web::Data<Database>,
) -> ApiResult<HttpResponse> {
    let account = mongo::users(&db)
        .find_one(doc! { "_id": user.user_id })
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    let session = UserSession {
        id: account.id.unwrap_or(user.user_id),
        email: account.email,
        full_name: account.full_name.unwrap_or_default(),
        avatar_url: account.avatar_url,
        created_at: account.created_at.unwrap_or_default(),
    };
    Ok(HttpResponse::Ok().json(session))
}

fn is_valid_email(email: &str) -> bool {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL
        .get_or_init(|| {
            Regex::new(
                r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?)*$",
            )
            .expect("email pattern is valid")
        })
        .is_match(email)
}
