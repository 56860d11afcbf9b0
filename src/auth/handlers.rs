use axum::{extract::State, routing::post, Json, Router};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{CredentialsRequest, IdentityBody},
        password::{hash_password, verify_password},
        token::generate_access_token,
    },
    error::ApiError,
    response::Envelope,
    state::AppState,
    store::{NewUser, StoreError, UserStore},
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/signup", post(signup))
        .route("/users/login", post(login))
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    Json(mut payload): Json<CredentialsRequest>,
) -> Result<Envelope, ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::InvalidArgument("Invalid email".into()));
    }
    if payload.password.is_empty() {
        warn!("empty password");
        return Err(ApiError::InvalidArgument("Password is required".into()));
    }

    let hash = hash_password(&payload.password)?;
    let user = state
        .users
        .create_user(NewUser {
            email: payload.email,
            password_hash: hash,
            access_token: generate_access_token(),
        })
        .await
        .map_err(|e| match e {
            StoreError::Duplicate => {
                ApiError::DuplicateIdentity("User with this email already exists".into())
            }
            other => other.into(),
        })?;

    info!(user_id = %user.id, email = %user.email, "user created");
    Ok(Envelope::ok(
        IdentityBody::from(user),
        "User created successfully",
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<CredentialsRequest>,
) -> Result<Envelope, ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    // Unknown email and wrong password surface identically so accounts
    // cannot be enumerated.
    let user = state
        .users
        .find_by_email(&payload.email)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| {
            warn!(email = %payload.email, "login unknown email");
            ApiError::InvalidCredentials
        })?;

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(Envelope::ok(
        IdentityBody::from(user),
        "Logged in successfully",
    ))
}
