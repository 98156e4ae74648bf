use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, RegisterRequest},
        jwt::JwtKeys,
        password::{hash_password, verify_password},
        repo_types::{NewUser, User},
    },
    error::ApiError,
    state::AppState,
};

const DUPLICATE_USER: &str = "Username or email already exists";

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn issue(keys: &JwtKeys, user: &User) -> Result<AuthResponse, ApiError> {
    let token = keys.sign(user.id, &user.username)?;
    Ok(AuthResponse {
        token,
        user_id: user.id,
        username: user.username.clone(),
    })
}

pub async fn register(state: &AppState, req: RegisterRequest) -> Result<AuthResponse, ApiError> {
    let username = req.username.trim().to_string();
    let email = req.email.trim().to_lowercase();

    if username.is_empty() {
        return Err(ApiError::BadRequest("Username is required".into()));
    }
    if !is_valid_email(&email) {
        warn!(%email, "invalid email");
        return Err(ApiError::BadRequest("Invalid email".into()));
    }
    if req.password.is_empty() {
        return Err(ApiError::BadRequest("Password is required".into()));
    }

    if state.users.exists(&username, &email).await? {
        warn!(%username, "username or email already registered");
        return Err(ApiError::Conflict(DUPLICATE_USER.into()));
    }

    let password_hash = hash_password(&req.password)?;
    let user = state
        .users
        .create(NewUser {
            username,
            email,
            password_hash,
        })
        .await?
        .ok_or_else(|| {
            warn!("registration lost a uniqueness race");
            ApiError::Conflict(DUPLICATE_USER.into())
        })?;

    info!(user_id = %user.id, username = %user.username, "user registered");
    issue(&JwtKeys::from_config(&state.config.jwt), &user)
}

pub async fn login(state: &AppState, req: LoginRequest) -> Result<AuthResponse, ApiError> {
    let Some(user) = state.users.find_by_username(req.username.trim()).await? else {
        warn!(username = %req.username, "login unknown username");
        return Err(ApiError::InvalidCredentials);
    };

    if !verify_password(&req.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    info!(user_id = %user.id, username = %user.username, "user logged in");
    issue(&JwtKeys::from_config(&state.config.jwt), &user)
}
