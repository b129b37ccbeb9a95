use crate::{
    config::SessionConfig,
    database::UserStore,
    models::{User, UserInfo},
    utils::AppError,
};
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

pub const USERNAME_TAKEN_MESSAGE: &str = "Username already exists. Please choose another.";
pub const INVALID_LOGIN_MESSAGE: &str = "Login unsuccessful. Please check username and password.";

// Session token claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,           // user_id
    pub username: String,
    pub iat: usize,            // issued at
    pub exp: usize,            // expiration
    pub jti: String,           // JWT ID
    pub aud: String,           // audience
    pub iss: String,           // issuer
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

pub type LoginRequest = CredentialsRequest;
pub type RegisterRequest = CredentialsRequest;

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct RegisterResponse {
    pub success: bool,
    pub message: String,
    pub user: UserInfo,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub user: UserInfo,
}

/// Identity extracted from a verified session token
#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub username: String,
}

// Issue a session token
pub fn generate_session_token(user: &User, session: &SessionConfig) -> Result<String, AppError> {
    let now = Utc::now();
    let iat = now.timestamp() as usize;
    let exp = Duration::try_hours(session.ttl_hours)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .ok_or_else(|| {
            AppError::Internal(format!("Session TTL out of range: {} hours", session.ttl_hours))
        })?
        .timestamp() as usize;

    let claims = Claims {
        sub: user.user_id.clone(),
        username: user.username.clone(),
        iat,
        exp,
        jti: Uuid::new_v4().to_string(),
        aud: session.audience.clone(),
        iss: session.issuer.clone(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(session.jwt_secret.as_ref()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
}

// Verify a session token
pub fn verify_session_token(token: &str, session: &SessionConfig) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[session.audience.clone()]);

    let mut issuers = HashSet::new();
    issuers.insert(session.issuer.clone());
    validation.iss = Some(issuers);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(session.jwt_secret.as_ref()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))
}

// User registration
pub async fn register(
    store: &dyn UserStore,
    request: &RegisterRequest,
) -> Result<UserInfo, AppError> {
    let username = request.username.trim();

    if username.is_empty() {
        return Err(AppError::Validation("Username is required".to_string()));
    }
    if request.password.is_empty() {
        return Err(AppError::Validation("Password is required".to_string()));
    }

    // Fast path; the unique index still catches concurrent registrations
    if store.find_by_username(username).await?.is_some() {
        return Err(AppError::Conflict(USERNAME_TAKEN_MESSAGE.to_string()));
    }

    let password_hash = hash(&request.password, DEFAULT_COST)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;

    let new_user = User::new(username, password_hash);

    store.insert_user(&new_user).await.map_err(|e| match e {
        AppError::Conflict(_) => AppError::Conflict(USERNAME_TAKEN_MESSAGE.to_string()),
        other => other,
    })?;

    log::info!("✅ User registered successfully: {}", username);

    Ok(UserInfo::from(&new_user))
}

// User login
pub async fn login(
    store: &dyn UserStore,
    session: &SessionConfig,
    request: &LoginRequest,
) -> Result<LoginResponse, AppError> {
    let user = store
        .find_by_username(request.username.trim())
        .await?
        .ok_or_else(|| AppError::Unauthorized(INVALID_LOGIN_MESSAGE.to_string()))?;

    let valid = verify(&request.password, &user.password_hash)
        .map_err(|e| AppError::Internal(format!("Password verification error: {}", e)))?;

    if !valid {
        return Err(AppError::Unauthorized(INVALID_LOGIN_MESSAGE.to_string()));
    }

    let token = generate_session_token(&user, session)?;

    Ok(LoginResponse {
        success: true,
        message: "Login successful!".to_string(),
        token,
        user: UserInfo::from(&user),
    })
}

/// Loads the record behind a session; a deleted user counts as unauthenticated,
/// and so does a failed lookup (the store error is logged, never returned)
pub async fn get_current_user(
    store: &dyn UserStore,
    user_id: &str,
) -> Result<User, AppError> {
    match store.find_by_id(user_id).await {
        Ok(Some(user)) => Ok(user),
        Ok(None) => Err(AppError::Unauthorized("User not found".to_string())),
        Err(e) => {
            log::error!("❌ Session user lookup failed for {}: {}", user_id, e);
            Err(AppError::Unauthorized("Session could not be verified".to_string()))
        }
    }
}
