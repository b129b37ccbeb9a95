use actix_web::{
    cookie::{time::Duration as CookieDuration, Cookie, SameSite},
    web, HttpResponse,
};

use crate::{
    config::SessionConfig,
    middleware::auth::SESSION_COOKIE,
    models::UserInfo,
    services::auth_service::{
        self, AuthenticatedUser, CredentialsRequest, LoginRequest, LoginResponse, RegisterRequest,
        RegisterResponse,
    },
    state::AppState,
    utils::AppError,
};

#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "Account created", body = RegisterResponse),
        (status = 400, description = "Missing username or password"),
        (status = 409, description = "Username already exists")
    )
)]
pub async fn register(
    state: web::Data<AppState>,
    request: web::Json<RegisterRequest>,
) -> HttpResponse {
    log::info!("📝 POST /auth/register - username: {}", request.username);

    match auth_service::register(state.store.as_ref(), &request).await {
        Ok(user) => HttpResponse::Created().json(RegisterResponse {
            success: true,
            message: "Account created! You can now log in.".to_string(),
            user,
        }),
        Err(e) => {
            log::warn!("❌ Registration failed: {} - {}", request.username, e);
            auth_error(&e)
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Login successful; also sets the session cookie", body = LoginResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    state: web::Data<AppState>,
    request: web::Json<LoginRequest>,
) -> HttpResponse {
    log::info!("🔐 POST /auth/login - username: {}", request.username);

    match auth_service::login(state.store.as_ref(), &state.session, &request).await {
        Ok(response) => {
            log::info!("✅ Login successful: {}", request.username);
            HttpResponse::Ok()
                .cookie(session_cookie(&response.token, &state.session))
                .json(response)
        }
        Err(e) => {
            log::warn!("❌ Login failed: {} - {}", request.username, e);
            auth_error(&e)
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "Auth",
    responses(
        (status = 200, description = "Session cookie cleared"),
        (status = 401, description = "Not logged in")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn logout(user: web::ReqData<AuthenticatedUser>) -> HttpResponse {
    log::info!("👋 POST /auth/logout - username: {}", user.username);

    let mut removal = Cookie::build(SESSION_COOKIE, "").path("/").finish();
    removal.make_removal();

    HttpResponse::Ok().cookie(removal).json(serde_json::json!({
        "success": true,
        "message": "You have been logged out."
    }))
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Current user with saved skills", body = UserInfo),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_me(
    state: web::Data<AppState>,
    user: web::ReqData<AuthenticatedUser>,
) -> HttpResponse {
    log::info!("👤 GET /auth/me - user_id: {}", user.user_id);

    match auth_service::get_current_user(state.store.as_ref(), &user.user_id).await {
        Ok(record) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "user": UserInfo::from(&record)
        })),
        Err(e) => {
            log::error!("❌ Failed to get user: {}", e);
            auth_error(&e)
        }
    }
}

fn session_cookie<'c>(token: &str, session: &SessionConfig) -> Cookie<'c> {
    Cookie::build(SESSION_COOKIE, token.to_string())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(session.cookie_secure)
        .max_age(CookieDuration::hours(session.ttl_hours))
        .finish()
}

fn auth_error(e: &AppError) -> HttpResponse {
    HttpResponse::build(e.status_code()).json(serde_json::json!({
        "success": false,
        "error": e.message()
    }))
}
