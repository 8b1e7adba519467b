use actix_web::{web, HttpRequest, HttpResponse, ResponseError};

use crate::config::AppConfig;
use crate::middleware::auth::{bearer_token, Claims};
use crate::services::auth_service::{self, AuthResponse, LoginRequest, UserInfo};
use crate::storage::Repository;

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Malformed phone number or email")
    )
)]
pub async fn login(
    repo: web::Data<Repository>,
    config: web::Data<AppConfig>,
    request: web::Json<LoginRequest>,
) -> HttpResponse {
    log::info!("🔐 POST /auth/login - {:?}: {}", request.method, request.identifier);

    match auth_service::login(&repo, &config.jwt, &request).await {
        Ok(response) => {
            log::info!("✅ Login successful: {}", response.user.id);
            HttpResponse::Ok().json(response)
        }
        Err(e) => {
            log::warn!("❌ Login failed: {} - {}", request.identifier, e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    tag = "Auth",
    responses(
        (status = 200, description = "Caller's session cleared"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn logout(user: web::ReqData<Claims>, repo: web::Data<Repository>) -> HttpResponse {
    log::info!("👋 POST /auth/logout - {}", user.sub);

    match auth_service::logout(&repo, &user.sub).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": "Logged out"
        })),
        Err(e) => e.error_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/session",
    tag = "Auth",
    responses(
        (status = 200, description = "User of the current session", body = UserInfo),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Caller does not hold the current session")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn session(user: web::ReqData<Claims>, repo: web::Data<Repository>) -> HttpResponse {
    log::info!("👤 GET /auth/session - {}", user.sub);

    match auth_service::current_session(&repo, &user.sub).await {
        Ok(user) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "user": UserInfo::from(&user)
        })),
        Err(e) => {
            log::info!("ℹ️  {}", e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/verify",
    tag = "Auth",
    responses(
        (status = 200, description = "Token is valid"),
        (status = 400, description = "No bearer token supplied"),
        (status = 401, description = "Invalid or expired token")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn verify_token(req: HttpRequest, config: web::Data<AppConfig>) -> HttpResponse {
    log::info!("✓ GET /auth/verify");

    let Some(token) = bearer_token(&req) else {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "success": false,
            "error": "No valid Authorization header"
        }));
    };

    match auth_service::verify_token(&token, &config.jwt) {
        Ok(claims) => {
            log::info!("✅ Token valid for user: {}", claims.sub);
            HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "valid": true,
                "user_id": claims.sub,
                "name": claims.name,
                "exp": claims.exp
            }))
        }
        Err(e) => {
            log::warn!("❌ Invalid token: {}", e);
            HttpResponse::Unauthorized().json(serde_json::json!({
                "success": false,
                "valid": false,
                "error": e.to_string()
            }))
        }
    }
}
