use actix_web::{web, HttpResponse, ResponseError};
use serde::Deserialize;

use crate::middleware::auth::Claims;
use crate::models::User;
use crate::services::ledger::LedgerView;
use crate::services::subscription_service;
use crate::storage::Repository;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CustomAmountRequest {
    pub amount: f64,
}

#[utoipa::path(
    get,
    path = "/api/v1/me",
    tag = "Me",
    responses(
        (status = 200, description = "Full profile of the caller", body = User)
    ),
    security(("bearer_auth" = []))
)]
pub async fn profile(user: web::ReqData<Claims>, repo: web::Data<Repository>) -> HttpResponse {
    log::info!("👤 GET /me - {}", user.sub);

    match subscription_service::profile(&repo, &user.sub).await {
        Ok(profile) => HttpResponse::Ok().json(serde_json::json!({ "success": true, "user": profile })),
        Err(e) => e.error_response(),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/me/compact",
    tag = "Me",
    responses(
        (status = 200, description = "References to deleted clubs and items dropped", body = User)
    ),
    security(("bearer_auth" = []))
)]
pub async fn compact(user: web::ReqData<Claims>, repo: web::Data<Repository>) -> HttpResponse {
    log::info!("🧹 POST /me/compact - {}", user.sub);

    match subscription_service::compact(&repo, &user.sub).await {
        Ok(profile) => HttpResponse::Ok().json(serde_json::json!({ "success": true, "user": profile })),
        Err(e) => e.error_response(),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/me/clubs/{club_id}/join",
    tag = "Me",
    params(("club_id" = String, Path, description = "Club id")),
    responses(
        (status = 200, description = "Club joined, compulsory items added", body = User),
        (status = 404, description = "Club not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn join_club(
    user: web::ReqData<Claims>,
    repo: web::Data<Repository>,
    path: web::Path<String>,
) -> HttpResponse {
    let club_id = path.into_inner();
    log::info!("🤝 POST /me/clubs/{}/join - {}", club_id, user.sub);

    match subscription_service::join_club(&repo, &user.sub, &club_id).await {
        Ok(profile) => HttpResponse::Ok().json(serde_json::json!({ "success": true, "user": profile })),
        Err(e) => {
            log::warn!("❌ Join failed: {}", e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/me/clubs/{club_id}/ledger",
    tag = "Me",
    params(("club_id" = String, Path, description = "Club id")),
    responses(
        (status = 200, description = "Subscription state per payment item and the total owed", body = LedgerView),
        (status = 404, description = "Club not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn ledger(
    user: web::ReqData<Claims>,
    repo: web::Data<Repository>,
    path: web::Path<String>,
) -> HttpResponse {
    let club_id = path.into_inner();
    log::info!("📒 GET /me/clubs/{}/ledger - {}", club_id, user.sub);

    match subscription_service::ledger(&repo, &user.sub, &club_id).await {
        Ok(view) => HttpResponse::Ok().json(serde_json::json!({ "success": true, "ledger": view })),
        Err(e) => {
            log::warn!("❌ {}", e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/me/clubs/{club_id}/subscriptions/{item_id}/toggle",
    tag = "Me",
    params(
        ("club_id" = String, Path, description = "Club id"),
        ("item_id" = String, Path, description = "Payment item id")
    ),
    responses(
        (status = 200, description = "Subscription flipped", body = LedgerView),
        (status = 409, description = "Compulsory items cannot be toggled")
    ),
    security(("bearer_auth" = []))
)]
pub async fn toggle_subscription(
    user: web::ReqData<Claims>,
    repo: web::Data<Repository>,
    path: web::Path<(String, String)>,
) -> HttpResponse {
    let (club_id, item_id) = path.into_inner();
    log::info!("🔀 POST /me/clubs/{}/subscriptions/{}/toggle", club_id, item_id);

    match subscription_service::toggle(&repo, &user.sub, &club_id, &item_id).await {
        Ok(view) => HttpResponse::Ok().json(serde_json::json!({ "success": true, "ledger": view })),
        Err(e) => {
            log::warn!("❌ Toggle refused: {}", e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/me/clubs/{club_id}/custom-amounts/{item_id}",
    tag = "Me",
    params(
        ("club_id" = String, Path, description = "Club id"),
        ("item_id" = String, Path, description = "Payment item id")
    ),
    request_body = CustomAmountRequest,
    responses(
        (status = 200, description = "Custom amount stored", body = LedgerView),
        (status = 400, description = "Item has a fixed amount or amount is below the minimum")
    ),
    security(("bearer_auth" = []))
)]
pub async fn set_custom_amount(
    user: web::ReqData<Claims>,
    repo: web::Data<Repository>,
    path: web::Path<(String, String)>,
    request: web::Json<CustomAmountRequest>,
) -> HttpResponse {
    let (club_id, item_id) = path.into_inner();
    log::info!("💰 PUT /me/clubs/{}/custom-amounts/{} - {}", club_id, item_id, request.amount);

    match subscription_service::set_custom_amount(&repo, &user.sub, &club_id, &item_id, request.amount).await {
        Ok(view) => HttpResponse::Ok().json(serde_json::json!({ "success": true, "ledger": view })),
        Err(e) => {
            log::warn!("❌ Custom amount refused: {}", e);
            e.error_response()
        }
    }
}
