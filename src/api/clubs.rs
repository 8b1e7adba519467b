use actix_web::{web, HttpResponse, ResponseError};

use crate::api::ConfirmQuery;
use crate::middleware::auth::Claims;
use crate::models::{Club, ClubSummary, CreateClubRequest, PaymentItem, PaymentItemRequest, UpdateClubRequest};
use crate::services::club_service;
use crate::storage::Repository;

#[utoipa::path(
    get,
    path = "/api/v1/clubs",
    tag = "Clubs",
    responses(
        (status = 200, description = "All clubs with the caller's role in each", body = Vec<ClubSummary>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_clubs(user: web::ReqData<Claims>, repo: web::Data<Repository>) -> HttpResponse {
    log::info!("🏛️  GET /clubs - user {}", user.sub);

    match club_service::list_clubs(&repo, &user.sub).await {
        Ok(clubs) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "count": clubs.len(),
            "clubs": clubs
        })),
        Err(e) => e.error_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/clubs/{club_id}",
    tag = "Clubs",
    params(("club_id" = String, Path, description = "Club id")),
    responses(
        (status = 200, description = "Club details", body = ClubSummary),
        (status = 404, description = "Club not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_club(
    user: web::ReqData<Claims>,
    repo: web::Data<Repository>,
    path: web::Path<String>,
) -> HttpResponse {
    let club_id = path.into_inner();
    log::info!("🏛️  GET /clubs/{}", club_id);

    match club_service::get_club(&repo, &user.sub, &club_id).await {
        Ok(club) => HttpResponse::Ok().json(serde_json::json!({ "success": true, "club": club })),
        Err(e) => {
            log::warn!("❌ {}", e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/clubs",
    tag = "Clubs",
    request_body = CreateClubRequest,
    responses(
        (status = 201, description = "Club created, caller is its admin", body = Club)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_club(
    user: web::ReqData<Claims>,
    repo: web::Data<Repository>,
    request: web::Json<CreateClubRequest>,
) -> HttpResponse {
    log::info!("🆕 POST /clubs - user {}", user.sub);

    match club_service::create_club(&repo, &user.sub, request.into_inner()).await {
        Ok(club) => HttpResponse::Created().json(serde_json::json!({ "success": true, "club": club })),
        Err(e) => {
            log::warn!("❌ Club creation failed: {}", e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/clubs/{club_id}",
    tag = "Clubs",
    params(("club_id" = String, Path, description = "Club id")),
    request_body = UpdateClubRequest,
    responses(
        (status = 200, description = "Club settings updated", body = Club),
        (status = 403, description = "Caller is not an admin of the club")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_club(
    user: web::ReqData<Claims>,
    repo: web::Data<Repository>,
    path: web::Path<String>,
    request: web::Json<UpdateClubRequest>,
) -> HttpResponse {
    let club_id = path.into_inner();
    log::info!("✏️  PUT /clubs/{}", club_id);

    match club_service::update_club(&repo, &user.sub, &club_id, request.into_inner()).await {
        Ok(club) => HttpResponse::Ok().json(serde_json::json!({ "success": true, "club": club })),
        Err(e) => {
            log::warn!("❌ Club update failed: {}", e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/clubs/{club_id}",
    tag = "Clubs",
    params(("club_id" = String, Path, description = "Club id"), ConfirmQuery),
    responses(
        (status = 200, description = "Club deleted"),
        (status = 428, description = "Missing confirm=true")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_club(
    user: web::ReqData<Claims>,
    repo: web::Data<Repository>,
    path: web::Path<String>,
    query: web::Query<ConfirmQuery>,
) -> HttpResponse {
    let club_id = path.into_inner();
    log::info!("🗑️  DELETE /clubs/{} (confirm={})", club_id, query.confirmed());

    match club_service::delete_club(&repo, &user.sub, &club_id, query.confirmed()).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": format!("Club {} deleted", club_id)
        })),
        Err(e) => {
            log::warn!("❌ Club deletion refused: {}", e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/clubs/{club_id}/payment-items",
    tag = "Clubs",
    params(("club_id" = String, Path, description = "Club id")),
    request_body = PaymentItemRequest,
    responses(
        (status = 201, description = "Payment plan added", body = PaymentItem),
        (status = 400, description = "Invalid amount or title")
    ),
    security(("bearer_auth" = []))
)]
pub async fn add_payment_item(
    user: web::ReqData<Claims>,
    repo: web::Data<Repository>,
    path: web::Path<String>,
    request: web::Json<PaymentItemRequest>,
) -> HttpResponse {
    let club_id = path.into_inner();
    log::info!("➕ POST /clubs/{}/payment-items - {}", club_id, request.title);

    match club_service::add_payment_item(&repo, &user.sub, &club_id, request.into_inner()).await {
        Ok(item) => HttpResponse::Created().json(serde_json::json!({ "success": true, "item": item })),
        Err(e) => {
            log::warn!("❌ Adding payment plan failed: {}", e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/clubs/{club_id}/payment-items/{item_id}",
    tag = "Clubs",
    params(
        ("club_id" = String, Path, description = "Club id"),
        ("item_id" = String, Path, description = "Payment item id")
    ),
    request_body = PaymentItemRequest,
    responses(
        (status = 200, description = "Payment plan updated", body = PaymentItem),
        (status = 404, description = "Unknown club or item")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_payment_item(
    user: web::ReqData<Claims>,
    repo: web::Data<Repository>,
    path: web::Path<(String, String)>,
    request: web::Json<PaymentItemRequest>,
) -> HttpResponse {
    let (club_id, item_id) = path.into_inner();
    log::info!("✏️  PUT /clubs/{}/payment-items/{}", club_id, item_id);

    match club_service::update_payment_item(&repo, &user.sub, &club_id, &item_id, request.into_inner()).await {
        Ok(item) => HttpResponse::Ok().json(serde_json::json!({ "success": true, "item": item })),
        Err(e) => {
            log::warn!("❌ Updating payment plan failed: {}", e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/clubs/{club_id}/payment-items/{item_id}",
    tag = "Clubs",
    params(
        ("club_id" = String, Path, description = "Club id"),
        ("item_id" = String, Path, description = "Payment item id"),
        ConfirmQuery
    ),
    responses(
        (status = 200, description = "Payment plan removed"),
        (status = 428, description = "Missing confirm=true")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_payment_item(
    user: web::ReqData<Claims>,
    repo: web::Data<Repository>,
    path: web::Path<(String, String)>,
    query: web::Query<ConfirmQuery>,
) -> HttpResponse {
    let (club_id, item_id) = path.into_inner();
    log::info!("🗑️  DELETE /clubs/{}/payment-items/{}", club_id, item_id);

    match club_service::delete_payment_item(&repo, &user.sub, &club_id, &item_id, query.confirmed()).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": format!("Payment item {} removed", item_id)
        })),
        Err(e) => {
            log::warn!("❌ Removing payment plan refused: {}", e);
            e.error_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::api::configure;
    use crate::api::test_support::{bearer, TestState};
    use crate::models::AuthMethod;
    use actix_web::{http::StatusCode, test, App};
    use serde_json::{json, Value};

    #[actix_web::test]
    async fn listing_reports_role_per_club() {
        let state = TestState::new();
        let admin = state.admin_token().await;
        let member = state.token_for("ama@example.com", AuthMethod::Email).await;
        let app = test::init_service(App::new().configure(state.register()).configure(configure)).await;

        let req = test::TestRequest::get().uri("/api/v1/clubs").insert_header(bearer(&admin)).to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["count"], 2);
        assert_eq!(body["clubs"][0]["role"], "admin");
        assert_eq!(body["clubs"][0]["logoColor"], "bg-orange-600");

        let req = test::TestRequest::get().uri("/api/v1/clubs").insert_header(bearer(&member)).to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["clubs"][1]["role"], "member");
    }

    #[actix_web::test]
    async fn non_admin_cannot_add_payment_item() {
        let state = TestState::new();
        let member = state.token_for("ama@example.com", AuthMethod::Email).await;
        let app = test::init_service(App::new().configure(state.register()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/api/v1/clubs/c1/payment-items")
            .insert_header(bearer(&member))
            .set_json(json!({ "title": "Levy", "amount": 5.0, "frequency": "Yearly" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn deleting_club_needs_confirm_flag() {
        let state = TestState::new();
        let admin = state.admin_token().await;
        let app = test::init_service(App::new().configure(state.register()).configure(configure)).await;

        let req = test::TestRequest::delete().uri("/api/v1/clubs/c2").insert_header(bearer(&admin)).to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::PRECONDITION_REQUIRED);
        assert!(state.repo.club("c2").await.unwrap().is_some());

        let req = test::TestRequest::delete()
            .uri("/api/v1/clubs/c2?confirm=true")
            .insert_header(bearer(&admin))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
        assert!(state.repo.club("c2").await.unwrap().is_none());
    }

    #[actix_web::test]
    async fn created_club_uses_defaults() {
        let state = TestState::new();
        let token = state.token_for("0244123456", AuthMethod::Phone).await;
        let app = test::init_service(App::new().configure(state.register()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/api/v1/clubs")
            .insert_header(bearer(&token))
            .set_json(json!({}))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["club"]["name"], "User 3456's Club");
        assert_eq!(body["club"]["logoColor"], "bg-indigo-600");
    }
}
