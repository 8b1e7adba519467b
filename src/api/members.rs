use actix_web::{web, HttpResponse, ResponseError};

use crate::api::ConfirmQuery;
use crate::middleware::auth::Claims;
use crate::models::{Member, MemberRequest};
use crate::services::member_service;
use crate::storage::Repository;

#[utoipa::path(
    get,
    path = "/api/v1/clubs/{club_id}/members",
    tag = "Members",
    params(("club_id" = String, Path, description = "Club id")),
    responses(
        (status = 200, description = "Member roster", body = Vec<Member>),
        (status = 403, description = "Caller is not an admin of the club")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_members(
    user: web::ReqData<Claims>,
    repo: web::Data<Repository>,
    path: web::Path<String>,
) -> HttpResponse {
    let club_id = path.into_inner();
    log::info!("👥 GET /clubs/{}/members", club_id);

    match member_service::list_members(&repo, &user.sub, &club_id).await {
        Ok(members) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "count": members.len(),
            "members": members
        })),
        Err(e) => {
            log::warn!("❌ {}", e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/clubs/{club_id}/members",
    tag = "Members",
    params(("club_id" = String, Path, description = "Club id")),
    request_body = MemberRequest,
    responses(
        (status = 201, description = "Member added", body = Member)
    ),
    security(("bearer_auth" = []))
)]
pub async fn add_member(
    user: web::ReqData<Claims>,
    repo: web::Data<Repository>,
    path: web::Path<String>,
    request: web::Json<MemberRequest>,
) -> HttpResponse {
    let club_id = path.into_inner();
    log::info!("➕ POST /clubs/{}/members - {}", club_id, request.name);

    match member_service::add_member(&repo, &user.sub, &club_id, request.into_inner()).await {
        Ok(member) => HttpResponse::Created().json(serde_json::json!({ "success": true, "member": member })),
        Err(e) => {
            log::warn!("❌ Adding member failed: {}", e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/clubs/{club_id}/members/{member_id}",
    tag = "Members",
    params(
        ("club_id" = String, Path, description = "Club id"),
        ("member_id" = String, Path, description = "Member id")
    ),
    request_body = MemberRequest,
    responses(
        (status = 200, description = "Member updated", body = Member),
        (status = 404, description = "Unknown member")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_member(
    user: web::ReqData<Claims>,
    repo: web::Data<Repository>,
    path: web::Path<(String, String)>,
    request: web::Json<MemberRequest>,
) -> HttpResponse {
    let (club_id, member_id) = path.into_inner();
    log::info!("✏️  PUT /clubs/{}/members/{}", club_id, member_id);

    match member_service::update_member(&repo, &user.sub, &club_id, &member_id, request.into_inner()).await {
        Ok(member) => HttpResponse::Ok().json(serde_json::json!({ "success": true, "member": member })),
        Err(e) => {
            log::warn!("❌ Updating member failed: {}", e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/clubs/{club_id}/members/{member_id}",
    tag = "Members",
    params(
        ("club_id" = String, Path, description = "Club id"),
        ("member_id" = String, Path, description = "Member id"),
        ConfirmQuery
    ),
    responses(
        (status = 200, description = "Member removed"),
        (status = 428, description = "Missing confirm=true")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_member(
    user: web::ReqData<Claims>,
    repo: web::Data<Repository>,
    path: web::Path<(String, String)>,
    query: web::Query<ConfirmQuery>,
) -> HttpResponse {
    let (club_id, member_id) = path.into_inner();
    log::info!("🗑️  DELETE /clubs/{}/members/{}", club_id, member_id);

    match member_service::delete_member(&repo, &user.sub, &club_id, &member_id, query.confirmed()).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": format!("Member {} removed", member_id)
        })),
        Err(e) => {
            log::warn!("❌ Removing member refused: {}", e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/clubs/{club_id}/members/{member_id}/block",
    tag = "Members",
    params(
        ("club_id" = String, Path, description = "Club id"),
        ("member_id" = String, Path, description = "Member id"),
        ConfirmQuery
    ),
    responses(
        (status = 200, description = "Member blocked", body = Member),
        (status = 428, description = "Missing confirm=true")
    ),
    security(("bearer_auth" = []))
)]
pub async fn block_member(
    user: web::ReqData<Claims>,
    repo: web::Data<Repository>,
    path: web::Path<(String, String)>,
    query: web::Query<ConfirmQuery>,
) -> HttpResponse {
    let (club_id, member_id) = path.into_inner();
    log::info!("🔒 POST /clubs/{}/members/{}/block", club_id, member_id);
    set_blocked(&user.sub, &repo, &club_id, &member_id, true, query.confirmed()).await
}

#[utoipa::path(
    post,
    path = "/api/v1/clubs/{club_id}/members/{member_id}/unblock",
    tag = "Members",
    params(
        ("club_id" = String, Path, description = "Club id"),
        ("member_id" = String, Path, description = "Member id")
    ),
    responses(
        (status = 200, description = "Member active again", body = Member)
    ),
    security(("bearer_auth" = []))
)]
pub async fn unblock_member(
    user: web::ReqData<Claims>,
    repo: web::Data<Repository>,
    path: web::Path<(String, String)>,
) -> HttpResponse {
    let (club_id, member_id) = path.into_inner();
    log::info!("🔓 POST /clubs/{}/members/{}/unblock", club_id, member_id);
    set_blocked(&user.sub, &repo, &club_id, &member_id, false, false).await
}

async fn set_blocked(
    user_id: &str,
    repo: &Repository,
    club_id: &str,
    member_id: &str,
    blocked: bool,
    confirmed: bool,
) -> HttpResponse {
    match member_service::set_member_blocked(repo, user_id, club_id, member_id, blocked, confirmed).await {
        Ok(member) => HttpResponse::Ok().json(serde_json::json!({ "success": true, "member": member })),
        Err(e) => {
            log::warn!("❌ Status change refused: {}", e);
            e.error_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::api::configure;
    use crate::api::test_support::{bearer, TestState};
    use crate::models::{AuthMethod, MemberStatus};
    use actix_web::{http::StatusCode, test, App};
    use serde_json::{json, Value};

    #[actix_web::test]
    async fn admin_adds_and_blocks_member() {
        let state = TestState::new();
        let admin = state.admin_token().await;
        let app = test::init_service(App::new().configure(state.register()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/api/v1/clubs/c1/members")
            .insert_header(bearer(&admin))
            .set_json(json!({ "name": "Kwame Asante", "email": "kwame@example.com", "status": "Pending" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let id = body["member"]["id"].as_str().unwrap().to_string();

        let uri = format!("/api/v1/clubs/c1/members/{}/block", id);
        let req = test::TestRequest::post().uri(&uri).insert_header(bearer(&admin)).to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::PRECONDITION_REQUIRED);

        let req = test::TestRequest::post()
            .uri(&format!("{}?confirm=true", uri))
            .insert_header(bearer(&admin))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["member"]["status"], "Blocked");

        let stored = state.repo.members().await.unwrap();
        let member = stored.iter().find(|m| m.id == id).unwrap();
        assert_eq!(member.status, MemberStatus::Blocked);
    }

    #[actix_web::test]
    async fn roster_is_admin_only() {
        let state = TestState::new();
        let member = state.token_for("ama@example.com", AuthMethod::Email).await;
        let app = test::init_service(App::new().configure(state.register()).configure(configure)).await;

        let req = test::TestRequest::get()
            .uri("/api/v1/clubs/c1/members")
            .insert_header(bearer(&member))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);
    }
}
