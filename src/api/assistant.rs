use actix_web::{web, HttpResponse, ResponseError};

use crate::middleware::auth::Claims;
use crate::services::assistant_service::AnnouncementRequest;
use crate::services::{club_service, AssistantClient};
use crate::storage::Repository;

#[utoipa::path(
    post,
    path = "/api/v1/assistant/announcement",
    tag = "Assistant",
    request_body = AnnouncementRequest,
    responses(
        (status = 200, description = "Drafted message, or a fallback text when generation is unavailable")
    ),
    security(("bearer_auth" = []))
)]
pub async fn announcement(
    user: web::ReqData<Claims>,
    assistant: web::Data<AssistantClient>,
    request: web::Json<AnnouncementRequest>,
) -> HttpResponse {
    log::info!("📝 POST /assistant/announcement - {} ({})", request.topic, user.sub);

    let text = assistant.announcement(&request).await;
    HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "text": text
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/clubs/{club_id}/analysis",
    tag = "Assistant",
    params(("club_id" = String, Path, description = "Club id")),
    responses(
        (status = 200, description = "Advice on the club's stats snapshot"),
        (status = 403, description = "Caller is not an admin of the club")
    ),
    security(("bearer_auth" = []))
)]
pub async fn club_analysis(
    user: web::ReqData<Claims>,
    repo: web::Data<Repository>,
    assistant: web::Data<AssistantClient>,
    path: web::Path<String>,
) -> HttpResponse {
    let club_id = path.into_inner();
    log::info!("📈 GET /clubs/{}/analysis", club_id);

    let stats = match club_service::club_stats(&repo, &user.sub, &club_id).await {
        Ok(stats) => stats,
        Err(e) => {
            log::warn!("❌ {}", e);
            return e.error_response();
        }
    };

    let analysis = assistant.financial_analysis(&stats).await;
    HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "clubId": club_id,
        "stats": stats,
        "analysis": analysis
    }))
}

#[cfg(test)]
mod tests {
    use crate::api::configure;
    use crate::api::test_support::{bearer, TestState};
    use crate::services::assistant_service::{ANALYSIS_FAILED, ANNOUNCEMENT_FAILED};
    use actix_web::{test, App};
    use serde_json::{json, Value};

    #[actix_web::test]
    async fn unconfigured_assistant_answers_with_fallbacks() {
        let state = TestState::new();
        let admin = state.admin_token().await;
        let app = test::init_service(App::new().configure(state.register()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/api/v1/assistant/announcement")
            .insert_header(bearer(&admin))
            .set_json(json!({ "topic": "Payment Reminder", "tone": "Polite" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["text"], ANNOUNCEMENT_FAILED);

        let req = test::TestRequest::get()
            .uri("/api/v1/clubs/c2/analysis")
            .insert_header(bearer(&admin))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["analysis"], ANALYSIS_FAILED);
        assert_eq!(body["stats"]["totalMembers"], 85);
    }
}
