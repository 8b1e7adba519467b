use actix_web::{web, HttpResponse, ResponseError};

use crate::api::ConfirmQuery;
use crate::middleware::auth::Claims;
use crate::models::{PaymentMethod, PaymentMethodRequest};
use crate::services::payment_method_service;
use crate::storage::Repository;

#[utoipa::path(
    get,
    path = "/api/v1/me/payment-methods",
    tag = "Payment Methods",
    responses(
        (status = 200, description = "Stored cards and mobile money wallets", body = Vec<PaymentMethod>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_methods(user: web::ReqData<Claims>, repo: web::Data<Repository>) -> HttpResponse {
    log::info!("💳 GET /me/payment-methods - {}", user.sub);

    match payment_method_service::list_methods(&repo, &user.sub).await {
        Ok(methods) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "count": methods.len(),
            "paymentMethods": methods
        })),
        Err(e) => e.error_response(),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/me/payment-methods",
    tag = "Payment Methods",
    request_body = PaymentMethodRequest,
    responses(
        (status = 201, description = "Payment method saved", body = PaymentMethod)
    ),
    security(("bearer_auth" = []))
)]
pub async fn add_method(
    user: web::ReqData<Claims>,
    repo: web::Data<Repository>,
    request: web::Json<PaymentMethodRequest>,
) -> HttpResponse {
    log::info!("💳 POST /me/payment-methods - {}", user.sub);

    match payment_method_service::add_method(&repo, &user.sub, request.into_inner()).await {
        Ok(method) => HttpResponse::Created().json(serde_json::json!({ "success": true, "paymentMethod": method })),
        Err(e) => {
            log::warn!("❌ Saving payment method failed: {}", e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/me/payment-methods/{method_id}",
    tag = "Payment Methods",
    params(("method_id" = String, Path, description = "Payment method id")),
    request_body = PaymentMethodRequest,
    responses(
        (status = 200, description = "Payment method replaced", body = PaymentMethod),
        (status = 404, description = "Unknown payment method")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_method(
    user: web::ReqData<Claims>,
    repo: web::Data<Repository>,
    path: web::Path<String>,
    request: web::Json<PaymentMethodRequest>,
) -> HttpResponse {
    let method_id = path.into_inner();
    log::info!("✏️  PUT /me/payment-methods/{}", method_id);

    match payment_method_service::update_method(&repo, &user.sub, &method_id, request.into_inner()).await {
        Ok(method) => HttpResponse::Ok().json(serde_json::json!({ "success": true, "paymentMethod": method })),
        Err(e) => {
            log::warn!("❌ Updating payment method failed: {}", e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/me/payment-methods/{method_id}",
    tag = "Payment Methods",
    params(("method_id" = String, Path, description = "Payment method id"), ConfirmQuery),
    responses(
        (status = 200, description = "Payment method removed"),
        (status = 428, description = "Missing confirm=true")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_method(
    user: web::ReqData<Claims>,
    repo: web::Data<Repository>,
    path: web::Path<String>,
    query: web::Query<ConfirmQuery>,
) -> HttpResponse {
    let method_id = path.into_inner();
    log::info!("🗑️  DELETE /me/payment-methods/{}", method_id);

    match payment_method_service::delete_method(&repo, &user.sub, &method_id, query.confirmed()).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": "Payment method removed"
        })),
        Err(e) => {
            log::warn!("❌ Removing payment method refused: {}", e);
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
    async fn wallet_lifecycle() {
        let state = TestState::new();
        let token = state.token_for("kofi@example.com", AuthMethod::Email).await;
        let app = test::init_service(App::new().configure(state.register()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/api/v1/me/payment-methods")
            .insert_header(bearer(&token))
            .set_json(json!({ "type": "Mobile Money", "phoneNumber": "0244123456", "network": "Vodafone" }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["paymentMethod"]["provider"], "Vodafone Mobile Money");
        let id = body["paymentMethod"]["id"].as_str().unwrap().to_string();

        let uri = format!("/api/v1/me/payment-methods/{}", id);
        let req = test::TestRequest::delete().uri(&uri).insert_header(bearer(&token)).to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::PRECONDITION_REQUIRED);

        let req = test::TestRequest::delete()
            .uri(&format!("{}?confirm=true", uri))
            .insert_header(bearer(&token))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri("/api/v1/me/payment-methods")
            .insert_header(bearer(&token))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["count"], 0);
    }
}
