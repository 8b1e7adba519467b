pub mod assistant;
pub mod auth;
pub mod clubs;
pub mod health;
pub mod me;
pub mod members;
pub mod payment_methods;
pub mod swagger;

use actix_web::web;
use serde::Deserialize;

use crate::middleware::AuthMiddleware;

/// `?confirm=true` on destructive endpoints
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ConfirmQuery {
    /// Must be `true` for the action to go through
    pub confirm: Option<bool>,
}

impl ConfirmQuery {
    pub fn confirmed(&self) -> bool {
        self.confirm.unwrap_or(false)
    }
}

/// Every route of the service. Shared by the server and the handler tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/api/v1/auth")
                .route("/login", web::post().to(auth::login))
                .service(
                    web::resource("/logout")
                        .wrap(AuthMiddleware)
                        .route(web::post().to(auth::logout)),
                )
                .service(
                    web::resource("/session")
                        .wrap(AuthMiddleware)
                        .route(web::get().to(auth::session)),
                )
                .route("/verify", web::get().to(auth::verify_token)),
        )
        .service(
            web::scope("/api/v1/clubs")
                .wrap(AuthMiddleware)
                .route("", web::get().to(clubs::list_clubs))
                .route("", web::post().to(clubs::create_club))
                .route("/{club_id}", web::get().to(clubs::get_club))
                .route("/{club_id}", web::put().to(clubs::update_club))
                .route("/{club_id}", web::delete().to(clubs::delete_club))
                .route("/{club_id}/analysis", web::get().to(assistant::club_analysis))
                .route("/{club_id}/payment-items", web::post().to(clubs::add_payment_item))
                .route("/{club_id}/payment-items/{item_id}", web::put().to(clubs::update_payment_item))
                .route("/{club_id}/payment-items/{item_id}", web::delete().to(clubs::delete_payment_item))
                .route("/{club_id}/members", web::get().to(members::list_members))
                .route("/{club_id}/members", web::post().to(members::add_member))
                .route("/{club_id}/members/{member_id}", web::put().to(members::update_member))
                .route("/{club_id}/members/{member_id}", web::delete().to(members::delete_member))
                .route("/{club_id}/members/{member_id}/block", web::post().to(members::block_member))
                .route("/{club_id}/members/{member_id}/unblock", web::post().to(members::unblock_member)),
        )
        .service(
            web::scope("/api/v1/me")
                .wrap(AuthMiddleware)
                .route("", web::get().to(me::profile))
                .route("/compact", web::post().to(me::compact))
                .route("/clubs/{club_id}/join", web::post().to(me::join_club))
                .route("/clubs/{club_id}/ledger", web::get().to(me::ledger))
                .route("/clubs/{club_id}/subscriptions/{item_id}/toggle", web::post().to(me::toggle_subscription))
                .route("/clubs/{club_id}/custom-amounts/{item_id}", web::put().to(me::set_custom_amount))
                .route("/payment-methods", web::get().to(payment_methods::list_methods))
                .route("/payment-methods", web::post().to(payment_methods::add_method))
                .route("/payment-methods/{method_id}", web::put().to(payment_methods::update_method))
                .route("/payment-methods/{method_id}", web::delete().to(payment_methods::delete_method)),
        )
        .service(
            web::scope("/api/v1/assistant")
                .wrap(AuthMiddleware)
                .route("/announcement", web::post().to(assistant::announcement)),
        );
}
