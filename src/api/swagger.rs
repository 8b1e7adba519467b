use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Dues Service API",
        version = "1.0.0",
        description = "Club dues and subscriptions.\n\n**Authentication:** everything except health and the auth endpoints requires a JWT Bearer token from `/api/v1/auth/login`.\n\n**Destructive actions** (deleting clubs, payment plans, members or payment methods, blocking members) must be repeated with `?confirm=true`; otherwise the API answers 428."
    ),
    paths(
        crate::api::health::health_check,

        crate::api::auth::login,
        crate::api::auth::logout,
        crate::api::auth::session,
        crate::api::auth::verify_token,

        crate::api::clubs::list_clubs,
        crate::api::clubs::get_club,
        crate::api::clubs::create_club,
        crate::api::clubs::update_club,
        crate::api::clubs::delete_club,
        crate::api::clubs::add_payment_item,
        crate::api::clubs::update_payment_item,
        crate::api::clubs::delete_payment_item,

        crate::api::members::list_members,
        crate::api::members::add_member,
        crate::api::members::update_member,
        crate::api::members::delete_member,
        crate::api::members::block_member,
        crate::api::members::unblock_member,

        crate::api::me::profile,
        crate::api::me::compact,
        crate::api::me::join_club,
        crate::api::me::ledger,
        crate::api::me::toggle_subscription,
        crate::api::me::set_custom_amount,

        crate::api::payment_methods::list_methods,
        crate::api::payment_methods::add_method,
        crate::api::payment_methods::update_method,
        crate::api::payment_methods::delete_method,

        crate::api::assistant::announcement,
        crate::api::assistant::club_analysis,
    ),
    components(
        schemas(
            crate::api::health::HealthResponse,
            crate::api::me::CustomAmountRequest,
            crate::services::auth_service::LoginRequest,
            crate::services::auth_service::AuthResponse,
            crate::services::auth_service::UserInfo,
            crate::services::assistant_service::AnnouncementRequest,
            crate::services::ledger::LedgerView,
            crate::services::ledger::LedgerLine,
            crate::services::ledger::SubscriptionState,
            crate::models::Club,
            crate::models::ClubSummary,
            crate::models::ClubRole,
            crate::models::ClubStats,
            crate::models::PaymentItem,
            crate::models::PaymentFrequency,
            crate::models::PaymentItemRequest,
            crate::models::CreateClubRequest,
            crate::models::UpdateClubRequest,
            crate::models::Member,
            crate::models::MemberStatus,
            crate::models::MemberRequest,
            crate::models::User,
            crate::models::AuthMethod,
            crate::models::UserRole,
            crate::models::PaymentMethod,
            crate::models::PaymentMethodDetails,
            crate::models::PaymentMethodRequest,
        )
    ),
    tags(
        (name = "Health", description = "Liveness check."),
        (name = "Auth", description = "Passwordless sign-in by phone, email or Google, and the current session."),
        (name = "Clubs", description = "Clubs and their payment plans. Mutations need club admin rights."),
        (name = "Members", description = "Member roster management for club admins."),
        (name = "Me", description = "The caller's profile, joined clubs and subscription ledger."),
        (name = "Payment Methods", description = "Cards and mobile money wallets stored on the caller's profile."),
        (name = "Assistant", description = "Generated announcements and financial advice."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token from POST /api/v1/auth/login"))
                        .build(),
                ),
            );
        }
    }
}
