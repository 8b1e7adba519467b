pub mod assistant_service;
pub mod auth_service;
pub mod catalog;
pub mod club_service;
pub mod identity;
pub mod ledger;
pub mod member_service;
pub mod payment_method_service;
pub mod subscription_service;

pub use assistant_service::AssistantClient;
