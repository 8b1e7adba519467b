use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::PaymentMethod;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AuthMethod {
    Email,
    Phone,
    Google,
}

/// Role the user asked for when signing in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Member,
}

/// club id -> subscribed payment item ids
pub type Subscriptions = BTreeMap<String, BTreeSet<String>>;
/// club id -> payment item id -> chosen amount
pub type CustomAmounts = BTreeMap<String, BTreeMap<String, f64>>;

/// Authenticated account with cross-club subscription state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    pub auth_method: AuthMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    #[serde(default)]
    pub joined_clubs: Vec<String>,
    #[serde(default)]
    pub payment_methods: Vec<PaymentMethod>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub subscriptions: Subscriptions,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub custom_amounts: CustomAmounts,
}

impl User {
    pub fn subscribed_items(&self, club_id: &str) -> Option<&BTreeSet<String>> {
        self.subscriptions.get(club_id)
    }

    pub fn is_subscribed(&self, club_id: &str, item_id: &str) -> bool {
        self.subscriptions
            .get(club_id)
            .map(|items| items.contains(item_id))
            .unwrap_or(false)
    }

    pub fn custom_amount(&self, club_id: &str, item_id: &str) -> Option<f64> {
        self.custom_amounts
            .get(club_id)
            .and_then(|amounts| amounts.get(item_id))
            .copied()
    }
}
