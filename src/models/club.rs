use serde::{Deserialize, Serialize};

/// Billing cycle of a payment item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub enum PaymentFrequency {
    #[serde(rename = "One Time")]
    OneTime,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Default for PaymentFrequency {
    fn default() -> Self {
        PaymentFrequency::Monthly
    }
}

/// A due or fee definition owned by one club
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentItem {
    pub id: String,
    pub title: String,
    /// Fixed amount, or the minimum when `allow_custom_amount` is set
    pub amount: f64,
    pub frequency: PaymentFrequency,
    pub is_compulsory: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_custom_amount: Option<bool>,
    #[serde(default)]
    pub description: String,
}

impl PaymentItem {
    pub fn allows_custom_amount(&self) -> bool {
        self.allow_custom_amount.unwrap_or(false)
    }
}

/// Informational snapshot, never recomputed from the ledger
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClubStats {
    pub total_members: u32,
    pub total_revenue: f64,
    pub pending_dues: f64,
    #[serde(default)]
    pub active_subscriptions: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Club {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub logo_color: String,
    /// Users allowed to manage this club
    #[serde(default)]
    pub admin_ids: Vec<String>,
    #[serde(default)]
    pub payment_items: Vec<PaymentItem>,
    #[serde(default)]
    pub stats: ClubStats,
}

impl Club {
    pub fn is_admin(&self, user_id: &str) -> bool {
        self.admin_ids.iter().any(|id| id == user_id)
    }

    pub fn payment_item(&self, item_id: &str) -> Option<&PaymentItem> {
        self.payment_items.iter().find(|item| item.id == item_id)
    }
}

/// Payload for creating a payment item (id is generated server-side)
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentItemRequest {
    pub title: String,
    pub amount: f64,
    #[serde(default)]
    pub frequency: PaymentFrequency,
    #[serde(default)]
    pub is_compulsory: bool,
    #[serde(default)]
    pub allow_custom_amount: Option<bool>,
    #[serde(default)]
    pub description: String,
}

impl PaymentItemRequest {
    pub fn into_item(self, id: String) -> PaymentItem {
        PaymentItem {
            id,
            title: self.title,
            amount: self.amount,
            frequency: self.frequency,
            is_compulsory: self.is_compulsory,
            allow_custom_amount: self.allow_custom_amount,
            description: self.description,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateClubRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub logo_color: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClubRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub logo_color: Option<String>,
}

/// Role the caller holds in a given club
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ClubRole {
    Admin,
    Member,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClubSummary {
    #[serde(flatten)]
    pub club: Club,
    pub role: ClubRole,
}

impl ClubSummary {
    pub fn for_user(club: Club, user_id: &str) -> Self {
        let role = if club.is_admin(user_id) {
            ClubRole::Admin
        } else {
            ClubRole::Member
        };
        Self { club, role }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_club() -> Club {
        Club {
            id: "c1".into(),
            name: "Youth Alive Ghana".into(),
            description: "Youth programs".into(),
            logo_color: "bg-orange-600".into(),
            admin_ids: vec!["admin-user".into()],
            payment_items: vec![
                PaymentItem {
                    id: "p1".into(),
                    title: "Monthly Dues".into(),
                    amount: 10.0,
                    frequency: PaymentFrequency::Monthly,
                    is_compulsory: true,
                    allow_custom_amount: None,
                    description: "Standard monthly membership contribution.".into(),
                },
                PaymentItem {
                    id: "p2".into(),
                    title: "Project Fund".into(),
                    amount: 50.0,
                    frequency: PaymentFrequency::OneTime,
                    is_compulsory: false,
                    allow_custom_amount: Some(true),
                    description: String::new(),
                },
            ],
            stats: ClubStats {
                total_members: 124,
                total_revenue: 4500.0,
                pending_dues: 230.0,
                active_subscriptions: 110,
            },
        }
    }

    #[test]
    fn club_list_survives_json_round_trip() {
        let clubs = vec![sample_club()];
        let json = serde_json::to_string(&clubs).unwrap();
        let back: Vec<Club> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, clubs);
    }

    #[test]
    fn uses_camel_case_and_display_frequency_names() {
        let value = serde_json::to_value(sample_club()).unwrap();
        assert_eq!(value["logoColor"], "bg-orange-600");
        assert_eq!(value["adminIds"][0], "admin-user");
        assert_eq!(value["paymentItems"][0]["isCompulsory"], true);
        assert_eq!(value["paymentItems"][1]["frequency"], "One Time");
        assert_eq!(value["paymentItems"][1]["allowCustomAmount"], true);
        assert!(value["paymentItems"][0].get("allowCustomAmount").is_none());
        assert_eq!(value["stats"]["pendingDues"], 230.0);
    }

    #[test]
    fn summary_reports_role_for_caller() {
        let admin = ClubSummary::for_user(sample_club(), "admin-user");
        let member = ClubSummary::for_user(sample_club(), "someone-else");
        assert_eq!(admin.role, ClubRole::Admin);
        assert_eq!(member.role, ClubRole::Member);

        let value = serde_json::to_value(&admin).unwrap();
        assert_eq!(value["role"], "admin");
        assert_eq!(value["id"], "c1");
    }
}
