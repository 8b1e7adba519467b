use serde::{Deserialize, Serialize};

/// Stored payment method. Type-specific fields live in `details`, so a card
/// can never carry a network and a wallet can never carry a card number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct PaymentMethod {
    pub id: String,
    /// e.g. "Visa", "MTN Mobile Money"
    pub provider: String,
    #[serde(flatten)]
    pub details: PaymentMethodDetails,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(tag = "type")]
pub enum PaymentMethodDetails {
    #[serde(rename_all = "camelCase")]
    Card {
        last4: String,
        expiry_date: String,
        card_holder: String,
    },
    #[serde(rename = "Mobile Money", rename_all = "camelCase")]
    MobileMoney {
        phone_number: String,
        network: String,
    },
}

/// Form payload for adding or editing a payment method
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(tag = "type")]
pub enum PaymentMethodRequest {
    #[serde(rename_all = "camelCase")]
    Card {
        card_number: String,
        expiry_date: String,
        card_holder: String,
    },
    #[serde(rename = "Mobile Money", rename_all = "camelCase")]
    MobileMoney {
        phone_number: String,
        network: String,
    },
}

impl PaymentMethodRequest {
    /// Builds the stored record. Only the last four card digits are kept;
    /// a masked edit form (e.g. "•••• 4242") still yields "4242".
    pub fn into_method(self, id: String, previous: Option<&PaymentMethod>) -> PaymentMethod {
        match self {
            PaymentMethodRequest::Card {
                card_number,
                expiry_date,
                card_holder,
            } => {
                let digits: Vec<char> = card_number.chars().filter(|c| c.is_ascii_digit()).collect();
                let last4 = if digits.len() >= 4 {
                    digits[digits.len() - 4..].iter().collect()
                } else {
                    match previous.map(|m| &m.details) {
                        Some(PaymentMethodDetails::Card { last4, .. }) => last4.clone(),
                        _ => "0000".to_string(),
                    }
                };
                PaymentMethod {
                    id,
                    provider: "Visa".to_string(),
                    details: PaymentMethodDetails::Card {
                        last4,
                        expiry_date,
                        card_holder,
                    },
                }
            }
            PaymentMethodRequest::MobileMoney {
                phone_number,
                network,
            } => PaymentMethod {
                id,
                provider: format!("{} Mobile Money", network),
                details: PaymentMethodDetails::MobileMoney {
                    phone_number,
                    network,
                },
            },
        }
    }
}
