//! Per (user, club) subscription state.
//!
//! Every function here is pure: it takes a user record and returns a new
//! one, never fails, and never touches storage. A payment item is, for a
//! given user, either not subscribed, subscribed at its fixed amount, or
//! subscribed at a member-chosen amount. Compulsory items are pulled in by
//! [`reconcile_compulsory`] and can never be toggled off.
//!
//! Subscriptions may outlive the items and clubs they point to. Such stale
//! ids are tolerated everywhere and simply contribute nothing to totals.

use serde::Serialize;
use std::collections::BTreeSet;

use crate::models::{Club, PaymentItem, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum SubscriptionState {
    NotSubscribed,
    SubscribedFixed,
    SubscribedCustom,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LedgerLine {
    pub item: PaymentItem,
    pub state: SubscriptionState,
    /// Stored member choice, kept even while unsubscribed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_amount: Option<f64>,
    pub contribution: f64,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LedgerView {
    pub club_id: String,
    pub lines: Vec<LedgerLine>,
    pub total: f64,
}

/// Why a custom amount was refused at the input surface
#[derive(Debug, Clone, PartialEq)]
pub enum CustomAmountRejection {
    NotAllowed,
    NotFinite,
    BelowMinimum { minimum: f64 },
}

impl std::fmt::Display for CustomAmountRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CustomAmountRejection::NotAllowed => write!(f, "This payment item has a fixed amount"),
            CustomAmountRejection::NotFinite => write!(f, "Amount must be a number"),
            CustomAmountRejection::BelowMinimum { minimum } => {
                write!(f, "Amount must be at least {:.2}", minimum)
            }
        }
    }
}

/// Adds every compulsory catalog item missing from the user's club set.
/// Never removes anything; re-running with no new compulsory items is a no-op.
pub fn reconcile_compulsory(user: &User, club_id: &str, catalog: &[PaymentItem]) -> User {
    let mut next = user.clone();
    let missing: Vec<&PaymentItem> = catalog
        .iter()
        .filter(|item| item.is_compulsory && !user.is_subscribed(club_id, &item.id))
        .collect();

    if missing.is_empty() {
        return next;
    }

    let subscribed = next.subscriptions.entry(club_id.to_string()).or_default();
    for item in missing {
        subscribed.insert(item.id.clone());
    }
    next
}

/// Flips the item in the user's club set. Compulsory items are left alone.
pub fn toggle_subscription(user: &User, club_id: &str, item_id: &str, is_compulsory: bool) -> User {
    let mut next = user.clone();
    if is_compulsory {
        return next;
    }

    let subscribed = next.subscriptions.entry(club_id.to_string()).or_default();
    if !subscribed.remove(item_id) {
        subscribed.insert(item_id.to_string());
    }
    next
}

/// Records the chosen amount as given. Bounds are checked by the caller
/// through [`validate_custom_amount`].
pub fn set_custom_amount(user: &User, club_id: &str, item_id: &str, amount: f64) -> User {
    let mut next = user.clone();
    next.custom_amounts
        .entry(club_id.to_string())
        .or_default()
        .insert(item_id.to_string(), amount);
    next
}

/// What one catalog item contributes to the user's total
fn contribution(user: &User, club_id: &str, item: &PaymentItem) -> f64 {
    if !user.is_subscribed(club_id, &item.id) {
        return 0.0;
    }
    if item.allows_custom_amount() {
        user.custom_amount(club_id, &item.id).unwrap_or(item.amount)
    } else {
        item.amount
    }
}

/// Sum owed per billing cycle over the supplied catalog. Subscribed ids
/// missing from the catalog count for nothing.
pub fn compute_total(user: &User, club_id: &str, catalog: &[PaymentItem]) -> f64 {
    catalog.iter().map(|item| contribution(user, club_id, item)).sum()
}

pub fn ledger_view(user: &User, club_id: &str, catalog: &[PaymentItem]) -> LedgerView {
    let lines: Vec<LedgerLine> = catalog
        .iter()
        .map(|item| {
            let subscribed = user.is_subscribed(club_id, &item.id);
            let custom_amount = user.custom_amount(club_id, &item.id);
            let state = match (subscribed, item.allows_custom_amount() && custom_amount.is_some()) {
                (false, _) => SubscriptionState::NotSubscribed,
                (true, false) => SubscriptionState::SubscribedFixed,
                (true, true) => SubscriptionState::SubscribedCustom,
            };
            LedgerLine {
                item: item.clone(),
                state,
                custom_amount,
                contribution: contribution(user, club_id, item),
            }
        })
        .collect();

    LedgerView {
        club_id: club_id.to_string(),
        total: lines.iter().map(|l| l.contribution).sum(),
        lines,
    }
}

pub fn validate_custom_amount(item: &PaymentItem, amount: f64) -> Result<(), CustomAmountRejection> {
    if !item.allows_custom_amount() {
        return Err(CustomAmountRejection::NotAllowed);
    }
    if !amount.is_finite() {
        return Err(CustomAmountRejection::NotFinite);
    }
    if amount < item.amount {
        return Err(CustomAmountRejection::BelowMinimum { minimum: item.amount });
    }
    Ok(())
}

/// Adds the club to the user's joined list and pulls in compulsory items
pub fn join_club(user: &User, club_id: &str, catalog: &[PaymentItem]) -> User {
    let mut next = reconcile_compulsory(user, club_id, catalog);
    if !next.joined_clubs.iter().any(|id| id == club_id) {
        next.joined_clubs.push(club_id.to_string());
    }
    next
}

/// Drops subscription and custom-amount entries pointing at clubs or items
/// that no longer exist. Only run on explicit request.
pub fn compact_stale_references(user: &User, clubs: &[Club]) -> User {
    let mut next = user.clone();

    next.subscriptions.retain(|club_id, items| {
        let Some(club) = clubs.iter().find(|c| &c.id == club_id) else {
            return false;
        };
        let live: BTreeSet<String> = items
            .iter()
            .filter(|id| club.payment_item(id).is_some())
            .cloned()
            .collect();
        *items = live;
        true
    });

    next.custom_amounts.retain(|club_id, amounts| {
        let Some(club) = clubs.iter().find(|c| &c.id == club_id) else {
            return false;
        };
        amounts.retain(|item_id, _| club.payment_item(item_id).is_some());
        !amounts.is_empty()
    });

    next
}
