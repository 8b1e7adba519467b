use crate::models::{Club, User};
use crate::services::ledger::{self, LedgerView};
use crate::storage::Repository;
use crate::utils::{AppError, AppResult};

async fn load_user(repo: &Repository, user_id: &str) -> AppResult<User> {
    repo.user(user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized(format!("Unknown user {}", user_id)))
}

async fn load_club(repo: &Repository, club_id: &str) -> AppResult<Club> {
    repo.club(club_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Club {} not found", club_id)))
}

/// Persists `next` only when it differs from `current`
async fn store_if_changed(repo: &Repository, current: &User, next: &User) -> AppResult<bool> {
    if next == current {
        return Ok(false);
    }
    repo.save_user(next).await?;
    Ok(true)
}

pub async fn profile(repo: &Repository, user_id: &str) -> AppResult<User> {
    load_user(repo, user_id).await
}

pub async fn join_club(repo: &Repository, user_id: &str, club_id: &str) -> AppResult<User> {
    let _guard = repo.lock().await;
    let user = load_user(repo, user_id).await?;
    let club = load_club(repo, club_id).await?;

    let next = ledger::join_club(&user, &club.id, &club.payment_items);
    if store_if_changed(repo, &user, &next).await? {
        log::info!("✅ {} joined club {}", user_id, club_id);
    }
    Ok(next)
}

/// Opening the club page: compulsory items are reconciled and the result
/// written back if anything was added.
pub async fn ledger(repo: &Repository, user_id: &str, club_id: &str) -> AppResult<LedgerView> {
    let _guard = repo.lock().await;
    let user = load_user(repo, user_id).await?;
    let club = load_club(repo, club_id).await?;

    let next = ledger::reconcile_compulsory(&user, &club.id, &club.payment_items);
    if store_if_changed(repo, &user, &next).await? {
        log::info!("🔁 Added compulsory items of {} to {}", club_id, user_id);
    }
    Ok(ledger::ledger_view(&next, &club.id, &club.payment_items))
}

pub async fn toggle(
    repo: &Repository,
    user_id: &str,
    club_id: &str,
    item_id: &str,
) -> AppResult<LedgerView> {
    let _guard = repo.lock().await;
    let user = load_user(repo, user_id).await?;
    let club = load_club(repo, club_id).await?;
    let item = club
        .payment_item(item_id)
        .ok_or_else(|| AppError::NotFound(format!("Payment item {} not found", item_id)))?;

    if item.is_compulsory {
        return Err(AppError::Conflict(format!("{} is compulsory and cannot be toggled", item.title)));
    }

    let next = ledger::toggle_subscription(&user, &club.id, item_id, item.is_compulsory);
    store_if_changed(repo, &user, &next).await?;
    Ok(ledger::ledger_view(&next, &club.id, &club.payment_items))
}

pub async fn set_custom_amount(
    repo: &Repository,
    user_id: &str,
    club_id: &str,
    item_id: &str,
    amount: f64,
) -> AppResult<LedgerView> {
    let _guard = repo.lock().await;
    let user = load_user(repo, user_id).await?;
    let club = load_club(repo, club_id).await?;
    let item = club
        .payment_item(item_id)
        .ok_or_else(|| AppError::NotFound(format!("Payment item {} not found", item_id)))?;

    ledger::validate_custom_amount(item, amount)
        .map_err(|rejection| AppError::InvalidRequest(rejection.to_string()))?;

    let next = ledger::set_custom_amount(&user, &club.id, item_id, amount);
    store_if_changed(repo, &user, &next).await?;
    Ok(ledger::ledger_view(&next, &club.id, &club.payment_items))
}

/// Drops references to deleted clubs and items, on the user's request only
pub async fn compact(repo: &Repository, user_id: &str) -> AppResult<User> {
    let _guard = repo.lock().await;
    let user = load_user(repo, user_id).await?;
    let clubs = repo.clubs().await?;

    let next = ledger::compact_stale_references(&user, &clubs);
    if store_if_changed(repo, &user, &next).await? {
        log::info!("🧹 Compacted stale subscriptions of {}", user_id);
    }
    Ok(next)
}
