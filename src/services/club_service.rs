use crate::models::{
    Club, ClubStats, ClubSummary, CreateClubRequest, PaymentItem, PaymentItemRequest, UpdateClubRequest,
};
use crate::services::{catalog, ledger};
use crate::storage::Repository;
use crate::utils::{require_confirmation, AppError, AppResult};

/// Club the caller administers, or why they can't touch it
pub(crate) fn admin_club_mut<'a>(
    clubs: &'a mut [Club],
    club_id: &str,
    user_id: &str,
) -> AppResult<&'a mut Club> {
    let club = clubs
        .iter_mut()
        .find(|c| c.id == club_id)
        .ok_or_else(|| AppError::NotFound(format!("Club {} not found", club_id)))?;
    if !club.is_admin(user_id) {
        return Err(AppError::Forbidden(format!("Only admins of {} can do this", club.name)));
    }
    Ok(club)
}

/// Pulls newly compulsory items into the ledgers of everyone holding
/// subscription state for the club. Caller must hold the repository lock.
async fn reconcile_subscribers(repo: &Repository, club: &Club) -> AppResult<usize> {
    let mut users = repo.users().await?;
    let mut changed = 0;

    for user in users.iter_mut() {
        let holds_state = user.subscriptions.contains_key(&club.id)
            || user.joined_clubs.iter().any(|id| id == &club.id);
        if !holds_state {
            continue;
        }
        let next = ledger::reconcile_compulsory(user, &club.id, &club.payment_items);
        if next != *user {
            *user = next;
            changed += 1;
        }
    }

    if changed > 0 {
        repo.save_users(&users).await?;
        log::info!("🔁 Reconciled compulsory items for {} users of club {}", changed, club.id);
    }
    Ok(changed)
}

pub async fn list_clubs(repo: &Repository, user_id: &str) -> AppResult<Vec<ClubSummary>> {
    Ok(repo
        .clubs()
        .await?
        .into_iter()
        .map(|club| ClubSummary::for_user(club, user_id))
        .collect())
}

pub async fn get_club(repo: &Repository, user_id: &str, club_id: &str) -> AppResult<ClubSummary> {
    repo.club(club_id)
        .await?
        .map(|club| ClubSummary::for_user(club, user_id))
        .ok_or_else(|| AppError::NotFound(format!("Club {} not found", club_id)))
}

/// Stats snapshot, shown to the club's admins only
pub async fn club_stats(repo: &Repository, user_id: &str, club_id: &str) -> AppResult<ClubStats> {
    let mut clubs = repo.clubs().await?;
    let club = admin_club_mut(&mut clubs, club_id, user_id)?;
    Ok(club.stats.clone())
}

pub async fn create_club(
    repo: &Repository,
    user_id: &str,
    request: CreateClubRequest,
) -> AppResult<Club> {
    let _guard = repo.lock().await;
    let creator = repo
        .user(user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized(format!("Unknown user {}", user_id)))?;

    let club = catalog::create_club(&creator, request);
    let mut clubs = repo.clubs().await?;
    clubs.push(club.clone());
    repo.save_clubs(&clubs).await?;

    log::info!("✅ Club {} created by {}", club.id, user_id);
    Ok(club)
}

pub async fn update_club(
    repo: &Repository,
    user_id: &str,
    club_id: &str,
    request: UpdateClubRequest,
) -> AppResult<Club> {
    let _guard = repo.lock().await;
    let mut clubs = repo.clubs().await?;
    let club = admin_club_mut(&mut clubs, club_id, user_id)?;
    catalog::update_club(club, request);
    let updated = club.clone();
    repo.save_clubs(&clubs).await?;
    Ok(updated)
}

/// Removes the club. Members' stale references to it are left as they are.
pub async fn delete_club(
    repo: &Repository,
    user_id: &str,
    club_id: &str,
    confirmed: bool,
) -> AppResult<()> {
    let _guard = repo.lock().await;
    let mut clubs = repo.clubs().await?;
    admin_club_mut(&mut clubs, club_id, user_id)?;
    require_confirmation(confirmed, "Deleting a club")?;

    catalog::delete_club(&mut clubs, club_id);
    repo.save_clubs(&clubs).await?;
    log::info!("🗑️ Club {} deleted by {}", club_id, user_id);
    Ok(())
}

pub async fn add_payment_item(
    repo: &Repository,
    user_id: &str,
    club_id: &str,
    request: PaymentItemRequest,
) -> AppResult<PaymentItem> {
    catalog::check_payment_item(&request).map_err(|e| AppError::InvalidRequest(e.into()))?;

    let _guard = repo.lock().await;
    let mut clubs = repo.clubs().await?;
    let club = admin_club_mut(&mut clubs, club_id, user_id)?;
    let item = catalog::add_payment_item(club, request);
    let snapshot = club.clone();

    // Subscribers first: a failed catalog save then only leaves stale ids behind
    if item.is_compulsory {
        reconcile_subscribers(repo, &snapshot).await?;
    }
    repo.save_clubs(&clubs).await?;
    Ok(item)
}

pub async fn update_payment_item(
    repo: &Repository,
    user_id: &str,
    club_id: &str,
    item_id: &str,
    request: PaymentItemRequest,
) -> AppResult<PaymentItem> {
    catalog::check_payment_item(&request).map_err(|e| AppError::InvalidRequest(e.into()))?;

    let _guard = repo.lock().await;
    let mut clubs = repo.clubs().await?;
    let club = admin_club_mut(&mut clubs, club_id, user_id)?;
    let item = catalog::update_payment_item(club, item_id, request)
        .ok_or_else(|| AppError::NotFound(format!("Payment item {} not found", item_id)))?;
    let snapshot = club.clone();

    if item.is_compulsory {
        reconcile_subscribers(repo, &snapshot).await?;
    }
    repo.save_clubs(&clubs).await?;
    Ok(item)
}

/// Removes the item from the catalog; subscriptions naming it go stale
pub async fn delete_payment_item(
    repo: &Repository,
    user_id: &str,
    club_id: &str,
    item_id: &str,
    confirmed: bool,
) -> AppResult<()> {
    let _guard = repo.lock().await;
    let mut clubs = repo.clubs().await?;
    let club = admin_club_mut(&mut clubs, club_id, user_id)?;
    if club.payment_item(item_id).is_none() {
        return Err(AppError::NotFound(format!("Payment item {} not found", item_id)));
    }
    require_confirmation(confirmed, "Deleting a payment plan")?;

    catalog::delete_payment_item(club, item_id);
    repo.save_clubs(&clubs).await?;
    Ok(())
}
