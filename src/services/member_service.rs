use crate::models::{Club, Member, MemberRequest, MemberStatus};
use crate::services::catalog;
use crate::storage::Repository;
use crate::utils::{require_confirmation, AppError, AppResult};

// The roster is shared across clubs; managing it requires admin rights on
// the club the request is scoped to.
async fn ensure_admin(repo: &Repository, club_id: &str, user_id: &str) -> AppResult<Club> {
    let club = repo
        .club(club_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Club {} not found", club_id)))?;
    if !club.is_admin(user_id) {
        return Err(AppError::Forbidden(format!("Only admins of {} can manage members", club.name)));
    }
    Ok(club)
}

fn member_not_found(member_id: &str) -> AppError {
    AppError::NotFound(format!("Member {} not found", member_id))
}

pub async fn list_members(repo: &Repository, user_id: &str, club_id: &str) -> AppResult<Vec<Member>> {
    ensure_admin(repo, club_id, user_id).await?;
    repo.members().await
}

fn check_name(request: &MemberRequest) -> AppResult<()> {
    if request.name.trim().is_empty() {
        return Err(AppError::InvalidRequest("Member name is required".into()));
    }
    Ok(())
}

pub async fn add_member(
    repo: &Repository,
    user_id: &str,
    club_id: &str,
    request: MemberRequest,
) -> AppResult<Member> {
    check_name(&request)?;

    let _guard = repo.lock().await;
    ensure_admin(repo, club_id, user_id).await?;
    let mut members = repo.members().await?;
    let member = catalog::add_member(&mut members, request);
    repo.save_members(&members).await?;

    log::info!("✅ Member {} added via club {}", member.id, club_id);
    Ok(member)
}

pub async fn update_member(
    repo: &Repository,
    user_id: &str,
    club_id: &str,
    member_id: &str,
    request: MemberRequest,
) -> AppResult<Member> {
    check_name(&request)?;

    let _guard = repo.lock().await;
    ensure_admin(repo, club_id, user_id).await?;
    let mut members = repo.members().await?;
    let member = catalog::update_member(&mut members, member_id, request)
        .ok_or_else(|| member_not_found(member_id))?;
    repo.save_members(&members).await?;
    Ok(member)
}

pub async fn delete_member(
    repo: &Repository,
    user_id: &str,
    club_id: &str,
    member_id: &str,
    confirmed: bool,
) -> AppResult<()> {
    let _guard = repo.lock().await;
    ensure_admin(repo, club_id, user_id).await?;
    let mut members = repo.members().await?;
    if !members.iter().any(|m| m.id == member_id) {
        return Err(member_not_found(member_id));
    }
    require_confirmation(confirmed, "Removing a member")?;

    catalog::delete_member(&mut members, member_id);
    repo.save_members(&members).await?;
    log::info!("🗑️ Member {} removed via club {}", member_id, club_id);
    Ok(())
}

/// Blocking needs confirmation, unblocking does not
pub async fn set_member_blocked(
    repo: &Repository,
    user_id: &str,
    club_id: &str,
    member_id: &str,
    blocked: bool,
    confirmed: bool,
) -> AppResult<Member> {
    let _guard = repo.lock().await;
    ensure_admin(repo, club_id, user_id).await?;
    let mut members = repo.members().await?;
    if !members.iter().any(|m| m.id == member_id) {
        return Err(member_not_found(member_id));
    }

    let status = if blocked {
        require_confirmation(confirmed, "Blocking a member")?;
        MemberStatus::Blocked
    } else {
        MemberStatus::Active
    };

    let member = catalog::set_member_status(&mut members, member_id, status)
        .ok_or_else(|| member_not_found(member_id))?;
    repo.save_members(&members).await?;
    log::info!("🔒 Member {} status -> {:?}", member_id, status);
    Ok(member)
}
