use crate::models::{PaymentMethod, PaymentMethodRequest, User};
use crate::storage::Repository;
use crate::utils::{generate_id, require_confirmation, AppError, AppResult};

async fn load_user(repo: &Repository, user_id: &str) -> AppResult<User> {
    repo.user(user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized(format!("Unknown user {}", user_id)))
}

fn method_not_found(method_id: &str) -> AppError {
    AppError::NotFound(format!("Payment method {} not found", method_id))
}

pub async fn list_methods(repo: &Repository, user_id: &str) -> AppResult<Vec<PaymentMethod>> {
    Ok(load_user(repo, user_id).await?.payment_methods)
}

pub async fn add_method(
    repo: &Repository,
    user_id: &str,
    request: PaymentMethodRequest,
) -> AppResult<PaymentMethod> {
    let _guard = repo.lock().await;
    let mut user = load_user(repo, user_id).await?;

    let method = request.into_method(generate_id(), None);
    user.payment_methods.push(method.clone());
    repo.save_user(&user).await?;

    log::info!("💳 Payment method {} added for {}", method.id, user_id);
    Ok(method)
}

pub async fn update_method(
    repo: &Repository,
    user_id: &str,
    method_id: &str,
    request: PaymentMethodRequest,
) -> AppResult<PaymentMethod> {
    let _guard = repo.lock().await;
    let mut user = load_user(repo, user_id).await?;

    let slot = user
        .payment_methods
        .iter_mut()
        .find(|m| m.id == method_id)
        .ok_or_else(|| method_not_found(method_id))?;
    let updated = request.into_method(method_id.to_string(), Some(&*slot));
    *slot = updated.clone();

    repo.save_user(&user).await?;
    Ok(updated)
}

pub async fn delete_method(
    repo: &Repository,
    user_id: &str,
    method_id: &str,
    confirmed: bool,
) -> AppResult<()> {
    let _guard = repo.lock().await;
    let mut user = load_user(repo, user_id).await?;
    if !user.payment_methods.iter().any(|m| m.id == method_id) {
        return Err(method_not_found(method_id));
    }
    require_confirmation(confirmed, "Removing a payment method")?;

    user.payment_methods.retain(|m| m.id != method_id);
    repo.save_user(&user).await?;
    log::info!("🗑️ Payment method {} removed for {}", method_id, user_id);
    Ok(())
}
