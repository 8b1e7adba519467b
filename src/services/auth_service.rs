use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

use crate::config::JwtSettings;
use crate::models::{AuthMethod, User, UserRole};
use crate::services::identity;
use crate::storage::Repository;
use crate::utils::{AppError, AppResult};

// JWT Claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // user id
    pub name: String,
    pub role: Option<UserRole>,
    pub iat: usize,
    pub exp: usize,
    pub jti: String,
    pub aud: String,
    pub iss: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    /// Phone number or email address
    pub identifier: String,
    pub method: AuthMethod,
    pub name: Option<String>,
    /// Role picked on the sign-in screen
    pub role: Option<UserRole>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    pub auth_method: AuthMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            phone_number: user.phone_number.clone(),
            auth_method: user.auth_method,
            role: user.role,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AuthResponse {
    pub success: bool,
    pub token: String,
    pub user: UserInfo,
}

pub fn generate_jwt(user: &User, settings: &JwtSettings) -> AppResult<String> {
    let now = Utc::now();
    let claims = Claims {
        sub: user.id.clone(),
        name: user.name.clone(),
        role: user.role,
        iat: now.timestamp() as usize,
        exp: (now + Duration::hours(settings.ttl_hours)).timestamp() as usize,
        jti: Uuid::new_v4().to_string(),
        aud: settings.audience.clone(),
        iss: settings.issuer.clone(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(settings.secret.as_ref()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
}

pub fn verify_token(token: &str, settings: &JwtSettings) -> AppResult<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[settings.audience.as_str()]);

    let mut issuers = HashSet::new();
    issuers.insert(settings.issuer.clone());
    validation.iss = Some(issuers);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(settings.secret.as_ref()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))
}

/// Shape checks on the credential before it reaches the identity resolver
fn check_identifier(identifier: &str, method: AuthMethod) -> AppResult<()> {
    match method {
        AuthMethod::Phone => {
            let digits = identifier.chars().filter(|c| c.is_ascii_digit()).count();
            if digits < 9 {
                return Err(AppError::InvalidRequest(
                    "Phone number must have at least 9 digits".into(),
                ));
            }
        }
        AuthMethod::Email | AuthMethod::Google => {
            if !identifier.contains('@') {
                return Err(AppError::InvalidRequest("A valid email address is required".into()));
            }
        }
    }
    Ok(())
}

/// Resolves (or creates) the user, opens the session and issues a token
pub async fn login(
    repo: &Repository,
    settings: &JwtSettings,
    request: &LoginRequest,
) -> AppResult<AuthResponse> {
    let identifier = request.identifier.trim();
    check_identifier(identifier, request.method)?;

    let display_name = match (request.name.as_deref(), request.method) {
        (None, AuthMethod::Google) => Some("Google User"),
        (name, _) => name,
    };

    let user = {
        let _guard = repo.lock().await;
        let mut users = repo.users().await?;
        let (user, changed) = identity::find_or_create_user(
            &mut users,
            identifier,
            request.method,
            display_name,
            request.role,
        );
        if changed {
            repo.save_users(&users).await?;
        }
        repo.set_current_user_id(Some(&user.id)).await?;
        user
    };

    let token = generate_jwt(&user, settings)?;

    Ok(AuthResponse {
        success: true,
        token,
        user: UserInfo::from(&user),
    })
}

/// Ends the session only when it belongs to the caller
pub async fn logout(repo: &Repository, user_id: &str) -> AppResult<()> {
    let _guard = repo.lock().await;
    if repo.current_user_id().await?.as_deref() == Some(user_id) {
        repo.set_current_user_id(None).await?;
    }
    Ok(())
}

/// The caller's user, if they hold the current session
pub async fn current_session(repo: &Repository, user_id: &str) -> AppResult<User> {
    match repo.current_user().await? {
        Some(user) if user.id == user_id => Ok(user),
        _ => Err(AppError::NotFound("No active session".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::storage::MemoryStorage;
    use std::sync::Arc;

    fn repo() -> Repository {
        Repository::new(Arc::new(MemoryStorage::new()))
    }

    fn login_request(identifier: &str, method: AuthMethod) -> LoginRequest {
        LoginRequest {
            identifier: identifier.into(),
            method,
            name: None,
            role: None,
        }
    }

    #[tokio::test]
    async fn repeated_phone_login_reuses_user() {
        let repo = repo();
        let settings = AppConfig::for_tests().jwt;

        let first = login(&repo, &settings, &login_request("0550000000", AuthMethod::Phone)).await.unwrap();
        let second = login(&repo, &settings, &login_request("0550000000", AuthMethod::Phone)).await.unwrap();

        assert_eq!(first.user.id, second.user.id);
        assert_eq!(repo.users().await.unwrap().len(), 1);
        assert_eq!(repo.current_user_id().await.unwrap(), Some(first.user.id));
    }

    #[tokio::test]
    async fn token_round_trips_subject() {
        let repo = repo();
        let settings = AppConfig::for_tests().jwt;
        let response = login(&repo, &settings, &login_request("ama@example.com", AuthMethod::Email))
            .await
            .unwrap();

        let claims = verify_token(&response.token, &settings).unwrap();
        assert_eq!(claims.sub, response.user.id);
        assert_eq!(claims.name, "ama");
    }

    #[tokio::test]
    async fn token_from_other_secret_is_rejected() {
        let repo = repo();
        let settings = AppConfig::for_tests().jwt;
        let response = login(&repo, &settings, &login_request("ama@example.com", AuthMethod::Email))
            .await
            .unwrap();

        let mut other = settings.clone();
        other.secret = "another-secret".into();
        assert!(matches!(verify_token(&response.token, &other), Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn google_login_defaults_display_name() {
        let repo = repo();
        let settings = AppConfig::for_tests().jwt;
        let response = login(&repo, &settings, &login_request("user@gmail.com", AuthMethod::Google))
            .await
            .unwrap();
        assert_eq!(response.user.name, "Google User");
        assert_eq!(response.user.auth_method, AuthMethod::Google);
    }

    #[tokio::test]
    async fn malformed_identifiers_are_rejected() {
        let repo = repo();
        let settings = AppConfig::for_tests().jwt;

        let short_phone = login(&repo, &settings, &login_request("02441", AuthMethod::Phone)).await;
        assert!(matches!(short_phone, Err(AppError::InvalidRequest(_))));

        let bad_email = login(&repo, &settings, &login_request("not-an-email", AuthMethod::Email)).await;
        assert!(matches!(bad_email, Err(AppError::InvalidRequest(_))));
        assert!(repo.users().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn logout_clears_session() {
        let repo = repo();
        let settings = AppConfig::for_tests().jwt;
        let response = login(&repo, &settings, &login_request("0244123456", AuthMethod::Phone))
            .await
            .unwrap();
        let id = response.user.id;
        assert!(current_session(&repo, &id).await.is_ok());

        logout(&repo, &id).await.unwrap();
        assert!(matches!(current_session(&repo, &id).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn session_belongs_to_its_holder() {
        let repo = repo();
        let settings = AppConfig::for_tests().jwt;
        let first = login(&repo, &settings, &login_request("0244123456", AuthMethod::Phone))
            .await
            .unwrap();
        let second = login(&repo, &settings, &login_request("ama@example.com", AuthMethod::Email))
            .await
            .unwrap();

        assert!(matches!(current_session(&repo, &first.user.id).await, Err(AppError::NotFound(_))));

        logout(&repo, &first.user.id).await.unwrap();
        let holder = current_session(&repo, &second.user.id).await.unwrap();
        assert_eq!(holder.id, second.user.id);
    }
}
