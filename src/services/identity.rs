//! Maps a login credential to a stable user record.

use lazy_static::lazy_static;
use std::collections::HashSet;

use crate::models::{AuthMethod, User, UserRole};
use crate::seeds::demo_seed::DEMO_ADMIN_ID;
use crate::utils::generate_id;

lazy_static! {
    /// Credentials that resolve to the seeded demo admin
    static ref DEMO_ADMIN_IDENTIFIERS: HashSet<&'static str> =
        ["admin@titime.com", "0550000000"].into_iter().collect();
}

const DEMO_ADMIN_NAME: &str = "Demo Admin";

/// Which user field an identifier is matched against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierKind {
    Email,
    Phone,
}

impl From<AuthMethod> for IdentifierKind {
    fn from(method: AuthMethod) -> Self {
        match method {
            AuthMethod::Phone => IdentifierKind::Phone,
            AuthMethod::Email | AuthMethod::Google => IdentifierKind::Email,
        }
    }
}

fn default_name(identifier: &str, kind: IdentifierKind) -> String {
    match kind {
        IdentifierKind::Email => identifier.split('@').next().unwrap_or(identifier).to_string(),
        IdentifierKind::Phone => {
            let chars: Vec<char> = identifier.chars().collect();
            let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
            format!("User {}", tail)
        }
    }
}

/// Finds the user whose email/phone matches, or creates and appends one.
///
/// Never fails: no match is the creation trigger. The returned flag is
/// true when `users` was changed and needs saving. A supplied intended
/// role is recorded as the user's role preference.
pub fn find_or_create_user(
    users: &mut Vec<User>,
    identifier: &str,
    method: AuthMethod,
    display_name: Option<&str>,
    intended_role: Option<UserRole>,
) -> (User, bool) {
    let kind = IdentifierKind::from(method);
    let identifier = identifier.trim();

    let matched = users.iter().position(|u| match kind {
        IdentifierKind::Email => u.email.as_deref() == Some(identifier),
        IdentifierKind::Phone => u.phone_number.as_deref() == Some(identifier),
    });

    // Both demo credentials share one account
    let matched = matched.or_else(|| {
        if DEMO_ADMIN_IDENTIFIERS.contains(identifier) {
            users.iter().position(|u| u.id == DEMO_ADMIN_ID)
        } else {
            None
        }
    });

    if let Some(index) = matched {
        let user = &mut users[index];
        let changed = intended_role.is_some() && user.role != intended_role;
        if changed {
            user.role = intended_role;
        }
        return (user.clone(), changed);
    }

    let mut user = User {
        id: generate_id(),
        name: display_name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| default_name(identifier, kind)),
        email: None,
        phone_number: None,
        auth_method: method,
        role: intended_role,
        joined_clubs: Vec::new(),
        payment_methods: Vec::new(),
        subscriptions: Default::default(),
        custom_amounts: Default::default(),
    };
    match kind {
        IdentifierKind::Email => user.email = Some(identifier.to_string()),
        IdentifierKind::Phone => user.phone_number = Some(identifier.to_string()),
    }

    if DEMO_ADMIN_IDENTIFIERS.contains(identifier) {
        user.id = DEMO_ADMIN_ID.to_string();
        user.name = DEMO_ADMIN_NAME.to_string();
    }

    log::info!("👤 Created user {} ({:?})", user.id, method);
    users.push(user.clone());
    (user, true)
}
