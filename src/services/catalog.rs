//! Admin-side mutations of clubs, their payment items and the member roster.
//!
//! These work on in-memory collections only. Authorization and persistence
//! are the caller's job (see `club_service` / `member_service`). Nothing
//! here touches user subscriptions: deleting an item or a club leaves any
//! references to it in place.

use crate::models::{
    Club, ClubStats, CreateClubRequest, Member, MemberRequest, MemberStatus, PaymentItem,
    PaymentItemRequest, UpdateClubRequest, User,
};
use crate::utils::{generate_id, today};

const DEFAULT_CLUB_DESCRIPTION: &str = "A new community group.";
const DEFAULT_CLUB_COLOR: &str = "bg-indigo-600";

/// New club with the creator as sole admin, no items and zeroed stats
pub fn create_club(creator: &User, request: CreateClubRequest) -> Club {
    Club {
        id: generate_id(),
        name: non_blank(request.name).unwrap_or_else(|| format!("{}'s Club", creator.name)),
        description: non_blank(request.description).unwrap_or_else(|| DEFAULT_CLUB_DESCRIPTION.to_string()),
        logo_color: non_blank(request.logo_color).unwrap_or_else(|| DEFAULT_CLUB_COLOR.to_string()),
        admin_ids: vec![creator.id.clone()],
        payment_items: Vec::new(),
        stats: ClubStats::default(),
    }
}

pub fn update_club(club: &mut Club, request: UpdateClubRequest) {
    if let Some(name) = non_blank(request.name) {
        club.name = name;
    }
    if let Some(description) = request.description {
        club.description = description;
    }
    if let Some(color) = non_blank(request.logo_color) {
        club.logo_color = color;
    }
}

/// Removes the club; its items vanish with it
pub fn delete_club(clubs: &mut Vec<Club>, club_id: &str) -> bool {
    let before = clubs.len();
    clubs.retain(|c| c.id != club_id);
    clubs.len() != before
}

/// Input-surface checks for an item form
pub fn check_payment_item(request: &PaymentItemRequest) -> Result<(), &'static str> {
    if request.title.trim().is_empty() {
        return Err("Title is required");
    }
    if !request.amount.is_finite() || request.amount < 0.0 {
        return Err("Amount must be a number greater than or equal to zero");
    }
    Ok(())
}

pub fn add_payment_item(club: &mut Club, request: PaymentItemRequest) -> PaymentItem {
    let item = request.into_item(generate_id());
    club.payment_items.push(item.clone());
    item
}

/// Replaces the item's fields; its id never changes
pub fn update_payment_item(
    club: &mut Club,
    item_id: &str,
    request: PaymentItemRequest,
) -> Option<PaymentItem> {
    let slot = club.payment_items.iter_mut().find(|item| item.id == item_id)?;
    *slot = request.into_item(slot.id.clone());
    Some(slot.clone())
}

pub fn delete_payment_item(club: &mut Club, item_id: &str) -> bool {
    let before = club.payment_items.len();
    club.payment_items.retain(|item| item.id != item_id);
    club.payment_items.len() != before
}

pub fn add_member(members: &mut Vec<Member>, request: MemberRequest) -> Member {
    let member = Member {
        id: generate_id(),
        name: request.name,
        email: request.email,
        phone_number: non_blank(request.phone_number),
        status: request.status,
        joined_date: today(),
    };
    members.push(member.clone());
    member
}

/// Replaces the editable fields; id and joined date are kept
pub fn update_member(members: &mut [Member], member_id: &str, request: MemberRequest) -> Option<Member> {
    let member = members.iter_mut().find(|m| m.id == member_id)?;
    member.name = request.name;
    member.email = request.email;
    member.phone_number = non_blank(request.phone_number);
    member.status = request.status;
    Some(member.clone())
}

/// Block / unblock
pub fn set_member_status(members: &mut [Member], member_id: &str, status: MemberStatus) -> Option<Member> {
    let member = members.iter_mut().find(|m| m.id == member_id)?;
    member.status = status;
    Some(member.clone())
}

pub fn delete_member(members: &mut Vec<Member>, member_id: &str) -> bool {
    let before = members.len();
    members.retain(|m| m.id != member_id);
    members.len() != before
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AuthMethod, PaymentFrequency};
    use crate::seeds::demo_seed;
    use crate::services::ledger;

    fn creator() -> User {
        User {
            id: "u42".into(),
            name: "Esi".into(),
            email: Some("esi@example.com".into()),
            phone_number: None,
            auth_method: AuthMethod::Email,
            role: None,
            joined_clubs: vec![],
            payment_methods: vec![],
            subscriptions: Default::default(),
            custom_amounts: Default::default(),
        }
    }

    fn item_request(title: &str, amount: f64, compulsory: bool) -> PaymentItemRequest {
        PaymentItemRequest {
            title: title.into(),
            amount,
            frequency: PaymentFrequency::Monthly,
            is_compulsory: compulsory,
            allow_custom_amount: None,
            description: String::new(),
        }
    }

    fn member_request(name: &str, status: MemberStatus) -> MemberRequest {
        MemberRequest {
            name: name.into(),
            email: format!("{}@example.com", name.to_lowercase()),
            phone_number: Some("  ".into()),
            status,
        }
    }

    #[test]
    fn created_club_has_creator_as_sole_admin() {
        let club = create_club(&creator(), CreateClubRequest::default());
        assert_eq!(club.admin_ids, vec!["u42".to_string()]);
        assert_eq!(club.name, "Esi's Club");
        assert_eq!(club.description, DEFAULT_CLUB_DESCRIPTION);
        assert!(club.payment_items.is_empty());
        assert_eq!(club.stats, ClubStats::default());
    }

    #[test]
    fn update_club_ignores_blank_name() {
        let mut club = create_club(&creator(), CreateClubRequest::default());
        update_club(
            &mut club,
            UpdateClubRequest {
                name: Some("  ".into()),
                description: Some("Weekend football".into()),
                logo_color: Some("bg-emerald-600".into()),
            },
        );
        assert_eq!(club.name, "Esi's Club");
        assert_eq!(club.description, "Weekend football");
        assert_eq!(club.logo_color, "bg-emerald-600");
    }

    #[test]
    fn payment_item_crud_keeps_ids_stable() {
        let mut club = create_club(&creator(), CreateClubRequest::default());
        let added = add_payment_item(&mut club, item_request("Dues", 10.0, true));

        let updated = update_payment_item(&mut club, &added.id, item_request("Dues 2025", 12.0, true)).unwrap();
        assert_eq!(updated.id, added.id);
        assert_eq!(club.payment_items[0].title, "Dues 2025");

        assert!(update_payment_item(&mut club, "missing", item_request("x", 1.0, false)).is_none());
        assert!(delete_payment_item(&mut club, &added.id));
        assert!(!delete_payment_item(&mut club, &added.id));
    }

    #[test]
    fn rejects_bad_item_forms() {
        assert!(check_payment_item(&item_request("Dues", 0.0, false)).is_ok());
        assert!(check_payment_item(&item_request(" ", 5.0, false)).is_err());
        assert!(check_payment_item(&item_request("Dues", -1.0, false)).is_err());
        assert!(check_payment_item(&item_request("Dues", f64::INFINITY, false)).is_err());
    }

    #[test]
    fn deleting_item_leaves_subscriptions_alone() {
        let mut club = demo_seed::demo_clubs().remove(0);
        let user = ledger::reconcile_compulsory(&creator(), &club.id, &club.payment_items);

        assert!(delete_payment_item(&mut club, "p1"));
        assert!(user.is_subscribed(&club.id, "p1"));
        assert_eq!(ledger::compute_total(&user, &club.id, &club.payment_items), 0.0);
    }

    #[test]
    fn new_compulsory_item_is_picked_up_by_reconcile() {
        let mut club = demo_seed::demo_clubs().remove(0);
        let user = ledger::reconcile_compulsory(&creator(), &club.id, &club.payment_items);
        let added = add_payment_item(&mut club, item_request("Levy", 20.0, true));

        let user = ledger::reconcile_compulsory(&user, &club.id, &club.payment_items);
        assert!(user.is_subscribed(&club.id, &added.id));
        assert_eq!(ledger::compute_total(&user, &club.id, &club.payment_items), 30.0);
    }

    #[test]
    fn delete_club_reports_whether_anything_was_removed() {
        let mut clubs = demo_seed::demo_clubs();
        assert!(delete_club(&mut clubs, "c1"));
        assert!(!delete_club(&mut clubs, "c1"));
        assert_eq!(clubs.len(), 1);
    }

    #[test]
    fn member_roster_crud() {
        let mut members = demo_seed::demo_members();
        let added = add_member(&mut members, member_request("Kwame", MemberStatus::Pending));
        assert_eq!(added.phone_number, None);
        assert_eq!(added.joined_date, today());
        assert_eq!(members.len(), 5);

        let updated = update_member(&mut members, &added.id, member_request("Kwame A.", MemberStatus::Active)).unwrap();
        assert_eq!(updated.id, added.id);
        assert_eq!(updated.joined_date, added.joined_date);

        let blocked = set_member_status(&mut members, "2", MemberStatus::Blocked).unwrap();
        assert_eq!(blocked.status, MemberStatus::Blocked);
        let unblocked = set_member_status(&mut members, "2", MemberStatus::Active).unwrap();
        assert_eq!(unblocked.status, MemberStatus::Active);

        assert!(delete_member(&mut members, &added.id));
        assert!(!delete_member(&mut members, &added.id));
        assert!(update_member(&mut members, &added.id, member_request("x", MemberStatus::Active)).is_none());
    }
}
