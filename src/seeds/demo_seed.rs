use crate::models::{Club, ClubStats, Member, MemberStatus, PaymentFrequency, PaymentItem};

/// Id assigned to the demo admin at login, matches `admin_ids` below
pub const DEMO_ADMIN_ID: &str = "admin-user";

/// Clubs written to an empty store on first read
pub fn demo_clubs() -> Vec<Club> {
    vec![
        Club {
            id: "c1".into(),
            name: "Youth Alive Ghana".into(),
            description: "Empowering youth through education, skills training, and community engagement initiatives across Ghana.".into(),
            logo_color: "bg-orange-600".into(),
            admin_ids: vec![DEMO_ADMIN_ID.into()],
            stats: ClubStats {
                total_members: 124,
                total_revenue: 4500.0,
                pending_dues: 230.0,
                active_subscriptions: 110,
            },
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
                    description: "Contribution towards the annual community project. You can choose to pay more.".into(),
                },
            ],
        },
        Club {
            id: "c2".into(),
            name: "HIECH Foundation".into(),
            description: "Health, Innovation, and Education for Children. Dedicated to improving child welfare through sustainable programs.".into(),
            logo_color: "bg-blue-600".into(),
            admin_ids: vec![DEMO_ADMIN_ID.into()],
            stats: ClubStats {
                total_members: 85,
                total_revenue: 3200.0,
                pending_dues: 150.0,
                active_subscriptions: 78,
            },
            payment_items: vec![
                PaymentItem {
                    id: "p3".into(),
                    title: "Monthly Dues".into(),
                    amount: 10.0,
                    frequency: PaymentFrequency::Monthly,
                    is_compulsory: true,
                    allow_custom_amount: None,
                    description: "Monthly foundation support dues.".into(),
                },
                PaymentItem {
                    id: "p4".into(),
                    title: "Weekly Support".into(),
                    amount: 5.0,
                    frequency: PaymentFrequency::Weekly,
                    is_compulsory: false,
                    allow_custom_amount: None,
                    description: "Weekly voluntary donation for ongoing ops.".into(),
                },
            ],
        },
    ]
}

/// Roster written to an empty store on first read
pub fn demo_members() -> Vec<Member> {
    let member = |id: &str, name: &str, email: &str, phone: &str, status: MemberStatus, joined: &str| Member {
        id: id.into(),
        name: name.into(),
        email: email.into(),
        phone_number: Some(phone.into()),
        status,
        joined_date: joined.into(),
    };

    vec![
        member("1", "John Doe", "john@example.com", "0244123456", MemberStatus::Active, "2023-01-15"),
        member("2", "Jane Smith", "jane@example.com", "0555987654", MemberStatus::Overdue, "2023-02-20"),
        member("3", "Robert Johnson", "rob@example.com", "0200112233", MemberStatus::Active, "2023-03-10"),
        member("4", "Emily Davis", "emily@example.com", "0266445566", MemberStatus::Pending, "2023-11-05"),
    ]
}
