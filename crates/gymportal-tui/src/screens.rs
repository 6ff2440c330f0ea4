//! Form layouts for each editing page, and their conversion to requests.

use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate};
use gymportal_core::models::{
    AdminUser, BulkEmail, ContactRequest, EmailMessage, ExpirationNotice, Membership, MembershipStatus,
    MembershipType, MembershipUpdate, NewMembership, Notification, ProfileUpdate, RenewalNotice, UserProfile,
    WhatsAppMessage, DEFAULT_DAYS_PER_WEEK,
};

use crate::form::{Field, Form};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Days added to today for the default renewal date
const RENEWAL_DEFAULT_DAYS: i64 = 30;

fn parse_date(value: &str, label: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| format!("{} must be a date (YYYY-MM-DD)", label))
}

fn parse_price(value: &str) -> Result<f64, String> {
    value.trim().parse::<f64>().map_err(|_| "Price must be a number".to_string())
}

fn parse_days(value: &str) -> Result<Option<u8>, String> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    value
        .trim()
        .parse::<u8>()
        .map(Some)
        .map_err(|_| "Days per week must be a number".to_string())
}

/// Leading `YYYY-MM-DD` of a backend date or timestamp.
fn date_part(value: &str) -> String {
    value.get(..10).unwrap_or(value).to_string()
}

fn type_options() -> Vec<(String, String)> {
    MembershipType::ALL
        .iter()
        .map(|t| (t.code().to_string(), t.label().to_string()))
        .collect()
}

fn status_options() -> Vec<(String, String)> {
    MembershipStatus::ALL
        .iter()
        .map(|s| (s.code().to_string(), s.label().to_string()))
        .collect()
}

pub fn user_options(users: &[AdminUser]) -> Vec<(String, String)> {
    users
        .iter()
        .map(|u| (u.id.clone(), format!("{} <{}>", u.name, u.email)))
        .collect()
}

pub fn recipient_options(users: &[AdminUser]) -> Vec<(String, String)> {
    users
        .iter()
        .map(|u| (u.email.clone(), format!("{} <{}>", u.name, u.email)))
        .collect()
}

// ============================================================================
// Login, contact, profile
// ============================================================================

pub fn login_form(email: &str, password: &str) -> Form {
    let mut form = Form::new(vec![
        Field::text("email", "Email").required().with_text(email),
        Field::secret("password", "Password").required().with_text(password),
    ]);
    if !email.is_empty() {
        form.focus = 1;
    }
    form
}

pub fn contact_form(message: Option<String>) -> Form {
    Form::new(vec![
        Field::text("name", "Name").required(),
        Field::text("email", "Email").required(),
        Field::text("phone", "Phone"),
        Field::message("message", "Message").required().with_text(message.unwrap_or_default()),
    ])
}

pub fn contact_request(form: &Form) -> ContactRequest {
    ContactRequest {
        name: form.text("name"),
        email: form.text("email"),
        phone: form.text("phone"),
        message: form.text("message"),
    }
}

pub fn profile_form(user: &UserProfile) -> Form {
    Form::new(vec![
        Field::text("full_name", "Full name")
            .required()
            .with_text(user.full_name.clone().unwrap_or_default()),
        Field::text("phone", "Phone").with_text(user.phone.clone()),
        Field::secret("current_password", "Current password"),
        Field::secret("new_password", "New password"),
        Field::secret("confirm_password", "Confirm password"),
    ])
}

/// A password change needs a matching confirmation and the current password.
pub fn profile_update(form: &Form) -> Result<ProfileUpdate, String> {
    let new_password = form.text("new_password");
    let mut update = ProfileUpdate {
        full_name: form.text("full_name"),
        phone: form.text("phone"),
        current_password: None,
        new_password: None,
    };
    if new_password.is_empty() {
        return Ok(update);
    }
    if new_password != form.text("confirm_password") {
        return Err("Passwords do not match".to_string());
    }
    let current = form.text("current_password");
    if current.is_empty() {
        return Err("Enter your current password to change it".to_string());
    }
    update.current_password = Some(current);
    update.new_password = Some(new_password);
    Ok(update)
}

pub fn clear_passwords(form: &mut Form) {
    for key in ["current_password", "new_password", "confirm_password"] {
        form.set_text(key, "");
    }
}

// ============================================================================
// Memberships
// ============================================================================

pub fn create_membership_form(users: &[AdminUser], today: NaiveDate) -> Form {
    let kind = MembershipType::Monthly;
    let mut form = Form::new(vec![
        Field::choice("user", "Member", user_options(users)).required(),
        Field::choice("type", "Type", type_options()),
        Field::text("start_date", "Start date")
            .required()
            .with_text(today.format(DATE_FORMAT).to_string()),
        Field::text("price", "Price").required().with_text(kind.default_price().to_string()),
        Field::text("days_per_week", "Days per week").with_text(DEFAULT_DAYS_PER_WEEK.to_string()),
        Field::toggle("auto_renew", "Auto-renew", false),
    ]);
    form.set_hidden("days_per_week", !kind.requires_days_per_week());
    form
}

pub fn edit_membership_form(membership: &Membership) -> Form {
    let mut form = Form::new(vec![
        Field::choice("type", "Type", type_options()),
        Field::choice("status", "Status", status_options()),
        Field::text("start_date", "Start date")
            .required()
            .with_text(date_part(&membership.start_date)),
        Field::text("end_date", "End date")
            .required()
            .with_text(membership.end_date.as_deref().map(date_part).unwrap_or_default()),
        Field::text("price", "Price").required().with_text(membership.price.to_string()),
        Field::text("days_per_week", "Days per week").with_text(
            membership
                .days_per_week
                .unwrap_or(DEFAULT_DAYS_PER_WEEK)
                .to_string(),
        ),
        Field::toggle("auto_renew", "Auto-renew", membership.auto_renew),
    ]);
    form.set_choice("type", &membership.membership_type);
    form.set_choice("status", &membership.status);
    let kind = membership.kind().unwrap_or(MembershipType::Monthly);
    form.set_hidden("days_per_week", !kind.requires_days_per_week());
    form
}

fn selected_type(form: &Form) -> MembershipType {
    form.choice("type")
        .and_then(|code| MembershipType::from_code(&code))
        .unwrap_or(MembershipType::Monthly)
}

/// Follow a type change: default price, and days per week only for kickboxing.
pub fn on_membership_type_changed(form: &mut Form) {
    let kind = selected_type(form);
    form.set_text("price", kind.default_price().to_string());
    form.set_hidden("days_per_week", !kind.requires_days_per_week());
}

pub fn new_membership(form: &Form) -> Result<NewMembership, String> {
    let user_id = form.choice("user").unwrap_or_default();
    NewMembership::new(
        &user_id,
        selected_type(form),
        parse_date(&form.text("start_date"), "Start date")?,
        parse_price(&form.text("price"))?,
        parse_days(&form.text("days_per_week"))?,
        form.toggle("auto_renew"),
    )
    .map_err(|e| e.to_string())
}

pub fn membership_update(form: &Form) -> Result<MembershipUpdate, String> {
    let status = form
        .choice("status")
        .and_then(|code| MembershipStatus::parse(&code))
        .unwrap_or(MembershipStatus::Active);
    MembershipUpdate::new(
        selected_type(form),
        status,
        parse_date(&form.text("start_date"), "Start date")?,
        parse_date(&form.text("end_date"), "End date")?,
        parse_price(&form.text("price"))?,
        parse_days(&form.text("days_per_week"))?,
        form.toggle("auto_renew"),
    )
    .map_err(|e| e.to_string())
}

// ============================================================================
// Notifications
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Email,
    WhatsApp,
    BulkEmail,
    Expiration,
    Renewal,
}

impl NotificationKind {
    pub const ALL: [NotificationKind; 5] = [
        NotificationKind::Email,
        NotificationKind::WhatsApp,
        NotificationKind::BulkEmail,
        NotificationKind::Expiration,
        NotificationKind::Renewal,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            NotificationKind::Email => "Email",
            NotificationKind::WhatsApp => "WhatsApp",
            NotificationKind::BulkEmail => "Bulk email",
            NotificationKind::Expiration => "Expiration notice",
            NotificationKind::Renewal => "Renewal notice",
        }
    }

    pub fn next(&self) -> Self {
        let i = Self::ALL.iter().position(|k| k == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }
}

pub fn notification_form(kind: NotificationKind, users: &[AdminUser], today: NaiveDate) -> Form {
    let fields = match kind {
        NotificationKind::Email => vec![
            Field::choice("email", "Recipient", recipient_options(users)).required(),
            Field::text("subject", "Subject").required(),
            Field::message("message", "Message").required(),
        ],
        NotificationKind::WhatsApp => vec![
            Field::text("phone", "Phone").required(),
            Field::message("message", "Message").required(),
        ],
        NotificationKind::BulkEmail => vec![
            Field::toggle("all", "Send to every member", false),
            Field::text("subject", "Subject").required(),
            Field::message("message", "Message").required(),
        ],
        NotificationKind::Expiration => vec![
            Field::choice("email", "Member", recipient_options(users)).required(),
            Field::text("date", "Expiration date")
                .required()
                .with_text(today.format(DATE_FORMAT).to_string()),
            Field::choice("type", "Type", type_options()),
        ],
        NotificationKind::Renewal => vec![
            Field::choice("email", "Member", recipient_options(users)).required(),
            Field::text("date", "New expiration date").required().with_text(
                (today + Duration::days(RENEWAL_DEFAULT_DAYS))
                    .format(DATE_FORMAT)
                    .to_string(),
            ),
            Field::choice("type", "Type", type_options()),
        ],
    };
    Form::new(fields)
}

fn member_name(users: &[AdminUser], email: &str) -> String {
    users
        .iter()
        .find(|u| u.email == email)
        .map(|u| u.name.clone())
        .unwrap_or_default()
}

/// Build the notification; bulk recipients come from `selected` unless the
/// form asks for every member.
pub fn notification(
    kind: NotificationKind,
    form: &Form,
    users: &[AdminUser],
    selected: &BTreeSet<String>,
) -> Result<Notification, String> {
    let email = form.choice("email").unwrap_or_default();
    let membership_type = form.choice("type").unwrap_or_default();
    let notification = match kind {
        NotificationKind::Email => Notification::Email(EmailMessage {
            email,
            subject: form.text("subject"),
            message: form.text("message"),
        }),
        NotificationKind::WhatsApp => Notification::WhatsApp(WhatsAppMessage {
            phone: form.text("phone"),
            message: form.text("message"),
        }),
        NotificationKind::BulkEmail => {
            let emails = if form.toggle("all") {
                users.iter().map(|u| u.email.clone()).collect()
            } else {
                selected.iter().cloned().collect()
            };
            Notification::BulkEmail(BulkEmail {
                emails,
                subject: form.text("subject"),
                message: form.text("message"),
            })
        }
        NotificationKind::Expiration => Notification::MembershipExpiration(ExpirationNotice {
            name: member_name(users, &email),
            expiration_date: parse_date(&form.text("date"), "Expiration date")?,
            email,
            membership_type,
        }),
        NotificationKind::Renewal => Notification::MembershipRenewal(RenewalNotice {
            name: member_name(users, &email),
            new_expiration_date: parse_date(&form.text("date"), "New expiration date")?,
            email,
            membership_type,
        }),
    };
    notification.validate()?;
    Ok(notification)
}
