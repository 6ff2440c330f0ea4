//! Membership records, plan types and admin form payloads.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Default weekly frequency offered when a kickboxing plan is created.
pub const DEFAULT_DAYS_PER_WEEK: u8 = 3;

/// A member's membership as returned by `/memberships`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Membership {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub membership_type: String,
    pub status: String,
    pub start_date: String,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub days_per_week: Option<u8>,
    #[serde(default)]
    pub auto_renew: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub user: Option<MembershipOwner>,
}

/// The user a membership belongs to, embedded in admin listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MembershipOwner {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
}

impl Membership {
    pub fn kind(&self) -> Option<MembershipType> {
        MembershipType::from_code(&self.membership_type)
    }

    pub fn status_kind(&self) -> Option<MembershipStatus> {
        MembershipStatus::parse(&self.status)
    }

    pub fn owner_name(&self) -> &str {
        self.user
            .as_ref()
            .map(|u| if u.name.is_empty() { u.email.as_str() } else { u.name.as_str() })
            .unwrap_or(self.user_id.as_str())
    }

    /// Case-insensitive match on owner name, owner email or plan type.
    pub fn matches_search(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        let query = query.to_lowercase();
        let owner_match = self.user.as_ref().is_some_and(|u| {
            u.name.to_lowercase().contains(&query) || u.email.to_lowercase().contains(&query)
        });
        owner_match || self.membership_type.to_lowercase().contains(&query)
    }
}

/// Plan types sold at the front desk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MembershipType {
    Monthly,
    Quarterly,
    Biannual,
    Annual,
    Kickboxing,
}

impl MembershipType {
    pub const ALL: [MembershipType; 5] = [
        MembershipType::Monthly,
        MembershipType::Quarterly,
        MembershipType::Biannual,
        MembershipType::Annual,
        MembershipType::Kickboxing,
    ];

    /// Wire code, e.g. `MONTHLY`.
    pub fn code(&self) -> &'static str {
        match self {
            MembershipType::Monthly => "MONTHLY",
            MembershipType::Quarterly => "QUARTERLY",
            MembershipType::Biannual => "BIANNUAL",
            MembershipType::Annual => "ANNUAL",
            MembershipType::Kickboxing => "KICKBOXING",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MembershipType::Monthly => "Monthly",
            MembershipType::Quarterly => "Quarterly",
            MembershipType::Biannual => "Biannual",
            MembershipType::Annual => "Annual",
            MembershipType::Kickboxing => "Kickboxing",
        }
    }

    /// Price pre-filled in the create form.
    pub fn default_price(&self) -> f64 {
        match self {
            MembershipType::Monthly => 5000.0,
            MembershipType::Quarterly => 13500.0,
            MembershipType::Biannual => 25000.0,
            MembershipType::Annual => 45000.0,
            MembershipType::Kickboxing => 6000.0,
        }
    }

    pub fn requires_days_per_week(&self) -> bool {
        matches!(self, MembershipType::Kickboxing)
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.code().eq_ignore_ascii_case(code.trim()))
    }

    pub fn next(&self) -> Self {
        let idx = Self::ALL.iter().position(|t| t == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MembershipStatus {
    Active,
    Expired,
    Pending,
}

impl MembershipStatus {
    pub const ALL: [MembershipStatus; 3] = [
        MembershipStatus::Active,
        MembershipStatus::Expired,
        MembershipStatus::Pending,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            MembershipStatus::Active => "ACTIVE",
            MembershipStatus::Expired => "EXPIRED",
            MembershipStatus::Pending => "PENDING",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MembershipStatus::Active => "Active",
            MembershipStatus::Expired => "Expired",
            MembershipStatus::Pending => "Pending",
        }
    }

    /// Lenient parse: accepts wire codes and the Spanish labels the
    /// backend uses on the member profile (`activa`, `expirada`, `pendiente`).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "active" | "activa" => Some(MembershipStatus::Active),
            "expired" | "expirada" => Some(MembershipStatus::Expired),
            "pending" | "pendiente" => Some(MembershipStatus::Pending),
            _ => None,
        }
    }

    pub fn next(&self) -> Self {
        match self {
            MembershipStatus::Active => MembershipStatus::Expired,
            MembershipStatus::Expired => MembershipStatus::Pending,
            MembershipStatus::Pending => MembershipStatus::Active,
        }
    }
}

/// Body of `POST /memberships`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewMembership {
    pub user_id: String,
    #[serde(rename = "type")]
    pub membership_type: String,
    pub start_date: NaiveDate,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_per_week: Option<u8>,
    pub auto_renew: bool,
}

/// Body of `PATCH /memberships/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MembershipUpdate {
    #[serde(rename = "type")]
    pub membership_type: String,
    pub status: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_per_week: Option<u8>,
    pub auto_renew: bool,
}

/// Form-level validation failure, shown to the admin as a toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError(pub String);

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ValidationError {}

fn check_days_per_week(kind: MembershipType, days: Option<u8>) -> Result<Option<u8>, ValidationError> {
    if !kind.requires_days_per_week() {
        return Ok(None);
    }
    match days {
        Some(d @ 1..=7) => Ok(Some(d)),
        _ => Err(ValidationError(
            "Kickboxing plans need between 1 and 7 days per week".to_string(),
        )),
    }
}

fn check_price(price: f64) -> Result<(), ValidationError> {
    if price.is_finite() && price >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError("Price must be a positive number".to_string()))
    }
}

impl NewMembership {
    pub fn new(
        user_id: &str,
        kind: MembershipType,
        start_date: NaiveDate,
        price: f64,
        days_per_week: Option<u8>,
        auto_renew: bool,
    ) -> Result<Self, ValidationError> {
        if user_id.trim().is_empty() {
            return Err(ValidationError("A user must be selected".to_string()));
        }
        check_price(price)?;
        Ok(Self {
            user_id: user_id.trim().to_string(),
            membership_type: kind.code().to_string(),
            start_date,
            price,
            days_per_week: check_days_per_week(kind, days_per_week)?,
            auto_renew,
        })
    }
}

impl MembershipUpdate {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        kind: MembershipType,
        status: MembershipStatus,
        start_date: NaiveDate,
        end_date: NaiveDate,
        price: f64,
        days_per_week: Option<u8>,
        auto_renew: bool,
    ) -> Result<Self, ValidationError> {
        if end_date < start_date {
            return Err(ValidationError(
                "End date must not be before the start date".to_string(),
            ));
        }
        check_price(price)?;
        Ok(Self {
            membership_type: kind.code().to_string(),
            status: status.code().to_string(),
            start_date,
            end_date,
            price,
            days_per_week: check_days_per_week(kind, days_per_week)?,
            auto_renew,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid date")
    }

    #[test]
    fn test_membership_type_from_code() {
        assert_eq!(MembershipType::from_code("MONTHLY"), Some(MembershipType::Monthly));
        assert_eq!(MembershipType::from_code("kickboxing"), Some(MembershipType::Kickboxing));
        assert_eq!(MembershipType::from_code("WEEKLY"), None);
    }

    #[test]
    fn test_membership_type_cycles() {
        assert_eq!(MembershipType::Kickboxing.next(), MembershipType::Monthly);
        assert_eq!(MembershipType::Monthly.next(), MembershipType::Quarterly);
    }

    #[test]
    fn test_status_parse_accepts_spanish_labels() {
        assert_eq!(MembershipStatus::parse("ACTIVE"), Some(MembershipStatus::Active));
        assert_eq!(MembershipStatus::parse("activa"), Some(MembershipStatus::Active));
        assert_eq!(MembershipStatus::parse("Expirada"), Some(MembershipStatus::Expired));
        assert_eq!(MembershipStatus::parse("pendiente"), Some(MembershipStatus::Pending));
        assert_eq!(MembershipStatus::parse("frozen"), None);
    }

    #[test]
    fn test_new_membership_drops_days_for_non_kickboxing() {
        let m = NewMembership::new("u1", MembershipType::Monthly, date("2026-01-01"), 5000.0, Some(3), false)
            .expect("valid");
        assert_eq!(m.days_per_week, None);
        let json = serde_json::to_value(&m).expect("serializable");
        assert_eq!(json["type"], "MONTHLY");
        assert_eq!(json["start_date"], "2026-01-01");
        assert!(json.get("days_per_week").is_none());
    }

    #[test]
    fn test_new_membership_requires_user_and_days() {
        assert!(NewMembership::new(" ", MembershipType::Monthly, date("2026-01-01"), 1.0, None, false).is_err());
        assert!(NewMembership::new("u1", MembershipType::Kickboxing, date("2026-01-01"), 1.0, None, false).is_err());
        let m = NewMembership::new("u1", MembershipType::Kickboxing, date("2026-01-01"), 6000.0, Some(2), true)
            .expect("valid");
        assert_eq!(m.days_per_week, Some(2));
    }

    #[test]
    fn test_update_rejects_inverted_dates() {
        let err = MembershipUpdate::new(
            MembershipType::Annual,
            MembershipStatus::Active,
            date("2026-05-01"),
            date("2026-04-01"),
            45000.0,
            None,
            false,
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_matches_search() {
        let m: Membership = serde_json::from_str(
            r#"{"id":"m1","user_id":"u1","type":"KICKBOXING","status":"ACTIVE","start_date":"2026-01-01",
                "price":6000,"auto_renew":false,"user":{"id":"u1","name":"Ana Paz","email":"ana@olimpo.gym"}}"#,
        )
        .expect("valid membership");
        assert!(m.matches_search("ana"));
        assert!(m.matches_search("OLIMPO"));
        assert!(m.matches_search("kick"));
        assert!(!m.matches_search("monthly"));
        assert_eq!(m.owner_name(), "Ana Paz");
    }
}
