//! Back-office types: user directory and dashboard statistics.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Entry of the `/users` directory used by admin pickers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
}

impl AdminUser {
    pub fn matches_search(&self, query: &str) -> bool {
        let q = query.to_lowercase();
        self.name.to_lowercase().contains(&q) || self.email.to_lowercase().contains(&q)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MembershipStats {
    pub total: u64,
    pub active: u64,
    pub expired: u64,
    pub pending: u64,
    pub by_type: BTreeMap<String, u64>,
    pub revenue_current_month: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeakHour {
    pub hour: u8,
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AttendanceStats {
    pub total_today: u64,
    pub total_week: u64,
    pub total_month: u64,
    pub average_per_day: f64,
    pub peak_hours: Vec<PeakHour>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostViews {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub views: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlogStats {
    pub total_posts: u64,
    pub total_views: u64,
    pub most_viewed_posts: Vec<PostViews>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewUsers {
    pub count: u64,
    pub percent_change: f64,
}

/// Payload of `GET /dashboard/stats`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardStats {
    pub memberships: MembershipStats,
    pub attendance: AttendanceStats,
    pub blog: BlogStats,
    pub new_users: NewUsers,
}

/// One bar of `GET /dashboard/revenue`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RevenuePoint {
    pub month: String,
    #[serde(default)]
    pub revenue: f64,
}

/// One bar of `GET /dashboard/attendance/daily`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyAttendance {
    pub date: String,
    #[serde(default)]
    pub count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dashboard_stats_parse_partial_payload() {
        let stats: DashboardStats = serde_json::from_str(
            r#"{"memberships":{"total":40,"active":31,"byType":{"MONTHLY":20},"revenueCurrentMonth":150000},
                "attendance":{"totalToday":12,"peakHours":[{"hour":19,"count":8}]},
                "newUsers":{"count":5,"percentChange":25.0}}"#,
        )
        .expect("valid stats");
        assert_eq!(stats.memberships.active, 31);
        assert_eq!(stats.memberships.by_type.get("MONTHLY"), Some(&20));
        assert_eq!(stats.attendance.peak_hours[0].hour, 19);
        assert_eq!(stats.blog.total_posts, 0);
        assert_eq!(stats.new_users.count, 5);
    }
}
