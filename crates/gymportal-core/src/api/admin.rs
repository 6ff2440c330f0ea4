//! Back-office endpoints: user directory, dashboard and notifications.

use serde_json::Value;
use tracing::info;

use super::{ApiClient, ApiError};
use crate::models::{AdminUser, DailyAttendance, DashboardStats, Notification, RevenuePoint};

impl ApiClient {
    pub async fn fetch_users(&self) -> Result<Vec<AdminUser>, ApiError> {
        self.get("/users").await
    }

    pub async fn fetch_dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        self.get("/dashboard/stats").await
    }

    pub async fn fetch_revenue(&self) -> Result<Vec<RevenuePoint>, ApiError> {
        self.get("/dashboard/revenue").await
    }

    pub async fn fetch_daily_attendance(&self) -> Result<Vec<DailyAttendance>, ApiError> {
        self.get("/dashboard/attendance/daily").await
    }

    /// Validate locally, then post to the notification's endpoint.
    pub async fn send_notification(&self, notification: &Notification) -> Result<Value, ApiError> {
        notification.validate().map_err(ApiError::Validation)?;
        let body = notification
            .body()
            .map_err(|e| ApiError::Validation(format!("could not encode notification: {}", e)))?;
        let response = self.post(notification.endpoint(), &body).await?;
        info!(endpoint = notification.endpoint(), "Notification sent");
        Ok(response)
    }
}
