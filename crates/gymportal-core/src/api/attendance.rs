use chrono::NaiveDate;
use serde_json::json;

use super::client::segment;
use super::{ApiClient, ApiError};
use crate::models::{Attendance, NewAttendance, QrCode, QrVerification};

impl ApiClient {
    pub async fn fetch_attendance(&self) -> Result<Vec<Attendance>, ApiError> {
        self.get("/attendance").await
    }

    pub async fn fetch_attendance_record(&self, id: &str) -> Result<Attendance, ApiError> {
        self.get(&format!("/attendance/{}", segment(id))).await
    }

    pub async fn fetch_user_attendance(&self, user_id: &str) -> Result<Vec<Attendance>, ApiError> {
        self.get(&format!("/attendance/user/{}", segment(user_id))).await
    }

    pub async fn fetch_attendance_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Attendance>, ApiError> {
        self.get(&format!(
            "/attendance/date-range?startDate={}&endDate={}",
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d")
        ))
        .await
    }

    /// Record a check-in.
    pub async fn check_in(&self, attendance: &NewAttendance) -> Result<Attendance, ApiError> {
        self.post("/attendance", attendance).await
    }

    pub async fn check_out(&self, id: &str) -> Result<Attendance, ApiError> {
        self.post(&format!("/attendance/{}/check-out", segment(id)), &json!({})).await
    }

    pub async fn generate_qr(&self, user_id: &str) -> Result<QrCode, ApiError> {
        self.post(&format!("/attendance/qr/generate/{}", segment(user_id)), &json!({}))
            .await
    }

    pub async fn verify_qr(&self, verification: &QrVerification) -> Result<Attendance, ApiError> {
        self.post("/attendance/qr/verify", verification).await
    }
}
