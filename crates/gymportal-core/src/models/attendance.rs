use serde::{Deserialize, Serialize};

/// A gym check-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attendance {
    pub id: String,
    pub user_id: String,
    pub check_in: String,
    #[serde(default)]
    pub check_out: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Attendance {
    pub fn is_open(&self) -> bool {
        self.check_out.is_none()
    }
}

/// Body of `POST /attendance`.
#[derive(Debug, Clone, Serialize)]
pub struct NewAttendance {
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// QR payload handed to a member for self check-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QrCode {
    #[serde(alias = "qrCode", alias = "qr")]
    pub qr_code: String,
    #[serde(default, alias = "expiresAt")]
    pub expires_at: Option<String>,
}

/// Body of `POST /attendance/qr/verify`.
#[derive(Debug, Clone, Serialize)]
pub struct QrVerification {
    pub qr_data: String,
}
