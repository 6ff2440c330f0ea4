//! Outbound notifications an admin can send through the backend.

use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmailMessage {
    pub email: String,
    pub subject: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WhatsAppMessage {
    pub phone: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulkEmail {
    pub emails: Vec<String>,
    pub subject: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpirationNotice {
    pub email: String,
    pub name: String,
    pub expiration_date: NaiveDate,
    pub membership_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenewalNotice {
    pub email: String,
    pub name: String,
    pub new_expiration_date: NaiveDate,
    pub membership_type: String,
}

impl WhatsAppMessage {
    /// Link that opens a chat with the member; the phone keeps digits only.
    pub fn send_url(&self) -> String {
        let digits: String = self.phone.chars().filter(|c| c.is_ascii_digit()).collect();
        format!(
            "https://api.whatsapp.com/send/?phone={}&text={}&type=phone_number&app_absent=0",
            digits,
            urlencoding::encode(&self.message)
        )
    }
}

/// One of the notification kinds offered on the admin page.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    Email(EmailMessage),
    WhatsApp(WhatsAppMessage),
    BulkEmail(BulkEmail),
    MembershipExpiration(ExpirationNotice),
    MembershipRenewal(RenewalNotice),
}

impl Notification {
    pub fn endpoint(&self) -> &'static str {
        match self {
            Notification::Email(_) => "/notifications/email",
            Notification::WhatsApp(_) => "/notifications/whatsapp",
            Notification::BulkEmail(_) => "/notifications/bulk-email",
            Notification::MembershipExpiration(_) => "/notifications/membership-expiration",
            Notification::MembershipRenewal(_) => "/notifications/membership-renewal",
        }
    }

    /// Reject messages the backend would bounce anyway.
    pub fn validate(&self) -> Result<(), String> {
        let blank = |s: &str| s.trim().is_empty();
        match self {
            Notification::Email(m) if blank(&m.email) || blank(&m.subject) || blank(&m.message) => {
                Err("Email, subject and message are required".to_string())
            }
            Notification::WhatsApp(m) if blank(&m.phone) || blank(&m.message) => {
                Err("Enter a phone number and a message".to_string())
            }
            Notification::BulkEmail(m) if m.emails.is_empty() => {
                Err("Select at least one recipient".to_string())
            }
            Notification::BulkEmail(m) if blank(&m.subject) || blank(&m.message) => {
                Err("Subject and message are required".to_string())
            }
            Notification::MembershipExpiration(n) if blank(&n.email) => {
                Err("Select a member".to_string())
            }
            Notification::MembershipRenewal(n) if blank(&n.email) => {
                Err("Select a member".to_string())
            }
            _ => Ok(()),
        }
    }

    pub fn body(&self) -> serde_json::Result<serde_json::Value> {
        match self {
            Notification::Email(m) => serde_json::to_value(m),
            Notification::WhatsApp(m) => serde_json::to_value(m),
            Notification::BulkEmail(m) => serde_json::to_value(m),
            Notification::MembershipExpiration(n) => serde_json::to_value(n),
            Notification::MembershipRenewal(n) => serde_json::to_value(n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiration_notice_uses_camel_case() {
        let n = Notification::MembershipExpiration(ExpirationNotice {
            email: "ana@olimpo.gym".to_string(),
            name: "Ana".to_string(),
            expiration_date: NaiveDate::from_ymd_opt(2026, 11, 1).expect("valid date"),
            membership_type: "MONTHLY".to_string(),
        });
        assert_eq!(n.endpoint(), "/notifications/membership-expiration");
        let body = n.body().expect("serializable");
        assert_eq!(body["expirationDate"], "2026-11-01");
        assert_eq!(body["membershipType"], "MONTHLY");
    }

    #[test]
    fn test_whatsapp_link_strips_phone_formatting() {
        let m = WhatsAppMessage {
            phone: "+54 (376) 400-0000".to_string(),
            message: "Hola Ana".to_string(),
        };
        assert_eq!(
            m.send_url(),
            "https://api.whatsapp.com/send/?phone=543764000000&text=Hola%20Ana&type=phone_number&app_absent=0"
        );
    }

    #[test]
    fn test_validate_requires_fields() {
        let n = Notification::WhatsApp(WhatsAppMessage {
            phone: String::new(),
            message: "hola".to_string(),
        });
        assert!(n.validate().is_err());

        let n = Notification::BulkEmail(BulkEmail {
            emails: vec![],
            subject: "s".to_string(),
            message: "m".to_string(),
        });
        assert!(n.validate().is_err());

        let n = Notification::Email(EmailMessage {
            email: "a@b.c".to_string(),
            subject: "s".to_string(),
            message: "m".to_string(),
        });
        assert!(n.validate().is_ok());
    }
}
