//! Contact form and the public membership plans that feed it.
//!
//! The gym takes enquiries over WhatsApp: the contact form is rendered into
//! a pre-filled `api.whatsapp.com` link rather than posted to the backend.

/// A plan advertised on the public memberships page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MembershipPlan {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub price: &'static str,
    pub duration_days: u16,
    pub features: &'static [&'static str],
    pub is_popular: bool,
    /// Message pre-filled on the contact form when the plan is chosen.
    pub enquiry: &'static str,
}

pub const PLANS: [MembershipPlan; 3] = [
    MembershipPlan {
        id: "1",
        name: "WEIGHT TRAINING",
        description: "Full access to the weight room",
        price: "Ask for current price",
        duration_days: 30,
        features: &[
            "Unlimited weight room access",
            "Full schedule (8:00 - 22:00)",
            "Initial assessment",
            "Personalized routine",
            "Locker room access",
        ],
        is_popular: false,
        enquiry: "Hi, I'm interested in the WEIGHT TRAINING plan. I'd like more information on how to sign up and the available hours.",
    },
    MembershipPlan {
        id: "2",
        name: "KICKBOXING",
        description: "Kickboxing classes with professional coaches",
        price: "Depends on frequency",
        duration_days: 30,
        features: &[
            "Kickboxing classes",
            "Equipment included",
            "Certified coaches",
            "Locker room access",
            "Flexible hours",
        ],
        is_popular: true,
        enquiry: "Hi, I'm interested in the KICKBOXING plan. I'd like to know the prices per weekly frequency and the class schedule.",
    },
    MembershipPlan {
        id: "3",
        name: "PERSONAL",
        description: "Personal training tailored to your goals",
        price: "Depends on frequency",
        duration_days: 30,
        features: &[
            "Dedicated personal trainer",
            "Nutrition plan",
            "Progress tracking",
            "Hours by arrangement",
            "Full facility access",
            "Weekly assessment",
        ],
        is_popular: false,
        enquiry: "Hi, I'm interested in the PERSONAL plan. I'd like pricing per weekly frequency and to book an interview with a trainer.",
    },
];

impl MembershipPlan {
    /// Contact page location carrying this plan's enquiry text.
    pub fn contact_path(&self) -> String {
        format!("/contact?message={}", urlencoding::encode(self.enquiry))
    }
}

/// Read the `message` query parameter from a contact page location.
pub fn prefill_message(path: &str) -> Option<String> {
    let (_, query) = path.split_once('?')?;
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        if key != "message" {
            return None;
        }
        let value = value.replace('+', " ");
        urlencoding::decode(&value).ok().map(|v| v.into_owned())
    })
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

impl ContactRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() || self.email.trim().is_empty() || self.message.trim().is_empty() {
            return Err("Please fill in the required fields".to_string());
        }
        Ok(())
    }

    /// Text sent to the front desk, WhatsApp-formatted.
    pub fn render_message(&self) -> String {
        let mut text = format!(
            "*Website enquiry - Olimpo Gym*\n*Name:* {}\n*Email:* {}\n",
            self.name.trim(),
            self.email.trim()
        );
        if !self.phone.trim().is_empty() {
            text.push_str(&format!("*Phone:* {}\n", self.phone.trim()));
        }
        text.push_str("*Message:*\n");
        text.push_str(self.message.trim());
        text
    }

    /// Link that opens WhatsApp with the enquiry pre-filled.
    pub fn whatsapp_url(&self, desk_phone: &str) -> String {
        format!(
            "https://api.whatsapp.com/send/?phone={}&text={}&type=phone_number&app_absent=0",
            urlencoding::encode(desk_phone),
            urlencoding::encode(&self.render_message())
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_contact_path_round_trips_through_prefill() {
        let plan = &PLANS[1];
        let path = plan.contact_path();
        assert!(path.starts_with("/contact?message="));
        assert_eq!(prefill_message(&path).as_deref(), Some(plan.enquiry));
    }

    #[test]
    fn test_prefill_message_absent() {
        assert_eq!(prefill_message("/contact"), None);
        assert_eq!(prefill_message("/contact?other=1"), None);
    }

    #[test]
    fn test_contact_validation() {
        let mut req = ContactRequest {
            name: "Ana".to_string(),
            email: "ana@mail.com".to_string(),
            ..Default::default()
        };
        assert!(req.validate().is_err());
        req.message = "Hours?".to_string();
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_whatsapp_url_encodes_message() {
        let req = ContactRequest {
            name: "Ana".to_string(),
            email: "ana@mail.com".to_string(),
            phone: String::new(),
            message: "Hours & prices?".to_string(),
        };
        let url = req.whatsapp_url("542304355852");
        assert!(url.starts_with("https://api.whatsapp.com/send/?phone=542304355852&text="));
        assert!(url.contains("Hours%20%26%20prices%3F"));
        assert!(!req.render_message().contains("*Phone:*"));
    }
}
