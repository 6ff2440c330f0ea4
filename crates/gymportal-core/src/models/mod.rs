//! Data models for the gym portal.
//!
//! - `UserProfile`, `ApiUser`: the signed-in user and its wire shape
//! - `Membership` and the admin membership forms
//! - `Attendance`, `QrCode`: check-ins
//! - `BlogPost`, `Product`, `Cart`: public content and the shop
//! - `DashboardStats`, `AdminUser`: back-office views
//! - `Notification`: messages an admin can send
//! - `MembershipPlan`, `ContactRequest`: public plans and the contact form

pub mod admin;
pub mod attendance;
pub mod blog;
pub mod contact;
pub mod membership;
pub mod notification;
pub mod product;
pub mod profile;

pub use admin::{
    AdminUser, AttendanceStats, BlogStats, DailyAttendance, DashboardStats, MembershipStats, NewUsers,
    PeakHour, PostViews, RevenuePoint,
};
pub use attendance::{Attendance, NewAttendance, QrCode, QrVerification};
pub use blog::{categories, BlogPost, BlogPostInput};
pub use contact::{prefill_message, ContactRequest, MembershipPlan, PLANS};
pub use membership::{
    Membership, MembershipOwner, MembershipStatus, MembershipType, MembershipUpdate, NewMembership,
    ValidationError, DEFAULT_DAYS_PER_WEEK,
};
pub use notification::{BulkEmail, EmailMessage, ExpirationNotice, Notification, RenewalNotice, WhatsAppMessage};
pub use product::{Cart, Product, ProductInput};
pub use profile::{ApiUser, ProfileUpdate, Registration, UserEnvelope, UserProfile};
