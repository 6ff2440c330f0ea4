//! Display formatting helpers.

pub mod format;

pub use format::{format_date, format_optional, format_phone, format_price, truncate_string, yes_no};
