//! Terminal UI module using ratatui.
//!
//! - `render`: frame layout, title/nav/status bars and overlays
//! - `input`: keyboard event handling
//! - `styles`: colors and text styling
//! - `pages`: per-page content
//! - `widgets`: form and text blocks shared by pages

pub mod input;
pub mod pages;
pub mod render;
pub mod styles;
pub mod widgets;
