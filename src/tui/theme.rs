//! Purple color theme for the assistant panel.
//!
//! All color constants are RGB truecolor. Views import from here
//! instead of using inline `Color::*` literals.

use ratatui::style::{Color, Modifier, Style};

// ── Brand ───────────────────────────────────────────────────────────────────

/// Purple: button, user bubbles, focused borders.
pub const PRIMARY: Color = Color::Rgb(0x93, 0x33, 0xEA);
/// Deep purple: panel header background.
pub const PRIMARY_DARK: Color = Color::Rgb(0x7E, 0x22, 0xCE);
/// Pale purple: header subtitle, scrollbar thumb.
pub const PRIMARY_SOFT: Color = Color::Rgb(0xD8, 0xB4, 0xFE);

// ── Backgrounds ─────────────────────────────────────────────────────────────

/// Host screen background.
pub const BG_BASE: Color = Color::Rgb(0x11, 0x11, 0x18);
/// Panel surface behind the transcript.
pub const BG_SURFACE: Color = Color::Rgb(0x1C, 0x1B, 0x26);
/// Assistant bubble fill.
pub const BG_BUBBLE: Color = Color::Rgb(0x2A, 0x28, 0x38);

// ── Text ────────────────────────────────────────────────────────────────────

pub const TEXT: Color = Color::Rgb(0xE5, 0xE7, 0xEB);
pub const TEXT_ON_PRIMARY: Color = Color::Rgb(0xFF, 0xFF, 0xFF);
pub const TEXT_MUTED: Color = Color::Rgb(0x9C, 0xA3, 0xAF);
pub const TEXT_DIM: Color = Color::Rgb(0x4B, 0x55, 0x63);

// ── Style helpers ───────────────────────────────────────────────────────────

pub fn title() -> Style {
    Style::default()
        .fg(TEXT_ON_PRIMARY)
        .add_modifier(Modifier::BOLD)
}

pub fn muted() -> Style {
    Style::default().fg(TEXT_MUTED)
}

pub fn dim() -> Style {
    Style::default().fg(TEXT_DIM)
}

/// Key hint style (e.g., "[q]:quit").
pub fn key_hint() -> Style {
    Style::default().fg(PRIMARY_SOFT).add_modifier(Modifier::BOLD)
}

pub fn border_focused() -> Style {
    Style::default().fg(PRIMARY)
}

/// Floating chat button badge.
pub fn button() -> Style {
    Style::default()
        .fg(TEXT_ON_PRIMARY)
        .bg(PRIMARY)
        .add_modifier(Modifier::BOLD)
}

pub fn header() -> Style {
    Style::default().fg(TEXT_ON_PRIMARY).bg(PRIMARY_DARK)
}

pub fn user_bubble() -> Style {
    Style::default().fg(TEXT_ON_PRIMARY).bg(PRIMARY)
}

pub fn assistant_bubble() -> Style {
    Style::default().fg(TEXT).bg(BG_BUBBLE)
}
