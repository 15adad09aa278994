//! Semantic style builders

use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders};

use lime_app::qos::{ConsoleStatus, LineKind};
use lime_app::state::StatusLevel;

use super::palette;

// --- Text styles ---
pub fn text_primary() -> Style {
    Style::default().fg(palette::TEXT_PRIMARY)
}

pub fn text_secondary() -> Style {
    Style::default().fg(palette::TEXT_SECONDARY)
}

pub fn text_muted() -> Style {
    Style::default().fg(palette::TEXT_MUTED)
}

// --- Border styles ---
pub fn border_inactive() -> Style {
    Style::default().fg(palette::BORDER_DIM)
}

pub fn border_active() -> Style {
    Style::default().fg(palette::BORDER_ACTIVE)
}

// --- Accent styles ---
pub fn accent() -> Style {
    Style::default().fg(palette::ACCENT)
}

pub fn accent_bold() -> Style {
    Style::default()
        .fg(palette::ACCENT)
        .add_modifier(Modifier::BOLD)
}

pub fn keybinding() -> Style {
    Style::default().fg(palette::STATUS_YELLOW)
}

// --- Selection styles ---

/// "Black on Cyan" - used for focused+selected items across widgets
pub fn focused_selected() -> Style {
    Style::default()
        .fg(palette::CONTRAST_FG)
        .bg(palette::ACCENT)
        .add_modifier(Modifier::BOLD)
}

/// Cursor row when the widget does not have focus
pub fn unfocused_selected() -> Style {
    Style::default()
        .fg(palette::TEXT_PRIMARY)
        .add_modifier(Modifier::REVERSED)
}

// --- Block builders ---
pub fn glass_block(focused: bool) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if focused {
            border_active()
        } else {
            border_inactive()
        })
}

// --- Status mapping ---

pub fn status_line(level: StatusLevel) -> Style {
    match level {
        StatusLevel::Info => text_secondary(),
        StatusLevel::Error => Style::default()
            .fg(palette::STATUS_RED)
            .add_modifier(Modifier::BOLD),
    }
}

/// Console connection indicator: `(icon, label, style)`
pub fn console_indicator(status: ConsoleStatus) -> (&'static str, &'static str, Style) {
    match status {
        ConsoleStatus::Open => (
            "●",
            "Connected",
            Style::default()
                .fg(palette::STATUS_GREEN)
                .add_modifier(Modifier::BOLD),
        ),
        ConsoleStatus::Connecting => (
            "↻",
            "Connecting",
            Style::default().fg(palette::STATUS_YELLOW),
        ),
        ConsoleStatus::Closed => ("✗", "Closed", Style::default().fg(palette::STATUS_RED)),
        ConsoleStatus::Idle => ("○", "Idle", text_muted()),
    }
}

pub fn console_line(kind: LineKind) -> Style {
    match kind {
        LineKind::Info => text_muted(),
        LineKind::CommandSucceeded => Style::default().fg(palette::STATUS_GREEN),
        LineKind::CommandFailed | LineKind::Error => Style::default().fg(palette::STATUS_RED),
        LineKind::Unknown => Style::default().fg(palette::STATUS_YELLOW),
        LineKind::Text => text_primary(),
    }
}
