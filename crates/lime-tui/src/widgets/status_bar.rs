//! Bottom status line: last feedback message and key hints

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Widget,
};

use lime_app::navigation::SectionKey;
use lime_app::state::{Focus, StatusLevel};
use lime_app::AppState;

use crate::theme::{palette, styles};

pub struct StatusBar<'a> {
    state: &'a AppState,
}

impl<'a> StatusBar<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    fn message(&self) -> Option<Span<'static>> {
        if let Some(error) = &self.state.load_error {
            return Some(Span::styled(
                format!("Failed to load configuration: {error}"),
                styles::status_line(StatusLevel::Error),
            ));
        }
        if !self.state.is_ready() {
            return Some(Span::styled(
                "Loading configuration...",
                styles::text_secondary(),
            ));
        }
        self.state
            .status
            .as_ref()
            .map(|status| Span::styled(status.text.clone(), styles::status_line(status.level)))
    }

    fn hints(&self) -> &'static [(&'static str, &'static str)] {
        if self.state.config_page.is_renaming() {
            return &[("Enter", "apply"), ("Esc", "cancel")];
        }
        if !self.state.is_ready() {
            return &[("q", "quit")];
        }
        match (self.state.focus, self.state.active_section()) {
            (Focus::Navigation, _) => &[("↑↓", "move"), ("Enter", "open"), ("Tab", "page"), ("q", "quit")],
            (Focus::Page, Some(SectionKey::Configuration)) => &[
                ("Enter", "select"),
                ("Space", "toggle"),
                ("J/K", "move"),
                ("a", "add"),
                ("d", "remove"),
                ("e", "rename"),
                ("Tab", "nav"),
            ],
            (Focus::Page, Some(SectionKey::Qos)) => &[("↑↓", "job"), ("+/-", "rate"), ("Tab", "nav"), ("q", "quit")],
            (Focus::Page, _) => &[("Tab", "nav"), ("q", "quit")],
        }
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        buf.set_style(area, Style::default().bg(palette::DEEPEST_BG));

        let mut hint_spans = Vec::new();
        for (key, label) in self.hints() {
            hint_spans.push(Span::styled(format!("[{key}]"), styles::keybinding()));
            hint_spans.push(Span::styled(format!(" {label}  "), styles::text_muted()));
        }
        let hints = Line::from(hint_spans);
        let hints_width = hints.width() as u16;

        let message_width = match self.message() {
            Some(message) => {
                let line = Line::from(vec![Span::raw(" "), message]);
                buf.set_line(area.x, area.y, &line, area.width);
                line.width() as u16
            }
            None => 0,
        };

        // Hints are right-aligned and only drawn when they don't overlap
        if message_width + hints_width < area.width {
            let x = area.x + area.width - hints_width;
            buf.set_line(x, area.y, &hints, hints_width);
        }
    }
}
