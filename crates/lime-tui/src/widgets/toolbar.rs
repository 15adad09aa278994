//! Toolbar: save, copy and run with their state indicators

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::theme::{palette, styles};

/// Save/Copy/Run buttons.
///
/// Save is highlighted while the configuration differs from the server's
/// copy; Run shows a spinner label while a run is outstanding.
#[derive(Debug, Clone, Copy, Default)]
pub struct Toolbar {
    dirty: bool,
    saving: bool,
    running: bool,
}

impl Toolbar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dirty(mut self, dirty: bool) -> Self {
        self.dirty = dirty;
        self
    }

    pub fn saving(mut self, saving: bool) -> Self {
        self.saving = saving;
        self
    }

    pub fn running(mut self, running: bool) -> Self {
        self.running = running;
        self
    }

    pub fn line(&self) -> Line<'static> {
        let bracket = styles::text_muted();
        let mut spans = Vec::new();

        let (save_label, save_style) = if self.saving {
            ("Saving…", Style::default().fg(palette::STATUS_YELLOW))
        } else if self.dirty {
            (
                "Save ●",
                Style::default()
                    .fg(palette::STATUS_YELLOW)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            ("Save", styles::text_muted())
        };
        spans.extend(button("s", save_label, save_style, bracket));
        spans.push(Span::raw("  "));

        spans.extend(button("c", "Copy", styles::text_secondary(), bracket));
        spans.push(Span::raw("  "));

        let (run_label, run_style) = if self.running {
            (
                "Running…",
                Style::default()
                    .fg(palette::STATUS_GREEN)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            ("Run", styles::text_secondary())
        };
        spans.extend(button("r", run_label, run_style, bracket));

        Line::from(spans)
    }
}

fn button(key: &'static str, label: &'static str, style: Style, bracket: Style) -> [Span<'static>; 4] {
    [
        Span::styled("[", bracket),
        Span::styled(key, styles::keybinding()),
        Span::styled("] ", bracket),
        Span::styled(label, style),
    ]
}

impl Widget for Toolbar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        buf.set_line(area.x, area.y, &self.line(), area.width);
    }
}
