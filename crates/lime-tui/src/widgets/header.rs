//! Header bar widget
//!
//! App title and server address on the left, toolbar on the right.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Widget,
};

use lime_app::qos::ConsoleStatus;

use crate::theme::{palette, styles};

use super::Toolbar;

pub struct MainHeader<'a> {
    server: &'a str,
    console: ConsoleStatus,
    toolbar: Option<Toolbar>,
}

impl<'a> MainHeader<'a> {
    pub fn new(server: &'a str) -> Self {
        Self {
            server,
            console: ConsoleStatus::Idle,
            toolbar: None,
        }
    }

    /// Status of the QoS console connection, shown as the title dot
    pub fn console(mut self, status: ConsoleStatus) -> Self {
        self.console = status;
        self
    }

    /// Show the toolbar; omitted until a configuration is loaded
    pub fn with_toolbar(mut self, toolbar: Toolbar) -> Self {
        self.toolbar = Some(toolbar);
        self
    }
}

impl Widget for MainHeader<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = styles::glass_block(false).style(Style::default().bg(palette::CARD_BG));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let (icon, _label, icon_style) = styles::console_indicator(self.console);
        let left = Line::from(vec![
            Span::raw(" "),
            Span::styled(icon, icon_style),
            Span::raw(" "),
            Span::styled("LIME Console", styles::accent_bold()),
            Span::raw(" "),
            Span::styled("/", styles::text_muted()),
            Span::raw(" "),
            Span::styled(self.server, styles::text_secondary()),
        ]);
        let left_width = left.width() as u16;
        buf.set_line(inner.x, inner.y, &left, inner.width);

        if let Some(toolbar) = self.toolbar {
            let line = toolbar.line();
            let width = line.width() as u16 + 1;
            // Drop the toolbar rather than overlap the title
            if left_width + width + 2 <= inner.width {
                let x = inner.x + inner.width - width;
                buf.set_line(x, inner.y, &line, width);
            }
        }
    }
}
