//! Result page for one run

use chrono::{DateTime, SecondsFormat, Utc};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use lime_app::result_page::{ResultPage, RunStatus};

use crate::theme::{palette, styles};

pub struct ResultView<'a> {
    page: &'a ResultPage,
    now: DateTime<Utc>,
    focused: bool,
}

impl<'a> ResultView<'a> {
    pub fn new(page: &'a ResultPage, now: DateTime<Utc>) -> Self {
        Self {
            page,
            now,
            focused: false,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }
}

fn status_span(status: &RunStatus) -> Span<'static> {
    match status {
        RunStatus::Running => Span::styled(
            "↻ Running",
            Style::default().fg(palette::STATUS_YELLOW),
        ),
        RunStatus::Succeeded => Span::styled(
            "✓ Succeeded",
            Style::default()
                .fg(palette::STATUS_GREEN)
                .add_modifier(Modifier::BOLD),
        ),
        RunStatus::Failed(error) => Span::styled(
            format!("✗ Failed: {error}"),
            Style::default()
                .fg(palette::STATUS_RED)
                .add_modifier(Modifier::BOLD),
        ),
    }
}

fn field(label: &'static str, value: Span<'static>) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label:<10}"), styles::text_muted()),
        value,
    ])
}

/// `1h 02m 03s`, `2m 05s` or `7s`
fn format_elapsed(elapsed: chrono::Duration) -> String {
    let secs = elapsed.num_seconds().max(0);
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{h}h {m:02}m {s:02}s")
    } else if m > 0 {
        format!("{m}m {s:02}s")
    } else {
        format!("{s}s")
    }
}

impl Widget for ResultView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = styles::glass_block(self.focused).title(format!(" {} ", self.page.workspace));

        let started = self
            .page
            .started_at
            .to_rfc3339_opts(SecondsFormat::Secs, true);
        let mut lines = vec![
            Line::default(),
            field(
                "Workspace",
                Span::styled(self.page.workspace.clone(), styles::text_primary()),
            ),
            field("Status", status_span(&self.page.status)),
            field("Started", Span::styled(started, styles::text_secondary())),
            field(
                "Elapsed",
                Span::styled(
                    format_elapsed(self.page.elapsed(self.now)),
                    styles::text_secondary(),
                ),
            ),
        ];
        if let Some(finished) = self.page.finished_at {
            lines.push(field(
                "Finished",
                Span::styled(
                    finished.to_rfc3339_opts(SecondsFormat::Secs, true),
                    styles::text_secondary(),
                ),
            ));
        }

        Paragraph::new(lines).block(block).render(area, buf);
    }
}
