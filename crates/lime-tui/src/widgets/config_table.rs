//! Configuration page: job table, rename editor and JSON preview

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, StatefulWidget, Table, TableState, Widget},
};
use serde_json::Value;

use lime_app::config_page::ConfigPage;
use lime_app::control_table::ControlTable;
use lime_core::{ConfigDocument, JOB_ID_KEY};

use crate::layout;
use crate::theme::{palette, styles};

pub struct ConfigView<'a> {
    doc: &'a ConfigDocument,
    table: &'a ControlTable,
    page: &'a ConfigPage,
    focused: bool,
}

impl<'a> ConfigView<'a> {
    pub fn new(doc: &'a ConfigDocument, table: &'a ControlTable, page: &'a ConfigPage) -> Self {
        Self {
            doc,
            table,
            page,
            focused: false,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    fn render_table(&self, area: Rect, buf: &mut Buffer) {
        let title = format!(" Jobs ({}) ", self.doc.job_count());
        let block = styles::glass_block(self.focused).title(title);
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        // Reserve the last line for the rename editor
        let (table_area, editor_area) = if self.page.is_renaming() && inner.height > 2 {
            let [table, editor] =
                Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(inner);
            (table, Some(editor))
        } else {
            (inner, None)
        };

        if self.doc.job_count() == 0 {
            Paragraph::new(Line::styled(
                "No jobs. Press [a] to add one.",
                styles::text_muted(),
            ))
            .render(table_area, buf);
        } else {
            let rows: Vec<Row> = self
                .doc
                .jobs()
                .iter()
                .enumerate()
                .map(|(i, job)| {
                    let marker = if self.table.is_selected(i) { "●" } else { " " };
                    let job_id = job
                        .get(JOB_ID_KEY)
                        .and_then(Value::as_str)
                        .unwrap_or("(no id)")
                        .to_string();
                    Row::new(vec![
                        Cell::from(Span::styled(marker, styles::accent())),
                        Cell::from(Span::styled(i.to_string(), styles::text_muted())),
                        Cell::from(Span::styled(job_id, styles::text_primary())),
                        Cell::from(Span::styled(row_details(job), styles::text_secondary())),
                    ])
                })
                .collect();

            let header = Row::new(vec!["", "#", "job_id", "details"]).style(styles::text_muted());
            let highlight = if self.focused {
                styles::focused_selected()
            } else {
                styles::unfocused_selected()
            };
            let table = Table::new(
                rows,
                [
                    Constraint::Length(1),
                    Constraint::Length(3),
                    Constraint::Length(16),
                    Constraint::Min(8),
                ],
            )
            .header(header)
            .row_highlight_style(highlight);

            let mut state = TableState::default().with_selected(Some(self.table.cursor));
            StatefulWidget::render(table, table_area, buf, &mut state);
        }

        if let (Some(editor), Some(area)) = (&self.page.rename, editor_area) {
            let line = Line::from(vec![
                Span::styled(format!("Rename row {}: ", editor.index), styles::keybinding()),
                Span::styled(editor.buffer.as_str(), styles::text_primary()),
                Span::styled("▏", styles::accent()),
            ]);
            buf.set_line(area.x, area.y, &line, area.width);
        }
    }

    fn render_preview(&self, area: Rect, buf: &mut Buffer) {
        let block = styles::glass_block(false).title(" JSON ");
        let text: Vec<Line> = self
            .doc
            .serialized()
            .lines()
            .map(|line| Line::styled(line.to_string(), Style::default().fg(palette::TEXT_SECONDARY)))
            .collect();
        Paragraph::new(text)
            .block(block)
            .scroll((self.page.preview_scroll, 0))
            .render(area, buf);
    }
}

/// Every field except the job id, as `key=value`
fn row_details(job: &Value) -> String {
    match job.as_object() {
        Some(fields) => fields
            .iter()
            .filter(|(key, _)| key.as_str() != JOB_ID_KEY)
            .map(|(key, value)| match value {
                Value::String(s) => format!("{key}={s}"),
                other => format!("{key}={other}"),
            })
            .collect::<Vec<_>>()
            .join(" "),
        None => job.to_string(),
    }
}

impl Widget for ConfigView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (table, preview) = layout::split_configuration(area);
        self.render_table(table, buf);
        self.render_preview(preview, buf);
    }
}
