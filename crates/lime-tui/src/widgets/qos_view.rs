//! QoS page: one gauge per job, the selected job's rate chart and the
//! console pane

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Chart, Dataset, Gauge, GraphType, Paragraph, Widget},
};

use lime_app::qos::QosPage;
use lime_core::JobView;

use crate::layout;
use crate::theme::{palette, styles};

pub struct QosView<'a> {
    page: &'a QosPage,
    focused: bool,
}

impl<'a> QosView<'a> {
    pub fn new(page: &'a QosPage) -> Self {
        Self {
            page,
            focused: false,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    fn render_jobs(&self, area: Rect, buf: &mut Buffer) {
        let (icon, label, style) = styles::console_indicator(self.page.status);
        let title = Line::from(vec![
            Span::raw(" Jobs "),
            Span::styled(format!("{icon} {label} "), style),
        ]);
        let block = styles::glass_block(self.focused).title(title);
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        if self.page.board.is_empty() {
            Paragraph::new(Line::styled("No jobs configured", styles::text_muted()))
                .render(inner, buf);
            return;
        }

        // Two lines per job; scroll so the selection stays visible
        let per_screen = (inner.height / 2).max(1) as usize;
        let offset = self.page.selected.saturating_sub(per_screen - 1);

        for (slot, (i, job)) in self
            .page
            .board
            .iter()
            .enumerate()
            .skip(offset)
            .take(per_screen)
            .enumerate()
        {
            let y = inner.y + (slot as u16) * 2;
            let selected = i == self.page.selected;
            buf.set_line(inner.x, y, &job_label(job, selected), inner.width);

            if y + 1 < inner.y + inner.height {
                let gauge_area = Rect::new(inner.x + 2, y + 1, inner.width.saturating_sub(2), 1);
                self.job_gauge(job).render(gauge_area, buf);
            }
        }
    }

    fn job_gauge(&self, job: &JobView) -> Gauge<'static> {
        let rate = job.current_rate.unwrap_or(0) as f64;
        let ratio = if self.page.gauge_max > 0.0 {
            (rate / self.page.gauge_max).clamp(0.0, 1.0)
        } else {
            0.0
        };
        Gauge::default()
            .gauge_style(Style::default().fg(palette::GAUGE_FILL).bg(palette::CARD_BG))
            .ratio(ratio)
            .label(Span::styled(
                format!("{:.0}%", ratio * 100.0),
                styles::text_primary(),
            ))
    }

    fn render_chart(&self, area: Rect, buf: &mut Buffer) {
        let job = self.page.board.get_index(self.page.selected);
        let title = match job {
            Some(job) => format!(" {} ", job.job_id),
            None => " Rate ".to_string(),
        };
        let block = styles::glass_block(false).title(title);

        let Some(job) = job.filter(|job| !job.window.is_empty()) else {
            Paragraph::new(Line::styled("Waiting for datapoints…", styles::text_muted()))
                .block(block)
                .render(area, buf);
            return;
        };

        let (first, last) = job.time_bounds().unwrap_or((0, 0));
        let points: Vec<(f64, f64)> = job
            .window
            .iter()
            .map(|p| (p.timestamp_ms.saturating_sub(first) as f64 / 1000.0, p.rate as f64))
            .collect();

        let x_max = (last.saturating_sub(first) as f64 / 1000.0).max(1.0);
        let y_max = job
            .peak_rate()
            .map(|peak| peak as f64)
            .into_iter()
            .chain(job.rate_limit)
            .fold(1.0_f64, f64::max)
            * 1.1;

        let limit_line: Vec<(f64, f64)> = job
            .rate_limit
            .map(|limit| vec![(0.0, limit), (x_max, limit)])
            .unwrap_or_default();

        let mut datasets = vec![Dataset::default()
            .name("rate")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(palette::CHART_LINE))
            .data(&points)];
        if !limit_line.is_empty() {
            datasets.push(
                Dataset::default()
                    .name("limit")
                    .marker(symbols::Marker::Dot)
                    .graph_type(GraphType::Line)
                    .style(Style::default().fg(palette::RATE_LIMIT))
                    .data(&limit_line),
            );
        }

        let chart = Chart::new(datasets)
            .block(block)
            .x_axis(
                Axis::default()
                    .style(styles::text_muted())
                    .bounds([0.0, x_max])
                    .labels(vec!["0s".to_string(), format!("{x_max:.0}s")]),
            )
            .y_axis(
                Axis::default()
                    .style(styles::text_muted())
                    .bounds([0.0, y_max])
                    .labels(vec!["0".to_string(), format!("{y_max:.0}")]),
            );
        chart.render(area, buf);
    }

    fn render_console(&self, area: Rect, buf: &mut Buffer) {
        let block = styles::glass_block(false).title(" Console ");
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 {
            return;
        }

        // Newest lines at the bottom
        let visible = inner.height as usize;
        let skip = self.page.console.len().saturating_sub(visible);
        let lines: Vec<Line> = self
            .page
            .console
            .iter()
            .skip(skip)
            .map(|line| Line::styled(line.text.clone(), styles::console_line(line.kind)))
            .collect();
        Paragraph::new(lines).render(inner, buf);
    }
}

fn job_label(job: &JobView, selected: bool) -> Line<'static> {
    let id_style = if selected {
        styles::accent_bold()
    } else {
        styles::text_primary()
    };
    let rate = match job.current_rate {
        Some(rate) => format!("{rate} MB/s"),
        None => "–".to_string(),
    };
    let mut spans = vec![
        Span::styled(if selected { "▶ " } else { "  " }, styles::accent()),
        Span::styled(job.job_id.clone(), id_style),
        Span::raw("  "),
        Span::styled(rate, styles::text_secondary().add_modifier(Modifier::BOLD)),
    ];
    if let Some(limit) = job.rate_limit {
        spans.push(Span::styled(
            format!("  limit {limit:.0}"),
            Style::default().fg(palette::RATE_LIMIT),
        ));
    }
    Line::from(spans)
}

impl Widget for QosView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (jobs, chart, console) = layout::split_qos(area, self.page.board.len());
        self.render_jobs(jobs, buf);
        self.render_chart(chart, buf);
        self.render_console(console, buf);
    }
}
