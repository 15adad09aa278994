//! Main render/view function (View in TEA pattern)


use chrono::Utc;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::{Block, Paragraph};
use ratatui::Frame;

use lime_app::navigation::SectionKey;
use lime_app::state::Focus;
use lime_app::AppState;

use super::{layout, widgets};
use crate::theme::{palette, styles};

/// Render the complete UI (View function in TEA)
///
/// Pure with respect to `state`: every widget borrows what it shows.
pub fn view(frame: &mut Frame, state: &AppState) {
    let area = frame.area();

    // Fill entire terminal with deepest background color
    let bg_block = Block::default().style(Style::default().bg(palette::DEEPEST_BG));
    frame.render_widget(bg_block, area);

    let areas = layout::create(area);

    let mut header = widgets::MainHeader::new(state.endpoints.base().as_str()).console(state.qos.status);
    if state.is_ready() {
        header = header.with_toolbar(
            widgets::Toolbar::new()
                .dirty(state.is_dirty())
                .saving(state.control_table.save_in_flight())
                .running(state.control_table.is_running()),
        );
    }
    frame.render_widget(header, areas.header);

    frame.render_widget(
        widgets::NavTree::new(&state.navigation).focused(state.focus == Focus::Navigation),
        areas.nav,
    );

    render_page(frame, areas.page, state);

    frame.render_widget(widgets::StatusBar::new(state), areas.status);
}

fn render_page(frame: &mut Frame, area: Rect, state: &AppState) {
    if !state.is_ready() {
        render_placeholder(frame, area, state);
        return;
    }

    let focused = state.focus == Focus::Page;
    match state.active_section() {
        Some(SectionKey::Qos) => {
            frame.render_widget(widgets::QosView::new(&state.qos).focused(focused), area);
        }
        Some(SectionKey::Configuration) => {
            frame.render_widget(
                widgets::ConfigView::new(&state.doc, &state.control_table, &state.config_page)
                    .focused(focused),
                area,
            );
        }
        Some(SectionKey::Result(index)) => match state.results.get(index) {
            Some(page) => frame.render_widget(
                widgets::ResultView::new(page, Utc::now()).focused(focused),
                area,
            ),
            None => render_placeholder(frame, area, state),
        },
        _ => render_placeholder(frame, area, state),
    }
}

fn render_placeholder(frame: &mut Frame, area: Rect, state: &AppState) {
    let text = match (&state.load_error, state.is_ready()) {
        (Some(_), _) => "Configuration unavailable",
        (None, false) => "Loading configuration...",
        (None, true) => "Select a page from the navigation tree",
    };
    let inner_height = area.height.saturating_sub(2);
    let mut lines = vec![Line::default(); (inner_height / 2) as usize];
    lines.push(Line::styled(text, styles::text_muted()));

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(styles::glass_block(false));
    frame.render_widget(paragraph, area);
}
