//! Screen layout definitions for the TUI
//!
//! ```text
//! ┌ header + toolbar ─────────────────────────┐
//! ├ navigation ┬ page ────────────────────────┤
//! │            │                              │
//! └────────────┴──────────────────────────────┘
//!  status line
//! ```

use ratatui::layout::{Constraint, Layout, Rect};

/// Width of the navigation tree on wide terminals
pub const NAV_WIDTH: u16 = 28;

/// Screen areas for the main layout
#[derive(Debug, Clone, Copy)]
pub struct ScreenAreas {
    /// Title, server address and toolbar
    pub header: Rect,
    /// Navigation tree
    pub nav: Rect,
    /// Active section
    pub page: Rect,
    /// One-line status feedback
    pub status: Rect,
}

/// Create the main screen layout
pub fn create(area: Rect) -> ScreenAreas {
    let [header, body, status] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .areas(area);

    // Narrow terminals give the tree a quarter of the width
    let nav_width = NAV_WIDTH.min(body.width / 4).max(1);
    let [nav, page] =
        Layout::horizontal([Constraint::Length(nav_width), Constraint::Min(1)]).areas(body);

    ScreenAreas {
        header,
        nav,
        page,
        status,
    }
}

/// Split the Configuration page into the row table and the JSON preview
pub fn split_configuration(area: Rect) -> (Rect, Rect) {
    let [table, preview] =
        Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)]).areas(area);
    (table, preview)
}

/// Split the QoS page into job rows, the selected job's chart, and the console
pub fn split_qos(area: Rect, job_count: usize) -> (Rect, Rect, Rect) {
    // Two rows per job (label + gauge) plus borders
    let rows_height = (job_count as u16).saturating_mul(2).saturating_add(2).max(4);
    let [rows, chart, console] = Layout::vertical([
        Constraint::Max(rows_height),
        Constraint::Min(6),
        Constraint::Length(8),
    ])
    .areas(area);
    (rows, chart, console)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_layout_standard_terminal() {
        let area = Rect::new(0, 0, 120, 40);
        let layout = create(area);

        assert_eq!(layout.header.height, 3);
        assert_eq!(layout.status.height, 1);
        assert_eq!(layout.status.y, 39);
        assert_eq!(layout.nav.width, NAV_WIDTH);
        assert_eq!(layout.nav.height, 36);
        assert_eq!(layout.page.x, NAV_WIDTH);
        assert_eq!(layout.page.width, 120 - NAV_WIDTH);
    }

    #[test]
    fn test_layout_areas_contiguous() {
        let area = Rect::new(0, 0, 80, 24);
        let layout = create(area);

        assert_eq!(
            layout.header.height + layout.nav.height + layout.status.height,
            area.height
        );
        assert_eq!(layout.nav.width + layout.page.width, area.width);
    }

    #[test]
    fn test_narrow_terminal_shrinks_navigation() {
        let layout = create(Rect::new(0, 0, 60, 20));
        assert_eq!(layout.nav.width, 15);
    }

    #[test]
    fn test_qos_split_keeps_console() {
        let area = Rect::new(0, 0, 80, 30);
        let (rows, chart, console) = split_qos(area, 3);

        assert_eq!(rows.height, 8);
        assert_eq!(console.height, 8);
        assert_eq!(rows.height + chart.height + console.height, area.height);
    }
}
