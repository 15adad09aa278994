//! Navigation tree widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use lime_app::navigation::Navigation;

use crate::theme::styles;

pub struct NavTree<'a> {
    navigation: &'a Navigation,
    focused: bool,
}

impl<'a> NavTree<'a> {
    pub fn new(navigation: &'a Navigation) -> Self {
        Self {
            navigation,
            focused: false,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }
}

impl Widget for NavTree<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = styles::glass_block(self.focused).title(" Sections ");
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 {
            return;
        }

        let active = self.navigation.active();
        let cursor = self.navigation.cursor();
        let nodes = self.navigation.visible_nodes();

        // Keep the cursor on screen
        let height = inner.height as usize;
        let offset = cursor.saturating_sub(height.saturating_sub(1));

        let lines: Vec<Line> = nodes
            .iter()
            .enumerate()
            .skip(offset)
            .take(height)
            .map(|(i, visible)| {
                let node = visible.node;
                let indent = "  ".repeat(visible.depth);
                let marker = if node.is_folder() {
                    "▾ "
                } else if active == Some(node.key) {
                    "▶ "
                } else {
                    "  "
                };

                let mut style = if node.is_folder() {
                    styles::text_muted()
                } else if active == Some(node.key) {
                    styles::accent_bold()
                } else {
                    styles::text_secondary()
                };
                if i == cursor && self.focused {
                    style = styles::focused_selected();
                } else if i == cursor {
                    style = style.add_modifier(Modifier::UNDERLINED);
                }

                Line::from(vec![
                    Span::raw(indent),
                    Span::styled(format!("{marker}{}", node.title), style),
                ])
            })
            .collect();

        Paragraph::new(lines).render(inner, buf);
    }
}
