//! Function table pane rendering

use super::utils::{clamp_scroll, pane_block, visible_rows};
use crate::interpreter::FunctionDefinition;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
    Frame,
};

/// Render the functions defined so far, one per row
pub fn render_functions_pane(
    frame: &mut Frame,
    area: Rect,
    functions: &[FunctionDefinition],
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block(" Functions ", is_focused);

    if functions.is_empty() {
        let paragraph = Paragraph::new("(none defined)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let visible_height = visible_rows(area);
    *scroll_offset = clamp_scroll(*scroll_offset, functions.len(), visible_height);

    let items: Vec<ListItem> = functions
        .iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|f| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:5} ", f.key), Style::default().fg(DEFAULT_THEME.function)),
                Span::styled(format!("@{:<5} ", f.offset), Style::default().fg(DEFAULT_THEME.comment)),
                Span::styled(f.body.as_str(), Style::default().fg(DEFAULT_THEME.fg)),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
