//! Script output pane rendering

use super::utils::{clamp_scroll, pane_block, visible_rows};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{List, ListItem, Padding, Paragraph},
    Frame,
};

/// Render the text written by `.` so far
pub fn render_terminal_pane(
    frame: &mut Frame,
    area: Rect,
    output: &str,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block(" Output ", is_focused);

    if output.is_empty() {
        let paragraph = Paragraph::new("(no output)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let block = block.padding(Padding::new(1, 0, 0, 0));
    let lines: Vec<String> = output
        .split('\n')
        .map(|line| line.chars().map(printable).collect())
        .collect();

    let visible_height = visible_rows(area);
    *scroll_offset = clamp_scroll(*scroll_offset, lines.len(), visible_height);

    let items: Vec<ListItem> = lines
        .into_iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|line| ListItem::new(line).style(Style::default().fg(DEFAULT_THEME.fg)))
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

/// Control characters would corrupt the terminal; show them as `·`
fn printable(c: char) -> char {
    if c.is_control() {
        '·'
    } else {
        c
    }
}
