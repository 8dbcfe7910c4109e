//! Tape pane rendering
//!
//! One row per cell: index, value and the value as a character. The row under
//! the pointer is highlighted and kept in view unless the user scrolls away.

use super::utils::{clamp_scroll, pane_block, visible_rows};
use crate::memory::Tape;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem},
    Frame,
};

/// Scroll state for the tape pane
pub struct TapeScrollState {
    pub offset: usize,
    /// Pointer position at the last render, to follow it when it moves
    pub last_position: Option<usize>,
}

fn cell_char(value: u16) -> String {
    match char::from_u32(u32::from(value)) {
        Some(c) if !c.is_control() => format!("'{c}'"),
        _ => String::from("   "),
    }
}

/// Render the tape pane
pub fn render_tape_pane(
    frame: &mut Frame,
    area: Rect,
    tape: &Tape,
    is_focused: bool,
    scroll_state: &mut TapeScrollState,
) {
    let title = format!(" Tape [{}/{}] ", tape.position(), tape.len());
    let block = pane_block(&title, is_focused);
    let visible_height = visible_rows(area);

    // Follow the pointer only when it moved
    if scroll_state.last_position != Some(tape.position()) {
        let position = tape.position();
        if position < scroll_state.offset || position >= scroll_state.offset + visible_height {
            scroll_state.offset = position.saturating_sub(visible_height / 2);
        }
        scroll_state.last_position = Some(position);
    }
    scroll_state.offset = clamp_scroll(scroll_state.offset, tape.len(), visible_height);

    let items: Vec<ListItem> = tape
        .cells()
        .iter()
        .enumerate()
        .skip(scroll_state.offset)
        .take(visible_height)
        .map(|(index, &value)| {
            let is_current = index == tape.position();
            let (marker, style) = if is_current {
                (
                    "▶",
                    Style::default()
                        .fg(DEFAULT_THEME.secondary)
                        .bg(DEFAULT_THEME.current_line_bg)
                        .add_modifier(Modifier::BOLD),
                )
            } else if value == 0 {
                (" ", Style::default().fg(DEFAULT_THEME.comment))
            } else {
                (" ", Style::default().fg(DEFAULT_THEME.fg))
            };

            ListItem::new(Line::from(vec![
                Span::styled(marker, style),
                Span::styled(format!("{index:4} │ "), Style::default().fg(DEFAULT_THEME.comment)),
                Span::styled(format!("{value:5} "), style),
                Span::styled(cell_char(value), Style::default().fg(DEFAULT_THEME.io)),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_char() {
        assert_eq!(cell_char(97), "'a'");
        assert_eq!(cell_char(10), "   ");
        // Lone surrogates are not characters
        assert_eq!(cell_char(0xD800), "   ");
    }
}
