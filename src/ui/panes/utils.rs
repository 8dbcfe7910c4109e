//! Shared helpers for pane rendering
//!
//! All functions in this module are `pub(super)`, making them accessible only
//! within the panes module.

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders},
};

/// A bordered pane block, highlighted when focused
pub(super) fn pane_block(title: &str, is_focused: bool) -> Block<'_> {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style)
}

/// Rows available inside a bordered pane, at least one
pub(super) fn visible_rows(area: Rect) -> usize {
    area.height.saturating_sub(2).max(1) as usize
}

/// Clamp a scroll offset so the last page stays full
pub(super) fn clamp_scroll(offset: usize, total: usize, visible: usize) -> usize {
    if total > visible {
        offset.min(total - visible)
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_scroll() {
        assert_eq!(clamp_scroll(usize::MAX, 10, 4), 6);
        assert_eq!(clamp_scroll(3, 10, 4), 3);
        assert_eq!(clamp_scroll(3, 2, 4), 0);
    }
}
