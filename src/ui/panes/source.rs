//! Source code pane rendering with operator highlighting
//!
//! This module renders the source pane, which displays the script exactly as
//! written, comments included, with execution indicators.
//!
//! # Features
//!
//! - Operators colored by class (pointer, arithmetic, I/O, loop, function);
//!   everything else is rendered as a comment
//! - The operator a run stopped at is highlighted, in red after a failure
//! - Breakpoint operators are underlined and their lines marked with `●`
//! - The line of the stop position is kept at a fixed row while stepping
//!
//! Offsets are char indices, so lines are walked char by char rather than
//! sliced by byte.

use super::utils::{clamp_scroll, pane_block, visible_rows};
use crate::parser::Operator;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// What the source pane shows
pub struct SourceRenderData<'a> {
    pub source: &'a str,
    /// Offset of the operator the current result stopped at
    pub stop_offset: Option<usize>,
    pub is_error: bool,
    /// Breakpoint offsets, ascending
    pub breakpoints: &'a [usize],
}

/// Scroll state for the source pane
pub struct SourceScrollState {
    pub offset: usize,
    pub target_line_row: Option<usize>,
}

/// 1-based number of the line containing char `offset`
pub fn line_of_offset(source: &str, offset: usize) -> usize {
    source.chars().take(offset).filter(|&c| c == '\n').count() + 1
}

/// Lines of `source`, each paired with the char offset of its first character
fn indexed_lines(source: &str) -> Vec<(usize, &str)> {
    let mut lines = Vec::new();
    let mut start = 0;
    for line in source.split('\n') {
        lines.push((start, line));
        start += line.chars().count() + 1;
    }
    lines
}

fn operator_style(op: Operator) -> Style {
    let color = match op {
        Operator::MoveNext | Operator::MoveBack => DEFAULT_THEME.pointer,
        Operator::Plus | Operator::Minus => DEFAULT_THEME.arith,
        Operator::PrintChar | Operator::ReadChar => DEFAULT_THEME.io,
        Operator::LoopStart | Operator::LoopEnd => DEFAULT_THEME.bracket,
        Operator::FunctionStart | Operator::FunctionEnd | Operator::FunctionCall => {
            DEFAULT_THEME.function
        }
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

/// Highlight one line whose first character sits at `start`
fn highlight_line<'a>(line: &'a str, start: usize, data: &SourceRenderData<'_>) -> Vec<Span<'a>> {
    let mut spans = Vec::new();
    let mut comment = String::new();

    for (i, c) in line.trim_end_matches('\r').chars().enumerate() {
        let offset = start + i;
        let Some(op) = Operator::from_char(c) else {
            comment.push(c);
            continue;
        };
        if !comment.is_empty() {
            spans.push(Span::styled(
                std::mem::take(&mut comment),
                Style::default().fg(DEFAULT_THEME.comment),
            ));
        }

        let mut style = operator_style(op);
        if data.breakpoints.binary_search(&offset).is_ok() {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        if data.stop_offset == Some(offset) {
            let bg = if data.is_error {
                DEFAULT_THEME.error
            } else {
                DEFAULT_THEME.secondary
            };
            style = style.bg(bg).fg(Color::Black);
        }
        spans.push(Span::styled(c.to_string(), style));
    }

    if !comment.is_empty() {
        spans.push(Span::styled(comment, Style::default().fg(DEFAULT_THEME.comment)));
    }
    spans
}

/// Render the source code pane
pub fn render_source_pane(
    frame: &mut Frame,
    area: Rect,
    data: &SourceRenderData<'_>,
    is_focused: bool,
    scroll_state: &mut SourceScrollState,
) {
    let block = pane_block(" Source ", is_focused);

    let lines = indexed_lines(data.source);
    let total_lines = lines.len();
    let visible_height = visible_rows(area);
    let current_line = data.stop_offset.map(|o| line_of_offset(data.source, o));

    // Keep the current line at the same visual row while stepping
    let target_row = scroll_state
        .target_line_row
        .unwrap_or(visible_height / 2)
        .min(visible_height.saturating_sub(1));
    scroll_state.target_line_row = Some(target_row);

    if let Some(line) = current_line {
        scroll_state.offset = line.saturating_sub(1).saturating_sub(target_row);
    }
    scroll_state.offset = clamp_scroll(scroll_state.offset, total_lines, visible_height);

    let visible_lines: Vec<Line> = lines
        .iter()
        .enumerate()
        .skip(scroll_state.offset)
        .take(visible_height)
        .map(|(idx, &(start, line))| {
            let line_num = idx + 1;
            let is_current = current_line == Some(line_num);
            let end = start + line.chars().count();
            let has_breakpoint = data
                .breakpoints
                .iter()
                .any(|&b| b >= start && b < end);

            let marker = if has_breakpoint { "●" } else { " " };
            let num_style = if is_current {
                Style::default()
                    .fg(DEFAULT_THEME.secondary)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DEFAULT_THEME.comment)
            };

            let mut spans = vec![
                Span::styled(marker, Style::default().fg(DEFAULT_THEME.error)),
                Span::styled(format!("{:4} ", line_num), num_style),
            ];
            let content = highlight_line(line, start, data);
            if is_current {
                // The stop marker keeps its own background
                spans.extend(content.into_iter().map(|s| {
                    if s.style.bg.is_some() {
                        s
                    } else {
                        s.patch_style(Style::default().bg(DEFAULT_THEME.current_line_bg))
                    }
                }));
            } else {
                spans.extend(content);
            }
            Line::from(spans)
        })
        .collect();

    let paragraph = Paragraph::new(visible_lines).block(block);
    frame.render_widget(paragraph, area);
}
