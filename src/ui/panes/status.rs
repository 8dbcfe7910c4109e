//! Status bar rendering with keybindings and state indicators

use crate::interpreter::ExitCode;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use std::time::Duration;

/// State shown in the status bar
pub struct StatusRenderData<'a> {
    pub message: &'a str,
    /// Index of the displayed result in the history, `None` for a live
    /// result that was not recorded
    pub step: Option<usize>,
    pub total_steps: usize,
    pub exit_code: ExitCode,
    pub operations: u64,
    pub elapsed: Duration,
    /// Nothing follows the displayed result
    pub is_at_end: bool,
    pub is_playing: bool,
    /// Bytes retained by the history, and its limit
    pub history_memory: (usize, usize),
}

/// Short label for the exit flags, without the output flags
fn exit_label(exit_code: ExitCode) -> String {
    let context = exit_code - (ExitCode::NO_OUTPUT | ExitCode::TEXT_OUTPUT);
    context.labels().join(" | ")
}

fn step_label(step: Option<usize>, total_steps: usize) -> String {
    match step {
        Some(step) => format!(" Step {}/{} ", step + 1, total_steps),
        None => " Live ".to_string(),
    }
}

fn mebibytes(bytes: usize) -> f64 {
    bytes as f64 / (1024.0 * 1024.0)
}

/// Render the status bar at the bottom
pub fn render_status_bar(frame: &mut Frame, area: Rect, data: &StatusRenderData<'_>) {
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let step_bg = if data.exit_code.is_failure() {
        DEFAULT_THEME.error
    } else if data.exit_code.contains(ExitCode::BREAKPOINT_REACHED) {
        DEFAULT_THEME.secondary
    } else {
        DEFAULT_THEME.success
    };
    let bar_style = Style::default().bg(DEFAULT_THEME.current_line_bg);

    let left_spans = vec![
        Span::styled(
            step_label(data.step, data.total_steps),
            Style::default()
                .bg(step_bg)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {} ", exit_label(data.exit_code)),
            bar_style.fg(step_bg),
        ),
        Span::styled("│", bar_style.fg(DEFAULT_THEME.comment)),
        Span::styled(
            format!(
                " {} ops, {:.2?}, history {:.1}/{:.0} MiB ",
                data.operations,
                data.elapsed,
                mebibytes(data.history_memory.0),
                mebibytes(data.history_memory.1)
            ),
            bar_style.fg(DEFAULT_THEME.fg),
        ),
        Span::styled("│", bar_style.fg(DEFAULT_THEME.comment)),
        Span::styled(format!(" {} ", data.message), bar_style.fg(DEFAULT_THEME.fg)),
    ];

    frame.render_widget(
        Paragraph::new(Line::from(left_spans))
            .style(bar_style)
            .alignment(Alignment::Left),
        layout[0],
    );

    // Right side: Keybinds with visual grouping
    let key_style = Style::default().bg(DEFAULT_THEME.comment).fg(Color::Black);
    let desc_style = bar_style.fg(DEFAULT_THEME.fg);
    let sep_style = bar_style.fg(DEFAULT_THEME.comment);

    let mut right_spans = vec![
        Span::styled(" ←/→ ", key_style),
        Span::styled(" step ", desc_style),
        Span::styled("│", sep_style),
        Span::styled(" ", desc_style),
        Span::styled(" ⎵ ", key_style),
        Span::styled(" play ", desc_style),
        Span::styled("│", sep_style),
        Span::styled(" ", desc_style),
        Span::styled(" ↵ / ⌫ ", key_style),
        Span::styled(" end/start ", desc_style),
        Span::styled("│", sep_style),
        Span::styled(" ", desc_style),
        Span::styled("q", key_style),
        Span::styled(" quit ", desc_style),
    ];

    let indicator = if data.is_playing {
        Some((" ▶ PLAYING ", DEFAULT_THEME.secondary))
    } else if data.is_at_end {
        Some((" END ", DEFAULT_THEME.error))
    } else if data.step == Some(0) {
        Some((" START ", DEFAULT_THEME.success))
    } else {
        None
    };
    if let Some((text, bg)) = indicator {
        right_spans.push(Span::styled("│", sep_style));
        right_spans.push(Span::styled(
            text,
            Style::default()
                .bg(bg)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ));
    }

    frame.render_widget(
        Paragraph::new(Line::from(right_spans))
            .style(bar_style)
            .alignment(Alignment::Right),
        layout[1],
    );
}
