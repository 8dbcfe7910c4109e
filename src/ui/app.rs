//! Main TUI application state and logic

use super::panes::{
    render_functions_pane, render_source_pane, render_status_bar, render_tape_pane,
    render_terminal_pane, SourceRenderData, SourceScrollState, StatusRenderData, TapeScrollState,
};
use crate::interpreter::InterpreterResult;
use crate::session::{Session, SessionHistory};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};
use tracing::warn;

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Source,
    Tape,
    Output,
    Functions,
}

impl FocusedPane {
    /// Move focus to the next pane (clockwise: source -> output -> tape -> functions)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Output,
            FocusedPane::Output => FocusedPane::Tape,
            FocusedPane::Tape => FocusedPane::Functions,
            FocusedPane::Functions => FocusedPane::Source,
        }
    }

    /// Move focus to the previous pane (counter-clockwise)
    pub fn prev(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Functions,
            FocusedPane::Output => FocusedPane::Source,
            FocusedPane::Tape => FocusedPane::Output,
            FocusedPane::Functions => FocusedPane::Tape,
        }
    }
}

/// The main application state
pub struct App {
    /// The session being debugged
    pub session: Session,

    /// Results of every step taken so far
    pub history: SessionHistory,

    /// Index of the displayed result in `history`, or `history.len()` for the
    /// live session result once recording has stopped
    pub position: usize,

    /// The script as written, comments included
    pub source_code: String,

    pub focused_pane: FocusedPane,

    /// Per-pane scroll offsets
    pub source_scroll: SourceScrollState,
    pub tape_scroll: TapeScrollState,
    pub output_scroll: usize,
    pub functions_scroll: usize,

    pub should_quit: bool,

    /// Whether new steps are still added to `history`
    pub recording: bool,

    /// Status message to display
    pub status_message: String,

    /// Whether auto-continue mode is active
    pub is_playing: bool,

    /// Last time a step was taken in play mode
    pub last_play_time: Instant,

    /// Last time space was pressed (for debouncing)
    pub last_space_press: Instant,
}

impl App {
    /// Create a new app for an initialized session
    pub fn new(session: Session, source_code: String, history_limit: usize) -> Self {
        let mut history = SessionHistory::new(history_limit);
        let (recording, status_message) = match history.push(session.result().clone()) {
            Ok(()) => (true, String::from("Ready!")),
            Err(e) => (false, format!("Not recording: {e}")),
        };
        let long_ago = Instant::now()
            .checked_sub(Duration::from_secs(1))
            .unwrap_or_else(Instant::now);

        App {
            session,
            history,
            position: 0,
            source_code,
            focused_pane: FocusedPane::Source,
            source_scroll: SourceScrollState {
                offset: 0,
                target_line_row: None, // Centered on first render
            },
            tape_scroll: TapeScrollState {
                offset: 0,
                last_position: None,
            },
            output_scroll: 0,
            functions_scroll: 0,
            should_quit: false,
            recording,
            status_message,
            is_playing: false,
            last_play_time: long_ago,
            last_space_press: long_ago,
        }
    }

    /// The result currently displayed
    pub fn current(&self) -> &InterpreterResult {
        self.history
            .get(self.position)
            .unwrap_or_else(|| self.session.result())
    }

    /// Position of the last viewable result; one past the history once
    /// recording has stopped, where the live session result is shown
    fn last_position(&self) -> usize {
        if self.recording {
            self.history.len().saturating_sub(1)
        } else {
            self.history.len()
        }
    }

    /// Whether the last result is displayed and nothing follows it
    pub fn is_at_end(&self) -> bool {
        self.position >= self.last_position() && !self.session.can_continue()
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            // Handle auto-play mode
            if self.is_playing && self.last_play_time.elapsed() >= Duration::from_secs(1) {
                if self.is_at_end() {
                    self.is_playing = false;
                    self.status_message = "Playback complete".to_string();
                } else {
                    self.step_forward();
                }
                self.last_play_time = Instant::now();
            }

            // Use poll with timeout to allow auto-play to work
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(main_chunks[0]);

        // Left column: Source (top) | Output (bottom)
        let left_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(columns[0]);

        // Right column: Tape (top) | Functions (bottom)
        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(columns[1]);

        let breakpoints = self.session.breakpoints();
        let result = self
            .history
            .get(self.position)
            .unwrap_or_else(|| self.session.result());

        render_source_pane(
            frame,
            left_rows[0],
            &SourceRenderData {
                source: &self.source_code,
                stop_offset: result.trace.as_ref().map(|t| t.offset),
                is_error: result.exit_code.is_failure(),
                breakpoints: &breakpoints,
            },
            self.focused_pane == FocusedPane::Source,
            &mut self.source_scroll,
        );

        render_terminal_pane(
            frame,
            left_rows[1],
            &result.output,
            self.focused_pane == FocusedPane::Output,
            &mut self.output_scroll,
        );

        render_tape_pane(
            frame,
            right_rows[0],
            &result.tape,
            self.focused_pane == FocusedPane::Tape,
            &mut self.tape_scroll,
        );

        render_functions_pane(
            frame,
            right_rows[1],
            &result.functions,
            self.focused_pane == FocusedPane::Functions,
            &mut self.functions_scroll,
        );

        render_status_bar(
            frame,
            main_chunks[1],
            &StatusRenderData {
                message: &self.status_message,
                step: (self.position < self.history.len()).then_some(self.position),
                total_steps: self.history.len(),
                exit_code: result.exit_code,
                operations: result.total_operations,
                elapsed: result.elapsed,
                is_at_end: self.is_at_end(),
                is_playing: self.is_playing,
                history_memory: (self.history.memory_usage(), self.history.memory_limit()),
            },
        );
    }

    /// Handle keyboard events
    fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::BackTab => {
                self.focused_pane = self.focused_pane.prev();
            }
            KeyCode::Left => {
                self.is_playing = false;
                self.step_backward();
            }
            KeyCode::Right | KeyCode::Char('n') => {
                self.is_playing = false;
                self.step_forward();
            }
            KeyCode::Up => match self.focused_pane {
                FocusedPane::Source => {
                    // Scrolling up makes the current line move down visually
                    if let Some(row) = self.source_scroll.target_line_row {
                        self.source_scroll.target_line_row = Some(row.saturating_add(1));
                    }
                }
                FocusedPane::Tape => {
                    self.tape_scroll.offset = self.tape_scroll.offset.saturating_sub(1);
                }
                FocusedPane::Output => {
                    self.output_scroll = self.output_scroll.saturating_sub(1);
                }
                FocusedPane::Functions => {
                    self.functions_scroll = self.functions_scroll.saturating_sub(1);
                }
            },
            KeyCode::Down => match self.focused_pane {
                FocusedPane::Source => {
                    // Scrolling down makes the current line move up visually
                    if let Some(row) = self.source_scroll.target_line_row {
                        self.source_scroll.target_line_row = Some(row.saturating_sub(1));
                    }
                }
                FocusedPane::Tape => {
                    self.tape_scroll.offset = self.tape_scroll.offset.saturating_add(1);
                }
                FocusedPane::Output => {
                    self.output_scroll = self.output_scroll.saturating_add(1);
                }
                FocusedPane::Functions => {
                    self.functions_scroll = self.functions_scroll.saturating_add(1);
                }
            },
            KeyCode::Char(' ') => {
                // Toggle auto-play mode (with 200ms debounce to prevent key repeat spam)
                if self.last_space_press.elapsed() >= Duration::from_millis(200) {
                    self.last_space_press = Instant::now();
                    self.is_playing = !self.is_playing;
                    self.status_message = if self.is_playing {
                        "Playing...".to_string()
                    } else {
                        "Paused".to_string()
                    };
                }
            }
            KeyCode::Enter => {
                self.is_playing = false;
                self.jump_to_end();
            }
            KeyCode::Backspace => {
                self.is_playing = false;
                self.jump_to_start();
            }
            _ => {}
        }
    }

    /// Show the next result, advancing the session past the last one
    pub fn step_forward(&mut self) {
        if self.position < self.last_position() {
            self.position += 1;
            self.status_message = "Stepped forward".to_string();
        } else if self.session.can_continue() {
            match self.session.resume() {
                Ok(()) => self.record("Continued to next breakpoint"),
                Err(e) => self.status_message = format!("Cannot continue: {e}"),
            }
        } else {
            self.status_message = "Execution finished".to_string();
        }
        self.output_scroll = usize::MAX;
    }

    /// Show the previous result
    pub fn step_backward(&mut self) {
        if self.position > 0 {
            self.position -= 1;
            self.status_message = "Stepped backward".to_string();
        } else {
            self.status_message = "Already at the first step".to_string();
        }
        self.output_scroll = usize::MAX;
    }

    /// Run the session to completion and show the final result
    pub fn jump_to_end(&mut self) {
        if self.session.can_continue() {
            match self.session.run_to_completion() {
                Ok(()) => self.record("Ran to completion"),
                Err(e) => self.status_message = format!("Cannot continue: {e}"),
            }
        } else {
            self.position = self.last_position();
            self.status_message = "Jumped to end".to_string();
        }
        self.output_scroll = usize::MAX;
    }

    pub fn jump_to_start(&mut self) {
        self.position = 0;
        self.status_message = "Jumped to start".to_string();
        self.output_scroll = usize::MAX;
    }

    /// Append the session's latest result to history and show it
    ///
    /// Once the history is full, recording stops for good and the live
    /// session result is shown past the end of the history instead.
    fn record(&mut self, message: &str) {
        if self.recording {
            match self.history.push(self.session.result().clone()) {
                Ok(()) => {
                    self.position = self.history.len() - 1;
                    self.status_message = message.to_string();
                    return;
                }
                Err(e) => {
                    warn!(error = %e, "history full, recording stopped");
                    self.recording = false;
                    self.is_playing = false;
                }
            }
        }
        self.position = self.history.len();
        self.status_message = format!("{message} (history full, not recorded)");
    }
}
