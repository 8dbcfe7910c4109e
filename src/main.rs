// TapeTTY: Stepping PBrain Interpreter with Tape Visualization

use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::EnvFilter;

use tapetty::codegen::translate_to_c;
use tapetty::interpreter::constants::DEFAULT_TAPE_SIZE;
use tapetty::interpreter::{InterpreterConfig, InterpreterResult};
use tapetty::memory::OverflowMode;
use tapetty::session::Session;
use tapetty::ui::App;

/// Memory the debugger may spend on step history (256 MB)
const HISTORY_LIMIT: usize = 256 * 1024 * 1024;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    /// Signed 16-bit cells; overflow is an error
    Short,
    /// Byte cells that wrap around
    Byte,
}

#[derive(Parser, Debug)]
#[command(
    name = "tapetty",
    about = "Run and step through Brainfuck/PBrain scripts with a live view of the tape."
)]
struct Args {
    /// Script to run
    file: PathBuf,

    /// Cell overflow behaviour
    #[arg(long, value_enum, default_value_t = Mode::Short)]
    mode: Mode,

    /// Number of tape cells
    #[arg(long, default_value_t = DEFAULT_TAPE_SIZE)]
    tape_size: usize,

    /// Abort runs that take longer than this many milliseconds
    #[arg(long, value_name = "MS")]
    timeout_ms: Option<u64>,

    /// Text consumed by `,`
    #[arg(long, default_value = "")]
    input: String,

    /// Pause before the first operator at or after this line (1-based, repeatable)
    #[arg(long = "break-at", value_name = "LINE")]
    break_at: Vec<usize>,

    /// Run without the debugger and print the result
    #[arg(long, action = clap::ArgAction::SetTrue)]
    headless: bool,

    /// Print the script translated to C and exit
    #[arg(long, action = clap::ArgAction::SetTrue)]
    emit_c: bool,
}

impl Args {
    fn config(&self) -> InterpreterConfig {
        let mode = match self.mode {
            Mode::Short => OverflowMode::ShortNoOverflow,
            Mode::Byte => OverflowMode::ByteOverflow,
        };
        let config = InterpreterConfig::default()
            .with_mode(mode)
            .with_tape_size(self.tape_size);
        match self.timeout_ms {
            Some(ms) => config.with_time_budget(Duration::from_millis(ms)),
            None => config,
        }
    }
}

/// Split `source` into chunks starting at each of the given 1-based lines
fn split_at_lines<'a>(source: &'a str, lines: &[usize]) -> Vec<&'a str> {
    let mut starts: Vec<usize> = source
        .match_indices('\n')
        .map(|(i, _)| i + 1)
        .enumerate()
        .filter(|(line, _)| lines.contains(&(line + 2)))
        .map(|(_, start)| start)
        .collect();
    starts.dedup();

    let mut chunks = Vec::with_capacity(starts.len() + 1);
    let mut previous = 0;
    for start in starts {
        chunks.push(&source[previous..start]);
        previous = start;
    }
    chunks.push(&source[previous..]);
    chunks
}

fn print_summary(result: &InterpreterResult) {
    eprintln!(
        "[{}] {} operations in {:.2?}",
        result.exit_code.labels().join(" | "),
        result.total_operations,
        result.elapsed
    );
    if let Some(trace) = &result.trace {
        eprintln!("  at offset {}", trace.offset);
        for frame in &trace.frames {
            eprintln!("    {frame}");
        }
    }
}

fn run_headless(session: &mut Session) -> ExitCode {
    // Output is cumulative across steps; print only what each step added
    let mut printed = 0;
    loop {
        let result = session.result();
        print!("{}", &result.output[printed..]);
        printed = result.output.len();
        print_summary(result);
        if !session.can_continue() {
            break;
        }
        if let Err(e) = session.resume() {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    }

    if session.result().exit_code.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn run_tui(session: Session, source: String) -> Result<(), Box<dyn std::error::Error>> {
    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(session, source, HISTORY_LIMIT);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res?;
    Ok(())
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let source = match fs::read_to_string(&args.file) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error: cannot read '{}': {}", args.file.display(), e);
            return Ok(ExitCode::FAILURE);
        }
    };

    if args.emit_c {
        match translate_to_c(&source, args.tape_size) {
            Ok(program) => {
                print!("{program}");
                return Ok(ExitCode::SUCCESS);
            }
            Err(e) => {
                eprintln!("Error: {e}");
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    let chunks = split_at_lines(&source, &args.break_at);
    let mut session = match Session::initialize(&chunks, &args.input, &args.config()) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Error: {e}");
            return Ok(ExitCode::FAILURE);
        }
    };

    if args.headless {
        return Ok(run_headless(&mut session));
    }

    run_tui(session, source)?;
    Ok(ExitCode::SUCCESS)
}
