mod app;

use action::Action;
use app::App;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::Read;
use std::{error::Error, fs, io, time::Duration};

/// A Turing Machine simulator with a Terminal User Interface.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
#[clap(after_help = "EXAMPLES:
  tur-tui examples/simple.tur -i 3
  cat examples/binary-addition.tur | tur-tui -i 2 -i 3")]
struct Cli {
    /// Path to a Turing machine program file (.tur).
    /// If not provided, the application cycles through built-in demo programs.
    /// Can also be piped via stdin.
    program_file: Option<String>,

    /// Bootstrap input value, one per the program's declared `inputs` count.
    /// Ignored when no program file/stdin is given (demos carry their own).
    #[clap(short = 'i', long = "input")]
    inputs: Vec<u64>,
}

/// Represents the state of the application loop.
#[derive(PartialEq)]
enum AppState {
    Running,
    ShouldQuit,
}

/// A wrapper around the terminal to ensure it's restored on drop.
struct Tui {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl Tui {
    fn new() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture);
        let _ = self.terminal.show_cursor();
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    init_logging();

    let cli = Cli::parse();

    // Load the program before entering the alternate screen: on failure we
    // can print to stderr without having to tear down the terminal first.
    let app = match load_program(&cli) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let mut tui = Tui::new()?;
    run_app(&mut tui.terminal, app)?;

    Ok(())
}

/// Sends `tracing` output to `tur-tui.log` in the current directory, since
/// stdout/stderr are owned by the alternate screen while the TUI is running.
fn init_logging() {
    if let Ok(file) = fs::OpenOptions::new().create(true).append(true).open("tur-tui.log") {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(move || file.try_clone().expect("clone tui log file handle"))
            .try_init();
    }
}

/// Loads a program from a file path, then stdin, falling back to the
/// built-in demo catalogue.
fn load_program(cli: &Cli) -> Result<App, String> {
    if let Some(file_path) = &cli.program_file {
        let content = fs::read_to_string(file_path).map_err(|e| format!("failed to read file '{file_path}': {e}"))?;
        App::new_from_program_string(content, cli.inputs.clone())
    } else if atty::isnt(atty::Stream::Stdin) {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| format!("failed to read from stdin: {e}"))?;
        App::new_from_program_string(buffer, cli.inputs.clone())
    } else {
        Ok(App::new_default())
    }
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, mut app: App) -> io::Result<()> {
    loop {
        terminal.draw(|f| app.render(f))?;

        let timeout = if app.is_auto_playing() {
            Duration::from_millis(500)
        } else {
            Duration::from_millis(100)
        };

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if handle_key_event(&mut app, key) == AppState::ShouldQuit {
                    return Ok(());
                }
            }
        }

        if app.is_auto_playing() {
            app.step_machine();
        }
    }
}

fn handle_key_event(app: &mut App, key: KeyEvent) -> AppState {
    if let Some(action) = app.keymap.get(&key) {
        match action {
            Action::Quit => return AppState::ShouldQuit,
            Action::Reset => app.reset_machine(),
            Action::Step => app.step_machine(),
            Action::ToggleAutoPlay => app.toggle_auto_play(),
            Action::ToggleHelp => app.toggle_help(),
            Action::PreviousProgram => app.previous_program(),
            Action::NextProgram => app.next_program(),
            Action::ScrollUp => app.widen_tape_view(),
            Action::ScrollDown => app.narrow_tape_view(),
        }
    }
    AppState::Running
}
