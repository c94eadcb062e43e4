//! textconsole - A line-oriented console in the terminal
//!
//! Runs an interactive prompt with command history, a capped transcript
//! and a handful of builtin commands.
//!
//! # Quick Start
//!
//! ```text
//! textconsole                  # Default prompt "> "
//! textconsole -p '$ ' -m 500   # Custom prompt, keep 500 lines
//! ```
//!
//! # Keys
//!
//! | Key | Action |
//! |-----|--------|
//! | Enter, Ctrl+J, Ctrl+M | Submit the line |
//! | Up/Down | Browse history |
//! | Tab | Complete from history |
//! | Ctrl+I | Insert tab expansion |
//! | Ctrl+L | Jump to the end of the transcript |
//! | PageUp/PageDown | Scroll the transcript |
//! | Ctrl+C, Ctrl+D | Quit |

use std::env;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use crossterm::event::{
    self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyEvent, KeyModifiers,
};
use crossterm::execute;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use textconsole::config::{data_dir, ColorScheme, ConsoleConfig};
use textconsole::core::{Console, InputHandler, KeyOutcome};
use textconsole::ui::TerminalSurface;

/// Command line options
#[derive(Default)]
struct Args {
    config_path: Option<PathBuf>,
    prompt: Option<String>,
    greeting: Option<String>,
    max_lines: Option<usize>,
    no_echo: bool,
    no_trim: bool,
    debug: bool,
}

/// Version string from Cargo.toml
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Longest wait between redraws when no alert is pending
const IDLE_POLL: Duration = Duration::from_millis(250);

fn print_version() {
    eprintln!("textconsole {}", VERSION);
}

fn print_help() {
    eprintln!("textconsole {} - A line-oriented console in the terminal", VERSION);
    eprintln!();
    eprintln!("Usage: textconsole [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -c, --config <FILE>     Read configuration from FILE");
    eprintln!("  -p, --prompt <TEXT>     Prompt label");
    eprintln!("  -g, --greeting <TEXT>   Text printed on start and reset");
    eprintln!("  -m, --max-lines <N>     Transcript line cap (0 = unbounded)");
    eprintln!("      --no-echo           Do not echo submitted lines");
    eprintln!("      --no-trim           Keep surrounding whitespace on submit");
    eprintln!("      --debug             Verbose logging");
    eprintln!("  -v, --version           Show version");
    eprintln!("  -h, --help              Show this help");
    eprintln!();
    eprintln!("Builtin commands: help, echo <text>, clear, history, reset, exit");
    eprintln!();
    eprintln!("Configuration: ~/.textconsole/config.toml");
    eprintln!("Color schemes: {}", ColorScheme::list().join(", "));
}

fn parse_args() -> Result<Args, String> {
    let args: Vec<String> = env::args().collect();
    let mut parsed = Args::default();
    let mut i = 1;

    // Value following a flag
    let value = |i: &mut usize, flag: &str| -> Result<String, String> {
        *i += 1;
        args.get(*i)
            .cloned()
            .ok_or_else(|| format!("Missing argument for {}", flag))
    };

    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-v" | "--version" => {
                print_version();
                std::process::exit(0);
            }
            "-c" | "--config" => {
                parsed.config_path = Some(PathBuf::from(value(&mut i, "--config")?));
            }
            "-p" | "--prompt" => {
                parsed.prompt = Some(value(&mut i, "--prompt")?);
            }
            "-g" | "--greeting" => {
                parsed.greeting = Some(value(&mut i, "--greeting")?);
            }
            "-m" | "--max-lines" => {
                let raw = value(&mut i, "--max-lines")?;
                let max = raw
                    .parse()
                    .map_err(|_| format!("Invalid line count: {}", raw))?;
                parsed.max_lines = Some(max);
            }
            "--no-echo" => parsed.no_echo = true,
            "--no-trim" => parsed.no_trim = true,
            "--debug" => parsed.debug = true,
            arg => {
                return Err(format!("Unknown argument: {}. Use -h for help.", arg));
            }
        }
        i += 1;
    }

    Ok(parsed)
}

/// Build the console configuration: file first, then command line overrides
fn load_config(args: &Args) -> anyhow::Result<ConsoleConfig> {
    let mut config = match &args.config_path {
        Some(path) => ConsoleConfig::load_from(path)?,
        None => ConsoleConfig::load(),
    };
    if let Some(prompt) = &args.prompt {
        config.prompt_label = prompt.clone();
    }
    if let Some(greeting) = &args.greeting {
        config.greeting = greeting.clone();
    }
    if let Some(max) = args.max_lines {
        config.max_buffer_lines = max;
    }
    if args.no_echo {
        config.echo_on_submit = false;
    }
    if args.no_trim {
        config.trim_input_on_submit = false;
    }
    Ok(config)
}

fn init_logging(debug: bool) {
    let log_path = data_dir()
        .map(|dir| dir.join("textconsole.log"))
        .unwrap_or_else(|| PathBuf::from("textconsole.log"));

    // Open log file (append mode)
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .ok();

    if let Some(file) = log_file {
        let default_level = if debug { "debug" } else { "info" };
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_level));
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }
}

/// Builtin commands for the demo shell
struct ShellHandler;

impl ShellHandler {
    fn help(console: &mut Console<TerminalSurface>) {
        console.println_styled("Commands:", Some("info"));
        console.println("  help          Show this list");
        console.println("  echo <text>   Print text");
        console.println("  clear         Clear the screen");
        console.println("  history       Show recent commands");
        console.println("  reset         Clear the screen and greet again");
        console.println("  exit          Quit");
    }
}

impl InputHandler<TerminalSurface> for ShellHandler {
    fn on_submit(&mut self, console: &mut Console<TerminalSurface>, line: &str) {
        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim_start()),
            None => (line, ""),
        };
        debug!("Command: {:?}", command);

        match command {
            "" => {}
            "help" => Self::help(console),
            "echo" => console.println(rest),
            "clear" => console.clear_buffer(),
            "history" => {
                let recent: Vec<String> = console
                    .history()
                    .recent(10)
                    .into_iter()
                    .rev()
                    .map(str::to_string)
                    .collect();
                for (n, entry) in recent.iter().enumerate() {
                    console.println_styled(&format!("{:>4}  {}", n + 1, entry), Some("muted"));
                }
            }
            "reset" => {
                console.reset();
                return;
            }
            "exit" => {
                console.unmount();
                return;
            }
            other => {
                console.println_styled(&format!("{}: command not found", other), Some("error"));
            }
        }
        console.prompt();
    }

    fn on_suggest(&mut self, console: &mut Console<TerminalSurface>, input: &str) {
        let found = console.history().complete(input).map(str::to_string);
        match found {
            Some(entry) => console.prompt_with(&entry),
            None => console.bell(),
        }
    }
}

fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let args = match parse_args() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Use --help for usage information");
            std::process::exit(1);
        }
    };

    init_logging(args.debug);
    info!("textconsole {} starting...", VERSION);

    let config = load_config(&args).context("Failed to load configuration")?;
    info!(
        "Prompt {:?}, max lines {}, scheme {}",
        config.prompt_label, config.max_buffer_lines, config.color_scheme
    );

    let mut surface = TerminalSurface::new(&config);
    surface.init().context("Failed to initialize terminal")?;
    let _ = execute!(std::io::stdout(), EnableBracketedPaste);

    let mut console = Console::new(surface, config).with_handler(ShellHandler);
    let result = run(&mut console);

    let _ = execute!(std::io::stdout(), DisableBracketedPaste);
    let _ = console.surface_mut().cleanup();
    if let Err(e) = &result {
        error!("Exited with error: {:#}", e);
    }
    info!("textconsole exiting");
    result
}

/// Ctrl+C or Ctrl+D
fn is_quit_key(event: &KeyEvent) -> bool {
    event.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(event.code, KeyCode::Char('c' | 'd'))
}

fn run(console: &mut Console<TerminalSurface>) -> anyhow::Result<()> {
    console.mount()?;
    console.set_focus(true);
    let (cols, rows) = TerminalSurface::size()?;
    console.resize(cols, rows);
    console.surface_mut().render()?;

    while console.is_mounted() {
        let timeout = console
            .next_deadline()
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
            .unwrap_or(IDLE_POLL)
            .min(IDLE_POLL);

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key_event) => {
                    if console.handle_key(&key_event)? == KeyOutcome::PassThrough {
                        if is_quit_key(&key_event) {
                            info!("Interrupted");
                            console.unmount();
                        } else {
                            console.surface_mut().edit(&key_event);
                        }
                    }
                }
                Event::Paste(text) => console.surface_mut().paste(&text),
                Event::Resize(cols, rows) => {
                    console.resize(cols, rows);
                }
                Event::FocusGained => console.set_focus(true),
                Event::FocusLost => console.set_focus(false),
                _ => {}
            }
        }

        console.tick(Instant::now());
        if console.is_mounted() {
            console.surface_mut().render()?;
        }
    }

    Ok(())
}
