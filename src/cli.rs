//! CLI definitions for notecue
//!
//! Shared by the main binary and by xtask, which renders the man page from
//! the same definitions.

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::OnceLock;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::directive::ActivationPoint;

/// Version string with build date and, for dev builds, the git commit.
pub fn long_version() -> &'static str {
    static VERSION: OnceLock<String> = OnceLock::new();
    VERSION.get_or_init(|| {
        let mut version = format!(
            "{} (built {})",
            env!("CARGO_PKG_VERSION"),
            option_env!("NOTECUE_BUILD_DATE").unwrap_or("unknown")
        );
        if let Some(sha) = option_env!("VERGEN_GIT_SHA") {
            version.push_str(&format!("\ncommit {}", sha));
        }
        version
    })
}

#[derive(Parser, Debug)]
#[command(name = "notecue")]
#[command(version, long_version = long_version())]
#[command(about = "Time-coded playback directives for video notes")]
#[command(long_about = "Notecue reads playback directives embedded in notes, such as \
[00:01:05-00:01:20, 50%, 1.25x, ->], and drives a video player from them: \
volume and speed for the window, pauses, and jumps to the next directive.")]
pub struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the directives found in a note
    #[command(long_about = "List the playback directives found in a note file.\n\n\
Text that looks like a directive but is out of range (start after end, \
volume above 100%, zero speed) is skipped.\n\n\
EXAMPLES:\n    \
notecue parse lecture.md\n    \
notecue parse lecture.md --json")]
    Parse {
        /// Note file to read
        file: PathBuf,

        /// Print segments as JSON
        #[arg(long)]
        json: bool,
    },

    /// Play a note against a simulated player and print engine activity
    Simulate(SimulateArgs),

    /// Insert a directive into a note
    Stamp(StampArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    #[command(long_about = "Generate shell completion scripts.\n\n\
EXAMPLES:\n    \
notecue completions bash > ~/.local/share/bash-completion/completions/notecue\n    \
notecue completions zsh > ~/.zfunc/_notecue")]
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Args, Debug)]
#[command(long_about = "Run the engine against an in-memory player and print every \
notification it emits.\n\n\
By default the simulation runs on a virtual clock and finishes instantly. \
With --realtime it runs on the wall clock; press Ctrl+C to stop.\n\n\
EXAMPLES:\n    \
notecue simulate lecture.md\n    \
notecue simulate lecture.md --from 55 --until 120\n    \
notecue simulate lecture.md --activate 2:end@10 --seek 30@15")]
pub struct SimulateArgs {
    /// Note file to read
    pub file: PathBuf,

    /// Playhead position to start from (seconds or HH:MM:SS)
    #[arg(long, default_value = "0", value_parser = parse_time)]
    pub from: f64,

    /// Stop once the playhead passes this position (default: after the last directive)
    #[arg(long, value_parser = parse_time)]
    pub until: Option<f64>,

    /// Stop after this much simulated time regardless of position (seconds)
    #[arg(long, default_value_t = 600.0)]
    pub max_time: f64,

    /// Player rate before the first directive
    #[arg(long, default_value_t = 1.0)]
    pub rate: f64,

    /// Player volume before the first directive
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub volume: u8,

    /// Activate a directive as a click would: INDEX[:start|:end]@SECONDS
    #[arg(long = "activate", value_name = "SPEC")]
    pub activations: Vec<ActivationSpec>,

    /// Scrub the playhead as a user would: TARGET@SECONDS
    #[arg(long = "seek", value_name = "SPEC")]
    pub seeks: Vec<SeekSpec>,

    /// Run on the wall clock instead of a virtual one
    #[arg(long)]
    pub realtime: bool,

    /// Print notifications as JSON lines
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
#[command(long_about = "Insert a new directive at a cursor position.\n\n\
The directive covers [AT, AT + DURATION] at 100% and 1.00x. If the directive \
before the cursor has no action and ends after AT, it gains ', ->' so the two \
chain.\n\n\
EXAMPLES:\n    \
notecue stamp lecture.md --at 1:05\n    \
notecue stamp lecture.md --at 65 --cursor 120 --duration 10 --write")]
pub struct StampArgs {
    /// Note file to edit
    pub file: PathBuf,

    /// Start of the new window (seconds or HH:MM:SS)
    #[arg(long, value_parser = parse_time)]
    pub at: f64,

    /// Byte offset to insert at (default: end of file)
    #[arg(long)]
    pub cursor: Option<usize>,

    /// Window length in seconds (default from config)
    #[arg(long)]
    pub duration: Option<f64>,

    /// Write the result back to FILE instead of printing it
    #[arg(long)]
    pub write: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Open configuration file in your editor
    Edit,

    /// Add missing fields to the config file
    #[command(long_about = "Add fields introduced by newer versions to an existing \
config file. Existing values and comments are kept.\n\n\
Shows a preview and asks before writing; pass --yes to skip the prompt.")]
    Migrate {
        /// Apply without asking
        #[arg(short, long)]
        yes: bool,
    },

    /// Print the config file location
    Path,
}

/// A scripted activation: `INDEX[:start|:end]@SECONDS`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActivationSpec {
    pub index: usize,
    pub point: ActivationPoint,
    /// Simulated time at which the activation happens
    pub at: f64,
}

impl FromStr for ActivationSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (target, at) = s
            .split_once('@')
            .ok_or_else(|| format!("expected INDEX[:end]@SECONDS, got '{}'", s))?;
        let (index, point) = match target.split_once(':') {
            Some((index, "start")) => (index, ActivationPoint::Start),
            Some((index, "end")) => (index, ActivationPoint::End),
            Some((_, other)) => return Err(format!("unknown activation point '{}'", other)),
            None => (target, ActivationPoint::Start),
        };
        let index = index
            .trim()
            .parse()
            .map_err(|_| format!("invalid directive index '{}'", index))?;
        Ok(Self {
            index,
            point,
            at: parse_time(at)?,
        })
    }
}

/// A scripted user seek: `TARGET@SECONDS`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeekSpec {
    /// Position to seek to
    pub to: f64,
    /// Simulated time at which the seek happens
    pub at: f64,
}

impl FromStr for SeekSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (to, at) = s
            .split_once('@')
            .ok_or_else(|| format!("expected TARGET@SECONDS, got '{}'", s))?;
        Ok(Self {
            to: parse_time(to)?,
            at: parse_time(at)?,
        })
    }
}

/// Parse `SS`, `MM:SS` or `HH:MM:SS`, each with optional fractional seconds.
pub fn parse_time(s: &str) -> Result<f64, String> {
    let invalid = || format!("invalid time '{}'", s);
    let parts: Vec<&str> = s.trim().split(':').collect();
    if parts.len() > 3 || parts.iter().any(|p| p.is_empty()) {
        return Err(invalid());
    }

    let (seconds, whole) = parts.split_last().ok_or_else(invalid)?;
    let mut total: f64 = seconds.parse().map_err(|_| invalid())?;
    for (unit, part) in whole.iter().rev().enumerate() {
        let value: u32 = part.parse().map_err(|_| invalid())?;
        total += f64::from(value) * 60f64.powi(unit as i32 + 1);
    }

    if total.is_finite() && total >= 0.0 {
        Ok(total)
    } else {
        Err(invalid())
    }
}
