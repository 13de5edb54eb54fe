//! Simulate command handler
//!
//! Runs the engine against a [`SimulatedPlayer`] and prints each
//! notification with the simulated time it happened at. On the virtual
//! clock the whole run completes instantly; `--realtime` uses the wall
//! clock and stops on Ctrl+C.

use std::collections::VecDeque;
use std::fs;
use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::Serialize;
use tracing::{debug, warn};

use notecue::cli::{ActivationSpec, SeekSpec, SimulateArgs};
use notecue::directive::{format_timestamp, parse, Segment};
use notecue::engine::{Engine, Notification, Notifier};
use notecue::player::{Player, SimulatedPlayer};
use notecue::runtime::{Clock, Driver, ManualClock, SystemClock};
use notecue::Config;

/// Prints notifications to stdout, stamped with the clock's time.
struct PrintNotifier<C: Clock> {
    clock: C,
    json: bool,
    count: usize,
}

#[derive(Serialize)]
struct JsonLine<'a> {
    at: f64,
    #[serde(flatten)]
    notification: &'a Notification,
}

impl<C: Clock> Notifier for PrintNotifier<C> {
    fn notify(&mut self, notification: Notification) {
        self.count += 1;
        let at = self.clock.now().as_secs_f64();
        if self.json {
            match serde_json::to_string(&JsonLine {
                at,
                notification: &notification,
            }) {
                Ok(line) => println!("{}", line),
                Err(e) => warn!("Failed to encode notification: {}", e),
            }
        } else {
            println!(
                "{:>9.3}s  {:<7}  {}",
                at, notification.level, notification.message
            );
        }
    }
}

/// What a finished run looked like.
#[derive(Debug)]
struct RunSummary {
    frames: u64,
    elapsed: Duration,
    position: f64,
    notifications: usize,
}

/// Simulate playback of the note in `args.file`.
pub fn handle(args: &SimulateArgs, config: &Config) -> Result<()> {
    let text = fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let segments = parse(&text);
    if segments.is_empty() {
        println!("No directives found in {}", args.file.display());
        return Ok(());
    }
    if !(args.rate > 0.0) {
        bail!("Rate must be positive, got {}", args.rate);
    }
    if let Some(spec) = args.activations.iter().find(|a| a.index >= segments.len()) {
        bail!(
            "No directive #{} to activate ({} directive(s) in {})",
            spec.index,
            segments.len(),
            args.file.display()
        );
    }

    let until = args.until.unwrap_or_else(|| default_until(&segments));
    let stop = Arc::new(AtomicBool::new(false));

    let summary = if args.realtime {
        let flag = Arc::clone(&stop);
        ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst))
            .context("Failed to install Ctrl+C handler")?;
        run(SystemClock::new(), &text, args, config, until, &stop)
    } else {
        run(ManualClock::new(), &text, args, config, until, &stop)
    };

    if !args.json {
        println!();
        println!(
            "Simulated {:.1}s in {} frames: {} notification(s), playhead at {}",
            summary.elapsed.as_secs_f64(),
            summary.frames,
            summary.notifications,
            format_timestamp(summary.position)
        );
    }
    Ok(())
}

/// One second past the last window.
fn default_until(segments: &[Segment]) -> f64 {
    segments
        .iter()
        .map(|s| s.end_time)
        .fold(0.0, f64::max)
        + 1.0
}

fn run<C: Clock + Clone>(
    clock: C,
    text: &str,
    args: &SimulateArgs,
    config: &Config,
    until: f64,
    stop: &AtomicBool,
) -> RunSummary {
    // Long enough for every window and every scripted seek target
    let length = args
        .seeks
        .iter()
        .map(|s| s.to)
        .fold(until.max(args.from).max(default_until(&parse(text))), f64::max)
        + 1.0;

    let mut player =
        SimulatedPlayer::new(clock.clone(), length).with_settings(args.volume, args.rate);
    player.user_seek(args.from);
    if let Err(e) = player.play() {
        warn!("Simulated player refused to start: {}", e);
    }

    let notifier = PrintNotifier {
        clock: clock.clone(),
        json: args.json,
        count: 0,
    };
    let mut engine = Engine::new(player, notifier, config.engine_settings());
    engine.set_text(text);

    let mut activations: VecDeque<ActivationSpec> = sorted_by_time(&args.activations, |a| a.at);
    let mut seeks: VecDeque<SeekSpec> = sorted_by_time(&args.seeks, |s| s.at);
    let max_time = Duration::from_secs_f64(args.max_time.max(0.0));

    let driver = Driver::new(clock, config.poll_interval());
    let mut last_position = args.from;
    let mut last_now = Duration::ZERO;

    let frames = driver.run(&mut engine, |engine, now| {
        let seconds = now.as_secs_f64();

        while let Some(spec) = activations.front().filter(|a| a.at <= seconds).copied() {
            activations.pop_front();
            if let Err(e) = engine.activate(spec.index, spec.point, now) {
                warn!("Activation of #{} failed: {}", spec.index, e);
            }
        }
        while let Some(spec) = seeks.front().filter(|s| s.at <= seconds).copied() {
            seeks.pop_front();
            debug!(to = spec.to, "scripted user seek");
            engine.player_mut().user_seek(spec.to);
        }

        last_now = now;
        last_position = engine.player().current_time().unwrap_or(last_position);
        let scripted = !activations.is_empty() || !seeks.is_empty();
        let finished = last_position >= until && !scripted;

        if finished || now >= max_time || stop.load(Ordering::SeqCst) {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    });

    let (_, notifier) = engine.into_parts();
    RunSummary {
        frames,
        elapsed: last_now,
        position: last_position,
        notifications: notifier.count,
    }
}

fn sorted_by_time<T: Copy>(items: &[T], at: impl Fn(&T) -> f64) -> VecDeque<T> {
    let mut items = items.to_vec();
    items.sort_by(|a, b| at(a).total_cmp(&at(b)));
    items.into()
}
