//! Stamp command handler

use std::fs;

use anyhow::{bail, Context, Result};

use notecue::cli::StampArgs;
use notecue::directive::insert_stamp;
use notecue::Config;

/// Insert a directive into `args.file`, printing the result or writing it back.
pub fn handle(args: &StampArgs, config: &Config) -> Result<()> {
    let text = fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    let duration = args.duration.unwrap_or(config.stamp.default_duration);
    if !(duration.is_finite() && duration > 0.0) {
        bail!("Duration must be a positive number of seconds, got {}", duration);
    }

    let cursor = args.cursor.unwrap_or(text.len());
    if cursor > text.len() {
        bail!(
            "Cursor {} is past the end of {} ({} bytes)",
            cursor,
            args.file.display(),
            text.len()
        );
    }

    let outcome = insert_stamp(&text, cursor, args.at, duration);

    if !args.write {
        print!("{}", outcome.text);
        return Ok(());
    }

    fs::write(&args.file, &outcome.text)
        .with_context(|| format!("Failed to write {}", args.file.display()))?;
    println!("Inserted {} into {}", outcome.directive, args.file.display());
    if outcome.chained {
        println!("Previous directive now auto-jumps into it (->)");
    }
    Ok(())
}
