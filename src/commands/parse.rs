//! Parse command handler

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use notecue::directive::{format_timestamp, parse, Segment, SegmentSummary};

/// List the directives in `file`, as a table or as JSON.
pub fn handle(file: &Path, json: bool) -> Result<()> {
    let text = fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let segments = parse(&text);

    if json {
        let summaries: Vec<SegmentSummary> = segments.iter().map(SegmentSummary::from).collect();
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    if segments.is_empty() {
        println!("No directives found in {}", file.display());
        return Ok(());
    }

    print!("{}", render_table(&segments));
    println!();
    println!("{} directive(s)", segments.len());
    Ok(())
}

/// Fixed-width listing, one directive per line.
fn render_table(segments: &[Segment]) -> String {
    let mut out = format!(
        "{:>3}  {:<12}  {:<12}  {:>6}  {:>6}  {}\n",
        "#", "START", "END", "VOLUME", "SPEED", "ACTION"
    );
    for segment in segments {
        out.push_str(&format!(
            "{:>3}  {:<12}  {:<12}  {:>5}%  {:>5.2}x  {}\n",
            segment.sequence_index,
            format_timestamp(segment.start_time),
            format_timestamp(segment.end_time),
            segment.volume,
            segment.speed,
            segment.action
        ));
    }
    out
}
