//! Development tasks for notecue
//!
//! Run with `cargo run -p xtask -- <task>`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "xtask", about = "Development tasks for notecue")]
struct Xtask {
    #[command(subcommand)]
    task: Task,
}

#[derive(Subcommand)]
enum Task {
    /// Render man pages for notecue and its subcommands
    Man {
        /// Output directory
        #[arg(long, default_value = "target/man")]
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    match Xtask::parse().task {
        Task::Man { out } => generate_man_pages(&out),
    }
}

fn generate_man_pages(out: &Path) -> Result<()> {
    fs::create_dir_all(out).with_context(|| format!("Failed to create {}", out.display()))?;

    let cmd = notecue::cli::Cli::command();
    let mut pages = vec![(cmd.get_name().to_string(), cmd.clone())];
    for sub in cmd.get_subcommands() {
        pages.push((format!("{}-{}", cmd.get_name(), sub.get_name()), sub.clone()));
    }

    for (name, page) in pages {
        let mut buffer = Vec::new();
        clap_mangen::Man::new(page)
            .title(name.clone())
            .render(&mut buffer)
            .with_context(|| format!("Failed to render man page for {}", name))?;
        let path = out.join(format!("{}.1", name));
        fs::write(&path, buffer).with_context(|| format!("Failed to write {}", path.display()))?;
        println!("Wrote {}", path.display());
    }
    Ok(())
}
