//! Config subcommands handler

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::io::{self, BufRead, Write};

use notecue::config::migrate_config;
use notecue::Config;

const GREEN: &str = "\x1b[32m";
const RESET: &str = "\x1b[0m";

/// Show current configuration as TOML.
#[cfg(not(tarpaulin_include))]
pub fn handle_show(config: &Config) -> Result<()> {
    let toml_str = toml::to_string_pretty(config)?;
    print!("{}", toml_str);
    Ok(())
}

/// Print the config file location.
pub fn handle_path() -> Result<()> {
    println!("{}", Config::config_path()?.display());
    Ok(())
}

/// Open configuration file in the default editor.
///
/// Uses $EDITOR environment variable (defaults to 'vi').
#[cfg(not(tarpaulin_include))]
pub fn handle_edit() -> Result<()> {
    let config_path = Config::config_path()?;

    if !config_path.exists() {
        Config::default().save()?;
    }

    let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());
    println!("Opening {} with {}", config_path.display(), editor);

    std::process::Command::new(&editor)
        .arg(&config_path)
        .status()
        .with_context(|| format!("Failed to open editor '{}'", editor))?;

    Ok(())
}

/// Migrate config file by adding missing fields.
///
/// Shows a preview of the additions and asks before writing, unless `yes`
/// is set.
#[cfg(not(tarpaulin_include))]
pub fn handle_migrate(yes: bool) -> Result<()> {
    let config_path = Config::config_path()?;
    let file_exists = config_path.exists();

    let content = if file_exists {
        fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?
    } else {
        String::new()
    };

    let result = migrate_config(&content)?;

    if !result.has_changes() {
        println!("Config is already up to date.");
        return Ok(());
    }

    if file_exists {
        let total_fields = result.added_fields.len();
        let total_sections = result.sections_added.len();
        if total_sections > 0 {
            println!(
                "Found {} missing field(s) in {} new section(s):",
                total_fields, total_sections
            );
        } else {
            println!("Found {} missing field(s):", total_fields);
        }
    } else {
        println!("Config file does not exist. Will create with default settings.");
    }
    println!();
    print_diff_preview(&result.content, &result.added_fields, !file_exists);
    println!();

    let question = if file_exists {
        format!("Apply these changes to {}?", config_path.display())
    } else {
        format!("Create {}?", config_path.display())
    };
    if !yes && !prompt_confirmation(&question)? {
        println!("No changes made.");
        return Ok(());
    }

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&config_path, &result.content)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    if file_exists {
        println!("Config updated successfully.");
    } else {
        println!("Config file created successfully.");
    }
    Ok(())
}

fn use_color() -> bool {
    std::env::var_os("NO_COLOR").is_none() && atty::is(atty::Stream::Stdout)
}

/// Lines of `new_content` to show as additions, with their `+` marker.
///
/// For a new file every non-empty line is an addition. Otherwise only the
/// added fields and the headers of sections they belong to are shown.
fn diff_lines(new_content: &str, added_fields: &[String], is_new_file: bool) -> Vec<String> {
    let added: HashSet<&str> = added_fields.iter().map(String::as_str).collect();
    let mut lines = Vec::new();
    let mut current_section = String::new();
    let mut pending_header: Option<&str> = None;

    for line in new_content.lines() {
        let trimmed = line.trim();

        if trimmed.starts_with('[') && trimmed.ends_with(']') {
            current_section = trimmed[1..trimmed.len() - 1].to_string();
            pending_header = Some(line);
            continue;
        }

        let is_added = match trimmed.find('=') {
            Some(eq) => {
                let key = trimmed[..eq].trim();
                is_new_file || added.contains(format!("{}.{}", current_section, key).as_str())
            }
            None => is_new_file && !trimmed.is_empty(),
        };

        if is_added {
            if let Some(header) = pending_header.take() {
                lines.push(format!("+ {}", header));
            }
            lines.push(format!("+ {}", line));
        }
    }
    lines
}

fn print_diff_preview(new_content: &str, added_fields: &[String], is_new_file: bool) {
    let color = use_color();
    for line in diff_lines(new_content, added_fields, is_new_file) {
        if color {
            println!("{}{}{}", GREEN, line, RESET);
        } else {
            println!("{}", line);
        }
    }
}

/// Prompt user for yes/no confirmation.
///
/// Returns true if user confirms (y/yes), false otherwise.
/// If stdin is not a TTY (non-interactive), returns false.
fn prompt_confirmation(message: &str) -> Result<bool> {
    if !atty::is(atty::Stream::Stdin) {
        println!("Non-interactive mode: use --yes to apply changes automatically");
        return Ok(false);
    }

    print!("{} [y/N] ", message);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;

    let response = input.trim().to_lowercase();
    Ok(response == "y" || response == "yes")
}
