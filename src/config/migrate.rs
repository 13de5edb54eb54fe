//! Config migration
//!
//! Brings an existing `config.toml` up to date with the current defaults.
//! Only missing sections and fields are added; existing values, comments and
//! formatting are left as the user wrote them.

use anyhow::{bail, Context, Result};
use toml_edit::{DocumentMut, Item};

use super::Config;

/// Outcome of [`migrate_config`].
#[derive(Debug, Clone, PartialEq)]
pub struct MigrateResult {
    /// The migrated file content
    pub content: String,
    /// Added fields as `section.key`
    pub added_fields: Vec<String>,
    /// Sections that did not exist at all
    pub sections_added: Vec<String>,
}

impl MigrateResult {
    pub fn has_changes(&self) -> bool {
        !self.added_fields.is_empty() || !self.sections_added.is_empty()
    }
}

/// Add every field of the default config missing from `content`.
///
/// # Arguments
/// * `content` - Current file content (empty for a new file)
///
/// # Errors
/// Fails when `content` is not valid TOML or a known section is not a table.
pub fn migrate_config(content: &str) -> Result<MigrateResult> {
    let mut doc: DocumentMut = content.parse().context("Failed to parse config file")?;

    let defaults_toml =
        toml::to_string_pretty(&Config::default()).context("Failed to serialize default config")?;
    let defaults: DocumentMut = defaults_toml
        .parse()
        .context("Failed to parse default config")?;

    let mut added_fields = Vec::new();
    let mut sections_added = Vec::new();

    for (section, default_item) in defaults.iter() {
        let Some(default_table) = default_item.as_table() else {
            continue;
        };

        if !doc.contains_key(section) {
            doc.insert(section, Item::Table(default_table.clone()));
            sections_added.push(section.to_string());
            added_fields.extend(
                default_table
                    .iter()
                    .map(|(key, _)| format!("{}.{}", section, key)),
            );
            continue;
        }

        let Some(table) = doc[section].as_table_like_mut() else {
            bail!("Config section [{}] is not a table", section);
        };
        for (key, value) in default_table.iter() {
            if !table.contains_key(key) {
                table.insert(key, value.clone());
                added_fields.push(format!("{}.{}", section, key));
            }
        }
    }

    Ok(MigrateResult {
        content: doc.to_string(),
        added_fields,
        sections_added,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // Up-to-date and empty files
    // ========================================================================

    #[test]
    fn full_default_config_has_no_changes() {
        let content = toml::to_string_pretty(&Config::default()).unwrap();
        let result = migrate_config(&content).unwrap();
        assert!(!result.has_changes());
        assert_eq!(result.content, content);
    }

    #[test]
    fn empty_file_gets_every_section() {
        let result = migrate_config("").unwrap();
        assert_eq!(result.sections_added, vec!["playback", "engine", "stamp", "log"]);
        assert!(result.added_fields.contains(&"engine.suppress_window_ms".to_string()));

        let config: Config = toml::from_str(&result.content).unwrap();
        assert_eq!(config, Config::default());
    }

    // ========================================================================
    // Partial files
    // ========================================================================

    #[test]
    fn missing_fields_are_added_and_values_kept() {
        let content = "# my settings\n[playback]\ndefault_volume = 60 # quieter\n";
        let result = migrate_config(content).unwrap();

        assert!(result.has_changes());
        assert!(result.added_fields.contains(&"playback.default_speed".to_string()));
        assert!(!result.added_fields.contains(&"playback.default_volume".to_string()));
        assert!(!result.sections_added.contains(&"playback".to_string()));
        assert!(result.content.contains("# my settings"));
        assert!(result.content.contains("default_volume = 60 # quieter"));

        let config: Config = toml::from_str(&result.content).unwrap();
        assert_eq!(config.playback.default_volume, 60);
    }

    #[test]
    fn unknown_fields_are_left_alone() {
        let content = "[log]\nlevel = \"debug\"\ncolor = true\n";
        let result = migrate_config(content).unwrap();
        assert!(result.content.contains("color = true"));
        assert!(result.content.contains("level = \"debug\""));
    }

    // ========================================================================
    // Errors
    // ========================================================================

    #[test]
    fn invalid_toml_is_an_error() {
        assert!(migrate_config("[engine").is_err());
    }

    #[test]
    fn non_table_section_is_an_error() {
        let err = migrate_config("engine = 3\n").unwrap_err();
        assert!(err.to_string().contains("[engine]"));
    }
}
