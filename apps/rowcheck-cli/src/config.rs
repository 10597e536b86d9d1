use crate::error::{CliError, CliResult};
use clap::ValueEnum;
use rowcheck_csvs::ReadOptions;
use rowcheck_engine::EngineConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// How results are rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Progress and summary on stdout, diagnostics streamed to stderr
    #[default]
    Text,
    /// One JSON document with the summary and every diagnostic
    Json,
}

/// Validation settings file structure (YAML)
///
/// ```yaml
/// workers: 8
/// has_headers: true
/// delimiter: ";"
/// comment: "#"
/// format: json
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValidateConfig {
    /// Worker threads; omitted means one per core
    pub workers: Option<usize>,

    /// Skip the first line as a header
    #[serde(default)]
    pub has_headers: bool,

    pub delimiter: Option<char>,

    pub comment: Option<char>,

    pub format: Option<OutputFormat>,
}

impl ValidateConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> CliResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    pub fn from_yaml_str(text: &str) -> CliResult<Self> {
        // An empty file is a valid, empty config
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }
}

/// Values given on the command line; each one wins over the config file
#[derive(Debug, Clone, Default)]
pub struct ValidateOverrides {
    pub workers: Option<usize>,
    pub has_headers: bool,
    pub delimiter: Option<char>,
    pub comment: Option<char>,
    pub format: Option<OutputFormat>,
}

/// Fully resolved settings for one `validate` run
#[derive(Debug, Clone, PartialEq)]
pub struct ValidateSettings {
    pub engine: EngineConfig,
    pub read: ReadOptions,
    pub format: OutputFormat,
}

impl ValidateSettings {
    pub fn resolve(file: ValidateConfig, flags: &ValidateOverrides) -> CliResult<Self> {
        let engine = EngineConfig::from_worker_count(flags.workers.or(file.workers))?;

        let mut read = ReadOptions {
            has_headers: flags.has_headers || file.has_headers,
            ..ReadOptions::default()
        };
        if let Some(delimiter) = flags.delimiter.or(file.delimiter) {
            read.delimiter = ascii_byte(delimiter, "delimiter")?;
        }
        if let Some(comment) = flags.comment.or(file.comment) {
            read.comment = Some(ascii_byte(comment, "comment")?);
        }

        Ok(Self {
            engine,
            read,
            format: flags.format.or(file.format).unwrap_or_default(),
        })
    }
}

fn ascii_byte(c: char, what: &str) -> CliResult<u8> {
    if c.is_ascii() {
        Ok(c as u8)
    } else {
        Err(CliError::InvalidConfig(format!(
            "{} must be a single ASCII character, got '{}'",
            what, c
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let settings =
            ValidateSettings::resolve(ValidateConfig::default(), &ValidateOverrides::default())
                .unwrap();

        assert_eq!(settings.engine, EngineConfig::default());
        assert_eq!(settings.read, ReadOptions::default());
        assert_eq!(settings.format, OutputFormat::Text);
    }

    #[test]
    fn test_load_yaml_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "workers: 3\nhas_headers: true\ndelimiter: \";\"\nformat: json").unwrap();

        let config = ValidateConfig::load(file.path()).unwrap();
        let settings = ValidateSettings::resolve(config, &ValidateOverrides::default()).unwrap();

        assert_eq!(settings.engine.resolved_workers().get(), 3);
        assert!(settings.read.has_headers);
        assert_eq!(settings.read.delimiter, b';');
        assert_eq!(settings.format, OutputFormat::Json);
    }

    #[test]
    fn test_flags_override_file() {
        let file = ValidateConfig::from_yaml_str("workers: 3\nformat: json\ncomment: \"#\"").unwrap();
        let flags = ValidateOverrides {
            workers: Some(5),
            format: Some(OutputFormat::Text),
            ..Default::default()
        };

        let settings = ValidateSettings::resolve(file, &flags).unwrap();

        assert_eq!(settings.engine.resolved_workers().get(), 5);
        assert_eq!(settings.format, OutputFormat::Text);
        assert_eq!(settings.read.comment, Some(b'#'));
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(ValidateConfig::from_yaml_str("\n").unwrap(), ValidateConfig::default());
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let result = ValidateConfig::from_yaml_str("wrokers: 2");
        assert!(matches!(result, Err(CliError::Yaml(_))));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let flags = ValidateOverrides {
            workers: Some(0),
            ..Default::default()
        };
        assert!(matches!(
            ValidateSettings::resolve(ValidateConfig::default(), &flags),
            Err(CliError::Engine(_))
        ));

        let flags = ValidateOverrides {
            delimiter: Some('§'),
            ..Default::default()
        };
        assert!(matches!(
            ValidateSettings::resolve(ValidateConfig::default(), &flags),
            Err(CliError::InvalidConfig(_))
        ));
    }
}
