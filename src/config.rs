use serde::Deserialize;
use std::fs;
use std::path::Path;

static DEFAULT_CONFIG: &str = include_str!("default_config.toml");

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub word: WordConfig,
    pub csv: CsvConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct WordConfig {
    pub code_font: String,
    pub quote_style: String,
    pub output_name: String,
}

impl Default for WordConfig {
    fn default() -> Self {
        Self {
            code_font: "Courier New".to_string(),
            quote_style: "IntenseQuote".to_string(),
            output_name: "document_converter.docx".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct CsvConfig {
    pub delimiter: String,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            delimiter: ",".to_string(),
        }
    }
}

impl CsvConfig {
    /// Field delimiter as a byte. Falls back to a comma when the configured
    /// value is empty or not a single ASCII character.
    pub fn delimiter_byte(&self) -> u8 {
        match self.delimiter.as_bytes() {
            [b] if b.is_ascii() => *b,
            _ => b',',
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// The config baked into the binary (validated by build.rs).
    pub fn compiled_default() -> Self {
        toml::from_str(DEFAULT_CONFIG).unwrap_or_default()
    }

    /// Parse config from TOML text. Missing sections and fields take their
    /// defaults.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load config from a TOML file. A missing file gives the compiled
    /// defaults; an invalid one gives the compiled defaults together with the
    /// parse error, so the caller can report it once logging is set up.
    pub fn load(path: &Path) -> (Self, Option<toml::de::Error>) {
        match fs::read_to_string(path) {
            Ok(content) => match Self::from_toml(&content) {
                Ok(config) => (config, None),
                Err(e) => (Self::compiled_default(), Some(e)),
            },
            Err(_) => (Self::compiled_default(), None),
        }
    }
}
