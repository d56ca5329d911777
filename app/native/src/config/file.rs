//! INI-backed configuration provider.

use std::path::{Path, PathBuf};

use ini::{Ini, ParseOption};

use super::{ConfigError, ConfigProvider};

/// Parsed INI file.
///
/// Section and key names are matched case-insensitively and the last
/// matching entry wins. Values may be wrapped in single or double quotes;
/// backslashes are kept as written.
#[derive(Debug, Clone, Default)]
pub struct IniConfig {
    ini: Ini,
    source: Option<PathBuf>,
}

impl IniConfig {
    /// Parses INI text.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Syntax` if the text is not valid INI.
    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_str_opt(contents, parse_options())?;
        Ok(Self { ini, source: None })
    }

    /// Reads and parses the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Read` if the file cannot be read or parsed.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_file_opt(path, parse_options())?;
        Ok(Self { ini, source: Some(path.to_path_buf()) })
    }

    /// Records the file this configuration came from.
    #[must_use]
    pub fn with_source(mut self, path: PathBuf) -> Self {
        self.source = Some(path);
        self
    }
}

impl ConfigProvider for IniConfig {
    fn get(&self, section: &str, key: &str, default: &str) -> String {
        self.ini
            .iter()
            .filter(|(name, _)| name.unwrap_or_default().eq_ignore_ascii_case(section))
            .flat_map(|(_, props)| props.iter())
            .filter(|(name, _)| name.eq_ignore_ascii_case(key))
            .fold(None, |_, (_, value)| Some(value))
            .map_or_else(|| default.to_string(), str::to_string)
    }

    fn source_path(&self) -> Option<&Path> { self.source.as_deref() }
}

fn parse_options() -> ParseOption {
    ParseOption { enabled_escape: false, ..ParseOption::default() }
}
