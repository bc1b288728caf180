//! Application configuration loading for CLI defaults.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use booklib_core::MAX_RESULTS_LIMIT;

/// File configuration for booklib defaults.
#[derive(Debug, Clone, Default)]
pub struct FileConfig {
    /// Favorites database file.
    pub database_path: Option<PathBuf>,
    /// Catalog API root.
    pub catalog_base_url: Option<String>,
    /// Catalog API key.
    pub api_key: Option<String>,
    /// Query sent when `search` is run without one.
    pub default_query: Option<String>,
    /// Default page size for `search`.
    pub max_results: Option<u32>,
    pub connect_timeout_secs: Option<u64>,
    pub read_timeout_secs: Option<u64>,
    /// Optional database pool max connections (1..=20).
    pub db_max_connections: Option<u32>,
    /// Optional database busy timeout in milliseconds.
    pub db_busy_timeout_ms: Option<u32>,
    /// Default verbosity mode.
    pub verbosity: Option<VerbositySetting>,
}

impl FileConfig {
    /// Validates config values against runtime and CLI constraints.
    pub fn validate(&self) -> Result<()> {
        if let Some(max_results) = self.max_results
            && !(1..=MAX_RESULTS_LIMIT).contains(&max_results)
        {
            bail!(
                "Invalid config value for `max_results`: {max_results}. Expected range: 1..={MAX_RESULTS_LIMIT}"
            );
        }
        if let Some(query) = &self.default_query
            && query.trim().is_empty()
        {
            bail!("Invalid config value for `default_query`: must not be blank");
        }
        if let Some(base_url) = &self.catalog_base_url
            && !(base_url.starts_with("http://") || base_url.starts_with("https://"))
        {
            bail!(
                "Invalid config value for `catalog_base_url`: '{base_url}'. Expected an http(s) URL"
            );
        }
        validate_timeout_secs("connect_timeout_secs", self.connect_timeout_secs)?;
        validate_timeout_secs("read_timeout_secs", self.read_timeout_secs)?;
        validate_db_max_connections(self.db_max_connections)?;
        validate_db_busy_timeout_ms(self.db_busy_timeout_ms)?;

        Ok(())
    }
}

fn validate_db_max_connections(value: Option<u32>) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    if !(1..=20).contains(&value) {
        bail!("Invalid config value for `db_max_connections`: {value}. Expected range: 1..=20");
    }
    Ok(())
}

fn validate_db_busy_timeout_ms(value: Option<u32>) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    if value > 120_000 {
        bail!("Invalid config value for `db_busy_timeout_ms`: {value}. Expected range: 0..=120000");
    }
    Ok(())
}

fn validate_timeout_secs(field: &str, value: Option<u64>) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    if !(1..=3600).contains(&value) {
        bail!("Invalid config value for `{field}`: {value}. Expected range: 1..=3600");
    }
    Ok(())
}

/// Supported config verbosity labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerbositySetting {
    #[default]
    Default,
    Verbose,
    Quiet,
    Debug,
}

impl VerbositySetting {
    /// Returns the stable string label for display output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Verbose => "verbose",
            Self::Quiet => "quiet",
            Self::Debug => "debug",
        }
    }
}

/// Loaded config metadata.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Resolved config path if a base directory is known.
    pub path: Option<PathBuf>,
    /// Parsed file config when a config file exists and was valid.
    pub config: Option<FileConfig>,
    /// Indicates whether configuration was loaded from disk.
    pub loaded_from_file: bool,
}

/// Resolves default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/booklib/config.toml`
/// 2. `$HOME/.config/booklib/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(
            PathBuf::from(xdg_config_home)
                .join("booklib")
                .join("config.toml"),
        );
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("booklib")
            .join("config.toml"),
    )
}

/// Resolves the default favorites database path.
///
/// Priority:
/// 1. `$XDG_DATA_HOME/booklib/favorites.db`
/// 2. `$HOME/.local/share/booklib/favorites.db`
/// 3. `./booklib-favorites.db`
#[must_use]
pub fn resolve_default_database_path() -> PathBuf {
    if let Some(xdg_data_home) = env_var_non_empty_os("XDG_DATA_HOME") {
        return PathBuf::from(xdg_data_home)
            .join("booklib")
            .join("favorites.db");
    }
    match env_var_non_empty_os("HOME") {
        Some(home) => PathBuf::from(home)
            .join(".local")
            .join("share")
            .join("booklib")
            .join("favorites.db"),
        None => PathBuf::from("booklib-favorites.db"),
    }
}

fn env_var_non_empty_os(name: &str) -> Option<std::ffi::OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads config from default path if present.
pub fn load_default_file_config() -> Result<LoadedConfig> {
    let path = resolve_default_config_path();
    let Some(path_ref) = path.as_deref() else {
        return Ok(LoadedConfig {
            path,
            config: None,
            loaded_from_file: false,
        });
    };

    if !path_ref.exists() {
        return Ok(LoadedConfig {
            path,
            config: None,
            loaded_from_file: false,
        });
    }

    let config = load_file_config(path_ref)?;
    Ok(LoadedConfig {
        path,
        config: Some(config),
        loaded_from_file: true,
    })
}

fn load_file_config(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))
}

fn parse_config_str(raw: &str) -> Result<FileConfig> {
    let mut cfg = FileConfig::default();
    for (line_index, raw_line) in raw.lines().enumerate() {
        let line = strip_inline_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }
        let line_no = line_index + 1;

        let Some((raw_key, raw_value)) = line.split_once('=') else {
            bail!("Invalid config syntax on line {line_no}: expected key = value");
        };

        let key = raw_key.trim();
        let value = raw_value.trim();
        let invalid = || format!("Invalid `{key}` value on line {line_no}");

        match key {
            "database_path" => {
                cfg.database_path = Some(PathBuf::from(
                    parse_string_literal(value).with_context(invalid)?,
                ));
            }
            "catalog_base_url" => {
                cfg.catalog_base_url = Some(parse_string_literal(value).with_context(invalid)?);
            }
            "api_key" => {
                cfg.api_key = Some(parse_string_literal(value).with_context(invalid)?);
            }
            "default_query" => {
                cfg.default_query = Some(parse_string_literal(value).with_context(invalid)?);
            }
            "max_results" => {
                let parsed = parse_integer_u64(value).with_context(invalid)?;
                let n = u32::try_from(parsed)
                    .map_err(|_| anyhow::anyhow!("max_results out of range for u32"))?;
                cfg.max_results = Some(n);
            }
            "connect_timeout_secs" => {
                cfg.connect_timeout_secs = Some(parse_integer_u64(value).with_context(invalid)?);
            }
            "read_timeout_secs" => {
                cfg.read_timeout_secs = Some(parse_integer_u64(value).with_context(invalid)?);
            }
            "db_max_connections" => {
                let parsed = parse_integer_u64(value).with_context(invalid)?;
                let n = u32::try_from(parsed)
                    .map_err(|_| anyhow::anyhow!("db_max_connections out of range for u32"))?;
                cfg.db_max_connections = Some(n);
            }
            "db_busy_timeout_ms" => {
                let parsed = parse_integer_u64(value).with_context(invalid)?;
                let n = u32::try_from(parsed)
                    .map_err(|_| anyhow::anyhow!("db_busy_timeout_ms out of range for u32"))?;
                cfg.db_busy_timeout_ms = Some(n);
            }
            "verbosity" => {
                let parsed = parse_string_literal(value).with_context(invalid)?;
                cfg.verbosity = Some(parse_verbosity(&parsed).with_context(|| {
                    format!("Invalid `verbosity` value '{parsed}' on line {line_no}")
                })?);
            }
            unknown => {
                bail!("Unknown configuration key: '{unknown}' on line {line_no}");
            }
        }
    }
    cfg.validate()?;
    Ok(cfg)
}

fn strip_inline_comment(line: &str) -> &str {
    let mut in_string = false;
    for (index, ch) in line.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..index],
            _ => {}
        }
    }
    line
}

fn parse_string_literal(raw_value: &str) -> Result<String> {
    if raw_value.len() < 2 || !raw_value.starts_with('"') || !raw_value.ends_with('"') {
        bail!("Expected double-quoted string");
    }
    Ok(raw_value[1..raw_value.len() - 1].to_string())
}

fn parse_integer_u64(raw_value: &str) -> Result<u64> {
    let token = raw_value.trim();
    if token.is_empty() {
        bail!("Expected integer value");
    }
    let value = token.parse::<i128>()?;
    if value < 0 {
        bail!("Expected non-negative integer");
    }
    u64::try_from(value).map_err(|_| anyhow::anyhow!("Integer value out of range for u64"))
}

fn parse_verbosity(value: &str) -> Result<VerbositySetting> {
    match value {
        "default" => Ok(VerbositySetting::Default),
        "verbose" => Ok(VerbositySetting::Verbose),
        "quiet" => Ok(VerbositySetting::Quiet),
        "debug" => Ok(VerbositySetting::Debug),
        _ => bail!("Expected one of: default, verbose, quiet, debug"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config_partial_fields() {
        let cfg = parse_config_str(
            r#"
max_results = 12
verbosity = "verbose"
"#,
        )
        .expect("partial config should parse");
        assert_eq!(cfg.max_results, Some(12));
        assert_eq!(cfg.verbosity, Some(VerbositySetting::Verbose));
        assert!(cfg.database_path.is_none());
        assert!(cfg.api_key.is_none());
    }

    #[test]
    fn test_parse_config_string_fields() {
        let cfg = parse_config_str(
            r#"
database_path = "/tmp/shelf.db"
catalog_base_url = "http://127.0.0.1:9999/books/v1"
api_key = "k-123"
default_query = "subject:poetry"
"#,
        )
        .expect("string fields should parse");
        assert_eq!(cfg.database_path, Some(PathBuf::from("/tmp/shelf.db")));
        assert_eq!(
            cfg.catalog_base_url.as_deref(),
            Some("http://127.0.0.1:9999/books/v1")
        );
        assert_eq!(cfg.api_key.as_deref(), Some("k-123"));
        assert_eq!(cfg.default_query.as_deref(), Some("subject:poetry"));
    }

    #[test]
    fn test_parse_config_rejects_max_results_out_of_range() {
        let err = parse_config_str("max_results = 0").expect_err("0 is below range");
        assert!(err.to_string().contains("max_results"));

        let err = parse_config_str("max_results = 41").expect_err("41 is above range");
        assert!(err.to_string().contains("max_results"));
    }

    #[test]
    fn test_parse_config_rejects_blank_default_query() {
        let err = parse_config_str(r#"default_query = "  ""#).expect_err("blank query expected");
        assert!(err.to_string().contains("default_query"));
    }

    #[test]
    fn test_parse_config_rejects_non_http_base_url() {
        let err = parse_config_str(r#"catalog_base_url = "ftp://example.com""#)
            .expect_err("non-http URL expected");
        assert!(err.to_string().contains("catalog_base_url"));
    }

    #[test]
    fn test_parse_config_rejects_unquoted_string() {
        let err = parse_config_str("api_key = abc").expect_err("unquoted string expected");
        assert!(err.to_string().contains("api_key"));
    }

    #[test]
    fn test_parse_config_rejects_numeric_values_with_trailing_tokens() {
        let err = parse_config_str("max_results = 4 trailing")
            .expect_err("expected trailing token error");
        assert!(err.to_string().contains("max_results"));
    }

    #[test]
    fn test_parse_config_supports_inline_comments() {
        let cfg = parse_config_str(
            r#"
max_results = 4 # page size
default_query = "subject:#history" # hash inside string is kept
"#,
        )
        .expect("config with comments should parse");
        assert_eq!(cfg.max_results, Some(4));
        assert_eq!(cfg.default_query.as_deref(), Some("subject:#history"));
    }

    #[test]
    fn test_verbosity_as_str() {
        assert_eq!(VerbositySetting::Default.as_str(), "default");
        assert_eq!(VerbositySetting::Verbose.as_str(), "verbose");
        assert_eq!(VerbositySetting::Quiet.as_str(), "quiet");
        assert_eq!(VerbositySetting::Debug.as_str(), "debug");
    }

    #[test]
    fn test_parse_config_timeout_fields() {
        let cfg = parse_config_str(
            r"
connect_timeout_secs = 7
read_timeout_secs = 45
",
        )
        .expect("timeout config should parse");
        assert_eq!(cfg.connect_timeout_secs, Some(7));
        assert_eq!(cfg.read_timeout_secs, Some(45));
    }

    #[test]
    fn test_parse_config_rejects_invalid_timeout_value() {
        let err =
            parse_config_str("connect_timeout_secs = 0").expect_err("invalid timeout expected");
        assert!(err.to_string().contains("connect_timeout_secs"));
    }

    #[test]
    fn test_parse_config_rejects_unknown_keys() {
        let err = parse_config_str("unknown_key = 123").expect_err("unknown key error expected");
        assert!(err.to_string().contains("Unknown configuration key"));
        assert!(err.to_string().contains("unknown_key"));
    }

    #[test]
    fn test_parse_config_db_options() {
        let cfg = parse_config_str(
            r"
db_max_connections = 10
db_busy_timeout_ms = 3000
",
        )
        .expect("db options should parse");
        assert_eq!(cfg.db_max_connections, Some(10));
        assert_eq!(cfg.db_busy_timeout_ms, Some(3000));
    }

    #[test]
    fn test_parse_config_rejects_invalid_db_max_connections() {
        let err = parse_config_str("db_max_connections = 0").expect_err("0 is below range");
        assert!(err.to_string().contains("db_max_connections"));
    }

    #[test]
    fn test_parse_config_rejects_invalid_db_busy_timeout_ms() {
        let err = parse_config_str("db_busy_timeout_ms = 120001")
            .expect_err("value above 120000 should be rejected");
        assert!(err.to_string().contains("db_busy_timeout_ms"));
    }
}
