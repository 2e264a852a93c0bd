//! Global tuning knobs loaded from TOML.
//!
//! - `init_custom(toml_content)` sets a custom TOML before first `settings()` call
//! - `settings()` returns `&'static Settings` (lazy-init singleton)
//! - Default values are embedded via `include_str!("default_settings.toml")`

use std::sync::OnceLock;

use serde::Deserialize;

pub const DEFAULT_SETTINGS_TOML: &str = include_str!("default_settings.toml");

static CUSTOM_TOML: OnceLock<String> = OnceLock::new();

/// Set custom TOML before first `settings()` call.
pub fn init_custom(toml_content: String) -> Result<(), SettingsError> {
    parse_settings_toml(&toml_content)?;
    CUSTOM_TOML
        .set(toml_content)
        .map_err(|_| SettingsError::AlreadyInitialized)
}

/// Get or initialize the global settings singleton.
pub fn settings() -> &'static Settings {
    static INSTANCE: OnceLock<Settings> = OnceLock::new();
    INSTANCE.get_or_init(|| {
        let toml_str = CUSTOM_TOML
            .get()
            .map(|s| s.as_str())
            .unwrap_or(DEFAULT_SETTINGS_TOML);
        parse_settings_toml(toml_str).expect("settings TOML must be valid")
    })
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
    #[error("settings already initialized")]
    AlreadyInitialized,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub completion: CompletionSettings,
    pub popup: PopupSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompletionSettings {
    /// Cap on candidates contributed by the symbol source. History entries
    /// are never capped; a past query is always offered.
    pub max_symbol_results: usize,
    /// Delay applied by the completion worker before generating, letting a
    /// burst of keystrokes settle into one request. Zero disables it.
    pub debounce_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PopupSettings {
    /// Rows visible at once; longer lists scroll.
    pub max_visible_rows: usize,
}

pub fn parse_settings_toml(toml_str: &str) -> Result<Settings, SettingsError> {
    let s: Settings = toml::from_str(toml_str).map_err(|e| SettingsError::Parse(e.to_string()))?;
    validate(&s)?;
    Ok(s)
}

fn validate(s: &Settings) -> Result<(), SettingsError> {
    macro_rules! check_positive_usize {
        ($section:ident . $field:ident) => {
            if s.$section.$field == 0 {
                return Err(SettingsError::InvalidValue {
                    field: concat!(stringify!($section), ".", stringify!($field)).to_string(),
                    reason: "must be positive".to_string(),
                });
            }
        };
    }

    check_positive_usize!(completion.max_symbol_results);
    check_positive_usize!(popup.max_visible_rows);

    if s.completion.debounce_ms > 2000 {
        return Err(SettingsError::InvalidValue {
            field: "completion.debounce_ms".to_string(),
            reason: "must be at most 2000".to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_default_toml() {
        let s = parse_settings_toml(DEFAULT_SETTINGS_TOML).unwrap();
        assert_eq!(s.completion.max_symbol_results, 100);
        assert_eq!(s.completion.debounce_ms, 0);
        assert_eq!(s.popup.max_visible_rows, 10);
    }

    #[test]
    fn parse_valid_custom_toml() {
        let toml = r#"
[completion]
max_symbol_results = 25
debounce_ms = 150

[popup]
max_visible_rows = 8
"#;
        let s = parse_settings_toml(toml).unwrap();
        assert_eq!(s.completion.max_symbol_results, 25);
        assert_eq!(s.completion.debounce_ms, 150);
        assert_eq!(s.popup.max_visible_rows, 8);
    }

    #[test]
    fn error_zero_max_symbol_results() {
        let toml = r#"
[completion]
max_symbol_results = 0
debounce_ms = 0

[popup]
max_visible_rows = 10
"#;
        let err = parse_settings_toml(toml).unwrap_err();
        assert!(err.to_string().contains("completion.max_symbol_results"));
    }

    #[test]
    fn error_excessive_debounce() {
        let toml = r#"
[completion]
max_symbol_results = 100
debounce_ms = 60000

[popup]
max_visible_rows = 10
"#;
        let err = parse_settings_toml(toml).unwrap_err();
        assert!(err.to_string().contains("debounce_ms"));
    }

    #[test]
    fn error_invalid_toml() {
        let err = parse_settings_toml("not valid toml {{{").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn error_missing_section() {
        let toml = r#"
[completion]
max_symbol_results = 100
debounce_ms = 0
"#;
        let err = parse_settings_toml(toml).unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }
}
