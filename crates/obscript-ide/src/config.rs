//! Workspace configuration.
//!
//! Settings come from a JSON object such as the `initializationOptions` of
//! an editor session:
//!
//! ```json
//! { "keywordStyle": "capitalized", "indentWidth": 2, "insertSpaces": true }
//! ```
//!
//! Missing keys take their defaults and unknown keys are ignored.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// How keywords and type names are cased when formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeywordStyle {
    /// `begin`, `endif`, `string_var`.
    #[default]
    Lower,
    /// `BEGIN`, `ENDIF`, `STRING_VAR`.
    Upper,
    /// `Begin`, `EndIf`... as the construction set writes them.
    Capitalized,
    /// Leave keywords as written.
    Preserve,
}

impl KeywordStyle {
    /// Applies the style to a keyword's text.
    #[must_use]
    pub fn apply(self, keyword: &str) -> String {
        match self {
            Self::Lower => keyword.to_ascii_lowercase(),
            Self::Upper => keyword.to_ascii_uppercase(),
            Self::Capitalized => capitalized(keyword),
            Self::Preserve => keyword.to_string(),
        }
    }
}

/// Canonical mixed-case spellings; anything else just gets an initial
/// capital.
fn capitalized(keyword: &str) -> String {
    let lower = keyword.to_ascii_lowercase();
    let known = match lower.as_str() {
        "scriptname" => "ScriptName",
        "elseif" => "ElseIf",
        "endif" => "EndIf",
        "foreach" => "ForEach",
        "string_var" => "String_Var",
        "array_var" => "Array_Var",
        _ => {
            let mut chars = lower.chars();
            return match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            };
        }
    };
    known.to_string()
}

/// Errors from loading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The JSON did not parse or had the wrong shape.
    #[error("invalid workspace configuration: {0}")]
    Json(#[from] serde_json::Error),
    /// `indentWidth` was zero.
    #[error("indentWidth must be at least 1")]
    ZeroIndentWidth,
}

/// Settings that shape editor features.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkspaceConfig {
    /// Keyword casing applied by the formatter.
    pub keyword_style: KeywordStyle,
    /// Columns per indentation level.
    pub indent_width: u32,
    /// Indent with spaces rather than tabs.
    pub insert_spaces: bool,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            keyword_style: KeywordStyle::Lower,
            indent_width: 4,
            insert_spaces: true,
        }
    }
}

impl WorkspaceConfig {
    /// Parses a configuration object.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for malformed JSON or a zero indent width.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        if config.indent_width == 0 {
            return Err(ConfigError::ZeroIndentWidth);
        }
        Ok(config)
    }

    /// Parses a configuration object, falling back to the defaults.
    #[must_use]
    pub fn load_or_default(json: &str) -> Self {
        Self::from_json(json).unwrap_or_else(|err| {
            warn!("{err}; using default settings");
            Self::default()
        })
    }

    /// One level of indentation.
    #[must_use]
    pub fn indent_unit(&self) -> String {
        if self.insert_spaces {
            " ".repeat(self.indent_width as usize)
        } else {
            "\t".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_partial_objects() {
        assert_eq!(WorkspaceConfig::from_json("{}").unwrap(), WorkspaceConfig::default());
        let config =
            WorkspaceConfig::from_json(r#"{ "keywordStyle": "upper", "indentWidth": 2, "other": 1 }"#)
                .unwrap();
        assert_eq!(config.keyword_style, KeywordStyle::Upper);
        assert_eq!(config.indent_unit(), "  ");
        assert!(config.insert_spaces);
    }

    #[test]
    fn test_invalid_configs_fall_back() {
        assert!(matches!(
            WorkspaceConfig::from_json(r#"{ "indentWidth": 0 }"#),
            Err(ConfigError::ZeroIndentWidth)
        ));
        assert!(matches!(
            WorkspaceConfig::from_json(r#"{ "keywordStyle": "loud" }"#),
            Err(ConfigError::Json(_))
        ));
        assert_eq!(WorkspaceConfig::load_or_default("not json"), WorkspaceConfig::default());
    }

    #[test]
    fn test_keyword_styles() {
        assert_eq!(KeywordStyle::Capitalized.apply("ENDIF"), "EndIf");
        assert_eq!(KeywordStyle::Capitalized.apply("begin"), "Begin");
        assert_eq!(KeywordStyle::Upper.apply("string_var"), "STRING_VAR");
        assert_eq!(KeywordStyle::Lower.apply("ScriptName"), "scriptname");
        assert_eq!(KeywordStyle::Preserve.apply("SeT"), "SeT");
    }
}
