use serde::{Deserialize, Serialize};
use std::env;

/// Environment variable consulted by [`OutputFormat::from_env`].
pub const FORMAT_ENV: &str = "EMBED_EXPORT_FORMAT";

/// Which artifacts an export should produce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Json,
    Code,
    #[default]
    Both,
}

impl OutputFormat {
    /// Parse an output format string (case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" | "components" => Some(Self::Json),
            "code" | "js" | "source" => Some(Self::Code),
            "both" | "all" => Some(Self::Both),
            _ => None,
        }
    }

    /// Reads the output format from `EMBED_EXPORT_FORMAT`.
    pub fn from_env() -> Self {
        env::var(FORMAT_ENV)
            .ok()
            .and_then(|value| Self::parse(&value))
            .unwrap_or_default()
    }

    pub fn wants_json(self) -> bool {
        matches!(self, Self::Json | Self::Both)
    }

    pub fn wants_code(self) -> bool {
        matches!(self, Self::Code | Self::Both)
    }
}

/// Variable names used by the generated builder code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CodeNames {
    pub container: String,
    pub rows: String,
    pub components: String,
}

impl Default for CodeNames {
    fn default() -> Self {
        Self {
            container: "container".to_string(),
            rows: "footerRows".to_string(),
            components: "components".to_string(),
        }
    }
}

impl CodeNames {
    /// Replaces any name that is not a bare JS identifier with its default.
    ///
    /// Names that collide would declare the same `const` twice, so a
    /// collision resets all three to the defaults.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let pick = |value: String, fallback: String| {
            if crate::emoji::is_bare_identifier(&value) {
                value
            } else {
                fallback
            }
        };
        let names = Self {
            container: pick(self.container, defaults.container.clone()),
            rows: pick(self.rows, defaults.rows.clone()),
            components: pick(self.components, defaults.components.clone()),
        };
        if names.container == names.rows
            || names.container == names.components
            || names.rows == names.components
        {
            return defaults;
        }
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_formats() {
        assert_eq!(OutputFormat::parse(" JSON "), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::parse("js"), Some(OutputFormat::Code));
        assert_eq!(OutputFormat::parse("all"), Some(OutputFormat::Both));
        assert_eq!(OutputFormat::parse("yaml"), None);
    }

    #[test]
    fn format_from_env() {
        unsafe { env::set_var(FORMAT_ENV, "Code") };
        assert_eq!(OutputFormat::from_env(), OutputFormat::Code);
        unsafe { env::remove_var(FORMAT_ENV) };
        assert_eq!(OutputFormat::from_env(), OutputFormat::Both);
    }

    #[test]
    fn names_fall_back_when_not_identifiers() {
        let names = CodeNames {
            container: "my container".into(),
            rows: "rows".into(),
            components: "1st".into(),
        }
        .sanitized();
        assert_eq!(names.container, "container");
        assert_eq!(names.rows, "rows");
        assert_eq!(names.components, "components");
    }

    #[test]
    fn colliding_names_reset_to_defaults() {
        let names = CodeNames {
            container: "card".into(),
            rows: "card".into(),
            components: "payload".into(),
        }
        .sanitized();
        assert_eq!(names, CodeNames::default());

        // A fallback can collide too.
        let names = CodeNames {
            container: "footerRows".into(),
            rows: "not valid".into(),
            components: "payload".into(),
        }
        .sanitized();
        assert_eq!(names, CodeNames::default());
    }

    #[test]
    fn names_deserialize_with_defaults() {
        let names: CodeNames = serde_json::from_str(r#"{"rows":"extra"}"#).unwrap();
        assert_eq!(names.rows, "extra");
        assert_eq!(names.container, "container");
    }
}
