//! Margin configuration.

/// Configuration for the diagnostic margin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarginConfig {
    /// Columns of one rendered buffer bar.
    pub bar_width: u16,
    /// Text shown for unmapped or missing values.
    pub placeholder: String,
    /// Name the margin answers to.
    pub margin_name: String,
}

impl Default for MarginConfig {
    fn default() -> Self {
        Self {
            bar_width: 120,
            placeholder: "-".to_string(),
            margin_name: "Diagnostic".to_string(),
        }
    }
}

impl MarginConfig {
    /// Set the bar width.
    #[must_use]
    pub const fn with_bar_width(mut self, width: u16) -> Self {
        self.bar_width = width;
        self
    }

    /// Set the placeholder text.
    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Set the margin name.
    #[must_use]
    pub fn with_margin_name(mut self, name: impl Into<String>) -> Self {
        self.margin_name = name.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_builders() {
        let config = MarginConfig::default();
        assert_eq!(config.bar_width, 120);
        assert_eq!(config.placeholder, "-");
        assert_eq!(config.margin_name, "Diagnostic");

        let config = config
            .with_bar_width(60)
            .with_placeholder("n/a")
            .with_margin_name("Buffers");
        assert_eq!(config.bar_width, 60);
        assert_eq!(config.placeholder, "n/a");
        assert_eq!(config.margin_name, "Buffers");
    }
}
