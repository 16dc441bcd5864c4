//! Configuration for SVG rendering

/// Configuration options for SVG output
#[derive(Debug, Clone)]
pub struct SvgConfig {
    /// Whether to include the XML declaration
    pub standalone: bool,

    /// Whether to put every element on its own indented line
    pub pretty_print: bool,

    /// Prefix for CSS class names and node ids (e.g., "bt-" for "bt-node")
    pub class_prefix: Option<String>,

    /// Factor between layout units and the SVG width/height; the viewBox
    /// stays in layout units
    pub scale: f64,

    /// Generic family appended after `FontFamily`, or used alone when it is
    /// unset
    pub font_fallback: Option<String>,
}

impl Default for SvgConfig {
    fn default() -> Self {
        Self {
            standalone: true,
            pretty_print: true,
            class_prefix: Some("bt-".to_string()),
            scale: 1.0,
            font_fallback: Some("sans-serif".to_string()),
        }
    }
}

impl SvgConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether output is standalone
    pub fn with_standalone(mut self, standalone: bool) -> Self {
        self.standalone = standalone;
        self
    }

    /// Set whether to pretty-print output
    pub fn with_pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }

    /// Set the CSS class prefix
    pub fn with_class_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.class_prefix = Some(prefix.into());
        self
    }

    /// Remove the CSS class prefix
    pub fn without_class_prefix(mut self) -> Self {
        self.class_prefix = None;
        self
    }

    /// Scale the rendered page; non-positive factors fall back to 1
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = if scale > 0.0 { scale } else { 1.0 };
        self
    }

    pub fn with_font_fallback(mut self, family: Option<String>) -> Self {
        self.font_fallback = family;
        self
    }

    /// The `font-family` value for a configured family
    pub fn font_family(&self, family: &str) -> Option<String> {
        match (family.is_empty(), &self.font_fallback) {
            (true, None) => None,
            (true, Some(fallback)) => Some(fallback.clone()),
            (false, None) => Some(family.to_string()),
            (false, Some(fallback)) => Some(format!("{}, {}", family, fallback)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SvgConfig::default();
        assert!(config.standalone);
        assert!(config.pretty_print);
        assert_eq!(config.class_prefix, Some("bt-".to_string()));
        assert_eq!(config.scale, 1.0);
        assert_eq!(config.font_fallback.as_deref(), Some("sans-serif"));
    }

    #[test]
    fn test_builder_pattern() {
        let config = SvgConfig::new()
            .with_standalone(false)
            .with_pretty_print(false)
            .with_class_prefix("my-")
            .with_scale(2.5)
            .with_font_fallback(None);

        assert!(!config.standalone);
        assert!(!config.pretty_print);
        assert_eq!(config.class_prefix, Some("my-".to_string()));
        assert_eq!(config.scale, 2.5);
        assert_eq!(config.font_fallback, None);
    }

    #[test]
    fn test_scale_must_be_positive() {
        assert_eq!(SvgConfig::new().with_scale(0.0).scale, 1.0);
        assert_eq!(SvgConfig::new().with_scale(-3.0).scale, 1.0);
    }

    #[test]
    fn test_font_family_with_fallback() {
        let config = SvgConfig::default();
        assert_eq!(config.font_family("Fira Sans").as_deref(), Some("Fira Sans, sans-serif"));
        assert_eq!(config.font_family("").as_deref(), Some("sans-serif"));

        let config = config.with_font_fallback(None);
        assert_eq!(config.font_family("Fira Sans").as_deref(), Some("Fira Sans"));
        assert_eq!(config.font_family(""), None);
    }
}
