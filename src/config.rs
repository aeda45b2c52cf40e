use serde::Deserialize;

use crate::error::CshError;

/// DTD injected into documents without a DOCTYPE, declares the HTML entities Flare likes to emit
pub const HTML_ENTITIES_DTD: &str = r#"<!DOCTYPE html [
<!ENTITY nbsp "&#160;">
<!ENTITY copy "&#169;">
<!ENTITY reg "&#174;">
<!ENTITY trade "&#8482;">
<!ENTITY ndash "&#8211;">
<!ENTITY mdash "&#8212;">
<!ENTITY hellip "&#8230;">
<!ENTITY lsquo "&#8216;">
<!ENTITY rsquo "&#8217;">
<!ENTITY ldquo "&#8220;">
<!ENTITY rdquo "&#8221;">
]>
"#;

fn default_table_id() -> String {
    "gui-text-table".into()
}

fn default_anchor_attribute() -> String {
    "name".into()
}

fn default_map_element() -> String {
    "Map".into()
}

fn default_name_attribute() -> String {
    "Name".into()
}

fn default_link_attribute() -> String {
    "Link".into()
}

fn default_content_prefix() -> String {
    "/Content/".into()
}

fn default_strip_extension() -> String {
    ".html".into()
}

fn default_variable() -> String {
    "csh".into()
}

fn default_output_filename() -> String {
    "csh.peb".into()
}

fn default_inject_dtd() -> String {
    HTML_ENTITIES_DTD.into()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
/// Holds the configuration for extracting csh data from Flare exports
pub struct CshConfig {
    #[serde(default = "default_table_id")]
    /// Value of the `id` attribute of the table that holds the tooltips
    pub(crate) table_id: String,

    #[serde(default = "default_anchor_attribute")]
    /// Attribute on the anchor that holds the tooltip key
    pub(crate) anchor_attribute: String,

    #[serde(default = "default_map_element")]
    /// Local name of the elements that map keys to static help pages
    pub(crate) map_element: String,

    #[serde(default = "default_name_attribute")]
    pub(crate) name_attribute: String,

    #[serde(default = "default_link_attribute")]
    pub(crate) link_attribute: String,

    #[serde(default = "default_content_prefix")]
    /// Leading link prefix that is replaced by the root url
    pub(crate) content_prefix: String,

    #[serde(default = "default_strip_extension")]
    /// Removed from links wherever it occurs
    pub(crate) strip_extension: String,

    #[serde(default = "default_variable")]
    /// Name of the template variable that is assigned
    pub(crate) variable: String,

    #[serde(default = "default_output_filename")]
    pub(crate) output_filename: String,

    #[serde(default = "default_inject_dtd")]
    /// DTD to inject (for entity resolution) in documents without a DOCTYPE, empty to disable
    pub(crate) inject_dtd: String,

    #[serde(default)]
    /// Turn tolerated data anomalies into hard errors
    pub(crate) strict: bool,

    #[serde(skip_deserializing)]
    pub(crate) debug: bool,
}

impl Default for CshConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl CshConfig {
    pub fn new() -> Self {
        Self {
            table_id: default_table_id(),
            anchor_attribute: default_anchor_attribute(),
            map_element: default_map_element(),
            name_attribute: default_name_attribute(),
            link_attribute: default_link_attribute(),
            content_prefix: default_content_prefix(),
            strip_extension: default_strip_extension(),
            variable: default_variable(),
            output_filename: default_output_filename(),
            inject_dtd: default_inject_dtd(),
            strict: false,
            debug: false,
        }
    }

    /// Parse the configuration from a TOML string (load the data from file yourself).
    pub fn from_toml_str(tomlstr: &str) -> Result<Self, CshError> {
        let config: Self =
            toml::from_str(tomlstr).map_err(|e| CshError::ConfigError(format!("{}", e)))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), CshError> {
        if self.variable.is_empty() {
            return Err(CshError::ConfigError("variable may not be empty".into()));
        }
        if self.output_filename.is_empty()
            || self.output_filename.contains('/')
            || self.output_filename.contains('\\')
        {
            return Err(CshError::ConfigError(format!(
                "output_filename must be a plain file name, got {:?}",
                self.output_filename
            )));
        }
        if self.map_element.is_empty() || self.table_id.is_empty() {
            return Err(CshError::ConfigError(
                "map_element and table_id may not be empty".into(),
            ));
        }
        Ok(())
    }

    pub fn with_debug(mut self, value: bool) -> Self {
        self.debug = value;
        self
    }

    /// Turn tolerated data anomalies (missing table, missing attributes) into errors
    pub fn with_strict(mut self, value: bool) -> Self {
        self.strict = value;
        self
    }

    pub fn with_table_id(mut self, id: impl Into<String>) -> Self {
        self.table_id = id.into();
        self
    }

    pub fn with_map_element(mut self, name: impl Into<String>) -> Self {
        self.map_element = name.into();
        self
    }

    /// Leading link prefix that is replaced by the root url
    pub fn with_content_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.content_prefix = prefix.into();
        self
    }

    pub fn with_strip_extension(mut self, extension: impl Into<String>) -> Self {
        self.strip_extension = extension.into();
        self
    }

    pub fn with_variable(mut self, variable: impl Into<String>) -> Self {
        self.variable = variable.into();
        self
    }

    pub fn with_output_filename(mut self, filename: impl Into<String>) -> Self {
        self.output_filename = filename.into();
        self
    }

    /// Inject a DTD (for XML entity resolution), pass an empty string to disable injection
    pub fn with_inject_dtd(mut self, dtd: impl Into<String>) -> Self {
        self.inject_dtd = dtd.into();
        self
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn strict(&self) -> bool {
        self.strict
    }

    pub fn output_filename(&self) -> &str {
        self.output_filename.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CshConfig::new();
        assert_eq!(config.table_id, "gui-text-table");
        assert_eq!(config.map_element, "Map");
        assert_eq!(config.content_prefix, "/Content/");
        assert_eq!(config.strip_extension, ".html");
        assert_eq!(config.output_filename(), "csh.peb");
        assert!(!config.strict());
        assert!(!config.debug());
    }

    #[test]
    fn test_loadconfig() -> Result<(), String> {
        let config = CshConfig::from_toml_str(
            r#"
table_id = "tooltips"
variable = "help"
strict = true
inject_dtd = ""
"#,
        )
        .map_err(|e| format!("{}", e))?;
        assert_eq!(config.table_id, "tooltips");
        assert_eq!(config.variable, "help");
        assert!(config.strict());
        assert!(config.inject_dtd.is_empty());
        //untouched keys keep their defaults
        assert_eq!(config.link_attribute, "Link");
        assert_eq!(config.output_filename(), "csh.peb");
        Ok(())
    }

    #[test]
    fn test_empty_config() -> Result<(), String> {
        let config = CshConfig::from_toml_str("").map_err(|e| format!("{}", e))?;
        assert_eq!(config.inject_dtd, HTML_ENTITIES_DTD);
        Ok(())
    }

    #[test]
    fn test_unknown_key() {
        assert!(CshConfig::from_toml_str("tabel_id = \"x\"").is_err());
    }

    #[test]
    fn test_invalid_output_filename() {
        assert!(CshConfig::from_toml_str("output_filename = \"../csh.peb\"").is_err());
        assert!(CshConfig::from_toml_str("output_filename = \"\"").is_err());
    }
}
