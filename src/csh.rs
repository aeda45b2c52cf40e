use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::CshConfig;
use crate::error::CshError;
use crate::links::{links_from_file, normalize_link, HelpLink};
use crate::tooltips::{normalize_tooltip, tooltips_from_file, Tooltip};

/// Context-sensitive help for a single key. Fields are declared in sorted order as that
/// is the order in which they are serialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CshEntry {
    /// `Some(None)` is a mapping without a link, serialized as `null`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<Option<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// All context-sensitive help, sorted by key
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CshMap(BTreeMap<String, CshEntry>);

impl CshMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_text(&mut self, key: impl Into<String>, text: impl Into<String>) {
        self.0.entry(key.into()).or_default().text = Some(text.into());
    }

    pub fn insert_link(&mut self, key: impl Into<String>, link: Option<String>) {
        self.0.entry(key.into()).or_default().link = Some(link);
    }

    pub fn add_tooltips(&mut self, tooltips: impl IntoIterator<Item = Tooltip>) {
        for tooltip in tooltips {
            self.insert_text(tooltip.key, tooltip.text);
        }
    }

    pub fn add_links(&mut self, links: impl IntoIterator<Item = HelpLink>) {
        for helplink in links {
            self.insert_link(helplink.key, helplink.link);
        }
    }

    pub fn get(&self, key: &str) -> Option<&CshEntry> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &CshEntry)> {
        self.0.iter()
    }

    /// Render the map as a Pebble `set` tag assigning the JSON data to the configured variable
    pub fn to_template_string(&self, config: &CshConfig) -> Result<String, CshError> {
        let json = serde_json::to_string_pretty(self)?;
        Ok(format!("{{% set {} =\n{}\n%}}", config.variable, json))
    }
}

/// Extracts and normalizes tooltips and links from both files and merges them. Tooltips go first.
pub fn build_csh(
    tooltipsfile: &Path,
    linksfile: &Path,
    root_url: &str,
    config: &CshConfig,
) -> Result<CshMap, CshError> {
    let tooltips = tooltips_from_file(tooltipsfile, config)?;
    let links = links_from_file(linksfile, config)?;
    if config.debug {
        eprintln!(
            "[csh] extracted {} tooltips and {} links",
            tooltips.len(),
            links.len()
        );
    }
    let mut csh = CshMap::new();
    csh.add_tooltips(tooltips.into_iter().map(normalize_tooltip));
    csh.add_links(
        links
            .into_iter()
            .map(|helplink| normalize_link(root_url, helplink, config)),
    );
    Ok(csh)
}

/// Write the template into `target_dir` (created if needed), overwriting any existing output.
/// Returns the path of the written file.
pub fn write_csh(csh: &CshMap, target_dir: &Path, config: &CshConfig) -> Result<PathBuf, CshError> {
    let template = csh.to_template_string(config)?;
    fs::create_dir_all(target_dir)
        .map_err(|e| CshError::WriteError(target_dir.to_path_buf(), e))?;
    let filename = target_dir.join(config.output_filename());
    if config.debug {
        eprintln!("[csh] writing {}", filename.display());
    }
    fs::write(&filename, template).map_err(|e| CshError::WriteError(filename.clone(), e))?;
    Ok(filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CshMap {
        let mut csh = CshMap::new();
        csh.insert_text("B", "bee");
        csh.insert_text("A", "ay");
        csh.insert_link("C", Some("https://example.com/c".into()));
        csh.insert_link("B", Some("https://example.com/b".into()));
        csh
    }

    #[test]
    fn test_merge() {
        let csh = sample();
        assert_eq!(csh.len(), 3);
        assert_eq!(
            csh.get("A"),
            Some(&CshEntry {
                link: None,
                text: Some("ay".into())
            })
        );
        assert_eq!(
            csh.get("B"),
            Some(&CshEntry {
                link: Some(Some("https://example.com/b".into())),
                text: Some("bee".into())
            })
        );
        assert_eq!(
            csh.get("C"),
            Some(&CshEntry {
                link: Some(Some("https://example.com/c".into())),
                text: None
            })
        );
        assert!(csh.get("D").is_none());
    }

    #[test]
    fn test_sorted_keys() {
        let csh = sample();
        let keys: Vec<&String> = csh.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_template() -> Result<(), String> {
        let out = sample()
            .to_template_string(&CshConfig::new())
            .map_err(|e| format!("{}", e))?;
        let expected = r#"{% set csh =
{
  "A": {
    "text": "ay"
  },
  "B": {
    "link": "https://example.com/b",
    "text": "bee"
  },
  "C": {
    "link": "https://example.com/c"
  }
}
%}"#;
        assert_eq!(out, expected);
        Ok(())
    }

    #[test]
    fn test_template_null_link() -> Result<(), String> {
        let mut csh = CshMap::new();
        csh.insert_link("x", None);
        let out = csh
            .to_template_string(&CshConfig::new().with_variable("help"))
            .map_err(|e| format!("{}", e))?;
        assert_eq!(out, "{% set help =\n{\n  \"x\": {\n    \"link\": null\n  }\n}\n%}");
        Ok(())
    }

    #[test]
    fn test_template_non_ascii_raw() -> Result<(), String> {
        let mut csh = CshMap::new();
        csh.insert_text("cafe", "caf\u{e9} \u{2019}x\u{2019}");
        let out = csh
            .to_template_string(&CshConfig::new())
            .map_err(|e| format!("{}", e))?;
        //written as UTF-8, not as \u escapes
        assert!(out.contains("\"text\": \"caf\u{e9} \u{2019}x\u{2019}\""));
        assert!(!out.contains("\\u"));
        Ok(())
    }

    #[test]
    fn test_template_empty() -> Result<(), String> {
        let out = CshMap::new()
            .to_template_string(&CshConfig::new())
            .map_err(|e| format!("{}", e))?;
        assert_eq!(out, "{% set csh =\n{}\n%}");
        Ok(())
    }

    #[test]
    fn test_write() -> Result<(), String> {
        let dir = tempfile::tempdir().map_err(|e| format!("{}", e))?;
        let target = dir.path().join("nested").join("templates");
        let config = CshConfig::new();
        let filename = write_csh(&sample(), &target, &config).map_err(|e| format!("{}", e))?;
        assert_eq!(filename, target.join("csh.peb"));
        let first = fs::read_to_string(&filename).map_err(|e| format!("{}", e))?;
        assert!(first.starts_with("{% set csh =\n{"));
        assert!(first.ends_with("}\n%}"));

        //overwrite with identical output
        write_csh(&sample(), &target, &config).map_err(|e| format!("{}", e))?;
        let second = fs::read_to_string(&filename).map_err(|e| format!("{}", e))?;
        assert_eq!(first, second);
        Ok(())
    }

    #[test]
    fn test_write_unwritable_target() -> Result<(), String> {
        let dir = tempfile::tempdir().map_err(|e| format!("{}", e))?;
        let blocker = dir.path().join("file");
        fs::write(&blocker, "x").map_err(|e| format!("{}", e))?;
        //a regular file is in the way of the target directory
        assert!(write_csh(&sample(), &blocker.join("sub"), &CshConfig::new()).is_err());
        Ok(())
    }
}
