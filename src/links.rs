use std::path::Path;

use roxmltree::Document;

use crate::config::CshConfig;
use crate::error::CshError;
use crate::xml::{has_local_name, parse_xml, read_xml};

/// Maps a key to a static help page. The link is `None` if the mapping element had no link
/// attribute, such gaps are tolerated and end up as `null` in the output.
#[derive(Debug, Clone, PartialEq)]
pub struct HelpLink {
    pub key: String,
    pub link: Option<String>,
}

/// Read the links file and extract all links, not normalized yet
pub fn links_from_file(filename: &Path, config: &CshConfig) -> Result<Vec<HelpLink>, CshError> {
    let xmlstring = read_xml(filename, config)?;
    let doc = parse_xml(filename, &xmlstring)?;
    extract_links(&doc, config)
}

/// Extract a link from every mapping element, at any depth in the document
pub fn extract_links(doc: &Document, config: &CshConfig) -> Result<Vec<HelpLink>, CshError> {
    let mut links = Vec::new();
    for node in doc
        .descendants()
        .filter(|node| has_local_name(node, config.map_element.as_str()))
    {
        let link = node.attribute(config.link_attribute.as_str());
        let key = match node.attribute(config.name_attribute.as_str()) {
            Some(key) => key,
            None => {
                let msg = format!(
                    "{} element without '{}' attribute (at {})",
                    config.map_element,
                    config.name_attribute,
                    doc.text_pos_at(node.range().start)
                );
                if config.strict {
                    return Err(CshError::DataError(msg));
                }
                if config.debug {
                    eprintln!("[csh] {}, skipping", msg);
                }
                continue;
            }
        };
        if link.is_none() && config.strict {
            return Err(CshError::DataError(format!(
                "{} element '{}' has no '{}' attribute",
                config.map_element, key, config.link_attribute
            )));
        }
        if config.debug {
            eprintln!("[csh] link {}: {:?}", key, link);
        }
        links.push(HelpLink {
            key: key.to_string(),
            link: link.map(|s| s.to_string()),
        });
    }
    Ok(links)
}

/// Rewrite a link from the Flare content root to `root_url` and strip the extension.
///
/// Only a *leading* content prefix is replaced, but the extension is removed wherever it
/// occurs in the link (single pass, so `a.ht.htmlml` becomes `a.html`).
pub fn normalize_link(root_url: &str, helplink: HelpLink, config: &CshConfig) -> HelpLink {
    HelpLink {
        key: helplink.key,
        link: helplink.link.map(|link| {
            let prefix = config.content_prefix.as_str();
            let link = if !prefix.is_empty() && link.starts_with(prefix) {
                format!("{}{}", root_url, &link[prefix.len()..])
            } else {
                link
            };
            if config.strip_extension.is_empty() {
                link
            } else {
                link.replace(config.strip_extension.as_str(), "")
            }
        }),
    }
}
