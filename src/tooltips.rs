use std::path::Path;

use roxmltree::{Document, Node};

use crate::config::CshConfig;
use crate::error::CshError;
use crate::xml::{has_local_name, parse_xml, read_xml, text_content};

/// A tooltip as found in the GUI text table: key and (raw or normalized) text
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub key: String,
    pub text: String,
}

/// Read the tooltips file and extract all tooltips, not normalized yet
pub fn tooltips_from_file(filename: &Path, config: &CshConfig) -> Result<Vec<Tooltip>, CshError> {
    let xmlstring = read_xml(filename, config)?;
    let doc = parse_xml(filename, &xmlstring)?;
    extract_tooltips(&doc, config)
}

/// Find the GUI text table and extract a tooltip for every cell that directly contains an anchor.
/// The anchor provides the key, the text of the entire cell is the tooltip text.
pub fn extract_tooltips(doc: &Document, config: &CshConfig) -> Result<Vec<Tooltip>, CshError> {
    let table = doc.descendants().find(|node| {
        has_local_name(node, "table") && node.attribute("id") == Some(config.table_id.as_str())
    });
    let table = match table {
        Some(table) => table,
        None => {
            let msg = format!("No table with id '{}' found", config.table_id);
            if config.strict {
                return Err(CshError::DataError(msg));
            }
            eprintln!("[warning] {}, no tooltips extracted", msg);
            return Ok(Vec::new());
        }
    };

    let mut tooltips = Vec::new();
    for cell in table.descendants().filter(|node| is_row_cell(node)) {
        let anchor = match cell.children().find(|child| has_local_name(child, "a")) {
            Some(anchor) => anchor,
            None => continue,
        };
        match anchor.attribute(config.anchor_attribute.as_str()) {
            Some(key) => {
                let text = text_content(cell);
                if config.debug {
                    eprintln!("[csh] tooltip {}: {:?}", key, text);
                }
                tooltips.push(Tooltip {
                    key: key.to_string(),
                    text,
                });
            }
            None => {
                let msg = format!(
                    "Anchor without '{}' attribute in GUI text table (at {})",
                    config.anchor_attribute,
                    doc.text_pos_at(anchor.range().start)
                );
                if config.strict {
                    return Err(CshError::DataError(msg));
                }
                eprintln!("[warning] {}, skipping", msg);
            }
        }
    }
    Ok(tooltips)
}

/// A `td` whose parent is a `tr`
fn is_row_cell(node: &Node) -> bool {
    has_local_name(node, "td")
        && node
            .parent_element()
            .map(|parent| has_local_name(&parent, "tr"))
            .unwrap_or(false)
}

/// Replace non-breaking spaces by normal spaces
pub fn normalize_tooltip(tooltip: Tooltip) -> Tooltip {
    Tooltip {
        key: tooltip.key,
        text: tooltip.text.replace('\u{a0}', " "),
    }
}
