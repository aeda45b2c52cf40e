use std::fs::read_to_string;
use std::io::ErrorKind;
use std::path::Path;

use roxmltree::{Document, Node, ParsingOptions};

use crate::config::CshConfig;
use crate::error::CshError;

/// Read an XML file and prepare it for parsing (see [`prepare_xml`])
pub fn read_xml(filename: &Path, config: &CshConfig) -> Result<String, CshError> {
    if config.debug {
        eprintln!("[csh] parsing {}", filename.display());
    }
    let xmlstring = read_to_string(filename).map_err(|e| match e.kind() {
        ErrorKind::InvalidData => CshError::EncodingError(filename.to_path_buf()),
        _ => CshError::ReadError(filename.to_path_buf(), e),
    })?;
    Ok(prepare_xml(xmlstring, config))
}

/// Parse prepared XML data into a DOM, errors are attributed to `filename`
pub fn parse_xml<'a>(filename: &Path, xmlstring: &'a str) -> Result<Document<'a>, CshError> {
    Document::parse_with_options(
        xmlstring,
        ParsingOptions {
            allow_dtd: true,
            ..ParsingOptions::default()
        },
    )
    .map_err(|e| CshError::ParseError(filename.to_path_buf(), e))
}

/// Injects the configured DTD so HTML named entities resolve. Only possible if the document has no
/// DOCTYPE of its own, an HTML5 doctype is dropped first.
pub fn prepare_xml(xmlstring: String, config: &CshConfig) -> String {
    let mut xmlstring = match xmlstring.strip_prefix('\u{feff}') {
        Some(s) => s.to_string(),
        None => xmlstring,
    };
    if config.inject_dtd.is_empty() {
        return xmlstring;
    }

    //patchy: remove HTML5 doctype and inject our own
    if prolog(&xmlstring).contains("<!DOCTYPE html>") {
        xmlstring = xmlstring.replacen("<!DOCTYPE html>", "", 1);
    }

    if prolog(&xmlstring).contains("<!DOCTYPE") {
        if config.debug {
            eprintln!("[csh] WARNING: Can not inject DTD because file already has a DOCTYPE");
        }
        return xmlstring;
    }

    // the DTD has to follow the XML declaration, if any
    let insert_at = if xmlstring.trim_start().starts_with("<?xml") {
        xmlstring.find("?>").map(|pos| pos + 2).unwrap_or(0)
    } else {
        0
    };
    let mut injected = String::with_capacity(xmlstring.len() + config.inject_dtd.len() + 1);
    injected.push_str(&xmlstring[..insert_at]);
    if insert_at > 0 {
        injected.push('\n');
    }
    injected.push_str(&config.inject_dtd);
    injected.push_str(&xmlstring[insert_at..]);
    injected
}

/// Everything before the root element
fn prolog(xmlstring: &str) -> &str {
    let bytes = xmlstring.as_bytes();
    for (i, c) in bytes.iter().enumerate() {
        if *c == b'<' {
            if let Some(next) = bytes.get(i + 1) {
                if next.is_ascii_alphabetic() || *next == b'_' {
                    return &xmlstring[..i];
                }
            }
        }
    }
    xmlstring
}

/// Concatenation of all text below this node, in document order
pub fn text_content(node: Node) -> String {
    let mut text = String::new();
    for descendant in node.descendants() {
        if descendant.is_text() {
            if let Some(s) = descendant.text() {
                text.push_str(s);
            }
        }
    }
    text
}

/// Does the element have this local name? Namespaces are ignored on purpose as Flare exports
/// are not consistent in declaring them.
pub fn has_local_name(node: &Node, name: &str) -> bool {
    node.is_element() && node.tag_name().name() == name
}
