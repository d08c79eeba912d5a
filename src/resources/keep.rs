use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

const KEEP_ATTRIBUTE: &[u8] = b"tools:keep";

/// Read the resource names listed in the `tools:keep` attribute of a
/// `<resources>` root element, e.g. `tools:keep="@layout/used,@drawable/icon"`.
///
/// Each comma-separated token is trimmed and stripped of its `type/` prefix.
/// Unreadable or malformed files are logged and yield an empty set.
pub fn parse_keep_list(xml_path: &Path) -> HashSet<String> {
    let contents = match fs::read_to_string(xml_path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read keep file {}: {}", xml_path.display(), e);
            return HashSet::new();
        }
    };

    match read_keep_attribute(&contents) {
        Ok(Some(value)) => split_keep_value(&value),
        Ok(None) => HashSet::new(),
        Err(message) => {
            warn!("Error parsing XML file at {}: {}", xml_path.display(), message);
            HashSet::new()
        }
    }
}

/// The `tools:keep` value of the root element, if it is `<resources>`.
/// The whole document is read so that malformed files are rejected: a
/// truncated document or a second top-level element is an error.
fn read_keep_attribute(contents: &str) -> Result<Option<String>, String> {
    let mut reader = Reader::from_str(contents);
    reader.trim_text(true);

    let mut keep = None;
    let mut seen_root = false;
    let mut depth = 0usize;
    let mut buf = Vec::new();

    loop {
        let event = reader.read_event_into(&mut buf);
        match event {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                if depth == 0 {
                    if seen_root {
                        return Err(format!(
                            "second top-level element at position {}",
                            reader.buffer_position()
                        ));
                    }
                    seen_root = true;
                    if e.name().as_ref() == b"resources" {
                        keep = root_keep_value(e)?;
                    }
                }
                if matches!(event, Ok(Event::Start(_))) {
                    depth += 1;
                }
            }
            Ok(Event::End(_)) => depth = depth.saturating_sub(1),
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(format!(
                    "{} at position {}",
                    e,
                    reader.buffer_position()
                ))
            }
            _ => {}
        }
        buf.clear();
    }

    if !seen_root {
        return Err("no root element".to_string());
    }
    if depth != 0 {
        return Err(format!("{depth} unclosed element(s) at end of document"));
    }

    debug!("Found keep attribute: {:?}", keep);
    Ok(keep)
}

fn root_keep_value(root: &BytesStart<'_>) -> Result<Option<String>, String> {
    let mut keep = None;
    for attr in root.attributes() {
        let attr = attr.map_err(|err| err.to_string())?;
        if attr.key.as_ref() == KEEP_ATTRIBUTE {
            let value = attr.unescape_value().map_err(|err| err.to_string())?;
            keep = Some(value.into_owned());
        }
    }
    Ok(keep)
}

fn split_keep_value(value: &str) -> HashSet<String> {
    value
        .split(',')
        .map(str::trim)
        .map(|token| match token.find('/') {
            Some(pos) => &token[pos + 1..],
            None => token,
        })
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}
