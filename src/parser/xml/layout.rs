use crate::java_names::valid_xml_element;
use crate::resources::{ResourceError, StringOrReference, XmlCandidates, XmlExtractor};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use tracing::trace;

/// Elements whose `android:name` attribute names a class
const NAMED_CLASS_ELEMENTS: &[&str] = &[
    "view",
    "fragment",
    "androidx.fragment.app.FragmentContainerView",
];

/// Resource reference written as a raw id, e.g. `@0x7f0a0001`
fn reference_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^@0x([0-9a-fA-F]{1,8})$").expect("valid reference pattern"))
}

/// A raw attribute value as a literal or a resource reference
pub fn parse_value(value: &str) -> StringOrReference {
    reference_pattern()
        .captures(value)
        .and_then(|caps| u32::from_str_radix(&caps[1], 16).ok())
        .map(StringOrReference::Reference)
        .unwrap_or_else(|| StringOrReference::Literal(value.to_string()))
}

/// Extractor for text (non-compiled) resource XML.
///
/// Class candidates are custom view tags (`<com.example.Widget>`), the
/// `class` attribute of any element and the `android:name` attribute of
/// `view` and `fragment` elements.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextXmlExtractor;

impl TextXmlExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract candidates from XML text. `path` is only used for errors.
    pub fn extract(
        &self,
        path: &Path,
        contents: &str,
        attributes: &HashSet<String>,
    ) -> Result<XmlCandidates, ResourceError> {
        let mut out = XmlCandidates::new();
        for_each_element(path, contents, |element| {
            let tag = String::from_utf8_lossy(element.name().as_ref()).into_owned();
            if valid_xml_element(&tag) {
                out.classes.insert(StringOrReference::Literal(tag.clone()));
            }
            let names_class = NAMED_CLASS_ELEMENTS.contains(&tag.as_str());

            for attr in element.attributes() {
                let attr = attr.map_err(|e| e.to_string())?;
                let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
                let value = attr.unescape_value().map_err(|e| e.to_string())?;

                if key == "class" || (names_class && key == "android:name") {
                    out.classes.insert(parse_value(&value));
                }
                if attributes.contains(&key) {
                    out.add_attribute(&key, parse_value(&value));
                }
            }
            Ok(())
        })?;

        trace!(
            "{}: {} class candidates, {} attributes",
            path.display(),
            out.classes.len(),
            out.attributes.len()
        );
        Ok(out)
    }

    /// Every literal attribute value in XML text
    pub fn string_values(&self, path: &Path, contents: &str) -> Result<HashSet<String>, ResourceError> {
        let mut values = HashSet::new();
        for_each_element(path, contents, |element| {
            for attr in element.attributes() {
                let attr = attr.map_err(|e| e.to_string())?;
                let value = attr.unescape_value().map_err(|e| e.to_string())?;
                if let StringOrReference::Literal(value) = parse_value(&value) {
                    values.insert(value);
                }
            }
            Ok(())
        })?;
        Ok(values)
    }
}

/// Calls `visit` for every start or empty element, reading the whole
/// document so that malformed input is reported. A truncated document or a
/// second top-level element is malformed.
fn for_each_element<F>(path: &Path, contents: &str, mut visit: F) -> Result<(), ResourceError>
where
    F: FnMut(&BytesStart<'_>) -> Result<(), String>,
{
    let xml_error = |message: String| ResourceError::Xml {
        path: path.to_path_buf(),
        message,
    };

    let mut reader = Reader::from_str(contents);
    reader.trim_text(true);
    let mut buf = Vec::new();
    let mut depth = 0usize;
    let mut seen_root = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                check_top_level(depth, &mut seen_root, &reader).map_err(xml_error)?;
                visit(e).map_err(xml_error)?;
                depth += 1;
            }
            Ok(Event::Empty(ref e)) => {
                check_top_level(depth, &mut seen_root, &reader).map_err(xml_error)?;
                visit(e).map_err(xml_error)?;
            }
            Ok(Event::End(_)) => depth = depth.saturating_sub(1),
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(xml_error(format!(
                    "{} at position {}",
                    e,
                    reader.buffer_position()
                )))
            }
            _ => {}
        }
        buf.clear();
    }

    if depth != 0 {
        return Err(xml_error(format!(
            "{depth} unclosed element(s) at end of document"
        )));
    }
    Ok(())
}

fn check_top_level(depth: usize, seen_root: &mut bool, reader: &Reader<&[u8]>) -> Result<(), String> {
    if depth > 0 {
        return Ok(());
    }
    if *seen_root {
        return Err(format!(
            "second top-level element at position {}",
            reader.buffer_position()
        ));
    }
    *seen_root = true;
    Ok(())
}

impl XmlExtractor for TextXmlExtractor {
    fn extract_from_file(
        &self,
        path: &Path,
        attributes: &HashSet<String>,
    ) -> Result<XmlCandidates, ResourceError> {
        let contents = fs::read_to_string(path).map_err(|e| ResourceError::io(path, e))?;
        self.extract(path, &contents, attributes)
    }

    fn attribute_string_values(&self, path: &Path) -> Result<HashSet<String>, ResourceError> {
        let contents = fs::read_to_string(path).map_err(|e| ResourceError::io(path, e))?;
        self.string_values(path, &contents)
    }
}
