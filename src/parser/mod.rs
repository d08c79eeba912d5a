pub mod xml;

pub use xml::TextXmlExtractor;
