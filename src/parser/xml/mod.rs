mod layout;

pub use layout::{parse_value, TextXmlExtractor};
