//! Conversions between Java source names (`com.example.Foo`) and the
//! internal descriptor form used in dex files (`Lcom/example/Foo;`).

/// Convert an external class name to its internal descriptor.
///
/// Names that are already descriptors are returned unchanged, so the
/// conversion can be applied to mixed input.
pub fn external_to_internal(name: &str) -> String {
    let name = name.trim();

    if let Some(primitive) = primitive_descriptor(name) {
        return primitive.to_string();
    }

    if name.starts_with('[') || is_internal(name) {
        return name.replace('.', "/");
    }

    if let Some(component) = name.strip_suffix("[]") {
        return format!("[{}", external_to_internal(component));
    }

    format!("L{};", name.replace('.', "/"))
}

/// Convert an internal descriptor back to a dotted class name
pub fn internal_to_external(name: &str) -> String {
    match name.strip_prefix('L').and_then(|n| n.strip_suffix(';')) {
        Some(inner) => inner.replace('/', "."),
        None => name.replace('/', "."),
    }
}

/// Whether `name` has the `L...;` descriptor shape
pub fn is_internal(name: &str) -> bool {
    name.len() > 2 && name.starts_with('L') && name.ends_with(';')
}

/// Whether `ident` is a valid dotted Java identifier, e.g. `com.foo.Bar$Inner`
pub fn is_identifier(ident: &str) -> bool {
    !ident.is_empty()
        && ident.split('.').all(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) if first.is_alphabetic() || first == '_' || first == '$' => {
                    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
                }
                _ => false,
            }
        })
}

/// A layout element name that refers to an application class, such as
/// `com.example.CustomView`. Framework views are written unqualified.
pub fn valid_xml_element(ident: &str) -> bool {
    is_identifier(ident) && ident.contains('.')
}

fn primitive_descriptor(name: &str) -> Option<&'static str> {
    Some(match name {
        "void" => "V",
        "boolean" => "Z",
        "byte" => "B",
        "short" => "S",
        "char" => "C",
        "int" => "I",
        "long" => "J",
        "float" => "F",
        "double" => "D",
        _ => return None,
    })
}
