// Heuristic class-name extraction from native library bytes.
//
// Every class name starts with a package, which starts with a lowercase
// letter. Some are written as descriptors (`Lcom/foo/Bar;`) in native code,
// others as bare `com/foo/Bar`. Either way a run of name characters that is
// long enough is reported as `L<run>;`. No container format is parsed, so
// false positives are expected.

use std::collections::HashSet;

/// Shortest name body (excluding the leading `L`) worth reporting
pub const MIN_CLASSNAME_LENGTH: usize = 10;
/// Longest name body collected before the run is cut off
pub const MAX_CLASSNAME_LENGTH: usize = 500;

fn starts_name(byte: u8) -> bool {
    byte.is_ascii_lowercase() || byte == b'L'
}

fn is_name_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'/' | b'_' | b'$')
}

/// Streaming scanner. Bytes can be fed in chunks of any size; the result is
/// the same as scanning the concatenated buffer in one call.
#[derive(Debug, Default)]
pub struct NativeClassScanner {
    /// Name being collected, always starting with `L`
    current: Option<String>,
    classes: HashSet<String>,
}

impl NativeClassScanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.step(byte);
        }
    }

    fn step(&mut self, byte: u8) {
        match self.current.as_mut() {
            Some(name) => {
                if is_name_byte(byte) && name.len() - 1 < MAX_CLASSNAME_LENGTH {
                    name.push(byte as char);
                } else {
                    // The byte that ended the run is consumed with it and never
                    // considered as the start of a new name.
                    self.end_name();
                }
            }
            None if starts_name(byte) => {
                let mut name = String::with_capacity(32);
                name.push('L');
                if byte != b'L' {
                    name.push(byte as char);
                }
                self.current = Some(name);
            }
            None => {}
        }
    }

    fn end_name(&mut self) {
        if let Some(mut name) = self.current.take() {
            if name.len() - 1 >= MIN_CLASSNAME_LENGTH {
                name.push(';');
                self.classes.insert(name);
            }
        }
    }

    /// Flush a name that runs up to the end of the input
    pub fn finish(mut self) -> HashSet<String> {
        self.end_name();
        self.classes
    }
}

/// Every class-name-shaped string in `bytes`, as `L...;` descriptors
pub fn extract_classes_from_native_lib(bytes: &[u8]) -> HashSet<String> {
    let mut scanner = NativeClassScanner::new();
    scanner.feed(bytes);
    scanner.finish()
}
