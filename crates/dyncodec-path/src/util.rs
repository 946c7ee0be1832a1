/// Characters that terminate a key in the dotted text form.
const RESERVED: [char; 4] = ['\\', '.', '[', ']'];

/// Escapes a key for the dotted text form.
///
/// `\`, `.`, `[` and `]` are prefixed with a backslash.
///
/// # Example
///
/// ```
/// use dyncodec_path::escape_key;
///
/// assert_eq!(escape_key("plain"), "plain");
/// assert_eq!(escape_key("a.b"), "a\\.b");
/// assert_eq!(escape_key("x[0]"), "x\\[0\\]");
/// ```
pub fn escape_key(key: &str) -> String {
    if !key.contains(&RESERVED[..]) {
        return key.to_string();
    }
    let mut out = String::with_capacity(key.len() + 2);
    for c in key.chars() {
        if RESERVED.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Returns true when `c` may follow a backslash inside a key.
pub(crate) fn is_escapable(c: char) -> bool {
    RESERVED.contains(&c)
}

/// Check if a string is a canonical non-negative index.
///
/// Leading zeros are rejected so that every index has exactly one text form.
///
/// # Example
///
/// ```
/// use dyncodec_path::is_valid_index;
///
/// assert!(is_valid_index("0"));
/// assert!(is_valid_index("123"));
/// assert!(!is_valid_index("01"));
/// assert!(!is_valid_index("-1"));
/// assert!(!is_valid_index(""));
/// ```
pub fn is_valid_index(index: &str) -> bool {
    if index.is_empty() {
        return false;
    }
    let bytes = index.as_bytes();
    if bytes.len() > 1 && bytes[0] == b'0' {
        return false;
    }
    bytes.iter().all(|&b| b.is_ascii_digit())
}
