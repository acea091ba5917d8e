//! Access technology category encoding
//!
//! Fixed table shared by training and scoring. Total: every input maps to
//! some code, unknown labels fall through to `UNMAPPED`.

pub const UNMAPPED: i32 = 0;

const ACCESS_TYPE_CODES: &[(&str, i32)] = &[
    ("2G", 1),
    ("3G", 2),
    ("4G", 3),
    ("5G", 4),
    ("1G", -1),
    ("6G", -1),
    ("Unknown", -1),
];

pub fn encode_access_type(value: &str) -> i32 {
    let value = value.trim();
    ACCESS_TYPE_CODES
        .iter()
        .find(|(label, _)| *label == value)
        .map(|(_, code)| *code)
        .unwrap_or(UNMAPPED)
}
