//! Session feature schema
//!
//! Column order of every feature vector the model sees. Reordering or
//! renaming a column requires bumping `FEATURE_VERSION`; fitted models
//! carry the hash of the layout they were trained on.

use crc32fast::Hasher;

pub const FEATURE_VERSION: u8 = 1;

pub const FEATURE_COUNT: usize = 5;

pub const IDX_DURATION: usize = 0;
pub const IDX_UPLINK: usize = 1;
pub const IDX_DOWNLINK: usize = 2;
pub const IDX_HOUR: usize = 3;
pub const IDX_ACCESS_TYPE: usize = 4;

/// Names by index. Sized by `FEATURE_COUNT`, so a missing name fails to compile.
pub const FEATURE_LAYOUT: [&str; FEATURE_COUNT] = [
    "duration",          // signed seconds, endTime - startTime
    "uplinkVolume",
    "downlinkVolume",
    "hourOfDay",         // startTime hour as written, 0-23
    "accessTypeEncoded",
];

/// CRC32 of the version byte followed by each name, NUL-terminated
pub fn layout_hash() -> u32 {
    let mut crc = Hasher::new();
    crc.update(&[FEATURE_VERSION]);
    FEATURE_LAYOUT.iter().for_each(|name| {
        crc.update(name.as_bytes());
        crc.update(b"\0");
    });
    crc.finalize()
}
