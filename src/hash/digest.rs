//! Checksum and digest based hashes

use byteorder::{ByteOrder, LittleEndian};
use md5::{Digest, Md5};

pub(super) fn crc32(s: &str) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(s.as_bytes());
    hasher.finalize()
}

pub(super) fn md5(s: &str) -> u32 {
    let digest = Md5::digest(s.as_bytes());
    LittleEndian::read_u32(&digest[0..4])
}
