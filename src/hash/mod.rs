//! # Hash Module
//!
//! String hash functions used by hash based routing.
//!
//! Every function maps a string to a value in `[0, 2^31 - 1]`. The classic
//! string hashes walk the input as UTF-16 code units with 32-bit two's
//! complement arithmetic, so they agree with the usual JVM implementations
//! of the same functions for the same key.

mod classic;
mod digest;

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::{consts, BalanceError, Result};

/// Hash capability consumed by hash based strategies
pub trait HashFunction: Send + Sync {
    /// Hash a string into `[0, 2^31 - 1]`
    fn hash(&self, input: &str) -> Result<u32>;

    /// Name used in logs
    fn name(&self) -> &str {
        "custom"
    }
}

/// Built-in hash algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HashAlgorithm {
    /// Kernighan and Ritchie, seed 131
    Bkdr,
    /// Arash Partow
    Ap,
    /// Justin Sobel
    Js,
    /// Robert Sedgwick
    Rs,
    /// SDBM database library
    Sdbm,
    /// Peter J. Weinberger
    Pjw,
    /// Unix ELF object files
    Elf,
    /// Daniel J. Bernstein
    Djb,
    /// Donald E. Knuth
    Dek,
    /// BP
    Bp,
    /// Multiply-then-xor FNV variant
    Fnv,
    /// Java `String.hashCode`
    Jdk,
    /// FNV-1a with a final avalanche mix
    #[default]
    Fnv1aMix,
    /// CRC32 (IEEE)
    Crc32,
    /// First four bytes of the MD5 digest, ketama style
    Md5,
}

impl HashAlgorithm {
    pub const ALL: [HashAlgorithm; 15] = [
        HashAlgorithm::Bkdr,
        HashAlgorithm::Ap,
        HashAlgorithm::Js,
        HashAlgorithm::Rs,
        HashAlgorithm::Sdbm,
        HashAlgorithm::Pjw,
        HashAlgorithm::Elf,
        HashAlgorithm::Djb,
        HashAlgorithm::Dek,
        HashAlgorithm::Bp,
        HashAlgorithm::Fnv,
        HashAlgorithm::Jdk,
        HashAlgorithm::Fnv1aMix,
        HashAlgorithm::Crc32,
        HashAlgorithm::Md5,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithm::Bkdr => "bkdr",
            HashAlgorithm::Ap => "ap",
            HashAlgorithm::Js => "js",
            HashAlgorithm::Rs => "rs",
            HashAlgorithm::Sdbm => "sdbm",
            HashAlgorithm::Pjw => "pjw",
            HashAlgorithm::Elf => "elf",
            HashAlgorithm::Djb => "djb",
            HashAlgorithm::Dek => "dek",
            HashAlgorithm::Bp => "bp",
            HashAlgorithm::Fnv => "fnv",
            HashAlgorithm::Jdk => "jdk",
            HashAlgorithm::Fnv1aMix => "fnv1a-mix",
            HashAlgorithm::Crc32 => "crc32",
            HashAlgorithm::Md5 => "md5",
        }
    }

    /// Hash without the input length check
    fn compute(&self, input: &str) -> u32 {
        match self {
            HashAlgorithm::Bkdr => classic::bkdr(input),
            HashAlgorithm::Ap => classic::ap(input),
            HashAlgorithm::Js => classic::js(input),
            HashAlgorithm::Rs => classic::rs(input),
            HashAlgorithm::Sdbm => classic::sdbm(input),
            HashAlgorithm::Pjw => classic::pjw(input),
            HashAlgorithm::Elf => classic::elf(input),
            HashAlgorithm::Djb => classic::djb(input),
            HashAlgorithm::Dek => classic::dek(input),
            HashAlgorithm::Bp => classic::bp(input),
            HashAlgorithm::Fnv => classic::fnv(input),
            HashAlgorithm::Jdk => classic::jdk(input),
            HashAlgorithm::Fnv1aMix => classic::fnv1a_mix(input),
            HashAlgorithm::Crc32 => digest::crc32(input),
            HashAlgorithm::Md5 => digest::md5(input),
        }
    }
}

impl HashFunction for HashAlgorithm {
    fn hash(&self, input: &str) -> Result<u32> {
        if input.len() > consts::MAX_HASH_INPUT_LEN {
            return Err(BalanceError::InvalidInput(format!(
                "hash input of {} bytes exceeds limit of {} bytes",
                input.len(),
                consts::MAX_HASH_INPUT_LEN
            )));
        }
        Ok(self.compute(input) & consts::HASH_MASK)
    }

    fn name(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for HashAlgorithm {
    type Err = BalanceError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().to_lowercase();
        match name.as_str() {
            "java" | "default" => return Ok(HashAlgorithm::Jdk),
            "ketama" => return Ok(HashAlgorithm::Md5),
            _ => {}
        }
        HashAlgorithm::ALL
            .iter()
            .copied()
            .find(|alg| alg.as_str() == name)
            .ok_or_else(|| BalanceError::Config(format!("unknown hash algorithm: {}", s)))
    }
}
