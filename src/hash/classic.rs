//! Classic string hash functions
//!
//! All arithmetic is on `i32` with wrapping and arithmetic right shifts.
//! Callers mask the result to 31 bits.

#[inline]
fn units(s: &str) -> impl Iterator<Item = i32> + '_ {
    s.encode_utf16().map(i32::from)
}

pub(super) fn bkdr(s: &str) -> u32 {
    const SEED: i32 = 131;
    let hash = units(s).fold(0i32, |h, c| h.wrapping_mul(SEED).wrapping_add(c));
    hash as u32
}

pub(super) fn ap(s: &str) -> u32 {
    let mut hash: i32 = 0;
    for (i, c) in units(s).enumerate() {
        if i & 1 == 0 {
            hash ^= (hash << 7) ^ c ^ (hash >> 3);
        } else {
            hash ^= !((hash << 11) ^ c ^ (hash >> 5));
        }
    }
    hash as u32
}

pub(super) fn js(s: &str) -> u32 {
    let hash = units(s).fold(0i32, |h, c| {
        h ^ (h << 5).wrapping_add(c).wrapping_add(h >> 2)
    });
    hash as u32
}

pub(super) fn rs(s: &str) -> u32 {
    const B: i32 = 378551;
    let mut a: i32 = 63689;
    let mut hash: i32 = 0;
    for c in units(s) {
        hash = hash.wrapping_mul(a).wrapping_add(c);
        a = a.wrapping_mul(B);
    }
    hash as u32
}

pub(super) fn sdbm(s: &str) -> u32 {
    let hash = units(s).fold(0i32, |h, c| {
        c.wrapping_add(h << 6).wrapping_add(h << 16).wrapping_sub(h)
    });
    hash as u32
}

pub(super) fn pjw(s: &str) -> u32 {
    const BITS: u32 = 32;
    const THREE_QUARTERS: u32 = 24;
    const ONE_EIGHTH: u32 = 4;
    let high_bits = (u32::MAX << (BITS - ONE_EIGHTH)) as i32;

    let mut hash: i32 = 0;
    for c in units(s) {
        hash = (hash << ONE_EIGHTH).wrapping_add(c);
        let test = hash & high_bits;
        if test != 0 {
            hash = (hash ^ (test >> THREE_QUARTERS)) & !high_bits;
        }
    }
    hash as u32
}

pub(super) fn elf(s: &str) -> u32 {
    let mut hash: u32 = 0;
    for c in s.encode_utf16() {
        hash = (hash << 4).wrapping_add(u32::from(c));
        let x = hash & 0xF000_0000;
        if x != 0 {
            hash ^= x >> 24;
        }
        hash &= !x;
    }
    hash
}

pub(super) fn djb(s: &str) -> u32 {
    let hash = units(s).fold(5381i32, |h, c| h.wrapping_add(h << 5).wrapping_add(c));
    hash as u32
}

pub(super) fn dek(s: &str) -> u32 {
    let len = s.encode_utf16().count() as i32;
    let hash = units(s).fold(len, |h, c| (h << 5) ^ (h >> 27) ^ c);
    hash as u32
}

pub(super) fn bp(s: &str) -> u32 {
    let len = s.encode_utf16().count() as i32;
    let hash = units(s).fold(len, |h, c| (h << 7) ^ c);
    hash as u32
}

pub(super) fn fnv(s: &str) -> u32 {
    const PRIME: i32 = 0x811C_9DC5u32 as i32;
    let hash = units(s).fold(0i32, |h, c| h.wrapping_mul(PRIME) ^ c);
    hash as u32
}

pub(super) fn jdk(s: &str) -> u32 {
    let hash = units(s).fold(0i32, |h, c| h.wrapping_mul(31).wrapping_add(c));
    hash as u32
}

pub(super) fn fnv1a_mix(s: &str) -> u32 {
    const PRIME: i32 = 16777619;
    const OFFSET: i32 = 0x811C_9DC5u32 as i32;

    let mut hash = units(s).fold(OFFSET, |h, c| (h ^ c).wrapping_mul(PRIME));
    hash = hash.wrapping_add(hash << 13);
    hash ^= hash >> 7;
    hash = hash.wrapping_add(hash << 3);
    hash ^= hash >> 17;
    hash = hash.wrapping_add(hash << 5);
    // i32::MIN stays negative here and is masked to zero by the caller
    hash.wrapping_abs() as u32
}
