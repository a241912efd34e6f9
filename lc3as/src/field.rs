//! Bit-field access on machine words.
//!
//! Ranges are inclusive and may be given as `(hi, lo)` or `(lo, hi)`.
//! Values travel as `i32` so that both signed fields and full 16 bit
//! words fit without casts at the call site.


/// Width of an LC-3 word.
pub const WORD_BITS: u32 = 16;

fn ordered(hi: u32, lo: u32) -> (u32, u32) {
    if hi < lo {
        (lo, hi)
    } else {
        (hi, lo)
    }
}

fn mask(width: u32) -> i64 {
    (1i64 << width) - 1
}

/// Reads bits `[lo, hi]` of `value`, sign extending from the top bit of
/// the field when `signed` is set.
pub fn extract(value: i32, hi: u32, lo: u32, signed: bool) -> i32 {
    let (hi, lo) = ordered(hi, lo);
    debug_assert!(hi < 32);
    let width = hi - lo + 1;
    let field = (i64::from(value) >> lo) & mask(width);
    let field = if signed && (field >> (width - 1)) & 1 == 1 {
        field - (1i64 << width)
    } else {
        field
    };
    field as i32
}

/// Replaces bits `[lo, hi]` of `old` with the low order bits of `new`.
pub fn insert(old: i32, hi: u32, lo: u32, new: i32) -> i32 {
    let (hi, lo) = ordered(hi, lo);
    debug_assert!(hi < 32);
    let field = mask(hi - lo + 1) << lo;
    ((i64::from(old) & !field) | ((i64::from(new) << lo) & field)) as i32
}

/// Whether `value` is representable in a `width` bit field.
pub fn fits(value: i32, width: u32, signed: bool) -> bool {
    debug_assert!((1..=32).contains(&width));
    let value = i64::from(value);
    if signed {
        let half = 1i64 << (width - 1);
        (-half..half).contains(&value)
    } else {
        (0..1i64 << width).contains(&value)
    }
}
