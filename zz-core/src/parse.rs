//! String decoding.
//!
//! Follows the host interpreter's integer-literal grammar: optional sign,
//! optional `0b`/`0o`/`0x` radix prefix under base 0, single underscores
//! between digits (one also allowed right after the prefix), surrounding
//! Unicode whitespace, and (for base 10) any Unicode decimal digit.

use crate::buffer;
use crate::error::{Error, Result};
use crate::zz::Zz;

/// Decode `s` in `base`, which is 0 for auto-detection or `2..=36`.
pub fn from_str(s: &str, base: u32) -> Result<Zz> {
    if base != 0 && !(2..=36).contains(&base) {
        return Err(Error::Value);
    }
    let mut rest = s.trim();

    let negative = match rest.as_bytes().first() {
        Some(b'+') => {
            rest = &rest[1..];
            false
        }
        Some(b'-') => {
            rest = &rest[1..];
            true
        }
        _ => false,
    };

    let (base, had_prefix, decimal_zero_rule, tail) = detect_base(rest, base);
    rest = tail;

    // One underscore may follow the radix prefix; every other underscore
    // must sit between two digits.
    let mut prev_underscore = false;
    if had_prefix {
        if let Some(tail) = rest.strip_prefix('_') {
            rest = tail;
            prev_underscore = true;
        }
    }

    let (big_base, chunk_len) = base_chunk(base);
    let mut digits = alloc::vec::Vec::new();
    let mut chunk = 0u64;
    let mut in_chunk = 0u32;
    let mut seen = 0usize;
    let mut leading_zero = false;

    for c in rest.chars() {
        if c == '_' {
            if prev_underscore || seen == 0 {
                return Err(Error::Value);
            }
            prev_underscore = true;
            continue;
        }
        let v = digit_value(c, base).ok_or(Error::Value)?;
        if seen == 0 {
            leading_zero = v == 0;
        }
        prev_underscore = false;
        seen += 1;
        chunk = chunk * u64::from(base) + v;
        in_chunk += 1;
        if in_chunk == chunk_len {
            buffer::mul_add_small_assign(&mut digits, big_base, chunk)?;
            chunk = 0;
            in_chunk = 0;
        }
    }
    if seen == 0 || prev_underscore {
        return Err(Error::Value);
    }
    if in_chunk > 0 {
        buffer::mul_add_small_assign(&mut digits, u64::from(base).pow(in_chunk), chunk)?;
    }

    // A base-0 decimal literal may not dress a nonzero value in leading
    // zeros ("0123" is ambiguous, "000" is not).
    if decimal_zero_rule && leading_zero && !digits.is_empty() {
        return Err(Error::Value);
    }
    Ok(Zz::from_raw(negative, digits))
}

/// Resolve base 0, consume a radix prefix where the grammar allows one, and
/// return the remaining digit run.
fn detect_base(rest: &str, base: u32) -> (u32, bool, bool, &str) {
    fn prefixed<'a>(s: &'a str, lo: &str, up: &str) -> Option<&'a str> {
        s.strip_prefix(lo).or_else(|| s.strip_prefix(up))
    }
    if base == 0 {
        for (lo, up, detected) in [("0b", "0B", 2), ("0o", "0O", 8), ("0x", "0X", 16)] {
            if let Some(tail) = prefixed(rest, lo, up) {
                return (detected, true, false, tail);
            }
        }
        return (10, false, true, rest);
    }
    let pair = match base {
        2 => Some(("0b", "0B")),
        8 => Some(("0o", "0O")),
        16 => Some(("0x", "0X")),
        _ => None,
    };
    if let Some((lo, up)) = pair {
        if let Some(tail) = prefixed(rest, lo, up) {
            return (base, true, false, tail);
        }
    }
    (base, false, false, rest)
}

/// Largest power of `base` fitting one digit, with its exponent.
fn base_chunk(base: u32) -> (u64, u32) {
    let mut power = u64::from(base);
    let mut len = 1;
    while let Some(next) = power.checked_mul(u64::from(base)) {
        power = next;
        len += 1;
    }
    (power, len)
}

fn digit_value(c: char, base: u32) -> Option<u64> {
    if let Some(v) = c.to_digit(base) {
        return Some(u64::from(v));
    }
    if base == 10 && !c.is_ascii() {
        return unicode_decimal(c);
    }
    None
}

/// Decimal value of a Unicode category-Nd character, for the common digit
/// blocks. Each block is a contiguous 0..9 run starting at the listed code
/// point.
fn unicode_decimal(c: char) -> Option<u64> {
    const ND_ZERO_POINTS: &[u32] = &[
        0x0660, // Arabic-Indic
        0x06F0, // Extended Arabic-Indic
        0x07C0, // NKo
        0x0966, // Devanagari
        0x09E6, // Bengali
        0x0A66, // Gurmukhi
        0x0AE6, // Gujarati
        0x0B66, // Oriya
        0x0BE6, // Tamil
        0x0C66, // Telugu
        0x0CE6, // Kannada
        0x0D66, // Malayalam
        0x0DE6, // Sinhala Lith
        0x0E50, // Thai
        0x0ED0, // Lao
        0x0F20, // Tibetan
        0x1040, // Myanmar
        0x1090, // Myanmar Shan
        0x17E0, // Khmer
        0x1810, // Mongolian
        0x1946, // Limbu
        0x19D0, // New Tai Lue
        0x1A80, // Tai Tham Hora
        0x1A90, // Tai Tham Tham
        0x1B50, // Balinese
        0x1BB0, // Sundanese
        0x1C40, // Lepcha
        0x1C50, // Ol Chiki
        0xA620, // Vai
        0xA8D0, // Saurashtra
        0xA900, // Kayah Li
        0xA9D0, // Javanese
        0xA9F0, // Myanmar Tai Laing
        0xAA50, // Cham
        0xABF0, // Meetei Mayek
        0xFF10, // Fullwidth
        0x104A0, // Osmanya
        0x10D30, // Hanifi Rohingya
        0x11066, // Brahmi
        0x110F0, // Sora Sompeng
        0x11136, // Chakma
        0x111D0, // Sharada
        0x112F0, // Khudawadi
        0x11450, // Newa
        0x114D0, // Tirhuta
        0x11650, // Modi
        0x116C0, // Takri
        0x11730, // Ahom
        0x118E0, // Warang Citi
        0x11950, // Dives Akuru
        0x11C50, // Bhaiksuki
        0x11D50, // Masaram Gondi
        0x11DA0, // Gunjala Gondi
        0x16A60, // Mro
        0x16B50, // Pahawh Hmong
        0x1D7CE, // Mathematical Bold
        0x1D7D8, // Mathematical Double-Struck
        0x1D7E2, // Mathematical Sans-Serif
        0x1D7EC, // Mathematical Sans-Serif Bold
        0x1D7F6, // Mathematical Monospace
        0x1E140, // Nyiakeng Puachue Hmong
        0x1E2F0, // Wancho
        0x1E950, // Adlam
    ];
    let cp = c as u32;
    let i = ND_ZERO_POINTS.partition_point(|&zero| zero <= cp);
    let zero = *ND_ZERO_POINTS.get(i.checked_sub(1)?)?;
    (cp - zero < 10).then(|| u64::from(cp - zero))
}
