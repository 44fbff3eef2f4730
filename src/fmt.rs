//! The host formatter's integer mini-language:
//! `[[fill]align][sign][#][0][width][,|_][b|o|d|x|X|n|c]`.

use itertools::Itertools;

use crate::error::{Error, Result};
use crate::int::Int;

#[derive(Debug, Clone, Copy)]
struct Spec {
    fill: char,
    align: Option<char>,
    sign: Option<char>,
    alternate: bool,
    width: usize,
    grouping: Option<char>,
    kind: char,
}

/// Render `x` under a format specification, matching the host formatter
/// byte for byte (including its grouped zero padding).
pub fn format_int(x: &Int, spec: &str) -> Result<String> {
    let sp = parse_spec(spec)?;
    if sp.kind == 'c' {
        return format_char(x, &sp);
    }

    let (base, upper) = match sp.kind {
        'b' => (2, false),
        'o' => (8, false),
        'd' | 'n' => (10, false),
        'x' => (16, false),
        'X' => (16, true),
        _ => unreachable!("validated by the parser"),
    };
    let mut digits = x.abs().to_string_base(base, false)?;
    if upper {
        digits.make_ascii_uppercase();
    }
    let sign = if x.is_negative() {
        "-"
    } else {
        match sp.sign {
            Some('+') => "+",
            Some(' ') => " ",
            _ => "",
        }
    };
    let prefix = if sp.alternate {
        match sp.kind {
            'b' => "0b",
            'o' => "0o",
            'x' => "0x",
            'X' => "0X",
            _ => "",
        }
    } else {
        ""
    };

    let zero_padding = sp.fill == '0' && sp.align == Some('=');
    let body = match sp.grouping {
        Some(sep) => {
            let size = if base == 10 { 3 } else { 4 };
            if zero_padding {
                // Zero padding participates in the grouping; digits grow one
                // zero at a time until the rendering reaches the width, so
                // the result never leads with a separator (and may overshoot
                // by the separator itself).
                loop {
                    let grouped = group(&digits, sep, size);
                    if sign.len() + prefix.len() + grouped.len() >= sp.width {
                        break grouped;
                    }
                    digits.insert(0, '0');
                }
            } else {
                group(&digits, sep, size)
            }
        }
        None if zero_padding => {
            let used = sign.len() + prefix.len() + digits.len();
            let mut padded = "0".repeat(sp.width.saturating_sub(used));
            padded.push_str(&digits);
            padded
        }
        None => digits,
    };

    Ok(aligned(&sp, sign, prefix, &body))
}

fn aligned(sp: &Spec, sign: &str, prefix: &str, body: &str) -> String {
    let used = sign.chars().count() + prefix.chars().count() + body.chars().count();
    let pad = sp.width.saturating_sub(used);
    let filler = |n: usize| sp.fill.to_string().repeat(n);
    match sp.align.unwrap_or('>') {
        '<' => format!("{sign}{prefix}{body}{}", filler(pad)),
        '>' => format!("{}{sign}{prefix}{body}", filler(pad)),
        '^' => format!("{}{sign}{prefix}{body}{}", filler(pad / 2), filler(pad - pad / 2)),
        '=' => format!("{sign}{prefix}{}{body}", filler(pad)),
        _ => unreachable!("validated by the parser"),
    }
}

fn format_char(x: &Int, sp: &Spec) -> Result<String> {
    let v = u32::try_from(x.as_zz().to_u64().ok_or(Error::Overflow)?)
        .map_err(|_| Error::Overflow)?;
    let c = char::from_u32(v).ok_or(Error::Overflow)?;
    Ok(aligned(sp, "", "", &c.to_string()))
}

fn group(digits: &str, sep: char, size: usize) -> String {
    digits
        .as_bytes()
        .rchunks(size)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).expect("ascii digits"))
        .join(&sep.to_string())
}

fn parse_spec(spec: &str) -> Result<Spec> {
    const BAD: Error = Error::Value("invalid format specifier");
    let chars: Vec<char> = spec.chars().collect();
    let mut i = 0;
    let mut fill = ' ';
    let mut fill_specified = false;
    let mut align = None;
    if chars.len() >= 2 && is_align(chars[1]) {
        fill = chars[0];
        fill_specified = true;
        align = Some(chars[1]);
        i = 2;
    } else if chars.first().copied().is_some_and(is_align) {
        align = Some(chars[0]);
        i = 1;
    }

    let mut sign = None;
    if chars.get(i).is_some_and(|c| matches!(c, '+' | '-' | ' ')) {
        sign = Some(chars[i]);
        i += 1;
    }
    let mut alternate = false;
    if chars.get(i) == Some(&'#') {
        alternate = true;
        i += 1;
    }
    // Bare zero padding is shorthand for fill '0'; an explicit fill wins
    // and the zero then counts toward the width.
    if !fill_specified && chars.get(i) == Some(&'0') {
        fill = '0';
        align.get_or_insert('=');
        i += 1;
    }
    let mut width = 0usize;
    while let Some(d) = chars.get(i).and_then(|c| c.to_digit(10)) {
        width = width.checked_mul(10).and_then(|w| w.checked_add(d as usize)).ok_or(BAD)?;
        i += 1;
    }
    let mut grouping = None;
    if chars.get(i).is_some_and(|c| matches!(c, ',' | '_')) {
        grouping = Some(chars[i]);
        i += 1;
    }
    let mut kind = 'd';
    if let Some(&c) = chars.get(i) {
        if !matches!(c, 'b' | 'o' | 'd' | 'x' | 'X' | 'n' | 'c') {
            return Err(BAD);
        }
        kind = c;
        i += 1;
    }
    if i != chars.len() {
        return Err(BAD);
    }

    if grouping == Some(',') && kind != 'd' {
        return Err(Error::Value("cannot specify ',' with this type"));
    }
    if grouping.is_some() && matches!(kind, 'n' | 'c') {
        return Err(Error::Value("cannot group this type"));
    }
    if kind == 'c' && (sign.is_some() || alternate) {
        return Err(Error::Value("sign not allowed with 'c'"));
    }

    Ok(Spec {
        fill,
        align,
        sign,
        alternate,
        width,
        grouping,
        kind,
    })
}

fn is_align(c: char) -> bool {
    matches!(c, '<' | '>' | '^' | '=')
}
