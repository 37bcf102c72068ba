use crate::memchr;
use std::borrow::Cow;

/// Turns escaped text (`&lt;`, `&#65;`, ...) back into the bytes it stands for.
///
/// Decoding can't fail: whatever isn't understood is passed through.
pub trait EntityDecoder {
    fn decode<'a>(&self, raw: &'a [u8]) -> Cow<'a, [u8]>;
}

/// Decodes the predefined XML entities and numeric character references.
///
/// Names are matched case-insensitively, so `&LT;` works too.
/// Numeric references are written out as UTF-8.
/// Anything unknown or malformed (`&nbsp;`, `&#xZZ;`, a lone `&`) is kept verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlEntities;

/// Leaves everything as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct Verbatim;

// `&#x10FFFF;` is the longest reference we understand.
const MAX_REFERENCE_LEN: usize = 10;

impl EntityDecoder for XmlEntities {
    fn decode<'a>(&self, raw: &'a [u8]) -> Cow<'a, [u8]> {
        let first = match memchr(b'&', raw) {
            Some(idx) => idx,
            None => return Cow::Borrowed(raw),
        };

        let mut out = Vec::with_capacity(raw.len());
        out.extend_from_slice(&raw[..first]);
        let mut rest = &raw[first..];
        let mut buf = [0u8; 4];
        while !rest.is_empty() {
            // rest always starts at a `&` here
            match reference(rest) {
                Some((ch, len)) => {
                    out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
                    rest = &rest[len..];
                },
                None => {
                    out.push(b'&');
                    rest = &rest[1..];
                },
            }
            let next = memchr(b'&', rest).unwrap_or_else(|| rest.len());
            out.extend_from_slice(&rest[..next]);
            rest = &rest[next..];
        }
        Cow::Owned(out)
    }
}

impl EntityDecoder for Verbatim {
    fn decode<'a>(&self, raw: &'a [u8]) -> Cow<'a, [u8]> {
        Cow::Borrowed(raw)
    }
}

/// Parses the reference at the start of `s` (which begins with `&`).
/// Returns the character and how many bytes it spans, `;` included.
fn reference(s: &[u8]) -> Option<(char, usize)> {
    let window = &s[..s.len().min(MAX_REFERENCE_LEN + 1)];
    let semi = memchr(b';', window)?;
    let body = &s[1..semi];

    let ch = if let Some(num) = body.strip_prefix(b"#") {
        numeric(num)?
    } else if body.eq_ignore_ascii_case(b"lt") {
        '<'
    } else if body.eq_ignore_ascii_case(b"gt") {
        '>'
    } else if body.eq_ignore_ascii_case(b"quot") {
        '"'
    } else if body.eq_ignore_ascii_case(b"amp") {
        '&'
    } else if body.eq_ignore_ascii_case(b"apos") {
        '\''
    } else {
        return None;
    };
    Some((ch, semi + 1))
}

fn numeric(num: &[u8]) -> Option<char> {
    let (digits, radix) = match num.split_first() {
        Some((&b'x', hex)) | Some((&b'X', hex)) => (hex, 16),
        _ => (num, 10),
    };
    let valid = match radix {
        16 => digits.iter().all(u8::is_ascii_hexdigit),
        _ => digits.iter().all(u8::is_ascii_digit),
    };
    if digits.is_empty() || !valid {
        return None;
    }
    // digits are ASCII, so this can't fail
    let digits = std::str::from_utf8(digits).ok()?;
    u32::from_str_radix(digits, radix)
        .ok()
        .and_then(std::char::from_u32)
}
