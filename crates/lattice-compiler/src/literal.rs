//! Literal parsing: numbers, quoted strings and bytes, and the quote
//! metadata used to decode the fragments of an interpolated string.
//!
//! Quoting follows these forms:
//!
//! - `"..."` strings and `'...'` bytes
//! - `"""` / `'''` multi-line forms, where the opening quotes are followed by
//!   a newline and the indentation of the closing quotes is removed from
//!   every line
//! - any of the above surrounded by `#` marks, e.g. `#"a\b"#`; escapes then
//!   take the form `\#n` and a plain backslash is literal

use std::num::IntErrorKind;

use lattice_core::Num;
use ordered_float::OrderedFloat;
use thiserror::Error;

/// Errors from parsing a literal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LiteralError {
    #[error("invalid syntax")]
    Syntax,

    #[error("missing newline after opening quotes of multi-line string")]
    MissingNewline,

    #[error("invalid whitespace in multi-line string")]
    InvalidWhitespace,

    #[error("unknown escape sequence")]
    UnknownEscape,

    #[error("invalid unicode code point")]
    InvalidCodePoint,

    #[error("byte escapes are only allowed in bytes literals")]
    ByteEscapeInString,

    #[error("string is not valid UTF-8")]
    InvalidUtf8,

    #[error("illegal number {0:?}")]
    InvalidNumber(String),

    #[error("illegal octal number {0:?}: use the 0o prefix")]
    LegacyOctal(String),

    #[error("number {0:?} out of range")]
    OutOfRange(String),

    #[error("multiplier applied to {0:?} does not yield an integer")]
    FractionalMultiple(String),
}

// ============================================================================
// Numbers
// ============================================================================

const MULTIPLIERS: [(&str, u128); 10] = [
    ("Ki", 1 << 10),
    ("Mi", 1 << 20),
    ("Gi", 1 << 30),
    ("Ti", 1 << 40),
    ("Pi", 1 << 50),
    ("K", 1_000),
    ("M", 1_000_000),
    ("G", 1_000_000_000),
    ("T", 1_000_000_000_000),
    ("P", 1_000_000_000_000_000),
];

/// Parse a number literal.
///
/// Integers may use `0x`, `0o` and `0b` prefixes, `_` separators and a
/// trailing SI (`K`..`P`) or binary (`Ki`..`Pi`) multiplier, which may be
/// applied to a decimal fraction as long as the product is whole. A leading
/// zero without a prefix is rejected.
pub fn parse_number(raw: &str) -> Result<Num, LiteralError> {
    let invalid = || LiteralError::InvalidNumber(raw.to_string());
    let s: String = raw.chars().filter(|&c| c != '_').collect();
    if s.is_empty() {
        return Err(invalid());
    }

    if let Some((radix, digits)) = radix_prefix(&s) {
        if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
            return Err(invalid());
        }
        return parse_int(digits, radix, raw);
    }

    if let Some((mantissa, mult)) = MULTIPLIERS
        .iter()
        .find_map(|&(suffix, mult)| s.strip_suffix(suffix).map(|m| (m, mult)))
    {
        return scale(mantissa, mult, raw);
    }

    if s.contains(['.', 'e', 'E']) {
        if !s
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
        {
            return Err(invalid());
        }
        return s
            .parse::<f64>()
            .map(|f| Num::Float(OrderedFloat(f)))
            .map_err(|_| invalid());
    }

    if !s.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    if s.len() > 1 && s.starts_with('0') {
        return Err(LiteralError::LegacyOctal(raw.to_string()));
    }
    parse_int(&s, 10, raw)
}

fn radix_prefix(s: &str) -> Option<(u32, &str)> {
    let (prefix, rest) = s.split_at_checked(2)?;
    match prefix {
        "0x" | "0X" => Some((16, rest)),
        "0o" | "0O" => Some((8, rest)),
        "0b" | "0B" => Some((2, rest)),
        _ => None,
    }
}

fn parse_int(digits: &str, radix: u32, raw: &str) -> Result<Num, LiteralError> {
    u128::from_str_radix(digits, radix)
        .map(Num::Int)
        .map_err(|e| match e.kind() {
            IntErrorKind::PosOverflow => LiteralError::OutOfRange(raw.to_string()),
            _ => LiteralError::InvalidNumber(raw.to_string()),
        })
}

/// `mantissa * mult`, where the mantissa may have a decimal fraction.
fn scale(mantissa: &str, mult: u128, raw: &str) -> Result<Num, LiteralError> {
    let (whole, frac) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if (whole.is_empty() && frac.is_empty()) || !all_digits(whole) || !all_digits(frac) {
        return Err(LiteralError::InvalidNumber(raw.to_string()));
    }

    let out_of_range = || LiteralError::OutOfRange(raw.to_string());
    let digits = format!("{whole}{frac}");
    let n = digits.parse::<u128>().map_err(|_| out_of_range())?;
    let denom = 10u128
        .checked_pow(frac.len() as u32)
        .ok_or_else(out_of_range)?;
    let product = n.checked_mul(mult).ok_or_else(out_of_range)?;
    if product % denom != 0 {
        return Err(LiteralError::FractionalMultiple(raw.to_string()));
    }
    Ok(Num::Int(product / denom))
}

// ============================================================================
// Quotes
// ============================================================================

/// How a string literal is quoted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteInfo {
    quote: char,
    num_hash: usize,
    multiline: bool,
    /// Indentation of the closing quotes of a multi-line literal.
    whitespace: String,
}

impl QuoteInfo {
    /// Whether the literal is a bytes literal.
    pub fn is_bytes(&self) -> bool {
        self.quote == '\''
    }

    fn closing_quotes(&self) -> String {
        let n = if self.multiline { 3 } else { 1 };
        let mut s: String = std::iter::repeat_n(self.quote, n).collect();
        s.extend(std::iter::repeat_n('#', self.num_hash));
        s
    }

    /// The source text that ends a literal: for multi-line literals this
    /// includes the final newline and the indentation.
    fn closing(&self) -> String {
        if self.multiline {
            format!("\n{}{}", self.whitespace, self.closing_quotes())
        } else {
            self.closing_quotes()
        }
    }

    /// The source text that starts an embedded expression.
    fn interpolation_open(&self) -> String {
        let mut s = String::from("\\");
        s.extend(std::iter::repeat_n('#', self.num_hash));
        s.push('(');
        s
    }

    /// Decode one fragment of a literal, with its opening quotes (or the
    /// `)` that closed the preceding expression) already removed.
    ///
    /// The fragment must end with either the closing quotes or the start of
    /// an embedded expression. `line_start` tells whether the fragment
    /// begins at the start of a line of a multi-line literal.
    pub fn unquote_fragment(&self, s: &str, line_start: bool) -> Result<Vec<u8>, LiteralError> {
        let body = if let Some(b) = s.strip_suffix(self.interpolation_open().as_str()) {
            b
        } else if let Some(b) = s.strip_suffix(self.closing().as_str()) {
            b
        } else if self.multiline
            && line_start
            && s == format!("{}{}", self.whitespace, self.closing_quotes())
        {
            ""
        } else {
            return Err(LiteralError::Syntax);
        };
        self.decode(body, line_start)
    }

    fn decode(&self, body: &str, line_start: bool) -> Result<Vec<u8>, LiteralError> {
        let mut out = Vec::with_capacity(body.len());
        let mut rest = body;
        let mut at_line_start = line_start && self.multiline;
        loop {
            if at_line_start {
                at_line_start = false;
                match rest.strip_prefix(self.whitespace.as_str()) {
                    Some(r) => rest = r,
                    None if rest.is_empty() || rest.starts_with('\n') => {}
                    None => return Err(LiteralError::InvalidWhitespace),
                }
            }
            let Some(c) = rest.chars().next() else {
                break;
            };
            rest = &rest[c.len_utf8()..];
            match c {
                '\n' if self.multiline => {
                    out.push(b'\n');
                    at_line_start = true;
                }
                '\\' => rest = self.decode_escape(rest, &mut out)?,
                _ => push_char(&mut out, c),
            }
        }
        Ok(out)
    }

    /// Decode the escape following a backslash, returning the remaining
    /// input.
    fn decode_escape<'s>(&self, mut rest: &'s str, out: &mut Vec<u8>) -> Result<&'s str, LiteralError> {
        if self.num_hash > 0 {
            let hashes = "#".repeat(self.num_hash);
            match rest.strip_prefix(hashes.as_str()) {
                Some(r) => rest = r,
                None => {
                    out.push(b'\\');
                    return Ok(rest);
                }
            }
        }

        let c = rest.chars().next().ok_or(LiteralError::Syntax)?;
        rest = &rest[c.len_utf8()..];
        let decoded = match c {
            'a' => '\x07',
            'b' => '\x08',
            'f' => '\x0c',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'v' => '\x0b',
            '\\' => '\\',
            '/' => '/',
            '"' | '\'' if c == self.quote => c,
            'u' | 'U' => {
                let n = if c == 'u' { 4 } else { 8 };
                let (hex, tail) = take_hex(rest, n)?;
                rest = tail;
                char::from_u32(hex).ok_or(LiteralError::InvalidCodePoint)?
            }
            'x' => {
                if !self.is_bytes() {
                    return Err(LiteralError::ByteEscapeInString);
                }
                let (byte, tail) = take_hex(rest, 2)?;
                out.push(byte as u8);
                return Ok(tail);
            }
            '0'..='7' => {
                if !self.is_bytes() {
                    return Err(LiteralError::ByteEscapeInString);
                }
                let digits = rest.get(..2).ok_or(LiteralError::UnknownEscape)?;
                if !digits.chars().all(|d| d.is_digit(8)) {
                    return Err(LiteralError::UnknownEscape);
                }
                let value = c.to_digit(8).unwrap_or(0) * 64
                    + u32::from_str_radix(digits, 8).map_err(|_| LiteralError::UnknownEscape)?;
                let byte = u8::try_from(value).map_err(|_| LiteralError::UnknownEscape)?;
                out.push(byte);
                return Ok(&rest[2..]);
            }
            _ => return Err(LiteralError::UnknownEscape),
        };
        push_char(out, decoded);
        Ok(rest)
    }
}

fn push_char(out: &mut Vec<u8>, c: char) {
    let mut buf = [0; 4];
    out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
}

fn take_hex(s: &str, n: usize) -> Result<(u32, &str), LiteralError> {
    let hex = s.get(..n).ok_or(LiteralError::UnknownEscape)?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(LiteralError::UnknownEscape);
    }
    let value = u32::from_str_radix(hex, 16).map_err(|_| LiteralError::UnknownEscape)?;
    Ok((value, &s[n..]))
}

/// Determine the quoting of a literal from its first and last fragments.
///
/// Returns the quote info, the length of the opening quotes in `start` and
/// the length of the closing sequence in `end`. For a plain literal both
/// fragments are the literal itself.
pub fn parse_quotes(start: &str, end: &str) -> Result<(QuoteInfo, usize, usize), LiteralError> {
    let num_hash = start.bytes().take_while(|&b| b == b'#').count();
    let rest = &start[num_hash..];
    let quote = match rest.chars().next() {
        Some(c @ ('"' | '\'')) => c,
        _ => return Err(LiteralError::Syntax),
    };
    let triple: String = std::iter::repeat_n(quote, 3).collect();
    let multiline = rest.starts_with(triple.as_str());

    let mut info = QuoteInfo {
        quote,
        num_hash,
        multiline,
        whitespace: String::new(),
    };

    if !multiline {
        let closing = info.closing_quotes();
        if !end.ends_with(closing.as_str()) {
            return Err(LiteralError::Syntax);
        }
        return Ok((info, num_hash + 1, closing.len()));
    }

    let after = &rest[3..];
    let newline = if after.starts_with('\n') {
        1
    } else if after.starts_with("\r\n") {
        2
    } else {
        return Err(LiteralError::MissingNewline);
    };

    let closing_quotes = info.closing_quotes();
    let inner = end
        .strip_suffix(closing_quotes.as_str())
        .ok_or(LiteralError::Syntax)?;
    let line = inner.rfind('\n').ok_or(LiteralError::Syntax)?;
    let whitespace = &inner[line + 1..];
    if !whitespace.chars().all(|c| c == ' ' || c == '\t') {
        return Err(LiteralError::InvalidWhitespace);
    }
    info.whitespace = whitespace.to_string();
    let suffix = info.closing().len();
    Ok((info, num_hash + 3 + newline, suffix))
}

/// Decode a complete quoted literal into its bytes and quote info.
pub fn unquote_bytes(s: &str) -> Result<(QuoteInfo, Vec<u8>), LiteralError> {
    let (info, prefix, _) = parse_quotes(s, s)?;
    if s.len() < prefix + if info.multiline { 0 } else { info.closing().len() } {
        return Err(LiteralError::Syntax);
    }
    let bytes = info.unquote_fragment(&s[prefix..], true)?;
    Ok((info, bytes))
}

/// Decode a complete quoted literal as text.
pub fn unquote(s: &str) -> Result<String, LiteralError> {
    let (_, bytes) = unquote_bytes(s)?;
    String::from_utf8(bytes).map_err(|_| LiteralError::InvalidUtf8)
}
