//! Splitting a source line into tokens, and reading registers, numbers,
//! labels and strings out of single tokens.

use std::str::Chars;

use crate::error::ErrorKind;


/// Tokens of one source line. Whitespace separates tokens, a comma is a
/// token of its own, `;` starts a comment and a `"` string stays whole.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    line: &'a str,
    chars: Chars<'a>,
    peeked: Option<Option<&'a str>>,
}

const EOF_CHAR: char = '\0';

impl<'a> Tokens<'a> {
    pub fn new(line: &'a str) -> Self {
        Self {
            line,
            chars: line.chars(),
            peeked: None,
        }
    }

    pub fn peek(&mut self) -> Option<&'a str> {
        if let Some(token) = self.peeked {
            return token;
        }
        let token = self.advance();
        self.peeked = Some(token);
        token
    }

    fn first(&self) -> char {
        self.chars.clone().next().unwrap_or(EOF_CHAR)
    }
    fn bump(&mut self) -> Option<char> {
        self.chars.next()
    }
    fn is_eof(&self) -> bool {
        self.chars.as_str().is_empty()
    }
    fn pos(&self) -> usize {
        self.line.len() - self.chars.as_str().len()
    }
    fn eat_while(&mut self, mut predicate: impl FnMut(char) -> bool) {
        while predicate(self.first()) && !self.is_eof() {
            self.bump();
        }
    }

    fn advance(&mut self) -> Option<&'a str> {
        loop {
            let start = self.pos();
            match self.bump()? {
                ch if ch.is_whitespace() => continue,
                ';' => {
                    self.chars = "".chars();
                    return None;
                }
                ',' => (),
                '"' => self.string(),
                _ => self.eat_while(|ch| !(ch.is_whitespace() || matches!(ch, ',' | ';' | '"'))),
            }
            return Some(&self.line[start..self.pos()]);
        }
    }

    fn string(&mut self) {
        while let Some(c) = self.bump() {
            match c {
                '"' => return,
                '\\' if self.first() == '\\' || self.first() == '"' => {
                    // Bump again to skip escaped character.
                    self.bump();
                }
                _ => (),
            }
        }
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        match self.peeked.take() {
            Some(token) => token,
            None => self.advance(),
        }
    }
}

/// Reads `R0`..`R7`, ignoring case.
pub fn parse_reg(token: &str) -> Option<u8> {
    match token.as_bytes() {
        [b'R' | b'r', n @ b'0'..=b'7'] => Some(n - b'0'),
        _ => None,
    }
}

/// Reads a numeric literal. `#` marks decimal and `x` marks hex, both with
/// an optional `-` after the prefix; a token starting with a digit or sign
/// is read C style, where `0x` marks hex. Anything else is hex without the
/// `x`.
pub fn parse_int(token: &str) -> Option<i32> {
    let (radix, rest) = match token.as_bytes().first()? {
        b'#' => (10, &token[1..]),
        b'x' | b'X' => (16, &token[1..]),
        b'0'..=b'9' | b'-' | b'+' => {
            return parse_c_int(token).or_else(|| magnitude(token, 16, false))
        }
        _ => (16, token),
    };
    let (negative, digits) = match rest.strip_prefix('-') {
        Some(digits) => (true, digits),
        None => (false, rest),
    };
    magnitude(digits, radix, negative)
}

fn parse_c_int(token: &str) -> Option<i32> {
    let (negative, rest) = match token.as_bytes().first()? {
        b'-' => (true, &token[1..]),
        b'+' => (false, &token[1..]),
        _ => (false, token),
    };
    match rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X")) {
        Some(hex) => magnitude(hex, 16, negative),
        None => magnitude(rest, 10, negative),
    }
}

fn magnitude(digits: &str, radix: u32, negative: bool) -> Option<i32> {
    // from_str_radix would accept a second sign
    if digits.is_empty() || !digits.chars().all(|ch| ch.is_digit(radix)) {
        return None;
    }
    let value = i64::from_str_radix(digits, radix).ok()?;
    i32::try_from(if negative { -value } else { value }).ok()
}

/// A label starts with a letter or `_`, followed by letters, digits or `_`.
pub fn is_valid_label(token: &str) -> bool {
    let mut chars = token.chars();
    chars.next().is_some_and(is_id_start) && chars.all(is_id_continue)
}

fn is_id_start(first: char) -> bool {
    matches!(first, 'a'..='z' | 'A'..='Z' | '_')
}
fn is_id_continue(ch: char) -> bool {
    matches!(ch, 'a'..='z' | 'A'..='Z' | '_' | '0'..='9')
}

/// Decodes a quoted string token, resolving escapes.
pub fn parse_string(token: &str) -> Result<String, ErrorKind> {
    let Some(body) = token.strip_prefix('"') else {
        return Err(ErrorKind::ExpectedString(token.to_owned()));
    };
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '"' if chars.as_str().is_empty() => return Ok(out),
            '"' => break,
            '\\' => match chars.next() {
                Some(esc) => out.push(escaped_char(esc)),
                None => break,
            },
            // one word per character
            _ if ch.len_utf16() > 1 => return Err(ErrorKind::WideChar(ch)),
            _ => out.push(ch),
        }
    }
    Err(ErrorKind::BadString(token.to_owned()))
}

/// The character an escape sequence stands for, given the character after
/// the backslash.
pub fn escaped_char(ch: char) -> char {
    match ch {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        '0' => '\0',
        _ => ch,
    }
}
