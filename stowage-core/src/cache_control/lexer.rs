//! Tokenizer for comma-separated directive lists.

use std::fmt;
use std::iter::Peekable;
use std::str::CharIndices;

use super::CacheControlError;

/// A single `name[=value]` directive with its name lowercased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Directive {
    pub(crate) name: String,
    pub(crate) value: Option<String>,
}

/// RFC 7230 `tchar`.
pub(crate) fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            '!' | '#' | '$' | '%' | '&' | '\'' | '*' | '+' | '-' | '.' | '^' | '_' | '`' | '|' | '~'
        )
}

fn is_token(value: &str) -> bool {
    !value.is_empty() && value.chars().all(is_token_char)
}

/// Writes a directive argument as a bare token when possible, quoted otherwise.
pub(crate) fn write_value(f: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
    if is_token(value) {
        return f.write_str(value);
    }
    f.write_str("\"")?;
    for c in value.chars() {
        if matches!(c, '"' | '\\') {
            f.write_str("\\")?;
        }
        write!(f, "{c}")?;
    }
    f.write_str("\"")
}

/// Splits a header value into directives.
pub(crate) fn directives(input: &str) -> Result<Vec<Directive>, CacheControlError> {
    let mut lexer = Lexer {
        chars: input.char_indices().peekable(),
    };
    let mut directives = Vec::new();

    loop {
        lexer.skip_separators();
        if lexer.chars.peek().is_none() {
            break;
        }
        let name = lexer.token()?.to_ascii_lowercase();
        lexer.skip_whitespace();

        let value = if lexer.eat('=') {
            lexer.skip_whitespace();
            Some(lexer.value(&name)?)
        } else {
            None
        };
        directives.push(Directive { name, value });

        lexer.skip_whitespace();
        match lexer.chars.next() {
            None | Some((_, ',')) => {}
            Some((offset, found)) => {
                return Err(CacheControlError::UnexpectedChar { found, offset });
            }
        }
    }

    Ok(directives)
}

struct Lexer<'a> {
    chars: Peekable<CharIndices<'a>>,
}

impl Lexer<'_> {
    fn eat(&mut self, expected: char) -> bool {
        self.chars.next_if(|&(_, c)| c == expected).is_some()
    }

    fn skip_whitespace(&mut self) {
        while self.chars.next_if(|&(_, c)| c == ' ' || c == '\t').is_some() {}
    }

    fn skip_separators(&mut self) {
        while self
            .chars
            .next_if(|&(_, c)| c == ' ' || c == '\t' || c == ',')
            .is_some()
        {}
    }

    fn token(&mut self) -> Result<String, CacheControlError> {
        let mut token = String::new();
        while let Some((_, c)) = self.chars.next_if(|&(_, c)| is_token_char(c)) {
            token.push(c);
        }
        if token.is_empty() {
            return Err(match self.chars.peek() {
                Some(&(offset, found)) => CacheControlError::UnexpectedChar { found, offset },
                None => CacheControlError::MissingValue(String::new()),
            });
        }
        Ok(token)
    }

    fn value(&mut self, name: &str) -> Result<String, CacheControlError> {
        if !self.eat('"') {
            return self
                .token()
                .map_err(|_| CacheControlError::MissingValue(name.to_owned()));
        }

        let mut value = String::new();
        loop {
            match self.chars.next() {
                Some((_, '"')) => return Ok(value),
                Some((_, '\\')) => match self.chars.next() {
                    Some((_, escaped)) => value.push(escaped),
                    None => return Err(CacheControlError::UnterminatedQuote(name.to_owned())),
                },
                Some((_, c)) => value.push(c),
                None => return Err(CacheControlError::UnterminatedQuote(name.to_owned())),
            }
        }
    }
}
