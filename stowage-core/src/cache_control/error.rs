use thiserror::Error;

/// Error produced while parsing a `Cache-Control` header value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheControlError {
    /// A character that cannot start or continue a directive.
    #[error("unexpected character {found:?} at offset {offset}")]
    UnexpectedChar {
        /// The offending character.
        found: char,
        /// Byte offset of the character in the header value.
        offset: usize,
    },

    /// A directive that requires an argument was given none.
    #[error("directive `{0}` is missing a value")]
    MissingValue(String),

    /// A quoted-string value without its closing quote.
    #[error("unterminated quoted string in directive `{0}`")]
    UnterminatedQuote(String),

    /// A delta-seconds argument that is negative or not a number.
    #[error("directive `{name}` expects delta-seconds, got {value:?}")]
    InvalidDeltaSeconds {
        /// Directive name.
        name: String,
        /// Raw argument.
        value: String,
    },
}
