use std::fmt;

/// Wrapper for a vocabulary token id. Using a newtype avoids accidental
/// mixing with unrelated `i32`s and keeps conversions explicit. A token
/// has identity only; there is no arithmetic meaning to the id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct Token(pub i32);

impl Token {
    #[inline]
    pub fn raw(self) -> i32 {
        self.0
    }
}

impl From<i32> for Token {
    #[inline]
    fn from(value: i32) -> Self {
        Token(value)
    }
}

impl From<Token> for i32 {
    #[inline]
    fn from(token: Token) -> i32 {
        token.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
