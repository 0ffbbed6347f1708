use crate::alphabet::Alphabet;
use crate::error::{Result, RotorError};

/// What a machine does with symbols outside its alphabet
///
/// Whitespace is always dropped and letters are upper-cased first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonAlphabetic {
    /// Fail with `InvalidInput`
    Reject,
    /// Copy the symbol to the output without touching machine state
    PassThrough,
}

/// One unit of prepared input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    Symbol(usize),
    Literal(char),
}

/// Normalize text into alphabet indices and pass-through literals
pub fn tokenize(text: &str, alphabet: &Alphabet, policy: NonAlphabetic) -> Result<Vec<Token>> {
    let mut tokens = Vec::with_capacity(text.len());
    for (offset, raw) in text.chars().enumerate() {
        if raw.is_whitespace() {
            continue;
        }
        let c = raw.to_ascii_uppercase();
        match (alphabet.index_of(c), policy) {
            (Some(idx), _) => tokens.push(Token::Symbol(idx)),
            (None, NonAlphabetic::PassThrough) => {
                tokens.extend(raw.to_uppercase().map(Token::Literal))
            }
            (None, NonAlphabetic::Reject) => {
                return Err(RotorError::InvalidInput(format!(
                    "symbol {:?} at offset {} is outside the alphabet",
                    raw, offset
                )))
            }
        }
    }
    Ok(tokens)
}

/// The text a round trip is expected to reproduce
pub fn normalize(text: &str, alphabet: &Alphabet, policy: NonAlphabetic) -> Result<String> {
    Ok(render(&tokenize(text, alphabet, policy)?, alphabet))
}

pub fn render(tokens: &[Token], alphabet: &Alphabet) -> String {
    tokens
        .iter()
        .map(|t| match *t {
            Token::Symbol(i) => alphabet.symbol_at(i as isize),
            Token::Literal(c) => c,
        })
        .collect()
}
