//! Rotor machine simulators
//!
//! Every machine follows the same shape: a raw `*Config` (serde, as read from
//! a key file) is validated once into an immutable key schedule (`Enigma`,
//! `Sigaba`, `M209`). Each `encode`/`decode` call then builds a fresh
//! working state from the schedule and drives it over the text:
//!
//! ```text
//! for each symbol: advance (stepping controller) → transform (signal path) → append
//! ```

pub mod enigma;
pub mod m209;
pub mod sigaba;

pub use enigma::{Enigma, EnigmaConfig, EnigmaState};
pub use m209::{LugBar, M209Config, M209State, PinTable, PinWheel, M209};
pub use sigaba::{Sigaba, SigabaConfig, SigabaState};

use crate::alphabet::Alphabet;
use crate::cipher::Direction;
use crate::error::{Result, RotorError};
use crate::text::Token;

/// Mutable per-run state of one machine
pub trait MachineState {
    /// Move the rotors or wheels for the next symbol
    fn advance(&mut self);

    /// Pass one symbol through the current wiring
    fn transform(&self, symbol: usize, direction: Direction) -> usize;

    /// Advance, then transform
    fn process(&mut self, symbol: usize, direction: Direction) -> usize {
        self.advance();
        self.transform(symbol, direction)
    }
}

/// Run prepared tokens through a fresh state; literals bypass the machine
pub(crate) fn drive<S: MachineState>(
    mut state: S,
    tokens: &[Token],
    alphabet: &Alphabet,
    direction: Direction,
) -> String {
    let mut output = String::with_capacity(tokens.len());
    for token in tokens {
        match *token {
            Token::Symbol(symbol) => {
                let out = state.process(symbol, direction);
                output.push(alphabet.symbol_at(out as isize));
            }
            Token::Literal(c) => output.push(c),
        }
    }
    output
}

/// Parse a run of setting symbols such as `"ABC"` or `"02367"`
pub(crate) fn parse_settings(
    field: &str,
    value: &str,
    alphabet: &Alphabet,
    expected: usize,
) -> Result<Vec<usize>> {
    let settings = value
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| {
            alphabet.index_of(c.to_ascii_uppercase()).ok_or_else(|| {
                RotorError::key(format!("{} symbol {:?} is not in {}", field, c, alphabet))
            })
        })
        .collect::<Result<Vec<_>>>()?;
    if settings.len() != expected {
        return Err(RotorError::key(format!(
            "{} needs {} symbols, got {}",
            field,
            expected,
            settings.len()
        )));
    }
    Ok(settings)
}

/// Reject repeated rotor identities within one bank
pub(crate) fn ensure_distinct(bank: &str, names: &[String]) -> Result<()> {
    for (i, name) in names.iter().enumerate() {
        if names[..i].iter().any(|other| other.eq_ignore_ascii_case(name)) {
            return Err(RotorError::key(format!(
                "{} rotor {} selected more than once",
                bank, name
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_settings() {
        let latin = Alphabet::latin();
        assert_eq!(
            parse_settings("positions", "a B c", &latin, 3).unwrap(),
            vec![0, 1, 2]
        );
        assert!(matches!(
            parse_settings("positions", "AB", &latin, 3),
            Err(RotorError::InvalidKey(_))
        ));
        assert!(parse_settings("positions", "A1C", &latin, 3).is_err());
        assert_eq!(
            parse_settings("index", "02367", &Alphabet::digits(), 5).unwrap(),
            vec![0, 2, 3, 6, 7]
        );
    }

    #[test]
    fn test_ensure_distinct() {
        let ok = vec!["I".to_string(), "II".to_string()];
        assert!(ensure_distinct("cipher", &ok).is_ok());
        let dup = vec!["I".to_string(), "i".to_string()];
        assert!(matches!(
            ensure_distinct("cipher", &dup),
            Err(RotorError::InvalidKey(_))
        ));
    }
}
