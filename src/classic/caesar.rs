use crate::alphabet::Alphabet;
use crate::cipher::{Cipher, Direction};
use crate::error::Result;
use crate::text::{tokenize, NonAlphabetic, Token};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaesarConfig {
    pub shift: i64,
    /// Shift over letters and digits instead of letters only
    #[serde(default)]
    pub extended: bool,
}

/// Fixed shift around the alphabet
#[derive(Debug, Clone)]
pub struct Caesar {
    alphabet: Alphabet,
    shift: usize,
}

impl Caesar {
    pub fn new(shift: i64, alphabet: Alphabet) -> Self {
        let shift = shift.rem_euclid(alphabet.len() as i64) as usize;
        Self { alphabet, shift }
    }

    pub fn from_config(config: &CaesarConfig) -> Self {
        Self::new(config.shift, super::alphabet_for(config.extended))
    }

    pub fn shift(&self) -> usize {
        self.shift
    }

    fn run(&self, text: &str, direction: Direction) -> Result<String> {
        let n = self.alphabet.len();
        let shift = match direction {
            Direction::Encode => self.shift,
            Direction::Decode => n - self.shift,
        };
        let tokens = tokenize(text, &self.alphabet, NonAlphabetic::PassThrough)?;
        Ok(tokens
            .iter()
            .map(|t| match *t {
                Token::Symbol(i) => self.alphabet.symbol_at(((i + shift) % n) as isize),
                Token::Literal(c) => c,
            })
            .collect())
    }
}

impl Cipher for Caesar {
    fn name(&self) -> &'static str {
        "caesar"
    }

    fn encode(&self, text: &str) -> Result<String> {
        self.run(text, Direction::Encode)
    }

    fn decode(&self, text: &str) -> Result<String> {
        self.run(text, Direction::Decode)
    }

    fn describe(&self) -> String {
        format!("caesar shift {} over {} symbols", self.shift, self.alphabet.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classic_shift_three() {
        let caesar = Caesar::new(3, Alphabet::latin());
        assert_eq!(caesar.encode("veni vidi vici").unwrap(), "YHQLYLGLYLFL");
        assert_eq!(caesar.decode("YHQLYLGLYLFL").unwrap(), "VENIVIDIVICI");
    }

    #[test]
    fn test_negative_and_large_shifts_wrap() {
        assert_eq!(Caesar::new(-1, Alphabet::latin()).shift(), 25);
        assert_eq!(Caesar::new(53, Alphabet::latin()).shift(), 1);
        assert_eq!(Caesar::new(0, Alphabet::latin()).encode("ABC").unwrap(), "ABC");
    }

    #[test]
    fn test_extended_alphabet_shifts_into_digits() {
        let caesar = Caesar::from_config(&CaesarConfig {
            shift: 1,
            extended: true,
        });
        assert_eq!(caesar.encode("Z9").unwrap(), "0A");
        assert_eq!(caesar.decode("0A").unwrap(), "Z9");
    }

    #[test]
    fn test_punctuation_kept() {
        let caesar = Caesar::new(1, Alphabet::latin());
        assert_eq!(caesar.encode("A, B!").unwrap(), "B,C!");
    }
}
