use crate::alphabet::Alphabet;
use crate::cipher::{Cipher, Direction};
use crate::error::{Result, RotorError};
use crate::text::{tokenize, NonAlphabetic, Token};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VigenereConfig {
    pub key: String,
    #[serde(default)]
    pub extended: bool,
}

/// Periodic shift keyed by a word; the key only advances on alphabet symbols
#[derive(Debug, Clone)]
pub struct Vigenere {
    alphabet: Alphabet,
    key: Vec<usize>,
}

impl Vigenere {
    pub fn new(key: &str, alphabet: Alphabet) -> Result<Self> {
        let key = key
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| {
                alphabet.index_of(c.to_ascii_uppercase()).ok_or_else(|| {
                    RotorError::key(format!("vigenere key symbol {:?} is not in {}", c, alphabet))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        if key.is_empty() {
            return Err(RotorError::key("vigenere key is empty"));
        }
        Ok(Self { alphabet, key })
    }

    pub fn from_config(config: &VigenereConfig) -> Result<Self> {
        Self::new(&config.key, super::alphabet_for(config.extended))
    }

    pub fn period(&self) -> usize {
        self.key.len()
    }

    fn run(&self, text: &str, direction: Direction) -> Result<String> {
        let n = self.alphabet.len();
        let tokens = tokenize(text, &self.alphabet, NonAlphabetic::PassThrough)?;
        let mut key = self.key.iter().cycle();
        let mut output = String::with_capacity(tokens.len());
        for token in tokens {
            match token {
                Token::Symbol(i) => {
                    let k = key.next().copied().unwrap_or(0);
                    let out = match direction {
                        Direction::Encode => (i + k) % n,
                        Direction::Decode => (i + n - k) % n,
                    };
                    output.push(self.alphabet.symbol_at(out as isize));
                }
                Token::Literal(c) => output.push(c),
            }
        }
        Ok(output)
    }
}

impl Cipher for Vigenere {
    fn name(&self) -> &'static str {
        "vigenere"
    }

    fn encode(&self, text: &str) -> Result<String> {
        self.run(text, Direction::Encode)
    }

    fn decode(&self, text: &str) -> Result<String> {
        self.run(text, Direction::Decode)
    }

    fn describe(&self) -> String {
        format!("vigenere period {}", self.period())
    }
}
