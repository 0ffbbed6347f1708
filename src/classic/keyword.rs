use crate::alphabet::Alphabet;
use crate::cipher::Cipher;
use crate::error::{Result, RotorError};
use crate::text::{tokenize, NonAlphabetic, Token};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordConfig {
    pub keyword: String,
    #[serde(default)]
    pub extended: bool,
}

/// Monoalphabetic substitution onto a keyword-mixed alphabet
#[derive(Debug, Clone)]
pub struct Keyword {
    plain: Alphabet,
    mixed: Alphabet,
}

impl Keyword {
    pub fn new(keyword: &str, alphabet: Alphabet) -> Result<Self> {
        let keyword: String = keyword.chars().filter(|c| !c.is_whitespace()).collect();
        if keyword.is_empty() {
            return Err(RotorError::key("substitution keyword is empty"));
        }
        let mixed = alphabet.permute(&keyword)?;
        Ok(Self {
            plain: alphabet,
            mixed,
        })
    }

    pub fn from_config(config: &KeywordConfig) -> Result<Self> {
        Self::new(&config.keyword, super::alphabet_for(config.extended))
    }

    /// The cipher alphabet, aligned with the plain one
    pub fn mixed(&self) -> &Alphabet {
        &self.mixed
    }

    fn substitute(&self, text: &str, from: &Alphabet, to: &Alphabet) -> Result<String> {
        let tokens = tokenize(text, from, NonAlphabetic::PassThrough)?;
        Ok(tokens
            .iter()
            .map(|t| match *t {
                Token::Symbol(i) => to.symbol_at(i as isize),
                Token::Literal(c) => c,
            })
            .collect())
    }
}

impl Cipher for Keyword {
    fn name(&self) -> &'static str {
        "keyword"
    }

    fn encode(&self, text: &str) -> Result<String> {
        self.substitute(text, &self.plain, &self.mixed)
    }

    fn decode(&self, text: &str) -> Result<String> {
        self.substitute(text, &self.mixed, &self.plain)
    }

    fn describe(&self) -> String {
        format!("keyword substitution {}", self.mixed)
    }
}
