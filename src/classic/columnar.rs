use crate::alphabet::Alphabet;
use crate::cipher::Cipher;
use crate::error::{Result, RotorError};
use crate::text::{tokenize, NonAlphabetic, Token};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnarConfig {
    pub key: String,
    #[serde(default)]
    pub extended: bool,
}

/// Single columnar transposition
///
/// Plaintext is written row by row under the key and read out column by
/// column in key order. The last row is padded with random symbols, so
/// ciphertext length is always a multiple of the key length.
#[derive(Debug, Clone)]
pub struct Columnar {
    alphabet: Alphabet,
    /// Column indices in reading order
    order: Vec<usize>,
}

impl Columnar {
    pub fn new(key: &str, alphabet: Alphabet) -> Result<Self> {
        let ranks = key
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| {
                alphabet.index_of(c.to_ascii_uppercase()).ok_or_else(|| {
                    RotorError::key(format!("transposition key symbol {:?} is not in {}", c, alphabet))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        if ranks.len() < 2 {
            return Err(RotorError::key("transposition key needs at least 2 symbols"));
        }
        let mut order: Vec<usize> = (0..ranks.len()).collect();
        // Stable sort: repeated key symbols read left to right
        order.sort_by_key(|&column| ranks[column]);
        Ok(Self { alphabet, order })
    }

    pub fn from_config(config: &ColumnarConfig) -> Result<Self> {
        Self::new(&config.key, super::alphabet_for(config.extended))
    }

    pub fn width(&self) -> usize {
        self.order.len()
    }

    fn symbols(&self, text: &str) -> Result<Vec<usize>> {
        tokenize(text, &self.alphabet, NonAlphabetic::Reject)?
            .into_iter()
            .map(|t| match t {
                Token::Symbol(i) => Ok(i),
                Token::Literal(c) => Err(RotorError::InvalidInput(format!("symbol {:?}", c))),
            })
            .collect()
    }

    /// Encipher with padding drawn from `rng`
    pub fn encode_with<R: Rng + ?Sized>(&self, text: &str, rng: &mut R) -> Result<String> {
        let mut grid = self.symbols(text)?;
        let width = self.width();
        let original = grid.len();
        super::pad(&mut grid, width, &self.alphabet, rng);
        debug!(width, padding = grid.len() - original, "columnar encode");

        let rows = grid.len() / width;
        let mut output = String::with_capacity(grid.len());
        for &column in &self.order {
            for row in 0..rows {
                output.push(self.alphabet.symbol_at(grid[row * width + column] as isize));
            }
        }
        Ok(output)
    }
}

impl Cipher for Columnar {
    fn name(&self) -> &'static str {
        "columnar"
    }

    fn encode(&self, text: &str) -> Result<String> {
        self.encode_with(text, &mut rand::thread_rng())
    }

    /// Padding is not removed; the receiver sees the full last row
    fn decode(&self, text: &str) -> Result<String> {
        let symbols = self.symbols(text)?;
        let width = self.width();
        if symbols.len() % width != 0 {
            return Err(RotorError::InvalidInput(format!(
                "ciphertext length {} is not a multiple of key length {}",
                symbols.len(),
                width
            )));
        }
        let rows = symbols.len() / width;
        let mut grid = vec![0usize; symbols.len()];
        for (k, &column) in self.order.iter().enumerate() {
            for row in 0..rows {
                grid[row * width + column] = symbols[k * rows + row];
            }
        }
        Ok(grid
            .into_iter()
            .map(|i| self.alphabet.symbol_at(i as isize))
            .collect())
    }

    fn describe(&self) -> String {
        format!("columnar width {}", self.width())
    }
}
