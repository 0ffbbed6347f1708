//! Classical hand ciphers behind the same `Cipher` contract as the machines
//!
//! Substitution ciphers keep symbols outside their alphabet in place;
//! the transposition rejects them.

pub mod caesar;
pub mod columnar;
pub mod keyword;
pub mod vigenere;

pub use caesar::{Caesar, CaesarConfig};
pub use columnar::{Columnar, ColumnarConfig};
pub use keyword::{Keyword, KeywordConfig};
pub use vigenere::{Vigenere, VigenereConfig};

use crate::alphabet::Alphabet;
use rand::Rng;

/// Latin letters, or letters followed by digits
pub fn alphabet_for(extended: bool) -> Alphabet {
    if extended {
        Alphabet::alphanumeric()
    } else {
        Alphabet::latin()
    }
}

/// Fill the last row of a `width`-wide grid with random alphabet indices
pub fn pad<R: Rng + ?Sized>(symbols: &mut Vec<usize>, width: usize, alphabet: &Alphabet, rng: &mut R) {
    if width == 0 {
        return;
    }
    while symbols.len() % width != 0 {
        symbols.push(rng.gen_range(0..alphabet.len()));
    }
}
