use crate::error::{Result, RotorError};

/// The 26-letter alphabet every historical machine works over
pub const LATIN: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
/// Digit alphabet used by the SIGABA index rotors
pub const DIGITS: &str = "0123456789";
/// Extended alphabet for collaborators that also encipher numerals
pub const ALPHANUMERIC: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

const NO_INDEX: u8 = u8::MAX;

/// Ordered, duplicate-free sequence of ASCII symbols with an O(1) inverse table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<char>,
    lookup: [u8; 128],
}

impl Alphabet {
    /// Build an alphabet from an explicit symbol sequence
    /// Symbols must be ASCII and appear only once
    pub fn new(symbols: &str) -> Result<Self> {
        let chars: Vec<char> = symbols.chars().collect();
        if chars.is_empty() {
            return Err(RotorError::config("alphabet is empty"));
        }
        if chars.len() >= NO_INDEX as usize {
            return Err(RotorError::config(format!(
                "alphabet has {} symbols, at most {} supported",
                chars.len(),
                NO_INDEX - 1
            )));
        }
        let mut seen = [false; 128];
        for &c in &chars {
            if !c.is_ascii() {
                return Err(RotorError::config(format!("symbol {:?} is not ASCII", c)));
            }
            if seen[c as usize] {
                return Err(RotorError::config(format!("symbol {:?} appears twice", c)));
            }
            seen[c as usize] = true;
        }
        Ok(Self::build(chars))
    }

    pub fn latin() -> Self {
        Self::build(LATIN.chars().collect())
    }

    pub fn digits() -> Self {
        Self::build(DIGITS.chars().collect())
    }

    pub fn alphanumeric() -> Self {
        Self::build(ALPHANUMERIC.chars().collect())
    }

    // Caller guarantees ASCII, unique, fewer than 255 symbols
    fn build(symbols: Vec<char>) -> Self {
        let mut lookup = [NO_INDEX; 128];
        for (i, &c) in symbols.iter().enumerate() {
            lookup[c as usize] = i as u8;
        }
        Self { symbols, lookup }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }

    pub fn contains(&self, symbol: char) -> bool {
        self.index_of(symbol).is_some()
    }

    /// Position of `symbol`, if it belongs to the alphabet
    pub fn index_of(&self, symbol: char) -> Option<usize> {
        if !symbol.is_ascii() {
            return None;
        }
        match self.lookup[symbol as usize] {
            NO_INDEX => None,
            i => Some(i as usize),
        }
    }

    /// Symbol at `index`, wrapping modulo the alphabet length
    /// Negative indices count from the end: `-1` is the last symbol.
    pub fn symbol_at(&self, index: isize) -> char {
        let len = self.symbols.len() as isize;
        self.symbols[index.rem_euclid(len) as usize]
    }

    /// Keyed alphabet: each distinct symbol of `key` in first-seen order,
    /// followed by the unused symbols of `self` in their original order
    ///
    /// Key symbols are case-folded to upper case before lookup.
    pub fn permute(&self, key: &str) -> Result<Alphabet> {
        let mut used = vec![false; self.len()];
        let mut ordered = Vec::with_capacity(self.len());
        for raw in key.chars() {
            let symbol = raw.to_ascii_uppercase();
            let idx = self.index_of(symbol).ok_or_else(|| {
                RotorError::key(format!("key symbol {:?} is not in the alphabet", raw))
            })?;
            if !used[idx] {
                used[idx] = true;
                ordered.push(symbol);
            }
        }
        for (idx, &symbol) in self.symbols.iter().enumerate() {
            if !used[idx] {
                ordered.push(symbol);
            }
        }
        Ok(Self::build(ordered))
    }
}

impl std::fmt::Display for Alphabet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for c in &self.symbols {
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

/// Bijection over `0..n` stored as forward and inverse index tables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permutation {
    forward: Vec<u8>,
    inverse: Vec<u8>,
}

impl Permutation {
    /// Build from a forward table; every index must appear exactly once
    pub fn new(forward: Vec<u8>) -> Result<Self> {
        let n = forward.len();
        if n == 0 || n > u8::MAX as usize {
            return Err(RotorError::config(format!(
                "permutation size {} out of range",
                n
            )));
        }
        let mut inverse = vec![NO_INDEX; n];
        for (i, &target) in forward.iter().enumerate() {
            let t = target as usize;
            if t >= n {
                return Err(RotorError::config(format!(
                    "permutation maps {} to {}, outside 0..{}",
                    i, t, n
                )));
            }
            if inverse[t] != NO_INDEX {
                return Err(RotorError::config(format!(
                    "permutation maps both {} and {} to {}",
                    inverse[t], i, t
                )));
            }
            inverse[t] = i as u8;
        }
        Ok(Self { forward, inverse })
    }

    pub fn identity(n: usize) -> Self {
        let forward: Vec<u8> = (0..n).map(|i| i as u8).collect();
        Self {
            inverse: forward.clone(),
            forward,
        }
    }

    /// Wiring written as the image of each alphabet symbol in order,
    /// e.g. `"EKMFLGDQVZNTOWYHXUSPAIBRCJ"` maps A→E, B→K, ...
    pub fn from_wiring(wiring: &str, alphabet: &Alphabet) -> Result<Self> {
        let mut forward = Vec::with_capacity(alphabet.len());
        for c in wiring.chars() {
            let idx = alphabet.index_of(c.to_ascii_uppercase()).ok_or_else(|| {
                RotorError::config(format!("wiring symbol {:?} is not in the alphabet", c))
            })?;
            forward.push(idx as u8);
        }
        if forward.len() != alphabet.len() {
            return Err(RotorError::config(format!(
                "wiring {:?} has {} symbols, alphabet has {}",
                wiring,
                forward.len(),
                alphabet.len()
            )));
        }
        Self::new(forward)
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    pub fn apply(&self, index: usize) -> usize {
        self.forward[index] as usize
    }

    pub fn invert(&self, index: usize) -> usize {
        self.inverse[index] as usize
    }

    pub fn inverse(&self) -> Permutation {
        Self {
            forward: self.inverse.clone(),
            inverse: self.forward.clone(),
        }
    }

    /// The same wiring seen from the other face of the disk: `x ↦ -p⁻¹(-x)`
    pub fn mirrored(&self) -> Permutation {
        let n = self.len();
        let forward: Vec<u8> = (0..n)
            .map(|x| ((n - self.invert((n - x) % n)) % n) as u8)
            .collect();
        let mut inverse = vec![0u8; n];
        for (i, &t) in forward.iter().enumerate() {
            inverse[t as usize] = i as u8;
        }
        Self { forward, inverse }
    }

    pub fn is_involution(&self) -> bool {
        self.forward == self.inverse
    }

    pub fn fixed_points(&self) -> Vec<usize> {
        (0..self.len()).filter(|&i| self.apply(i) == i).collect()
    }

    /// Render the forward table through an alphabet
    pub fn render(&self, alphabet: &Alphabet) -> String {
        self.forward
            .iter()
            .map(|&i| alphabet.symbol_at(i as isize))
            .collect()
    }
}
