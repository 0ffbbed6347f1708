use crate::alphabet::{Alphabet, Permutation};
use crate::error::{Result, RotorError};

/// Steckerbrett: disjoint symbol swaps, identity elsewhere
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plugboard {
    wiring: Permutation,
    pairs: usize,
}

impl Plugboard {
    /// Thirteen cables pair off the whole alphabet
    pub const MAX_PAIRS: usize = 13;

    /// Build from pairs such as `["AE", "BF"]`
    pub fn new<S: AsRef<str>>(pairs: &[S], alphabet: &Alphabet) -> Result<Self> {
        if pairs.len() > Self::MAX_PAIRS {
            return Err(RotorError::key(format!(
                "{} plug pairs given, at most {} allowed",
                pairs.len(),
                Self::MAX_PAIRS
            )));
        }
        let mut forward: Vec<u8> = (0..alphabet.len()).map(|i| i as u8).collect();
        let mut plugged = vec![false; alphabet.len()];
        for pair in pairs {
            let pair = pair.as_ref();
            let symbols: Vec<char> = pair.chars().map(|c| c.to_ascii_uppercase()).collect();
            if symbols.len() != 2 {
                return Err(RotorError::key(format!(
                    "plug pair {:?} must name exactly two symbols",
                    pair
                )));
            }
            let mut ends = [0usize; 2];
            for (slot, &symbol) in ends.iter_mut().zip(&symbols) {
                let idx = alphabet.index_of(symbol).ok_or_else(|| {
                    RotorError::key(format!("plug symbol {:?} is not in the alphabet", symbol))
                })?;
                if plugged[idx] {
                    return Err(RotorError::key(format!(
                        "plug symbol {:?} is used more than once",
                        symbol
                    )));
                }
                plugged[idx] = true;
                *slot = idx;
            }
            forward[ends[0]] = ends[1] as u8;
            forward[ends[1]] = ends[0] as u8;
        }
        Ok(Self {
            wiring: Permutation::new(forward)?,
            pairs: pairs.len(),
        })
    }

    pub fn identity(alphabet: &Alphabet) -> Self {
        Self {
            wiring: Permutation::identity(alphabet.len()),
            pairs: 0,
        }
    }

    pub fn pairs(&self) -> usize {
        self.pairs
    }

    pub fn swap(&self, contact: usize) -> usize {
        self.wiring.apply(contact)
    }
}

/// Umkehrwalze: fixed-point-free involution sending the signal back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reflector {
    name: String,
    wiring: Permutation,
}

impl Reflector {
    pub fn new(name: impl Into<String>, wiring: Permutation) -> Result<Self> {
        let name = name.into();
        if !wiring.is_involution() {
            return Err(RotorError::config(format!(
                "reflector {} is not self-inverse",
                name
            )));
        }
        if let Some(&fixed) = wiring.fixed_points().first() {
            return Err(RotorError::config(format!(
                "reflector {} maps contact {} to itself",
                name, fixed
            )));
        }
        Ok(Self { name, wiring })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn reflect(&self, contact: usize) -> usize {
        self.wiring.apply(contact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plugboard_swaps_pairs_only() {
        let latin = Alphabet::latin();
        let board = Plugboard::new(&["AE", "bz"], &latin).unwrap();
        assert_eq!(board.pairs(), 2);
        assert_eq!(board.swap(0), 4);
        assert_eq!(board.swap(4), 0);
        assert_eq!(board.swap(1), 25);
        assert_eq!(board.swap(2), 2);
    }

    #[test]
    fn test_plugboard_rejects_reused_symbol() {
        let latin = Alphabet::latin();
        let err = Plugboard::new(&["AE", "EB"], &latin).unwrap_err();
        assert!(matches!(err, RotorError::InvalidKey(_)));
        assert!(Plugboard::new(&["AA"], &latin).is_err());
        assert!(Plugboard::new(&["ABC"], &latin).is_err());
        assert!(Plugboard::new(&["A1"], &latin).is_err());
    }

    #[test]
    fn test_plugboard_pair_limit() {
        let latin = Alphabet::latin();
        let full: Vec<String> = (0..13)
            .map(|i| format!("{}{}", latin.symbol_at(2 * i), latin.symbol_at(2 * i + 1)))
            .collect();
        let board = Plugboard::new(&full, &latin).unwrap();
        assert!(board.wiring.fixed_points().is_empty());

        let mut too_many = full.clone();
        too_many.push("AB".into());
        assert!(matches!(
            Plugboard::new(&too_many, &latin),
            Err(RotorError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_reflector_validation() {
        let latin = Alphabet::latin();
        let ukw_a = Permutation::from_wiring("EJMZALYXVBWFCRQUONTSPIKHGD", &latin).unwrap();
        let reflector = Reflector::new("A", ukw_a).unwrap();
        assert_eq!(reflector.reflect(0), 4);
        assert_eq!(reflector.reflect(4), 0);

        let identity = Permutation::identity(26);
        assert!(matches!(
            Reflector::new("id", identity),
            Err(RotorError::InvalidConfiguration(_))
        ));

        // Rotor I is a permutation but not an involution
        let rotor = Permutation::from_wiring("EKMFLGDQVZNTOWYHXUSPAIBRCJ", &latin).unwrap();
        assert!(Reflector::new("I", rotor).is_err());
    }
}
