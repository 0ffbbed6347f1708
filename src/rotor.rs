use crate::alphabet::{Alphabet, Permutation};
use crate::error::{Result, RotorError};

/// Static description of a catalog rotor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotorSpec {
    pub name: &'static str,
    /// Image of each alphabet symbol, in alphabet order
    pub wiring: &'static str,
    /// Window symbols at which the rotor to the left is carried
    pub notches: &'static str,
}

impl RotorSpec {
    /// Wire a fresh rotor at position 0, ring 0
    pub fn build(&self, alphabet: &Alphabet) -> Result<Rotor> {
        let wiring = Permutation::from_wiring(self.wiring, alphabet)?;
        let notches = self
            .notches
            .chars()
            .map(|c| {
                alphabet.index_of(c).ok_or_else(|| {
                    RotorError::config(format!("rotor {} notch {:?} not in alphabet", self.name, c))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Rotor::new(self.name, wiring, notches)
    }
}

/// Look a rotor up by name in a catalog
pub fn find_spec<'a>(catalog: &'a [RotorSpec], name: &str) -> Option<&'a RotorSpec> {
    catalog.iter().find(|spec| spec.name.eq_ignore_ascii_case(name))
}

/// A wired disk with an angular position, a ring offset and turnover notches
///
/// Rotors work over any alphabet size: 26 for letter rotors, 10 for the
/// SIGABA index rotors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rotor {
    name: String,
    wiring: Permutation,
    notches: Vec<usize>,
    ring: usize,
    position: usize,
}

impl Rotor {
    pub fn new(name: impl Into<String>, wiring: Permutation, notches: Vec<usize>) -> Result<Self> {
        let name = name.into();
        if let Some(&bad) = notches.iter().find(|&&n| n >= wiring.len()) {
            return Err(RotorError::config(format!(
                "rotor {} notch {} outside 0..{}",
                name,
                bad,
                wiring.len()
            )));
        }
        Ok(Self {
            name,
            wiring,
            notches,
            ring: 0,
            position: 0,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> usize {
        self.wiring.len()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn ring(&self) -> usize {
        self.ring
    }

    pub fn set_position(&mut self, position: usize) {
        self.position = position % self.size();
    }

    pub fn set_ring(&mut self, ring: usize) {
        self.ring = ring % self.size();
    }

    /// Turn the disk over in its cradle
    pub fn mirror(&mut self) {
        self.wiring = self.wiring.mirrored();
        self.name.push('R');
    }

    /// True when the current window position carries the next rotor
    pub fn at_turnover(&self) -> bool {
        self.notches.contains(&self.position)
    }

    pub fn step(&mut self) {
        self.position = (self.position + 1) % self.size();
    }

    fn offset(&self) -> usize {
        let n = self.size();
        (self.position + n - self.ring) % n
    }

    /// Signal entering from the stator side
    pub fn forward(&self, contact: usize) -> usize {
        let n = self.size();
        let shift = self.offset();
        (self.wiring.apply((contact + shift) % n) + n - shift) % n
    }

    /// Signal returning through the rotor
    pub fn reverse(&self, contact: usize) -> usize {
        let n = self.size();
        let shift = self.offset();
        (self.wiring.invert((contact + shift) % n) + n - shift) % n
    }
}
