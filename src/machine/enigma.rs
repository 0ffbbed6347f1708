//! Enigma I / M3: three rotors, reflector, plugboard
//!
//! Rotors are listed left to right (slow to fast). The stepping lever
//! mechanism is modeled pawl by pawl, so the middle rotor double-steps.

use super::{drive, ensure_distinct, parse_settings, MachineState};
use crate::alphabet::{Alphabet, Permutation};
use crate::cipher::{Cipher, Direction};
use crate::error::{Result, RotorError};
use crate::plugboard::{Plugboard, Reflector};
use crate::rotor::{find_spec, Rotor, RotorSpec};
use crate::text::{tokenize, NonAlphabetic};
use serde::{Deserialize, Serialize};

/// Army and navy rotor catalog
pub const ROTORS: [RotorSpec; 8] = [
    RotorSpec { name: "I", wiring: "EKMFLGDQVZNTOWYHXUSPAIBRCJ", notches: "Q" },
    RotorSpec { name: "II", wiring: "AJDKSIRUXBLHWTMCQGZNPYFVOE", notches: "E" },
    RotorSpec { name: "III", wiring: "BDFHJLCPRTXVZNYEIWGAKMUSQO", notches: "V" },
    RotorSpec { name: "IV", wiring: "ESOVPZJAYQUIRHXLNFTGKDCMWB", notches: "J" },
    RotorSpec { name: "V", wiring: "VZBRGITYUPSDNHLXAWMJQOFECK", notches: "Z" },
    RotorSpec { name: "VI", wiring: "JPGVOUMFYQBENHZRDKASXLICTW", notches: "ZM" },
    RotorSpec { name: "VII", wiring: "NZJHGRCXMYSWBOUFAIVLPEKQDT", notches: "ZM" },
    RotorSpec { name: "VIII", wiring: "FKQHTLXOCBJSPDZRAMEWNIUYGV", notches: "ZM" },
];

/// Reflector wirings by name
pub const REFLECTORS: [(&str, &str); 3] = [
    ("A", "EJMZALYXVBWFCRQUONTSPIKHGD"),
    ("B", "YRUHQSLDPXNGOKMIEBFZCWVJAT"),
    ("C", "FVPJIAOYEDRZXWGCTKUQSBNMHL"),
];

/// Raw Enigma key material as written in a key file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnigmaConfig {
    /// Rotor identities, left to right
    pub rotors: Vec<String>,
    /// Reflector name (A, B, C) or a 26-letter custom wiring
    pub reflector: String,
    /// Grundstellung: one window letter per rotor
    pub positions: String,
    /// Ringstellung: one letter per rotor, all `A` when omitted
    #[serde(default)]
    pub rings: String,
    /// Plug pairs such as `"AE"`
    #[serde(default)]
    pub plugs: Vec<String>,
}

impl Default for EnigmaConfig {
    fn default() -> Self {
        Self {
            rotors: vec!["I".into(), "II".into(), "III".into()],
            reflector: "B".into(),
            positions: "AAA".into(),
            rings: "AAA".into(),
            plugs: Vec::new(),
        }
    }
}

/// Validated Enigma key schedule
#[derive(Debug, Clone)]
pub struct Enigma {
    alphabet: Alphabet,
    /// Left to right, at their start positions and ring settings
    rotors: Vec<Rotor>,
    reflector: Reflector,
    plugboard: Plugboard,
}

impl Enigma {
    pub const ROTOR_COUNT: usize = 3;
    pub const POLICY: NonAlphabetic = NonAlphabetic::Reject;

    pub fn new(config: &EnigmaConfig) -> Result<Self> {
        let alphabet = Alphabet::latin();

        if config.rotors.len() != Self::ROTOR_COUNT {
            return Err(RotorError::key(format!(
                "enigma takes {} rotors, got {}",
                Self::ROTOR_COUNT,
                config.rotors.len()
            )));
        }
        ensure_distinct("enigma", &config.rotors)?;

        let positions = parse_settings("positions", &config.positions, &alphabet, Self::ROTOR_COUNT)?;
        let rings = if config.rings.trim().is_empty() {
            vec![0; Self::ROTOR_COUNT]
        } else {
            parse_settings("rings", &config.rings, &alphabet, Self::ROTOR_COUNT)?
        };

        let mut rotors = Vec::with_capacity(Self::ROTOR_COUNT);
        for ((name, &position), &ring) in config.rotors.iter().zip(&positions).zip(&rings) {
            let spec = find_spec(&ROTORS, name.trim())
                .ok_or_else(|| RotorError::key(format!("unknown enigma rotor {:?}", name)))?;
            let mut rotor = spec.build(&alphabet)?;
            rotor.set_position(position);
            rotor.set_ring(ring);
            rotors.push(rotor);
        }

        let reflector = build_reflector(&config.reflector, &alphabet)?;
        let plugboard = Plugboard::new(&config.plugs, &alphabet)?;

        tracing::debug!(
            rotors = ?config.rotors,
            reflector = reflector.name(),
            plugs = plugboard.pairs(),
            "enigma key schedule ready"
        );

        Ok(Self {
            alphabet,
            rotors,
            reflector,
            plugboard,
        })
    }

    /// Fresh working state at the start positions
    pub fn start(&self) -> EnigmaState<'_> {
        EnigmaState {
            rotors: self.rotors.clone(),
            reflector: &self.reflector,
            plugboard: &self.plugboard,
            alphabet: &self.alphabet,
        }
    }

    /// Encode and decode are the same operation on an Enigma
    pub fn run(&self, text: &str, direction: Direction) -> Result<String> {
        let tokens = tokenize(text, &self.alphabet, Self::POLICY)?;
        tracing::debug!(symbols = tokens.len(), ?direction, "enigma run");
        Ok(drive(self.start(), &tokens, &self.alphabet, direction))
    }
}

fn build_reflector(id: &str, alphabet: &Alphabet) -> Result<Reflector> {
    let id = id.trim();
    if let Some((name, wiring)) = REFLECTORS.iter().find(|(n, _)| n.eq_ignore_ascii_case(id)) {
        return Reflector::new(*name, Permutation::from_wiring(wiring, alphabet)?);
    }
    if id.chars().count() == alphabet.len() {
        return Reflector::new("custom", Permutation::from_wiring(id, alphabet)?);
    }
    Err(RotorError::key(format!("unknown reflector {:?}", id)))
}

impl Cipher for Enigma {
    fn name(&self) -> &'static str {
        "enigma"
    }

    fn encode(&self, text: &str) -> Result<String> {
        self.run(text, Direction::Encode)
    }

    fn decode(&self, text: &str) -> Result<String> {
        self.run(text, Direction::Decode)
    }

    fn describe(&self) -> String {
        let names: Vec<&str> = self.rotors.iter().map(|r| r.name()).collect();
        format!(
            "enigma rotors {} reflector {} window {} plugs {}",
            names.join("-"),
            self.reflector.name(),
            self.start().window(),
            self.plugboard.pairs()
        )
    }
}

/// Rotor positions for one Enigma run
#[derive(Debug, Clone)]
pub struct EnigmaState<'a> {
    rotors: Vec<Rotor>,
    reflector: &'a Reflector,
    plugboard: &'a Plugboard,
    alphabet: &'a Alphabet,
}

impl EnigmaState<'_> {
    /// Letters showing in the rotor windows, left to right
    pub fn window(&self) -> String {
        self.rotors
            .iter()
            .map(|r| self.alphabet.symbol_at(r.position() as isize))
            .collect()
    }
}

impl MachineState for EnigmaState<'_> {
    fn advance(&mut self) {
        let [left, middle, right] = &mut self.rotors[..] else {
            return;
        };
        // Pawls read the notches before anything moves
        let middle_carries = middle.at_turnover();
        let right_carries = right.at_turnover();
        if middle_carries {
            left.step();
            middle.step();
        } else if right_carries {
            middle.step();
        }
        right.step();
        tracing::trace!(window = %self.window(), "enigma stepped");
    }

    fn transform(&self, symbol: usize, _direction: Direction) -> usize {
        let mut contact = self.plugboard.swap(symbol);
        for rotor in self.rotors.iter().rev() {
            contact = rotor.forward(contact);
        }
        contact = self.reflector.reflect(contact);
        for rotor in &self.rotors {
            contact = rotor.reverse(contact);
        }
        self.plugboard.swap(contact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(rotors: [&str; 3], reflector: &str, positions: &str, rings: &str, plugs: &[&str]) -> EnigmaConfig {
        EnigmaConfig {
            rotors: rotors.iter().map(|s| s.to_string()).collect(),
            reflector: reflector.into(),
            positions: positions.into(),
            rings: rings.into(),
            plugs: plugs.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_catalog_wirings_are_permutations() {
        let latin = Alphabet::latin();
        for spec in &ROTORS {
            assert!(spec.build(&latin).is_ok(), "rotor {}", spec.name);
        }
        for (name, _) in &REFLECTORS {
            assert!(build_reflector(name, &latin).is_ok(), "reflector {}", name);
        }
    }

    #[test]
    fn test_default_key_aaaaa() {
        let machine = Enigma::new(&EnigmaConfig::default()).unwrap();
        assert_eq!(machine.encode("AAAAA").unwrap(), "BDZGO");
        assert_eq!(machine.decode("BDZGO").unwrap(), "AAAAA");
    }

    #[test]
    fn test_ring_settings_shift_output() {
        let machine = Enigma::new(&config(["I", "II", "III"], "B", "AAA", "BBB", &[])).unwrap();
        assert_eq!(machine.encode("AAAAA").unwrap(), "EWTYX");
    }

    #[test]
    fn test_double_step() {
        let machine = Enigma::new(&config(["I", "II", "III"], "B", "ADU", "AAA", &[])).unwrap();
        let mut state = machine.start();
        let mut windows = Vec::new();
        for _ in 0..4 {
            state.advance();
            windows.push(state.window());
        }
        assert_eq!(windows, ["ADV", "AEW", "BFX", "BFY"]);
    }

    #[test]
    fn test_single_turnover_of_rotor_iii() {
        let machine = Enigma::new(&config(["I", "II", "III"], "B", "AAU", "AAA", &[])).unwrap();
        let mut state = machine.start();
        state.advance();
        assert_eq!(state.window(), "AAV");
        state.advance();
        assert_eq!(state.window(), "ABW");
        state.advance();
        assert_eq!(state.window(), "ABX");
    }

    #[test]
    fn test_never_maps_symbol_to_itself() {
        let machine = Enigma::new(&config(["IV", "II", "V"], "C", "QEV", "FVN", &["AE", "PO"])).unwrap();
        let plain = "A".repeat(200);
        let cipher = machine.encode(&plain).unwrap();
        assert!(!cipher.contains('A'));
    }

    #[test]
    fn test_validation_errors() {
        let dup = config(["I", "I", "III"], "B", "AAA", "AAA", &[]);
        assert!(matches!(Enigma::new(&dup), Err(RotorError::InvalidKey(_))));

        let unknown = config(["I", "IX", "III"], "B", "AAA", "AAA", &[]);
        assert!(matches!(Enigma::new(&unknown), Err(RotorError::InvalidKey(_))));

        let reflector = config(["I", "II", "III"], "Z", "AAA", "AAA", &[]);
        assert!(matches!(Enigma::new(&reflector), Err(RotorError::InvalidKey(_))));

        let plugs = config(["I", "II", "III"], "B", "AAA", "AAA", &["AE", "EA"]);
        assert!(matches!(Enigma::new(&plugs), Err(RotorError::InvalidKey(_))));

        let positions = config(["I", "II", "III"], "B", "AA", "AAA", &[]);
        assert!(matches!(Enigma::new(&positions), Err(RotorError::InvalidKey(_))));

        let mut two = EnigmaConfig::default();
        two.rotors.pop();
        assert!(matches!(Enigma::new(&two), Err(RotorError::InvalidKey(_))));
    }

    #[test]
    fn test_custom_reflector_must_be_fixed_point_free() {
        let good = config(["I", "II", "III"], "yruhqsldpxngokmiebfzcwvjat", "AAA", "", &[]);
        assert_eq!(Enigma::new(&good).unwrap().encode("AAAAA").unwrap(), "BDZGO");

        let fixed = config(["I", "II", "III"], "ABCDEFGHIJKLMNOPQRSTUVWXYZ", "AAA", "", &[]);
        assert!(matches!(
            Enigma::new(&fixed),
            Err(RotorError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_rejects_digits() {
        let machine = Enigma::new(&EnigmaConfig::default()).unwrap();
        assert!(matches!(
            machine.encode("ATTACK AT 0600"),
            Err(RotorError::InvalidInput(_))
        ));
        assert_eq!(machine.encode("aa aaa").unwrap(), "BDZGO");
    }

    #[test]
    fn test_describe() {
        let machine = Enigma::new(&config(["I", "II", "III"], "A", "ABC", "ABC", &["AE"])).unwrap();
        assert_eq!(
            machine.describe(),
            "enigma rotors I-II-III reflector A window ABC plugs 1"
        );
    }
}
