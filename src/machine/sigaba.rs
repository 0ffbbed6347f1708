//! SIGABA (ECM Mark II): cipher, control and index rotor banks
//!
//! The control bank is driven as an odometer and its exit lines, collapsed
//! onto the index bank, choose which cipher rotors step for each letter.
//! Between one and four cipher rotors move per keystroke, in a pattern that
//! depends only on the key, never on the text.

use super::{drive, ensure_distinct, parse_settings, MachineState};
use crate::alphabet::Alphabet;
use crate::cipher::{Cipher, Direction};
use crate::error::{Result, RotorError};
use crate::rotor::{find_spec, Rotor, RotorSpec};
use crate::text::{tokenize, NonAlphabetic};
use serde::{Deserialize, Serialize};

/// Rotors per bank
pub const BANK_SIZE: usize = 5;

/// Cipher and control rotors share one catalog
pub const CIPHER_ROTORS: [RotorSpec; 10] = [
    RotorSpec { name: "I", wiring: "YCHLQSUGBDIXNZKERPVJTAWFOM", notches: "" },
    RotorSpec { name: "II", wiring: "INPXBWETGUYSAOCHVLDMQKZJFR", notches: "" },
    RotorSpec { name: "III", wiring: "WNDRIOZPTAXHFJYQBMSVEKUCGL", notches: "" },
    RotorSpec { name: "IV", wiring: "TZGHOBKRVUXLQDMPNFWCJYEIAS", notches: "" },
    RotorSpec { name: "V", wiring: "YWTAHRQJVLCEXUNGBIPZMSDFOK", notches: "" },
    RotorSpec { name: "VI", wiring: "QSLRBTEKOGAICFWYVMHJNXZUDP", notches: "" },
    RotorSpec { name: "VII", wiring: "CHJDQIGNBSAKVTUOXFWLEPRMZY", notches: "" },
    RotorSpec { name: "VIII", wiring: "CDFAJXTIMNBEQHSUGRYLWZKVPO", notches: "" },
    RotorSpec { name: "IX", wiring: "XHFESZDNRBCGKQIJLTVMUOYAPW", notches: "" },
    RotorSpec { name: "X", wiring: "EZJQXMOGYTCSFRIUPVNADLHWBK", notches: "" },
];

/// Ten-contact index rotors
pub const INDEX_ROTORS: [RotorSpec; 5] = [
    RotorSpec { name: "I", wiring: "7591482630", notches: "" },
    RotorSpec { name: "II", wiring: "3810592764", notches: "" },
    RotorSpec { name: "III", wiring: "4086153297", notches: "" },
    RotorSpec { name: "IV", wiring: "3980526174", notches: "" },
    RotorSpec { name: "V", wiring: "6497135280", notches: "" },
];

/// Control contacts energized on every keystroke: F, G, H, I
const CONTROL_INPUTS: [usize; 4] = [5, 6, 7, 8];

/// Control bank exit letter to index bank entry contact
const CONTROL_TO_INDEX: [usize; 26] = [
    9, // A
    1, // B
    2, // C
    3, 3, // D E
    4, 4, 4, // F G H
    5, 5, 5, // I J K
    6, 6, 6, 6, // L M N O
    7, 7, 7, 7, 7, // P Q R S T
    8, 8, 8, 8, 8, 8, // U V W X Y Z
];

/// Control rotor slots forming the odometer
const FAST: usize = 2;
const MEDIUM: usize = 3;
const SLOW: usize = 1;

/// The fast and medium control rotors carry when leaving `O`
const CARRY_POSITION: usize = 14;

/// Raw SIGABA key material as written in a key file
///
/// Cipher and control identities may end in `R` to mount the rotor reversed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigabaConfig {
    pub cipher_rotors: Vec<String>,
    pub control_rotors: Vec<String>,
    pub index_rotors: Vec<String>,
    /// Cipher rotor start letters
    pub indicator: String,
    /// Control rotor start letters
    pub control_start: String,
    /// Index rotor start digits
    pub index_start: String,
}

impl Default for SigabaConfig {
    fn default() -> Self {
        fn names(list: &[&str]) -> Vec<String> {
            list.iter().map(|s| s.to_string()).collect()
        }
        Self {
            cipher_rotors: names(&["V", "IX", "II", "IV", "III"]),
            control_rotors: names(&["IX", "VI", "I", "VII", "VIII"]),
            index_rotors: names(&["II", "I", "V", "IV", "III"]),
            indicator: "TABLE".into(),
            control_start: "GRAPH".into(),
            index_start: "02367".into(),
        }
    }
}

/// Validated SIGABA key schedule
#[derive(Debug, Clone)]
pub struct Sigaba {
    alphabet: Alphabet,
    cipher: Vec<Rotor>,
    control: Vec<Rotor>,
    index: Vec<Rotor>,
}

impl Sigaba {
    pub const POLICY: NonAlphabetic = NonAlphabetic::Reject;

    pub fn new(config: &SigabaConfig) -> Result<Self> {
        let alphabet = Alphabet::latin();
        let digits = Alphabet::digits();

        let cipher_start = parse_settings("indicator", &config.indicator, &alphabet, BANK_SIZE)?;
        let control_start =
            parse_settings("control start", &config.control_start, &alphabet, BANK_SIZE)?;
        let index_start = parse_settings("index start", &config.index_start, &digits, BANK_SIZE)?;

        let cipher = build_bank("cipher", &config.cipher_rotors, &CIPHER_ROTORS, &alphabet, &cipher_start, true)?;
        let control = build_bank("control", &config.control_rotors, &CIPHER_ROTORS, &alphabet, &control_start, true)?;
        let index = build_bank("index", &config.index_rotors, &INDEX_ROTORS, &digits, &index_start, false)?;

        tracing::debug!(
            cipher = ?config.cipher_rotors,
            control = ?config.control_rotors,
            index = ?config.index_rotors,
            "sigaba key schedule ready"
        );

        Ok(Self {
            alphabet,
            cipher,
            control,
            index,
        })
    }

    pub fn start(&self) -> SigabaState<'_> {
        SigabaState {
            cipher: self.cipher.clone(),
            control: self.control.clone(),
            index: &self.index,
            alphabet: &self.alphabet,
            stepped: [false; BANK_SIZE],
        }
    }

    pub fn run(&self, text: &str, direction: Direction) -> Result<String> {
        let tokens = tokenize(text, &self.alphabet, Self::POLICY)?;
        tracing::debug!(symbols = tokens.len(), ?direction, "sigaba run");
        Ok(drive(self.start(), &tokens, &self.alphabet, direction))
    }

    /// Which cipher rotors move on each of the first `keystrokes` letters
    pub fn stepping_trace(&self, keystrokes: usize) -> Vec<[bool; BANK_SIZE]> {
        let mut state = self.start();
        (0..keystrokes)
            .map(|_| {
                state.advance();
                state.stepped()
            })
            .collect()
    }
}

/// Wire one bank; `reversible` banks accept a trailing `R` on an identity
fn build_bank(
    bank: &str,
    names: &[String],
    catalog: &[RotorSpec],
    alphabet: &Alphabet,
    start: &[usize],
    reversible: bool,
) -> Result<Vec<Rotor>> {
    if names.len() != BANK_SIZE {
        return Err(RotorError::key(format!(
            "{} bank takes {} rotors, got {}",
            bank,
            BANK_SIZE,
            names.len()
        )));
    }

    let mut identities = Vec::with_capacity(BANK_SIZE);
    let mut rotors = Vec::with_capacity(BANK_SIZE);
    for (raw, &position) in names.iter().zip(start) {
        let raw = raw.trim();
        let (base, reversed) = match raw.strip_suffix(|c: char| c.eq_ignore_ascii_case(&'R')) {
            Some(base) if reversed_allowed(reversible, base, catalog) => (base, true),
            _ => (raw, false),
        };
        let spec = find_spec(catalog, base)
            .ok_or_else(|| RotorError::key(format!("unknown {} rotor {:?}", bank, raw)))?;
        let mut rotor = spec.build(alphabet)?;
        if reversed {
            rotor.mirror();
        }
        rotor.set_position(position);
        identities.push(spec.name.to_string());
        rotors.push(rotor);
    }
    ensure_distinct(bank, &identities)?;
    Ok(rotors)
}

fn bank_names(bank: &[Rotor]) -> String {
    bank.iter().map(|r| r.name()).collect::<Vec<_>>().join("-")
}

fn reversed_allowed(reversible: bool, base: &str, catalog: &[RotorSpec]) -> bool {
    reversible && find_spec(catalog, base).is_some()
}

impl Cipher for Sigaba {
    fn name(&self) -> &'static str {
        "sigaba"
    }

    fn encode(&self, text: &str) -> Result<String> {
        self.run(text, Direction::Encode)
    }

    fn decode(&self, text: &str) -> Result<String> {
        self.run(text, Direction::Decode)
    }

    fn describe(&self) -> String {
        format!(
            "sigaba cipher {} control {} index {}",
            bank_names(&self.cipher),
            bank_names(&self.control),
            bank_names(&self.index)
        )
    }
}

/// Cipher and control positions for one SIGABA run
#[derive(Debug, Clone)]
pub struct SigabaState<'a> {
    cipher: Vec<Rotor>,
    control: Vec<Rotor>,
    /// Index rotors never move during a message
    index: &'a [Rotor],
    alphabet: &'a Alphabet,
    stepped: [bool; BANK_SIZE],
}

impl SigabaState<'_> {
    /// Cipher rotors moved by the most recent `advance`
    pub fn stepped(&self) -> [bool; BANK_SIZE] {
        self.stepped
    }

    pub fn cipher_window(&self) -> String {
        self.window(&self.cipher)
    }

    pub fn control_window(&self) -> String {
        self.window(&self.control)
    }

    fn window(&self, bank: &[Rotor]) -> String {
        bank.iter()
            .map(|r| self.alphabet.symbol_at(r.position() as isize))
            .collect()
    }

    /// Stepping magnets energized by the current control and index settings
    fn magnets(&self) -> [bool; BANK_SIZE] {
        let mut index_inputs = [false; 10];
        for &input in &CONTROL_INPUTS {
            let exit = self.control.iter().fold(input, |c, rotor| rotor.forward(c));
            index_inputs[CONTROL_TO_INDEX[exit]] = true;
        }

        let mut magnets = [false; BANK_SIZE];
        for (contact, _) in index_inputs.iter().enumerate().filter(|&(_, &live)| live) {
            let exit = self.index.iter().fold(contact, |c, rotor| rotor.forward(c));
            magnets[exit / 2] = true;
        }
        magnets
    }

    fn step_control(&mut self) {
        if self.control[FAST].position() == CARRY_POSITION {
            if self.control[MEDIUM].position() == CARRY_POSITION {
                self.control[SLOW].step();
            }
            self.control[MEDIUM].step();
        }
        self.control[FAST].step();
    }
}

impl MachineState for SigabaState<'_> {
    fn advance(&mut self) {
        let magnets = self.magnets();
        for (rotor, _) in self.cipher.iter_mut().zip(magnets).filter(|(_, live)| *live) {
            rotor.step();
        }
        self.stepped = magnets;
        self.step_control();
        tracing::trace!(
            cipher = %self.cipher_window(),
            control = %self.control_window(),
            "sigaba stepped"
        );
    }

    fn transform(&self, symbol: usize, direction: Direction) -> usize {
        match direction {
            Direction::Encode => self.cipher.iter().fold(symbol, |c, rotor| rotor.forward(c)),
            Direction::Decode => self
                .cipher
                .iter()
                .rev()
                .fold(symbol, |c, rotor| rotor.reverse(c)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_wirings_are_permutations() {
        for spec in &CIPHER_ROTORS {
            assert!(spec.build(&Alphabet::latin()).is_ok(), "rotor {}", spec.name);
        }
        for spec in &INDEX_ROTORS {
            assert!(spec.build(&Alphabet::digits()).is_ok(), "index {}", spec.name);
        }
    }

    #[test]
    fn test_control_map_covers_nine_index_contacts() {
        let mut seen = [false; 10];
        for &contact in &CONTROL_TO_INDEX {
            seen[contact] = true;
        }
        assert!(!seen[0]);
        assert!(seen[1..].iter().all(|&s| s));
    }

    #[test]
    fn test_reference_key_schedule() {
        // Historical stepping applied to the default key schedule
        let machine = Sigaba::new(&SigabaConfig::default()).unwrap();
        assert_eq!(machine.encode("HELLOWORLD").unwrap(), "HGTXSQWYUY");
        assert_eq!(machine.decode("HGTXSQWYUY").unwrap(), "HELLOWORLD");
    }

    #[test]
    fn test_reference_stepping_trace() {
        let machine = Sigaba::new(&SigabaConfig::default()).unwrap();
        let trace: Vec<Vec<usize>> = machine
            .stepping_trace(10)
            .iter()
            .map(|step| (0..BANK_SIZE).filter(|&i| step[i]).collect())
            .collect();
        let expected: Vec<Vec<usize>> = vec![
            vec![0, 2, 3],
            vec![0, 3, 4],
            vec![1, 2],
            vec![0, 2, 3],
            vec![0],
            vec![0, 2, 4],
            vec![0, 2, 3, 4],
            vec![0, 2, 3, 4],
            vec![0, 2, 3],
            vec![0, 1, 4],
        ];
        assert_eq!(trace, expected);
    }

    #[test]
    fn test_one_to_four_rotors_step() {
        let machine = Sigaba::new(&SigabaConfig::default()).unwrap();
        for step in machine.stepping_trace(500) {
            let moved = step.iter().filter(|&&m| m).count();
            assert!((1..=4).contains(&moved), "{} rotors moved", moved);
        }
    }

    #[test]
    fn test_control_odometer_carries_at_o() {
        let config = SigabaConfig {
            control_start: "AOOOA".into(),
            ..SigabaConfig::default()
        };
        let machine = Sigaba::new(&config).unwrap();
        let mut state = machine.start();
        state.advance();
        assert_eq!(state.control_window(), "APPPA");
        state.advance();
        assert_eq!(state.control_window(), "APQPA");
    }

    #[test]
    fn test_same_identity_allowed_across_banks_not_within() {
        let config = SigabaConfig::default();
        assert!(config.cipher_rotors.contains(&"IX".to_string()));
        assert!(config.control_rotors.contains(&"IX".to_string()));
        assert!(Sigaba::new(&config).is_ok());

        let mut dup = SigabaConfig::default();
        dup.cipher_rotors[1] = "V".into();
        assert!(matches!(Sigaba::new(&dup), Err(RotorError::InvalidKey(_))));

        let mut mirrored_dup = SigabaConfig::default();
        mirrored_dup.cipher_rotors[1] = "VR".into();
        assert!(matches!(
            Sigaba::new(&mirrored_dup),
            Err(RotorError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_reversed_rotor_changes_output_and_round_trips() {
        let mut config = SigabaConfig::default();
        config.cipher_rotors[2] = "IIR".into();
        let machine = Sigaba::new(&config).unwrap();
        let cipher = machine.encode("HELLOWORLD").unwrap();
        assert_ne!(cipher, "HGTXSQWYUY");
        assert_eq!(machine.decode(&cipher).unwrap(), "HELLOWORLD");
        assert!(machine.describe().contains("IIR"));
    }

    #[test]
    fn test_rejects_digits() {
        let machine = Sigaba::new(&SigabaConfig::default()).unwrap();
        assert!(matches!(
            machine.encode("ATTACK AT 0600"),
            Err(RotorError::InvalidInput(_))
        ));
        assert!(matches!(
            machine.encode("hello, world"),
            Err(RotorError::InvalidInput(_))
        ));
        assert_eq!(machine.encode("hello world").unwrap(), "HGTXSQWYUY");
    }

    #[test]
    fn test_index_rotors_cannot_be_reversed() {
        let mut config = SigabaConfig::default();
        config.index_rotors[0] = "IIR".into();
        assert!(matches!(Sigaba::new(&config), Err(RotorError::InvalidKey(_))));
    }

    #[test]
    fn test_key_shape_errors() {
        let mut short = SigabaConfig::default();
        short.control_rotors.pop();
        assert!(matches!(Sigaba::new(&short), Err(RotorError::InvalidKey(_))));

        let bad_index = SigabaConfig {
            index_start: "0236A".into(),
            ..SigabaConfig::default()
        };
        assert!(matches!(Sigaba::new(&bad_index), Err(RotorError::InvalidKey(_))));

        let mut unknown = SigabaConfig::default();
        unknown.index_rotors[4] = "VI".into();
        assert!(matches!(Sigaba::new(&unknown), Err(RotorError::InvalidKey(_))));
    }
}
