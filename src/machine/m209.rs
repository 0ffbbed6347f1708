//! M-209 (Hagelin C-38): six pin wheels and a 27-bar lug cage
//!
//! For each letter the cage counts the bars pushed out by active pins; that
//! count is the displacement `d` of a reversed-alphabet (Beaufort) step,
//! `c = 25 - p + d (mod 26)`. The same formula deciphers.

use super::{drive, MachineState};
use crate::alphabet::{Alphabet, LATIN};
use crate::cipher::{Cipher, Direction};
use crate::error::{Result, RotorError};
use crate::text::{tokenize, NonAlphabetic};
use serde::{Deserialize, Serialize};

pub const WHEEL_COUNT: usize = 6;
pub const BAR_COUNT: usize = 27;

/// Letters stamped on each wheel, left to right
pub const WHEEL_LETTERS: [&str; WHEEL_COUNT] = [
    "ABCDEFGHIJKLMNOPQRSTUVWXYZ",
    "ABCDEFGHIJKLMNOPQRSTUVXYZ",
    "ABCDEFGHIJKLMNOPQRSTUVX",
    "ABCDEFGHIJKLMNOPQRSTU",
    "ABCDEFGHIJKLMNOPQRS",
    "ABCDEFGHIJKLMNOPQ",
];

/// The lugs feel the pin this many positions past the displayed letter
const SENSING_OFFSETS: [usize; WHEEL_COUNT] = [15, 14, 13, 12, 11, 10];

/// One wheel's pin settings as written in a key file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PinTable {
    /// Letters whose pins are pushed to the active side, e.g. `"ABDHIKMNSTVW"`
    Letters(String),
    /// One flag per pin, in wheel order
    Flags(Vec<bool>),
}

/// Raw M-209 key material as written in a key file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct M209Config {
    /// Six letters shown in the wheel windows at the start of a message
    pub key: String,
    /// Six pin tables; empty means no pin is active
    #[serde(default)]
    pub pins: Vec<PinTable>,
    /// 27 bars written `"a-b"` with 0 for a neutral lug and 1-6 for a wheel;
    /// empty means every lug is neutral
    #[serde(default)]
    pub lugs: Vec<String>,
    /// Non-standard wheel sizes; lettered from `A` when they differ from
    /// the stock wheel in that slot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wheel_lengths: Option<Vec<usize>>,
}

impl Default for M209Config {
    fn default() -> Self {
        Self {
            key: "AAAAAA".into(),
            pins: Vec::new(),
            lugs: Vec::new(),
            wheel_lengths: None,
        }
    }
}

/// A lettered wheel with one pin per letter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinWheel {
    letters: Vec<char>,
    pins: Vec<bool>,
    sensing_offset: usize,
}

impl PinWheel {
    pub fn new(letters: &str, pins: Vec<bool>, sensing_offset: usize) -> Result<Self> {
        let letters: Vec<char> = letters.chars().collect();
        if letters.is_empty() {
            return Err(RotorError::config("pin wheel has no letters"));
        }
        if pins.len() != letters.len() {
            return Err(RotorError::config(format!(
                "pin table has {} entries, wheel has {} pins",
                pins.len(),
                letters.len()
            )));
        }
        Ok(Self {
            letters,
            pins,
            sensing_offset,
        })
    }

    /// Wheel with the pins under `active` pushed out
    pub fn with_active_letters(letters: &str, active: &str, sensing_offset: usize) -> Result<Self> {
        let mut pins = vec![false; letters.chars().count()];
        for c in active.chars().filter(|c| !c.is_whitespace()) {
            let upper = c.to_ascii_uppercase();
            let idx = letters.chars().position(|l| l == upper).ok_or_else(|| {
                RotorError::key(format!("pin {:?} is not on wheel {}", c, letters))
            })?;
            pins[idx] = true;
        }
        Self::new(letters, pins, sensing_offset)
    }

    pub fn len(&self) -> usize {
        self.letters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    pub fn letter_at(&self, position: usize) -> char {
        self.letters[position % self.len()]
    }

    pub fn position_of(&self, letter: char) -> Option<usize> {
        let upper = letter.to_ascii_uppercase();
        self.letters.iter().position(|&l| l == upper)
    }

    /// Whether the pin read by the lugs is active while `position` is displayed
    pub fn active_at(&self, position: usize) -> bool {
        self.pins[(position + self.sensing_offset) % self.len()]
    }

    pub fn active_count(&self) -> usize {
        self.pins.iter().filter(|&&p| p).count()
    }
}

/// A cage bar with two lug slots, each neutral or facing one wheel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LugBar {
    lugs: [Option<usize>; 2],
}

impl LugBar {
    pub const NEUTRAL: LugBar = LugBar { lugs: [None, None] };

    /// Wheels are numbered from 0 here
    pub fn new(first: Option<usize>, second: Option<usize>) -> Result<Self> {
        for wheel in [first, second].into_iter().flatten() {
            if wheel >= WHEEL_COUNT {
                return Err(RotorError::key(format!(
                    "lug references wheel {}, machine has {}",
                    wheel + 1,
                    WHEEL_COUNT
                )));
            }
        }
        if let (Some(a), Some(b)) = (first, second) {
            if a == b {
                return Err(RotorError::config(format!(
                    "bar has both lugs on wheel {}",
                    a + 1
                )));
            }
        }
        Ok(Self {
            lugs: [first, second],
        })
    }

    pub fn wheels(&self) -> impl Iterator<Item = usize> + '_ {
        self.lugs.iter().flatten().copied()
    }

    /// A bar is pushed out if any of its lugs meets an active pin
    pub fn engaged(&self, sensed: &[bool]) -> bool {
        self.wheels().any(|w| sensed[w])
    }
}

impl std::str::FromStr for LugBar {
    type Err = RotorError;
    /// Parse `"a-b"`, with wheels counted from 1 and 0 for neutral
    fn from_str(s: &str) -> Result<Self> {
        let (a, b) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| RotorError::key(format!("lug bar {:?} is not of the form a-b", s)))?;
        let slot = |part: &str| -> Result<Option<usize>> {
            let n: usize = part
                .trim()
                .parse()
                .map_err(|_| RotorError::key(format!("lug bar {:?}: {:?} is not a wheel", s, part)))?;
            Ok(n.checked_sub(1))
        };
        Self::new(slot(a)?, slot(b)?)
    }
}

impl std::fmt::Display for LugBar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let slot = |s: Option<usize>| s.map_or(0, |w| w + 1);
        write!(f, "{}-{}", slot(self.lugs[0]), slot(self.lugs[1]))
    }
}

fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Validated M-209 key schedule
#[derive(Debug, Clone)]
pub struct M209 {
    alphabet: Alphabet,
    wheels: Vec<PinWheel>,
    bars: Vec<LugBar>,
    start: Vec<usize>,
}

impl M209 {
    pub const POLICY: NonAlphabetic = NonAlphabetic::PassThrough;

    pub fn new(config: &M209Config) -> Result<Self> {
        let letters = wheel_letters(config.wheel_lengths.as_deref())?;

        if !config.pins.is_empty() && config.pins.len() != WHEEL_COUNT {
            return Err(RotorError::key(format!(
                "{} pin tables given, machine has {} wheels",
                config.pins.len(),
                WHEEL_COUNT
            )));
        }
        let mut wheels = Vec::with_capacity(WHEEL_COUNT);
        for (slot, letters) in letters.iter().enumerate() {
            let offset = SENSING_OFFSETS[slot];
            let wheel = match config.pins.get(slot) {
                None => PinWheel::new(letters, vec![false; letters.len()], offset)?,
                Some(PinTable::Letters(active)) => {
                    PinWheel::with_active_letters(letters, active, offset)?
                }
                Some(PinTable::Flags(flags)) => PinWheel::new(letters, flags.clone(), offset)?,
            };
            wheels.push(wheel);
        }

        let bars = if config.lugs.is_empty() {
            vec![LugBar::NEUTRAL; BAR_COUNT]
        } else if config.lugs.len() != BAR_COUNT {
            return Err(RotorError::key(format!(
                "{} lug bars given, cage holds {}",
                config.lugs.len(),
                BAR_COUNT
            )));
        } else {
            config
                .lugs
                .iter()
                .map(|s| s.parse())
                .collect::<Result<Vec<LugBar>>>()?
        };

        let key: Vec<char> = config.key.chars().filter(|c| !c.is_whitespace()).collect();
        if key.len() != WHEEL_COUNT {
            return Err(RotorError::key(format!(
                "wheel key needs {} letters, got {}",
                WHEEL_COUNT,
                key.len()
            )));
        }
        let start = key
            .iter()
            .zip(&wheels)
            .enumerate()
            .map(|(slot, (&c, wheel))| {
                wheel.position_of(c).ok_or_else(|| {
                    RotorError::key(format!("key letter {:?} is not on wheel {}", c, slot + 1))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            key = %config.key,
            active_pins = wheels.iter().map(PinWheel::active_count).sum::<usize>(),
            live_bars = bars.iter().filter(|b| b.wheels().next().is_some()).count(),
            "m209 key schedule ready"
        );

        Ok(Self {
            alphabet: Alphabet::latin(),
            wheels,
            bars,
            start,
        })
    }

    pub fn start(&self) -> M209State<'_> {
        M209State {
            wheels: &self.wheels,
            bars: &self.bars,
            positions: self.start.clone(),
            alphabet_len: self.alphabet.len(),
        }
    }

    pub fn run(&self, text: &str, direction: Direction) -> Result<String> {
        let tokens = tokenize(text, &self.alphabet, Self::POLICY)?;
        tracing::debug!(symbols = tokens.len(), ?direction, "m209 run");
        Ok(drive(self.start(), &tokens, &self.alphabet, direction))
    }
}

/// Letter sequence for each wheel slot, checking sizes are pairwise coprime
fn wheel_letters(lengths: Option<&[usize]>) -> Result<Vec<String>> {
    let Some(lengths) = lengths else {
        return Ok(WHEEL_LETTERS.iter().map(|s| s.to_string()).collect());
    };
    if lengths.len() != WHEEL_COUNT {
        return Err(RotorError::key(format!(
            "{} wheel lengths given, machine has {} wheels",
            lengths.len(),
            WHEEL_COUNT
        )));
    }
    for (i, &a) in lengths.iter().enumerate() {
        if !(2..=LATIN.len()).contains(&a) {
            return Err(RotorError::config(format!(
                "wheel {} length {} outside 2..={}",
                i + 1,
                a,
                LATIN.len()
            )));
        }
        for (j, &b) in lengths.iter().enumerate().skip(i + 1) {
            if gcd(a, b) != 1 {
                return Err(RotorError::config(format!(
                    "wheel {} ({}) and wheel {} ({}) share factor {}",
                    i + 1,
                    a,
                    j + 1,
                    b,
                    gcd(a, b)
                )));
            }
        }
    }
    Ok(lengths
        .iter()
        .zip(WHEEL_LETTERS)
        .map(|(&len, stock)| {
            if stock.len() == len {
                stock.to_string()
            } else {
                LATIN[..len].to_string()
            }
        })
        .collect())
}

impl Cipher for M209 {
    fn name(&self) -> &'static str {
        "m209"
    }

    fn encode(&self, text: &str) -> Result<String> {
        self.run(text, Direction::Encode)
    }

    fn decode(&self, text: &str) -> Result<String> {
        self.run(text, Direction::Decode)
    }

    fn describe(&self) -> String {
        let lengths: Vec<String> = self.wheels.iter().map(|w| w.len().to_string()).collect();
        format!(
            "m209 wheels {} key {} bars {}",
            lengths.join("/"),
            self.start().window(),
            self.bars.len()
        )
    }
}

/// Wheel positions for one M-209 run
#[derive(Debug, Clone)]
pub struct M209State<'a> {
    wheels: &'a [PinWheel],
    bars: &'a [LugBar],
    positions: Vec<usize>,
    alphabet_len: usize,
}

impl M209State<'_> {
    /// Letters showing in the wheel windows
    pub fn window(&self) -> String {
        self.wheels
            .iter()
            .zip(&self.positions)
            .map(|(wheel, &pos)| wheel.letter_at(pos))
            .collect()
    }

    /// Bars pushed out at the current setting, reduced mod 26
    pub fn displacement(&self) -> usize {
        let sensed: Vec<bool> = self
            .wheels
            .iter()
            .zip(&self.positions)
            .map(|(wheel, &pos)| wheel.active_at(pos))
            .collect();
        self.bars.iter().filter(|bar| bar.engaged(&sensed)).count() % self.alphabet_len
    }
}

impl MachineState for M209State<'_> {
    fn advance(&mut self) {
        for (pos, wheel) in self.positions.iter_mut().zip(self.wheels) {
            *pos = (*pos + 1) % wheel.len();
        }
        tracing::trace!(window = %self.window(), "m209 stepped");
    }

    fn transform(&self, symbol: usize, _direction: Direction) -> usize {
        let n = self.alphabet_len;
        (n - 1 + n - symbol + self.displacement()) % n
    }

    /// Pins are read at the key setting, so the wheels move after the letter
    fn process(&mut self, symbol: usize, direction: Direction) -> usize {
        let out = self.transform(symbol, direction);
        self.advance();
        out
    }
}
