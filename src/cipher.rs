use crate::error::Result;

/// Which way a text goes through a machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Encode,
    Decode,
}

impl std::str::FromStr for Direction {
    type Err = crate::error::RotorError;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "encode" | "encipher" | "e" => Ok(Self::Encode),
            "decode" | "decipher" | "d" => Ok(Self::Decode),
            _ => Err(crate::error::RotorError::InvalidInput(format!(
                "direction: {}",
                s
            ))),
        }
    }
}

/// Uniform contract shared by the rotor machines and the classical ciphers
///
/// Implementors are validated, immutable key schedules; every call builds
/// its own working state, so one value can serve many threads.
pub trait Cipher: Send + Sync {
    /// Short machine or cipher name
    fn name(&self) -> &'static str;

    fn encode(&self, text: &str) -> Result<String>;

    fn decode(&self, text: &str) -> Result<String>;

    /// One-line human summary of the key schedule
    fn describe(&self) -> String {
        self.name().to_string()
    }

    fn apply(&self, text: &str, direction: Direction) -> Result<String> {
        match direction {
            Direction::Encode => self.encode(text),
            Direction::Decode => self.decode(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_parse() {
        assert_eq!("encode".parse::<Direction>().unwrap(), Direction::Encode);
        assert_eq!("D".parse::<Direction>().unwrap(), Direction::Decode);
        assert!("sideways".parse::<Direction>().is_err());
    }
}
