//! Key files
//!
//! A key file is a JSON object whose `machine` field selects the cipher;
//! the remaining fields are that cipher's raw key material:
//!
//! ```json
//! { "machine": "enigma", "rotors": ["I", "II", "III"], "reflector": "B",
//!   "positions": "AAA", "rings": "AAA", "plugs": ["AV", "BS"] }
//! ```

use crate::cipher::Cipher;
use crate::classic::{Caesar, CaesarConfig, Columnar, ColumnarConfig, Keyword, KeywordConfig, Vigenere, VigenereConfig};
use crate::error::Result;
use crate::machine::{Enigma, EnigmaConfig, M209Config, Sigaba, SigabaConfig, M209};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;
use tracing::info;

/// Hex digits shown for a key fingerprint
const FINGERPRINT_LEN: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "machine", rename_all = "lowercase")]
pub enum KeyFile {
    Enigma(EnigmaConfig),
    Sigaba(SigabaConfig),
    M209(M209Config),
    Caesar(CaesarConfig),
    Vigenere(VigenereConfig),
    Keyword(KeywordConfig),
    Columnar(ColumnarConfig),
}

impl KeyFile {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let key = Self::from_json(&raw)?;
        info!(path = %path.display(), machine = key.machine_name(), "loaded key file");
        Ok(key)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn machine_name(&self) -> &'static str {
        match self {
            Self::Enigma(_) => "enigma",
            Self::Sigaba(_) => "sigaba",
            Self::M209(_) => "m209",
            Self::Caesar(_) => "caesar",
            Self::Vigenere(_) => "vigenere",
            Self::Keyword(_) => "keyword",
            Self::Columnar(_) => "columnar",
        }
    }

    /// Validate the key material into a ready cipher
    pub fn build(&self) -> Result<Box<dyn Cipher>> {
        Ok(match self {
            Self::Enigma(c) => Box::new(Enigma::new(c)?),
            Self::Sigaba(c) => Box::new(Sigaba::new(c)?),
            Self::M209(c) => Box::new(M209::new(c)?),
            Self::Caesar(c) => Box::new(Caesar::from_config(c)),
            Self::Vigenere(c) => Box::new(Vigenere::from_config(c)?),
            Self::Keyword(c) => Box::new(Keyword::from_config(c)?),
            Self::Columnar(c) => Box::new(Columnar::from_config(c)?),
        })
    }

    /// Short SHA-256 digest of the canonical JSON form
    ///
    /// Two stations holding the same key see the same fingerprint without
    /// reading the key aloud.
    pub fn fingerprint(&self) -> Result<String> {
        let canonical = serde_json::to_vec(self)?;
        let digest = Sha256::digest(&canonical);
        let mut hex = hex::encode(digest);
        hex.truncate(FINGERPRINT_LEN);
        Ok(hex)
    }
}
