//! Rotorkit - electromechanical rotor machine simulators
//!
//! Bit-faithful models of three historical cipher machines, plus a few
//! classical hand ciphers, all behind one [`Cipher`] contract:
//!
//! - **Enigma I**: three rotors with double-stepping, reflector, plugboard
//! - **SIGABA (ECM Mark II)**: cipher bank stepped irregularly by a control
//!   bank through an index bank
//! - **M-209**: six pin wheels and a 27-bar lug cage driving a Beaufort step
//!
//! ## Machine lifecycle
//!
//! ```text
//! key file (JSON) → *Config → validated key schedule → fresh state per message
//! ```
//!
//! A key schedule is immutable once built. Every `encode`/`decode` call
//! starts from the configured positions, so one schedule can be shared by
//! many threads.
//!
//! ## Example
//!
//! ```
//! use rotorkit::{Cipher, Enigma};
//! use rotorkit::machine::EnigmaConfig;
//!
//! let enigma = Enigma::new(&EnigmaConfig::default()).unwrap();
//! let ciphertext = enigma.encode("AAAAA").unwrap();
//! assert_eq!(ciphertext, "BDZGO");
//! assert_eq!(enigma.decode(&ciphertext).unwrap(), "AAAAA");
//! ```

pub mod alphabet;
pub mod cipher;
pub mod classic;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod machine;
pub mod plugboard;
pub mod rotor;
pub mod text;

pub use alphabet::{Alphabet, Permutation};
pub use cipher::{Cipher, Direction};
pub use config::KeyFile;
pub use error::{Result, RotorError};
pub use machine::{Enigma, Sigaba, M209};
