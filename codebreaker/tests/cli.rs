use rotorkit::classic::{Caesar, Vigenere};
use rotorkit::{Alphabet, Cipher};
use std::error::Error;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::tempdir;

const PLAIN: &str = "It was late in the autumn when the signal station on the northern ridge \
    received the first of the new rotor machines. The operators had trained for weeks on \
    paper tables and hand ciphers, and most of them believed the machine would be slower \
    than a skilled clerk with a pencil. Within a month they had changed their minds. \
    Messages that once took an hour to prepare were ready in minutes, and the officers at \
    the headquarters stopped complaining about delays. Still, the senior sergeant insisted \
    that every operator keep practicing the old methods, because a machine can be lost or \
    broken, while a trained mind travels with the soldier wherever he goes.";

fn codebreaker_cmd() -> Command {
    Command::new(env!("CARGO_BIN_EXE_codebreaker"))
}

fn run(args: &[&str]) -> Result<Output, Box<dyn Error>> {
    Ok(codebreaker_cmd().args(args).output()?)
}

fn path_arg(path: &Path) -> Result<&str, Box<dyn Error>> {
    Ok(path.to_str().ok_or("non-utf8 path")?)
}

#[test]
fn stats_command_reports_letter_statistics() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let input = dir.path().join("plain.txt");
    fs::write(&input, PLAIN)?;

    let output = run(&["stats", path_arg(&input)?])?;
    assert!(
        output.status.success(),
        "stats failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("Codebreaker Letter Analysis"));
    assert!(stdout.contains("Index of Coincidence"));
    assert!(stdout.contains("Chi-squared vs English"));
    Ok(())
}

#[test]
fn caesar_command_finds_shift() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let input = dir.path().join("cipher.txt");
    fs::write(&input, Caesar::new(11, Alphabet::latin()).encode(PLAIN)?)?;

    let output = run(&["caesar", path_arg(&input)?, "--top", "2"])?;
    assert!(
        output.status.success(),
        "caesar failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("Best shift: 11"), "{}", stdout);
    assert!(stdout.contains("ITWASLATEINTHEAUTUMN"));
    Ok(())
}

#[test]
fn period_command_recovers_vigenere_key() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let input = dir.path().join("cipher.txt");
    let ciphertext = Vigenere::new("LEMON", Alphabet::latin())?.encode(PLAIN)?;
    fs::write(&input, ciphertext)?;

    let output = run(&["period", path_arg(&input)?])?;
    assert!(
        output.status.success(),
        "period failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("Likely period: 5"), "{}", stdout);
    assert!(stdout.contains("Likely key: LEMON"), "{}", stdout);
    assert!(stdout.contains("Preview: ITWASLATEINTHEAUTUMN"));
    Ok(())
}

#[test]
fn missing_file_fails() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let output = run(&["stats", path_arg(&dir.path().join("absent.txt"))?])?;
    assert!(!output.status.success());
    assert!(!output.stderr.is_empty());
    Ok(())
}
