use crate::config::KeyFile;
use crate::error::Result;
use std::path::Path;

/// Summarize a key file for the operator
pub fn show_info(path: &Path) -> Result<String> {
    let key = KeyFile::load(path)?;
    let cipher = key.build()?;

    let mut output = String::new();
    output.push_str("Rotorkit Key Information\n");
    output.push_str("========================\n\n");
    output.push_str(&format!("File: {}\n", path.display()));
    output.push_str(&format!("Machine: {}\n", key.machine_name()));
    output.push_str(&format!("Fingerprint: {}\n", key.fingerprint()?));
    output.push_str(&format!("Schedule: {}\n", cipher.describe()));
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::SigabaConfig;
    use tempfile::tempdir;

    #[test]
    fn test_show_info() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sigaba.json");
        let key = KeyFile::Sigaba(SigabaConfig::default());
        std::fs::write(&path, key.to_json().unwrap()).unwrap();

        let info = show_info(&path).unwrap();
        assert!(info.contains("Machine: sigaba"));
        assert!(info.contains(&format!("Fingerprint: {}", key.fingerprint().unwrap())));
        assert!(info.contains("Schedule: sigaba"));
    }

    #[test]
    fn test_show_info_rejects_invalid_key() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{ "machine": "vigenere", "key": "" }"#).unwrap();
        assert!(show_info(&path).is_err());
    }
}
