use crate::cipher::Direction;
use crate::config::KeyFile;
use crate::error::Result;
use std::path::{Path, PathBuf};
use tracing::info;

/// Options for the encode and decode commands
#[derive(Debug, Clone)]
pub struct TransformOptions {
    pub key: PathBuf,
    pub direction: Direction,
}

/// Where the text comes from
#[derive(Debug, Clone)]
pub enum TextSource {
    Inline(String),
    File(PathBuf),
}

impl TextSource {
    pub fn read(&self) -> Result<String> {
        match self {
            Self::Inline(text) => Ok(text.clone()),
            Self::File(path) => Ok(std::fs::read_to_string(path)?),
        }
    }
}

/// Run text through the cipher named by the key file
pub fn transform_text(source: &TextSource, options: &TransformOptions) -> Result<String> {
    let key = KeyFile::load(&options.key)?;
    let cipher = key.build()?;
    let text = source.read()?;
    let output = cipher.apply(&text, options.direction)?;
    info!(
        machine = cipher.name(),
        direction = ?options.direction,
        symbols = output.chars().count(),
        "transformed"
    );
    Ok(output)
}

/// Like [`transform_text`], writing the result to `output_path`
///
/// Returns the number of symbols written. A message with no symbols
/// leaves an empty file.
pub fn transform_to_file(
    source: &TextSource,
    output_path: &Path,
    options: &TransformOptions,
) -> Result<usize> {
    let output = transform_text(source, options)?;
    if output.is_empty() {
        std::fs::write(output_path, "")?;
        return Ok(0);
    }
    std::fs::write(output_path, format!("{}\n", output))?;
    Ok(output.chars().count())
}
