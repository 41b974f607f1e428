use anyhow::{Context, Result, bail};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Largest accepted input, in bytes.
pub const MAX_INPUT_SIZE: usize = 1024 * 1024;

/// Reads the text to translate from `file`, or from stdin when `None`.
pub fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => {
            let handle =
                File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
            read_limited(handle).with_context(|| format!("Failed to read {}", path.display()))
        }
        None => read_limited(io::stdin().lock()).context("Failed to read stdin"),
    }
}

/// Reads at most [`MAX_INPUT_SIZE`] bytes of UTF-8 from `reader`.
pub fn read_limited(reader: impl Read) -> Result<String> {
    let mut buffer = Vec::new();
    // one extra byte tells an exact-size input apart from an oversized one
    reader
        .take(MAX_INPUT_SIZE as u64 + 1)
        .read_to_end(&mut buffer)?;

    if buffer.len() > MAX_INPUT_SIZE {
        bail!(
            "Input exceeds the maximum size of 1 MB.\n\n\
             Split the text into smaller parts and translate them separately."
        );
    }

    String::from_utf8(buffer).context("Input is not valid UTF-8")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_file_unicode() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "こんにちは世界\n二行目").unwrap();

        let text = read_input(Some(file.path())).unwrap();
        assert_eq!(text, "こんにちは世界\n二行目");
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_input(Some(Path::new("/nonexistent/ltr/input.txt"))).unwrap_err();
        assert!(err.to_string().contains("Failed to open"));
    }

    #[test]
    fn test_read_exactly_max_size() {
        let text = read_limited(Cursor::new("x".repeat(MAX_INPUT_SIZE))).unwrap();
        assert_eq!(text.len(), MAX_INPUT_SIZE);
    }

    #[test]
    fn test_read_over_max_size() {
        let err = read_limited(Cursor::new("x".repeat(MAX_INPUT_SIZE + 1))).unwrap_err();
        assert!(err.to_string().contains("maximum size"));
    }

    #[test]
    fn test_read_invalid_utf8() {
        let err = read_limited(Cursor::new(vec![0xff, 0xfe, 0x00])).unwrap_err();
        assert!(err.to_string().contains("UTF-8"));
    }

    #[test]
    fn test_read_empty() {
        assert!(read_limited(io::empty()).unwrap().is_empty());
    }
}
