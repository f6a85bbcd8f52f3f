//! File I/O utilities for JSONL record files.
//!
//! - Reading text files with automatic .zst decompression
//! - Opening output files, compressed when the path ends in `.zst`
//! - Ensuring parent directories exist before file writes

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Read text file with automatic .zst decompression detection.
///
/// UTF-8 BOM is stripped if present.
///
/// # Example
///
/// ```rust,no_run
/// # use sequence_cli::io_utils::read_text_auto;
/// let content = read_text_auto("games.jsonl").unwrap();
/// let compressed = read_text_auto("games.jsonl.zst").unwrap();
/// ```
pub fn read_text_auto(path: &str) -> Result<String, String> {
    let mut content = if path.ends_with(".zst") {
        let comp = std::fs::read(path).map_err(|e| e.to_string())?;
        let dec = zstd::stream::decode_all(comp.as_slice()).map_err(|e| e.to_string())?;
        String::from_utf8(dec).map_err(|e| e.to_string())?
    } else {
        std::fs::read_to_string(path).map_err(|e| e.to_string())?
    };
    strip_utf8_bom(&mut content);
    Ok(content)
}

/// Ensure parent directory exists for given path, creating if needed.
pub fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create directory {}: {}", parent.display(), e))?;
    }
    Ok(())
}

/// Truncating, buffered writer for `path`. A `.zst` suffix selects zstd
/// compression; the frame is finished when the writer is dropped.
pub fn create_output(path: &Path) -> io::Result<Box<dyn Write>> {
    ensure_parent_dir(path).map_err(io::Error::other)?;
    let file = BufWriter::new(File::create(path)?);
    if path.extension().is_some_and(|ext| ext == "zst") {
        let encoder = zstd::stream::write::Encoder::new(file, 0)?;
        Ok(Box::new(encoder.auto_finish()))
    } else {
        Ok(Box::new(file))
    }
}

fn strip_utf8_bom(s: &mut String) {
    const UTF8_BOM: &str = "\u{feff}";
    if s.starts_with(UTF8_BOM) {
        s.drain(..UTF8_BOM.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_utf8_bom() {
        let mut s = "\u{feff}hello".to_string();
        strip_utf8_bom(&mut s);
        assert_eq!(s, "hello");
    }

    #[test]
    fn test_ensure_parent_dir_creates_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let nested_path = temp_dir.path().join("subdir").join("file.txt");
        assert!(ensure_parent_dir(&nested_path).is_ok());
        assert!(temp_dir.path().join("subdir").exists());
    }

    #[test]
    fn compressed_output_reads_back() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("out").join("games.jsonl.zst");
        {
            let mut w = create_output(&path).unwrap();
            writeln!(w, "{{\"a\":1}}").unwrap();
            w.flush().unwrap();
        }
        let text = read_text_auto(&path.to_string_lossy()).unwrap();
        assert_eq!(text, "{\"a\":1}\n");
    }

    #[test]
    fn plain_output_reads_back() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("games.jsonl");
        {
            let mut w = create_output(&path).unwrap();
            w.write_all(b"line\n").unwrap();
        }
        assert_eq!(read_text_auto(&path.to_string_lossy()).unwrap(), "line\n");
    }
}
