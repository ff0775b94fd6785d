//! Binary file I/O for the benchmarking harness. Thin wrappers over
//! `std::fs` -- there is no format-specific logic here, just a single
//! place the CLI and the bench runner both go through.

use std::path::Path;

/// Read an entire file into memory.
pub fn read_file<P: AsRef<Path>>(path: P) -> std::io::Result<Vec<u8>> {
    std::fs::read(path)
}

/// Write `data` to `path`, creating or truncating it.
pub fn write_file<P: AsRef<Path>>(path: P, data: &[u8]) -> std::io::Result<()> {
    std::fs::write(path, data)
}

/// Size of a file on disk, in bytes.
pub fn file_size<P: AsRef<Path>>(path: P) -> std::io::Result<u64> {
    Ok(std::fs::metadata(path)?.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_a_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.bin");
        write_file(&path, b"hello harness").unwrap();
        assert_eq!(read_file(&path).unwrap(), b"hello harness");
        assert_eq!(file_size(&path).unwrap(), 13);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(read_file("/nonexistent/path/does/not/exist").is_err());
    }
}
