//! Flat-file record of the last IP pushed to DNS.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use log::debug;

use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct IpCache {
    path: PathBuf,
}

impl IpCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Reads the cached IP. Any failure counts as "nothing cached" and yields
    /// an empty string, so the first run always syncs.
    pub fn read(&self) -> String {
        match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                debug!("No cached IP in {}: {}", self.path.display(), e);
                String::new()
            }
        }
    }

    /// Replaces the file contents with `ip`, creating it with mode 0644.
    pub fn write(&self, ip: &str) -> Result<()> {
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o644);
        }

        options
            .open(&self.path)
            .and_then(|mut file| file.write_all(ip.as_bytes()))
            .map_err(|e| {
                Error::Persistence(format!(
                    "failed to write {}: {}",
                    self.path.display(),
                    e
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_read_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let cache = IpCache::new(dir.path().join("absent"));
        assert_eq!(cache.read(), "");
    }

    #[test]
    fn test_read_directory_is_empty() {
        let dir = tempdir().unwrap();
        let cache = IpCache::new(dir.path());
        assert_eq!(cache.read(), "");
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempdir().unwrap();
        let cache = IpCache::new(dir.path().join("ip"));

        cache.write("203.0.113.9").unwrap();
        assert_eq!(cache.read(), "203.0.113.9");

        cache.write("10.0.0.1").unwrap();
        assert_eq!(cache.read(), "10.0.0.1");
    }

    #[test]
    fn test_write_has_no_trailing_newline() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ip");
        IpCache::new(&path).write("1.2.3.4").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"1.2.3.4");
    }

    #[cfg(unix)]
    #[test]
    fn test_write_creates_without_exec_bits() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("ip");
        IpCache::new(&path).write("1.2.3.4").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o111, 0);
        assert_eq!(mode & 0o600, 0o600);
    }

    #[test]
    fn test_write_into_missing_dir_fails() {
        let dir = tempdir().unwrap();
        let cache = IpCache::new(dir.path().join("no/such/dir/ip"));
        let err = cache.write("1.2.3.4").unwrap_err();
        assert!(matches!(err, Error::Persistence(_)));
    }
}
