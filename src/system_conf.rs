// Reader for the client's line-oriented system.conf
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::warn;

/// Key prefix of the network identifier line
pub const ID_KEY: &str = "ad.anynet.id=";

/// File name of the client's configuration inside its config directory
pub const SYSTEM_CONF: &str = "system.conf";

/// Find the first line starting with `ad.anynet.id=`, trailing whitespace stripped.
///
/// Unreadable files are logged and treated the same as a missing line.
pub fn find_id_line(path: &Path) -> Option<String> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            warn!("Error reading file {}: {}", path.display(), e);
            return None;
        }
    };

    // Raw bytes: the client may write non-UTF-8 values on other lines
    for line in BufReader::new(file).split(b'\n') {
        match line {
            Ok(line) if line.starts_with(ID_KEY.as_bytes()) => {
                return Some(String::from_utf8_lossy(&line).trim_end().to_string())
            }
            Ok(_) => {}
            Err(e) => {
                warn!("Error reading file {}: {}", path.display(), e);
                return None;
            }
        }
    }

    None
}

/// Identifier value of the `ad.anynet.id=` line, up to any further `=`. May be empty.
pub fn read_identifier(path: &Path) -> Option<String> {
    find_id_line(path).and_then(|line| {
        line[ID_KEY.len()..]
            .split('=')
            .next()
            .map(str::to_string)
    })
}

/// Whole file content, used when showing a profile's configuration
pub fn read_content(path: &Path) -> Option<String> {
    fs::read(path)
        .inspect_err(|e| warn!("Error reading file {}: {}", path.display(), e))
        .ok()
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_conf(dir: &TempDir, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(SYSTEM_CONF);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_finds_first_id_line() {
        let dir = TempDir::new().unwrap();
        let path = write_conf(
            &dir,
            "ad.security.interactive_access=2\nad.anynet.id=123456789  \nad.anynet.id=999\n",
        );

        assert_eq!(find_id_line(&path).as_deref(), Some("ad.anynet.id=123456789"));
        assert_eq!(read_identifier(&path).as_deref(), Some("123456789"));
    }

    #[test]
    fn test_indented_key_is_not_matched() {
        let dir = TempDir::new().unwrap();
        let path = write_conf(&dir, "  ad.anynet.id=123\n");
        assert_eq!(find_id_line(&path), None);
    }

    #[test]
    fn test_empty_value() {
        let dir = TempDir::new().unwrap();
        let path = write_conf(&dir, "ad.anynet.id=\n");
        assert_eq!(read_identifier(&path).as_deref(), Some(""));
    }

    #[test]
    fn test_non_utf8_line_before_id() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(SYSTEM_CONF);
        fs::write(&path, b"ad.ui.name=Caf\xe9\r\nad.anynet.id=123456789\r\n").unwrap();

        assert_eq!(read_identifier(&path).as_deref(), Some("123456789"));
        assert!(read_content(&path).unwrap().contains("Caf\u{fffd}"));
    }

    #[test]
    fn test_value_stops_at_next_equals() {
        let dir = TempDir::new().unwrap();
        let path = write_conf(&dir, "ad.anynet.id=123=4\n");
        assert_eq!(find_id_line(&path).as_deref(), Some("ad.anynet.id=123=4"));
        assert_eq!(read_identifier(&path).as_deref(), Some("123"));
    }

    #[test]
    fn test_missing_file_is_absence() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope.conf");
        assert_eq!(find_id_line(&path), None);
        assert_eq!(read_identifier(&path), None);
        assert_eq!(read_content(&path), None);
    }

    #[test]
    fn test_read_content() {
        let dir = TempDir::new().unwrap();
        let path = write_conf(&dir, "a=1\nad.anynet.id=42\n");
        assert_eq!(read_content(&path).as_deref(), Some("a=1\nad.anynet.id=42\n"));
    }
}
