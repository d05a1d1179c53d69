//! Loading and saving SQL script files.
use crate::*;
use std::path::{Path, PathBuf};

const SCRIPT_EXTENSION: &str = "sql";

/// A script buffer together with the file it came from, if any.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Script {
    pub path: Option<PathBuf>,
    pub text: String,
}

impl Script {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            path: None,
            text: text.into(),
        }
    }

    /// Read the whole file as UTF-8 text.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        debug!("Loaded script {} ({} bytes)", path.display(), text.len());
        Ok(Self {
            path: Some(path.to_path_buf()),
            text,
        })
    }

    /// Read a script from standard input until EOF.
    pub fn from_stdin() -> Result<Self> {
        let text = std::io::read_to_string(std::io::stdin())?;
        Ok(Self::new(text))
    }

    /// Write `text` to `path`, appending `.sql` unless the path already
    /// carries that extension. Returns the path actually written.
    pub fn save(path: impl AsRef<Path>, text: &str) -> Result<PathBuf> {
        let path = with_script_extension(path.as_ref());
        std::fs::write(&path, text)?;
        debug!("Saved script {} ({} bytes)", path.display(), text.len());
        Ok(path)
    }

    pub fn statements(&self) -> Vec<Statement> {
        extract(&self.text)
    }
}

fn with_script_extension(path: &Path) -> PathBuf {
    match path.extension() {
        Some(ext) if ext.eq_ignore_ascii_case(SCRIPT_EXTENSION) => path.to_path_buf(),
        _ => {
            let mut name = path.as_os_str().to_owned();
            name.push(".");
            name.push(SCRIPT_EXTENSION);
            PathBuf::from(name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("init.sql", "init.sql")]
    #[case("init.SQL", "init.SQL")]
    #[case("init", "init.sql")]
    #[case("init.txt", "init.txt.sql")]
    #[case("dir/backup.2024", "dir/backup.2024.sql")]
    fn enforces_extension(#[case] given: &str, #[case] expected: &str) {
        assert_eq!(with_script_extension(Path::new(given)), PathBuf::from(expected));
    }

    #[test]
    fn save_then_load() -> Result {
        let dir = tempfile::tempdir()?;
        let written = Script::save(dir.path().join("seed"), "SELECT 1;\nSELECT 2;")?;
        assert_eq!(written, dir.path().join("seed.sql"));

        let script = Script::load(&written)?;
        assert_eq!(script.path.as_deref(), Some(written.as_path()));
        assert_eq!(script.statements(), ["SELECT 1", "SELECT 2"]);
        Ok(())
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = Script::load("/definitely/not/here.sql");
        assert!(matches!(result, Err(Error::Io(_))), "got {result:?}");
    }
}
