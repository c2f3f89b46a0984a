//! Run settings, read from a JSON file and overridden from the command line.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::render::{DEFAULT_HEIGHT, DEFAULT_WIDTH};

/// Which files to convert and how.
/// Missing keys take their default, so `{}` is a valid config.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// base names, `<base>.txt` is read and `<base>.png` written
    pub inputs: Vec<String>,
    pub width: u32,
    pub height: u32,
    /// convert the inputs on a thread pool instead of one after another
    pub parallel: bool,
}

pub fn default_inputs() -> Vec<String> {
    vec!["output1".to_string(), "output2".to_string(), "output3".to_string()]
}

impl Default for Config {
    fn default() -> Self {
        Config { inputs: default_inputs(), width: DEFAULT_WIDTH, height: DEFAULT_HEIGHT, parallel: false }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::Open { path: path.to_path_buf(), source })?;
        serde_json::from_str(&text).map_err(|source| Error::Config { path: path.to_path_buf(), source })
    }

    /// Applies command line values on top of the file. Empty `inputs` and `None`
    /// sizes keep what the file says, `parallel` can only be switched on.
    pub fn with_overrides(mut self, inputs: Vec<String>, width: Option<u32>, height: Option<u32>, parallel: bool) -> Self {
        if !inputs.is_empty() {
            self.inputs = inputs;
        }
        if let Some(width) = width {
            self.width = width;
        }
        if let Some(height) = height {
            self.height = height;
        }
        self.parallel |= parallel;
        return self;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn config_file(text: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(text.as_bytes()).unwrap();
        f
    }

    #[test]
    fn defaults() {
        let c = Config::default();
        assert_eq!(c.inputs, vec!["output1", "output2", "output3"]);
        assert_eq!((c.width, c.height), (640, 480));
        assert!(!c.parallel);
    }

    #[test]
    fn empty_object_is_default() {
        let f = config_file("{}");
        assert_eq!(Config::load(f.path()).unwrap(), Config::default());
    }

    #[test]
    fn partial_config() {
        let f = config_file(r#"{"inputs": ["a", "b"], "parallel": true}"#);
        let c = Config::load(f.path()).unwrap();
        assert_eq!(c.inputs, vec!["a", "b"]);
        assert!(c.parallel);
        assert_eq!(c.width, DEFAULT_WIDTH);
    }

    #[test]
    fn command_line_wins() {
        let f = config_file(r#"{"inputs": ["a", "b"], "width": 100, "height": 50}"#);
        let c = Config::load(f.path()).unwrap().with_overrides(vec!["c".to_string()], Some(800), None, true);
        assert_eq!(c.inputs, vec!["c"]);
        assert_eq!((c.width, c.height), (800, 50));
        assert!(c.parallel);

        let f = config_file(r#"{"inputs": ["a"], "parallel": true}"#);
        let c = Config::load(f.path()).unwrap().with_overrides(vec![], None, None, false);
        assert_eq!(c.inputs, vec!["a"]);
        assert_eq!((c.width, c.height), (DEFAULT_WIDTH, DEFAULT_HEIGHT));
        assert!(c.parallel);
    }

    #[test]
    fn broken_config() {
        let f = config_file(r#"{"width": "wide"}"#);
        assert!(matches!(Config::load(f.path()), Err(Error::Config { .. })));
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(Config::load(&dir.path().join("none.json")), Err(Error::Open { .. })));
    }
}
