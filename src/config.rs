//! Interpreter settings.
//!
//! Resolved lowest precedence first: built-in defaults, then the
//! `[interpreter]` section of `bf.toml` in the XDG config home, then
//! `BF_TAPE_SIZE` / `BF_MAX_STEPS` / `BF_TIMEOUT_MS`. Command-line flags are
//! applied on top by the binary.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use cross_xdg::BaseDirs;

use crate::tape::DEFAULT_TAPE_SIZE;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Number of cells on the tape.
    pub tape_size: usize,
    /// Abort after this many executed instructions.
    pub max_steps: Option<usize>,
    /// Abort after this much wall-clock time.
    pub timeout_ms: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tape_size: DEFAULT_TAPE_SIZE,
            max_steps: None,
            timeout_ms: None,
        }
    }
}

impl Config {
    /// Defaults, overlaid with the config file (if any) and the environment.
    pub fn load() -> Self {
        let mut cfg = Self::default();
        if let Some(content) = config_path().and_then(|p| fs::read_to_string(p).ok()) {
            cfg.apply_toml(&content);
        }
        cfg.apply_env(|key| std::env::var(key).ok());
        cfg
    }

    /// Overlay keys from the `[interpreter]` section of a TOML document.
    pub fn apply_toml(&mut self, content: &str) {
        // Very small hand-rolled parser: look for [interpreter] section and key = value pairs
        let mut in_section = false;
        let mut map: HashMap<String, String> = HashMap::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') { continue; }
            if line.starts_with('[') && line.ends_with(']') {
                in_section = &line[1..line.len()-1] == "interpreter";
                continue;
            }
            if !in_section { continue; }
            if let Some(eq) = line.find('=') {
                let key = line[..eq].trim().to_string();
                // Accept quoted or unquoted, and TOML's 30_000 digit separators
                let val = line[eq+1..].trim().trim_matches('"').replace('_', "");
                map.insert(key, val);
            }
        }

        self.apply(|key| map.get(key).cloned(), "config file");
    }

    /// Overlay `BF_*` variables as returned by `var`.
    pub fn apply_env<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| match key {
            "tape_size" => var("BF_TAPE_SIZE"),
            "max_steps" => var("BF_MAX_STEPS"),
            "timeout_ms" => var("BF_TIMEOUT_MS"),
            _ => None,
        };
        self.apply(lookup, "environment");
    }

    fn apply<F>(&mut self, lookup: F, origin: &str)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = parse_value::<usize>(&lookup, "tape_size", origin) {
            if v == 0 {
                tracing::warn!(origin, "ignoring tape_size = 0");
            } else {
                self.tape_size = v;
            }
        }
        if let Some(v) = parse_value::<usize>(&lookup, "max_steps", origin) {
            self.max_steps = Some(v);
        }
        if let Some(v) = parse_value::<u64>(&lookup, "timeout_ms", origin) {
            self.timeout_ms = Some(v);
        }
    }
}

fn parse_value<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    origin: &str,
) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(origin, key, value = %raw, "ignoring invalid setting");
            None
        }
    }
}

fn config_path() -> Option<PathBuf> {
    let base_dirs = BaseDirs::new().ok()?;

    // On Linux: resolves to /home/<user>/.config
    // On Windows: resolves to C:\Users\<user>\.config
    // On macOS: resolves to /Users/<user>/.config
    let config_home = base_dirs.config_home();

    let mut path = PathBuf::from(config_home);
    path.push("bf.toml");
    Some(path)
}
