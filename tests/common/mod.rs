//! Shared helpers for integration tests.

#![allow(dead_code)]

pub mod mocks;

use switchboard::utils::toml_config::SwitchboardConfig;
use switchboard::AgentRegistry;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// A sandbox with `a.txt`, `notes.md` and a `b/` directory holding `c.txt`.
pub fn sandbox() -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    fs::write(dir.path().join("a.txt"), "alpha\nbeta\ngamma\n").unwrap();
    fs::write(dir.path().join("notes.md"), "# Notes\n\nremember the milk\n").unwrap();
    fs::create_dir(dir.path().join("b")).unwrap();
    fs::write(dir.path().join("b").join("c.txt"), "nested").unwrap();
    dir
}

/// Default configuration rooted at `root`.
pub fn config_for(root: &Path) -> SwitchboardConfig {
    let mut config = SwitchboardConfig::default();
    config.sandbox.root = root.to_path_buf();
    config
}

/// Registry without a completion client, rooted at `root`.
pub fn registry_for(root: &Path) -> AgentRegistry {
    AgentRegistry::from_config(&config_for(root)).expect("registry should build")
}
