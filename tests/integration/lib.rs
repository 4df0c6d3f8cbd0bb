//! Fixtures shared by the integration tests.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use secretagent_core::config::{Config, ConfigBuilder};
use tempfile::TempDir;

/// Locate the compiled `secretagent` binary in the workspace target directory.
///
/// Cargo sets `CARGO_MANIFEST_DIR` to this package's manifest directory; the
/// workspace root is two levels up. `CARGO_TARGET_DIR` is honoured when set.
pub fn secretagent_bin() -> PathBuf {
    let target_dir = match std::env::var_os("CARGO_TARGET_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
            manifest_dir
                .parent()
                .and_then(Path::parent)
                .expect("workspace root")
                .join("target")
        }
    };
    let bin = target_dir
        .join("debug")
        .join(format!("secretagent{}", std::env::consts::EXE_SUFFIX));
    assert!(
        bin.exists(),
        "secretagent binary not found at {}; run `cargo build -p secretagent-cli` first",
        bin.display()
    );
    bin
}

/// A throwaway vault: a temp directory holding a config file and the
/// file-backed storage it points at.
pub struct TestVault {
    pub dir: TempDir,
    pub config_path: PathBuf,
}

impl TestVault {
    /// Vault using the offline generator.
    pub fn new() -> Self {
        Self::with_config(|builder| builder)
    }

    /// Vault whose config is adjusted by `f` before being written.
    pub fn with_config(f: impl FnOnce(ConfigBuilder) -> ConfigBuilder) -> Self {
        let dir = TempDir::new().expect("temp dir");
        let config_path = dir.path().join("secretagent.json5");
        let config = f(ConfigBuilder::new().storage_dir(dir.path().join("storage"))).build();
        config.save(&config_path).expect("write config");
        Self { dir, config_path }
    }

    pub fn config(&self) -> Config {
        Config::load(&self.config_path).expect("load config")
    }

    pub fn storage_dir(&self) -> PathBuf {
        self.dir.path().join("storage")
    }

    /// `secretagent` command pointed at this vault's config.
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(secretagent_bin());
        cmd.arg("--config")
            .arg(&self.config_path)
            .env_remove("SECRETAGENT_CONFIG")
            .env_remove("RUST_LOG");
        cmd
    }

    /// Run `secretagent` with `args` against this vault.
    pub fn run(&self, args: &[&str]) -> Output {
        self.command()
            .args(args)
            .output()
            .expect("failed to run secretagent")
    }
}

impl Default for TestVault {
    fn default() -> Self {
        Self::new()
    }
}

/// Stdout of `output` as a string.
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Stderr of `output` as a string.
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
