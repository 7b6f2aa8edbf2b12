//! Environment variable management for testing
//!
//! Mutating the process environment is only sound while no other thread reads
//! it, so every guard here serializes on one global lock.

use std::env;
use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tempfile::TempDir;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Take the process-wide environment lock.
///
/// A test that panicked while holding the lock does not poison it for the
/// rest of the suite.
pub fn env_lock() -> MutexGuard<'static, ()> {
  ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

fn restore(name: &str, original: Option<&OsString>) {
  match original {
    Some(value) => unsafe { env::set_var(name, value) },
    None => unsafe { env::remove_var(name) },
  }
}

/// Overrides a single environment variable and restores it on drop
pub struct EnvVarGuard {
  name: String,
  original: Option<OsString>,
  _lock: MutexGuard<'static, ()>,
}

impl EnvVarGuard {
  pub fn new(name: &str) -> Self {
    let lock = env_lock();
    Self {
      name: name.to_string(),
      original: env::var_os(name),
      _lock: lock,
    }
  }

  pub fn set(&self, value: &str) {
    unsafe {
      env::set_var(&self.name, value);
    }
  }

  pub fn remove(&self) {
    unsafe {
      env::remove_var(&self.name);
    }
  }
}

impl Drop for EnvVarGuard {
  fn drop(&mut self) {
    restore(&self.name, self.original.as_ref());
  }
}

/// Points the XDG base directories at a per-test temporary directory
pub struct XdgEnvGuard {
  pub temp_dir: TempDir,
  originals: Vec<(&'static str, Option<OsString>)>,
  _lock: MutexGuard<'static, ()>,
}

impl XdgEnvGuard {
  pub const XDG_CONFIG_HOME: &'static str = "XDG_CONFIG_HOME";
  pub const XDG_DATA_HOME: &'static str = "XDG_DATA_HOME";
  pub const XDG_CACHE_HOME: &'static str = "XDG_CACHE_HOME";

  pub fn new() -> Self {
    let lock = env_lock();
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");

    let mut originals = Vec::new();
    for (name, sub) in [
      (Self::XDG_CONFIG_HOME, "config"),
      (Self::XDG_DATA_HOME, "data"),
      (Self::XDG_CACHE_HOME, "cache"),
    ] {
      originals.push((name, env::var_os(name)));
      let dir = temp_dir.path().join(sub);
      std::fs::create_dir_all(&dir).expect("Failed to create XDG directory");
      unsafe {
        env::set_var(name, &dir);
      }
    }

    Self {
      temp_dir,
      originals,
      _lock: lock,
    }
  }

  pub fn config_home(&self) -> PathBuf {
    self.temp_dir.path().join("config")
  }

  pub fn data_home(&self) -> PathBuf {
    self.temp_dir.path().join("data")
  }
}

impl Default for XdgEnvGuard {
  fn default() -> Self {
    Self::new()
  }
}

impl Drop for XdgEnvGuard {
  fn drop(&mut self) {
    for (name, original) in &self.originals {
      restore(name, original.as_ref());
    }
  }
}
