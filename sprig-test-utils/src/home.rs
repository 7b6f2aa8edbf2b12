//! HOME directory isolation for testing

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::MutexGuard;

use tempfile::TempDir;

use crate::env::env_lock;

/// Overrides HOME with a temporary directory for the guard's lifetime
pub struct HomeEnvTestGuard {
  pub temp_dir: TempDir,
  original_home: Option<OsString>,
  _lock: MutexGuard<'static, ()>,
}

impl HomeEnvTestGuard {
  pub fn new() -> Self {
    let lock = env_lock();
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");
    let original_home = env::var_os("HOME");

    unsafe {
      env::set_var("HOME", temp_dir.path());
    }

    Self {
      temp_dir,
      original_home,
      _lock: lock,
    }
  }

  pub fn home_dir(&self) -> &Path {
    self.temp_dir.path()
  }

  /// Path of a file relative to the temporary HOME
  pub fn home_path(&self, relative_path: &str) -> PathBuf {
    self.temp_dir.path().join(relative_path)
  }
}

impl Default for HomeEnvTestGuard {
  fn default() -> Self {
    Self::new()
  }
}

impl Drop for HomeEnvTestGuard {
  fn drop(&mut self) {
    match &self.original_home {
      Some(home) => unsafe { env::set_var("HOME", home) },
      None => unsafe { env::remove_var("HOME") },
    }
  }
}
