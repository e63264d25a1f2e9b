//! The signed-in session, persisted as a small TOML file.

use std::{
  io,
  path::{Path, PathBuf},
};

use anyhow::Context as _;
use faculty_core::session::Session;
use tracing::debug;

pub struct SessionStore {
  path: PathBuf,
}

impl SessionStore {
  pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }

  pub fn path(&self) -> &Path { &self.path }

  /// The stored session, or `None` when nobody is signed in.
  pub fn load(&self) -> anyhow::Result<Option<Session>> {
    let raw = match std::fs::read_to_string(&self.path) {
      Ok(raw) => raw,
      Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
      Err(e) => {
        return Err(e).with_context(|| format!("reading {}", self.path.display()));
      }
    };
    let session = toml::from_str(&raw)
      .with_context(|| format!("parsing session file {}", self.path.display()))?;
    Ok(Some(session))
  }

  pub fn save(&self, session: &Session) -> anyhow::Result<()> {
    if let Some(parent) = self.path.parent() {
      std::fs::create_dir_all(parent)
        .with_context(|| format!("creating {}", parent.display()))?;
    }
    let raw = toml::to_string(session).context("serialising session")?;
    std::fs::write(&self.path, raw)
      .with_context(|| format!("writing {}", self.path.display()))?;
    restrict_permissions(&self.path)?;
    debug!(path = %self.path.display(), "session saved");
    Ok(())
  }

  /// Delete the stored session. Returns whether one existed.
  pub fn clear(&self) -> anyhow::Result<bool> {
    match std::fs::remove_file(&self.path) {
      Ok(()) => Ok(true),
      Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
      Err(e) => Err(e).with_context(|| format!("removing {}", self.path.display())),
    }
  }
}

// The file holds a bearer token.
#[cfg(unix)]
fn restrict_permissions(path: &Path) -> anyhow::Result<()> {
  use std::os::unix::fs::PermissionsExt;
  std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
    .with_context(|| format!("restricting permissions on {}", path.display()))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> anyhow::Result<()> { Ok(()) }
