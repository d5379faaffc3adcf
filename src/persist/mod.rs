//! All-or-nothing persistence of instantiation artifacts.
//!
//! Every artifact is serialized up front ([`render`]), staged to a temporary file in
//! its destination directory, and only then renamed into place ([`write_artifacts`]).
//! Artifacts are committed in order and the finalized instance comes last, so the
//! instance file only appears once every secret it references is in place. If a
//! rename fails, the artifacts already renamed by the same call are removed.

use crate::codec;
use crate::core::{MeshError, Result};
use crate::instantiate::Instantiation;
use futures::future::try_join_all;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// Where the artifacts of an instantiation go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactLayout {
    dir: PathBuf,
}

impl ArtifactLayout {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
        }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `<dir>/<instance>.yaml`
    #[must_use]
    pub fn instance_path(&self, instance_name: &str) -> PathBuf {
        self.dir.join(format!("{instance_name}.yaml"))
    }

    /// `<dir>/<secret>.yaml`
    #[must_use]
    pub fn secret_path(&self, secret_name: &str) -> PathBuf {
        self.dir.join(format!("{secret_name}.yaml"))
    }
}

/// One serialized document and its destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: PathBuf,
    pub contents: String,
}

/// Serialize the secrets and the instance, in commit order: secrets first, instance last.
///
/// # Errors
///
/// Returns [`MeshError::SerializeFailed`] if any document fails to serialize.
pub fn render(instantiation: &Instantiation, layout: &ArtifactLayout) -> Result<Vec<Artifact>> {
    let mut artifacts = Vec::with_capacity(1 + instantiation.secrets.len());
    for secret in &instantiation.secrets {
        artifacts.push(Artifact {
            path: layout.secret_path(secret.name()),
            contents: codec::serialize_secret(secret)?,
        });
    }
    artifacts.push(Artifact {
        path: layout.instance_path(instantiation.instance.name()),
        contents: codec::serialize_instance(&instantiation.instance)?,
    });
    Ok(artifacts)
}

/// Write every artifact or none of them. Returns the written paths in commit order.
///
/// Artifacts are renamed into place in the order given; [`render`] puts the instance last.
///
/// # Errors
///
/// Returns [`MeshError::PersistFailed`] naming the path that could not be written.
pub async fn write_artifacts(artifacts: Vec<Artifact>) -> Result<Vec<PathBuf>> {
    if artifacts.is_empty() {
        return Ok(Vec::new());
    }

    let tasks = artifacts.into_iter().map(|artifact| {
        tokio::task::spawn_blocking(move || {
            let file = stage(&artifact.path, &artifact.contents)?;
            Ok::<_, MeshError>((artifact.path, file))
        })
    });
    let staged = try_join_all(tasks)
        .await
        .map_err(|e| MeshError::Other {
            message: format!("artifact staging task failed: {e}"),
        })?
        .into_iter()
        .collect::<Result<Vec<_>>>()?;

    let mut committed: Vec<PathBuf> = Vec::with_capacity(staged.len());
    for (path, file) in staged {
        if let Err(e) = file.persist(&path) {
            rollback(&committed);
            return Err(MeshError::PersistFailed {
                path: path.display().to_string(),
                reason: e.error.to_string(),
            });
        }
        info!("Wrote {}", path.display());
        committed.push(path);
    }

    Ok(committed)
}

fn stage(path: &Path, contents: &str) -> Result<NamedTempFile> {
    let failed = |reason: String| MeshError::PersistFailed {
        path: path.display().to_string(),
        reason,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)
        .map_err(|e| failed(format!("cannot create {}: {e}", dir.display())))?;

    let mut file = NamedTempFile::new_in(dir).map_err(|e| failed(e.to_string()))?;
    file.write_all(contents.as_bytes()).map_err(|e| failed(e.to_string()))?;
    file.as_file().sync_all().map_err(|e| failed(e.to_string()))?;
    debug!("Staged {} at {}", path.display(), file.path().display());
    Ok(file)
}

fn rollback(committed: &[PathBuf]) {
    for path in committed {
        match std::fs::remove_file(path) {
            Ok(()) => debug!("Rolled back {}", path.display()),
            Err(e) => warn!("Failed to roll back {}: {}", path.display(), e),
        }
    }
}
