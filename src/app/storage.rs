//! Download directory layout
//!
//! Everything of a show lands in one flat directory, by default
//! `<home>/Music/Podcast/<ShowName>`. The directory is created once before
//! any task starts; tasks only build paths inside it.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::constants::files;
use crate::errors::{StorageError, StorageResult};

/// Default download directory for a show below the user's home
pub fn default_download_dir(show_name: &str) -> StorageResult<PathBuf> {
    let home = dirs::home_dir().ok_or(StorageError::HomeDirNotFound)?;
    Ok(home
        .join(files::MUSIC_DIR)
        .join(files::PODCAST_DIR)
        .join(show_name))
}

/// An existing directory that receives episodes and the cover
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadDirectory {
    root: PathBuf,
}

impl DownloadDirectory {
    /// Create the directory (and parents) if absent
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the directory cannot be created or the path
    /// exists but is not a directory
    pub async fn ensure(root: impl Into<PathBuf>) -> StorageResult<Self> {
        let root = root.into();

        match tokio::fs::metadata(&root).await {
            Ok(metadata) if metadata.is_dir() => {
                debug!("Using existing download directory {}", root.display());
            }
            Ok(_) => return Err(StorageError::NotADirectory { path: root }),
            Err(_) => {
                create_dir_all(&root)
                    .await
                    .map_err(|source| StorageError::CreateDirectory {
                        path: root.clone(),
                        source,
                    })?;
                info!("Created download directory {}", root.display());
            }
        }

        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of an episode file inside the directory
    pub fn episode_path(&self, file_name: &str) -> PathBuf {
        self.root.join(file_name)
    }

    /// Path of the show's cover image
    pub fn cover_path(&self) -> PathBuf {
        self.root.join(files::COVER_FILE_NAME)
    }
}

#[cfg(unix)]
async fn create_dir_all(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;

    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || {
        std::fs::DirBuilder::new()
            .recursive(true)
            .mode(files::DOWNLOAD_DIR_PERMISSIONS)
            .create(path)
    })
    .await
    .map_err(std::io::Error::other)?
}

#[cfg(not(unix))]
async fn create_dir_all(path: &Path) -> std::io::Result<()> {
    tokio::fs::create_dir_all(path).await
}
