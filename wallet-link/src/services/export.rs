//! # Artifact Export
//!
//! Turns generated key material into a downloadable artifact and delivers it.
//! [`FileExporter`] is the desktop/CLI delivery mechanism: it writes the artifact
//! into a directory readable only by the current user.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tracing::info;
use zeroize::Zeroizing;

use crate::core::address::GeneratedAccount;
use crate::core::error::LinkError;
use crate::core::service::{ArtifactExporter, ExportArtifact};

/// Content type of private key exports
pub const PRIVATE_KEY_CONTENT_TYPE: &str = "text/csv";

/// Build the private key artifact for `account`: `pk_<address>.csv` holding the hex key.
pub fn private_key_artifact(account: &GeneratedAccount) -> ExportArtifact {
    let key_hex = account.private_key_hex();
    ExportArtifact {
        filename: format!("pk_{}.csv", account.address().to_checksum()),
        content_type: PRIVATE_KEY_CONTENT_TYPE,
        bytes: Zeroizing::new(key_hex.as_bytes().to_vec()),
    }
}

/// Delivers artifacts as files in a directory
pub struct FileExporter {
    dir: PathBuf,
}

impl FileExporter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Reject names that would escape the export directory.
fn check_filename(filename: &str) -> Result<(), LinkError> {
    if filename.is_empty()
        || filename == "."
        || filename == ".."
        || filename.contains(['/', '\\'])
        || filename.contains('\0')
    {
        return Err(LinkError::Export(format!("Unsafe artifact filename '{}'", filename)));
    }
    Ok(())
}

#[async_trait]
impl ArtifactExporter for FileExporter {
    async fn deliver(&self, artifact: &ExportArtifact) -> Result<String, LinkError> {
        check_filename(&artifact.filename)?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| LinkError::Export(format!("Failed to create {}: {}", self.dir.display(), e)))?;

        let path = self.dir.join(&artifact.filename);

        let mut options = tokio::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(0o600);

        let mut file = options
            .open(&path)
            .await
            .map_err(|e| LinkError::Export(format!("Failed to open {}: {}", path.display(), e)))?;

        file.write_all(&artifact.bytes)
            .await
            .map_err(|e| LinkError::Export(format!("Failed to write {}: {}", path.display(), e)))?;
        file.sync_all()
            .await
            .map_err(|e| LinkError::Export(format!("Failed to flush {}: {}", path.display(), e)))?;

        info!(
            path = %path.display(),
            content_type = artifact.content_type,
            "Artifact delivered"
        );
        Ok(path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::address::WalletAddress;

    fn sample_account() -> GeneratedAccount {
        GeneratedAccount::new(
            WalletAddress::parse("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").unwrap(),
            Zeroizing::new(vec![0x11; 32]),
        )
    }

    #[test]
    fn test_private_key_artifact_shape() {
        let artifact = private_key_artifact(&sample_account());
        assert_eq!(artifact.filename, "pk_0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed.csv");
        assert_eq!(artifact.content_type, "text/csv");
        assert_eq!(
            std::str::from_utf8(&artifact.bytes).unwrap(),
            format!("0x{}", "11".repeat(32))
        );
    }

    #[test]
    fn test_unsafe_filenames_rejected() {
        for name in ["", ".", "..", "../pk.csv", "a/b.csv", "a\\b.csv"] {
            assert!(check_filename(name).is_err(), "{:?}", name);
        }
        assert!(check_filename("pk_0xabc.csv").is_ok());
    }

    #[tokio::test]
    async fn test_file_exporter_writes_artifact() {
        let temp = tempfile::tempdir().unwrap();
        let exporter = FileExporter::new(temp.path().join("nested"));
        let artifact = private_key_artifact(&sample_account());

        let location = exporter.deliver(&artifact).await.unwrap();
        let written = std::fs::read(&location).unwrap();
        assert_eq!(written, artifact.bytes.as_slice());

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&location).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }
}
