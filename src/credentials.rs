use crate::auth::AuthError;
use crate::storage::write_atomic;
use oauth2::basic::BasicTokenResponse;
use std::path::{Path, PathBuf};
use tokio::fs;

/// JSON file holding the signed-in account's OAuth token.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn exists(&self) -> bool {
        fs::try_exists(&self.path).await.unwrap_or(false)
    }

    pub async fn load(&self) -> Result<Option<BasicTokenResponse>, AuthError> {
        match fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|err| AuthError::CorruptCredential(err.to_string())),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn save(&self, token: &BasicTokenResponse) -> Result<(), AuthError> {
        let payload = serde_json::to_vec_pretty(token)
            .map_err(|err| AuthError::CorruptCredential(err.to_string()))?;
        write_atomic(&self.path, &payload).await?;
        Ok(())
    }

    /// Removes the file. Returns whether there was one.
    pub async fn clear(&self) -> Result<bool, AuthError> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }
}
