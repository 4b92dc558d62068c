//! Durable credential storage.
//!
//! The access token, refresh token, and last-known user profile live in
//! separate files under one store directory, mirroring the distinct
//! storage keys the web client used. `clear()` removes them together and
//! is idempotent. No network access happens here.

use std::fs;
use std::path::PathBuf;

use directories::ProjectDirs;

use tally_core::error::{Error, StorageError};
use tally_core::model::User;
use tally_core::traits::TokenProvider;
use tally_core::types::{AccessToken, Credential, RefreshToken};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

const ACCESS_TOKEN_FILE: &str = "access_token";
const REFRESH_TOKEN_FILE: &str = "refresh_token";
const USER_FILE: &str = "user.json";

/// File-backed store for the credential pair and cached profile.
#[derive(Debug, Clone)]
pub struct TokenStore {
    dir: PathBuf,
}

impl TokenStore {
    /// Open the default store under the platform data directory.
    pub fn open_default() -> Result<Self, Error> {
        let dirs = ProjectDirs::from("", "", "tally").ok_or(StorageError::NoStorageDir)?;
        Self::open(dirs.data_dir().join("session"))
    }

    /// Open a store rooted at an explicit directory. Used by tests and
    /// embedders that manage their own paths.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, Error> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(StorageError::Io)?;
        Ok(Self { dir })
    }

    /// Persist a credential pair, replacing any previous one.
    pub fn save(&self, credential: &Credential) -> Result<(), Error> {
        self.write_key(ACCESS_TOKEN_FILE, credential.access_token.as_str())?;
        self.write_key(REFRESH_TOKEN_FILE, credential.refresh_token.as_str())?;
        Ok(())
    }

    /// The stored access token, if any.
    pub fn access_token(&self) -> Option<AccessToken> {
        self.read_key(ACCESS_TOKEN_FILE).map(AccessToken::new)
    }

    /// The stored refresh token, if any.
    pub fn refresh_token(&self) -> Option<RefreshToken> {
        self.read_key(REFRESH_TOKEN_FILE).map(RefreshToken::new)
    }

    /// Whether a non-expired access token is stored.
    pub fn has_valid_token(&self) -> bool {
        self.access_token().is_some_and(|t| !t.is_expired())
    }

    /// Cache the last-known user profile.
    pub fn save_user(&self, user: &User) -> Result<(), Error> {
        let json = serde_json::to_string_pretty(user).map_err(StorageError::Corrupt)?;
        self.write_key(USER_FILE, &json)
    }

    /// The cached profile, if one is stored and parses.
    pub fn user(&self) -> Option<User> {
        let json = self.read_key(USER_FILE)?;
        serde_json::from_str(&json).ok()
    }

    /// Remove every stored key. Safe to call repeatedly.
    pub fn clear(&self) -> Result<(), Error> {
        for name in [ACCESS_TOKEN_FILE, REFRESH_TOKEN_FILE, USER_FILE] {
            match fs::remove_file(self.dir.join(name)) {
                Ok(()) => {}
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                Err(err) => return Err(StorageError::Io(err).into()),
            }
        }
        Ok(())
    }

    fn write_key(&self, name: &str, contents: &str) -> Result<(), Error> {
        let path = self.dir.join(name);
        fs::write(&path, contents).map_err(StorageError::Io)?;

        // Tokens grant account access; keep them private.
        #[cfg(unix)]
        {
            let mut perms = fs::metadata(&path).map_err(StorageError::Io)?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&path, perms).map_err(StorageError::Io)?;
        }

        Ok(())
    }

    fn read_key(&self, name: &str) -> Option<String> {
        let contents = fs::read_to_string(self.dir.join(name)).ok()?;
        let trimmed = contents.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

impl TokenProvider for TokenStore {
    fn access_token(&self) -> Option<AccessToken> {
        TokenStore::access_token(self)
    }
}
