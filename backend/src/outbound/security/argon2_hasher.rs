//! Argon2id implementation of the `PasswordHasher` port.
//!
//! Digests are PHC strings (`$argon2id$v=19$m=19456,t=2,p=1$...`) with a
//! random salt from `OsRng`. Hashing is memory-hard, so every call runs on
//! the blocking pool.

use argon2::Argon2;
use argon2::password_hash::rand_core::{OsRng, RngCore};
use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString};
use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{PasswordHashError, PasswordHasher};
use crate::domain::{Password, PasswordDigest, TraceId};

fn hash_blocking(password: &[u8]) -> Result<String, PasswordHashError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password, &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| PasswordHashError::hash(err.to_string()))
}

fn verify_blocking(password: &[u8], digest: &str) -> Result<bool, PasswordHashError> {
    let parsed = PasswordHash::new(digest)
        .map_err(|err| PasswordHashError::malformed_digest(err.to_string()))?;
    Ok(Argon2::default().verify_password(password, &parsed).is_ok())
}

fn join_error(err: &tokio::task::JoinError) -> PasswordHashError {
    PasswordHashError::hash(format!("hashing task failed: {err}"))
}

/// Argon2id hasher with default parameters.
#[derive(Debug, Clone)]
pub struct Argon2PasswordHasher {
    dummy: PasswordDigest,
}

impl Argon2PasswordHasher {
    /// Build a hasher, precomputing the digest used for dummy verification.
    ///
    /// # Errors
    ///
    /// Returns [`PasswordHashError::Hash`] when the dummy digest cannot be
    /// computed.
    pub fn new() -> Result<Self, PasswordHashError> {
        let mut filler = [0_u8; 32];
        OsRng.fill_bytes(&mut filler);
        let dummy = hash_blocking(&filler)?;
        Ok(Self {
            dummy: PasswordDigest::new(dummy),
        })
    }
}

#[async_trait]
impl PasswordHasher for Argon2PasswordHasher {
    async fn hash(&self, password: &Password) -> Result<PasswordDigest, PasswordHashError> {
        let plain = zeroize::Zeroizing::new(password.expose().as_bytes().to_vec());
        let phc = TraceId::spawn_blocking(move || hash_blocking(&plain))
            .await
            .map_err(|err| join_error(&err))??;
        Ok(PasswordDigest::new(phc))
    }

    async fn verify(
        &self,
        password: &str,
        digest: &PasswordDigest,
    ) -> Result<bool, PasswordHashError> {
        let plain = zeroize::Zeroizing::new(password.as_bytes().to_vec());
        let stored = digest.as_str().to_owned();
        TraceId::spawn_blocking(move || verify_blocking(&plain, &stored))
            .await
            .map_err(|err| join_error(&err))?
    }

    async fn verify_dummy(&self, password: &str) {
        if let Err(err) = self.verify(password, &self.dummy).await {
            debug!(error = %err, "dummy verification failed");
        }
    }
}
