//! Lazily decrypted Okta API token.
//!
//! The token arrives as a base64 KMS ciphertext. Decryption is expensive, so
//! [`CredentialProvider`] performs it on first use and keeps the plaintext for
//! the rest of the process. There is no refresh: a worker that needs a new
//! token is restarted.
//!
//! ```rust,no_run
//! use tropokta::credentials::{CredentialProvider, KmsDecrypter};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let decrypter = KmsDecrypter::from_env().await;
//! let credentials = CredentialProvider::new("c2VjcmV0", decrypter);
//! let token = credentials.token().await?;
//! assert!(!token.expose().is_empty());
//! # Ok(())
//! # }
//! ```

use crate::error::{ProviderError, ProviderResult};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use log::{debug, info};
use std::fmt;
use std::future::Future;
use tokio::sync::OnceCell;

/// Plaintext API token.
///
/// The [`Debug`] and [`Display`](fmt::Display) impls redact the value so the
/// token cannot leak into log output.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretToken(String);

impl SecretToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Access the plaintext for building request headers.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SecretToken").field(&"[REDACTED]").finish()
    }
}

impl fmt::Display for SecretToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

/// Turns ciphertext bytes into the plaintext token.
///
/// Implementations must be pure with respect to their input: the same
/// ciphertext always yields the same plaintext.
pub trait Decrypter {
    fn decrypt(
        &self,
        ciphertext: Vec<u8>,
    ) -> impl Future<Output = ProviderResult<SecretToken>> + Send;
}

/// [`Decrypter`] backed by AWS KMS.
#[derive(Debug, Clone)]
pub struct KmsDecrypter {
    client: aws_sdk_kms::Client,
}

impl KmsDecrypter {
    pub fn new(client: aws_sdk_kms::Client) -> Self {
        Self { client }
    }

    /// Build a KMS client from the standard AWS environment (region,
    /// credentials chain, endpoint overrides).
    pub async fn from_env() -> Self {
        let sdk_config = aws_config::from_env().load().await;
        Self::new(aws_sdk_kms::Client::new(&sdk_config))
    }
}

impl Decrypter for KmsDecrypter {
    fn decrypt(
        &self,
        ciphertext: Vec<u8>,
    ) -> impl Future<Output = ProviderResult<SecretToken>> + Send {
        async move {
            let output = self
                .client
                .decrypt()
                .ciphertext_blob(aws_sdk_kms::primitives::Blob::new(ciphertext))
                .send()
                .await
                .map_err(|e| ProviderError::credential(format!("KMS decrypt failed: {e}")))?;

            let plaintext = output
                .plaintext()
                .ok_or_else(|| ProviderError::credential("KMS returned no plaintext"))?;

            let token = std::str::from_utf8(plaintext.as_ref()).map_err(|e| {
                ProviderError::credential(format!("decrypted token is not UTF-8: {e}"))
            })?;

            Ok(SecretToken::new(token))
        }
    }
}

/// Decrypts the configured ciphertext once and serves the cached plaintext.
///
/// Share one instance (behind an `Arc`) across every request in the process.
pub struct CredentialProvider<D> {
    encrypted: String,
    decrypter: D,
    token: OnceCell<SecretToken>,
}

impl<D: Decrypter + Sync> CredentialProvider<D> {
    pub fn new(encrypted: impl Into<String>, decrypter: D) -> Self {
        Self {
            encrypted: encrypted.into(),
            decrypter,
            token: OnceCell::new(),
        }
    }

    /// Return the plaintext token, decrypting it on the first call.
    ///
    /// Concurrent first calls wait on a single initialization. A failed
    /// decryption leaves the cell empty and is returned to the caller.
    pub async fn token(&self) -> ProviderResult<&SecretToken> {
        self.token
            .get_or_try_init(|| async {
                debug!("Decrypting Okta API token");
                let ciphertext = STANDARD.decode(self.encrypted.trim()).map_err(|e| {
                    ProviderError::credential(format!("encrypted token is not valid base64: {e}"))
                })?;
                let token = self.decrypter.decrypt(ciphertext).await?;
                info!("Okta API token decrypted and cached for this process");
                Ok::<_, ProviderError>(token)
            })
            .await
    }

    /// Whether the token has already been decrypted.
    pub fn is_initialized(&self) -> bool {
        self.token.initialized()
    }
}

impl<D> fmt::Debug for CredentialProvider<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialProvider")
            .field("encrypted", &"[REDACTED]")
            .field("initialized", &self.token.initialized())
            .finish()
    }
}
