//! Filesystem-backed media store with signed upload URLs.
//!
//! Two-operation contract: issue a short-lived write-capable URL, and
//! resolve a stored blob id to a fetchable URL. Upload URLs carry an
//! HMAC-SHA256 signature over `id:expiry`; uploads are write-once.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use sha2::Sha256;
use tokio::io::AsyncWriteExt;

use sugar_maple_core::MediaId;

type HmacSha256 = Hmac<Sha256>;

/// How long an issued upload URL stays valid.
const UPLOAD_TTL_SECONDS: i64 = 15 * 60;

/// Media storage errors.
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    /// The upload URL's expiry has passed.
    #[error("upload URL expired")]
    Expired,

    /// The signature does not match.
    #[error("invalid upload signature")]
    BadSignature,

    /// A blob with this id already exists (uploads are write-once).
    #[error("media already exists")]
    AlreadyExists,

    /// No blob stored under this id.
    #[error("media not found")]
    NotFound,

    /// Filesystem failure.
    #[error("media io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A short-lived write-capable upload URL.
#[derive(Debug, Clone, Serialize)]
pub struct UploadTicket {
    /// The id the blob will be stored under; becomes a candidate `image_id`.
    pub id: MediaId,
    /// Signed PUT target.
    pub url: String,
    /// Unix timestamp after which the URL is rejected.
    pub expires_at: i64,
}

/// The media store.
#[derive(Clone)]
pub struct MediaStore {
    root: PathBuf,
    base_url: String,
    secret: SecretString,
}

impl MediaStore {
    /// Create a media store rooted at `root`, issuing URLs under `base_url`.
    #[must_use]
    pub fn new(root: PathBuf, base_url: &str, secret: SecretString) -> Self {
        Self {
            root,
            base_url: base_url.trim_end_matches('/').to_string(),
            secret,
        }
    }

    /// Issue a fresh signed upload URL.
    #[must_use]
    pub fn issue_upload(&self) -> UploadTicket {
        let id = MediaId::generate();
        let expires_at = Utc::now().timestamp() + UPLOAD_TTL_SECONDS;
        let sig = self.sign(id, expires_at);

        UploadTicket {
            id,
            url: format!(
                "{}/api/media/{id}?expires={expires_at}&sig={sig}",
                self.base_url
            ),
            expires_at,
        }
    }

    /// Check an upload request's expiry and signature.
    ///
    /// # Errors
    ///
    /// Returns `MediaError::Expired` when past the expiry,
    /// `MediaError::BadSignature` when the signature doesn't verify.
    pub fn verify(
        &self,
        id: MediaId,
        expires_at: i64,
        sig: &str,
        now: DateTime<Utc>,
    ) -> Result<(), MediaError> {
        if now.timestamp() > expires_at {
            return Err(MediaError::Expired);
        }

        let raw = hex::decode(sig).map_err(|_| MediaError::BadSignature)?;
        let mut mac = self.mac();
        mac.update(payload(id, expires_at).as_bytes());
        mac.verify_slice(&raw).map_err(|_| MediaError::BadSignature)
    }

    /// Store blob bytes under `id`. Write-once: an existing blob is never
    /// overwritten.
    ///
    /// # Errors
    ///
    /// Returns `MediaError::AlreadyExists` if the id is taken,
    /// `MediaError::Io` on filesystem failure.
    pub async fn store(&self, id: MediaId, bytes: &[u8]) -> Result<(), MediaError> {
        tokio::fs::create_dir_all(&self.root).await?;

        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(self.path_for(id))
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::AlreadyExists {
                    MediaError::AlreadyExists
                } else {
                    MediaError::Io(e)
                }
            })?;

        file.write_all(bytes).await?;
        file.flush().await?;
        Ok(())
    }

    /// Read back a stored blob.
    ///
    /// # Errors
    ///
    /// Returns `MediaError::NotFound` if nothing is stored under `id`,
    /// `MediaError::Io` on filesystem failure.
    pub async fn open(&self, id: MediaId) -> Result<Vec<u8>, MediaError> {
        tokio::fs::read(self.path_for(id)).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                MediaError::NotFound
            } else {
                MediaError::Io(e)
            }
        })
    }

    /// Resolve an optional blob reference to a public fetch URL.
    #[must_use]
    pub fn resolve(&self, id: Option<MediaId>) -> Option<String> {
        id.map(|id| format!("{}/api/media/{id}", self.base_url))
    }

    fn path_for(&self, id: MediaId) -> PathBuf {
        self.root.join(id.to_string())
    }

    fn mac(&self) -> HmacSha256 {
        HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .expect("hmac accepts any key length")
    }

    fn sign(&self, id: MediaId, expires_at: i64) -> String {
        let mut mac = self.mac();
        mac.update(payload(id, expires_at).as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}

impl std::fmt::Debug for MediaStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaStore")
            .field("root", &self.root)
            .field("base_url", &self.base_url)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

fn payload(id: MediaId, expires_at: i64) -> String {
    format!("{id}:{expires_at}")
}

/// Extract the signature parameters back out of an issued upload URL.
/// Used by tests; the server reads them from the request query instead.
#[cfg(test)]
fn parse_ticket_url(url: &str) -> Option<(i64, String)> {
    let query = url.split_once('?')?.1;
    let mut expires = None;
    let mut sig = None;
    for pair in query.split('&') {
        match pair.split_once('=')? {
            ("expires", v) => expires = v.parse().ok(),
            ("sig", v) => sig = Some(v.to_string()),
            _ => {}
        }
    }
    Some((expires?, sig?))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_store() -> MediaStore {
        let root = std::env::temp_dir().join(format!("sm-media-{}", uuid::Uuid::new_v4()));
        MediaStore::new(
            root,
            "http://localhost:3000/",
            SecretString::from("u2fP8wQ4rT6yH1jK3lM5nB7vC9xZ0aSd"),
        )
    }

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let store = test_store();
        let ticket = store.issue_upload();
        let (expires, sig) = parse_ticket_url(&ticket.url).unwrap();

        assert_eq!(expires, ticket.expires_at);
        assert!(store.verify(ticket.id, expires, &sig, Utc::now()).is_ok());
    }

    #[test]
    fn test_verify_rejects_tampered_signature() {
        let store = test_store();
        let ticket = store.issue_upload();
        let (expires, _) = parse_ticket_url(&ticket.url).unwrap();

        let bogus = hex::encode([0_u8; 32]);
        assert!(matches!(
            store.verify(ticket.id, expires, &bogus, Utc::now()),
            Err(MediaError::BadSignature)
        ));
        assert!(matches!(
            store.verify(ticket.id, expires, "not-hex", Utc::now()),
            Err(MediaError::BadSignature)
        ));
    }

    #[test]
    fn test_verify_rejects_expired() {
        let store = test_store();
        let ticket = store.issue_upload();
        let (expires, sig) = parse_ticket_url(&ticket.url).unwrap();

        let later = Utc::now() + chrono::Duration::seconds(UPLOAD_TTL_SECONDS + 60);
        assert!(matches!(
            store.verify(ticket.id, expires, &sig, later),
            Err(MediaError::Expired)
        ));
    }

    #[test]
    fn test_verify_rejects_different_id() {
        let store = test_store();
        let ticket = store.issue_upload();
        let (expires, sig) = parse_ticket_url(&ticket.url).unwrap();

        assert!(matches!(
            store.verify(MediaId::generate(), expires, &sig, Utc::now()),
            Err(MediaError::BadSignature)
        ));
    }

    #[test]
    fn test_resolve() {
        let store = test_store();
        let id = MediaId::generate();
        assert_eq!(
            store.resolve(Some(id)),
            Some(format!("http://localhost:3000/api/media/{id}"))
        );
        assert_eq!(store.resolve(None), None);
    }

    #[tokio::test]
    async fn test_store_is_write_once() {
        let store = test_store();
        let id = MediaId::generate();

        store.store(id, b"first").await.unwrap();
        assert!(matches!(
            store.store(id, b"second").await,
            Err(MediaError::AlreadyExists)
        ));

        assert_eq!(store.open(id).await.unwrap(), b"first");
        assert!(matches!(
            store.open(MediaId::generate()).await,
            Err(MediaError::NotFound)
        ));
    }
}
