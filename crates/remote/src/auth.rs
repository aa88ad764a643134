//! Credential handling.
//!
//! The remote API uses OAuth: an access token with an expiry, optionally
//! accompanied by a refresh token. [`authenticate`] reuses a credential
//! persisted on disk from a previous session, refreshes it through a
//! [`TokenFlow`] when it has expired, and falls back to the flow's
//! interactive branch when refresh is impossible. Whatever it ends up
//! with is persisted back for the next session.
//!
//! The interactive branch itself (browser consent, local redirect server)
//! belongs to the front-end; this crate only defines the seam.

use crate::error::{ErrorKind, Result};
use async_trait::async_trait;
use exn::ResultExt;
use serde::{Deserialize, Serialize};
use std::path::Path;
use time::OffsetDateTime;

/// An OAuth credential as persisted between sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credential {
    pub access_token: String,
    /// Long-lived token used to obtain a fresh access token without user
    /// interaction. Absent for flows that do not grant offline access.
    pub refresh_token: Option<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub expires_at: Option<OffsetDateTime>,
}

impl Credential {
    /// A credential with no recorded expiry is assumed valid; the remote
    /// API will reject it soon enough if it isn't.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => expires_at <= OffsetDateTime::now_utc(),
            None => false,
        }
    }
}

/// The two ways of obtaining a fresh [`Credential`].
#[async_trait]
pub trait TokenFlow: Send + Sync {
    /// Exchange a refresh token for a fresh access token.
    async fn refresh(&self, refresh_token: &str) -> Result<Credential>;

    /// Obtain a credential interactively (user consent).
    async fn interactive(&self) -> Result<Credential>;
}

/// Obtain a usable credential, preferring the one stored at `token_path`.
///
/// Resolution order:
/// 1. a stored, unexpired credential is reused as-is (no writes);
/// 2. a stored, expired credential with a refresh token is refreshed;
/// 3. otherwise the interactive flow runs.
///
/// A stored file that is missing or unreadable is treated the same as no
/// stored credential. Refreshed and interactively-obtained credentials are
/// persisted back to `token_path` before returning.
pub async fn authenticate(flow: &dyn TokenFlow, token_path: &Path) -> Result<Credential> {
    let stored = load(token_path).await;
    if let Some(credential) = &stored
        && !credential.is_expired()
    {
        tracing::debug!(path = %token_path.display(), "reusing stored credential");
        return Ok(credential.clone());
    }
    let credential = match stored.as_ref().and_then(|credential| credential.refresh_token.as_deref()) {
        Some(refresh_token) => {
            tracing::info!("stored credential expired; refreshing");
            let mut refreshed = flow.refresh(refresh_token).await?;
            // Token endpoints usually omit the refresh token on refresh;
            // carry the old one forward so the next session can refresh too.
            if refreshed.refresh_token.is_none() {
                refreshed.refresh_token = Some(refresh_token.to_string());
            }
            refreshed
        },
        None => {
            tracing::info!("no usable stored credential; running interactive flow");
            flow.interactive().await?
        },
    };
    persist(token_path, &credential).await?;
    Ok(credential)
}

async fn load(path: &Path) -> Option<Credential> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(_) => return None,
    };
    match serde_json::from_slice(&bytes) {
        Ok(credential) => Some(credential),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "stored credential is unreadable; ignoring");
            None
        },
    }
}

async fn persist(path: &Path, credential: &Credential) -> Result<()> {
    let json = serde_json::to_vec_pretty(credential)
        .or_raise(|| ErrorKind::Auth("could not serialize credential".to_string()))?;
    tokio::fs::write(path, json)
        .await
        .or_raise(|| ErrorKind::Auth(format!("could not persist credential to {}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use time::Duration;

    /// Scripted flow recording how many times each branch ran.
    struct ScriptedFlow {
        refreshes: AtomicU32,
        interactives: AtomicU32,
        fail_refresh: bool,
    }

    impl ScriptedFlow {
        fn new() -> Self {
            Self { refreshes: AtomicU32::new(0), interactives: AtomicU32::new(0), fail_refresh: false }
        }
    }

    #[async_trait]
    impl TokenFlow for ScriptedFlow {
        async fn refresh(&self, refresh_token: &str) -> Result<Credential> {
            self.refreshes.fetch_add(1, Ordering::SeqCst);
            if self.fail_refresh {
                exn::bail!(ErrorKind::Auth("refresh rejected".to_string()));
            }
            Ok(Credential {
                access_token: format!("refreshed-with-{refresh_token}"),
                refresh_token: None,
                expires_at: Some(OffsetDateTime::now_utc() + Duration::hours(1)),
            })
        }

        async fn interactive(&self) -> Result<Credential> {
            self.interactives.fetch_add(1, Ordering::SeqCst);
            Ok(Credential {
                access_token: "interactive".to_string(),
                refresh_token: Some("fresh-refresh".to_string()),
                expires_at: Some(OffsetDateTime::now_utc() + Duration::hours(1)),
            })
        }
    }

    fn token_file() -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        (dir, path)
    }

    async fn store(path: &Path, credential: &Credential) {
        tokio::fs::write(path, serde_json::to_vec(credential).unwrap()).await.unwrap();
    }

    #[tokio::test]
    async fn valid_stored_credential_is_reused() {
        let (_dir, path) = token_file();
        store(
            &path,
            &Credential {
                access_token: "stored".to_string(),
                refresh_token: None,
                expires_at: Some(OffsetDateTime::now_utc() + Duration::hours(1)),
            },
        )
        .await;
        let flow = ScriptedFlow::new();
        let credential = authenticate(&flow, &path).await.unwrap();
        assert_eq!(credential.access_token, "stored");
        assert_eq!(flow.refreshes.load(Ordering::SeqCst), 0);
        assert_eq!(flow.interactives.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn expired_credential_is_refreshed_and_persisted() {
        let (_dir, path) = token_file();
        store(
            &path,
            &Credential {
                access_token: "stale".to_string(),
                refresh_token: Some("r1".to_string()),
                expires_at: Some(OffsetDateTime::now_utc() - Duration::hours(1)),
            },
        )
        .await;
        let flow = ScriptedFlow::new();
        let credential = authenticate(&flow, &path).await.unwrap();
        assert_eq!(credential.access_token, "refreshed-with-r1");
        // The old refresh token is carried forward.
        assert_eq!(credential.refresh_token.as_deref(), Some("r1"));
        // And the refreshed credential was written back.
        let reloaded: Credential = serde_json::from_slice(&tokio::fs::read(&path).await.unwrap()).unwrap();
        assert_eq!(reloaded.access_token, "refreshed-with-r1");
    }

    #[tokio::test]
    async fn expired_without_refresh_token_goes_interactive() {
        let (_dir, path) = token_file();
        store(
            &path,
            &Credential {
                access_token: "stale".to_string(),
                refresh_token: None,
                expires_at: Some(OffsetDateTime::now_utc() - Duration::hours(1)),
            },
        )
        .await;
        let flow = ScriptedFlow::new();
        let credential = authenticate(&flow, &path).await.unwrap();
        assert_eq!(credential.access_token, "interactive");
        assert_eq!(flow.interactives.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn missing_file_goes_interactive() {
        let (_dir, path) = token_file();
        let flow = ScriptedFlow::new();
        let credential = authenticate(&flow, &path).await.unwrap();
        assert_eq!(credential.access_token, "interactive");
        assert!(path.exists(), "interactive credential should be persisted");
    }

    #[tokio::test]
    async fn corrupt_file_goes_interactive() {
        let (_dir, path) = token_file();
        tokio::fs::write(&path, b"{not json").await.unwrap();
        let flow = ScriptedFlow::new();
        let credential = authenticate(&flow, &path).await.unwrap();
        assert_eq!(credential.access_token, "interactive");
    }

    #[tokio::test]
    async fn refresh_failure_surfaces() {
        let (_dir, path) = token_file();
        store(
            &path,
            &Credential {
                access_token: "stale".to_string(),
                refresh_token: Some("r1".to_string()),
                expires_at: Some(OffsetDateTime::now_utc() - Duration::hours(1)),
            },
        )
        .await;
        let flow = ScriptedFlow { fail_refresh: true, ..ScriptedFlow::new() };
        let err = authenticate(&flow, &path).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Auth(_)));
    }
}
