//! Google Drive v3 backend.
//!
//! Talks plain REST to the Drive API: `files.list` for paginated listings,
//! `files.get` for name resolution, `files.update` with
//! `addParents`/`removeParents` for the atomic re-parent. One HTTP round
//! trip per trait call, no retries (retry policy is out of scope).

use crate::auth::{Credential, TokenFlow};
use crate::backend::RemoteStore;
use crate::error::{ErrorKind, Result};
use crate::models::{ItemId, ItemKind, Page, PageToken, RemoteItem};
use async_trait::async_trait;
use exn::ResultExt;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use time::{Duration, OffsetDateTime};

const API_BASE: &str = "https://www.googleapis.com/drive/v3";
const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
const FOLDER_MIME: &str = "application/vnd.google-apps.folder";
const LIST_FIELDS: &str = "nextPageToken, files(id, name, mimeType, webViewLink, parents)";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireFile {
    id: String,
    name: String,
    #[serde(default)]
    mime_type: String,
    #[serde(default)]
    parents: Vec<String>,
    web_view_link: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireFileList {
    #[serde(default)]
    files: Vec<WireFile>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireName {
    name: String,
}

impl From<WireFile> for RemoteItem {
    fn from(file: WireFile) -> Self {
        let kind = if file.mime_type == FOLDER_MIME { ItemKind::Folder } else { ItemKind::File };
        Self {
            id: ItemId::from(file.id),
            name: file.name,
            kind,
            parents: file.parents.into_iter().map(ItemId::from).collect(),
            view_link: file.web_view_link,
        }
    }
}

impl From<WireFileList> for Page {
    fn from(list: WireFileList) -> Self {
        Self {
            items: list.files.into_iter().map(RemoteItem::from).collect(),
            next: list.next_page_token.map(PageToken::new),
        }
    }
}

/// Google Drive v3 [`RemoteStore`] backend.
pub struct DriveStore {
    name: String,
    http: Client,
    access_token: String,
    page_size: Option<u32>,
}

impl DriveStore {
    pub fn new(credential: &Credential) -> Self {
        Self {
            name: "drive".to_string(),
            http: Client::new(),
            access_token: credential.access_token.clone(),
            page_size: None,
        }
    }

    /// Change the name of the backend.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Request at most `size` items per listing page (the API default is
    /// used otherwise).
    pub fn with_page_size(mut self, size: u32) -> Self {
        self.page_size = Some(size);
        self
    }

    async fn list(&self, query: String, token: Option<&PageToken>) -> Result<Page> {
        let mut request = self
            .http
            .get(format!("{API_BASE}/files"))
            .bearer_auth(&self.access_token)
            .query(&[("q", query.as_str()), ("fields", LIST_FIELDS)]);
        if let Some(token) = token {
            request = request.query(&[("pageToken", token.as_str())]);
        }
        if let Some(size) = self.page_size {
            request = request.query(&[("pageSize", size)]);
        }
        let list: WireFileList = self.execute(request, None).await?;
        Ok(Page::from(list))
    }

    async fn execute<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder, id: Option<&ItemId>) -> Result<T> {
        let response = request.send().await.or_raise(|| ErrorKind::Network("request failed".to_string()))?;
        let status = response.status();
        if !status.is_success() {
            exn::bail!(classify(status, id));
        }
        response.json().await.or_raise(|| ErrorKind::InvalidResponse("malformed JSON body".to_string()))
    }
}

/// Map an HTTP status to the error taxonomy.
fn classify(status: StatusCode, id: Option<&ItemId>) -> ErrorKind {
    let id = id.cloned().unwrap_or_else(|| ItemId::from("<listing>"));
    match status {
        StatusCode::UNAUTHORIZED => ErrorKind::Auth("access token rejected".to_string()),
        StatusCode::FORBIDDEN => ErrorKind::PermissionDenied(id),
        StatusCode::NOT_FOUND => ErrorKind::NotFound(id),
        StatusCode::TOO_MANY_REQUESTS => ErrorKind::QuotaExceeded,
        status => ErrorKind::Backend(format!("drive API returned {status}")),
    }
}

/// The listing query embeds the id between single quotes; backslashes and
/// quotes in the id must not terminate the literal early.
fn escape_query_value(id: &ItemId) -> String {
    id.as_str().replace('\\', "\\\\").replace('\'', "\\'")
}

#[async_trait]
impl RemoteStore for DriveStore {
    fn name(&self) -> &str {
        &self.name
    }

    async fn list_children(&self, folder: &ItemId, token: Option<&PageToken>) -> Result<Page> {
        let query = format!("'{}' in parents and trashed=false", escape_query_value(folder));
        self.list(query, token).await
    }

    async fn folder_name(&self, folder: &ItemId) -> Result<String> {
        let request = self
            .http
            .get(format!("{API_BASE}/files/{}", folder.as_str()))
            .bearer_auth(&self.access_token)
            .query(&[("fields", "name")]);
        let wire: WireName = self.execute(request, Some(folder)).await?;
        Ok(wire.name)
    }

    async fn list_folders(&self, token: Option<&PageToken>) -> Result<Page> {
        let query = format!("mimeType='{FOLDER_MIME}' and trashed=false");
        self.list(query, token).await
    }

    async fn reparent(&self, file: &ItemId, add_parent: &ItemId, remove_parent: &ItemId) -> Result<()> {
        let request = self
            .http
            .patch(format!("{API_BASE}/files/{}", file.as_str()))
            .bearer_auth(&self.access_token)
            .query(&[
                ("addParents", add_parent.as_str()),
                ("removeParents", remove_parent.as_str()),
                ("fields", "id, parents"),
            ])
            .json(&serde_json::json!({}));
        let _: serde_json::Value = self.execute(request, Some(file)).await?;
        Ok(())
    }
}

/// OAuth refresh against the Google token endpoint.
///
/// Only the refresh branch is implemented here; the interactive consent
/// flow (browser hand-off, local redirect listener) is presentation-layer
/// territory and must be supplied by the embedding application.
pub struct DriveFlow {
    http: Client,
    client_id: String,
    client_secret: String,
}

#[derive(Debug, Deserialize)]
struct WireToken {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

impl DriveFlow {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self { http: Client::new(), client_id: client_id.into(), client_secret: client_secret.into() }
    }
}

#[async_trait]
impl TokenFlow for DriveFlow {
    async fn refresh(&self, refresh_token: &str) -> Result<Credential> {
        let response = self
            .http
            .post(TOKEN_ENDPOINT)
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ])
            .send()
            .await
            .or_raise(|| ErrorKind::Network("token endpoint unreachable".to_string()))?;
        if !response.status().is_success() {
            exn::bail!(ErrorKind::Auth(format!("token refresh rejected: {}", response.status())));
        }
        let wire: WireToken =
            response.json().await.or_raise(|| ErrorKind::InvalidResponse("malformed token response".to_string()))?;
        Ok(Credential {
            access_token: wire.access_token,
            refresh_token: None,
            expires_at: wire.expires_in.map(|seconds| OffsetDateTime::now_utc() + Duration::seconds(seconds)),
        })
    }

    async fn interactive(&self) -> Result<Credential> {
        exn::bail!(ErrorKind::Auth("interactive consent flow must be supplied by the application".to_string()));
    }
}
