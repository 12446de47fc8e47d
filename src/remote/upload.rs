// ABOUTME: File upload capability used when a draft carries binary attachments
// ABOUTME: Multipart upload over HTTP returning the stored file's URL

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde::Deserialize;
use std::path::Path;

use super::client::RemoteClient;
use super::models::Envelope;
use crate::error::ClientError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub mime: Option<String>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
            mime: None,
        }
    }

    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }

    pub async fn from_path(path: &Path) -> Result<Self, ClientError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ClientError::Upload(format!("cannot read {}: {}", path.display(), e)))?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| ClientError::Upload(format!("{} has no file name", path.display())))?;
        Ok(Self::new(file_name, bytes))
    }

    pub(crate) fn to_part(&self) -> Result<Part, ClientError> {
        let part = Part::bytes(self.bytes.clone()).file_name(self.file_name.clone());
        match &self.mime {
            Some(mime) => part
                .mime_str(mime)
                .map_err(|e| ClientError::Upload(format!("invalid mime type {}: {}", mime, e))),
            None => Ok(part),
        }
    }
}

/// Stores a file somewhere and returns the URL (or identifier) it can be
/// referenced by. All failures are reported as [`ClientError::Upload`].
#[async_trait]
pub trait Uploader: Send + Sync {
    async fn upload(&self, file: &UploadFile) -> Result<String, ClientError>;
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum UploadedLocation {
    Url(String),
    Object { url: String },
}

/// Posts a multipart `file` field to `{api_url}/upload`.
#[derive(Debug, Clone)]
pub struct HttpUploader {
    remote: RemoteClient,
}

impl HttpUploader {
    pub fn new(remote: RemoteClient) -> Self {
        Self { remote }
    }
}

#[async_trait]
impl Uploader for HttpUploader {
    async fn upload(&self, file: &UploadFile) -> Result<String, ClientError> {
        let url = self.remote.url("upload");
        let form = Form::new().part("file", file.to_part()?);
        let request = self.remote.request(Method::POST, &url).multipart(form);

        let envelope: Envelope<UploadedLocation> = self
            .remote
            .send(request, &url)
            .await
            .map_err(|e| ClientError::Upload(format!("{} failed: {}", file.file_name, e)))?;

        if !envelope.success {
            return Err(ClientError::Upload(
                envelope
                    .message
                    .unwrap_or_else(|| format!("{} was rejected", file.file_name)),
            ));
        }

        Ok(match envelope.data {
            UploadedLocation::Url(url) | UploadedLocation::Object { url } => url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_from_path_reads_name_and_bytes() {
        let mut file = tempfile::Builder::new()
            .suffix(".svg")
            .tempfile()
            .unwrap();
        file.write_all(b"<svg/>").unwrap();

        let upload = UploadFile::from_path(file.path()).await.unwrap();
        assert!(upload.file_name.ends_with(".svg"));
        assert_eq!(upload.bytes, b"<svg/>".to_vec());
    }

    #[tokio::test]
    async fn test_from_missing_path_is_upload_error() {
        let err = UploadFile::from_path(Path::new("/definitely/not/here.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Upload(_)));
    }

    #[test]
    fn test_invalid_mime_is_rejected() {
        let file = UploadFile::new("a.png", vec![1]).with_mime("not a mime");
        assert!(matches!(file.to_part(), Err(ClientError::Upload(_))));
    }
}
