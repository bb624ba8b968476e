// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Base64 data URLs (`data:<mime>;base64,<payload>`) — the self-contained
// representation an image takes before it is embedded in a PDF page.

use std::fmt;
use std::str::FromStr;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use pagewerk_core::error::{PagewerkError, Result};
use tracing::{debug, instrument};

use crate::source::ImageSource;

/// MIME type used when neither the source nor the bytes identify a format.
const FALLBACK_MIME: &str = "application/octet-stream";

/// A decoded base64 data URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    mime_type: String,
    bytes: Vec<u8>,
}

impl DataUrl {
    pub fn from_bytes(mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Read a source fully and wrap it as a data URL.
    ///
    /// The MIME type is the source's declared type, else sniffed from the
    /// leading bytes, else `application/octet-stream`.
    #[instrument(skip_all, fields(source = source.name()))]
    pub async fn read_from<S: ImageSource + ?Sized>(source: &S) -> Result<Self> {
        let bytes = source.read().await?;
        let mime_type = match source.mime_type() {
            Some(declared) if !declared.is_empty() => declared.to_string(),
            _ => image::guess_format(&bytes)
                .map(|format| format.to_mime_type().to_string())
                .unwrap_or_else(|_| FALLBACK_MIME.to_string()),
        };
        debug!(mime_type, bytes = bytes.len(), "Source encoded as data URL");
        Ok(Self { mime_type, bytes })
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// The decoded payload.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// The base64 payload without the `data:` header.
    pub fn payload(&self) -> String {
        STANDARD.encode(&self.bytes)
    }
}

impl fmt::Display for DataUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "data:{};base64,{}", self.mime_type, self.payload())
    }
}

impl FromStr for DataUrl {
    type Err = PagewerkError;

    fn from_str(s: &str) -> Result<Self> {
        let rest = s
            .trim()
            .strip_prefix("data:")
            .ok_or_else(|| PagewerkError::DataUrl("missing 'data:' scheme".into()))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| PagewerkError::DataUrl("missing ',' separator".into()))?;
        let mime_type = header.strip_suffix(";base64").ok_or_else(|| {
            PagewerkError::DataUrl("only base64-encoded data URLs are supported".into())
        })?;
        let mime_type = if mime_type.is_empty() {
            "text/plain"
        } else {
            mime_type
        };
        let bytes = STANDARD
            .decode(payload)
            .map_err(|err| PagewerkError::DataUrl(format!("bad base64 payload: {err}")))?;
        Ok(Self {
            mime_type: mime_type.to_string(),
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ImageFile;

    // The 8-byte PNG signature is enough for format sniffing.
    const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn display_produces_data_url() {
        let url = DataUrl::from_bytes("image/jpeg", b"hello".to_vec());
        assert_eq!(url.to_string(), "data:image/jpeg;base64,aGVsbG8=");
    }

    #[test]
    fn parse_recovers_mime_and_bytes() {
        let url: DataUrl = "data:image/png;base64,aGVsbG8=".parse().unwrap();
        assert_eq!(url.mime_type(), "image/png");
        assert_eq!(url.bytes(), b"hello");
    }

    #[test]
    fn parse_rejects_malformed_urls() {
        assert!("image/png;base64,aGVsbG8=".parse::<DataUrl>().is_err());
        assert!("data:image/png;base64".parse::<DataUrl>().is_err());
        assert!("data:text/plain,hello".parse::<DataUrl>().is_err());
        assert!("data:image/png;base64,@@@".parse::<DataUrl>().is_err());
    }

    #[tokio::test]
    async fn read_from_prefers_declared_mime() {
        let file = ImageFile::new("scan", PNG_MAGIC.to_vec()).with_mime_type("image/jpeg");
        let url = DataUrl::read_from(&file).await.unwrap();
        assert_eq!(url.mime_type(), "image/jpeg");
    }

    #[tokio::test]
    async fn read_from_sniffs_when_undeclared() {
        let png = DataUrl::read_from(&ImageFile::new("a", PNG_MAGIC.to_vec()))
            .await
            .unwrap();
        assert_eq!(png.mime_type(), "image/png");

        let unknown = DataUrl::read_from(&ImageFile::new("b", b"plain".to_vec()))
            .await
            .unwrap();
        assert_eq!(unknown.mime_type(), "application/octet-stream");
        assert!(unknown.to_string().starts_with("data:application/octet-stream;base64,"));
    }
}
