//! Inline preview of a submitted artifact. PDFs are embedded as a base64 `data:` URI;
//! other documents only report their location.

use std::path::PathBuf;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use rsc_core::{ArtifactKind, ClassId};
use serde::Serialize;

use crate::error::PortalError;
use crate::service::Portal;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactPreview {
    pub path: PathBuf,
    pub kind: ArtifactKind,
    /// Inline `data:` URI, only for PDFs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_uri: Option<String>,
}

impl Portal {
    /// Find an artifact and prepare it for display.
    ///
    /// # Errors
    ///
    /// `Store(NotFound)` when no artifact matches, `Store(Io)` when a PDF
    /// cannot be read.
    pub async fn preview_artifact(
        &self,
        class: &ClassId,
        full_name: &str,
        admission_no: &str,
    ) -> Result<ArtifactPreview, PortalError> {
        let path = self.find_artifact(class, full_name, admission_no).await?;
        let kind = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map_or(ArtifactKind::Other, ArtifactKind::from_extension);

        let data_uri = match kind {
            ArtifactKind::Pdf => {
                let bytes = self.artifacts.read(&path)?;
                Some(format!("data:application/pdf;base64,{}", STANDARD.encode(bytes)))
            }
            ArtifactKind::Document | ArtifactKind::Other => None,
        };

        Ok(ArtifactPreview {
            path,
            kind,
            data_uri,
        })
    }
}
