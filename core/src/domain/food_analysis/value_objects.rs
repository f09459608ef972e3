use base64::{Engine as _, engine::general_purpose};

use crate::domain::{
    common::entities::app_errors::CoreError,
    food_analysis::entities::{AnalysisPayload, FoodAnalysisResult},
};

const DEFAULT_MIME_TYPE: &str = "image/jpeg";

/// Raw photo handed over by the capture control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageCapture {
    pub data: Vec<u8>,
    pub mime_type: String,
}

impl ImageCapture {
    pub fn new(data: Vec<u8>, mime_type: impl Into<String>) -> Result<Self, CoreError> {
        let mime_type = mime_type.into();

        if data.is_empty() {
            return Err(CoreError::Validation("image is empty".to_string()));
        }
        if !mime_type.starts_with("image/") {
            return Err(CoreError::Validation(format!(
                "unsupported content type: {mime_type}"
            )));
        }

        Ok(Self { data, mime_type })
    }

    pub fn to_data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime_type,
            general_purpose::STANDARD.encode(&self.data)
        )
    }

    /// Recovers the photo embedded in a result. The MIME type falls back to JPEG
    /// when the header cannot be read.
    pub fn from_data_uri(uri: &str) -> Result<Self, CoreError> {
        let (header, payload) = uri
            .split_once(',')
            .ok_or_else(|| CoreError::Validation("image is not a data URI".to_string()))?;

        let mime_type = header
            .split_once(':')
            .and_then(|(_, rest)| rest.split_once(';'))
            .map(|(mime, _)| mime.trim())
            .filter(|mime| !mime.is_empty())
            .unwrap_or(DEFAULT_MIME_TYPE)
            .to_string();

        let data = general_purpose::STANDARD
            .decode(payload.trim())
            .map_err(|e| CoreError::Validation(format!("image payload is not base64: {e}")))?;

        Ok(Self { data, mime_type })
    }
}

#[derive(Debug, Clone)]
pub struct AnalyzeFoodInput {
    pub image: ImageCapture,
    pub goal: String,
    /// Food identity supplied by the user to override the visual guess.
    pub correction: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisKind {
    Initial,
    Correction,
}

/// An analysis the session has committed to; resolved with `finish_analysis`.
#[derive(Debug, Clone)]
pub struct PendingAnalysis {
    pub kind: AnalysisKind,
    pub image_uri: String,
    pub input: AnalyzeFoodInput,
}

impl PendingAnalysis {
    pub fn to_result(&self, payload: AnalysisPayload) -> FoodAnalysisResult {
        FoodAnalysisResult::new(self.image_uri.clone(), payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_empty_or_non_image() {
        assert!(matches!(
            ImageCapture::new(vec![], "image/png"),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            ImageCapture::new(vec![1], "application/pdf"),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn test_data_uri_recovers_bytes_and_mime() {
        let capture = ImageCapture::new(vec![0x89, 0x50, 0x4E, 0x47], "image/png").unwrap();
        let uri = capture.to_data_uri();
        assert_eq!(uri, "data:image/png;base64,iVBORw==");

        assert_eq!(ImageCapture::from_data_uri(&uri).unwrap(), capture);
    }

    #[test]
    fn test_data_uri_without_readable_mime_defaults_to_jpeg() {
        let capture = ImageCapture::from_data_uri("data:;base64,AQID").unwrap();
        assert_eq!(capture.mime_type, "image/jpeg");
        assert_eq!(capture.data, vec![1, 2, 3]);

        let capture = ImageCapture::from_data_uri("garbage,AQID").unwrap();
        assert_eq!(capture.mime_type, "image/jpeg");
    }

    #[test]
    fn test_data_uri_rejects_bad_payload() {
        assert!(ImageCapture::from_data_uri("no comma here").is_err());
        assert!(ImageCapture::from_data_uri("data:image/png;base64,@@@").is_err());
    }
}
