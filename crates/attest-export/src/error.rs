use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("text not representable in document encoding: {character:?}")]
    Encoding { character: char },

    #[error("PDF generation failed: {0}")]
    Pdf(String),
}

impl From<lopdf::Error> for ExportError {
    fn from(e: lopdf::Error) -> Self {
        ExportError::Pdf(e.to_string())
    }
}

impl From<std::io::Error> for ExportError {
    fn from(e: std::io::Error) -> Self {
        ExportError::Pdf(e.to_string())
    }
}
