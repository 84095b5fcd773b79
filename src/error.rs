//! Error types for poster rendering and export

use thiserror::Error;

use crate::export::ExportFormat;

/// Result type alias for postercraft operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while rendering, exporting or enhancing a poster
#[derive(Error, Debug)]
pub enum Error {
    /// No mounted capture target carries the requested identifier
    #[error("Poster element not found: {0}")]
    ElementNotFound(String),

    /// Bitmap-to-file serialization produced no output
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),

    /// The text-enhancement collaborator has missing or invalid credentials
    #[error("Upstream configuration error: {0}")]
    UpstreamConfigurationError(String),

    /// The text-enhancement collaborator returned non-conforming content
    #[error("Malformed upstream response: {0}")]
    UpstreamResponseMalformed(String),

    /// An export was triggered while another one is still running
    #[error("A {0} export is already in progress")]
    ExportInProgress(ExportFormat),

    /// Template identifier is not part of the catalog
    #[error("Unknown template: {0}")]
    UnknownTemplate(String),

    /// Failed to render content
    #[error("Rendering failed: {0}")]
    RenderError(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// I/O failure while delivering an artifact
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether re-invoking the same action by hand may succeed.
    ///
    /// Nothing in the crate retries automatically; this only drives the
    /// wording of user notifications.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::EncodingFailed(_) | Error::UpstreamResponseMalformed(_) | Error::ExportInProgress(_)
        )
    }

    /// Actionable, user-facing description of the failure.
    pub fn user_message(&self) -> String {
        match self {
            Error::ElementNotFound(_) => {
                "No poster is currently displayed. Select a template before exporting.".to_string()
            }
            Error::EncodingFailed(_) => {
                "The poster could not be encoded. Please try exporting again.".to_string()
            }
            Error::UpstreamConfigurationError(msg) => msg.clone(),
            Error::UpstreamResponseMalformed(_) => {
                "The enhancement service returned an unexpected answer. Please try again.".to_string()
            }
            Error::ExportInProgress(format) => {
                format!("Please wait for the current {} export to finish.", format)
            }
            Error::UnknownTemplate(id) => format!("Template \"{}\" does not exist.", id),
            Error::RenderError(_) | Error::ConfigError(_) | Error::Io(_) => self.to_string(),
        }
    }
}
