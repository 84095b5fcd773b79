//! Postercraft
//!
//! Template-driven poster rendering with deterministic raster and document
//! export. A single [`PosterRecord`] is laid out by one of the catalog
//! templates onto a fixed-size canvas, hosted twice (offscreen at full size,
//! onscreen scaled down) and captured at a supersampling multiplier into a
//! PNG image or a one-page PDF.
//!
//! # Features
//!
//! - **Fixed canvas**: every template renders to [`Canvas::CANONICAL`]; long
//!   text is wrapped and clipped, the canvas never grows
//! - **Declarative templates**: one layout engine driven by per-template style
//!   and field-visibility tables
//! - **Format parity**: image and document exports share the same capture
//!
//! # Example
//!
//! ```no_run
//! use postercraft::{DirectorySink, PosterRecord, Session, StudioConfig};
//!
//! # async fn run() -> postercraft::Result<()> {
//! let config = StudioConfig::default();
//! let sink = DirectorySink::new(&config.output_dir);
//! let session = Session::new(config, PosterRecord::seed(), Box::new(sink))?;
//! let note = session.export_image().await;
//! println!("{}: {}", note.title, note.message);
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub mod error;
pub use error::{Error, Result};

pub mod record;
pub use record::{Field, PosterRecord};

pub mod template;
pub use template::{TemplateDescriptor, TemplateId};

pub mod rendering;
pub use rendering::{render, Bitmap, Composition};

pub mod host;
pub use host::LayoutHost;

pub mod export;
pub use export::{
    DirectorySink, DownloadSink, ExportFormat, ExportPhase, ExportReport, Exporter, MemorySink,
};

pub mod enhance;
pub use enhance::{Credentials, EnhanceRequest, EnhanceResponse, Provider, TextEnhancer};

pub mod session;
pub use session::{Notification, NotificationKind, Session};

/// Pixel dimensions of a poster canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    /// The fixed 2:3 portrait canvas every template renders to.
    pub const CANONICAL: Canvas = Canvas {
        width: 800,
        height: 1200,
    };

    /// Size of the canvas after applying a uniform scale factor.
    pub fn scaled(&self, scale: f32) -> (u32, u32) {
        (
            (self.width as f32 * scale).round() as u32,
            (self.height as f32 * scale).round() as u32,
        )
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::CANONICAL
    }
}

/// Millimetres to PDF points (1/72 inch).
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * 72.0 / 25.4
}

/// Page dimensions in PDF points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    /// ISO A4, portrait.
    pub fn a4() -> Self {
        Self {
            width: mm_to_pt(210.0),
            height: mm_to_pt(297.0),
        }
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width / self.height
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::a4()
    }
}

/// Identifier the offscreen capture target is mounted under by default
pub const DEFAULT_TARGET_ID: &str = "poster-preview";

/// Configuration for a poster studio session
///
/// The defaults mirror the production setup: a 3× capture of the 800×1200
/// canvas, a half-size preview and an A4 portrait document page.
///
/// # Examples
///
/// ```
/// let cfg = postercraft::StudioConfig::default();
/// assert_eq!(cfg.supersample, 3);
/// assert!(cfg.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StudioConfig {
    /// Capture multiplier relative to the canonical canvas (2..=4)
    pub supersample: u32,
    /// Scale applied to the onscreen preview rendering
    pub preview_scale: f32,
    /// Page the document exporter places the capture on
    pub page: PageSize,
    /// Stable identifier of the offscreen capture target
    pub target_id: String,
    /// Directory downloads are delivered into
    pub output_dir: PathBuf,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            supersample: 3,
            preview_scale: 0.5,
            page: PageSize::a4(),
            target_id: DEFAULT_TARGET_ID.to_string(),
            output_dir: PathBuf::from("."),
        }
    }
}

impl StudioConfig {
    /// Load a configuration from a JSON file; missing keys take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let cfg: StudioConfig = serde_json::from_str(&raw)
            .map_err(|e| Error::ConfigError(format!("{}: {}", path.display(), e)))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if !(2..=4).contains(&self.supersample) {
            return Err(Error::ConfigError(format!(
                "supersample must be between 2 and 4, got {}",
                self.supersample
            )));
        }
        if !(self.preview_scale > 0.0 && self.preview_scale <= 1.0) {
            return Err(Error::ConfigError(format!(
                "preview_scale must be in (0, 1], got {}",
                self.preview_scale
            )));
        }
        if !(self.page.width > 0.0 && self.page.height > 0.0) {
            return Err(Error::ConfigError("page dimensions must be positive".into()));
        }
        if self.target_id.trim().is_empty() {
            return Err(Error::ConfigError("target_id must not be empty".into()));
        }
        Ok(())
    }
}
