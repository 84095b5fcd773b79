//! Raster and document export
//!
//! Both formats share one capture step: the offscreen capture target is
//! located by its stable identifier and rasterized at the supersampling
//! multiplier. Only then does the pipeline branch into PNG or PDF encoding.
//! Every export walks the phase machine
//!
//! ```text
//! Idle -> Capturing -> Encoding -> Downloading -> Idle
//!            \            \
//!             `-----------`--> Failed -> Idle
//! ```
//!
//! and at most one export runs at a time per [`Exporter`].

pub mod document;
pub mod download;
pub mod placement;

use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::NaiveDate;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::host::LayoutHost;
use crate::rendering::{Bitmap, ElementType};
use crate::{Error, PageSize, Result, StudioConfig};

pub use document::{write_document, DocumentInfo};
pub use download::{Artifact, DirectorySink, DownloadSink, MemorySink};
pub use placement::{letterbox, PagePlacement};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Png,
    Pdf,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Pdf => "pdf",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Pdf => "application/pdf",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Png => f.write_str("PNG"),
            ExportFormat::Pdf => f.write_str("PDF"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportPhase {
    Idle,
    Capturing,
    Encoding,
    Downloading,
    Failed,
}

/// Download name for an export on `date`: `poster-YYYY-MM-DD.<ext>`.
pub fn export_filename(date: NaiveDate, format: ExportFormat) -> String {
    format!("poster-{}.{}", date.format("%Y-%m-%d"), format.extension())
}

/// Outcome of a completed export
#[derive(Debug, Clone, PartialEq)]
pub struct ExportReport {
    pub format: ExportFormat,
    pub file_name: String,
    pub path: PathBuf,
    /// Pixel size of the captured bitmap
    pub width: u32,
    pub height: u32,
    pub bytes: usize,
    /// Image placement on the page (documents only)
    pub placement: Option<PagePlacement>,
    /// SHA-256 of the captured pixels
    pub fingerprint: String,
}

type TransitionHandler = Arc<dyn Fn(ExportFormat, ExportPhase) + Send + Sync>;
type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

/// Releases the in-flight slot when the export ends, however it ends.
struct InFlight<'a> {
    slot: &'a Mutex<Option<ExportFormat>>,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        *lock(self.slot) = None;
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Runs image and document exports against a [`LayoutHost`]
pub struct Exporter {
    supersample: u32,
    page: PageSize,
    phase: Mutex<ExportPhase>,
    in_flight: Mutex<Option<ExportFormat>>,
    on_transition: Option<TransitionHandler>,
    clock: Clock,
}

impl Exporter {
    pub fn new(config: &StudioConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            supersample: config.supersample,
            page: config.page,
            phase: Mutex::new(ExportPhase::Idle),
            in_flight: Mutex::new(None),
            on_transition: None,
            clock: Arc::new(|| chrono::Local::now().date_naive()),
        })
    }

    /// Replaces the local-date clock used for download names.
    pub fn with_clock<F>(mut self, clock: F) -> Self
    where
        F: Fn() -> NaiveDate + Send + Sync + 'static,
    {
        self.clock = Arc::new(clock);
        self
    }

    /// Registers a callback invoked on every phase change.
    pub fn on_transition<F>(&mut self, cb: F)
    where
        F: Fn(ExportFormat, ExportPhase) + Send + Sync + 'static,
    {
        self.on_transition = Some(Arc::new(cb));
    }

    pub fn clear_on_transition(&mut self) {
        self.on_transition = None;
    }

    pub fn phase(&self) -> ExportPhase {
        *lock(&self.phase)
    }

    pub fn supersample(&self) -> u32 {
        self.supersample
    }

    /// Captures the target and downloads it as `poster-<date>.png`.
    pub async fn export_as_image(
        &self,
        host: &LayoutHost,
        target_id: &str,
        sink: &dyn DownloadSink,
    ) -> Result<ExportReport> {
        self.run(ExportFormat::Png, host, target_id, sink).await
    }

    /// Captures the target, places it on a single page and downloads it as
    /// `poster-<date>.pdf`.
    pub async fn export_as_document(
        &self,
        host: &LayoutHost,
        target_id: &str,
        sink: &dyn DownloadSink,
    ) -> Result<ExportReport> {
        self.run(ExportFormat::Pdf, host, target_id, sink).await
    }

    fn acquire(&self, format: ExportFormat) -> Result<InFlight<'_>> {
        let mut slot = lock(&self.in_flight);
        if let Some(running) = *slot {
            warn!("{} export rejected: a {} export is in flight", format, running);
            return Err(Error::ExportInProgress(running));
        }
        *slot = Some(format);
        Ok(InFlight {
            slot: &self.in_flight,
        })
    }

    fn transition(&self, format: ExportFormat, phase: ExportPhase) {
        *lock(&self.phase) = phase;
        debug!("{} export: {:?}", format, phase);
        if let Some(cb) = &self.on_transition {
            cb(format, phase);
        }
    }

    fn fail(&self, format: ExportFormat, err: Error) -> Error {
        self.transition(format, ExportPhase::Failed);
        self.transition(format, ExportPhase::Idle);
        err
    }

    async fn capture(&self, host: &LayoutHost, target_id: &str) -> Result<(Bitmap, Option<String>)> {
        let element = host.element(target_id)?;
        let title = element
            .composition
            .find(ElementType::Title)
            .map(|node| node.text());
        let bitmap = element.capture(self.supersample as f32).await?;
        let expected = element.box_size().scaled(self.supersample as f32);
        if (bitmap.width(), bitmap.height()) != expected {
            return Err(Error::RenderError(format!(
                "capture is {}x{}, expected {}x{}",
                bitmap.width(),
                bitmap.height(),
                expected.0,
                expected.1
            )));
        }
        Ok((bitmap, title))
    }

    fn encode(
        &self,
        format: ExportFormat,
        bitmap: &Bitmap,
        title: Option<&str>,
        date: NaiveDate,
    ) -> Result<(Vec<u8>, Option<PagePlacement>)> {
        match format {
            ExportFormat::Png => Ok((bitmap.encode_png()?, None)),
            ExportFormat::Pdf => {
                let info = DocumentInfo { title, date };
                let (bytes, placement) = write_document(bitmap, self.page, &info)?;
                Ok((bytes, Some(placement)))
            }
        }
    }

    async fn run(
        &self,
        format: ExportFormat,
        host: &LayoutHost,
        target_id: &str,
        sink: &dyn DownloadSink,
    ) -> Result<ExportReport> {
        let _slot = self.acquire(format)?;

        self.transition(format, ExportPhase::Capturing);
        let (bitmap, title) = match self.capture(host, target_id).await {
            Ok(captured) => captured,
            Err(e) => return Err(self.fail(format, e)),
        };

        self.transition(format, ExportPhase::Encoding);
        let date = (self.clock)();
        let (bytes, placement) = match self.encode(format, &bitmap, title.as_deref(), date) {
            Ok(encoded) => encoded,
            Err(e) => return Err(self.fail(format, e)),
        };

        self.transition(format, ExportPhase::Downloading);
        let file_name = export_filename(date, format);
        let size = bytes.len();
        let artifact = Artifact {
            file_name: file_name.clone(),
            mime_type: format.mime_type(),
            bytes,
        };
        let path = match sink.deliver(artifact) {
            Ok(path) => path,
            Err(e) => return Err(self.fail(format, e)),
        };
        self.transition(format, ExportPhase::Idle);
        info!("exported {} ({} bytes)", file_name, size);

        Ok(ExportReport {
            format,
            file_name,
            path,
            width: bitmap.width(),
            height: bitmap.height(),
            bytes: size,
            placement,
            fingerprint: bitmap.fingerprint(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::PosterRecord;
    use crate::template::TemplateId;

    fn config() -> StudioConfig {
        StudioConfig {
            supersample: 2,
            ..Default::default()
        }
    }

    fn fixed_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, 4).unwrap()
    }

    #[test]
    fn filenames_follow_the_date() {
        assert_eq!(export_filename(fixed_date(), ExportFormat::Png), "poster-2025-11-04.png");
        assert_eq!(export_filename(fixed_date(), ExportFormat::Pdf), "poster-2025-11-04.pdf");
    }

    #[test]
    fn exporter_rejects_invalid_config() {
        let cfg = StudioConfig {
            supersample: 1,
            ..Default::default()
        };
        assert!(Exporter::new(&cfg).is_err());
    }

    #[tokio::test]
    async fn missing_target_fails_without_download() {
        let host = LayoutHost::new("poster-preview", 0.5);
        let sink = MemorySink::new();
        let phases = Arc::new(Mutex::new(Vec::new()));
        let mut exporter = Exporter::new(&config()).unwrap();
        let seen = Arc::clone(&phases);
        exporter.on_transition(move |_, phase| seen.lock().unwrap().push(phase));

        let err = exporter
            .export_as_image(&host, "poster-preview", &sink)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ElementNotFound(_)));
        assert!(sink.artifacts().is_empty());
        assert_eq!(exporter.phase(), ExportPhase::Idle);
        assert_eq!(
            *phases.lock().unwrap(),
            vec![ExportPhase::Capturing, ExportPhase::Failed, ExportPhase::Idle]
        );
    }

    #[tokio::test]
    async fn successful_export_walks_every_phase() {
        let mut host = LayoutHost::new("poster-preview", 0.5);
        host.mount(&PosterRecord::seed(), TemplateId::Template1.descriptor())
            .unwrap();
        let sink = MemorySink::new();
        let phases = Arc::new(Mutex::new(Vec::new()));
        let mut exporter = Exporter::new(&config()).unwrap().with_clock(fixed_date);
        let seen = Arc::clone(&phases);
        exporter.on_transition(move |format, phase| seen.lock().unwrap().push((format, phase)));

        let report = exporter
            .export_as_image(&host, "poster-preview", &sink)
            .await
            .unwrap();
        assert_eq!(report.file_name, "poster-2025-11-04.png");
        assert_eq!((report.width, report.height), (1600, 2400));
        assert_eq!(
            *phases.lock().unwrap(),
            vec![
                (ExportFormat::Png, ExportPhase::Capturing),
                (ExportFormat::Png, ExportPhase::Encoding),
                (ExportFormat::Png, ExportPhase::Downloading),
                (ExportFormat::Png, ExportPhase::Idle),
            ]
        );
        let artifacts = sink.artifacts();
        assert_eq!(artifacts.len(), 1);
        assert_eq!(artifacts[0].mime_type, "image/png");
        assert_eq!(artifacts[0].bytes.len(), report.bytes);
    }

    #[test]
    fn slot_is_released_after_drop() {
        let exporter = Exporter::new(&config()).unwrap();
        {
            let _slot = exporter.acquire(ExportFormat::Png).unwrap();
            assert!(matches!(
                exporter.acquire(ExportFormat::Pdf),
                Err(Error::ExportInProgress(ExportFormat::Png))
            ));
        }
        assert!(exporter.acquire(ExportFormat::Pdf).is_ok());
    }
}
