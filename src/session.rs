//! Session controller
//!
//! A [`Session`] owns the single [`PosterRecord`], the selected template, the
//! [`LayoutHost`] and the [`Exporter`]. Edits replace the whole record and
//! re-render both hosted instances before the new record becomes current.
//! Exports and enhancements never let an error escape: each outcome is turned
//! into a [`Notification`] for the user.

use chrono::NaiveDate;
use log::error;

use crate::enhance::{self, Provider, TextEnhancer};
use crate::export::{DownloadSink, ExportFormat, ExportReport, Exporter};
use crate::host::LayoutHost;
use crate::record::{Field, PosterRecord};
use crate::template::{self, TemplateDescriptor, TemplateId};
use crate::{Error, Result, StudioConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// User-facing outcome of an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
}

impl Notification {
    fn success(title: &str, message: String) -> Self {
        Self {
            kind: NotificationKind::Success,
            title: title.to_string(),
            message,
        }
    }

    fn failure(title: &str, err: &Error) -> Self {
        error!("{}: {}", title, err);
        let mut message = err.user_message();
        if err.is_retryable() && !message.contains("try") {
            message.push_str(" You can try again.");
        }
        Self {
            kind: NotificationKind::Error,
            title: title.to_string(),
            message,
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == NotificationKind::Error
    }
}

pub struct Session {
    config: StudioConfig,
    record: PosterRecord,
    template: TemplateId,
    host: LayoutHost,
    exporter: Exporter,
    sink: Box<dyn DownloadSink>,
}

impl Session {
    /// Starts a session on the first catalog template.
    pub fn new(config: StudioConfig, record: PosterRecord, sink: Box<dyn DownloadSink>) -> Result<Self> {
        let exporter = Exporter::new(&config)?;
        let template = TemplateId::default();
        let mut host = LayoutHost::new(config.target_id.clone(), config.preview_scale);
        host.mount(&record, template.descriptor())?;
        Ok(Self {
            config,
            record,
            template,
            host,
            exporter,
            sink,
        })
    }

    /// Uses `clock` for the date in download names.
    pub fn with_clock<F>(mut self, clock: F) -> Self
    where
        F: Fn() -> NaiveDate + Send + Sync + 'static,
    {
        self.exporter = self.exporter.with_clock(clock);
        self
    }

    pub fn config(&self) -> &StudioConfig {
        &self.config
    }

    pub fn record(&self) -> &PosterRecord {
        &self.record
    }

    pub fn template(&self) -> &'static TemplateDescriptor {
        self.template.descriptor()
    }

    pub fn host(&self) -> &LayoutHost {
        &self.host
    }

    pub fn exporter_mut(&mut self) -> &mut Exporter {
        &mut self.exporter
    }

    /// Form fields that affect the selected template's output.
    pub fn relevant_fields(&self) -> Vec<Field> {
        let style = &self.template().style;
        Field::ALL
            .into_iter()
            .filter(|f| style.surfaces(*f))
            .collect()
    }

    /// Whether the key points list affects the selected template's output.
    pub fn shows_points(&self) -> bool {
        self.template().style.surfaces_points()
    }

    /// Replaces the record and re-renders. On failure nothing changes.
    pub fn replace_record(&mut self, record: PosterRecord) -> Result<()> {
        self.host.mount(&record, self.template.descriptor())?;
        self.record = record;
        Ok(())
    }

    pub fn edit(&mut self, field: Field, value: Option<&str>) -> Result<()> {
        self.replace_record(self.record.with(field, value))
    }

    pub fn add_point(&mut self) -> Result<()> {
        self.replace_record(self.record.with_point_added())
    }

    pub fn set_point(&mut self, index: usize, value: &str) -> Result<()> {
        self.replace_record(self.record.with_point(index, value))
    }

    pub fn remove_point(&mut self, index: usize) -> Result<()> {
        self.replace_record(self.record.with_point_removed(index))
    }

    /// Switches to the template with identifier `id`.
    pub fn select_template(&mut self, id: &str) -> Result<()> {
        let descriptor = template::find(id)?;
        self.host.mount(&self.record, descriptor)?;
        self.template = descriptor.id;
        Ok(())
    }

    /// Removes the capture target; exports fail until [`Session::remount`].
    pub fn unmount(&mut self) {
        self.host.unmount();
    }

    pub fn remount(&mut self) -> Result<()> {
        self.host.mount(&self.record, self.template.descriptor())
    }

    /// Runs one export and returns its report or error unchanged.
    pub async fn try_export(&self, format: ExportFormat) -> Result<ExportReport> {
        let target = &self.config.target_id;
        match format {
            ExportFormat::Png => {
                self.exporter
                    .export_as_image(&self.host, target, self.sink.as_ref())
                    .await
            }
            ExportFormat::Pdf => {
                self.exporter
                    .export_as_document(&self.host, target, self.sink.as_ref())
                    .await
            }
        }
    }

    pub async fn export_image(&self) -> Notification {
        self.export(ExportFormat::Png).await
    }

    pub async fn export_document(&self) -> Notification {
        self.export(ExportFormat::Pdf).await
    }

    async fn export(&self, format: ExportFormat) -> Notification {
        match self.try_export(format).await {
            Ok(report) => Notification::success(
                "Export complete",
                format!("Poster saved as {}", report.file_name),
            ),
            Err(e) => Notification::failure("Export failed", &e),
        }
    }

    /// Enhances the description and additional information with keys from
    /// the process environment.
    pub fn enhance(&mut self, provider: Provider, enhancer: &dyn TextEnhancer) -> Notification {
        self.enhance_using(provider, |key| std::env::var(key).ok(), enhancer)
    }

    /// Like [`Session::enhance`], reading keys through `lookup`.
    pub fn enhance_using<F>(&mut self, provider: Provider, lookup: F, enhancer: &dyn TextEnhancer) -> Notification
    where
        F: Fn(&str) -> Option<String>,
    {
        let outcome = enhance::credentials(provider, lookup)
            .and_then(|creds| enhance::enhance(&self.record, &creds, enhancer))
            .and_then(|record| self.replace_record(record));
        match outcome {
            Ok(()) => Notification::success(
                "Content enhanced",
                format!("Description and details rewritten with {}", provider),
            ),
            Err(e) => Notification::failure("Enhancement failed", &e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enhance::{Credentials, EnhanceRequest};
    use crate::export::MemorySink;
    use crate::rendering::ElementType;

    fn session() -> Session {
        let config = StudioConfig {
            supersample: 2,
            ..Default::default()
        };
        Session::new(config, PosterRecord::seed(), Box::new(MemorySink::new())).unwrap()
    }

    #[test]
    fn edits_rerender_the_host() {
        let mut s = session();
        s.edit(Field::Title, Some("Open Day")).unwrap();
        let title = s
            .host()
            .onscreen()
            .unwrap()
            .composition
            .find(ElementType::Title)
            .map(|n| n.text());
        assert_eq!(title.as_deref(), Some("Open Day"));
        assert_eq!(s.record().title.as_deref(), Some("Open Day"));
    }

    #[test]
    fn unknown_template_keeps_the_current_one() {
        let mut s = session();
        s.select_template("template4").unwrap();
        assert!(matches!(s.select_template("nope"), Err(Error::UnknownTemplate(_))));
        assert_eq!(s.template().id, TemplateId::Template4);
        assert_eq!(s.host().template(), Some(TemplateId::Template4));
    }

    #[test]
    fn relevant_fields_follow_the_template() {
        let mut s = session();
        assert!(s.relevant_fields().contains(&Field::AdditionalInfo));
        assert!(!s.relevant_fields().contains(&Field::Image));
        s.select_template("template4").unwrap();
        assert!(s.relevant_fields().contains(&Field::Image));
        assert!(!s.relevant_fields().contains(&Field::AdditionalInfo));
    }

    #[test]
    fn points_input_only_for_the_image_template() {
        let mut s = session();
        for id in ["template1", "template2", "template3"] {
            s.select_template(id).unwrap();
            assert!(!s.shows_points(), "{}", id);
        }
        s.select_template("template4").unwrap();
        assert!(s.shows_points());
    }

    #[test]
    fn point_editing_goes_through_the_record() {
        let mut s = session();
        s.select_template("template4").unwrap();
        s.add_point().unwrap();
        s.set_point(0, "Water").unwrap();
        s.add_point().unwrap();
        s.set_point(1, "Soil").unwrap();
        s.remove_point(0).unwrap();
        assert_eq!(s.record().points(), ["Soil"]);
        let composition = s.host().onscreen().unwrap().composition;
        assert_eq!(composition.point_texts(), vec!["Soil".to_string()]);
    }

    #[tokio::test]
    async fn export_without_target_becomes_a_notification() {
        let mut s = session();
        s.unmount();
        let note = s.export_image().await;
        assert!(note.is_error());
        assert_eq!(note.title, "Export failed");
        assert!(note.message.contains("Select a template"));
    }

    struct Broken;

    impl TextEnhancer for Broken {
        fn complete(&self, _: &Credentials, _: &EnhanceRequest) -> Result<String> {
            Ok("Sure! Here is your text.".to_string())
        }
    }

    #[test]
    fn enhancement_failures_leave_the_record_alone() {
        let mut s = session();
        let before = s.record().clone();

        let note = s.enhance_using(Provider::OpenAi, |_| None, &Broken);
        assert!(note.is_error());
        assert!(note.message.contains("OPENAI_API_KEY"));

        let note = s.enhance_using(Provider::OpenAi, |_| Some("key".to_string()), &Broken);
        assert!(note.is_error());
        assert!(note.message.contains("try again"));
        assert_eq!(s.record(), &before);
    }
}
