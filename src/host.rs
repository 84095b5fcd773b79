//! Layout host
//!
//! Keeps the two renderings of the current (template, record) pair: the
//! offscreen instance at full canonical size, which export captures, and the
//! onscreen instance scaled down for the preview pane. Both are views of one
//! shared [`Composition`], so a re-render replaces them together and a reader
//! never observes one updated without the other.

use std::sync::Arc;

use log::debug;

use crate::record::PosterRecord;
use crate::rendering::{embed, raster, render, Bitmap, Composition};
use crate::template::{TemplateDescriptor, TemplateId};
use crate::{Canvas, Error, Result};

/// Horizontal offset that parks the offscreen instance outside the viewport.
pub const OFFSCREEN_LEFT: i32 = -9999;

/// Where a rendering is placed and how it is scaled
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// Laid out and paintable, positioned outside the visible viewport
    Offscreen { left: i32, top: i32 },
    /// Visually scaled with the transform anchored at the top edge
    Preview { scale: f32 },
}

/// A mounted rendering
#[derive(Debug, Clone)]
pub struct Element {
    /// Stable identifier; only the offscreen capture target carries one
    pub id: Option<String>,
    pub placement: Placement,
    pub composition: Arc<Composition>,
}

impl Element {
    /// The layout box, always the canonical canvas regardless of scaling.
    pub fn box_size(&self) -> Canvas {
        self.composition.canvas
    }

    pub fn scale(&self) -> f32 {
        match self.placement {
            Placement::Offscreen { .. } => 1.0,
            Placement::Preview { scale } => scale,
        }
    }

    /// Size the element occupies on screen after its visual transform.
    pub fn visual_size(&self) -> (u32, u32) {
        self.box_size().scaled(self.scale())
    }

    /// Captures the element at `multiplier` times its layout box.
    ///
    /// Suspends while embedded images decode; everything after that is
    /// synchronous.
    pub async fn capture(&self, multiplier: f32) -> Result<Bitmap> {
        let images = embed::load(&self.composition).await;
        raster::rasterize(&self.composition, multiplier, &images)
    }

    /// Pixels as shown on screen, at the element's own scale.
    pub async fn snapshot(&self) -> Result<Bitmap> {
        self.capture(self.scale()).await
    }
}

pub struct LayoutHost {
    target_id: String,
    preview_scale: f32,
    current: Option<Arc<Composition>>,
}

impl LayoutHost {
    pub fn new(target_id: impl Into<String>, preview_scale: f32) -> Self {
        Self {
            target_id: target_id.into(),
            preview_scale,
            current: None,
        }
    }

    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    /// Renders `record` with `template` and replaces both instances at once.
    /// On failure the previous renderings stay mounted.
    pub fn mount(&mut self, record: &PosterRecord, template: &TemplateDescriptor) -> Result<()> {
        let composition = render(record, template)?;
        debug!(
            "mounted {} as #{} ({} nodes)",
            template.id,
            self.target_id,
            composition.nodes.len()
        );
        self.current = Some(Arc::new(composition));
        Ok(())
    }

    pub fn unmount(&mut self) {
        if self.current.take().is_some() {
            debug!("unmounted #{}", self.target_id);
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.current.is_some()
    }

    pub fn template(&self) -> Option<TemplateId> {
        self.current.as_ref().map(|c| c.template)
    }

    pub fn offscreen(&self) -> Option<Element> {
        self.current.as_ref().map(|composition| Element {
            id: Some(self.target_id.clone()),
            placement: Placement::Offscreen {
                left: OFFSCREEN_LEFT,
                top: 0,
            },
            composition: Arc::clone(composition),
        })
    }

    pub fn onscreen(&self) -> Option<Element> {
        self.current.as_ref().map(|composition| Element {
            id: None,
            placement: Placement::Preview {
                scale: self.preview_scale,
            },
            composition: Arc::clone(composition),
        })
    }

    /// Looks a mounted element up by its stable identifier.
    pub fn element(&self, id: &str) -> Result<Element> {
        self.offscreen()
            .filter(|el| el.id.as_deref() == Some(id))
            .ok_or_else(|| Error::ElementNotFound(id.to_string()))
    }
}
