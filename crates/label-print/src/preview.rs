//! Label preview images.
//!
//! Markup is rasterized by an external service; a preview is a convenience
//! and its failures never block printing.

use std::time::Duration;

use label_model::{Dpi, Template};
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;

use crate::config::PreviewSettings;
use crate::error::PreviewError;

/// Turns label markup into a PNG image.
pub trait PreviewRasterizer {
    /// `width` and `height` are in inches.
    fn rasterize(
        &self,
        markup: &str,
        dots_per_mm: u8,
        width: f64,
        height: f64,
    ) -> Result<Vec<u8>, PreviewError>;
}

/// Outcome of a preview request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewState {
    /// PNG bytes.
    Ready(Vec<u8>),
    /// No image, with the reason shown to the user.
    Unavailable(String),
}

impl PreviewState {
    pub fn image(&self) -> Option<&[u8]> {
        match self {
            Self::Ready(bytes) => Some(bytes),
            Self::Unavailable(_) => None,
        }
    }
}

/// Client for the Labelary rendering API.
#[derive(Debug, Clone)]
pub struct LabelaryClient {
    client: Client,
    base_url: String,
}

impl LabelaryClient {
    pub fn new(settings: &PreviewSettings) -> Result<Self, PreviewError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs.max(1)))
            .build()
            .map_err(|e| PreviewError::Client(e.to_string()))?;
        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Endpoint for one label of the given density and size.
    pub fn label_url(&self, dots_per_mm: u8, width: f64, height: f64) -> String {
        format!(
            "{}/printers/{dots_per_mm}dpmm/labels/{width}x{height}/0/",
            self.base_url
        )
    }
}

impl PreviewRasterizer for LabelaryClient {
    fn rasterize(
        &self,
        markup: &str,
        dots_per_mm: u8,
        width: f64,
        height: f64,
    ) -> Result<Vec<u8>, PreviewError> {
        let url = self.label_url(dots_per_mm, width, height);
        tracing::debug!(url = %url, "requesting label preview");

        let response = self
            .client
            .post(&url)
            .header(ACCEPT, "image/png")
            .body(markup.as_bytes().to_vec())
            .send()
            .map_err(|e| PreviewError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(PreviewError::Status {
                status: status.as_u16(),
                body,
            });
        }
        let bytes = response
            .bytes()
            .map_err(|e| PreviewError::Transport(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

/// Previews `markup` using the geometry of `template`.
///
/// Blank markup or missing geometry yields [`PreviewState::Unavailable`]
/// without contacting the service.
pub fn preview_markup(
    rasterizer: &dyn PreviewRasterizer,
    template: &Template,
    markup: &str,
) -> PreviewState {
    if markup.trim().is_empty() {
        return PreviewState::Unavailable("template has no markup".to_string());
    }
    let Some(dpi) = template.dpi else {
        return PreviewState::Unavailable("label density (dpi) is not set".to_string());
    };
    let (Some(width), Some(height)) = (template.width, template.height) else {
        return PreviewState::Unavailable("label width and height are not set".to_string());
    };
    if width <= 0.0 || height <= 0.0 {
        return PreviewState::Unavailable(format!(
            "label size {width}x{height} is not printable"
        ));
    }

    match rasterizer.rasterize(markup, dpi.dots_per_mm(), width, height) {
        Ok(image) => PreviewState::Ready(image),
        Err(e) => {
            tracing::warn!(template = %template.name, error = %e, "preview failed");
            PreviewState::Unavailable(format!("Preview failed: {e}"))
        }
    }
}

/// Previews the unrendered template markup.
pub fn preview_template(rasterizer: &dyn PreviewRasterizer, template: &Template) -> PreviewState {
    preview_markup(rasterizer, template, &template.markup)
}

/// Density for a raw dots-per-inch value, if the rasterizer supports it.
pub fn preview_density(dots_per_inch: u16) -> Option<u8> {
    Dpi::try_from(dots_per_inch).ok().map(Dpi::dots_per_mm)
}
