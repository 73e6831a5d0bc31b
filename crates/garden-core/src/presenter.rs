//! Presentation Adapter trait and stub implementation.
//!
//! The core supplies symbolic sprite keys and tick coordinates; the
//! adapter owns pixels, compositing, and the placeholder substituted
//! when no asset exists for a computed key. The stub lets the keeper
//! and command surface be exercised end-to-end without an image
//! pipeline.

use garden_types::{PortraitRequest, StatSheetRequest};
use tracing::debug;

/// Errors the presentation adapter can surface.
#[derive(Debug, thiserror::Error)]
pub enum PresentError {
    /// The adapter failed to produce an image.
    #[error("render failed: {message}")]
    RenderFailed {
        /// Description of the failure.
        message: String,
    },
}

/// An opaque reference to a rendered image (a path, URL, or attachment
/// id, depending on the adapter).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef(pub String);

/// The rendering service consumed by the core.
pub trait Presenter: Send + Sync {
    /// Compose a pet portrait from background, body, eyes, and mouth
    /// sprite keys.
    fn render_pet_portrait(&self, request: &PortraitRequest) -> Result<ImageRef, PresentError>;

    /// Compose a stat sheet from tick positions, levels, and exp.
    fn render_stat_sheet(&self, request: &StatSheetRequest) -> Result<ImageRef, PresentError>;
}

/// A presenter that renders nothing and returns the would-be asset key.
///
/// Used in tests and headless runs to exercise the full pipeline
/// without an image backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubPresenter;

impl StubPresenter {
    /// Create a new stub presenter.
    pub const fn new() -> Self {
        Self
    }
}

impl Presenter for StubPresenter {
    fn render_pet_portrait(&self, request: &PortraitRequest) -> Result<ImageRef, PresentError> {
        debug!(body = %request.body, eyes = %request.eyes, "Stub portrait render");
        Ok(ImageRef(format!("stub://portrait/{}", request.body)))
    }

    fn render_stat_sheet(&self, request: &StatSheetRequest) -> Result<ImageRef, PresentError> {
        debug!(stats = request.levels.len(), "Stub stat sheet render");
        Ok(ImageRef(String::from("stub://stat-sheet")))
    }
}
