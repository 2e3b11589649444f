//! View error types

use thiserror::Error;

/// Errors reported at the view's boundary
///
/// Interior frame math never fails; it clamps. These errors only reject
/// malformed inputs before the view goes live.
#[derive(Error, Debug)]
pub enum ViewError {
    /// The render target has no pixels to draw into
    #[error("Render surface has zero area ({width}x{height})")]
    EmptyViewport { width: usize, height: usize },
}

/// Result type for view operations
pub type ViewResult<T> = Result<T, ViewError>;
