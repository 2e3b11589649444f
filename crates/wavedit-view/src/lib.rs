//! Waveform view for wavedit
//!
//! The host frame loop drives one [`WaveformView::advance`] and one
//! [`WaveformView::render`] per frame, on the thread that owns the surface
//! and the input snapshot. Everything the view consumes is passed in
//! explicitly: the timeline, the per-frame [`InputSnapshot`], the frame
//! delta time, and the target [`Bitmap`].
//!
//! - **View state + physics**: `view` — offset/zoom targets, critically
//!   damped blending, focal-point correction, playback smoothing
//! - **Input snapshot**: `input` — plain per-frame pointer/key state
//! - **Surface**: `surface` — minimal software RGBA bitmap the renderer
//!   draws into
//! - **Theme**: `theme` — colour constants with a YAML override

pub mod error;
pub mod input;
pub mod surface;
pub mod theme;
pub mod view;

pub use error::{ViewError, ViewResult};
pub use input::{InputSnapshot, Key};
pub use surface::{Bitmap, Rgba};
pub use theme::WaveformTheme;
pub use view::{FrameOutcome, WaveformView};
