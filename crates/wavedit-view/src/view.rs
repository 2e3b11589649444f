//! Waveform view controller
//!
//! Owns the live view state for one open waveform: horizontal offset and
//! zoom with their blend targets, the smoothed playback marker, and the
//! selection anchors. Each frame the host calls [`WaveformView::advance`]
//! with the input snapshot and elapsed time, then [`WaveformView::render`]
//! with the target bitmap.
//!
//! All interior math is defensive: indices and offsets are clamped rather
//! than checked, and nothing in the per-frame path can fail. The only
//! boundary validation is the zero-area surface check in `render`.

use wavedit_core::{Sample, Timeline, FULL_SCALE, SAMPLE_RANGE};

use crate::error::{ViewError, ViewResult};
use crate::input::{InputSnapshot, Key};
use crate::surface::{Bitmap, Rgba};
use crate::theme::WaveformTheme;

// =============================================================================
// Tuning constants
// =============================================================================

/// Zoom multiplier per mouse-wheel tick
const WHEEL_ZOOM_INCREMENT: f64 = 1.2;

/// Keyboard zoom rate (multiplicative, per second)
const KEY_ZOOM_RATE: f64 = 1.3;

/// Page up/down applies the keyboard zoom factor scaled by this much
const PAGE_ZOOM_MULTIPLIER: f64 = 8.0;

/// Samples scrolled per second by the arrow keys, per samples-per-pixel
const KEY_SCROLL_RATE: f64 = 1000.0;

/// Inertial flick strength on middle-button release
const FLICK_MULTIPLIER: f64 = 50.0;

/// Exponential blend rate toward the zoom target (per second)
const ZOOM_BLEND_RATE: f64 = 8.0;

/// Exponential blend rate toward the offset target (per second)
const OFFSET_BLEND_RATE: f64 = 3.0;

/// Playback jumps larger than this snap instead of blending (seek)
const PLAYBACK_SNAP_THRESHOLD: f64 = 10_000.0;

/// Per-frame blend fraction for continuous playback marker motion
const PLAYBACK_BLEND: f64 = 0.1;

/// Gamma exponent for the anti-aliased marker's sub-pixel opacity split
const MARKER_GAMMA: f64 = 0.75;

/// Offset/zoom within this of their target counts as converged
const CONVERGENCE_EPSILON: f64 = 1e-5;

fn nearly_equal(a: f64, b: f64) -> bool {
    (a - b).abs() < CONVERGENCE_EPSILON
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    (1.0 - t) * a + t * b
}

// =============================================================================
// Frame outcome
// =============================================================================

/// What one `advance` call tells the host frame loop
#[derive(Debug, Clone, Copy)]
pub struct FrameOutcome {
    /// An offset/zoom animation is still in flight; the host must schedule
    /// another frame soon instead of entering idle sleep
    pub needs_redraw: bool,
}

// =============================================================================
// View controller
// =============================================================================

/// View state and physics for one open waveform
///
/// Starts uninitialized (`zoom < 0`); the first `render` call switches it
/// live with the full sound fitted to the viewport.
#[derive(Debug, Clone)]
pub struct WaveformView {
    /// Sample index at the viewport's left edge
    offset: f64,
    target_offset: f64,
    /// Samples per pixel; negative until the first render
    zoom: f64,
    target_zoom: f64,

    /// Smoothed playback marker position, -1 when no playback yet
    playback_pos: f64,

    /// Selection anchor sample indices, -1 = unset
    selection_start: f64,
    selection_end: f64,

    /// Last-seen viewport width; min/max buffers are sized to match
    display_width: usize,
    display_mins: Vec<Sample>,
    display_maxes: Vec<Sample>,

    theme: WaveformTheme,
}

impl WaveformView {
    /// Create an uninitialized view with the default theme
    pub fn new() -> Self {
        Self::with_theme(WaveformTheme::default())
    }

    /// Create an uninitialized view with an explicit theme
    pub fn with_theme(theme: WaveformTheme) -> Self {
        Self {
            offset: 0.0,
            target_offset: 0.0,
            zoom: -1.0,
            target_zoom: -1.0,
            playback_pos: -1.0,
            selection_start: -1.0,
            selection_end: -1.0,
            display_width: 0,
            display_mins: Vec::new(),
            display_maxes: Vec::new(),
            theme,
        }
    }

    /// Whether the first render has happened
    pub fn is_live(&self) -> bool {
        self.zoom >= 0.0
    }

    /// Current samples-per-pixel
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Current sample index at the viewport's left edge
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Selection range as (start, end); either may be -1 when unset
    pub fn selection(&self) -> (f64, f64) {
        (self.selection_start, self.selection_end)
    }

    /// Smoothed playback marker position, -1 when no playback yet
    pub fn playback_pos(&self) -> f64 {
        self.playback_pos
    }

    // =========================================================================
    // Coordinate mapping
    // =========================================================================

    /// Sample index under a screen column (nearest sample)
    pub fn sample_index_from_screen_pos(&self, screen_x: i32) -> i64 {
        (self.offset + screen_x as f64 * self.zoom + 0.5).floor() as i64
    }

    /// Fractional screen column of a sample index
    pub fn screen_pos_from_sample_index(&self, sample_idx: i64) -> f64 {
        self.screen_pos(sample_idx as f64)
    }

    fn screen_pos(&self, sample_idx: f64) -> f64 {
        (sample_idx - self.offset) / self.zoom
    }

    // =========================================================================
    // Per-frame advance
    // =========================================================================

    /// Advance the view state by one frame
    ///
    /// `dt` is wall-clock seconds since the previous frame, from the host's
    /// monotonic clock. Inert until the first `render` has initialized the
    /// zoom.
    pub fn advance(&mut self, timeline: &Timeline, input: &InputSnapshot, dt: f64) -> FrameOutcome {
        if self.zoom < 0.0 {
            return FrameOutcome { needs_redraw: false };
        }

        self.advance_selection(input);

        let zoom_before = self.zoom;
        let length = timeline.len() as f64;
        let width = self.display_width as f64;

        // Mouse wheel: wheel-away zooms out, wheel-toward zooms in
        if input.wheel_delta < 0.0 {
            self.target_zoom *= WHEEL_ZOOM_INCREMENT;
        } else if input.wheel_delta > 0.0 {
            self.target_zoom /= WHEEL_ZOOM_INCREMENT;
        }

        // Middle-button drag pans 1:1; the target tracks one drag delta
        // ahead so release never snaps back. Residual velocity on the
        // release frame becomes an inertial flick on the target only.
        if input.mmb_held {
            self.offset -= input.mouse_vel_x * self.zoom;
            self.target_offset = self.offset - input.mouse_vel_x * self.zoom;
        } else if input.mmb_released {
            self.target_offset -= input.mouse_vel_x * self.zoom * FLICK_MULTIPLIER;
        }

        // Keyboard zoom
        let key_zoom = 1.0 + KEY_ZOOM_RATE * dt;
        if input.is_held(Key::Up) {
            self.target_zoom /= key_zoom;
        }
        if input.is_held(Key::Down) {
            self.target_zoom *= key_zoom;
        }
        if input.is_pressed(Key::PageUp) {
            self.target_zoom /= key_zoom * PAGE_ZOOM_MULTIPLIER;
        }
        if input.is_pressed(Key::PageDown) {
            self.target_zoom *= key_zoom * PAGE_ZOOM_MULTIPLIER;
        }

        // Keyboard scroll
        let scroll_impulse = KEY_SCROLL_RATE * self.zoom * dt;
        if input.is_held(Key::Left) {
            self.target_offset -= scroll_impulse;
        }
        if input.is_held(Key::Right) {
            self.target_offset += scroll_impulse;
        }
        if input.is_pressed(Key::Home) {
            self.target_offset = 0.0;
        } else if input.is_pressed(Key::End) {
            self.target_offset = length - width * self.zoom;
        }

        // Keep the zoom target inside [1, full extent]
        let max_zoom = (length / width).max(1.0);
        self.target_zoom = self.target_zoom.clamp(1.0, max_zoom);

        // Critically damped, frame-rate independent blending
        self.zoom = lerp(self.zoom, self.target_zoom, ZOOM_BLEND_RATE * dt);
        self.offset = lerp(self.offset, self.target_offset, OFFSET_BLEND_RATE * dt);

        // Compensate the offset for this frame's zoom change so the focal
        // point stays pinned on screen: the selection start if one is
        // visible, otherwise the viewport centre.
        if width * zoom_before > 0.0 {
            let samples_visible = width * zoom_before;
            let mut focus = (self.selection_start - self.offset) / samples_visible;
            if !(0.0..=1.0).contains(&focus) {
                focus = 0.5;
            }

            let zoom_ratio = zoom_before / self.zoom;
            let correction = if zoom_ratio < 1.0 {
                (zoom_ratio - 1.0) * samples_visible * focus / zoom_ratio
            } else {
                -((1.0 - zoom_ratio) * samples_visible) * focus / zoom_ratio
            };
            self.offset += correction;
            self.target_offset += correction;
        }

        // Final bounds clamp against the post-blend zoom
        let max_offset = (length - width * self.zoom).max(0.0);
        self.offset = self.offset.clamp(0.0, max_offset);
        self.target_offset = self.target_offset.clamp(0.0, max_offset);

        let needs_redraw = !nearly_equal(self.zoom, self.target_zoom)
            || !nearly_equal(self.offset, self.target_offset);

        self.advance_playback_pos(timeline.playback_idx());

        FrameOutcome { needs_redraw }
    }

    /// Click anchors the selection; dragging extends its end
    fn advance_selection(&mut self, input: &InputSnapshot) {
        if input.lmb_clicked {
            self.selection_start = self.sample_index_from_screen_pos(input.mouse_x) as f64;
            self.selection_end = -1.0;
        } else if input.lmb_held && self.selection_start >= 0.0 {
            self.selection_end = self.sample_index_from_screen_pos(input.mouse_x) as f64;
        }
    }

    /// Track the authoritative playback index: snap on seeks, blend during
    /// continuous playback to avoid visual jitter
    fn advance_playback_pos(&mut self, target_idx: f64) {
        if target_idx < 0.0 {
            return;
        }
        if target_idx > self.playback_pos + PLAYBACK_SNAP_THRESHOLD {
            self.playback_pos = target_idx;
        } else {
            self.playback_pos =
                target_idx * PLAYBACK_BLEND + self.playback_pos * (1.0 - PLAYBACK_BLEND);
        }
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Render the waveform, markers and zoom readout into `bmp`
    ///
    /// The first call initializes the zoom so the whole sound fits the
    /// viewport. Errors only on a zero-area surface.
    pub fn render(&mut self, timeline: &Timeline, bmp: &mut Bitmap) -> ViewResult<()> {
        if bmp.width() == 0 || bmp.height() == 0 {
            return Err(ViewError::EmptyViewport {
                width: bmp.width(),
                height: bmp.height(),
            });
        }

        if self.zoom < 0.0 {
            self.zoom = timeline.len() as f64 / bmp.width() as f64;
            self.target_zoom = self.zoom;
            log::debug!(
                "Waveform view live: {} samples at {:.1} samples/pixel",
                timeline.len(),
                self.zoom
            );
        }

        self.update_display_size(bmp.width());

        let v_zoom =
            bmp.height() as f64 / (SAMPLE_RANGE as f64 * timeline.num_channels() as f64);

        self.render_waveform(timeline, bmp, v_zoom);

        if self.selection_start >= 0.0 {
            self.render_marker(bmp, self.selection_start, self.theme.selection);
        }
        if self.selection_end >= 0.0 {
            self.render_marker(bmp, self.selection_end, self.theme.selection);
        }
        if timeline.playback_idx() >= 0.0 {
            self.render_marker(bmp, self.playback_pos, self.theme.playback);
        }

        let label = format!("Zoom: {:.1}", self.zoom);
        bmp.draw_text_right(
            bmp.width() as i64 - 5,
            bmp.height() as i64 - 20,
            &label,
            self.theme.text,
        );

        Ok(())
    }

    /// Reallocate the per-pixel min/max buffers when the viewport resizes
    fn update_display_size(&mut self, pixel_width: usize) {
        if self.display_width == pixel_width {
            return;
        }
        log::debug!(
            "Display buffers resized {} -> {} columns",
            self.display_width,
            pixel_width
        );
        self.display_width = pixel_width;
        self.display_mins = vec![0; pixel_width];
        self.display_maxes = vec![0; pixel_width];
    }

    /// Decimated columns plus the zero/full-scale reference lines, one band
    /// per channel stacked vertically
    fn render_waveform(&mut self, timeline: &Timeline, bmp: &mut Bitmap, v_zoom: f64) {
        let channel_height = (bmp.height() / timeline.num_channels()) as i64;

        for (chan_idx, chan) in timeline.channels().iter().enumerate() {
            chan.calc_display_data(
                self.offset as i64,
                &mut self.display_mins,
                &mut self.display_maxes,
                self.zoom,
            );

            let y_mid = channel_height * chan_idx as i64 + channel_height / 2;

            for x in 0..self.display_width {
                let amplitude = self.display_maxes[x] as i32 - self.display_mins[x] as i32;
                let vline_len = (amplitude as f64 * v_zoom) as i64;
                let y = (y_mid as f64 - self.display_maxes[x] as f64 * v_zoom).ceil() as i64;
                if vline_len == 0 {
                    bmp.put_pixel(x as i64, y, self.theme.waveform);
                } else {
                    bmp.vline(x as i64, y, vline_len, self.theme.waveform);
                }
            }

            let full_scale_span = (FULL_SCALE as f64 * v_zoom) as i64;
            let width = self.display_width as i64;
            bmp.hline(0, y_mid - full_scale_span, width, self.theme.grid);
            bmp.hline(0, y_mid, width, self.theme.grid);
            bmp.hline(0, y_mid + full_scale_span, width, self.theme.grid);
        }
    }

    /// Full-height vertical marker with sub-pixel positioning: the two
    /// adjacent columns split the opacity by the fractional position,
    /// gamma-corrected so the marker reads as one smooth line
    fn render_marker(&self, bmp: &mut Bitmap, sample_idx: f64, colour: Rgba) {
        let x = self.screen_pos(sample_idx);
        let fractional = x - x.floor();
        let height = bmp.height() as i64;

        let left_alpha = colour.a as f64 * (1.0 - fractional).powf(MARKER_GAMMA);
        bmp.vline(x.floor() as i64, 0, height, colour.alpha(left_alpha as u8));

        let right_alpha = colour.a as f64 * fractional.powf(MARKER_GAMMA);
        bmp.vline(x.ceil() as i64, 0, height, colour.alpha(right_alpha as u8));
    }
}

impl Default for WaveformView {
    fn default() -> Self {
        Self::new()
    }
}
