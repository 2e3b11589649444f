//! Per-frame input snapshot
//!
//! The host window/input system fills one `InputSnapshot` per frame and
//! hands it to [`crate::WaveformView::advance`]. The view never talks to the
//! windowing system directly.

/// Keys the waveform view reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum Key {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
    PageUp = 4,
    PageDown = 5,
    Home = 6,
    End = 7,
}

impl Key {
    /// Number of tracked keys
    pub const COUNT: usize = 8;
}

/// Pointer and keyboard state for one frame
///
/// `mouse_vel_x` is the pointer's horizontal movement in pixels since the
/// previous frame; while the middle button is held it doubles as the drag
/// delta, and on the release frame as the residual flick velocity.
/// `wheel_delta` is the vertical wheel movement this frame (negative =
/// wheel-away = zoom out).
#[derive(Debug, Clone, Default)]
pub struct InputSnapshot {
    /// Pointer x position in surface pixels
    pub mouse_x: i32,
    /// Pointer y position in surface pixels (unused by the waveform view
    /// itself; carried for host hit-testing)
    pub mouse_y: i32,
    /// Horizontal pointer movement since the previous frame, in pixels
    pub mouse_vel_x: f64,
    /// Vertical wheel movement this frame
    pub wheel_delta: f64,
    /// Primary button went down this frame
    pub lmb_clicked: bool,
    /// Primary button is held
    pub lmb_held: bool,
    /// Middle button is held
    pub mmb_held: bool,
    /// Middle button came up this frame
    pub mmb_released: bool,

    held: [bool; Key::COUNT],
    pressed: [bool; Key::COUNT],
}

impl InputSnapshot {
    /// Mark a key as held this frame
    pub fn hold(&mut self, key: Key) {
        self.held[key as usize] = true;
    }

    /// Mark a key-down event this frame (implies held)
    pub fn press(&mut self, key: Key) {
        self.pressed[key as usize] = true;
        self.held[key as usize] = true;
    }

    /// Whether the key is held this frame
    pub fn is_held(&self, key: Key) -> bool {
        self.held[key as usize]
    }

    /// Whether the key went down this frame
    pub fn is_pressed(&self, key: Key) -> bool {
        self.pressed[key as usize]
    }
}
