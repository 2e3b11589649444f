//! Waveform colours
//!
//! Default colours plus a YAML override so hosts can restyle the view from
//! their theme file without recompiling.

use serde::{Deserialize, Serialize};

use crate::surface::Rgba;

/// Waveform body colour
pub const WAVEFORM_COLOUR: Rgba = Rgba::new(52, 152, 219);

/// Reference lines at zero and ±full scale
pub const GRID_COLOUR: Rgba = Rgba::with_alpha(255, 255, 255, 60);

/// Selection marker
pub const SELECTION_COLOUR: Rgba = Rgba::with_alpha(255, 255, 50, 90);

/// Playback position marker
pub const PLAYBACK_COLOUR: Rgba = Rgba::with_alpha(255, 255, 255, 90);

/// Zoom readout text
pub const TEXT_COLOUR: Rgba = Rgba::new(255, 255, 255);

/// Colour set for one waveform view
///
/// Deserializable from YAML; missing fields fall back to the defaults above.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveformTheme {
    pub waveform: Rgba,
    pub grid: Rgba,
    pub selection: Rgba,
    pub playback: Rgba,
    pub text: Rgba,
}

impl Default for WaveformTheme {
    fn default() -> Self {
        Self {
            waveform: WAVEFORM_COLOUR,
            grid: GRID_COLOUR,
            selection: SELECTION_COLOUR,
            playback: PLAYBACK_COLOUR,
            text: TEXT_COLOUR,
        }
    }
}

impl WaveformTheme {
    /// Parse a theme from YAML, filling unspecified colours from defaults
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        let theme: Self = serde_yaml::from_str(yaml)?;
        log::debug!("Loaded waveform theme override");
        Ok(theme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_constants() {
        let theme = WaveformTheme::default();
        assert_eq!(theme.waveform, WAVEFORM_COLOUR);
        assert_eq!(theme.selection, SELECTION_COLOUR);
    }

    #[test]
    fn partial_yaml_override_keeps_defaults() {
        let theme =
            WaveformTheme::from_yaml("waveform: { r: 10, g: 20, b: 30, a: 255 }").unwrap();
        assert_eq!(theme.waveform, Rgba::new(10, 20, 30));
        assert_eq!(theme.grid, GRID_COLOUR, "Unspecified fields keep defaults");
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        assert!(WaveformTheme::from_yaml("waveform: [nope").is_err());
    }
}
