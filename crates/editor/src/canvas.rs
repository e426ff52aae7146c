//! Canvas dimensions and background mode.

use std::fmt;
use std::str::FromStr;

use subdrawer_common::config::CanvasDefaults;
use subdrawer_pose_model::transform::ScaleRates;

/// What is shown behind the skeleton.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BackgroundMode {
    /// The source image, resized to the canvas height.
    #[default]
    OriginalImage,
    /// Plain black.
    BlackBg,
}

impl BackgroundMode {
    pub const ALL: [BackgroundMode; 2] = [BackgroundMode::OriginalImage, BackgroundMode::BlackBg];

    pub fn label(&self) -> &'static str {
        match self {
            BackgroundMode::OriginalImage => "Original Image",
            BackgroundMode::BlackBg => "Black BG",
        }
    }
}

impl fmt::Display for BackgroundMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown background mode: {0:?}")]
pub struct UnknownBackgroundMode(pub String);

/// Accepts the UI labels as well as the short forms used on the command line.
impl FromStr for BackgroundMode {
    type Err = UnknownBackgroundMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "original image" | "original_image" | "original" => Ok(BackgroundMode::OriginalImage),
            "black bg" | "black_bg" | "black" => Ok(BackgroundMode::BlackBg),
            _ => Err(UnknownBackgroundMode(s.to_string())),
        }
    }
}

/// Current canvas size (pixels) and background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasState {
    pub width: u32,
    pub height: u32,
    pub background: BackgroundMode,
}

impl CanvasState {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            background: BackgroundMode::default(),
        }
    }

    pub fn from_defaults(defaults: &CanvasDefaults) -> Self {
        Self::new(defaults.width, defaults.height)
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Rates that carry coordinates from this canvas to one of the given size.
    pub fn rates_to(&self, width: u32, height: u32) -> ScaleRates {
        ScaleRates::between(self.size(), (width, height))
    }

    /// Height that keeps the current aspect ratio at `new_width` (integer division).
    pub fn proportional_height(&self, new_width: u32) -> u32 {
        ((self.height as u64 * new_width as u64) / self.width as u64).max(1) as u32
    }
}
