//! The shared 18-entry skeleton palette.

use subdrawer_pose_model::keypoint::CONNECTIONS;

/// An 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    pub const BLACK: Color = Color(0, 0, 0);

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self(r, g, b)
    }

    /// Palette entry for a connection index or a keypoint's position in its pose.
    pub fn from_palette(index: usize) -> Self {
        let [r, g, b] = SKELETON_COLORS[index % SKELETON_COLORS.len()];
        Self(r, g, b)
    }

    /// `#rrggbb`, as toolkit canvases expect.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }

    pub fn to_array(&self) -> [u8; 3] {
        [self.0, self.1, self.2]
    }
}

/// OpenPose-style skeleton palette.
pub const SKELETON_COLORS: [[u8; 3]; 18] = [
    [0, 0, 255],
    [255, 0, 0],
    [255, 170, 0],
    [255, 255, 0],
    [255, 85, 0],
    [170, 255, 0],
    [85, 255, 0],
    [0, 255, 0],
    [0, 255, 85],
    [0, 255, 170],
    [0, 255, 255],
    [0, 170, 255],
    [0, 85, 255],
    [85, 0, 255],
    [170, 0, 255],
    [255, 0, 255],
    [255, 0, 170],
    [255, 0, 85],
];

// Every connection needs its own color.
const _: () = assert!(SKELETON_COLORS.len() >= CONNECTIONS.len());
