//! Off-screen raster used when exporting skeleton-only images.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut, draw_polygon_mut};
use imageproc::point::Point;

use subdrawer_common::error::{SubdrawerError, SubdrawerResult};
use subdrawer_pose_model::pose::Point2D;

use crate::palette::{Color, SKELETON_COLORS};
use crate::surface::{DrawingSurface, Layer};

/// Pixel layout of an exported file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    /// 8-bit RGB.
    Rgb,
    /// 8-bit palette: black followed by the skeleton colors.
    Indexed,
}

impl ColorMode {
    /// JPEG names export as RGB, everything else as indexed.
    pub fn for_file_name(name: &str) -> Self {
        let lower = name.to_ascii_lowercase();
        if lower.ends_with(".jpg") || lower.ends_with(".jpeg") {
            ColorMode::Rgb
        } else {
            ColorMode::Indexed
        }
    }
}

impl From<Color> for Rgb<u8> {
    fn from(c: Color) -> Self {
        Rgb([c.0, c.1, c.2])
    }
}

/// A black RGB buffer that skeleton primitives are rasterized into.
///
/// Primitives are drawn without anti-aliasing so every skeleton pixel is an
/// exact palette color. Clearing lines or circles blanks the whole buffer.
pub struct RasterSurface {
    image: RgbImage,
}

impl RasterSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbImage::from_pixel(width.max(1), height.max(1), Color::BLACK.into()),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn into_image(self) -> RgbImage {
        self.image
    }

    /// Encode to `path` in the given color mode.
    ///
    /// Indexed output is only possible for PNG; other formats fall back to RGB.
    pub fn save(&self, path: &Path, mode: ColorMode) -> SubdrawerResult<()> {
        let is_png = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("png"));

        match mode {
            ColorMode::Indexed if is_png => self.save_indexed_png(path),
            ColorMode::Indexed => {
                tracing::debug!(path = %path.display(), "Indexed mode unsupported for format, writing RGB");
                self.save_rgb(path)
            }
            ColorMode::Rgb => self.save_rgb(path),
        }
    }

    fn save_rgb(&self, path: &Path) -> SubdrawerResult<()> {
        self.image.save(path).map_err(|e| match e {
            image::ImageError::IoError(io) => SubdrawerError::io(path, io),
            other => SubdrawerError::render(format!("Failed to encode {}: {other}", path.display())),
        })
    }

    fn save_indexed_png(&self, path: &Path) -> SubdrawerResult<()> {
        let palette = indexed_palette();
        let indices: Vec<u8> = self
            .image
            .pixels()
            .map(|px| nearest_palette_index(&palette, px.0))
            .collect();

        let file = File::create(path).map_err(|e| SubdrawerError::io(path, e))?;
        let mut encoder = png::Encoder::new(BufWriter::new(file), self.width(), self.height());
        encoder.set_color(png::ColorType::Indexed);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_palette(palette.concat());

        let encode_err =
            |e: png::EncodingError| SubdrawerError::render(format!("Failed to encode {}: {e}", path.display()));
        let mut writer = encoder.write_header().map_err(encode_err)?;
        writer.write_image_data(&indices).map_err(encode_err)?;
        writer.finish().map_err(encode_err)
    }
}

/// Palette of indexed exports: background first, then the skeleton colors.
pub fn indexed_palette() -> Vec<[u8; 3]> {
    std::iter::once(Color::BLACK.to_array())
        .chain(SKELETON_COLORS)
        .collect()
}

fn nearest_palette_index(palette: &[[u8; 3]], rgb: [u8; 3]) -> u8 {
    let distance = |c: &[u8; 3]| -> u32 {
        c.iter()
            .zip(rgb.iter())
            .map(|(a, b)| (*a as i32 - *b as i32).pow(2) as u32)
            .sum()
    };
    palette
        .iter()
        .enumerate()
        .min_by_key(|(_, c)| distance(c))
        .map(|(i, _)| i as u8)
        .unwrap_or(0)
}

fn to_pixel(p: Point2D) -> (i32, i32) {
    (p.x.round() as i32, p.y.round() as i32)
}

impl DrawingSurface for RasterSurface {
    fn clear(&mut self, layer: Layer) {
        match layer {
            Layer::Lines | Layer::Circles => {
                for px in self.image.pixels_mut() {
                    *px = Color::BLACK.into();
                }
            }
            Layer::Labels => {}
        }
    }

    fn draw_line(&mut self, from: Point2D, to: Point2D, width: f64, color: Color, _layer: Layer) {
        let rgb: Rgb<u8> = color.into();
        let (dx, dy) = (to.x - from.x, to.y - from.y);
        let length = (dx * dx + dy * dy).sqrt();

        if width <= 1.0 {
            draw_line_segment_mut(
                &mut self.image,
                (from.x as f32, from.y as f32),
                (to.x as f32, to.y as f32),
                rgb,
            );
            return;
        }

        let half = width / 2.0;
        if length < f64::EPSILON {
            draw_filled_circle_mut(&mut self.image, to_pixel(from), half.round() as i32, rgb);
            return;
        }

        // Quad around the segment, offset by half the width along the normal.
        let (nx, ny) = (-dy / length * half, dx / length * half);
        let corners = [
            Point2D::new(from.x + nx, from.y + ny),
            Point2D::new(to.x + nx, to.y + ny),
            Point2D::new(to.x - nx, to.y - ny),
            Point2D::new(from.x - nx, from.y - ny),
        ];
        let polygon: Vec<Point<i32>> = corners
            .iter()
            .map(|c| {
                let (x, y) = to_pixel(*c);
                Point::new(x, y)
            })
            .collect();

        if polygon.first() != polygon.last() {
            draw_polygon_mut(&mut self.image, &polygon, rgb);
        }
    }

    fn draw_oval(&mut self, center: Point2D, radius: f64, color: Color, _layer: Layer) {
        draw_filled_circle_mut(
            &mut self.image,
            to_pixel(center),
            radius.round() as i32,
            color.into(),
        );
    }

    // Exported rasters are skeleton-only.
    fn draw_text(&mut self, _anchor: Point2D, _text: &str, _size: f64, _color: Color, _layer: Layer) {}
}
