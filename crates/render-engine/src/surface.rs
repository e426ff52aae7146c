//! The drawing-surface capability and an in-memory display list.

use subdrawer_pose_model::pose::Point2D;

use crate::palette::Color;

/// Groups of primitives that are cleared together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    Lines,
    Circles,
    Labels,
}

/// Minimal capability a graphics backend needs to show a skeleton.
pub trait DrawingSurface {
    /// Remove everything previously drawn on `layer`.
    fn clear(&mut self, layer: Layer);

    fn draw_line(&mut self, from: Point2D, to: Point2D, width: f64, color: Color, layer: Layer);

    /// Filled circle without outline.
    fn draw_oval(&mut self, center: Point2D, radius: f64, color: Color, layer: Layer);

    /// Text centred on `anchor`.
    fn draw_text(&mut self, anchor: Point2D, text: &str, size: f64, color: Color, layer: Layer);
}

impl<S: DrawingSurface + ?Sized> DrawingSurface for &mut S {
    fn clear(&mut self, layer: Layer) {
        (**self).clear(layer)
    }

    fn draw_line(&mut self, from: Point2D, to: Point2D, width: f64, color: Color, layer: Layer) {
        (**self).draw_line(from, to, width, color, layer)
    }

    fn draw_oval(&mut self, center: Point2D, radius: f64, color: Color, layer: Layer) {
        (**self).draw_oval(center, radius, color, layer)
    }

    fn draw_text(&mut self, anchor: Point2D, text: &str, size: f64, color: Color, layer: Layer) {
        (**self).draw_text(anchor, text, size, color, layer)
    }
}

/// Forwards every call to two surfaces, e.g. the editor canvas and an export raster.
pub struct Tee<A, B>(pub A, pub B);

impl<A: DrawingSurface, B: DrawingSurface> DrawingSurface for Tee<A, B> {
    fn clear(&mut self, layer: Layer) {
        self.0.clear(layer);
        self.1.clear(layer);
    }

    fn draw_line(&mut self, from: Point2D, to: Point2D, width: f64, color: Color, layer: Layer) {
        self.0.draw_line(from, to, width, color, layer);
        self.1.draw_line(from, to, width, color, layer);
    }

    fn draw_oval(&mut self, center: Point2D, radius: f64, color: Color, layer: Layer) {
        self.0.draw_oval(center, radius, color, layer);
        self.1.draw_oval(center, radius, color, layer);
    }

    fn draw_text(&mut self, anchor: Point2D, text: &str, size: f64, color: Color, layer: Layer) {
        self.0.draw_text(anchor, text, size, color, layer);
        self.1.draw_text(anchor, text, size, color, layer);
    }
}

/// A primitive recorded by [`DisplayList`].
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Line {
        from: Point2D,
        to: Point2D,
        width: f64,
        color: Color,
    },
    Oval {
        center: Point2D,
        radius: f64,
        color: Color,
    },
    Text {
        anchor: Point2D,
        text: String,
        size: f64,
        color: Color,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    pub layer: Layer,
    pub shape: Shape,
}

/// Retained list of primitives, painted by whatever toolkit hosts the editor.
#[derive(Debug, Clone, Default)]
pub struct DisplayList {
    commands: Vec<DrawCommand>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    /// All primitives in draw order.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn shapes(&self, layer: Layer) -> impl Iterator<Item = &Shape> + '_ {
        self.commands
            .iter()
            .filter(move |c| c.layer == layer)
            .map(|c| &c.shape)
    }

    pub fn count(&self, layer: Layer) -> usize {
        self.shapes(layer).count()
    }

    fn push(&mut self, layer: Layer, shape: Shape) {
        self.commands.push(DrawCommand { layer, shape });
    }
}

impl DrawingSurface for DisplayList {
    fn clear(&mut self, layer: Layer) {
        self.commands.retain(|c| c.layer != layer);
    }

    fn draw_line(&mut self, from: Point2D, to: Point2D, width: f64, color: Color, layer: Layer) {
        self.push(
            layer,
            Shape::Line {
                from,
                to,
                width,
                color,
            },
        );
    }

    fn draw_oval(&mut self, center: Point2D, radius: f64, color: Color, layer: Layer) {
        self.push(
            layer,
            Shape::Oval {
                center,
                radius,
                color,
            },
        );
    }

    fn draw_text(&mut self, anchor: Point2D, text: &str, size: f64, color: Color, layer: Layer) {
        self.push(
            layer,
            Shape::Text {
                anchor,
                text: text.to_string(),
                size,
                color,
            },
        );
    }
}
