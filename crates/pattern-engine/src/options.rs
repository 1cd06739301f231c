//! Pattern options and their defaulting rules.

/// Cutter outline for a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternShape {
    Line,
    Rect,
    Square,
    Circle,
    Hexagon,
    Octagon,
    Triangle,
    /// Regular polygon with this many sides (>= 3).
    Ngon(u32),
}

impl PatternShape {
    /// Polygon side count, when the shape is polygonal.
    pub fn sides(self) -> Option<u32> {
        match self {
            PatternShape::Hexagon => Some(6),
            PatternShape::Octagon => Some(8),
            PatternShape::Triangle => Some(3),
            PatternShape::Ngon(n) => Some(n),
            _ => None,
        }
    }
}

/// Options for `cut_pattern`. Unset values fall back to the documented
/// defaults at application time.
#[derive(Debug, Clone)]
pub struct PatternOptions {
    pub shape: PatternShape,
    /// Primary size: line width, rect width, circle diameter, polygon
    /// across-flats.
    pub width: f64,
    /// Secondary size (rect height); defaults to `width`.
    pub height: Option<f64>,
    /// Line length; defaults to spanning the face.
    pub length: Option<f64>,
    /// Corner radius for rect/square.
    pub fillet: f64,
    /// Stadium ends for lines.
    pub round_ends: bool,
    /// Parallelogram shear angle for rects, degrees.
    pub shear: f64,
    /// Per-shape rotation about the face normal, degrees.
    pub rotation: f64,
    /// Cut depth; `None` guarantees a through-cut.
    pub depth: Option<f64>,
    /// Gap between shapes; defaults to `width`.
    pub spacing: Option<f64>,
    pub spacing_x: Option<f64>,
    pub spacing_y: Option<f64>,
    /// Alias for spacing expressed as the wall left between shapes.
    pub wall_thickness: Option<f64>,
    /// Inset from face edges.
    pub border: f64,
    pub border_x: Option<f64>,
    pub border_y: Option<f64>,
    pub columns: u32,
    pub rows: u32,
    pub column_gap: f64,
    /// Defaults to `column_gap`.
    pub row_gap: Option<f64>,
    pub stagger: bool,
    pub stagger_amount: f64,
    /// Whole-pattern rotation, degrees; for lines this is the line direction.
    pub angle: f64,
    /// Legacy direction: "y"/"vertical" mean angle 90, "x"/"horizontal" 0.
    pub direction: Option<String>,
}

impl Default for PatternOptions {
    fn default() -> Self {
        PatternOptions {
            shape: PatternShape::Line,
            width: 1.0,
            height: None,
            length: None,
            fillet: 0.0,
            round_ends: false,
            shear: 0.0,
            rotation: 0.0,
            depth: None,
            spacing: None,
            spacing_x: None,
            spacing_y: None,
            wall_thickness: None,
            border: 2.0,
            border_x: None,
            border_y: None,
            columns: 1,
            rows: 1,
            column_gap: 5.0,
            row_gap: None,
            stagger: false,
            stagger_amount: 0.5,
            angle: 0.0,
            direction: None,
        }
    }
}

impl PatternOptions {
    pub fn height_or_width(&self) -> f64 {
        self.height.unwrap_or(self.width)
    }

    /// Edge-to-edge gap along u: wall thickness, then spacing_x, then
    /// spacing, then the shape width.
    pub fn gap_u(&self) -> f64 {
        self.wall_thickness
            .or(self.spacing_x)
            .or(self.spacing)
            .unwrap_or(self.width)
    }

    /// Edge-to-edge gap along v.
    pub fn gap_v(&self) -> f64 {
        self.wall_thickness
            .or(self.spacing_y)
            .or(self.spacing)
            .unwrap_or(self.width)
    }

    pub fn border_u(&self) -> f64 {
        self.border_x.unwrap_or(self.border)
    }

    pub fn border_v(&self) -> f64 {
        self.border_y.unwrap_or(self.border)
    }

    pub fn row_gap_or_column_gap(&self) -> f64 {
        self.row_gap.unwrap_or(self.column_gap)
    }

    /// Pattern angle in degrees, honoring the legacy `direction` strings.
    pub fn effective_angle(&self) -> f64 {
        match self.direction.as_deref() {
            Some("y") | Some("vertical") => 90.0,
            Some("x") | Some("horizontal") => 0.0,
            _ => self.angle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_the_option_table() {
        let opts = PatternOptions::default();
        assert_eq!(opts.shape, PatternShape::Line);
        assert_eq!(opts.width, 1.0);
        assert_eq!(opts.height_or_width(), 1.0);
        assert_eq!(opts.gap_u(), 1.0, "spacing defaults to width");
        assert_eq!(opts.border_u(), 2.0);
        assert_eq!(opts.column_gap, 5.0);
        assert_eq!(opts.row_gap_or_column_gap(), 5.0);
        assert_eq!(opts.stagger_amount, 0.5);
    }

    #[test]
    fn wall_thickness_overrides_spacing() {
        let opts = PatternOptions {
            spacing: Some(3.0),
            wall_thickness: Some(0.6),
            ..Default::default()
        };
        assert_eq!(opts.gap_u(), 0.6);
        assert_eq!(opts.gap_v(), 0.6);
    }

    #[test]
    fn legacy_direction_strings_set_the_angle() {
        let vertical = PatternOptions {
            direction: Some("vertical".into()),
            angle: 45.0,
            ..Default::default()
        };
        assert_eq!(vertical.effective_angle(), 90.0);

        let x = PatternOptions {
            direction: Some("x".into()),
            angle: 45.0,
            ..Default::default()
        };
        assert_eq!(x.effective_angle(), 0.0);
    }

    #[test]
    fn polygon_side_counts() {
        assert_eq!(PatternShape::Hexagon.sides(), Some(6));
        assert_eq!(PatternShape::Triangle.sides(), Some(3));
        assert_eq!(PatternShape::Ngon(5).sides(), Some(5));
        assert_eq!(PatternShape::Circle.sides(), None);
    }
}
