//! Pure layout math: cell centers in face-local (u, v) coordinates,
//! relative to the face center.

/// Cull tolerance added on top of the shape margin.
const CULL_TOL: f64 = 0.1;

/// Inputs for a grid layout over one face.
#[derive(Debug, Clone)]
pub struct GridParams {
    pub u_size: f64,
    pub v_size: f64,
    /// Center-to-center spacing (shape size + gap).
    pub pitch_u: f64,
    pub pitch_v: f64,
    pub border_u: f64,
    pub border_v: f64,
    pub columns: u32,
    pub rows: u32,
    pub column_gap: f64,
    pub row_gap: f64,
    pub stagger: bool,
    /// Fraction of pitch_u odd rows shift by.
    pub stagger_amount: f64,
    /// Whole-pattern rotation, radians.
    pub angle: f64,
}

/// Lay out centered cells in `columns x rows` sub-regions of the usable
/// rectangle. Every sub-region holds at least a 1x1 cell grid.
pub fn grid_centers(p: &GridParams) -> Vec<[f64; 2]> {
    let usable_u = (p.u_size - 2.0 * p.border_u).max(0.0);
    let usable_v = (p.v_size - 2.0 * p.border_v).max(0.0);
    let columns = p.columns.max(1);
    let rows = p.rows.max(1);

    let sub_u = (usable_u - (columns - 1) as f64 * p.column_gap) / columns as f64;
    let sub_v = (usable_v - (rows - 1) as f64 * p.row_gap) / rows as f64;

    let cells_u = cells_fitting(sub_u, p.pitch_u);
    let cells_v = cells_fitting(sub_v, p.pitch_v);

    let mut centers = Vec::new();
    for col in 0..columns {
        let region_u = -usable_u / 2.0 + col as f64 * (sub_u + p.column_gap) + sub_u / 2.0;
        for row in 0..rows {
            let region_v = -usable_v / 2.0 + row as f64 * (sub_v + p.row_gap) + sub_v / 2.0;
            for j in 0..cells_v {
                let v = region_v - (cells_v - 1) as f64 * p.pitch_v / 2.0 + j as f64 * p.pitch_v;
                let row_shift = if p.stagger && j % 2 == 1 {
                    p.stagger_amount * p.pitch_u
                } else {
                    0.0
                };
                for i in 0..cells_u {
                    let u = region_u - (cells_u - 1) as f64 * p.pitch_u / 2.0
                        + i as f64 * p.pitch_u
                        + row_shift;
                    centers.push(rotated([u, v], p.angle));
                }
            }
        }
    }
    centers
}

fn cells_fitting(extent: f64, pitch: f64) -> u32 {
    if pitch <= 0.0 || extent <= 0.0 {
        return 1;
    }
    ((extent / pitch).floor() as u32).max(1)
}

fn rotated(p: [f64; 2], angle: f64) -> [f64; 2] {
    if angle == 0.0 {
        return p;
    }
    let (sin_a, cos_a) = angle.sin_cos();
    [p[0] * cos_a - p[1] * sin_a, p[0] * sin_a + p[1] * cos_a]
}

/// Line layout: line centers spaced along the direction's perpendicular,
/// plus the length each line spans.
#[derive(Debug, Clone)]
pub struct LineLayout {
    pub centers: Vec<[f64; 2]>,
    pub length: f64,
}

/// Lines run along `angle` (radians, from the u-axis); they are positioned
/// perpendicular to their direction. The perpendicular extent available is
/// `|sin| * u_size + |cos| * v_size`.
pub fn line_centers(
    u_size: f64,
    v_size: f64,
    border_u: f64,
    border_v: f64,
    width: f64,
    gap: f64,
    angle: f64,
    explicit_length: Option<f64>,
) -> LineLayout {
    let (sin_a, cos_a) = angle.sin_cos();
    let perp_extent = sin_a.abs() * u_size + cos_a.abs() * v_size;
    let perp_border = sin_a.abs() * border_u + cos_a.abs() * border_v;
    let usable = (perp_extent - 2.0 * perp_border).max(0.0);

    let pitch = width + gap;
    let count = cells_fitting(usable, pitch);

    let along_extent = cos_a.abs() * u_size + sin_a.abs() * v_size;
    let along_border = cos_a.abs() * border_u + sin_a.abs() * border_v;
    let length = explicit_length.unwrap_or((along_extent - 2.0 * along_border).max(width));

    // Unit vector perpendicular to the line direction.
    let perp = [-sin_a, cos_a];
    let centers = (0..count)
        .map(|i| {
            let offset = -((count - 1) as f64) * pitch / 2.0 + i as f64 * pitch;
            [perp[0] * offset, perp[1] * offset]
        })
        .collect();

    LineLayout { centers, length }
}

/// Bounds-check a centered cutter against the face rectangle.
pub fn within_face(center: [f64; 2], u_size: f64, v_size: f64, margin: f64) -> bool {
    center[0].abs() <= u_size / 2.0 - margin + CULL_TOL
        && center[1].abs() <= v_size / 2.0 - margin + CULL_TOL
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simple(u: f64, v: f64, pitch: f64) -> GridParams {
        GridParams {
            u_size: u,
            v_size: v,
            pitch_u: pitch,
            pitch_v: pitch,
            border_u: 2.0,
            border_v: 2.0,
            columns: 1,
            rows: 1,
            column_gap: 5.0,
            row_gap: 5.0,
            stagger: false,
            stagger_amount: 0.5,
            angle: 0.0,
        }
    }

    #[test]
    fn hexagon_grid_cell_count_matches_the_formula() {
        // 50x50 face, width 5, wall 0.6: usable 46, pitch 5.6 -> 8 per axis.
        let centers = grid_centers(&simple(50.0, 50.0, 5.6));
        assert_eq!(centers.len(), 64);
    }

    #[test]
    fn grid_is_centered() {
        let centers = grid_centers(&simple(50.0, 50.0, 5.6));
        let sum: [f64; 2] = centers
            .iter()
            .fold([0.0, 0.0], |acc, c| [acc[0] + c[0], acc[1] + c[1]]);
        assert!(sum[0].abs() < 1e-9);
        assert!(sum[1].abs() < 1e-9);
        let max_u = centers.iter().map(|c| c[0].abs()).fold(0.0, f64::max);
        assert!((max_u - 19.6).abs() < 1e-9, "7 pitches across, half = 19.6");
    }

    #[test]
    fn stagger_shifts_alternate_rows() {
        let mut p = simple(50.0, 50.0, 5.6);
        p.stagger = true;
        let centers = grid_centers(&p);
        assert_eq!(centers.len(), 64);
        // Odd rows move +stagger_amount * pitch in u.
        let base = grid_centers(&simple(50.0, 50.0, 5.6));
        let shifted: Vec<f64> = centers
            .iter()
            .zip(base.iter())
            .map(|(a, b)| a[0] - b[0])
            .collect();
        let moved = shifted.iter().filter(|d| d.abs() > 1e-9).count();
        assert_eq!(moved, 32, "half the rows shift");
        for d in shifted.iter().filter(|d| d.abs() > 1e-9) {
            assert!((d - 2.8).abs() < 1e-9);
        }
    }

    #[test]
    fn columns_and_rows_partition_the_face() {
        let mut p = simple(50.0, 50.0, 3.0);
        p.columns = 2;
        p.rows = 2;
        p.column_gap = 4.0;
        p.row_gap = 4.0;
        // usable 46, sub region (46 - 4) / 2 = 21 -> 7 cells of pitch 3.
        let centers = grid_centers(&p);
        assert_eq!(centers.len(), 4 * 49);
        // No cell sits inside the inter-group gap band around u = 0.
        for c in &centers {
            assert!(c[0].abs() > 1.0, "gap band must stay clear, got {}", c[0]);
        }
    }

    #[test]
    fn every_region_keeps_at_least_one_cell() {
        let centers = grid_centers(&simple(8.0, 8.0, 100.0));
        assert_eq!(centers.len(), 1);
        assert_eq!(centers[0], [0.0, 0.0]);
    }

    #[test]
    fn pattern_angle_rotates_centers() {
        let mut p = simple(50.0, 50.0, 5.6);
        p.angle = std::f64::consts::FRAC_PI_2;
        let rotated = grid_centers(&p);
        let base = grid_centers(&simple(50.0, 50.0, 5.6));
        for (r, b) in rotated.iter().zip(base.iter()) {
            assert!((r[0] + b[1]).abs() < 1e-9);
            assert!((r[1] - b[0]).abs() < 1e-9);
        }
    }

    #[test]
    fn horizontal_lines_space_over_the_v_extent() {
        // angle 0: lines along u, stacked along v. 20 tall, border 2 -> 16
        // usable, pitch 3 -> 5 lines.
        let layout = line_centers(50.0, 20.0, 2.0, 2.0, 1.0, 2.0, 0.0, None);
        assert_eq!(layout.centers.len(), 5);
        for c in &layout.centers {
            assert!(c[0].abs() < 1e-9, "horizontal lines offset only in v");
        }
        assert!((layout.length - 46.0).abs() < 1e-9);
    }

    #[test]
    fn vertical_lines_space_over_the_u_extent() {
        let layout = line_centers(
            50.0,
            20.0,
            2.0,
            2.0,
            1.0,
            2.0,
            std::f64::consts::FRAC_PI_2,
            None,
        );
        // perp extent = u_size = 50, usable 46, pitch 3 -> 15 lines.
        assert_eq!(layout.centers.len(), 15);
        for c in &layout.centers {
            assert!(c[1].abs() < 1e-9, "vertical lines offset only in u");
        }
        assert!((layout.length - 16.0).abs() < 1e-9);
    }

    #[test]
    fn cull_respects_margin_and_tolerance() {
        assert!(within_face([22.5, 0.0], 50.0, 50.0, 2.5));
        assert!(within_face([22.59, 0.0], 50.0, 50.0, 2.5));
        assert!(!within_face([22.7, 0.0], 50.0, 50.0, 2.5));
    }
}
