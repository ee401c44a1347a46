//! # Zone grid flow field

use nalgebra::*;

/// Pair containing normalised coordinates and motion at them.
pub type MotionEntry = (Point2<f32>, Vector2<f32>);

/// Single cell of the sampling grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Zone {
    /// Center of the cell in pixel coordinates of the source frame.
    pub pos: Point2<usize>,
    /// Mean absolute per-sample change within the cell, in `0..=255` range.
    pub mag: f32,
    /// Estimated motion of the cell, in pixels per frame.
    pub dir: Vector2<f32>,
}

impl Zone {
    /// Zone with no motion at given position.
    pub fn still(pos: Point2<usize>) -> Self {
        Self {
            pos,
            mag: 0.0,
            dir: Vector2::zeros(),
        }
    }
}

/// Optical flow over a grid of square zones.
///
/// Zones are stored in row-major order: top-left to bottom-right, rows outer, columns inner.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FlowField {
    zones: Vec<Zone>,
    cols: usize,
    rows: usize,
    grid_size: usize,
}

impl FlowField {
    /// Create a motionless field.
    ///
    /// # Arguments
    ///
    /// * `width` - width of the source frame, in pixels.
    /// * `height` - height of the source frame, in pixels.
    /// * `grid_size` - side of each zone, in pixels.
    pub fn new(width: usize, height: usize, grid_size: usize) -> Self {
        let mut field = Self::default();
        field.reset(width, height, grid_size);
        field
    }

    /// Resize the grid and clear all motion, keeping the allocation.
    pub fn reset(&mut self, width: usize, height: usize, grid_size: usize) {
        let (cols, rows) = match grid_size {
            0 => (0, 0),
            g => (width / g, height / g),
        };

        self.cols = cols;
        self.rows = rows;
        self.grid_size = grid_size;
        self.zones.clear();
        self.zones.extend(
            (0..rows)
                .flat_map(|row| (0..cols).map(move |col| (col, row)))
                .map(|(col, row)| Zone::still(zone_center(col, row, grid_size))),
        );
    }

    /// Zero out motion in every zone, leaving the grid intact.
    pub fn clear_motion(&mut self) {
        for zone in &mut self.zones {
            zone.mag = 0.0;
            zone.dir = Vector2::zeros();
        }
    }

    /// Get number of zone columns and rows.
    pub fn dim(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    /// Get number of zones.
    ///
    /// This is the same as `cols * rows`
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Get all zones in row-major order.
    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub(crate) fn zones_mut(&mut self) -> &mut [Zone] {
        &mut self.zones
    }

    /// Get zone at grid coordinates.
    ///
    /// # Arguments
    ///
    /// * `col` - horizontal zone coordinate.
    /// * `row` - vertical zone coordinate.
    pub fn get(&self, col: usize, row: usize) -> Option<&Zone> {
        if col < self.cols && row < self.rows {
            self.zones.get(row * self.cols + col)
        } else {
            None
        }
    }

    /// Iterate every zone.
    ///
    /// The resulting iterator yields `(col, row, zone)` entries.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &Zone)> + '_ {
        let cols = self.cols.max(1);
        self.zones
            .iter()
            .enumerate()
            .map(move |(i, zone)| (i % cols, i / cols, zone))
    }

    /// Iterate every zone as a normalised motion entry.
    ///
    /// Positions are in 0-1 range relative to the sampled area.
    pub fn motion_iter(&self) -> impl Iterator<Item = MotionEntry> + '_ {
        let w = (self.cols * self.grid_size).max(1) as f32;
        let h = (self.rows * self.grid_size).max(1) as f32;
        self.zones
            .iter()
            .map(move |z| (Point2::new(z.pos.x as f32 / w, z.pos.y as f32 / h), z.dir))
    }

    /// Get the largest zone magnitude, or 0 on an empty field.
    pub fn max_mag(&self) -> f32 {
        self.zones.iter().map(|z| z.mag).fold(0.0, f32::max)
    }

    /// Get the index of the zone with the largest magnitude.
    ///
    /// Ties are resolved towards the first zone.
    pub fn max_zone(&self) -> Option<usize> {
        self.zones
            .iter()
            .enumerate()
            .fold(None, |best: Option<(usize, f32)>, (i, z)| match best {
                Some((_, mag)) if mag >= z.mag => best,
                _ => Some((i, z.mag)),
            })
            .map(|(i, _)| i)
    }

    /// Average motion over all zones.
    pub fn mean_motion(&self) -> Vector2<f32> {
        if self.zones.is_empty() {
            Vector2::zeros()
        } else {
            self.zones.iter().map(|z| z.dir).sum::<Vector2<f32>>() / self.zones.len() as f32
        }
    }
}

/// Center of a zone in pixel coordinates.
pub fn zone_center(col: usize, row: usize, grid_size: usize) -> Point2<usize> {
    Point2::new(
        col * grid_size + grid_size / 2,
        row * grid_size + grid_size / 2,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn grid_coverage() {
        for (w, h, g) in [(24, 24, 12), (25, 23, 12), (640, 480, 12), (5, 5, 1), (3, 3, 4)] {
            let field = FlowField::new(w, h, g);
            assert_eq!(field.len(), (w / g) * (h / g));
            assert_eq!(field.dim(), (w / g, h / g));
        }

        assert!(FlowField::new(10, 10, 0).is_empty());
    }

    #[test]
    fn row_major_centers() {
        let field = FlowField::new(24, 24, 12);
        let centers = field
            .zones()
            .iter()
            .map(|z| (z.pos.x, z.pos.y))
            .collect::<Vec<_>>();
        assert_eq!(centers, vec![(6, 6), (18, 6), (6, 18), (18, 18)]);

        let coords = field.iter().map(|(c, r, _)| (c, r)).collect::<Vec<_>>();
        assert_eq!(coords, vec![(0, 0), (1, 0), (0, 1), (1, 1)]);

        assert_eq!(field.get(1, 1).map(|z| z.pos), Some(Point2::new(18, 18)));
        assert_eq!(field.get(2, 0), None);
    }

    #[test]
    fn odd_grid_center() {
        assert_eq!(zone_center(2, 1, 5), Point2::new(12, 7));
    }

    #[test]
    fn stats() {
        let mut field = FlowField::new(36, 12, 12);
        assert_eq!(field.max_mag(), 0.0);
        assert_eq!(field.max_zone(), Some(0));

        field.zones_mut()[1].mag = 3.0;
        field.zones_mut()[1].dir = Vector2::new(3.0, 0.0);
        field.zones_mut()[2].mag = 3.0;
        field.zones_mut()[2].dir = Vector2::new(0.0, -6.0);

        assert_eq!(field.max_mag(), 3.0);
        assert_eq!(field.max_zone(), Some(1));
        assert_approx_eq!(field.mean_motion().x, 1.0);
        assert_approx_eq!(field.mean_motion().y, -2.0);

        field.clear_motion();
        assert_eq!(field, FlowField::new(36, 12, 12));
    }

    #[test]
    fn normalised_positions() {
        let field = FlowField::new(24, 24, 12);
        let first = field.motion_iter().next().unwrap();
        assert_approx_eq!(first.0.x, 0.25);
        assert_approx_eq!(first.0.y, 0.25);
        assert_eq!(FlowField::default().motion_iter().count(), 0);
    }
}
