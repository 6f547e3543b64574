use geo_types::MultiPolygon;

/// Axis-aligned lon/lat bounds (min_lon, min_lat, max_lon, max_lat) over a
/// set of shapes. None when the set is empty.
pub fn lonlat_bounds<'a>(
    shapes: impl Iterator<Item = &'a MultiPolygon<f64>>,
) -> Option<(f64, f64, f64, f64)> {
    let mut bounds: Option<(f64, f64, f64, f64)> = None;
    for shape in shapes {
        for polygon in &shape.0 {
            for ring in std::iter::once(polygon.exterior()).chain(polygon.interiors().iter()) {
                for coord in ring.coords() {
                    bounds = Some(match bounds {
                        None => (coord.x, coord.y, coord.x, coord.y),
                        Some((min_x, min_y, max_x, max_y)) => (
                            min_x.min(coord.x),
                            min_y.min(coord.y),
                            max_x.max(coord.x),
                            max_y.max(coord.y),
                        ),
                    });
                }
            }
        }
    }
    bounds
}

/// Plate-carrée fit of a lon/lat box onto a pixel canvas, aspect preserved,
/// centered, with a fractional margin on every side.
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    scale: f64,
    center_x: f64,
    center_y: f64,
    mid_lon: f64,
    mid_lat: f64,
}

impl Viewport {
    pub fn fit(bounds: (f64, f64, f64, f64), width: u32, height: u32, margin: f64) -> Self {
        let (min_lon, min_lat, max_lon, max_lat) = bounds;
        let span_lon = if max_lon > min_lon { max_lon - min_lon } else { 1.0 };
        let span_lat = if max_lat > min_lat { max_lat - min_lat } else { 1.0 };

        let usable_w = width as f64 * (1.0 - 2.0 * margin);
        let usable_h = height as f64 * (1.0 - 2.0 * margin);
        let scale = (usable_w / span_lon).min(usable_h / span_lat);

        Viewport {
            scale,
            center_x: width as f64 / 2.0,
            center_y: height as f64 / 2.0,
            mid_lon: (min_lon + max_lon) / 2.0,
            mid_lat: (min_lat + max_lat) / 2.0,
        }
    }

    /// Pixel position of a lon/lat point; y grows downward.
    pub fn to_px(&self, lon: f64, lat: f64) -> (i32, i32) {
        let x = self.center_x + (lon - self.mid_lon) * self.scale;
        let y = self.center_y - (lat - self.mid_lat) * self.scale;
        (x.round() as i32, y.round() as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::{LineString, Polygon};

    fn square(min: f64, max: f64) -> MultiPolygon<f64> {
        let ring = LineString::from(vec![(min, min), (max, min), (max, max), (min, max), (min, min)]);
        MultiPolygon(vec![Polygon::new(ring, vec![])])
    }

    #[test]
    fn bounds_cover_all_shapes() {
        let a = square(0.0, 10.0);
        let b = square(-20.0, -5.0);
        let bounds = lonlat_bounds([&a, &b].into_iter()).unwrap();
        assert_eq!(bounds, (-20.0, -20.0, 10.0, 10.0));
    }

    #[test]
    fn empty_input_has_no_bounds() {
        assert!(lonlat_bounds(std::iter::empty()).is_none());
    }

    #[test]
    fn center_maps_to_canvas_center() {
        let view = Viewport::fit((0.0, 0.0, 10.0, 10.0), 200, 100, 0.0);
        assert_eq!(view.to_px(5.0, 5.0), (100, 50));
    }

    #[test]
    fn fit_preserves_aspect_ratio() {
        // a 10x10 degree box on a 200x100 canvas is limited by height
        let view = Viewport::fit((0.0, 0.0, 10.0, 10.0), 200, 100, 0.0);
        let (left, _) = view.to_px(0.0, 5.0);
        let (right, _) = view.to_px(10.0, 5.0);
        assert_eq!(right - left, 100);
        let (_, top) = view.to_px(5.0, 10.0);
        let (_, bottom) = view.to_px(5.0, 0.0);
        assert_eq!(bottom - top, 100);
    }

    #[test]
    fn margin_shrinks_the_drawn_extent() {
        let tight = Viewport::fit((0.0, 0.0, 10.0, 10.0), 100, 100, 0.0);
        let padded = Viewport::fit((0.0, 0.0, 10.0, 10.0), 100, 100, 0.1);
        let (tight_left, _) = tight.to_px(0.0, 5.0);
        let (padded_left, _) = padded.to_px(0.0, 5.0);
        assert!(padded_left > tight_left);
    }

    #[test]
    fn latitude_grows_upward() {
        let view = Viewport::fit((0.0, 0.0, 10.0, 10.0), 100, 100, 0.0);
        let (_, north) = view.to_px(5.0, 9.0);
        let (_, south) = view.to_px(5.0, 1.0);
        assert!(north < south);
    }
}
