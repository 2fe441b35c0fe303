//! Radial falloff mask that anchors the landmass to the map center.

use crate::tilemap::Tilemap;

/// Distance-based falloff field: 1 at the center `(w/2, h/2)`, 0 at the edge
/// midpoints, negative towards the corners. Deliberately unclamped, since the
/// thresholding downstream relies on the negative rim to guarantee sea at the
/// map border.
pub fn radial_mask(width: usize, height: usize) -> Tilemap<f32> {
    let mut mask = Tilemap::new_with(width, height, 0.0f32);

    let center_x = width as f32 / 2.0;
    let center_y = height as f32 / 2.0;

    for y in 0..height {
        for x in 0..width {
            let dx = (center_x - x as f32).abs() / (width as f32 / 2.0);
            let dy = (center_y - y as f32).abs() / (height as f32 / 2.0);
            let distance = (dx * dx + dy * dy).sqrt();
            mask.set(x, y, 1.0 - distance);
        }
    }

    mask
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_cells_equal_and_above_corners() {
        let mask = radial_mask(4, 4);
        // With even dimensions the four cells around the exact center are
        // equidistant from it.
        let center = [
            *mask.get(1, 1),
            *mask.get(1, 3),
            *mask.get(3, 1),
            *mask.get(3, 3),
        ];
        assert!(center.iter().all(|&v| (v - center[0]).abs() < 1e-6));

        let corners = [
            *mask.get(0, 0),
            *mask.get(0, 3),
            *mask.get(3, 0),
            *mask.get(3, 3),
        ];
        // Corners at matching distances agree, and every corner sits below
        // the center values.
        assert!((corners[0] - *mask.get(0, 0)).abs() < 1e-6);
        for &c in &corners {
            assert!(c < center[0]);
        }
    }

    #[test]
    fn test_mirror_symmetry_for_even_dimensions() {
        let (w, h) = (8, 6);
        let mask = radial_mask(w, h);
        for y in 0..h {
            for x in 0..w {
                // abs() around the center offsets makes the field symmetric
                // under x -> w-x and y -> h-y (cell 0 pairs with the virtual
                // cell w, so compare against w-x when x > 0).
                if x > 0 {
                    assert!((*mask.get(x, y) - *mask.get(w - x, y)).abs() < 1e-6);
                }
                if y > 0 {
                    assert!((*mask.get(x, y) - *mask.get(x, h - y)).abs() < 1e-6);
                }
            }
        }
    }

    #[test]
    fn test_corners_go_negative() {
        let mask = radial_mask(64, 64);
        assert!(*mask.get(0, 0) < 0.0);
        assert!(*mask.get(32, 32) > 0.9);
    }
}
