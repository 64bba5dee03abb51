//! Grid snapping, distances and color parsing.

use kurbo::{Point, Rect};
use shared::Color;

/// Round each coordinate to the nearest multiple of `unit`.
pub fn snap_to(p: Point, unit: f64) -> Point {
    Point::new((p.x / unit).round() * unit, (p.y / unit).round() * unit)
}

pub fn distance(a: Point, b: Point) -> f64 {
    a.distance(b)
}

/// True when `a` and `b` are closer than one grid unit on both axes.
pub fn within_unit(a: Point, b: Point, unit: f64) -> bool {
    (a.x - b.x).abs() < unit && (a.y - b.y).abs() < unit
}

/// Parse `#rrggbb` (leading `#` optional). Returns `None` on anything else.
pub fn hex_to_rgb(hex: &str) -> Option<Color> {
    let digits = hex.trim().strip_prefix('#').unwrap_or(hex.trim());
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some(Color::rgb(channel(0)?, channel(2)?, channel(4)?))
}

/// Axis-aligned bounding box of a point set.
pub fn bounds_of(points: &[Point]) -> Option<Rect> {
    let (first, rest) = points.split_first()?;
    Some(
        rest.iter()
            .fold(Rect::from_points(*first, *first), |r, p| r.union_pt(*p)),
    )
}

/// Length label in inches, e.g. `5.0"`.
pub fn format_inches(pixels: f64, unit: f64) -> String {
    format!("{:.1}\"", pixels / unit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_snap_rounds_to_nearest() {
        assert_eq!(snap_to(Point::new(29.0, 31.0), 20.0), Point::new(20.0, 40.0));
        assert_eq!(snap_to(Point::new(-9.0, 9.0), 20.0), Point::new(-0.0, 0.0));
        assert_eq!(snap_to(Point::new(100.0, 100.0), 20.0), Point::new(100.0, 100.0));
    }

    #[test]
    fn test_distance() {
        assert!((distance(Point::new(0.0, 0.0), Point::new(3.0, 4.0)) - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_within_unit_needs_both_axes() {
        let origin = Point::new(0.0, 0.0);
        assert!(within_unit(origin, Point::new(19.0, -19.0), 20.0));
        assert!(!within_unit(origin, Point::new(20.0, 0.0), 20.0));
        assert!(!within_unit(origin, Point::new(0.0, 25.0), 20.0));
    }

    #[test]
    fn test_hex_to_rgb() {
        assert_eq!(hex_to_rgb("#ff8000"), Some(Color::rgb(255, 128, 0)));
        assert_eq!(hex_to_rgb("00FF7f"), Some(Color::rgb(0, 255, 127)));
    }

    #[test]
    fn test_hex_to_rgb_malformed() {
        assert_eq!(hex_to_rgb(""), None);
        assert_eq!(hex_to_rgb("#fff"), None);
        assert_eq!(hex_to_rgb("#gg0000"), None);
        assert_eq!(hex_to_rgb("#ff00001"), None);
        assert_eq!(hex_to_rgb("#ééé"), None);
        assert_eq!(hex_to_rgb("#+f+f+f"), None);
        assert_eq!(hex_to_rgb("-1ffff"), None);
    }

    #[test]
    fn test_bounds_of() {
        assert!(bounds_of(&[]).is_none());
        let r = bounds_of(&[Point::new(40.0, 0.0), Point::new(0.0, 60.0), Point::new(20.0, 20.0)]).unwrap();
        assert_eq!(r, Rect::new(0.0, 0.0, 40.0, 60.0));
    }

    #[test]
    fn test_format_inches() {
        assert_eq!(format_inches(100.0, 20.0), "5.0\"");
        assert_eq!(format_inches(250.0, 20.0), "12.5\"");
    }

    proptest! {
        #[test]
        fn snap_is_idempotent_and_on_grid(x in -5000.0f64..5000.0, y in -5000.0f64..5000.0) {
            let once = snap_to(Point::new(x, y), 20.0);
            prop_assert_eq!(snap_to(once, 20.0), once);
            prop_assert_eq!(once.x % 20.0, 0.0);
            prop_assert_eq!(once.y % 20.0, 0.0);
            prop_assert!((once.x - x).abs() <= 10.0);
            prop_assert!((once.y - y).abs() <= 10.0);
        }
    }
}
