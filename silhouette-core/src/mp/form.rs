// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use num::complex::Complex64;

use crate::cv::hull::convex_hull;
use crate::cv::points::bounding_rect;

#[inline]
pub fn area(points: &[[i32; 2]]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }

    let mut area = 0.0;
    for i in 0..n {
        let p1 = points[i];
        let p2 = points[(i + 1) % n];
        area += p1[0] as f64 * p2[1] as f64 - p2[0] as f64 * p1[1] as f64;
    }

    area.abs() / 2.0
}

#[inline]
pub fn area_convex(points: &[[i32; 2]]) -> f64 {
    area(&convex_hull(points))
}

#[inline]
pub fn perimeter(points: &[[i32; 2]]) -> f64 {
    let n = points.len();
    if n < 2 {
        return 0.0;
    }

    let mut perimeter = 0.0;
    for i in 0..n {
        let dx = (points[(i + 1) % n][0] - points[i][0]) as f64;
        let dy = (points[(i + 1) % n][1] - points[i][1]) as f64;
        perimeter += (dx * dx + dy * dy).sqrt();
    }

    perimeter
}

#[inline]
pub fn circularity(area: f64, perimeter: f64) -> f64 {
    if perimeter > 0.0 {
        (4.0 * std::f64::consts::PI * area) / (perimeter * perimeter)
    } else {
        0.0
    }
}

#[inline]
pub fn aspect_ratio(points: &[[i32; 2]]) -> f64 {
    let [_, _, w, h] = bounding_rect(points);
    if h > 0 { w as f64 / h as f64 } else { 0.0 }
}

#[inline]
pub fn extent(area: f64, points: &[[i32; 2]]) -> f64 {
    let [_, _, w, h] = bounding_rect(points);
    let area_bbox = w as f64 * h as f64;
    if area_bbox > 0.0 { area / area_bbox } else { 0.0 }
}

#[inline]
pub fn solidity(area: f64, area_convex: f64) -> f64 {
    if area_convex > 0.0 {
        area / area_convex
    } else {
        0.0
    }
}

/// Magnitude of a single discrete Fourier coefficient of a contour
///
/// The contour is treated as the complex sequence `x + iy` and the `k`-th
/// coefficient of its unnormalized forward transform is evaluated directly.
///
/// # Examples
///
/// ```
/// use silhouette_core::mp::form::fourier_magnitude;
///
/// let square = [[1, 0], [0, 1], [-1, 0], [0, -1]];
/// assert!((fourier_magnitude(&square, 1) - 4.0).abs() < 1e-12);
/// assert!(fourier_magnitude(&square, 3).abs() < 1e-12);
/// ```
pub fn fourier_magnitude(points: &[[i32; 2]], k: usize) -> f64 {
    let n = points.len();
    if n == 0 {
        return 0.0;
    }

    let omega = -2.0 * std::f64::consts::PI * k as f64 / n as f64;

    points
        .iter()
        .enumerate()
        .map(|(j, p)| {
            Complex64::new(p[0] as f64, p[1] as f64) * Complex64::from_polar(1.0, omega * j as f64)
        })
        .sum::<Complex64>()
        .norm()
}

#[cfg(test)]
mod test {

    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn circle(radius: f64, n: usize) -> Vec<[i32; 2]> {
        (0..n)
            .map(|i| {
                let t = i as f64 / n as f64 * std::f64::consts::TAU;
                [
                    (500.0 + radius * t.cos()).round() as i32,
                    (500.0 + radius * t.sin()).round() as i32,
                ]
            })
            .collect()
    }

    #[test]
    fn test_square_form() {
        let square = [[0, 0], [0, 10], [10, 10], [10, 0]];

        assert_eq!(area(&square), 100.0);
        assert_eq!(perimeter(&square), 40.0);
        assert!((circularity(100.0, 40.0) - std::f64::consts::PI / 4.0).abs() < TOLERANCE);
        assert_eq!(aspect_ratio(&square), 1.0);
        assert!((extent(100.0, &square) - 100.0 / 121.0).abs() < TOLERANCE);
        assert_eq!(solidity(area(&square), area_convex(&square)), 1.0);
    }

    #[test]
    fn test_degenerate_guards() {
        assert_eq!(area(&[[1, 1]]), 0.0);
        assert_eq!(perimeter(&[[1, 1]]), 0.0);
        assert_eq!(circularity(0.0, 0.0), 0.0);
        assert_eq!(solidity(0.0, 0.0), 0.0);
        assert_eq!(aspect_ratio(&[]), 0.0);
        assert_eq!(extent(0.0, &[]), 0.0);
    }

    #[test]
    fn test_line_perimeter_is_closed() {
        assert_eq!(perimeter(&[[0, 0], [5, 0]]), 10.0);
    }

    #[test]
    fn test_circle_form() {
        let points = circle(200.0, 64);
        let a = area(&points);
        let p = perimeter(&points);

        assert!((circularity(a, p) - 1.0).abs() < 0.05);
        assert!((aspect_ratio(&points) - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_solidity_concave() {
        let notched = [[0, 0], [0, 10], [5, 5], [10, 10], [10, 0]];
        let s = solidity(area(&notched), area_convex(&notched));

        assert!(s > 0.0 && s < 1.0);
        assert!((s - 75.0 / 100.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_fourier_translation() {
        // Only the DC term depends on translation
        let a = [[0, 0], [4, 0], [4, 4], [0, 4], [2, 6]];
        let b: Vec<[i32; 2]> = a.iter().map(|p| [p[0] + 50, p[1] - 20]).collect();

        assert!((fourier_magnitude(&a, 1) - fourier_magnitude(&b, 1)).abs() < TOLERANCE);
    }
}
