// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

// Iterations used to refine the initial pair of distant points
const FARTHEST_PAIR_ITERATIONS: usize = 3;

#[inline]
fn squared_distance(a: [i32; 2], b: [i32; 2]) -> f64 {
    let dx = (b[0] - a[0]) as f64;
    let dy = (b[1] - a[1]) as f64;
    dx * dx + dy * dy
}

/// Simplify a closed contour with the Douglas-Peucker algorithm
///
/// The contour is first split at an approximately farthest pair of points and
/// each half is simplified recursively. A vertex is kept when its distance to
/// the chord line of its sub-range exceeds `epsilon`.
///
/// # Arguments
///
/// * `points` - Ordered closed contour points
/// * `epsilon` - Maximum distance between the contour and its approximation
///
/// # Examples
///
/// ```
/// use silhouette_core::cv::simplify::approximate_polygon;
///
/// let points = [[0, 0], [0, 5], [0, 10], [5, 10], [10, 10], [10, 5], [10, 0], [5, 0]];
/// let approx = approximate_polygon(&points, 0.4);
///
/// assert_eq!(approx.len(), 4);
/// ```
pub fn approximate_polygon(points: &[[i32; 2]], epsilon: f64) -> Vec<[i32; 2]> {
    let n = points.len();
    if n == 0 {
        return Vec::new();
    }

    let eps2 = epsilon * epsilon;

    let mut start = 0;
    let mut end = 0;

    for _ in 0..FARTHEST_PAIR_ITERATIONS {
        start = end;

        let mut max_dist = 0.0;
        for offset in 1..n {
            let j = (start + offset) % n;
            let dist = squared_distance(points[start], points[j]);
            if dist > max_dist {
                max_dist = dist;
                end = j;
            }
        }

        if max_dist <= eps2 {
            return vec![points[start]];
        }
    }

    let mut kept: Vec<usize> = Vec::new();

    // Ranges are (first, last) with the last index exclusive in the output
    let mut stack: Vec<(usize, usize)> = vec![(end, start), (start, end)];

    while let Some((first, last)) = stack.pop() {
        if (first + 1) % n == last {
            kept.push(first);
            continue;
        }

        let a = points[first];
        let b = points[last];
        let dx = (b[0] - a[0]) as f64;
        let dy = (b[1] - a[1]) as f64;

        let mut max_dist = 0.0;
        let mut split = first;

        let mut k = (first + 1) % n;
        while k != last {
            let p = points[k];
            let dist = ((p[1] - a[1]) as f64 * dx - (p[0] - a[0]) as f64 * dy).abs();
            if dist > max_dist {
                max_dist = dist;
                split = k;
            }
            k = (k + 1) % n;
        }

        if max_dist * max_dist <= eps2 * (dx * dx + dy * dy) {
            kept.push(first);
        } else {
            stack.push((split, last));
            stack.push((first, split));
        }
    }

    kept.into_iter().map(|i| points[i]).collect()
}

#[cfg(test)]
mod test {

    use super::*;

    fn circle(radius: f64, n: usize) -> Vec<[i32; 2]> {
        (0..n)
            .map(|i| {
                let t = i as f64 / n as f64 * std::f64::consts::TAU;
                [
                    (100.0 + radius * t.cos()).round() as i32,
                    (100.0 + radius * t.sin()).round() as i32,
                ]
            })
            .collect()
    }

    #[test]
    fn test_single_and_repeated_points() {
        assert_eq!(approximate_polygon(&[[3, 3]], 1.0), vec![[3, 3]]);
        assert_eq!(approximate_polygon(&[[3, 3], [3, 3], [3, 3]], 1.0).len(), 1);
        assert!(approximate_polygon(&[], 1.0).is_empty());
    }

    #[test]
    fn test_two_points() {
        let approx = approximate_polygon(&[[0, 0], [10, 0]], 0.2);
        assert_eq!(approx.len(), 2);
    }

    #[test]
    fn test_triangle() {
        let points = [[0, 0], [5, 0], [10, 0], [5, 5], [0, 10], [0, 5]];
        let approx = approximate_polygon(&points, 0.3);

        assert_eq!(approx.len(), 3);
        assert!(approx.contains(&[0, 0]));
        assert!(approx.contains(&[10, 0]));
        assert!(approx.contains(&[0, 10]));
    }

    #[test]
    fn test_order_preserved() {
        let points = [[0, 0], [0, 9], [9, 9], [9, 0]];
        let approx = approximate_polygon(&points, 0.36);

        assert_eq!(approx, vec![[0, 0], [0, 9], [9, 9], [9, 0]]);
    }

    #[test]
    fn test_circle_keeps_many_vertices() {
        let points = circle(50.0, 400);
        let epsilon = 0.01 * 2.0 * std::f64::consts::PI * 50.0;
        let approx = approximate_polygon(&points, epsilon);

        assert!(approx.len() > 12);
        assert!(approx.len() < points.len());
    }
}
