// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

#[inline]
fn cross(o: [i32; 2], a: [i32; 2], b: [i32; 2]) -> i64 {
    let (ox, oy) = (o[0] as i64, o[1] as i64);
    (a[0] as i64 - ox) * (b[1] as i64 - oy) - (a[1] as i64 - oy) * (b[0] as i64 - ox)
}

/// Compute the convex hull of a set of points as indices into the input
///
/// Uses the monotone chain algorithm. Collinear and duplicate points are
/// excluded from the hull. When several input points coincide, the lowest
/// index is used.
///
/// # Examples
///
/// ```
/// use silhouette_core::cv::hull::convex_hull_indices;
///
/// let points = [[0, 0], [0, 4], [1, 1], [4, 4], [4, 0]];
/// let mut hull = convex_hull_indices(&points);
/// hull.sort();
///
/// assert_eq!(hull, vec![0, 1, 3, 4]);
/// ```
pub fn convex_hull_indices(points: &[[i32; 2]]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..points.len()).collect();
    order.sort_by_key(|&i| (points[i][0], points[i][1], i));
    order.dedup_by_key(|i| points[*i]);

    if order.len() < 3 {
        return order;
    }

    let mut hull: Vec<usize> = Vec::with_capacity(2 * order.len());

    for &i in order.iter() {
        while hull.len() >= 2
            && cross(points[hull[hull.len() - 2]], points[hull[hull.len() - 1]], points[i]) <= 0
        {
            hull.pop();
        }
        hull.push(i);
    }

    let lower_len = hull.len() + 1;
    for &i in order.iter().rev().skip(1) {
        while hull.len() >= lower_len
            && cross(points[hull[hull.len() - 2]], points[hull[hull.len() - 1]], points[i]) <= 0
        {
            hull.pop();
        }
        hull.push(i);
    }

    hull.pop();
    hull
}

/// Compute the convex hull of a set of points
///
/// # Examples
///
/// ```
/// use silhouette_core::cv::hull::convex_hull;
///
/// let points = [[0, 0], [2, 0], [1, 1], [2, 2], [0, 2]];
/// let hull = convex_hull(&points);
///
/// assert_eq!(hull.len(), 4);
/// assert!(!hull.contains(&[1, 1]));
/// ```
pub fn convex_hull(points: &[[i32; 2]]) -> Vec<[i32; 2]> {
    convex_hull_indices(points)
        .into_iter()
        .map(|i| points[i])
        .collect()
}

/// Count convexity defects of a contour relative to its convex hull
///
/// Each hull edge, taken between consecutive hull vertices in contour order,
/// is a defect when at least one contour point between its endpoints lies
/// off the edge line.
///
/// # Arguments
///
/// * `points` - Ordered contour points
/// * `hull` - Convex hull vertices given as indices into `points`
pub fn convexity_defects(points: &[[i32; 2]], hull: &[usize]) -> u32 {
    let n = points.len();
    if hull.len() < 2 || n < 3 {
        return 0;
    }

    let mut hull = hull.to_vec();
    hull.sort_unstable();
    hull.dedup();

    let mut defects = 0;

    for k in 0..hull.len() {
        let start = hull[k];
        let end = hull[(k + 1) % hull.len()];

        let mut j = (start + 1) % n;
        while j != end {
            if cross(points[start], points[end], points[j]) != 0 {
                defects += 1;
                break;
            }
            j = (j + 1) % n;
        }
    }

    defects
}
