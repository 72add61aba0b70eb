// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use nalgebra::{DVector, MatrixXx5};

use crate::constant::ELLIPSE_RESAMPLE_POINTS;
use crate::cv::points::{resample_closed, to_real};

/// Fit a best fitting ellipse to a set of points and extract elliptic parameters
///
/// Returns `[major_axis, minor_axis, eccentricity, angle]` with full axis
/// lengths, or `None` when the least squares problem has no finite
/// elliptical solution (e.g. collinear or repeated points).
///
/// # Arguments
///
/// * `points` - A set of ordered outline points
///
/// # Examples
///
/// ```
/// use silhouette_core::cv::ellipse::fit_ellipse_lstsq;
///
/// let points: Vec<[f64; 2]> = (0..64)
///     .map(|i| {
///         let t = i as f64 / 64.0 * std::f64::consts::TAU;
///         [10.0 * t.cos(), 5.0 * t.sin()]
///     })
///     .collect();
///
/// let params = fit_ellipse_lstsq(&points).unwrap();
/// assert!((params[0] - 20.0).abs() < 1e-6);
/// assert!((params[1] - 10.0).abs() < 1e-6);
/// ```
pub fn fit_ellipse_lstsq(points: &[[f64; 2]]) -> Option<[f64; 4]> {
    if points.is_empty() {
        return None;
    }

    let points = if points.len() < ELLIPSE_RESAMPLE_POINTS {
        resample_closed(points, ELLIPSE_RESAMPLE_POINTS)
    } else {
        points.to_vec()
    };

    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p[0], sy + p[1]));

    let points: Vec<[f64; 2]> = points
        .iter()
        .map(|p| [p[0] - sx / n, p[1] - sy / n])
        .collect();

    let design: MatrixXx5<f64> = MatrixXx5::from_columns(&[
        DVector::from_iterator(points.len(), points.iter().map(|p| p[0] * p[0])),
        DVector::from_iterator(points.len(), points.iter().map(|p| p[0] * p[1])),
        DVector::from_iterator(points.len(), points.iter().map(|p| p[1] * p[1])),
        DVector::from_iterator(points.len(), points.iter().map(|p| p[0])),
        DVector::from_iterator(points.len(), points.iter().map(|p| p[1])),
    ]);

    let y = DVector::from_element(points.len(), 1.0_f64);

    let epsilon = 1e-9;
    let results = lstsq::lstsq(&design, &y, epsilon).ok()?;

    // Collinear or repeated points do not constrain a unique conic
    if results.rank < 5 {
        return None;
    }

    let a = results.solution[0];
    let b = results.solution[1] / 2.0;
    let c = results.solution[2];
    let d = results.solution[3] / 2.0;
    let f = results.solution[4] / 2.0;
    let g = -1.0;

    // A conic is an ellipse only when its quadratic part is definite
    let denominator = b * b - a * c;
    if denominator >= 0.0 {
        return None;
    }

    let numerator = 2.0 * (a * f * f + c * d * d + g * b * b - 2.0 * b * d * f - a * c * g);
    let factor = ((a - c) * (a - c) + 4.0 * b * b).sqrt();

    let mut semi_major = (numerator / denominator / (factor - a - c)).sqrt();
    let mut semi_minor = (numerator / denominator / (-factor - a - c)).sqrt();

    if !semi_major.is_finite() || !semi_minor.is_finite() {
        return None;
    }

    let mut width_gt_height = true;
    if semi_major < semi_minor {
        width_gt_height = false;
        std::mem::swap(&mut semi_major, &mut semi_minor);
    }

    let eccentricity = if semi_major > 0.0 {
        (1.0 - (semi_minor / semi_major).powi(2)).max(0.0).sqrt()
    } else {
        0.0
    };

    let mut phi = if b == 0.0 {
        if a < c { 0.0 } else { std::f64::consts::FRAC_PI_2 }
    } else {
        let inner = ((2.0 * b) / (a - c)).atan() / 2.0;
        if a > c {
            inner + std::f64::consts::FRAC_PI_2
        } else {
            inner
        }
    };

    if !width_gt_height {
        phi += std::f64::consts::FRAC_PI_2;
    }
    phi %= std::f64::consts::PI;

    Some([semi_major * 2.0, semi_minor * 2.0, eccentricity, phi])
}

/// Compute ellipse eccentricity of a contour, degrading to zero on a failed fit
///
/// # Examples
///
/// ```
/// use silhouette_core::cv::ellipse::ellipse_eccentricity;
///
/// let line = [[0, 0], [1, 1], [2, 2], [3, 3], [4, 4]];
/// assert_eq!(ellipse_eccentricity(&line), 0.0);
/// ```
pub fn ellipse_eccentricity(points: &[[i32; 2]]) -> f64 {
    match fit_ellipse_lstsq(&to_real(points)) {
        Some(params) if params[0] > 0.0 && params[2].is_finite() => params[2],
        _ => 0.0,
    }
}
