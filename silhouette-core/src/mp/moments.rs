// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

/// Compute raw spatial moments of the polygon enclosed by a contour
///
/// Moments are integrated over the polygon with Green's theorem rather than
/// summed over pixels, so a contour and its reverse give identical values.
/// Returns `[m00, m10, m01, m11, m20, m02, m21, m12, m30, m03]`, all zero
/// when the enclosed area vanishes.
///
/// # Examples
///
/// ```
/// use silhouette_core::mp::moments::moments_raw;
///
/// let square = [[0, 0], [0, 10], [10, 10], [10, 0]];
/// let m = moments_raw(&square);
///
/// assert_eq!(m[0], 100.0);
/// assert_eq!(m[1] / m[0], 5.0);
/// assert_eq!(m[2] / m[0], 5.0);
/// ```
pub fn moments_raw(points: &[[i32; 2]]) -> [f64; 10] {
    let Some(&[lx, ly]) = points.last() else {
        return [0.0; 10];
    };

    let mut a00 = 0.0;
    let mut a10 = 0.0;
    let mut a01 = 0.0;
    let mut a20 = 0.0;
    let mut a11 = 0.0;
    let mut a02 = 0.0;
    let mut a30 = 0.0;
    let mut a21 = 0.0;
    let mut a12 = 0.0;
    let mut a03 = 0.0;

    let mut xp = lx as f64;
    let mut yp = ly as f64;
    let mut xp2 = xp * xp;
    let mut yp2 = yp * yp;

    for &[x, y] in points {
        let x = x as f64;
        let y = y as f64;
        let x2 = x * x;
        let y2 = y * y;

        let dxy = xp * y - x * yp;
        let xs = xp + x;
        let ys = yp + y;

        a00 += dxy;
        a10 += dxy * xs;
        a01 += dxy * ys;
        a20 += dxy * (xp * xs + x2);
        a11 += dxy * (xp * (ys + yp) + x * (ys + y));
        a02 += dxy * (yp * ys + y2);
        a30 += dxy * xs * (xp2 + x2);
        a03 += dxy * ys * (yp2 + y2);
        a21 += dxy * (xp2 * (3.0 * yp + y) + 2.0 * x * xp * ys + x2 * (yp + 3.0 * y));
        a12 += dxy * (yp2 * (3.0 * xp + x) + 2.0 * y * yp * xs + y2 * (xp + 3.0 * x));

        xp = x;
        yp = y;
        xp2 = x2;
        yp2 = y2;
    }

    if a00.abs() <= f32::EPSILON as f64 {
        return [0.0; 10];
    }

    // Orientation normalization so clockwise contours match counter-clockwise ones
    let sign = if a00 > 0.0 { 1.0 } else { -1.0 };

    [
        sign * a00 / 2.0,
        sign * a10 / 6.0,
        sign * a01 / 6.0,
        sign * a11 / 24.0,
        sign * a20 / 12.0,
        sign * a02 / 12.0,
        sign * a21 / 60.0,
        sign * a12 / 60.0,
        sign * a30 / 20.0,
        sign * a03 / 20.0,
    ]
}

/// Compute central moments from raw moments
///
/// Uses the same `[u00, u10, u01, u11, u20, u02, u21, u12, u30, u03]`
/// layout as [`moments_raw`].
pub fn moments_central(raw: &[f64; 10]) -> [f64; 10] {
    let [m00, m10, m01, m11, m20, m02, m21, m12, m30, m03] = *raw;

    if m00 == 0.0 {
        return [0.0; 10];
    }

    let x = m10 / m00;
    let y = m01 / m00;

    let u20 = m20 - m10 * x;
    let u11 = m11 - m10 * y;
    let u02 = m02 - m01 * y;
    let u30 = m30 - x * (3.0 * u20 + x * m10);
    let u21 = m21 - x * (2.0 * u11 + x * m01) - y * u20;
    let u12 = m12 - y * (2.0 * u11 + y * m10) - x * u02;
    let u03 = m03 - y * (3.0 * u02 + y * m01);

    [m00, 0.0, 0.0, u11, u20, u02, u21, u12, u30, u03]
}

/// Compute the seven Hu invariant moments of the polygon enclosed by a contour
///
/// # Examples
///
/// ```
/// use silhouette_core::mp::moments::moments_hu;
///
/// let small = moments_hu(&[[0, 0], [0, 10], [10, 10], [10, 0]]);
/// let large = moments_hu(&[[50, 50], [50, 90], [90, 90], [90, 50]]);
///
/// assert!((small[0] - 1.0 / 6.0).abs() < 1e-12);
/// assert!((small[0] - large[0]).abs() < 1e-12);
/// ```
pub fn moments_hu(points: &[[i32; 2]]) -> [f64; 7] {
    let central = moments_central(&moments_raw(points));

    let u00 = central[0];
    let u11 = central[3];
    let u20 = central[4];
    let u02 = central[5];
    let u21 = central[6];
    let u12 = central[7];
    let u30 = central[8];
    let u03 = central[9];

    if u00 == 0.0 {
        return [0.0; 7];
    }

    let s2 = u00 * u00;
    let s3 = u00.powf(2.5);

    let n20 = u20 / s2;
    let n02 = u02 / s2;
    let n11 = u11 / s2;
    let n30 = u30 / s3;
    let n03 = u03 / s3;
    let n21 = u21 / s3;
    let n12 = u12 / s3;

    let p = n20 - n02;
    let q = n30 - 3.0 * n12;
    let r = n30 + n12;
    let z = n21 + n03;
    let y = 3.0 * n21 - n03;

    let i1 = n20 + n02;
    let i2 = p * p + 4.0 * n11 * n11;
    let i3 = q * q + y * y;
    let i4 = r * r + z * z;
    let i5 = q * r * (r * r - 3.0 * z * z) + y * z * (3.0 * r * r - z * z);
    let i6 = p * (r * r - z * z) + 4.0 * n11 * r * z;
    let i7 = y * r * (r * r - 3.0 * z * z) - q * z * (3.0 * r * r - z * z);

    [i1, i2, i3, i4, i5, i6, i7]
}

/// Compute the area centroid of the polygon enclosed by a contour
///
/// Returns `None` when the enclosed area is zero.
pub fn centroid(points: &[[i32; 2]]) -> Option<[f64; 2]> {
    let raw = moments_raw(points);
    if raw[0] == 0.0 {
        return None;
    }

    Some([raw[1] / raw[0], raw[2] / raw[0]])
}
