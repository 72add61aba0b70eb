// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

/// Compute the inclusive pixel bounding box of a set of (x, y) points
///
/// Returns `[x, y, w, h]` where `w` and `h` count the pixels covered by the
/// box (a single point has `w = h = 1`). Empty inputs return zeros.
///
/// # Examples
///
/// ```
/// use silhouette_core::cv::points::bounding_rect;
///
/// let points = [[2, 1], [5, 1], [5, 3], [2, 3]];
/// assert_eq!(bounding_rect(&points), [2, 1, 4, 3]);
/// ```
pub fn bounding_rect(points: &[[i32; 2]]) -> [i32; 4] {
    let Some(&[fx, fy]) = points.first() else {
        return [0; 4];
    };

    let (mut min_x, mut min_y, mut max_x, mut max_y) = (fx, fy, fx, fy);

    for &[x, y] in points.iter().skip(1) {
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
    }

    [min_x, min_y, max_x - min_x + 1, max_y - min_y + 1]
}

/// Convert integer pixel points to floating point coordinates
pub fn to_real(points: &[[i32; 2]]) -> Vec<[f64; 2]> {
    points.iter().map(|p| [p[0] as f64, p[1] as f64]).collect()
}

/// Resample a closed outline to a specified number of equidistant points
///
/// The returned outline is open (the first point is not repeated). Outlines
/// with zero length are returned as `n_points` copies of their first point.
///
/// # Examples
///
/// ```
/// use silhouette_core::cv::points::resample_closed;
///
/// let square = [[0., 0.], [2., 0.], [2., 2.], [0., 2.]];
/// let resampled = resample_closed(&square, 8);
///
/// assert_eq!(resampled.len(), 8);
/// assert_eq!(resampled[1], [1.0, 0.0]);
/// ```
pub fn resample_closed(points: &[[f64; 2]], n_points: usize) -> Vec<[f64; 2]> {
    let Some(&first) = points.first() else {
        return Vec::new();
    };

    let mut closed = points.to_vec();
    if closed[closed.len() - 1] != first {
        closed.push(first);
    }

    let lengths: Vec<f64> = closed
        .windows(2)
        .map(|w| ((w[1][0] - w[0][0]).powi(2) + (w[1][1] - w[0][1]).powi(2)).sqrt())
        .collect();

    let total: f64 = lengths.iter().sum();
    if total == 0.0 || n_points == 0 {
        return vec![first; n_points];
    }

    let step = total / n_points as f64;
    let mut resampled = Vec::with_capacity(n_points);

    let mut segment = 0;
    let mut travelled = 0.0;

    for i in 0..n_points {
        let target = i as f64 * step;

        while segment < lengths.len() - 1 && travelled + lengths[segment] < target {
            travelled += lengths[segment];
            segment += 1;
        }

        let t = if lengths[segment] == 0.0 {
            0.0
        } else {
            ((target - travelled) / lengths[segment]).clamp(0.0, 1.0)
        };

        let p0 = closed[segment];
        let p1 = closed[segment + 1];
        resampled.push([p0[0] + t * (p1[0] - p0[0]), p0[1] + t * (p1[1] - p0[1])]);
    }

    resampled
}

/// Clip the segment `start`-`end` to a rectangle with the Liang-Barsky method
///
/// Returns the parameters `(t0, t1)` of the visible part of the segment, or
/// `None` when the segment misses the rectangle.
fn clip_segment(start: [f64; 2], end: [f64; 2], min: [f64; 2], max: [f64; 2]) -> Option<(f64, f64)> {
    let dx = end[0] - start[0];
    let dy = end[1] - start[1];

    let mut t0 = 0.0f64;
    let mut t1 = 1.0f64;

    for (p, q) in [
        (-dx, start[0] - min[0]),
        (dx, max[0] - start[0]),
        (-dy, start[1] - min[1]),
        (dy, max[1] - start[1]),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else {
            let r = q / p;
            if p < 0.0 {
                t0 = t0.max(r);
            } else {
                t1 = t1.min(r);
            }
        }
    }

    (t0 <= t1).then_some((t0, t1))
}

/// Mutably draw a line between two points onto a row-major canvas
///
/// Lines are clipped to a one pixel margin around the canvas before they are
/// rasterized. Lines that lie fully within the canvas are drawn unchanged.
///
/// # References
///
/// Adapted/modified from: https://github.com/image-rs/imageproc
pub fn draw_line_mut(
    buffer: &mut [u8],
    width: u32,
    height: u32,
    start: [i32; 2],
    end: [i32; 2],
    value: u8,
) {
    let (w, h) = (width as i64, height as i64);

    let a = [start[0] as f64, start[1] as f64];
    let b = [end[0] as f64, end[1] as f64];

    let Some((t0, t1)) = clip_segment(a, b, [-1.0, -1.0], [w as f64, h as f64]) else {
        return;
    };

    let at = |t: f64| -> (i64, i64) {
        if t <= 0.0 {
            (start[0] as i64, start[1] as i64)
        } else if t >= 1.0 {
            (end[0] as i64, end[1] as i64)
        } else {
            (
                (a[0] + t * (b[0] - a[0])).round() as i64,
                (a[1] + t * (b[1] - a[1])).round() as i64,
            )
        }
    };

    let (x0, y0) = at(t0);
    let (x1, y1) = at(t1);

    let dx = (x1 - x0).abs();
    let dy = (y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx - dy;

    let mut x = x0;
    let mut y = y0;

    loop {
        if x >= 0 && x < w && y >= 0 && y < h {
            buffer[(y * w + x) as usize] = value;
        }

        if x == x1 && y == y1 {
            break;
        }

        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x += sx;
        }
        if e2 < dx {
            err += dx;
            y += sy;
        }
    }
}

/// Mutably fill a closed polygon onto a row-major canvas
///
/// The interior is filled with an even-odd scanline rule and the boundary
/// edges are drawn afterwards, so every vertex and edge pixel is set. Points
/// outside of the canvas are clipped.
///
/// # Arguments
///
/// * `buffer` - A row-major canvas for drawing the polygon onto
/// * `width` - Width of canvas
/// * `height` - Height of canvas
/// * `points` - Polygon vertices as (x, y) pixel coordinates
/// * `value` - Fill value
///
/// # Examples
///
/// ```
/// use silhouette_core::cv::points::fill_polygon_mut;
///
/// let mut buffer = vec![0u8; 16];
/// let points = [[1, 1], [2, 1], [2, 2], [1, 2]];
///
/// fill_polygon_mut(&mut buffer, 4, 4, &points, 1);
///
/// assert_eq!(buffer, vec![0, 0, 0, 0, 0, 1, 1, 0, 0, 1, 1, 0, 0, 0, 0, 0]);
/// ```
pub fn fill_polygon_mut(buffer: &mut [u8], width: u32, height: u32, points: &[[i32; 2]], value: u8) {
    if points.is_empty() || width == 0 || height == 0 {
        return;
    }

    let w = width as i64;
    let h = height as i64;
    let n = points.len();

    let y_min = points.iter().map(|p| p[1] as i64).min().unwrap_or(0).max(0);
    let y_max = points
        .iter()
        .map(|p| p[1] as i64)
        .max()
        .unwrap_or(0)
        .min(h - 1);

    let mut crossings: Vec<f64> = Vec::with_capacity(n);

    for y in y_min..=y_max {
        let yf = y as f64;
        crossings.clear();

        for i in 0..n {
            let p0 = points[i];
            let p1 = points[(i + 1) % n];
            let (y0, y1) = (p0[1] as f64, p1[1] as f64);

            // Half-open rows so shared vertices are counted once
            if (y0 <= yf && yf < y1) || (y1 <= yf && yf < y0) {
                let t = (yf - y0) / (y1 - y0);
                crossings.push(p0[0] as f64 + t * (p1[0] as f64 - p0[0] as f64));
            }
        }

        crossings.sort_by(|a, b| a.total_cmp(b));

        for pair in crossings.chunks_exact(2) {
            let from = pair[0].ceil().max(0.0) as i64;
            let to = pair[1].floor().min((w - 1) as f64) as i64;

            for x in from..=to {
                buffer[(y * w + x) as usize] = value;
            }
        }
    }

    for i in 0..n {
        draw_line_mut(buffer, width, height, points[i], points[(i + 1) % n], value);
    }
}
