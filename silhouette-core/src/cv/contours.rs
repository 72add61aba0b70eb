// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::collections::VecDeque;

use crate::im::Mask;

/// An ordered, closed outline of integer (x, y) pixel coordinates
pub type Contour = Vec<[i32; 2]>;

// Pixel offsets indexed counter-clockwise starting east (y points down)
const DIRECTIONS: [[i32; 2]; 8] = [
    [1, 0],   // East
    [1, -1],  // Northeast
    [0, -1],  // North
    [-1, -1], // Northwest
    [-1, 0],  // West
    [-1, 1],  // Southwest
    [0, 1],   // South
    [1, 1],   // Southeast
];

const WEST: usize = 4;
const TRACED: i32 = 2;

/// Find the external contours of a binary mask
///
/// # Examples
///
/// ```
/// use silhouette_core::cv::find_external_contours;
/// use silhouette_core::im::Mask;
///
/// let mask = Mask::new(3, 3, vec![1, 1, 0, 1, 1, 0, 0, 0, 0]).unwrap();
/// let contours = find_external_contours(&mask);
///
/// assert_eq!(contours, vec![vec![[0, 0], [0, 1], [1, 1], [1, 0]]]);
/// ```
pub fn find_external_contours(mask: &Mask) -> Vec<Contour> {
    find_contours(mask.width(), mask.height(), mask.as_raw())
}

/// Find chain-compressed outer contours of foreground regions using 8-connectivity
///
/// Only outer borders whose parent is the image frame are returned, so the
/// borders of holes and of objects nested inside holes are skipped. Contours
/// are ordered by the raster position of their first pixel.
///
/// # Arguments
///
/// * `width` - Width of mask
/// * `height` - Height of mask
/// * `pixels` - A row-major mask buffer where any non-zero value is foreground
///
/// # References
///
/// Suzuki, S. & Abe, K. Topological structural analysis of digitized binary
/// images by border following. CVGIP 30, 32-46 (1985).
///
/// # Examples
///
/// ```
/// use silhouette_core::cv::find_contours;
///
/// let pixels = vec![1, 0, 1, 0, 0, 0, 1, 1, 1];
/// let contours = find_contours(3, 3, &pixels);
///
/// assert_eq!(contours, vec![vec![[0, 0]], vec![[2, 0]], vec![[0, 2], [2, 2]]]);
/// ```
pub fn find_contours(width: u32, height: u32, pixels: &[u8]) -> Vec<Contour> {
    let width = width as usize;
    let height = height as usize;

    if width == 0 || height == 0 || pixels.len() != width * height {
        return Vec::new();
    }

    let padded_width = width + 2;
    let padded_height = height + 2;
    let at = |x: usize, y: usize| x + padded_width * y;

    let mut grid = vec![0i32; padded_width * padded_height];

    for y in 0..height {
        for x in 0..width {
            if pixels[y * width + x] != 0 {
                grid[at(x + 1, y + 1)] = 1;
            }
        }
    }

    fill_holes(&mut grid, padded_width, padded_height);

    let mut contours = Vec::new();

    for y in 1..=height {
        for x in 1..=width {
            if grid[at(x, y)] == 1 && grid[at(x - 1, y)] == 0 {
                let border = follow_border(&mut grid, padded_width, [x as i32, y as i32]);
                contours.push(compress_chain(border));
            }
        }
    }

    contours
}

/// Set every background pixel not reachable from the padded frame to foreground
fn fill_holes(grid: &mut [i32], padded_width: usize, padded_height: usize) {
    let mut exterior = vec![false; grid.len()];
    let mut queue = VecDeque::from([0usize]);
    exterior[0] = true;

    while let Some(index) = queue.pop_front() {
        let x = index % padded_width;
        let y = index / padded_width;

        let mut neighbors = [None; 4];
        if x > 0 {
            neighbors[0] = Some(index - 1);
        }
        if x + 1 < padded_width {
            neighbors[1] = Some(index + 1);
        }
        if y > 0 {
            neighbors[2] = Some(index - padded_width);
        }
        if y + 1 < padded_height {
            neighbors[3] = Some(index + padded_width);
        }

        for neighbor in neighbors.into_iter().flatten() {
            if !exterior[neighbor] && grid[neighbor] == 0 {
                exterior[neighbor] = true;
                queue.push_back(neighbor);
            }
        }
    }

    for (value, &outside) in grid.iter_mut().zip(exterior.iter()) {
        if !outside && *value == 0 {
            *value = 1;
        }
    }
}

fn direction_between(from: [i32; 2], to: [i32; 2]) -> usize {
    let step = [to[0] - from[0], to[1] - from[1]];
    DIRECTIONS
        .iter()
        .position(|&d| d == step)
        .unwrap_or(WEST)
}

/// Follow an outer border from its raster-first pixel in the padded grid
fn follow_border(grid: &mut [i32], padded_width: usize, start: [i32; 2]) -> Contour {
    let at = |p: [i32; 2]| p[0] as usize + padded_width * p[1] as usize;
    let step = |p: [i32; 2], d: usize| [p[0] + DIRECTIONS[d][0], p[1] + DIRECTIONS[d][1]];

    // Clockwise search from the west neighbour for the first foreground pixel
    let first = (0..8)
        .map(|k| step(start, (WEST + 8 - k) % 8))
        .find(|&p| grid[at(p)] != 0);

    let Some(first) = first else {
        grid[at(start)] = TRACED;
        return vec![[start[0] - 1, start[1] - 1]];
    };

    let mut points = Vec::new();
    let mut previous = first;
    let mut current = start;

    loop {
        points.push([current[0] - 1, current[1] - 1]);
        grid[at(current)] = TRACED;

        // Counter-clockwise search starting after the previous pixel
        let back = direction_between(current, previous);
        let next = (1..=8)
            .map(|k| step(current, (back + k) % 8))
            .find(|&p| grid[at(p)] != 0)
            .unwrap_or(previous);

        if next == start && current == first {
            break;
        }

        previous = current;
        current = next;
    }

    points
}

/// Remove points where the step direction along the contour does not change
///
/// The first point is always retained.
///
/// # Examples
///
/// ```
/// use silhouette_core::cv::contours::compress_chain;
///
/// let line = vec![[0, 0], [1, 0], [2, 0], [1, 0]];
/// assert_eq!(compress_chain(line), vec![[0, 0], [2, 0]]);
/// ```
pub fn compress_chain(points: Contour) -> Contour {
    let n = points.len();
    if n < 3 {
        return points;
    }

    let delta = |a: [i32; 2], b: [i32; 2]| [b[0] - a[0], b[1] - a[1]];

    let mut compressed = Vec::with_capacity(n);
    compressed.push(points[0]);

    for i in 1..n {
        let incoming = delta(points[i - 1], points[i]);
        let outgoing = delta(points[i], points[(i + 1) % n]);
        if incoming != outgoing {
            compressed.push(points[i]);
        }
    }

    compressed
}
