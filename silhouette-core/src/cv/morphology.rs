// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

/// Pixel offsets of an elliptical structuring element with odd side length
///
/// # Examples
///
/// ```
/// use silhouette_core::cv::morphology::elliptical_kernel;
///
/// let kernel = elliptical_kernel(3);
/// assert_eq!(kernel, vec![[0, -1], [-1, 0], [0, 0], [1, 0], [0, 1]]);
/// ```
pub fn elliptical_kernel(size: u32) -> Vec<[i32; 2]> {
    let r = (size / 2) as i32;
    if r == 0 {
        return vec![[0, 0]];
    }

    let inv_r2 = 1.0 / (r * r) as f64;
    let mut offsets = Vec::new();

    for dy in -r..=r {
        let dx = (r as f64 * (((r * r - dy * dy) as f64) * inv_r2).sqrt()).round() as i32;
        for x in -dx..=dx {
            offsets.push([x, dy]);
        }
    }

    offsets
}

/// Dilate a binary mask where pixels outside of the canvas are background
pub fn dilate(buffer: &[u8], width: u32, height: u32, kernel: &[[i32; 2]]) -> Vec<u8> {
    let (w, h) = (width as i32, height as i32);
    let mut output = vec![0u8; buffer.len()];

    for y in 0..h {
        for x in 0..w {
            let hit = kernel.iter().any(|&[dx, dy]| {
                let (nx, ny) = (x + dx, y + dy);
                nx >= 0 && nx < w && ny >= 0 && ny < h && buffer[(ny * w + nx) as usize] != 0
            });

            if hit {
                output[(y * w + x) as usize] = 1;
            }
        }
    }

    output
}

/// Erode a binary mask where pixels outside of the canvas are ignored
pub fn erode(buffer: &[u8], width: u32, height: u32, kernel: &[[i32; 2]]) -> Vec<u8> {
    let (w, h) = (width as i32, height as i32);
    let mut output = vec![0u8; buffer.len()];

    for y in 0..h {
        for x in 0..w {
            let keep = kernel.iter().all(|&[dx, dy]| {
                let (nx, ny) = (x + dx, y + dy);
                nx < 0 || nx >= w || ny < 0 || ny >= h || buffer[(ny * w + nx) as usize] != 0
            });

            if keep {
                output[(y * w + x) as usize] = 1;
            }
        }
    }

    output
}

/// Morphologically close a binary mask (dilation followed by erosion)
///
/// # Arguments
///
/// * `buffer` - A row-major binary mask
/// * `width` - Width of mask
/// * `height` - Height of mask
/// * `size` - Side length of the elliptical structuring element
///
/// # Examples
///
/// ```
/// use silhouette_core::cv::morphology::close;
///
/// // A one pixel gap between two blocks is bridged
/// let buffer = vec![
///     1, 1, 0, 1, 1,
///     1, 1, 0, 1, 1,
///     1, 1, 0, 1, 1,
/// ];
///
/// let closed = close(&buffer, 5, 3, 3);
///
/// assert_eq!(closed, vec![1; 15]);
/// ```
pub fn close(buffer: &[u8], width: u32, height: u32, size: u32) -> Vec<u8> {
    let kernel = elliptical_kernel(size);
    let dilated = dilate(buffer, width, height, &kernel);
    erode(&dilated, width, height, &kernel)
}
