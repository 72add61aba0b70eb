// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use fast_image_resize::{PixelType, ResizeAlg, ResizeOptions, Resizer, images::Image};

use crate::cv::points::fill_polygon_mut;
use crate::error::SilhouetteError;

/// Downsample a binary mask with nearest neighbour interpolation
///
/// The new dimensions are `max(1, round(dim * scale))`.
///
/// # Arguments
///
/// * `buffer` - A row-major binary mask
/// * `width` - Width of mask
/// * `height` - Height of mask
/// * `scale` - Scale factor applied to both dimensions
pub fn downsample_nearest(
    buffer: &[u8],
    width: u32,
    height: u32,
    scale: f64,
) -> Result<(Vec<u8>, u32, u32), SilhouetteError> {
    let new_width = ((width as f64 * scale).round() as u32).max(1);
    let new_height = ((height as f64 * scale).round() as u32).max(1);

    let source = Image::from_vec_u8(width, height, buffer.to_vec(), PixelType::U8)
        .map_err(|_| SilhouetteError::BufferSizeError)?;

    let mut destination = Image::new(new_width, new_height, PixelType::U8);

    let mut resizer = Resizer::new();
    let option = ResizeOptions::new().resize_alg(ResizeAlg::Nearest);

    resizer
        .resize(&source, &mut destination, &option)
        .map_err(|err| SilhouetteError::OtherError(err.to_string()))?;

    Ok((destination.into_vec(), new_width, new_height))
}

/// Neighbours of a pixel ordered clockwise from north (P2 to P9)
#[inline]
fn neighborhood(image: &[u8], w: usize, h: usize, x: usize, y: usize) -> [u8; 8] {
    let get = |dx: isize, dy: isize| -> u8 {
        let nx = x as isize + dx;
        let ny = y as isize + dy;
        if nx < 0 || ny < 0 || nx >= w as isize || ny >= h as isize {
            0
        } else {
            image[ny as usize * w + nx as usize]
        }
    };

    [
        get(0, -1),
        get(1, -1),
        get(1, 0),
        get(1, 1),
        get(0, 1),
        get(-1, 1),
        get(-1, 0),
        get(-1, -1),
    ]
}

/// Thin a binary mask to a one pixel wide skeleton
///
/// # References
///
/// Zhang, T. Y. & Suen, C. Y. A fast parallel algorithm for thinning digital
/// patterns. Communications of the ACM 27, 236-239 (1984).
///
/// # Examples
///
/// ```
/// use silhouette_core::cv::skeleton::thin;
///
/// // A thick horizontal bar thins to a line
/// let mut buffer = vec![0u8; 7 * 5];
/// for y in 1..4 {
///     for x in 1..6 {
///         buffer[y * 7 + x] = 1;
///     }
/// }
///
/// let skeleton = thin(&buffer, 7, 5);
/// let rows: Vec<usize> = (0..5).filter(|y| skeleton[y * 7..(y + 1) * 7].contains(&1)).collect();
///
/// assert_eq!(rows, vec![2]);
/// ```
pub fn thin(buffer: &[u8], width: u32, height: u32) -> Vec<u8> {
    let w = width as usize;
    let h = height as usize;

    let mut image: Vec<u8> = buffer.iter().map(|&v| u8::from(v != 0)).collect();
    let mut marked: Vec<usize> = Vec::new();

    loop {
        let mut changed = false;

        for first_pass in [true, false] {
            marked.clear();

            for y in 0..h {
                for x in 0..w {
                    if image[y * w + x] == 0 {
                        continue;
                    }

                    let p = neighborhood(&image, w, h, x, y);

                    let count: u8 = p.iter().sum();
                    if !(2..=6).contains(&count) {
                        continue;
                    }

                    let transitions = (0..8).filter(|&i| p[i] == 0 && p[(i + 1) % 8] == 1).count();
                    if transitions != 1 {
                        continue;
                    }

                    let (p2, p4, p6, p8) = (p[0], p[2], p[4], p[6]);
                    let removable = if first_pass {
                        p2 * p4 * p6 == 0 && p4 * p6 * p8 == 0
                    } else {
                        p2 * p4 * p8 == 0 && p2 * p6 * p8 == 0
                    };

                    if removable {
                        marked.push(y * w + x);
                    }
                }
            }

            for &index in marked.iter() {
                image[index] = 0;
            }

            changed |= !marked.is_empty();
        }

        if !changed {
            break;
        }
    }

    image
}

/// Approximate the skeleton length of the region enclosed by a contour
///
/// The contour is filled into a mask of the full image, downsampled by
/// `scale`, thinned, and the skeleton pixel count is divided by `scale`.
///
/// # Arguments
///
/// * `contour` - Closed contour as (x, y) pixel coordinates
/// * `height` - Height of the image the contour was traced from
/// * `width` - Width of the image the contour was traced from
/// * `scale` - Downsampling factor applied before thinning
pub fn skeleton_length(
    contour: &[[i32; 2]],
    height: u32,
    width: u32,
    scale: f64,
) -> Result<f64, SilhouetteError> {
    let mut canvas = vec![0u8; (height as usize) * (width as usize)];
    fill_polygon_mut(&mut canvas, width, height, contour, 1);

    let (small, small_width, small_height) = downsample_nearest(&canvas, width, height, scale)?;
    let skeleton = thin(&small, small_width, small_height);

    let count = skeleton.iter().filter(|&&v| v != 0).count();

    Ok(count as f64 / scale)
}
