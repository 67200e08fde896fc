//! Baking display orientation (flips, then rotation) into upright pixels.
//!
//! Quarter turns are exact pixel permutations. Any other angle uses inverse
//! mapping with bilinear sampling: for each output pixel we find the source
//! position and interpolate its four neighbours.
//!
//! For a clockwise rotation by θ (y axis pointing down) the inverse transform is:
//! ```text
//! src_x =  (dst_x - cx) * cos θ + (dst_y - cy) * sin θ + src_cx
//! src_y = -(dst_x - cx) * sin θ + (dst_y - cy) * cos θ + src_cy
//! ```
//! Output pixels not covered by the source are filled with the canvas
//! background.

use image::imageops;

use super::{Raster, RasterError};
use crate::geometry::Viewport;

/// Fill colour for regions uncovered by an arbitrary rotation.
pub const BACKGROUND: [u8; 3] = [255, 255, 255];

impl Raster {
    /// Produce an upright raster that looks exactly like this one displayed.
    pub fn render(&self) -> Result<Raster, RasterError> {
        if self.is_upright() {
            return Ok(Raster::new(self.width, self.height, self.pixels.clone()));
        }

        let mut img = self.to_rgb_image()?;
        if self.flip_x {
            imageops::flip_horizontal_in_place(&mut img);
        }
        if self.flip_y {
            imageops::flip_vertical_in_place(&mut img);
        }

        let angle = self.rotation.rem_euclid(360.0);
        let rotated = match quarter_turns(angle) {
            Some(0) => img,
            Some(1) => imageops::rotate90(&img),
            Some(2) => imageops::rotate180(&img),
            Some(3) => imageops::rotate270(&img),
            _ => return Ok(rotate_bilinear(&Raster::from_rgb_image(img), angle)),
        };
        Ok(Raster::from_rgb_image(rotated))
    }
}

/// Number of clockwise quarter turns if `angle` is a multiple of 90°.
fn quarter_turns(angle: f64) -> Option<u8> {
    let turns = angle / 90.0;
    if (turns - turns.round()).abs() < 1e-9 {
        Some((turns.round() as i64).rem_euclid(4) as u8)
    } else {
        None
    }
}

fn rotate_bilinear(image: &Raster, angle_degrees: f64) -> Raster {
    let viewport = Viewport::of(image.width as f64, image.height as f64, angle_degrees);
    let dst_w = (viewport.width.round() as u32).max(1);
    let dst_h = (viewport.height.round() as u32).max(1);

    let (sin, cos) = angle_degrees.to_radians().sin_cos();
    let src_cx = image.width as f64 / 2.0;
    let src_cy = image.height as f64 / 2.0;
    let dst_cx = dst_w as f64 / 2.0;
    let dst_cy = dst_h as f64 / 2.0;

    let mut output = Vec::with_capacity(dst_w as usize * dst_h as usize * 3);
    for dst_y in 0..dst_h {
        for dst_x in 0..dst_w {
            // Sample at pixel centres
            let dx = dst_x as f64 + 0.5 - dst_cx;
            let dy = dst_y as f64 + 0.5 - dst_cy;

            let src_x = dx * cos + dy * sin + src_cx - 0.5;
            let src_y = -dx * sin + dy * cos + src_cy - 0.5;

            output.extend_from_slice(&sample_bilinear(image, src_x, src_y));
        }
    }

    Raster::new(dst_w, dst_h, output)
}

#[inline]
fn get_pixel_f64(image: &Raster, px: usize, py: usize) -> [f64; 3] {
    let idx = (py * image.width as usize + px) * 3;
    [
        image.pixels[idx] as f64,
        image.pixels[idx + 1] as f64,
        image.pixels[idx + 2] as f64,
    ]
}

/// Bilinear sample with clamp-to-edge inside the half-pixel border and the
/// background colour beyond it.
fn sample_bilinear(image: &Raster, x: f64, y: f64) -> [u8; 3] {
    let max_x = (image.width - 1) as f64;
    let max_y = (image.height - 1) as f64;

    if x < -0.5 || x > max_x + 0.5 || y < -0.5 || y > max_y + 0.5 {
        return BACKGROUND;
    }

    let x = x.clamp(0.0, max_x);
    let y = y.clamp(0.0, max_y);

    let x0 = x.floor() as usize;
    let y0 = y.floor() as usize;
    let x1 = (x0 + 1).min(image.width as usize - 1);
    let y1 = (y0 + 1).min(image.height as usize - 1);

    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let p00 = get_pixel_f64(image, x0, y0);
    let p10 = get_pixel_f64(image, x1, y0);
    let p01 = get_pixel_f64(image, x0, y1);
    let p11 = get_pixel_f64(image, x1, y1);

    let mut result = [0u8; 3];
    for i in 0..3 {
        let v = p00[i] * (1.0 - fx) * (1.0 - fy)
            + p10[i] * fx * (1.0 - fy)
            + p01[i] * (1.0 - fx) * fy
            + p11[i] * fx * fy;
        result[i] = v.clamp(0.0, 255.0).round() as u8;
    }
    result
}
