//! Randomized augmentation for the training subset.
//!
//! Mirrors the usual training-generator transforms: rotation, width/height
//! shift, shear, zoom, horizontal flip and brightness jitter, with
//! nearest-edge fill for pixels that map outside the source. Validation
//! images bypass this entirely and are only rescaled.

use image::RgbImage;
use rand::Rng;

/// Rotation range in degrees (±).
const ROTATION_DEGREES: f64 = 20.0;
/// Shift range as a fraction of image size (±).
const SHIFT_FRACTION: f64 = 0.2;
/// Shear range (±).
const SHEAR_RANGE: f64 = 0.2;
/// Zoom range: scale sampled from [1 - ZOOM, 1 + ZOOM].
const ZOOM_RANGE: f64 = 0.2;
/// Brightness multiplier sampled from [LO, HI].
const BRIGHTNESS_LO: f64 = 0.8;
const BRIGHTNESS_HI: f64 = 1.2;

/// Parameters of one sampled transform; separated from the sampling so tests
/// can pin them down.
#[derive(Debug, Clone, Copy)]
pub struct AugmentParams {
    pub rotation_rad: f64,
    pub shift_x: f64,
    pub shift_y: f64,
    pub shear: f64,
    pub zoom: f64,
    pub flip_horizontal: bool,
    pub brightness: f64,
}

impl AugmentParams {
    /// The identity transform: output equals input.
    pub fn identity() -> AugmentParams {
        AugmentParams {
            rotation_rad: 0.0,
            shift_x: 0.0,
            shift_y: 0.0,
            shear: 0.0,
            zoom: 1.0,
            flip_horizontal: false,
            brightness: 1.0,
        }
    }

    pub fn random<R: Rng>(rng: &mut R, width: u32, height: u32) -> AugmentParams {
        AugmentParams {
            rotation_rad: rng.gen_range(-ROTATION_DEGREES..=ROTATION_DEGREES).to_radians(),
            shift_x: rng.gen_range(-SHIFT_FRACTION..=SHIFT_FRACTION) * width as f64,
            shift_y: rng.gen_range(-SHIFT_FRACTION..=SHIFT_FRACTION) * height as f64,
            shear: rng.gen_range(-SHEAR_RANGE..=SHEAR_RANGE),
            zoom: rng.gen_range(1.0 - ZOOM_RANGE..=1.0 + ZOOM_RANGE),
            flip_horizontal: rng.gen_bool(0.5),
            brightness: rng.gen_range(BRIGHTNESS_LO..=BRIGHTNESS_HI),
        }
    }
}

/// Applies a random transform sampled from the configured ranges.
pub fn random_augment<R: Rng>(image: &RgbImage, rng: &mut R) -> RgbImage {
    let params = AugmentParams::random(rng, image.width(), image.height());
    apply(image, &params)
}

/// Applies one transform. The affine part (zoom · rotation · shear, plus
/// translation) is evaluated by inverse mapping: for each output pixel the
/// source coordinate is computed and sampled nearest-neighbor, clamped to the
/// image bounds (nearest-edge fill).
pub fn apply(image: &RgbImage, params: &AugmentParams) -> RgbImage {
    let (w, h) = (image.width(), image.height());
    let cx = (w as f64 - 1.0) / 2.0;
    let cy = (h as f64 - 1.0) / 2.0;

    // Forward map: p' = Z · R(θ) · Shear(λ) · (p - c) + c + t.
    // Inverse:     p  = Shear(-λ) · R(-θ) · (p' - c - t) / z + c.
    let cos = params.rotation_rad.cos();
    let sin = params.rotation_rad.sin();
    let inv_zoom = 1.0 / params.zoom;

    let mut out = RgbImage::new(w, h);
    for (x, y, pixel) in out.enumerate_pixels_mut() {
        let dx = (x as f64 - cx - params.shift_x) * inv_zoom;
        let dy = (y as f64 - cy - params.shift_y) * inv_zoom;

        // R(-θ)
        let rx = cos * dx + sin * dy;
        let ry = -sin * dx + cos * dy;

        // Shear(-λ) in x
        let sx = rx - params.shear * ry;
        let sy = ry;

        let mut src_x = sx + cx;
        let src_y = sy + cy;
        if params.flip_horizontal {
            src_x = (w as f64 - 1.0) - src_x;
        }

        let px = (src_x.round()).clamp(0.0, (w - 1) as f64) as u32;
        let py = (src_y.round()).clamp(0.0, (h - 1) as f64) as u32;

        let src = image.get_pixel(px, py);
        let scaled = src
            .0
            .map(|c| ((c as f64 * params.brightness).round()).clamp(0.0, 255.0) as u8);
        *pixel = image::Rgb(scaled);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient_image(w: u32, h: u32) -> RgbImage {
        let mut img = RgbImage::new(w, h);
        for (x, y, p) in img.enumerate_pixels_mut() {
            *p = image::Rgb([(x * 10) as u8, (y * 10) as u8, 100]);
        }
        img
    }

    #[test]
    fn identity_params_leave_image_unchanged() {
        let img = gradient_image(8, 8);
        let out = apply(&img, &AugmentParams::identity());
        assert_eq!(img, out);
    }

    #[test]
    fn horizontal_flip_mirrors_columns() {
        let img = gradient_image(8, 8);
        let params = AugmentParams {
            flip_horizontal: true,
            ..AugmentParams::identity()
        };
        let out = apply(&img, &params);
        for y in 0..8 {
            for x in 0..8 {
                assert_eq!(out.get_pixel(x, y), img.get_pixel(7 - x, y));
            }
        }
    }

    #[test]
    fn brightness_scales_and_saturates() {
        let mut img = RgbImage::new(1, 1);
        img.put_pixel(0, 0, image::Rgb([100, 200, 250]));
        let params = AugmentParams {
            brightness: 1.2,
            ..AugmentParams::identity()
        };
        let out = apply(&img, &params);
        assert_eq!(out.get_pixel(0, 0).0, [120, 240, 255]);
    }

    #[test]
    fn output_dimensions_are_preserved() {
        let img = gradient_image(16, 16);
        let mut rng = rand::thread_rng();
        let out = random_augment(&img, &mut rng);
        assert_eq!((out.width(), out.height()), (16, 16));
    }
}
