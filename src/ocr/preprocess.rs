//! Bitmap cleanup ahead of OCR.

use image::{DynamicImage, GrayImage, Luma};
use imageproc::contrast::otsu_level;
use imageproc::distance_transform::Norm;
use imageproc::morphology::{dilate, erode};

use super::backend::ExtractionError;

/// Foreground value written by binarization.
const WHITE: u8 = 255;

/// Normalize a scan for OCR: grayscale, Otsu binarization, then one 3x3
/// dilation followed by one 3x3 erosion.
///
/// The input is not modified. Fails on zero-area images.
pub fn preprocess(image: &DynamicImage) -> Result<GrayImage, ExtractionError> {
    if image.width() == 0 || image.height() == 0 {
        return Err(ExtractionError::ImageProcessing(format!(
            "image has zero area ({}x{})",
            image.width(),
            image.height()
        )));
    }

    let gray = to_grayscale(image);
    let level = otsu_level(&gray);
    tracing::debug!(
        "Preprocessing {}x{} image, Otsu level {}",
        gray.width(),
        gray.height(),
        level
    );

    let binary = binarize(&gray, level);
    // LInf radius 1 is the 3x3 square structuring element
    let dilated = dilate(&binary, Norm::LInf, 1);
    Ok(erode(&dilated, Norm::LInf, 1))
}

/// Convert to a single channel using BT.601 luma weights.
///
/// Images that are already single-channel are copied as-is.
pub fn to_grayscale(image: &DynamicImage) -> GrayImage {
    if image.color().channel_count() <= 2 {
        return image.to_luma8();
    }

    let rgb = image.to_rgb8();
    GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0;
        let luma = 0.299 * f32::from(r) + 0.587 * f32::from(g) + 0.114 * f32::from(b);
        Luma([luma.round().clamp(0.0, 255.0) as u8])
    })
}

/// Binary threshold: pixels strictly above `level` become white, the rest black.
pub fn binarize(gray: &GrayImage, level: u8) -> GrayImage {
    let mut out = gray.clone();
    for pixel in out.pixels_mut() {
        pixel.0[0] = if pixel.0[0] > level { WHITE } else { 0 };
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn split_image(width: u32, height: u32, dark: u8, light: u8) -> GrayImage {
        GrayImage::from_fn(width, height, |x, _| {
            if x < width / 2 {
                Luma([dark])
            } else {
                Luma([light])
            }
        })
    }

    #[test]
    fn test_zero_area_is_processing_error() {
        let empty = DynamicImage::new_luma8(0, 0);
        assert!(matches!(
            preprocess(&empty),
            Err(ExtractionError::ImageProcessing(_))
        ));
    }

    #[test]
    fn test_output_is_binary_and_same_size() {
        let gray = split_image(24, 16, 30, 220);
        let out = preprocess(&DynamicImage::ImageLuma8(gray)).unwrap();

        assert_eq!(out.dimensions(), (24, 16));
        assert!(out.pixels().all(|p| p.0[0] == 0 || p.0[0] == WHITE));
        assert_eq!(out.get_pixel(2, 8).0[0], 0);
        assert_eq!(out.get_pixel(20, 8).0[0], WHITE);
    }

    #[test]
    fn test_speckle_is_removed() {
        let mut gray = GrayImage::from_pixel(15, 15, Luma([240]));
        gray.put_pixel(7, 7, Luma([10]));

        let out = preprocess(&DynamicImage::ImageLuma8(gray)).unwrap();
        assert_eq!(out.get_pixel(7, 7).0[0], WHITE);
    }

    #[test]
    fn test_input_not_mutated() {
        let gray = split_image(10, 10, 50, 200);
        let image = DynamicImage::ImageLuma8(gray.clone());
        let _ = preprocess(&image).unwrap();
        assert_eq!(image.to_luma8(), gray);
    }

    #[test]
    fn test_color_uses_bt601_weights() {
        let rgb = RgbImage::from_pixel(2, 2, Rgb([255, 0, 0]));
        let gray = to_grayscale(&DynamicImage::ImageRgb8(rgb));
        assert_eq!(gray.get_pixel(0, 0).0[0], 76);
    }

    #[test]
    fn test_binarize_is_strictly_greater() {
        let gray = GrayImage::from_raw(3, 1, vec![99, 100, 101]).unwrap();
        let out = binarize(&gray, 100);
        assert_eq!(out.into_raw(), vec![0, 0, WHITE]);
    }
}
