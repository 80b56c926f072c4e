// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image fitter — decodes uploaded photos, scales them into a bounding box
// without distortion, and re-encodes them for embedding. Operates on
// in-memory images using the `image` crate.

use image::{DynamicImage, ImageFormat};
use infofoto_core::error::{InfofotoError, Result};
use infofoto_core::types::{PhotoInput, PhotoItem, ProfileSettings};
use tracing::{debug, instrument};

/// Target size for fitting a `width` x `height` image into
/// `max_width` x `max_height`.
///
/// Returns `None` when the image should be left as it is: either upscaling is
/// not allowed and the image already fits, or the scaled size equals the
/// current size. Scaled dimensions are rounded to the nearest integer and are
/// never smaller than 1.
pub fn fit_dimensions(
    width: u32,
    height: u32,
    max_width: u32,
    max_height: u32,
    allow_upscale: bool,
) -> Option<(u32, u32)> {
    if width == 0 || height == 0 {
        return None;
    }
    let ratio = (max_width as f64 / width as f64).min(max_height as f64 / height as f64);
    if !allow_upscale && ratio >= 1.0 {
        return None;
    }
    let new_w = ((width as f64 * ratio).round() as u32).max(1);
    let new_h = ((height as f64 * ratio).round() as u32).max(1);
    if (new_w, new_h) == (width, height) {
        None
    } else {
        Some((new_w, new_h))
    }
}

/// Display size on the page, in centimetres: full `max_width_cm`, unless the
/// resulting height exceeds `max_height_cm`, in which case the height is
/// capped and the width follows the aspect ratio.
pub fn display_size_cm(
    width_px: u32,
    height_px: u32,
    max_width_cm: f64,
    max_height_cm: f64,
) -> (f64, f64) {
    let aspect = if height_px == 0 {
        1.0
    } else {
        width_px as f64 / height_px as f64
    };
    let mut w = max_width_cm;
    let mut h = w / aspect;
    if h > max_height_cm {
        h = max_height_cm;
        w = h * aspect;
    }
    (w, h)
}

/// A single in-memory image.
///
/// Transformations consume `self` and return a new `ImageProcessor`, so
/// steps chain:
///
/// ```ignore
/// let jpeg = ImageProcessor::from_bytes(&upload)?
///     .fit(1920, 1080, true)
///     .to_jpeg_bytes(85)?;
/// ```
pub struct ImageProcessor {
    image: DynamicImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Decode raw encoded bytes (JPEG, PNG, etc.).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(data)
            .map_err(|err| InfofotoError::ImageError(format!("failed to decode image: {err}")))?;
        if img.width() == 0 || img.height() == 0 {
            return Err(InfofotoError::ImageError(format!(
                "image has zero dimensions ({}x{})",
                img.width(),
                img.height()
            )));
        }
        debug!(
            width = img.width(),
            height = img.height(),
            "Image decoded from bytes"
        );
        Ok(Self { image: img })
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    // -- Transformations ------------------------------------------------------

    /// Scale into `max_width` x `max_height` preserving aspect ratio, with
    /// Lanczos3 resampling. Never upscales unless `allow_upscale` is set.
    #[instrument(skip(self), fields(from_w = self.image.width(), from_h = self.image.height()))]
    pub fn fit(self, max_width: u32, max_height: u32, allow_upscale: bool) -> Self {
        match fit_dimensions(
            self.image.width(),
            self.image.height(),
            max_width,
            max_height,
            allow_upscale,
        ) {
            None => self,
            Some((w, h)) => {
                let resized = self
                    .image
                    .resize_exact(w, h, image::imageops::FilterType::Lanczos3);
                debug!(new_w = w, new_h = h, "Resize complete");
                Self { image: resized }
            }
        }
    }

    // -- Output ---------------------------------------------------------------

    /// Encode as PNG bytes.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        let mut cursor = std::io::Cursor::new(&mut buffer);
        self.image
            .write_to(&mut cursor, ImageFormat::Png)
            .map_err(|err| InfofotoError::ImageError(format!("PNG encoding failed: {err}")))?;
        Ok(buffer)
    }

    /// Encode as JPEG bytes with the given quality (1-100). Alpha is dropped.
    pub fn to_jpeg_bytes(&self, quality: u8) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        let rgb = self.image.to_rgb8();
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality);
        rgb.write_with_encoder(encoder)
            .map_err(|err| InfofotoError::ImageError(format!("JPEG encoding failed: {err}")))?;
        Ok(buffer)
    }
}

/// Decode, fit and re-encode one uploaded photo under a quality profile.
///
/// Errors are reported as `UnreadablePhoto` tagged with `position`, so the
/// caller can record the skip and move on.
pub fn prepare_photo(
    input: &PhotoInput,
    position: usize,
    profile: &ProfileSettings,
) -> Result<PhotoItem> {
    let unreadable = |err: InfofotoError| InfofotoError::UnreadablePhoto {
        position,
        reason: match err {
            InfofotoError::ImageError(detail) => detail,
            other => other.to_string(),
        },
    };

    // Missing files arrive as empty payloads.
    if input.bytes.is_empty() {
        return Err(InfofotoError::UnreadablePhoto {
            position,
            reason: "no image data".into(),
        });
    }

    let fitted = ImageProcessor::from_bytes(&input.bytes)
        .map_err(unreadable)?
        .fit(profile.max_width, profile.max_height, profile.allow_upscale);
    let jpeg = fitted.to_jpeg_bytes(profile.jpeg_quality).map_err(unreadable)?;

    Ok(PhotoItem {
        width: fitted.width(),
        height: fitted.height(),
        jpeg,
        caption: input.caption.clone(),
        source_position: position,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use infofoto_core::types::{HIGH_PROFILE, STANDARD_PROFILE};

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([90, 120, 200])));
        ImageProcessor::from_dynamic(img).to_png_bytes().unwrap()
    }

    #[test]
    fn empty_payload_is_unreadable() {
        let input = PhotoInput::new(Vec::new(), None);
        let err = prepare_photo(&input, 4, &STANDARD_PROFILE).unwrap_err();
        match err {
            InfofotoError::UnreadablePhoto { position, reason } => {
                assert_eq!(position, 4);
                assert_eq!(reason, "no image data");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn no_upscale_keeps_small_images_unchanged() {
        for (w, h) in [(100, 50), (1920, 1080), (800, 1080), (1, 1)] {
            assert_eq!(fit_dimensions(w, h, 1920, 1080, false), None, "{w}x{h}");
        }
    }

    #[test]
    fn upscale_rounds_to_nearest() {
        // ratio = min(1920/1000, 1080/700) = 1.542857...
        let ratio = (1920.0f64 / 1000.0).min(1080.0 / 700.0);
        let expected = (
            (1000.0 * ratio).round() as u32,
            (700.0 * ratio).round() as u32,
        );
        assert_eq!(fit_dimensions(1000, 700, 1920, 1080, true), Some(expected));
        assert_eq!(expected, (1543, 1080));
    }

    #[test]
    fn downscale_preserves_aspect() {
        let (w, h) = fit_dimensions(4000, 3000, 1920, 1080, false).unwrap();
        assert_eq!((w, h), (1440, 1080));
        let (w, h) = fit_dimensions(3000, 4000, 2560, 2560, false).unwrap();
        assert_eq!((w, h), (1920, 2560));
    }

    #[test]
    fn tiny_results_clamp_to_one_pixel() {
        assert_eq!(fit_dimensions(10_000, 1, 100, 100, false), Some((100, 1)));
        assert_eq!(fit_dimensions(100_000, 1, 10, 10, false), Some((10, 1)));
    }

    #[test]
    fn fit_resizes_pixels() {
        let img = ImageProcessor::from_bytes(&png(40, 20)).unwrap().fit(20, 20, false);
        assert_eq!((img.width(), img.height()), (20, 10));
        let img = ImageProcessor::from_bytes(&png(40, 20)).unwrap().fit(80, 80, true);
        assert_eq!((img.width(), img.height()), (80, 40));
    }

    #[test]
    fn display_size_caps_height() {
        let (w, h) = display_size_cm(1600, 1200, 16.0, 9.35);
        assert!((h - 9.35).abs() < 1e-9);
        assert!((w - 9.35 * 4.0 / 3.0).abs() < 1e-9);

        let (w, h) = display_size_cm(1920, 1080, 16.0, 21.7);
        assert!((w - 16.0).abs() < 1e-9);
        assert!((h - 9.0).abs() < 1e-9);
    }

    #[test]
    fn prepare_photo_applies_profile() {
        let input = PhotoInput::new(png(160, 120), Some("Vista general".into()));
        let item = prepare_photo(&input, 3, &STANDARD_PROFILE).unwrap();
        // Upscaled into 1920x1080.
        assert_eq!((item.width, item.height), (1440, 1080));
        assert_eq!(item.source_position, 3);
        assert_eq!(&item.jpeg[..2], &[0xFF, 0xD8]);

        let item = prepare_photo(&input, 0, &HIGH_PROFILE).unwrap();
        assert_eq!((item.width, item.height), (160, 120));
    }

    #[test]
    fn prepare_photo_reports_position_on_garbage() {
        let input = PhotoInput::new(b"not an image".to_vec(), None);
        match prepare_photo(&input, 5, &STANDARD_PROFILE) {
            Err(InfofotoError::UnreadablePhoto { position, .. }) => assert_eq!(position, 5),
            other => panic!("expected UnreadablePhoto, got {other:?}"),
        }
    }
}
