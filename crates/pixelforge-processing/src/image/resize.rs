use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};

/// Bounding box for fit-inside resizing. `None` leaves an axis unconstrained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResizeBounds {
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
}

impl ResizeBounds {
    pub fn new(max_width: Option<u32>, max_height: Option<u32>) -> Self {
        Self {
            max_width,
            max_height,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.max_width.is_none() && self.max_height.is_none()
    }
}

/// Image resize operations
pub struct ImageResize;

impl ImageResize {
    /// Largest size with the original aspect ratio that fits inside `bounds`.
    ///
    /// Never enlarges: images already inside the box keep their dimensions.
    pub fn fit_within(orig_width: u32, orig_height: u32, bounds: ResizeBounds) -> (u32, u32) {
        if orig_width == 0 || orig_height == 0 {
            return (orig_width, orig_height);
        }

        let width_scale = bounds
            .max_width
            .map(|w| w as f64 / orig_width as f64)
            .unwrap_or(f64::INFINITY);
        let height_scale = bounds
            .max_height
            .map(|h| h as f64 / orig_height as f64)
            .unwrap_or(f64::INFINITY);

        let scale = width_scale.min(height_scale);
        if scale >= 1.0 {
            return (orig_width, orig_height);
        }

        let width = ((orig_width as f64 * scale).round() as u32).max(1);
        let height = ((orig_height as f64 * scale).round() as u32).max(1);
        (width, height)
    }

    /// Resize to fit inside `bounds` with Lanczos3.
    ///
    /// The input is returned untouched when it already fits.
    pub fn resize_to_fit(img: DynamicImage, bounds: ResizeBounds) -> DynamicImage {
        if bounds.is_unbounded() {
            return img;
        }

        let (orig_width, orig_height) = img.dimensions();
        let (width, height) = Self::fit_within(orig_width, orig_height, bounds);
        if (width, height) == (orig_width, orig_height) {
            return img;
        }

        tracing::debug!(
            from_width = orig_width,
            from_height = orig_height,
            to_width = width,
            to_height = height,
            "Resizing image"
        );

        img.resize_exact(width, height, FilterType::Lanczos3)
    }
}
