//! Raster operations used to compose a card side.
//!
//! All functions work on an RGBA canvas in place and clip to its bounds.

use crate::config::{CardSize, Rect};
use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};

/// Scale `image` to exactly `size`, ignoring aspect ratio.
///
/// Templates are designed at card size; anything else is stretched to fill
/// the canvas, the same way the photo is stretched into its rectangle.
pub fn fit_to_canvas(image: &DynamicImage, size: CardSize) -> RgbaImage {
    if image.width() == size.width && image.height() == size.height {
        return image.to_rgba8();
    }
    image
        .resize_exact(size.width, size.height, FilterType::Lanczos3)
        .to_rgba8()
}

/// Blank white canvas.
pub fn blank_canvas(size: CardSize) -> RgbaImage {
    RgbaImage::from_pixel(size.width, size.height, Rgba([255, 255, 255, 255]))
}

/// Stretch `image` into `rect` and alpha-blend it onto `canvas`.
pub fn draw_stretched(canvas: &mut RgbaImage, image: &DynamicImage, rect: Rect) {
    let scaled = if image.width() == rect.width && image.height() == rect.height {
        image.to_rgba8()
    } else {
        imageops::resize(&image.to_rgba8(), rect.width, rect.height, FilterType::Lanczos3)
    };
    imageops::overlay(canvas, &scaled, i64::from(rect.x), i64::from(rect.y));
}

/// Fill `rect` with an opaque color.
pub fn fill_rect(canvas: &mut RgbaImage, rect: Rect, color: [u8; 3]) {
    let x_end = rect.x.saturating_add(rect.width).min(canvas.width());
    let y_end = rect.y.saturating_add(rect.height).min(canvas.height());
    let [r, g, b] = color;
    for y in rect.y..y_end {
        for x in rect.x..x_end {
            canvas.put_pixel(x, y, Rgba([r, g, b, 255]));
        }
    }
}

/// Composite over white and drop the alpha channel.
///
/// PDF pages carry opaque RGB images; transparent template regions print as
/// paper.
pub fn flatten_to_rgb(image: &RgbaImage) -> RgbImage {
    let mut out = RgbImage::new(image.width(), image.height());
    for (dst, src) in out.pixels_mut().zip(image.pixels()) {
        let Rgba([r, g, b, a]) = *src;
        let a = u16::from(a);
        let over_white = |c: u8| ((u16::from(c) * a + 255 * (255 - a) + 127) / 255) as u8;
        *dst = Rgb([over_white(r), over_white(g), over_white(b)]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(width: u32, height: u32) -> CardSize {
        CardSize { width, height }
    }

    #[test]
    fn fit_to_canvas_stretches_to_exact_size() {
        let src = DynamicImage::new_rgb8(10, 30);
        let out = fit_to_canvas(&src, size(40, 20));
        assert_eq!(out.dimensions(), (40, 20));
    }

    #[test]
    fn fit_to_canvas_keeps_matching_size() {
        let src = DynamicImage::ImageRgba8(RgbaImage::from_pixel(8, 6, Rgba([1, 2, 3, 255])));
        let out = fit_to_canvas(&src, size(8, 6));
        assert_eq!(out.get_pixel(7, 5), &Rgba([1, 2, 3, 255]));
    }

    #[test]
    fn draw_stretched_covers_only_the_rect() {
        let mut canvas = blank_canvas(size(20, 20));
        let photo = DynamicImage::ImageRgba8(RgbaImage::from_pixel(3, 3, Rgba([255, 0, 0, 255])));
        let rect = Rect {
            x: 5,
            y: 6,
            width: 4,
            height: 2,
        };
        draw_stretched(&mut canvas, &photo, rect);

        assert_eq!(canvas.get_pixel(5, 6), &Rgba([255, 0, 0, 255]));
        assert_eq!(canvas.get_pixel(8, 7), &Rgba([255, 0, 0, 255]));
        assert_eq!(canvas.get_pixel(4, 6), &Rgba([255, 255, 255, 255]));
        assert_eq!(canvas.get_pixel(9, 7), &Rgba([255, 255, 255, 255]));
        assert_eq!(canvas.get_pixel(5, 8), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn fill_rect_clips_to_canvas() {
        let mut canvas = blank_canvas(size(10, 10));
        let rect = Rect {
            x: 8,
            y: 8,
            width: 5,
            height: 5,
        };
        fill_rect(&mut canvas, rect, [0xCC, 0xCC, 0xCC]);
        assert_eq!(canvas.get_pixel(9, 9), &Rgba([0xCC, 0xCC, 0xCC, 255]));
        assert_eq!(canvas.get_pixel(7, 7), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn flatten_composites_over_white() {
        let mut img = RgbaImage::new(3, 1);
        img.put_pixel(0, 0, Rgba([0, 0, 0, 255]));
        img.put_pixel(1, 0, Rgba([0, 0, 0, 0]));
        img.put_pixel(2, 0, Rgba([0, 0, 0, 128]));
        let flat = flatten_to_rgb(&img);
        assert_eq!(flat.get_pixel(0, 0), &Rgb([0, 0, 0]));
        assert_eq!(flat.get_pixel(1, 0), &Rgb([255, 255, 255]));
        assert_eq!(flat.get_pixel(2, 0), &Rgb([127, 127, 127]));
    }
}
