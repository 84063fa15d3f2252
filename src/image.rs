use std::path::Path;

use crate::array2d::Array2d;
use crate::vec::{Color3, to_srgb};
use image::{DynamicImage, GenericImage};

/// Quantize a linear color to an 8-bit sRGB pixel (alpha fixed at 255)
#[must_use]
pub fn to_rgba8(c: &Color3) -> image::Rgba<u8> {
    let p = to_srgb(&Color3::new(
        c.x.clamp(0.0, 1.0),
        c.y.clamp(0.0, 1.0),
        c.z.clamp(0.0, 1.0),
    ));
    image::Rgba([
        (p[0] * 255.0).round() as u8,
        (p[1] * 255.0).round() as u8,
        (p[2] * 255.0).round() as u8,
        255,
    ])
}

pub fn image_save(path: &str, data: &Array2d<Color3>) -> crate::Result<()> {
    let output_ext = Path::new(path)
        .extension()
        .and_then(std::ffi::OsStr::to_str)
        .ok_or_else(|| crate::Error::InvalidType(format!("no file extension in {path:?}")))?;

    if output_ext == "exr" {
        let mut image_hdr = DynamicImage::new_rgba32f(data.width(), data.height()).to_rgb32f();
        for x in 0..data.width() {
            for y in 0..data.height() {
                let p = data.at(x, y);
                image_hdr.put_pixel(x, y, image::Rgb([p[0], p[1], p[2]]));
            }
        }
        image_hdr
            .save(Path::new(path))
            .map_err(|e| crate::Error::Other(Box::new(e)))?;
    } else {
        let mut image_ldr = DynamicImage::new_rgb8(data.width(), data.height());
        for x in 0..data.width() {
            for y in 0..data.height() {
                image_ldr.put_pixel(x, y, to_rgba8(data.at(x, y)));
            }
        }
        image_ldr
            .save(Path::new(path))
            .map_err(|e| crate::Error::Other(Box::new(e)))?;
    }
    Ok(())
}
