use crate::prelude::*;
use image::{imageops, ImageFormat, RgbImage};
use std::io::Cursor;

/// Puts `top` above `bottom` on a canvas as wide as `top`. Both are expected
/// to share a width; a wider `bottom` is clipped.
pub fn stack_vertically(top: &RgbImage, bottom: &RgbImage) -> RgbImage {
  let mut dst = RgbImage::new(top.width(), top.height() + bottom.height());
  imageops::replace(&mut dst, top, 0, 0);
  imageops::replace(&mut dst, bottom, 0, top.height() as i64);
  dst
}

pub fn add_border(img: &RgbImage, width: u32, color: Color) -> RgbImage {
  let mut dst = RgbImage::from_pixel(
    img.width() + 2 * width,
    img.height() + 2 * width,
    color.pixel(),
  );
  imageops::replace(&mut dst, img, width as i64, width as i64);
  dst
}

pub fn encode(img: &RgbImage, kind: ImageKind) -> Result<Vec<u8>> {
  let mut out = Cursor::new(Vec::new());
  img.write_to(&mut out, ImageFormat::from(kind))?;
  Ok(out.into_inner())
}
