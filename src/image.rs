use crate::{error::Error, result::Result};

/// RGBA still image, used for evidentiary capture encoding.
pub struct Image(image::RgbaImage);

impl Image {
    pub fn encode_jpeg(&self) -> Result<Vec<u8>> {
        let mut buf = std::io::Cursor::new(Vec::new());
        // jpeg has no alpha channel
        image::DynamicImage::ImageRgba8(self.0.clone())
            .to_rgb8()
            .write_to(&mut buf, image::ImageFormat::Jpeg)
            .map_err(Error::ImageError)?;
        Ok(buf.into_inner())
    }
}

impl From<image::RgbaImage> for Image {
    fn from(value: image::RgbaImage) -> Self {
        Self(value)
    }
}

impl From<&crate::cv::Matrix> for Image {
    fn from(value: &crate::cv::Matrix) -> Self {
        let (w, h) = value.dimensions();
        let bytes = value.bgr_bytes();
        let mut rgba = image::RgbaImage::new(w as u32, h as u32);
        for (x, y, pixel) in rgba.enumerate_pixels_mut() {
            let idx = 3 * (y as usize * w + x as usize);
            // BGR -> RGBA
            *pixel = image::Rgba([bytes[idx + 2], bytes[idx + 1], bytes[idx], u8::MAX]);
        }
        Self(rgba)
    }
}

impl std::ops::Deref for Image {
    type Target = image::RgbaImage;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::ops::DerefMut for Image {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

#[cfg(test)]
mod test {
    use super::Image;

    #[test]
    fn encodes_rgba_to_jpeg() {
        let rgba = image::RgbaImage::from_pixel(8, 8, image::Rgba([10, 20, 30, 255]));
        let bytes = Image::from(rgba).encode_jpeg().unwrap();
        // SOI marker
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    }
}
