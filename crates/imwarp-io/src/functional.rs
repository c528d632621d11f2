use std::{fs, path::Path};

use imwarp_image::Image;

use crate::{
    error::IoError,
    jpeg::{decode_image_jpeg_rgb8, write_image_jpeg_rgb8},
    png::{decode_image_png_rgb8, write_image_png_rgb8},
};

const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";
const JPEG_MAGIC: &[u8] = &[0xff, 0xd8, 0xff];

/// Image container formats understood by this crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageFormat {
    /// Portable Network Graphics.
    Png,
    /// JPEG / JFIF.
    Jpeg,
}

impl ImageFormat {
    /// Guess the format from the leading magic bytes of an encoded stream.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(PNG_MAGIC) {
            Some(Self::Png)
        } else if bytes.starts_with(JPEG_MAGIC) {
            Some(Self::Jpeg)
        } else {
            None
        }
    }

    /// Guess the format from a file extension (`png`, `jpg` or `jpeg`).
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("png") {
            Some(Self::Png)
        } else if ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg") {
            Some(Self::Jpeg)
        } else {
            None
        }
    }
}

/// Decodes a PNG or JPEG stream into an rgb8 image.
///
/// The format is sniffed from the content, so a file name is not needed.
///
/// # Arguments
///
/// * `bytes` - The encoded image.
///
/// # Returns
///
/// A RGB image with three channels (rgb8).
pub fn decode_image_rgb8(bytes: &[u8]) -> Result<Image<u8, 3>, IoError> {
    match ImageFormat::from_bytes(bytes) {
        Some(ImageFormat::Png) => decode_image_png_rgb8(bytes),
        Some(ImageFormat::Jpeg) => decode_image_jpeg_rgb8(bytes),
        None => Err(IoError::UnsupportedFormat),
    }
}

/// Reads a PNG or JPEG image from disk as rgb8.
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
///
/// # Returns
///
/// A RGB image with three channels (rgb8).
pub fn read_image_rgb8(file_path: impl AsRef<Path>) -> Result<Image<u8, 3>, IoError> {
    let file_path = file_path.as_ref();
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    let bytes = fs::read(file_path)?;
    decode_image_rgb8(&bytes)
}

/// Writes an rgb8 image, picking the container from the file extension.
///
/// # Arguments
///
/// * `file_path` - The destination, ending in `.png`, `.jpg` or `.jpeg`.
/// * `image` - The image to write.
/// * `quality` - The JPEG quality, ignored for PNG.
pub fn write_image_rgb8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 3>,
    quality: u8,
) -> Result<(), IoError> {
    let file_path = file_path.as_ref();
    match ImageFormat::from_path(file_path) {
        Some(ImageFormat::Png) => write_image_png_rgb8(file_path, image),
        Some(ImageFormat::Jpeg) => write_image_jpeg_rgb8(file_path, image, quality),
        None => Err(IoError::InvalidFileExtension(file_path.to_path_buf())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{jpeg::encode_image_jpeg_rgb8, png::encode_image_png_rgb8};

    fn checker() -> Result<Image<u8, 3>, IoError> {
        let data = (0..8 * 8)
            .flat_map(|i| {
                let v = if (i / 8 + i % 8) % 2 == 0 { 255 } else { 0 };
                [v, v, v]
            })
            .collect();
        Ok(Image::new([8, 8].into(), data)?)
    }

    #[test]
    fn format_from_bytes() {
        assert_eq!(
            ImageFormat::from_bytes(b"\x89PNG\r\n\x1a\n...."),
            Some(ImageFormat::Png)
        );
        assert_eq!(
            ImageFormat::from_bytes(&[0xff, 0xd8, 0xff, 0xe0]),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(ImageFormat::from_bytes(b"GIF89a"), None);
        assert_eq!(ImageFormat::from_bytes(&[]), None);
    }

    #[test]
    fn format_from_path() {
        assert_eq!(ImageFormat::from_path("a/b.PNG"), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_path("c.jpg"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_path("d.JPEG"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_path("e.bmp"), None);
        assert_eq!(ImageFormat::from_path("noext"), None);
    }

    #[test]
    fn decode_sniffs_format() -> Result<(), IoError> {
        let image = checker()?;

        let png = decode_image_rgb8(&encode_image_png_rgb8(&image)?)?;
        assert_eq!(png, image);

        let jpeg = decode_image_rgb8(&encode_image_jpeg_rgb8(&image, 90)?)?;
        assert_eq!(jpeg.size(), image.size());

        Ok(())
    }

    #[test]
    fn decode_unsupported() {
        let res = decode_image_rgb8(b"BM this is a bitmap");
        assert!(matches!(res, Err(IoError::UnsupportedFormat)));
    }

    #[test]
    fn read_write_by_extension() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let image = checker()?;

        let png_path = tmp_dir.path().join("checker.png");
        write_image_rgb8(&png_path, &image, 90)?;
        assert_eq!(read_image_rgb8(&png_path)?, image);

        let jpeg_path = tmp_dir.path().join("checker.jpg");
        write_image_rgb8(&jpeg_path, &image, 90)?;
        assert_eq!(read_image_rgb8(&jpeg_path)?.size(), image.size());

        let res = write_image_rgb8(tmp_dir.path().join("checker.tiff"), &image, 90);
        assert!(matches!(res, Err(IoError::InvalidFileExtension(_))));

        Ok(())
    }
}
