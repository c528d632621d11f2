use std::{fs, path::Path};

use imwarp_image::{Image, ImageSize};
use jpeg_encoder::{ColorType, Encoder};

use crate::{conv_utils::convert_buf_to_rgb8, error::IoError};

/// Writes the given JPEG _(rgb8)_ data to the given file path.
///
/// # Arguments
///
/// - `file_path` - The path to the JPEG image.
/// - `image` - The image to write.
/// - `quality` - The quality of the JPEG encoding, range from 0 (lowest) to 100 (highest)
pub fn write_image_jpeg_rgb8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 3>,
    quality: u8,
) -> Result<(), IoError> {
    let bytes = encode_image_jpeg_rgb8(image, quality)?;
    fs::write(file_path, bytes)?;
    Ok(())
}

/// Encodes the given rgb8 image into JPEG bytes.
///
/// # Arguments
///
/// - `image` - The image to encode.
/// - `quality` - The quality of the JPEG encoding, range from 0 (lowest) to 100 (highest)
pub fn encode_image_jpeg_rgb8(image: &Image<u8, 3>, quality: u8) -> Result<Vec<u8>, IoError> {
    encode_jpeg_impl(image, ColorType::Rgb, quality)
}

fn encode_jpeg_impl<const C: usize>(
    image: &Image<u8, C>,
    color_type: ColorType,
    quality: u8,
) -> Result<Vec<u8>, IoError> {
    let image_size = image.size();
    let (width, height) = match (
        u16::try_from(image_size.width),
        u16::try_from(image_size.height),
    ) {
        (Ok(w), Ok(h)) => (w, h),
        _ => {
            return Err(IoError::ImageTooLarge(
                image_size.width,
                image_size.height,
            ))
        }
    };

    let mut bytes = Vec::new();
    let encoder = Encoder::new(&mut bytes, quality);
    encoder.encode(image.as_slice(), width, height, color_type)?;
    Ok(bytes)
}

/// Read a JPEG image with three channels _(rgb8)_.
///
/// # Arguments
///
/// - `file_path` - The path to the JPEG file.
///
/// # Returns
///
/// A RGB image with three channels _(rgb8)_.
pub fn read_image_jpeg_rgb8(file_path: impl AsRef<Path>) -> Result<Image<u8, 3>, IoError> {
    let file_path = file_path.as_ref();
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    if file_path.extension().map_or(true, |ext| {
        !ext.eq_ignore_ascii_case("jpg") && !ext.eq_ignore_ascii_case("jpeg")
    }) {
        return Err(IoError::InvalidFileExtension(file_path.to_path_buf()));
    }

    let jpeg_data = fs::read(file_path)?;
    decode_image_jpeg_rgb8(&jpeg_data)
}

/// Decodes a JPEG image with three channels (rgb8) from raw bytes.
///
/// Grayscale streams are replicated into the three color channels.
///
/// # Arguments
///
/// - `bytes` - Raw bytes of the jpeg file
pub fn decode_image_jpeg_rgb8(bytes: &[u8]) -> Result<Image<u8, 3>, IoError> {
    let mut decoder = zune_jpeg::JpegDecoder::new(bytes);
    decoder.decode_headers()?;

    let image_info = decoder.info().ok_or_else(|| {
        IoError::JpegDecodingError(zune_jpeg::errors::DecodeErrors::Format(String::from(
            "Failed to find image info from its metadata",
        )))
    })?;

    let image_size = ImageSize {
        width: image_info.width as usize,
        height: image_info.height as usize,
    };

    let img_data = decoder.decode()?;

    let area = image_size.area();
    let channels = if area == 0 { 0 } else { img_data.len() / area };
    let rgb = match convert_buf_to_rgb8(&img_data, channels) {
        Some(rgb) if channels * area == img_data.len() => rgb,
        _ => {
            return Err(IoError::JpegDecodingError(
                zune_jpeg::errors::DecodeErrors::Format(format!(
                    "Unexpected decoded buffer of {} bytes for a {} image",
                    img_data.len(),
                    image_size
                )),
            ))
        }
    };

    Ok(Image::new(image_size, rgb)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_image(width: usize, height: usize, rgb: [u8; 3]) -> Result<Image<u8, 3>, IoError> {
        let data = rgb
            .iter()
            .copied()
            .cycle()
            .take(width * height * 3)
            .collect();
        Ok(Image::new([width, height].into(), data)?)
    }

    fn assert_close(actual: &[u8], expected: &[u8], tol: u8) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!(a.abs_diff(*e) <= tol, "{a} differs from {e} by more than {tol}");
        }
    }

    #[test]
    fn encode_decode_jpeg_rgb8() -> Result<(), IoError> {
        let image = flat_image(16, 8, [200, 100, 50])?;
        let bytes = encode_image_jpeg_rgb8(&image, 100)?;
        assert_eq!(&bytes[..3], &[0xff, 0xd8, 0xff]);

        let decoded = decode_image_jpeg_rgb8(&bytes)?;
        assert_eq!(decoded.cols(), 16);
        assert_eq!(decoded.rows(), 8);
        assert_close(decoded.as_slice(), image.as_slice(), 4);
        Ok(())
    }

    #[test]
    fn decode_jpeg_gray() -> Result<(), IoError> {
        let gray = Image::<u8, 1>::from_size_val([8, 8].into(), 128)?;
        let bytes = encode_jpeg_impl(&gray, ColorType::Luma, 100)?;

        let decoded = decode_image_jpeg_rgb8(&bytes)?;
        assert_eq!(decoded.size(), gray.size());
        assert_close(decoded.as_slice(), &[128; 8 * 8 * 3], 2);
        Ok(())
    }

    #[test]
    fn decode_jpeg_garbage() {
        let res = decode_image_jpeg_rgb8(b"not a jpeg stream");
        assert!(matches!(res, Err(IoError::JpegDecodingError(_))));
    }

    #[test]
    fn encode_jpeg_too_large() -> Result<(), IoError> {
        let image = Image::<u8, 3>::from_size_val([70_000, 1].into(), 0)?;
        let res = encode_image_jpeg_rgb8(&image, 90);
        assert!(matches!(res, Err(IoError::ImageTooLarge(70_000, 1))));
        Ok(())
    }

    #[test]
    fn read_write_jpeg() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;

        let file_path = tmp_dir.path().join("flat.jpeg");
        let image = flat_image(24, 12, [10, 220, 130])?;
        write_image_jpeg_rgb8(&file_path, &image, 95)?;
        assert!(file_path.exists(), "File does not exist: {:?}", file_path);

        let image_back = read_image_jpeg_rgb8(&file_path)?;
        assert_eq!(image_back.cols(), 24);
        assert_eq!(image_back.rows(), 12);
        assert_eq!(image_back.num_channels(), 3);
        Ok(())
    }

    #[test]
    fn read_jpeg_wrong_extension() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("flat.png");
        fs::write(&file_path, [0u8; 4])?;

        let res = read_image_jpeg_rgb8(&file_path);
        assert!(matches!(res, Err(IoError::InvalidFileExtension(_))));
        Ok(())
    }
}
