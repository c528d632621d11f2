use std::{fs, path::Path};

use imwarp_image::{Image, ImageSize};
use png::{BitDepth, ColorType, Decoder, Encoder, Transformations};

use crate::{conv_utils::convert_buf_to_rgb8, error::IoError};

/// Read a PNG image with three channels (rgb8).
///
/// Any PNG color type and bit depth is accepted and normalized to 8-bit RGB.
///
/// # Arguments
///
/// * `file_path` - The path to the PNG file.
///
/// # Returns
///
/// A RGB image with three channels (rgb8).
pub fn read_image_png_rgb8(file_path: impl AsRef<Path>) -> Result<Image<u8, 3>, IoError> {
    let file_path = file_path.as_ref();
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    let bytes = fs::read(file_path)?;
    decode_image_png_rgb8(&bytes)
}

/// Decodes a PNG image into three channels (rgb8) from raw bytes.
///
/// Palette images are expanded, 16-bit samples are stripped to 8 bits, gray
/// is replicated into the color channels and alpha is dropped.
///
/// # Arguments
///
/// - `bytes` - Raw bytes of the png file
pub fn decode_image_png_rgb8(bytes: &[u8]) -> Result<Image<u8, 3>, IoError> {
    let mut decoder = Decoder::new(bytes);
    decoder.set_transformations(Transformations::EXPAND | Transformations::STRIP_16);

    let mut reader = decoder
        .read_info()
        .map_err(|e| IoError::PngDecodeError(e.to_string()))?;

    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| IoError::PngDecodeError(e.to_string()))?;

    let size = ImageSize {
        width: info.width as usize,
        height: info.height as usize,
    };

    let channels = info.color_type.samples();
    let row_bytes = size.width * channels;

    // rows may carry trailing bytes beyond the packed pixel data
    let packed = buf
        .chunks(info.line_size)
        .take(size.height)
        .flat_map(|row| row[..row_bytes.min(row.len())].iter().copied())
        .collect::<Vec<u8>>();

    let rgb = convert_buf_to_rgb8(&packed, channels).ok_or_else(|| {
        IoError::PngDecodeError(format!("unsupported color type {:?}", info.color_type))
    })?;

    Ok(Image::new(size, rgb)?)
}

/// Encodes the given rgb8 image into PNG bytes.
///
/// # Arguments
///
/// - `image` - The image to encode.
pub fn encode_image_png_rgb8(image: &Image<u8, 3>) -> Result<Vec<u8>, IoError> {
    let mut bytes = Vec::new();
    encode_png_impl(
        &mut bytes,
        image.as_slice(),
        image.size(),
        BitDepth::Eight,
        ColorType::Rgb,
    )?;
    Ok(bytes)
}

/// Writes the given PNG _(rgb8)_ data to the given file path.
///
/// # Arguments
///
/// - `file_path` - The path to the PNG image.
/// - `image` - The image to write.
pub fn write_image_png_rgb8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 3>,
) -> Result<(), IoError> {
    let bytes = encode_image_png_rgb8(image)?;
    fs::write(file_path, bytes)?;
    Ok(())
}

fn encode_png_impl<W: std::io::Write>(
    writer: W,
    image_data: &[u8],
    image_size: ImageSize,
    // Make sure you set `depth` correctly
    depth: BitDepth,
    color_type: ColorType,
) -> Result<(), IoError> {
    let (width, height) = match (
        u32::try_from(image_size.width),
        u32::try_from(image_size.height),
    ) {
        (Ok(w), Ok(h)) => (w, h),
        _ => {
            return Err(IoError::ImageTooLarge(
                image_size.width,
                image_size.height,
            ))
        }
    };

    let mut encoder = Encoder::new(writer, width, height);
    encoder.set_color(color_type);
    encoder.set_depth(depth);

    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::PngEncodingError(e.to_string()))?;
    writer
        .write_image_data(image_data)
        .map_err(|e| IoError::PngEncodingError(e.to_string()))?;
    writer
        .finish()
        .map_err(|e| IoError::PngEncodingError(e.to_string()))?;
    Ok(())
}
