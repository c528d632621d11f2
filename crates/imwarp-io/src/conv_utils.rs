/// Convert an interleaved 8-bit buffer with `channels` channels into RGB.
///
/// Gray is replicated into the three color channels and alpha is dropped,
/// matching how color decoders treat transparency.
pub(crate) fn convert_buf_to_rgb8(buf: &[u8], channels: usize) -> Option<Vec<u8>> {
    match channels {
        1 => Some(buf.iter().flat_map(|&g| [g, g, g]).collect()),
        2 => Some(
            buf.chunks_exact(2)
                .flat_map(|ga| [ga[0], ga[0], ga[0]])
                .collect(),
        ),
        3 => Some(buf.to_vec()),
        4 => Some(
            buf.chunks_exact(4)
                .flat_map(|rgba| [rgba[0], rgba[1], rgba[2]])
                .collect(),
        ),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::convert_buf_to_rgb8;

    #[test]
    fn gray_to_rgb() {
        assert_eq!(convert_buf_to_rgb8(&[1, 2], 1), Some(vec![1, 1, 1, 2, 2, 2]));
    }

    #[test]
    fn gray_alpha_to_rgb() {
        assert_eq!(convert_buf_to_rgb8(&[7, 255], 2), Some(vec![7, 7, 7]));
    }

    #[test]
    fn rgba_to_rgb() {
        assert_eq!(
            convert_buf_to_rgb8(&[1, 2, 3, 4, 5, 6, 7, 8], 4),
            Some(vec![1, 2, 3, 5, 6, 7])
        );
    }

    #[test]
    fn unknown_channels() {
        assert_eq!(convert_buf_to_rgb8(&[0; 5], 5), None);
    }
}
