use image::GrayImage;
use super::ScanError;

/// Decode the first QR code in an encoded raster (PNG, JPEG, ...).
/// `Ok(None)` means the image was readable but held no decodable code.
pub fn decode_image_bytes(bytes: &[u8]) -> Result<Option<String>, ScanError> {
    let frame = image::load_from_memory(bytes)?.to_luma8();
    Ok(decode_luma(&frame))
}

/// Run detection on a greyscale frame. Grids that fail to decode or carry only
/// whitespace are skipped.
pub fn decode_luma(frame: &GrayImage) -> Option<String> {
    let (width, height) = frame.dimensions();
    let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
        width as usize,
        height as usize,
        |x, y| frame.get_pixel(x as u32, y as u32).0[0],
    );

    prepared
        .detect_grids()
        .into_iter()
        .find_map(|grid| match grid.decode() {
            Ok((_meta, content)) => {
                let content = content.trim();
                (!content.is_empty()).then(|| content.to_string())
            }
            Err(e) => {
                tracing::debug!("Found QR grid that failed to decode: {}", e);
                None
            }
        })
}
