use image::RgbImage;

/// One decoded frame, in decode order.
pub struct Frame {
    pub image: RgbImage,
    /// Position in the source's decode sequence (0-based).
    pub frame_number: u64,
}
