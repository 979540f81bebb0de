// Image normalization for the classifier input

use image::imageops::FilterType;

/// Model input edge length in pixels.
pub const INPUT_SIZE: u32 = 255;
/// RGB channel count.
pub const INPUT_CHANNELS: usize = 3;

/// Decode uploaded bytes and normalize them to the model's input layout:
/// 3-channel RGB, resized to exactly 255x255, scaled into [0,1], NHWC order.
/// The leading batch dimension is added by the caller when the tensor is built.
pub fn image_to_tensor(bytes: &[u8]) -> Result<Vec<f32>, image::ImageError> {
    let img = image::load_from_memory(bytes)?;
    let rgb = img
        .resize_exact(INPUT_SIZE, INPUT_SIZE, FilterType::Triangle)
        .to_rgb8();

    Ok(rgb
        .into_raw()
        .into_iter()
        .map(|v| f32::from(v) / 255.0)
        .collect())
}
