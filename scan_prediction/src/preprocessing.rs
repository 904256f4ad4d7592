use crate::{
    config::{ChannelPolicy, Normalization, PreprocessOptions, TensorLayout},
    error::PredictionError,
};
use image::{imageops::FilterType, DynamicImage, ImageFormat, RgbImage};
use ndarray::{Array, Ix4};
use std::io::Cursor;

/// Decodes uploaded bytes. The format is sniffed from the content, so a text
/// file renamed to `.jpg` is still rejected.
pub fn decode_image(image_data: &[u8]) -> Result<DynamicImage, PredictionError> {
    let image_reader = image::ImageReader::new(Cursor::new(image_data))
        .with_guessed_format()
        .map_err(|e| PredictionError::Decode(format!("Error reading image: {}", e)))?;

    match image_reader.format() {
        Some(ImageFormat::Jpeg) | Some(ImageFormat::Png) => {}
        Some(other) => {
            return Err(PredictionError::Decode(format!(
                "Unsupported image format {:?}, expected JPEG or PNG",
                other
            )))
        }
        None => {
            return Err(PredictionError::Decode(
                "Data is not a recognizable image".to_string(),
            ))
        }
    }

    image_reader
        .decode()
        .map_err(|e| PredictionError::Decode(format!("Error decoding image: {}", e)))
}

pub fn coerce_channels(
    image: &DynamicImage,
    policy: ChannelPolicy,
) -> Result<RgbImage, PredictionError> {
    if image.width() == 0 || image.height() == 0 {
        return Err(PredictionError::ShapeMismatch(format!(
            "Image has no pixels ({}x{})",
            image.width(),
            image.height()
        )));
    }

    let channels = image.color().channel_count();
    match policy {
        ChannelPolicy::Replicate => Ok(image.to_rgb8()),
        ChannelPolicy::Strict if channels == 3 => Ok(image.to_rgb8()),
        ChannelPolicy::Strict => Err(PredictionError::ShapeMismatch(format!(
            "Expected 3 color channels, got {} ({:?})",
            channels,
            image.color()
        ))),
    }
}

pub fn to_tensor(
    image: &RgbImage,
    normalization: Normalization,
    layout: TensorLayout,
) -> Array<f32, Ix4> {
    let (width, height) = (image.width() as usize, image.height() as usize);
    let shape = match layout {
        TensorLayout::Nhwc => (1, height, width, 3),
        TensorLayout::Nchw => (1, 3, height, width),
    };

    let mut input = Array::zeros(shape);
    for (x, y, pixel) in image.enumerate_pixels() {
        let (x, y) = (x as usize, y as usize);
        for (c, value) in pixel.0.iter().enumerate() {
            let value = normalization.apply(c, *value);
            match layout {
                TensorLayout::Nhwc => input[[0, y, x, c]] = value,
                TensorLayout::Nchw => input[[0, c, y, x]] = value,
            }
        }
    }

    input
}

/// Channel coercion, exact square resize and normalization of a decoded image.
pub fn prepare_input(
    image: &DynamicImage,
    input_size: u32,
    options: &PreprocessOptions,
) -> Result<Array<f32, Ix4>, PredictionError> {
    let rgb = coerce_channels(image, options.channel_policy)?;
    let resized = image::imageops::resize(&rgb, input_size, input_size, FilterType::CatmullRom);

    Ok(to_tensor(&resized, options.normalization, options.layout))
}
