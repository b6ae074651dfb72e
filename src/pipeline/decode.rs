use std::io::Read;

use image::RgbaImage;

use super::error::{LoadError, LoadResult};
use super::locator::{ImageLocator, ResourceResolver};

/// Decoded RGBA8 raster ready for presentation.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    raster: RgbaImage,
}

impl DecodedImage {
    pub fn from_rgba(raster: RgbaImage) -> Self {
        Self { raster }
    }

    pub fn width(&self) -> u32 {
        self.raster.width()
    }

    pub fn height(&self) -> u32 {
        self.raster.height()
    }

    /// Bytes per row of the pixel buffer.
    pub fn stride(&self) -> usize {
        self.width() as usize * 4
    }

    pub fn pixels(&self) -> &[u8] {
        self.raster.as_raw()
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.raster.into_raw()
    }
}

/// Blocking read-and-decode. Runs on a worker thread.
pub fn decode_image(
    resolver: &dyn ResourceResolver,
    locator: &ImageLocator,
) -> LoadResult<DecodedImage> {
    let bytes = read_resource(resolver, locator)?;
    if bytes.is_empty() {
        return Err(LoadError::decode(locator, "resource is empty"));
    }

    let decoded = image::load_from_memory(&bytes)
        .map_err(|err| LoadError::decode(locator, err.to_string()))?;
    let raster = decoded.to_rgba8();
    if raster.width() == 0 || raster.height() == 0 {
        return Err(LoadError::decode(locator, "decoder produced an empty raster"));
    }

    tracing::debug!(
        %locator,
        width = raster.width(),
        height = raster.height(),
        "decoded image"
    );
    Ok(DecodedImage::from_rgba(raster))
}

fn read_resource(resolver: &dyn ResourceResolver, locator: &ImageLocator) -> LoadResult<Vec<u8>> {
    let mut handle = resolver
        .open(locator)
        .map_err(|source| LoadError::unreadable(locator, source))?;
    let mut bytes = Vec::new();
    handle
        .read_to_end(&mut bytes)
        .map_err(|source| LoadError::unreadable(locator, source))?;
    Ok(bytes)
}
