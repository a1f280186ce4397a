//! Image CDN URL building.
//!
//! Asset references encode everything needed to address the file:
//! `image-<assetId>-<width>x<height>-<format>` maps to
//! `https://cdn.sanity.io/images/<project>/<dataset>/<assetId>-<width>x<height>.<format>`.

use super::types::ImageRef;

/// Base URL of the image CDN.
const IMAGE_CDN: &str = "https://cdn.sanity.io/images";

/// Width used for product tiles and cart lines.
pub const THUMBNAIL_WIDTH: u32 = 300;

/// Builds CDN URLs for image assets of one project/dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUrlBuilder {
    base: String,
}

impl ImageUrlBuilder {
    /// Create a builder for the given project and dataset.
    #[must_use]
    pub fn new(project_id: &str, dataset: &str) -> Self {
        Self {
            base: format!("{IMAGE_CDN}/{project_id}/{dataset}"),
        }
    }

    /// Full-size image URL, or `None` if the reference is malformed.
    #[must_use]
    pub fn url(&self, image: &ImageRef) -> Option<String> {
        self.build(image, None)
    }

    /// Tile-sized image URL, or `None` if the reference is malformed.
    #[must_use]
    pub fn thumbnail(&self, image: &ImageRef) -> Option<String> {
        self.build(image, Some(THUMBNAIL_WIDTH))
    }

    fn build(&self, image: &ImageRef, width: Option<u32>) -> Option<String> {
        let file = asset_file_name(&image.asset.reference)?;
        Some(match width {
            Some(w) => format!("{}/{file}?w={w}", self.base),
            None => format!("{}/{file}", self.base),
        })
    }
}

/// Turn `image-<id>-<w>x<h>-<fmt>` into `<id>-<w>x<h>.<fmt>`.
fn asset_file_name(reference: &str) -> Option<String> {
    let rest = reference.strip_prefix("image-")?;
    let (rest, format) = rest.rsplit_once('-')?;
    let (id, dimensions) = rest.rsplit_once('-')?;

    let (width, height) = dimensions.split_once('x')?;
    let is_number = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if id.is_empty() || format.is_empty() || !is_number(width) || !is_number(height) {
        return None;
    }

    Some(format!("{id}-{dimensions}.{format}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::types::AssetRef;

    fn image(reference: &str) -> ImageRef {
        ImageRef {
            asset: AssetRef {
                reference: reference.to_string(),
            },
        }
    }

    #[test]
    fn test_thumbnail_url() {
        let builder = ImageUrlBuilder::new("k3x7ab12", "production");
        let url = builder.thumbnail(&image("image-Tb9Ew8CXIwaY6R1kjMvI0uRR-2000x3000-jpg"));
        assert_eq!(
            url.as_deref(),
            Some(
                "https://cdn.sanity.io/images/k3x7ab12/production/Tb9Ew8CXIwaY6R1kjMvI0uRR-2000x3000.jpg?w=300"
            )
        );
    }

    #[test]
    fn test_full_url() {
        let builder = ImageUrlBuilder::new("k3x7ab12", "staging");
        let url = builder.url(&image("image-abc-640x480-png"));
        assert_eq!(
            url.as_deref(),
            Some("https://cdn.sanity.io/images/k3x7ab12/staging/abc-640x480.png")
        );
    }

    #[test]
    fn test_malformed_references() {
        let builder = ImageUrlBuilder::new("p", "d");
        for reference in [
            "",
            "file-abc-640x480-png",
            "image-abc-png",
            "image-abc-640-png",
            "image-abc-64x0x1-png",
            "image--640x480-png",
            "image-abc-640x480-",
        ] {
            assert!(builder.url(&image(reference)).is_none(), "{reference}");
        }
    }
}
