use crate::classify::EmojiCategory;
use anyhow::{Context, Error, Result};
use image::RgbaImage;
use image::imageops::{FilterType, resize};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Immutable emoji raster with an alpha channel.
#[derive(Debug, Clone, PartialEq)]
pub struct EmojiAsset {
    image: RgbaImage,
}

impl EmojiAsset {
    pub fn new(image: RgbaImage) -> Result<Self> {
        if image.width() == 0 || image.height() == 0 {
            return Err(Error::msg("Emoji asset must not be empty"));
        }

        Ok(Self { image })
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let image = image::open(path)
            .with_context(|| format!("Failed to load emoji asset {path:?}"))?
            .into_rgba8();
        Self::new(image).with_context(|| format!("Invalid emoji asset {path:?}"))
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Resamples the asset to exactly `width` x `height`.
    pub fn scaled_to(&self, width: u32, height: u32) -> RgbaImage {
        if (width, height) == self.image.dimensions() {
            return self.image.clone();
        }

        resize(&self.image, width, height, FilterType::Triangle)
    }
}

/// Resolves a category to the asset drawn for it.
///
/// Lookups are total: every category has an asset.
pub trait AssetLookup {
    fn lookup(&self, category: EmojiCategory) -> &EmojiAsset;
}

/// One asset per [`EmojiCategory`].
#[derive(Debug, Clone)]
pub struct EmojiAssets {
    assets: [EmojiAsset; 8],
}

impl EmojiAssets {
    pub fn from_fn(f: impl FnMut(EmojiCategory) -> EmojiAsset) -> Self {
        Self {
            assets: EmojiCategory::ALL.map(f),
        }
    }

    /// Fails when any category is missing from `map`.
    pub fn from_map(mut map: HashMap<EmojiCategory, EmojiAsset>) -> Result<Self> {
        let mut assets = Vec::with_capacity(EmojiCategory::ALL.len());
        for category in EmojiCategory::ALL {
            let asset = map
                .remove(&category)
                .ok_or_else(|| Error::msg(format!("No emoji asset for category {category}")))?;
            assets.push(asset);
        }

        Self::from_vec(assets)
    }

    /// Loads `<stem>.png` for every category from `dir`.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let mut assets = Vec::with_capacity(EmojiCategory::ALL.len());
        for category in EmojiCategory::ALL {
            let path = dir.join(format!("{}.png", category.file_stem()));
            let asset = EmojiAsset::open(&path)
                .with_context(|| format!("No emoji asset for category {category}"))?;
            debug!("Loaded {category} asset {}x{}", asset.width(), asset.height());
            assets.push(asset);
        }

        Self::from_vec(assets)
    }

    fn from_vec(assets: Vec<EmojiAsset>) -> Result<Self> {
        let assets: [EmojiAsset; 8] = assets
            .try_into()
            .map_err(|v: Vec<EmojiAsset>| {
                Error::msg(format!("Expected 8 emoji assets, got {}", v.len()))
            })?;

        Ok(Self { assets })
    }
}

impl AssetLookup for EmojiAssets {
    fn lookup(&self, category: EmojiCategory) -> &EmojiAsset {
        &self.assets[category.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn asset_for(category: EmojiCategory) -> EmojiAsset {
        let shade = (category.index() as u8 + 1) * 20;
        EmojiAsset::new(RgbaImage::from_pixel(2, 2, Rgba([shade, 0, 0, 255]))).unwrap()
    }

    #[test]
    fn test_lookup_is_per_category() {
        let assets = EmojiAssets::from_fn(asset_for);
        for category in EmojiCategory::ALL {
            assert_eq!(assets.lookup(category), &asset_for(category));
        }
    }

    #[test]
    fn test_from_map_requires_every_category() -> Result<()> {
        let mut map: HashMap<EmojiCategory, EmojiAsset> = EmojiCategory::ALL
            .into_iter()
            .map(|c| (c, asset_for(c)))
            .collect();
        map.remove(&EmojiCategory::LeftWinkFrown);

        let err = EmojiAssets::from_map(map.clone()).unwrap_err();
        assert!(err.to_string().contains("leftwinkfrown"));

        map.insert(EmojiCategory::LeftWinkFrown, asset_for(EmojiCategory::LeftWinkFrown));
        let assets = EmojiAssets::from_map(map)?;
        assert_eq!(
            assets.lookup(EmojiCategory::LeftWinkFrown),
            &asset_for(EmojiCategory::LeftWinkFrown)
        );
        Ok(())
    }

    #[test]
    fn test_load_dir_missing() {
        let err = EmojiAssets::load_dir("/nonexistent/emoji/assets").unwrap_err();
        assert!(err.to_string().contains("smile"));
    }

    #[test]
    fn test_empty_asset_rejected() {
        assert!(EmojiAsset::new(RgbaImage::new(0, 4)).is_err());
    }

    #[test]
    fn test_scaled_to() {
        let asset = asset_for(EmojiCategory::Smile);
        assert_eq!(asset.scaled_to(2, 2), *asset.image());

        let scaled = asset.scaled_to(10, 6);
        assert_eq!(scaled.dimensions(), (10, 6));
    }
}
