//! Icon image loading.
//!
//! Icon-backed objects are only inserted once their image is available, so
//! every factory call that needs an icon goes through an [`IconLibrary`]
//! first. Failures surface as [`EditorError::AssetLoadFailure`].

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use shared::{IconKey, IconRef};

use crate::error::{EditorError, EditorResult};

/// Decoded icon, straight (non-premultiplied) RGBA8
#[derive(Debug, Clone, PartialEq)]
pub struct IconAsset {
    pub key: IconKey,
    pub width: u32,
    pub height: u32,
    pub rgba: Arc<Vec<u8>>,
}

impl IconAsset {
    /// Reference stored on scene objects
    pub fn icon_ref(&self) -> IconRef {
        IconRef {
            key: self.key,
            width: self.width,
            height: self.height,
        }
    }

    /// Solid-color square, used when no image files are around
    pub fn placeholder(key: IconKey, size: u32) -> Self {
        let [r, g, b]: [u8; 3] = match key {
            IconKey::Objective => [230, 180, 0],
            IconKey::StrikeForce => [120, 60, 160],
            IconKey::AttackerUnit => [200, 30, 30],
            IconKey::DefenderUnit => [30, 140, 30],
        };
        let rgba: Vec<u8> = (0..size * size).flat_map(|_| [r, g, b, 255]).collect();
        Self {
            key,
            width: size,
            height: size,
            rgba: Arc::new(rgba),
        }
    }
}

/// Source of icon images
pub trait IconLibrary {
    /// Load (or fetch from cache) an icon
    fn load(&mut self, key: IconKey) -> EditorResult<IconAsset>;

    /// Already-loaded icon, for rendering
    fn cached(&self, key: IconKey) -> Option<&IconAsset>;
}

/// PNG files from a directory, decoded with `image` and cached
pub struct FsIconLibrary {
    dir: PathBuf,
    cache: HashMap<IconKey, IconAsset>,
}

impl FsIconLibrary {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cache: HashMap::new(),
        }
    }
}

impl IconLibrary for FsIconLibrary {
    fn load(&mut self, key: IconKey) -> EditorResult<IconAsset> {
        if let Some(asset) = self.cache.get(&key) {
            return Ok(asset.clone());
        }
        let path = self.dir.join(key.file_name());
        let image = image::open(&path).map_err(|e| EditorError::AssetLoadFailure {
            icon: key,
            reason: format!("{}: {e}", path.display()),
        })?;
        let rgba = image.to_rgba8();
        let asset = IconAsset {
            key,
            width: rgba.width(),
            height: rgba.height(),
            rgba: Arc::new(rgba.into_raw()),
        };
        tracing::debug!("Loaded icon {} ({}x{})", path.display(), asset.width, asset.height);
        self.cache.insert(key, asset.clone());
        Ok(asset)
    }

    fn cached(&self, key: IconKey) -> Option<&IconAsset> {
        self.cache.get(&key)
    }
}

/// Preloaded icons
#[derive(Default)]
pub struct MemoryIconLibrary {
    assets: HashMap<IconKey, IconAsset>,
}

impl MemoryIconLibrary {
    /// Placeholder squares of `size` px for every icon key
    pub fn with_placeholders(size: u32) -> Self {
        let mut lib = Self::default();
        for key in IconKey::all() {
            lib.insert(IconAsset::placeholder(*key, size));
        }
        lib
    }

    pub fn insert(&mut self, asset: IconAsset) {
        self.assets.insert(asset.key, asset);
    }

    pub fn remove(&mut self, key: IconKey) -> Option<IconAsset> {
        self.assets.remove(&key)
    }
}

impl IconLibrary for MemoryIconLibrary {
    fn load(&mut self, key: IconKey) -> EditorResult<IconAsset> {
        self.assets
            .get(&key)
            .cloned()
            .ok_or_else(|| EditorError::AssetLoadFailure {
                icon: key,
                reason: "not in library".to_string(),
            })
    }

    fn cached(&self, key: IconKey) -> Option<&IconAsset> {
        self.assets.get(&key)
    }
}
