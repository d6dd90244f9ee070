//! Asset lookup by logical name
//!
//! The session never touches the filesystem itself. A host hands it an
//! [`AssetResolver`] that turns a name such as `"forest"` into bytes, the way
//! an app bundle resolves a resource name plus extension.

use std::{
    collections::HashMap,
    fs,
    path::PathBuf,
    sync::Arc,
};

pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "flac", "ogg", "wav", "aac", "m4a"];
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// Raw bytes of a resolved asset plus the extension it was found under.
#[derive(Debug, Clone)]
pub struct Asset {
    pub name: String,
    pub bytes: Arc<[u8]>,
    pub extension: Option<String>,
}

impl Asset {
    pub fn new(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Asset {
            name: name.into(),
            bytes: bytes.into(),
            extension: None,
        }
    }

    pub fn with_extension(mut self, ext: impl Into<String>) -> Self {
        self.extension = Some(ext.into());
        self
    }
}

/// `name -> bytes | NotFound`
pub trait AssetResolver {
    fn resolve(&self, name: &str) -> Option<Asset>;
}

impl<F> AssetResolver for F
where
    F: Fn(&str) -> Option<Vec<u8>>,
{
    fn resolve(&self, name: &str) -> Option<Asset> {
        self(name).map(|bytes| Asset::new(name, bytes))
    }
}

/// Resolves `dir/<name>.<ext>` for the first extension that exists.
#[derive(Debug, Clone)]
pub struct BundleResolver {
    root: PathBuf,
    extensions: Vec<String>,
}

impl BundleResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        BundleResolver {
            root: root.into(),
            extensions: AUDIO_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }

    pub fn extensions(mut self, extensions: &[&str]) -> Self {
        self.extensions = extensions.iter().map(|e| e.to_string()).collect();
        self
    }

    fn locate(&self, name: &str) -> Option<(PathBuf, &str)> {
        // A name with a path separator would escape the bundle
        if name.is_empty() || name.contains(['/', '\\']) || name == ".." {
            return None;
        }
        self.extensions.iter().find_map(|ext| {
            let path = self.root.join(format!("{name}.{ext}"));
            path.is_file().then_some((path, ext.as_str()))
        })
    }
}

impl AssetResolver for BundleResolver {
    fn resolve(&self, name: &str) -> Option<Asset> {
        let (path, ext) = self.locate(name)?;
        match fs::read(&path) {
            Ok(bytes) => Some(Asset::new(name, bytes).with_extension(ext)),
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "asset exists but is unreadable");
                None
            }
        }
    }
}

/// In-memory assets, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct MemoryResolver {
    assets: HashMap<String, Asset>,
}

impl MemoryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, asset: Asset) {
        self.assets.insert(asset.name.clone(), asset);
    }

    pub fn with(mut self, asset: Asset) -> Self {
        self.insert(asset);
        self
    }
}

impl AssetResolver for MemoryResolver {
    fn resolve(&self, name: &str) -> Option<Asset> {
        self.assets.get(name).cloned()
    }
}
