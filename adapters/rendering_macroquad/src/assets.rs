use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
};

use dungeon_runner_rendering::{select_asset, Color, LoadError, SoundEffect, SpriteKey};
use glam::Vec2;
use image::ImageFormat;
use macroquad::{
    math::Vec2 as MacroquadVec2,
    texture::{self, DrawTextureParams, Texture2D},
};
use thiserror::Error;

use crate::to_macroquad_color;

const SUPPORTED_MANIFEST_VERSION: u32 = 1;

/// Failure to read or interpret the asset manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The manifest file could not be read.
    #[error("failed to read asset manifest at {}", path.display())]
    Io {
        /// Manifest location.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The manifest is not valid TOML or does not match the expected shape.
    #[error("failed to parse asset manifest")]
    Parse(#[from] toml::de::Error),
    /// The manifest declares a version this build does not understand.
    #[error("unsupported asset manifest version {found}; expected {expected}")]
    UnsupportedVersion {
        /// Version found in the file.
        found: u32,
        /// Version this build reads.
        expected: u32,
    },
    /// A table lists an asset slot that does not exist.
    #[error("unknown {table} entry `{name}` in asset manifest")]
    UnknownKey {
        /// Table containing the entry.
        table: &'static str,
        /// Offending key.
        name: String,
    },
}

#[derive(Debug, serde::Deserialize)]
struct Manifest {
    version: u32,
    #[serde(default)]
    sprites: HashMap<String, String>,
    #[serde(default)]
    sounds: HashMap<String, String>,
}

/// Asset locations resolved from a manifest file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AssetManifest {
    sprites: HashMap<SpriteKey, PathBuf>,
    sounds: HashMap<SoundEffect, PathBuf>,
}

impl AssetManifest {
    /// Returns the default manifest path relative to the repository root.
    #[must_use]
    pub fn default_path() -> PathBuf {
        PathBuf::from("assets/manifest.toml")
    }

    /// Reads and parses the manifest at `path`. Relative asset paths resolve
    /// against the manifest's directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let manifest_path = path.as_ref();
        let contents = fs::read_to_string(manifest_path).map_err(|source| ManifestError::Io {
            path: manifest_path.to_path_buf(),
            source,
        })?;
        let base = manifest_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::parse(&contents, &base)
    }

    /// Loads the manifest at `path`, degrading to an empty manifest when it
    /// cannot be used.
    #[must_use]
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(manifest) => manifest,
            Err(error) => {
                log::warn!(
                    "asset manifest {} unusable, drawing without assets: {error}",
                    path.display()
                );
                Self::default()
            }
        }
    }

    /// Parses manifest `contents`, resolving asset paths against `base`.
    pub fn parse(contents: &str, base: &Path) -> Result<Self, ManifestError> {
        let manifest: Manifest = toml::from_str(contents)?;
        if manifest.version != SUPPORTED_MANIFEST_VERSION {
            return Err(ManifestError::UnsupportedVersion {
                found: manifest.version,
                expected: SUPPORTED_MANIFEST_VERSION,
            });
        }

        let sprites = resolve_table(manifest.sprites, base, "sprites", |name| {
            SpriteKey::ALL
                .into_iter()
                .find(|key| key.manifest_name() == name)
        })?;
        let sounds = resolve_table(manifest.sounds, base, "sounds", |name| {
            SoundEffect::ALL
                .into_iter()
                .find(|effect| effect.manifest_name() == name)
        })?;

        Ok(Self { sprites, sounds })
    }

    /// Location of the sprite for `key`.
    pub fn sprite(&self, key: SpriteKey) -> Result<&Path, LoadError> {
        self.sprites
            .get(&key)
            .map(PathBuf::as_path)
            .ok_or(LoadError::NotListed {
                name: key.manifest_name(),
            })
    }

    /// Location of the sound for `effect`.
    pub fn sound(&self, effect: SoundEffect) -> Result<&Path, LoadError> {
        self.sounds
            .get(&effect)
            .map(PathBuf::as_path)
            .ok_or(LoadError::NotListed {
                name: effect.manifest_name(),
            })
    }
}

fn resolve_table<K: std::hash::Hash + Eq>(
    entries: HashMap<String, String>,
    base: &Path,
    table: &'static str,
    lookup: impl Fn(&str) -> Option<K>,
) -> Result<HashMap<K, PathBuf>, ManifestError> {
    let mut resolved = HashMap::with_capacity(entries.len());
    for (name, relative_path) in entries {
        let Some(key) = lookup(&name) else {
            return Err(ManifestError::UnknownKey { table, name });
        };
        let _ = resolved.insert(key, base.join(relative_path));
    }
    Ok(resolved)
}

/// Cache of textures loaded from the asset manifest.
#[derive(Debug, Default)]
pub struct SpriteAtlas {
    textures: HashMap<SpriteKey, Texture2D>,
}

impl SpriteAtlas {
    /// Loads every sprite listed in `manifest`. Sprites that fail to load
    /// are left out and drawn with their fallback rectangle.
    #[must_use]
    pub fn from_manifest(manifest: &AssetManifest) -> Self {
        Self::from_manifest_with_loader(manifest, default_loader)
    }

    fn from_manifest_with_loader(
        manifest: &AssetManifest,
        mut loader: impl FnMut(SpriteKey, &Path) -> Result<Texture2D, LoadError>,
    ) -> Self {
        let mut textures = HashMap::with_capacity(SpriteKey::ALL.len());
        for key in SpriteKey::ALL {
            let loaded = manifest.sprite(key).and_then(|path| loader(key, path));
            if let Some(texture) = select_asset(key.manifest_name(), loaded) {
                let _ = textures.insert(key, texture);
            }
        }
        log::info!(
            "loaded {} of {} sprites",
            textures.len(),
            SpriteKey::ALL.len()
        );
        Self { textures }
    }

    /// Draws the sprite for `key` stretched over the destination rectangle.
    ///
    /// Returns `false` when the atlas has no texture for `key`.
    pub fn draw(&self, key: SpriteKey, position: Vec2, size: Vec2, tint: Color) -> bool {
        let Some(texture) = self.textures.get(&key).copied() else {
            return false;
        };

        let draw_params = DrawTextureParams {
            dest_size: Some(MacroquadVec2::new(size.x, size.y)),
            ..DrawTextureParams::default()
        };
        texture::draw_texture_ex(
            texture,
            position.x,
            position.y,
            to_macroquad_color(tint),
            draw_params,
        );
        true
    }

    /// Returns whether the atlas contains the provided key.
    #[must_use]
    pub fn contains(&self, key: SpriteKey) -> bool {
        self.textures.contains_key(&key)
    }

    /// Returns the number of textures stored in the atlas.
    #[must_use]
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }
}

fn default_loader(_key: SpriteKey, path: &Path) -> Result<Texture2D, LoadError> {
    let bytes = fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let decode_error = |reason: String| LoadError::Decode {
        path: path.to_path_buf(),
        reason,
    };

    let image = image::load_from_memory_with_format(&bytes, ImageFormat::Png)
        .map_err(|error| decode_error(error.to_string()))?
        .to_rgba8();
    let (width, height) = image.dimensions();
    let (Ok(width), Ok(height)) = (u16::try_from(width), u16::try_from(height)) else {
        return Err(decode_error(format!("{width}x{height} exceeds texture limits")));
    };
    log::debug!("decoded {}x{} sprite from {}", width, height, path.display());
    Ok(Texture2D::from_rgba8(width, height, image.as_raw()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    const FULL_MANIFEST: &str = r#"
        version = 1

        [sprites]
        platform = "sprites/platform.png"
        player = "sprites/player.png"
        enemy = "sprites/enemy.png"
        collectible = "sprites/collectible.png"

        [sounds]
        jump = "sounds/jump.mp3"
        collect = "sounds/collect.mp3"
        death = "sounds/death.mp3"
    "#;

    #[test]
    fn manifest_resolves_paths_relative_to_base_directory() {
        let manifest =
            AssetManifest::parse(FULL_MANIFEST, Path::new("root")).expect("manifest should parse");

        assert_eq!(
            manifest.sprite(SpriteKey::Player).expect("listed"),
            Path::new("root/sprites/player.png")
        );
        assert_eq!(
            manifest.sound(SoundEffect::Death).expect("listed"),
            Path::new("root/sounds/death.mp3")
        );
        assert!(matches!(
            manifest.sound(SoundEffect::Web),
            Err(LoadError::NotListed { name: "web" })
        ));
    }

    #[test]
    fn manifest_tables_are_optional() {
        let manifest =
            AssetManifest::parse("version = 1", Path::new(".")).expect("bare manifest parses");
        assert_eq!(manifest, AssetManifest::default());
    }

    #[test]
    fn manifest_rejects_unknown_keys() {
        let manifest = r#"
            version = 1

            [sounds]
            explosion = "boom.mp3"
        "#;

        let error = AssetManifest::parse(manifest, Path::new("assets"))
            .expect_err("unknown keys must be rejected");
        assert!(matches!(
            error,
            ManifestError::UnknownKey { table: "sounds", ref name } if name == "explosion"
        ));
    }

    #[test]
    fn manifest_rejects_other_versions() {
        let error = AssetManifest::parse("version = 2", Path::new("."))
            .expect_err("version 2 is not supported");
        assert!(matches!(
            error,
            ManifestError::UnsupportedVersion {
                found: 2,
                expected: 1
            }
        ));
        assert!(matches!(
            AssetManifest::parse("version = ", Path::new(".")),
            Err(ManifestError::Parse(_))
        ));
    }

    #[test]
    fn missing_manifest_degrades_to_no_assets() {
        let manifest = AssetManifest::load_or_default("does/not/exist/manifest.toml");
        assert_eq!(manifest, AssetManifest::default());
    }

    #[test]
    fn atlas_loads_textures_in_slot_order() {
        let manifest =
            AssetManifest::parse(FULL_MANIFEST, Path::new("assets")).expect("manifest parses");
        let load_order = RefCell::new(Vec::new());
        let atlas = SpriteAtlas::from_manifest_with_loader(&manifest, |key, _| {
            load_order.borrow_mut().push(key);
            Ok(Texture2D::empty())
        });

        assert_eq!(load_order.borrow().as_slice(), &SpriteKey::ALL);
        assert_eq!(atlas.texture_count(), SpriteKey::ALL.len());
    }

    #[test]
    fn failed_sprites_fall_back_individually() {
        let manifest =
            AssetManifest::parse(FULL_MANIFEST, Path::new("assets")).expect("manifest parses");
        let atlas = SpriteAtlas::from_manifest_with_loader(&manifest, |key, path| {
            if key == SpriteKey::Enemy {
                Err(LoadError::Decode {
                    path: path.to_path_buf(),
                    reason: "corrupt".to_owned(),
                })
            } else {
                Ok(Texture2D::empty())
            }
        });

        assert!(atlas.contains(SpriteKey::Player));
        assert!(!atlas.contains(SpriteKey::Enemy));
        assert_eq!(atlas.texture_count(), 3);
    }

    #[test]
    fn unlisted_sprites_are_not_loaded() {
        let loads = RefCell::new(0);
        let atlas = SpriteAtlas::from_manifest_with_loader(&AssetManifest::default(), |_, _| {
            *loads.borrow_mut() += 1;
            Ok(Texture2D::empty())
        });
        assert_eq!(*loads.borrow(), 0);
        assert_eq!(atlas.texture_count(), 0);
    }

    #[test]
    fn non_png_files_are_rejected() {
        let path = std::env::temp_dir().join("dungeon-runner-not-a-sprite.png");
        fs::write(&path, b"definitely not an image").expect("temp file writable");
        let result = default_loader(SpriteKey::Player, &path);
        let _ = fs::remove_file(&path);
        assert!(matches!(result, Err(LoadError::Decode { .. })));
    }

    #[test]
    fn corrupt_png_is_reported_instead_of_aborting() {
        let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];
        bytes.extend_from_slice(b"garbage where the IHDR chunk should be");
        let path = std::env::temp_dir().join("dungeon-runner-corrupt-sprite.png");
        fs::write(&path, &bytes).expect("temp file writable");
        let result = default_loader(SpriteKey::Player, &path);
        let _ = fs::remove_file(&path);
        assert!(matches!(
            result,
            Err(LoadError::Decode { path: ref failed, .. }) if *failed == path
        ));
    }

    #[test]
    fn missing_sprite_file_is_an_io_error() {
        let path = Path::new("does/not/exist/player.png");
        assert!(matches!(
            default_loader(SpriteKey::Player, path),
            Err(LoadError::Io { .. })
        ));
    }
}
