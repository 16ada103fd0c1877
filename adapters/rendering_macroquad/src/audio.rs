//! Sound playback. Compiled to a silent sink unless the `audio` feature is on.

#[cfg(feature = "audio")]
use std::{collections::HashMap, fs, path::Path};

use dungeon_runner_rendering::{AudioSink, SoundEffect};
#[cfg(feature = "audio")]
use dungeon_runner_rendering::{select_asset, LoadError};
#[cfg(feature = "audio")]
use macroquad::audio::{self, Sound};

use crate::assets::AssetManifest;

/// Sounds resolved from the asset manifest.
#[derive(Default)]
pub(crate) struct SoundBank {
    #[cfg(feature = "audio")]
    sounds: HashMap<SoundEffect, Sound>,
}

impl SoundBank {
    #[cfg(feature = "audio")]
    pub(crate) async fn load(manifest: &AssetManifest) -> Self {
        let mut sounds = HashMap::new();
        for effect in SoundEffect::ALL {
            let loaded = match manifest.sound(effect) {
                Ok(path) => load_sound(path).await,
                Err(error) => Err(error),
            };
            if let Some(sound) = select_asset(effect.manifest_name(), loaded) {
                let _ = sounds.insert(effect, sound);
            }
        }
        log::info!(
            "loaded {} of {} sounds",
            sounds.len(),
            SoundEffect::ALL.len()
        );
        Self { sounds }
    }

    #[cfg(not(feature = "audio"))]
    pub(crate) async fn load(manifest: &AssetManifest) -> Self {
        let listed = SoundEffect::ALL
            .into_iter()
            .filter(|effect| manifest.sound(*effect).is_ok())
            .count();
        if listed > 0 {
            log::info!("{listed} sounds listed but audio support is not compiled in");
        }
        Self::default()
    }
}

#[cfg(feature = "audio")]
async fn load_sound(path: &Path) -> Result<Sound, LoadError> {
    let bytes = fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    audio::load_sound_from_bytes(&bytes)
        .await
        .map_err(|error| LoadError::Decode {
            path: path.to_path_buf(),
            reason: format!("{error:?}"),
        })
}

impl AudioSink for SoundBank {
    #[cfg(feature = "audio")]
    fn play(&mut self, effect: SoundEffect) {
        if let Some(sound) = self.sounds.get(&effect) {
            audio::play_sound_once(*sound);
        }
    }

    #[cfg(not(feature = "audio"))]
    fn play(&mut self, effect: SoundEffect) {
        log::trace!("{effect:?} muted");
    }
}
