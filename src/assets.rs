//! Resource manifest and loaded material handles
//!
//! The host fetches `images.json` (and optionally an animations manifest) and
//! hands the text over. Entries that are `null` or have no `url` are skipped
//! with a warning; only the two materials every frame needs are mandatory.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::GameError;
use crate::scene::AnimationClock;
use crate::sim::MaterialClass;

pub const CITY: &str = "CITY";
pub const BUILDING: &str = "BUILDING";
pub const HALFBUILDING: &str = "HALFBUILDING";
pub const CRATE: &str = "CRATE";

/// Animation that plays while the player runs
pub const RUNNING_CLIP: &str = "running";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Repeat {
    #[serde(default = "one")]
    pub x: f32,
    #[serde(default = "one")]
    pub y: f32,
}

fn one() -> f32 {
    1.0
}

impl Default for Repeat {
    fn default() -> Self {
        Self { x: 1.0, y: 1.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ImageEntry {
    pub url: Option<String>,
    #[serde(default)]
    pub transparent: bool,
    #[serde(default)]
    pub repeat: Option<Repeat>,
    /// `#rrggbb` tint
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationEntry {
    pub url: Option<String>,
    #[serde(default)]
    pub start_frame: Option<f32>,
    #[serde(default)]
    pub end_frame: Option<f32>,
    #[serde(default)]
    pub play_rate: Option<f32>,
    #[serde(default)]
    pub frame_rate: Option<f32>,
}

/// Parsed manifests, not yet validated
#[derive(Debug, Clone, Default)]
pub struct ResourceManifest {
    pub images: BTreeMap<String, Option<ImageEntry>>,
    pub animations: BTreeMap<String, Option<AnimationEntry>>,
}

impl ResourceManifest {
    /// Parse an `images.json` document
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let images = serde_json::from_str(json)
            .map_err(|e| GameError::AssetLoad(format!("images manifest: {e}")))?;
        Ok(Self {
            images,
            animations: BTreeMap::new(),
        })
    }

    /// Add an animations manifest
    pub fn with_animations(mut self, json: &str) -> Result<Self, GameError> {
        self.animations = serde_json::from_str(json)
            .map_err(|e| GameError::AssetLoad(format!("animations manifest: {e}")))?;
        Ok(self)
    }
}

/// A loaded material, as far as the core cares
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialHandle {
    pub key: String,
    pub url: String,
    pub transparent: bool,
    pub repeat: Repeat,
    pub color: Option<[f32; 4]>,
}

/// Looping clip clock driven by frame time
#[derive(Debug, Clone, PartialEq)]
pub struct ClipClock {
    pub name: String,
    pub time: f32,
    pub start: f32,
    pub duration: Option<f32>,
    pub play_rate: f32,
}

impl ClipClock {
    const DEFAULT_FRAME_RATE: f32 = 30.0;

    pub fn from_entry(name: &str, entry: &AnimationEntry) -> Self {
        let frame_rate = entry
            .frame_rate
            .filter(|r| *r > 0.0)
            .unwrap_or(Self::DEFAULT_FRAME_RATE);
        let start = entry.start_frame.unwrap_or(0.0) / frame_rate;
        let duration = entry
            .end_frame
            .map(|end| end / frame_rate - start)
            .filter(|d| *d > 0.0);
        Self {
            name: name.to_owned(),
            time: start,
            start,
            duration,
            play_rate: entry.play_rate.unwrap_or(1.0),
        }
    }
}

impl AnimationClock for ClipClock {
    fn advance(&mut self, dt: f32) {
        self.time += dt * self.play_rate;
        if let Some(duration) = self.duration {
            let offset = (self.time - self.start).rem_euclid(duration);
            self.time = self.start + offset;
        }
    }
}

/// Everything the game needs from the asset collaborator
#[derive(Debug, Clone)]
pub struct Resources {
    materials: BTreeMap<String, MaterialHandle>,
    running: Option<ClipClock>,
}

impl Resources {
    /// Resolve a manifest into handles
    ///
    /// Fails only when `CITY` or `BUILDING` is unusable.
    pub fn load(manifest: &ResourceManifest) -> Result<Self, GameError> {
        let mut materials = BTreeMap::new();
        for (key, entry) in &manifest.images {
            let Some(entry) = entry else {
                log::warn!("Skipping manifest entry {key}: no data");
                continue;
            };
            let Some(url) = &entry.url else {
                log::warn!("Skipping manifest entry {key}: missing url");
                continue;
            };
            let color = entry.color.as_deref().and_then(|c| {
                let parsed = parse_hex_color(c);
                if parsed.is_none() {
                    log::warn!("Ignoring bad color {c:?} on {key}");
                }
                parsed
            });
            materials.insert(
                key.clone(),
                MaterialHandle {
                    key: key.clone(),
                    url: url.clone(),
                    transparent: entry.transparent,
                    repeat: entry.repeat.clone().unwrap_or_default(),
                    color,
                },
            );
        }

        for required in [CITY, BUILDING] {
            if !materials.contains_key(required) {
                return Err(GameError::AssetLoad(format!("missing material {required}")));
            }
        }
        for optional in [HALFBUILDING, CRATE] {
            if !materials.contains_key(optional) {
                log::warn!("Material {optional} missing, using a fallback");
            }
        }

        let running = match manifest.animations.get(RUNNING_CLIP) {
            Some(Some(entry)) if entry.url.is_some() => {
                Some(ClipClock::from_entry(RUNNING_CLIP, entry))
            }
            Some(_) => {
                log::warn!("Skipping animation {RUNNING_CLIP}: missing url");
                None
            }
            None => None,
        };

        log::info!("Loaded {} material(s)", materials.len());
        Ok(Self { materials, running })
    }

    pub fn material(&self, key: &str) -> Option<&MaterialHandle> {
        self.materials.get(key)
    }

    /// Material for a building class; narrow buildings fall back to the full
    /// facade when the half one is missing
    pub fn building(&self, class: MaterialClass) -> Option<&MaterialHandle> {
        match class {
            MaterialClass::Full => self.material(BUILDING),
            MaterialClass::Half => self.material(HALFBUILDING).or_else(|| self.material(BUILDING)),
        }
    }

    /// Hand the running clip over to the frame driver
    pub fn take_running_clip(&mut self) -> Option<ClipClock> {
        self.running.take()
    }
}

/// `#rrggbb` to linear-ish RGBA
pub fn parse_hex_color(s: &str) -> Option<[f32; 4]> {
    let hex = s.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| {
        u8::from_str_radix(hex.get(i..i + 2)?, 16)
            .ok()
            .map(|v| v as f32 / 255.0)
    };
    Some([channel(0)?, channel(2)?, channel(4)?, 1.0])
}

#[cfg(test)]
mod tests {
    use super::*;

    const IMAGES: &str = r##"{
        "CITY": { "url": "city.png", "transparent": true, "repeat": { "x": 2 } },
        "BUILDING": { "url": "building.png", "color": "#ff8000" },
        "HALFBUILDING": null,
        "CRATE": { "transparent": true }
    }"##;

    #[test]
    fn test_parses_images_manifest() {
        let manifest = ResourceManifest::from_json(IMAGES).expect("parse");
        assert_eq!(manifest.images.len(), 4);
        assert_eq!(manifest.images["HALFBUILDING"], None);
    }

    #[test]
    fn test_null_and_urlless_entries_are_skipped() {
        let manifest = ResourceManifest::from_json(IMAGES).expect("parse");
        let resources = Resources::load(&manifest).expect("load");
        assert!(resources.material(HALFBUILDING).is_none());
        assert!(resources.material(CRATE).is_none());

        let city = resources.material(CITY).expect("city");
        assert!(city.transparent);
        assert_eq!(city.repeat, Repeat { x: 2.0, y: 1.0 });

        let building = resources.material(BUILDING).expect("building");
        assert_eq!(building.color, Some([1.0, 128.0 / 255.0, 0.0, 1.0]));
    }

    #[test]
    fn test_half_falls_back_to_full() {
        let manifest = ResourceManifest::from_json(IMAGES).expect("parse");
        let resources = Resources::load(&manifest).expect("load");
        let half = resources.building(MaterialClass::Half).expect("fallback");
        assert_eq!(half.key, BUILDING);
    }

    #[test]
    fn test_missing_required_material_fails() {
        let manifest =
            ResourceManifest::from_json(r#"{ "CITY": { "url": "city.png" } }"#).expect("parse");
        let err = Resources::load(&manifest).expect_err("no building");
        assert!(matches!(err, GameError::AssetLoad(_)));
    }

    #[test]
    fn test_bad_json_is_asset_error() {
        let err = ResourceManifest::from_json("{ not json").expect_err("bad json");
        assert!(matches!(err, GameError::AssetLoad(_)));
    }

    #[test]
    fn test_running_clip_loops() {
        let manifest = ResourceManifest::from_json(IMAGES)
            .and_then(|m| {
                m.with_animations(
                    r#"{ "running": { "url": "run.fbx", "endFrame": 30, "playRate": 2 } }"#,
                )
            })
            .expect("parse");
        let mut resources = Resources::load(&manifest).expect("load");
        let mut clip = resources.take_running_clip().expect("clip");
        assert_eq!(clip.duration, Some(1.0));

        clip.advance(0.25);
        assert_eq!(clip.time, 0.5);
        clip.advance(0.5);
        assert_eq!(clip.time, 0.5);
        assert!(resources.take_running_clip().is_none());
    }

    #[test]
    fn test_missing_clip_is_not_an_error() {
        let manifest = ResourceManifest::from_json(IMAGES)
            .and_then(|m| m.with_animations(r#"{ "running": null }"#))
            .expect("parse");
        let mut resources = Resources::load(&manifest).expect("load");
        assert!(resources.take_running_clip().is_none());
    }

    #[test]
    fn test_hex_colors() {
        assert_eq!(parse_hex_color("#000000"), Some([0.0, 0.0, 0.0, 1.0]));
        assert_eq!(parse_hex_color("ffffff"), None);
        assert_eq!(parse_hex_color("#12"), None);
        assert_eq!(parse_hex_color("#gg0000"), None);
    }
}
