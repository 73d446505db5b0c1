//! Game tuning and debug switches
//!
//! Every gameplay constant lives in [`Tuning`] so a host can override balance
//! from JSON without touching the simulation.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::GameError;

/// Kind of device the game runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DeviceClass {
    #[default]
    Desktop,
    Touch,
}

impl DeviceClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceClass::Desktop => "Desktop",
            DeviceClass::Touch => "Touch",
        }
    }

    /// Guess the device class from a browser user agent string
    pub fn from_user_agent(user_agent: &str) -> Self {
        const MOBILE_MARKERS: [&str; 5] = ["mobi", "android", "iphone", "ipad", "ipod"];
        let ua = user_agent.to_lowercase();
        if MOBILE_MARKERS.iter().any(|m| ua.contains(m)) {
            DeviceClass::Touch
        } else {
            DeviceClass::Desktop
        }
    }

    /// Peak difficulty gain for this device
    pub fn ramp_max_gain(&self) -> f32 {
        match self {
            DeviceClass::Desktop => RAMP_MAX_GAIN,
            DeviceClass::Touch => RAMP_MAX_GAIN_TOUCH,
        }
    }

    /// Scale applied to ground speed and gravity
    pub fn speed_scale(&self) -> f32 {
        match self {
            DeviceClass::Desktop => 1.0,
            DeviceClass::Touch => TOUCH_SPEED_SCALE,
        }
    }
}

/// Gameplay balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === World ===
    pub num_platforms: usize,
    pub platforms_to_left: usize,
    pub platform_length: f32,
    pub platform_gap: f32,
    pub platform_height: f32,
    pub platform_min_ratio: f32,
    pub platform_max_ratio: f32,
    pub platform_min_offset: f32,
    pub platform_max_offset: f32,
    pub half_material_ratio: f32,

    // === Background ===
    pub num_city_segments: usize,
    pub city_segments_to_left: usize,
    pub city_segment_scale: f32,

    // === Physics ===
    pub base_speed: f32,
    pub gravity: f32,
    pub jump_impulse: f32,
    pub death_plane_y: f32,

    // === Difficulty ===
    /// Score points per ramp half-cycle
    pub ramp_cycle: u64,
    /// Peak speed gain over base (0.6 = +60%)
    pub ramp_max_gain: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            num_platforms: NUM_PLATFORMS,
            platforms_to_left: PLATFORMS_TO_LEFT,
            platform_length: PLATFORM_LENGTH,
            platform_gap: PLATFORM_GAP,
            platform_height: PLATFORM_HEIGHT,
            platform_min_ratio: PLATFORM_MIN_RATIO,
            platform_max_ratio: PLATFORM_MAX_RATIO,
            platform_min_offset: PLATFORM_MIN_OFFSET,
            platform_max_offset: PLATFORM_MAX_OFFSET,
            half_material_ratio: HALF_MATERIAL_RATIO,

            num_city_segments: NUM_CITY_SEGMENTS,
            city_segments_to_left: CITY_SEGMENTS_TO_LEFT,
            city_segment_scale: CITY_SEGMENT_SCALE,

            base_speed: BASE_GROUND_SPEED,
            gravity: GRAVITY,
            jump_impulse: JUMP_IMPULSE,
            death_plane_y: DEATH_PLANE_Y,

            ramp_cycle: RAMP_CYCLE,
            ramp_max_gain: RAMP_MAX_GAIN,
        }
    }
}

impl Tuning {
    /// Default tuning adjusted for a device class
    pub fn for_device(device: DeviceClass) -> Self {
        let mut tuning = Self::default();
        tuning.apply_device(device);
        tuning
    }

    /// Apply device-dependent scaling (touch devices run slower and ramp less)
    pub fn apply_device(&mut self, device: DeviceClass) {
        self.base_speed = BASE_GROUND_SPEED * device.speed_scale();
        self.gravity = GRAVITY * device.speed_scale();
        self.ramp_max_gain = device.ramp_max_gain();
    }

    /// Apply JSON overrides on top of the device defaults
    ///
    /// Fields the document leaves out keep their device value. A document that
    /// doesn't parse, or whose result fails [`validate`](Self::validate), is
    /// ignored with a warning.
    pub fn from_json(json: &str, device: DeviceClass) -> Self {
        let base = Self::for_device(device);
        let tuning = match merge_overrides(&base, json) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::warn!("Ignoring tuning overrides ({e}), using defaults");
                return base;
            }
        };
        if let Err(e) = tuning.validate() {
            log::warn!("Ignoring tuning overrides ({e}), using defaults");
            return base;
        }
        tuning
    }

    /// Slot pitch: distance between consecutive platform centres
    pub fn platform_pitch(&self) -> f32 {
        self.platform_length + self.platform_gap
    }

    /// Platforms whose x drops below this are recycled
    pub fn recycle_boundary(&self) -> f32 {
        -(self.platforms_to_left as f32) * self.platform_pitch()
    }

    /// Leftmost city segment recycles once its x drops below this
    pub fn bg_recycle_boundary(&self) -> f32 {
        -((self.city_segments_to_left + 1) as f32) * self.city_segment_scale
    }

    /// Y of the building centre with no offset applied
    pub fn platform_center_y(&self) -> f32 {
        -0.5 - self.platform_height / 2.0
    }

    /// Reject values that would break world invariants
    pub fn validate(&self) -> Result<(), GameError> {
        if self.num_platforms < 2 {
            return Err(GameError::InvalidConfig(format!(
                "need at least 2 platforms, got {}",
                self.num_platforms
            )));
        }
        if self.platforms_to_left >= self.num_platforms {
            return Err(GameError::InvalidConfig(
                "platforms_to_left must be smaller than num_platforms".to_string(),
            ));
        }
        if self.num_city_segments == 0 || self.city_segment_scale <= 0.0 {
            return Err(GameError::InvalidConfig(
                "city skyline needs at least one segment with a positive scale".to_string(),
            ));
        }
        if self.ramp_cycle == 0 {
            return Err(GameError::InvalidConfig("ramp_cycle must be > 0".to_string()));
        }
        if self.platform_length <= 0.0 || self.platform_gap < 0.0 {
            return Err(GameError::InvalidConfig(
                "platform length must be positive and gap non-negative".to_string(),
            ));
        }
        if !(0.0 < self.platform_min_ratio && self.platform_min_ratio <= self.platform_max_ratio)
            || self.platform_max_ratio > 1.0
        {
            return Err(GameError::InvalidConfig(
                "platform ratios must satisfy 0 < min <= max <= 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn merge_overrides(base: &Tuning, json: &str) -> Result<Tuning, serde_json::Error> {
    let overrides: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json)?;
    let mut value = serde_json::to_value(base)?;
    if let serde_json::Value::Object(fields) = &mut value {
        fields.extend(overrides);
    }
    serde_json::from_value(value)
}

/// Developer switches, consulted only by the input mapper setup and the session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Bind single-step and force-game-over keys
    pub debug_keys: bool,
    /// Bind camera pan keys
    pub free_cam: bool,
    /// Ask the renderer to draw the death plane
    pub show_death_plane: bool,
    /// Pull the camera far back to watch the whole ring
    pub far_view: bool,
    /// Skip drawing the city skyline
    pub hide_background: bool,
}

impl DebugConfig {
    /// Everything on
    pub fn all() -> Self {
        Self {
            debug_keys: true,
            free_cam: true,
            show_death_plane: true,
            far_view: true,
            hide_background: true,
        }
    }

    /// Switches named in a page query string
    ///
    /// `debug` turns on the keys, free cam and death plane; `farview` and
    /// `hidebg` are separate because they change what a normal run looks like.
    pub fn from_query(query: &str) -> Self {
        let flags: Vec<&str> = query
            .trim_start_matches('?')
            .split('&')
            .map(|pair| pair.split('=').next().unwrap_or_default())
            .collect();
        let has = |name: &str| flags.contains(&name);
        let debug = has("debug");
        Self {
            debug_keys: debug,
            free_cam: debug,
            show_death_plane: debug,
            far_view: has("farview"),
            hide_background: has("hidebg"),
        }
    }

    pub fn any(&self) -> bool {
        self.debug_keys
            || self.free_cam
            || self.show_death_plane
            || self.far_view
            || self.hide_background
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_geometry() {
        let tuning = Tuning::default();
        assert_eq!(tuning.platform_pitch(), 8.0);
        assert_eq!(tuning.recycle_boundary(), -32.0);
        assert_eq!(tuning.bg_recycle_boundary(), -100.0);
        assert_eq!(tuning.platform_center_y(), -15.5);
        assert!(tuning.validate().is_ok());
    }

    #[test]
    fn test_touch_device_is_slower() {
        let desktop = Tuning::for_device(DeviceClass::Desktop);
        let touch = Tuning::for_device(DeviceClass::Touch);
        assert!(touch.base_speed < desktop.base_speed);
        assert!(touch.gravity < desktop.gravity);
        assert!(touch.ramp_max_gain < desktop.ramp_max_gain);
    }

    #[test]
    fn test_user_agent_detection() {
        let iphone = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) Mobile/15E148";
        let linux = "Mozilla/5.0 (X11; Linux x86_64) Gecko/20100101 Firefox/121.0";
        assert_eq!(DeviceClass::from_user_agent(iphone), DeviceClass::Touch);
        assert_eq!(DeviceClass::from_user_agent(linux), DeviceClass::Desktop);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "jump_impulse": 14.0 }"#, DeviceClass::Desktop);
        assert_eq!(tuning.jump_impulse, 14.0);
        assert_eq!(tuning.num_platforms, NUM_PLATFORMS);
    }

    #[test]
    fn test_overrides_keep_device_scaling() {
        let tuning = Tuning::from_json(r#"{ "death_plane_y": -20.0 }"#, DeviceClass::Touch);
        let touch = Tuning::for_device(DeviceClass::Touch);
        assert_eq!(tuning.death_plane_y, -20.0);
        assert_eq!(tuning.base_speed, touch.base_speed);
        assert_eq!(tuning.ramp_max_gain, touch.ramp_max_gain);

        // An explicit value still wins over the device one
        let tuning = Tuning::from_json(r#"{ "base_speed": 12.0 }"#, DeviceClass::Touch);
        assert_eq!(tuning.base_speed, 12.0);
    }

    #[test]
    fn test_bad_json_falls_back() {
        assert_eq!(Tuning::from_json("not json", DeviceClass::Desktop), Tuning::default());
        assert_eq!(
            Tuning::from_json(r#"{ "jump_impulse": "high" }"#, DeviceClass::Touch),
            Tuning::for_device(DeviceClass::Touch)
        );
    }

    #[test]
    fn test_invalid_overrides_fall_back() {
        let tuning = Tuning::from_json(r#"{ "ramp_cycle": 0 }"#, DeviceClass::Desktop);
        assert_eq!(tuning, Tuning::default());
    }

    #[test]
    fn test_debug_switches_from_query() {
        assert_eq!(DebugConfig::from_query(""), DebugConfig::default());
        assert!(!DebugConfig::from_query("?level=2").any());

        let debug = DebugConfig::from_query("?debug");
        assert!(debug.debug_keys && debug.free_cam && debug.show_death_plane);
        assert!(!debug.far_view && !debug.hide_background);

        let view = DebugConfig::from_query("?farview&hidebg=1");
        assert!(view.far_view && view.hide_background);
        assert!(!view.debug_keys);
    }

    #[test]
    fn test_validate_rejects_zero_cycle() {
        let tuning = Tuning {
            ramp_cycle: 0,
            ..Default::default()
        };
        assert!(matches!(tuning.validate(), Err(GameError::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_rejects_too_many_left() {
        let tuning = Tuning {
            platforms_to_left: 8,
            ..Default::default()
        };
        assert!(tuning.validate().is_err());
    }
}
