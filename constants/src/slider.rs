/// Trackbar layout of the interactive parameter surface.
///
/// Slider widgets report integer positions, so every parameter is stored
/// scaled and decoded into physical units on the way into the pipeline.
use crate::render_settings::MAX_FILL_RADIUS;
use serde::{Deserialize, Serialize};

pub struct SliderSpec {
    pub name: &'static str,
    /// Short name accepted by the line-oriented controller
    pub alias: &'static str,
    pub default: u32,
    pub max: u32,
}

pub const MULTIPLIER: SliderSpec = SliderSpec {
    name: "PPMMultiplier",
    alias: "ppm",
    default: 10,
    max: 20,
};

pub const LOWER_CLAMP: SliderSpec = SliderSpec {
    name: "STD_bounds_Lower",
    alias: "lower",
    default: 25,
    max: 100,
};

pub const UPPER_CLAMP: SliderSpec = SliderSpec {
    name: "STD_bounds_Upper",
    alias: "upper",
    default: 75,
    max: 100,
};

pub const FILL_RADIUS: SliderSpec = SliderSpec {
    name: "ImFill",
    alias: "fill",
    default: 0,
    max: MAX_FILL_RADIUS,
};

pub const HIGH_PASS: SliderSpec = SliderSpec {
    name: "HighPassFrequency",
    alias: "highpass",
    default: 10,
    max: 100,
};

pub const CONTRAST: SliderSpec = SliderSpec {
    name: "Contrast",
    alias: "contrast",
    default: 0,
    max: 100,
};

pub const THRESHOLD: SliderSpec = SliderSpec {
    name: "Threshold",
    alias: "threshold",
    default: 0,
    max: 100,
};

/// All sliders in display order
pub const SLIDERS: &[SliderSpec] = &[
    MULTIPLIER,
    LOWER_CLAMP,
    UPPER_CLAMP,
    FILL_RADIUS,
    HIGH_PASS,
    CONTRAST,
    THRESHOLD,
];

/// Multiplier is stored x10
pub fn decode_multiplier(position: u32) -> f64 {
    position as f64 / 10.0
}

/// Clamp bounds are stored x10 with a +50 offset (-5.0..=5.0 std-devs)
pub fn decode_clamp(position: u32) -> f64 {
    position as f64 / 10.0 - 5.0
}

/// High-pass sigma is stored x10, 0 disables the filter
pub fn decode_sigma(position: u32) -> f64 {
    position as f64 / 10.0
}

pub fn encode_multiplier(value: f64) -> u32 {
    encode(value * 10.0, MULTIPLIER.max)
}

pub fn encode_clamp(value: f64) -> u32 {
    encode((value + 5.0) * 10.0, LOWER_CLAMP.max)
}

pub fn encode_sigma(value: f64) -> u32 {
    encode(value * 10.0, HIGH_PASS.max)
}

fn encode(scaled: f64, max: u32) -> u32 {
    if !scaled.is_finite() || scaled <= 0.0 {
        return 0;
    }
    (scaled.round() as u32).min(max)
}

/// Raw slider positions, one field per trackbar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SliderPositions {
    pub multiplier: u32,
    pub lower_clamp: u32,
    pub upper_clamp: u32,
    pub fill_radius: u32,
    pub high_pass: u32,
    pub contrast: u32,
    pub threshold: u32,
}

impl Default for SliderPositions {
    fn default() -> Self {
        Self {
            multiplier: MULTIPLIER.default,
            lower_clamp: LOWER_CLAMP.default,
            upper_clamp: UPPER_CLAMP.default,
            fill_radius: FILL_RADIUS.default,
            high_pass: HIGH_PASS.default,
            contrast: CONTRAST.default,
            threshold: THRESHOLD.default,
        }
    }
}

impl SliderPositions {
    /// Move the slider called `name` (full name or alias, case-insensitive).
    /// The position is capped at the slider maximum; returns the stored
    /// position, or `None` for an unknown slider.
    pub fn set(&mut self, name: &str, position: u32) -> Option<u32> {
        let spec = find_slider(name)?;
        let position = position.min(spec.max);
        *self.slot_mut(spec.alias)? = position;
        Some(position)
    }

    pub fn get(&self, name: &str) -> Option<u32> {
        let spec = find_slider(name)?;
        let value = match spec.alias {
            "ppm" => self.multiplier,
            "lower" => self.lower_clamp,
            "upper" => self.upper_clamp,
            "fill" => self.fill_radius,
            "highpass" => self.high_pass,
            "contrast" => self.contrast,
            "threshold" => self.threshold,
            _ => return None,
        };
        Some(value)
    }

    fn slot_mut(&mut self, alias: &str) -> Option<&mut u32> {
        match alias {
            "ppm" => Some(&mut self.multiplier),
            "lower" => Some(&mut self.lower_clamp),
            "upper" => Some(&mut self.upper_clamp),
            "fill" => Some(&mut self.fill_radius),
            "highpass" => Some(&mut self.high_pass),
            "contrast" => Some(&mut self.contrast),
            "threshold" => Some(&mut self.threshold),
            _ => None,
        }
    }
}

fn find_slider(name: &str) -> Option<&'static SliderSpec> {
    SLIDERS
        .iter()
        .find(|s| s.name.eq_ignore_ascii_case(name) || s.alias.eq_ignore_ascii_case(name))
}
