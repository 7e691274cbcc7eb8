use crate::item::{CategoryId, ItemId};
use palette::{Srgb, Srgba};
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid color '{0}', expected #rrggbb")]
pub struct ColorParseError(String);

/// Hex color as written in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, DeserializeFromStr, SerializeDisplay)]
pub struct ZoneColor(Srgb<u8>);

impl ZoneColor {
    pub fn new(red: u8, green: u8, blue: u8) -> Self {
        Self(Srgb::new(red, green, blue))
    }

    pub fn to_srgba(self, alpha: f64) -> Srgba<f64> {
        let rgb: Srgb<f64> = self.0.into_format();
        Srgba::new(rgb.red, rgb.green, rgb.blue, alpha)
    }
}

impl FromStr for ZoneColor {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<Srgb<u8>>()
            .map(Self)
            .map_err(|_| ColorParseError(s.to_string()))
    }
}

impl fmt::Display for ZoneColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:02x}{:02x}{:02x}",
            self.0.red, self.0.green, self.0.blue
        )
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ZoneSpec {
    pub id: CategoryId,
    pub color: ZoneColor,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PinnedControlSpec {
    pub id: ItemId,
    #[serde(default)]
    pub default_visible: bool,
}

/// Everything about the ring that is a feel constant rather than a rule.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Tunables {
    pub base_radius: f64,
    pub item_size: f64,
    pub margin: f64,
    pub dead_radius: f64,
    pub drag_threshold: f64,
    /// Width of the merge arc around a slot, as a fraction of the angular step.
    pub fusion_fraction: f64,
    /// Furthest an insertion candidate may be from the pointer, as a fraction of the step.
    pub acceptance_fraction: f64,
    pub split_low: f64,
    pub split_high: f64,
    pub reveal_step_ms: u64,
    pub page_size: usize,
    pub categories: Vec<ZoneSpec>,
    #[serde(rename = "controls")]
    pub pinned_controls: Vec<PinnedControlSpec>,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            base_radius: 150.0,
            item_size: 56.0,
            margin: 12.0,
            dead_radius: 40.0,
            drag_threshold: 10.0,
            fusion_fraction: 0.2,
            acceptance_fraction: 0.8,
            split_low: 1.0 / 3.0,
            split_high: 2.0 / 3.0,
            reveal_step_ms: 30,
            page_size: 20,
            categories: Vec::new(),
            pinned_controls: Vec::new(),
        }
    }
}

impl Tunables {
    pub fn pinned_spec(&self, id: &ItemId) -> Option<&PinnedControlSpec> {
        self.pinned_controls.iter().find(|spec| &spec.id == id)
    }
}
