//! Material and location descriptions: sizes, stock locations, sounds.
//!
//! Sizes are validated when a description is registered. A description that
//! cannot produce a width and a height is rejected right there, never later
//! while rendering.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::MaterialError;
use crate::location::{Location, LocationType, MaterialType};
use crate::moves::MoveKind;
use crate::sound::SoundSetting;

/// Default thickness of a piece, in em.
pub const DEFAULT_THICKNESS: f32 = 0.05;

/// Size contract: any two of width, height and ratio (`width / height`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SizeSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratio: Option<f32>,
}

impl SizeSpec {
    pub const fn new(width: f32, height: f32) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ratio: None,
        }
    }

    pub const fn width_ratio(width: f32, ratio: f32) -> Self {
        Self {
            width: Some(width),
            height: None,
            ratio: Some(ratio),
        }
    }

    pub const fn height_ratio(height: f32, ratio: f32) -> Self {
        Self {
            width: None,
            height: Some(height),
            ratio: Some(ratio),
        }
    }

    /// Derives the concrete size, if the contract is complete.
    pub fn resolve(&self) -> Option<Size> {
        match (self.width, self.height, self.ratio) {
            (Some(width), Some(height), _) => Some(Size { width, height }),
            (Some(width), None, Some(ratio)) if ratio != 0.0 => Some(Size {
                width,
                height: width / ratio,
            }),
            (None, Some(height), Some(ratio)) => Some(Size {
                width: height * ratio,
                height,
            }),
            _ => None,
        }
    }
}

/// Concrete rendered size, in em.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

/// Static description of one material type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialDescription {
    pub size: SizeSpec,
    #[serde(default)]
    pub border_radius: f32,
    #[serde(default = "default_thickness")]
    pub thickness: f32,
    /// Where created items come from and deleted items go to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_location: Option<Location>,
    /// Per move kind sound overrides.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub sounds: HashMap<MoveKind, SoundSetting>,
}

fn default_thickness() -> f32 {
    DEFAULT_THICKNESS
}

impl MaterialDescription {
    pub fn new(size: SizeSpec) -> Self {
        Self {
            size,
            border_radius: 0.0,
            thickness: DEFAULT_THICKNESS,
            stock_location: None,
            sounds: HashMap::new(),
        }
    }

    pub fn with_thickness(mut self, thickness: f32) -> Self {
        self.thickness = thickness;
        self
    }

    pub fn with_border_radius(mut self, border_radius: f32) -> Self {
        self.border_radius = border_radius;
        self
    }

    pub fn with_stock(mut self, location: Location) -> Self {
        self.stock_location = Some(location);
        self
    }

    pub fn with_sound(mut self, kind: MoveKind, sound: impl Into<SoundSetting>) -> Self {
        self.sounds.insert(kind, sound.into());
        self
    }
}

/// Static description of a location type (drop area size).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationDescription {
    pub size: SizeSpec,
    #[serde(default)]
    pub border_radius: f32,
}

impl LocationDescription {
    pub fn new(size: SizeSpec) -> Self {
        Self {
            size,
            border_radius: 0.0,
        }
    }
}

#[derive(Debug, Clone)]
struct RegisteredMaterial {
    description: MaterialDescription,
    size: Size,
}

#[derive(Debug, Clone)]
struct RegisteredLocation {
    description: LocationDescription,
    size: Size,
}

/// Registry of validated descriptions.
#[derive(Debug, Clone, Default)]
pub struct MaterialRegistry {
    materials: HashMap<MaterialType, RegisteredMaterial>,
    locations: HashMap<LocationType, RegisteredLocation>,
}

impl MaterialRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a material description, rejecting incomplete size contracts.
    pub fn register(
        &mut self,
        kind: MaterialType,
        description: MaterialDescription,
    ) -> Result<(), MaterialError> {
        let size = description
            .size
            .resolve()
            .ok_or(MaterialError::UnderspecifiedSize(kind))?;
        if size.width <= 0.0 || size.height <= 0.0 {
            return Err(MaterialError::InvalidSize(kind));
        }
        self.materials
            .insert(kind, RegisteredMaterial { description, size });
        Ok(())
    }

    /// Consuming variant of [`Self::register`].
    pub fn with(
        mut self,
        kind: MaterialType,
        description: MaterialDescription,
    ) -> Result<Self, MaterialError> {
        self.register(kind, description)?;
        Ok(self)
    }

    pub fn register_location(
        &mut self,
        kind: LocationType,
        description: LocationDescription,
    ) -> Result<(), MaterialError> {
        let size = description
            .size
            .resolve()
            .ok_or(MaterialError::UnderspecifiedLocationSize(kind))?;
        if size.width <= 0.0 || size.height <= 0.0 {
            return Err(MaterialError::InvalidLocationSize(kind));
        }
        self.locations
            .insert(kind, RegisteredLocation { description, size });
        Ok(())
    }

    pub fn description(&self, kind: MaterialType) -> Option<&MaterialDescription> {
        self.materials.get(&kind).map(|m| &m.description)
    }

    pub fn size(&self, kind: MaterialType) -> Option<Size> {
        self.materials.get(&kind).map(|m| m.size)
    }

    pub fn thickness(&self, kind: MaterialType) -> f32 {
        self.description(kind)
            .map_or(DEFAULT_THICKNESS, |d| d.thickness)
    }

    pub fn stock_location(&self, kind: MaterialType) -> Option<&Location> {
        self.description(kind)
            .and_then(|d| d.stock_location.as_ref())
    }

    pub fn location_description(&self, kind: LocationType) -> Option<&LocationDescription> {
        self.locations.get(&kind).map(|l| &l.description)
    }

    pub fn location_size(&self, kind: LocationType) -> Option<Size> {
        self.locations.get(&kind).map(|l| l.size)
    }
}
