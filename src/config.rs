use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{CollisionError, Result};

/// Which dimensions of an object are authoritative.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "lowercase"))]
pub enum ObjectType {
    /// `radius` (or half the shorter side) describes the object.
    Circle,
    /// `width` and `height` describe the object.
    #[default]
    Rect,
}

/// The overlap test applied to candidates found by the index.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CollisionProperty {
    /// Centre distance against the sum of radii.
    #[cfg_attr(feature = "serde", serde(rename = "distance"))]
    Distance,
    /// Axis-aligned bounding box intersection.
    #[default]
    #[cfg_attr(
        feature = "serde",
        serde(rename = "bbox", alias = "boundingBox", alias = "bounding-box")
    )]
    BoundingBox,
}

impl ObjectType {
    /// The predicate that matches this object type when none is given.
    pub fn default_property(self) -> CollisionProperty {
        match self {
            ObjectType::Circle => CollisionProperty::Distance,
            ObjectType::Rect => CollisionProperty::BoundingBox,
        }
    }
}

impl FromStr for ObjectType {
    type Err = CollisionError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "circle" => Ok(ObjectType::Circle),
            "rect" => Ok(ObjectType::Rect),
            other => Err(CollisionError::InvalidConfiguration(format!(
                "unknown object type '{other}', expected 'circle' or 'rect'"
            ))),
        }
    }
}

impl FromStr for CollisionProperty {
    type Err = CollisionError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "distance" => Ok(CollisionProperty::Distance),
            "bbox" | "boundingBox" | "bounding-box" => Ok(CollisionProperty::BoundingBox),
            other => Err(CollisionError::InvalidConfiguration(format!(
                "unknown collision property '{other}', expected 'distance' or 'bbox'"
            ))),
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectType::Circle => f.write_str("circle"),
            ObjectType::Rect => f.write_str("rect"),
        }
    }
}

impl fmt::Display for CollisionProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollisionProperty::Distance => f.write_str("distance"),
            CollisionProperty::BoundingBox => f.write_str("bbox"),
        }
    }
}

/// Collision space options.
///
/// Values are checked by [`SpaceConfig::validate`] when handed to a space,
/// never lazily at query time.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(default, rename_all = "camelCase")
)]
pub struct SpaceConfig {
    pub obj_type: ObjectType,
    pub collision_properties: CollisionProperty,
    /// Default radius for circle objects that carry none of their own.
    pub radius: Option<f64>,
    /// How much two objects must overlap to count, in `[0, 1]`.
    /// 0 counts touching objects, 1 needs full overlap.
    pub threshold: f64,
    /// Objects a leaf holds before it subdivides.
    pub capacity: usize,
    /// Deepest level a leaf may subdivide to.
    pub max_depth: u8,
}

impl SpaceConfig {
    pub const DEFAULT_CAPACITY: usize = 4;
    pub const DEFAULT_MAX_DEPTH: u8 = 8;
    const DEPTH_LIMIT: u8 = 32;

    /// Options for `obj_type` with its matching predicate.
    pub fn new(obj_type: ObjectType) -> Self {
        Self {
            obj_type,
            collision_properties: obj_type.default_property(),
            ..Self::default()
        }
    }

    /// Builds options from the string names used by UI callers.
    pub fn parse(obj_type: &str, collision_properties: &str, radius: Option<f64>) -> Result<Self> {
        let config = Self {
            obj_type: obj_type.parse()?,
            collision_properties: collision_properties.parse()?,
            radius,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_property(mut self, collision_properties: CollisionProperty) -> Self {
        self.collision_properties = collision_properties;
        self
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = Some(radius);
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_max_depth(mut self, max_depth: u8) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(radius) = self.radius {
            if !radius.is_finite() || radius < 0.0 {
                return Err(CollisionError::InvalidConfiguration(format!(
                    "radius must be finite and non-negative, got {radius}"
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(CollisionError::InvalidConfiguration(format!(
                "threshold must lie in [0, 1], got {}",
                self.threshold
            )));
        }
        if self.capacity == 0 {
            return Err(CollisionError::InvalidConfiguration(
                "capacity must be at least 1".to_string(),
            ));
        }
        if self.max_depth > Self::DEPTH_LIMIT {
            return Err(CollisionError::InvalidConfiguration(format!(
                "max depth must not exceed {}, got {}",
                Self::DEPTH_LIMIT,
                self.max_depth
            )));
        }
        Ok(())
    }

    /// Whether switching to `other` changes how stored geometry is derived.
    pub(crate) fn reshapes(&self, other: &SpaceConfig) -> bool {
        self.obj_type != other.obj_type || self.radius != other.radius
    }
}

impl Default for SpaceConfig {
    fn default() -> Self {
        Self {
            obj_type: ObjectType::Rect,
            collision_properties: CollisionProperty::BoundingBox,
            radius: None,
            threshold: 0.0,
            capacity: Self::DEFAULT_CAPACITY,
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }
}
