#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::{ObjectType, SpaceConfig};
use crate::error::{CollisionError, Result};
use crate::geometry::Shape;

/// One trackable object, identified by an opaque string id.
///
/// `x` and `y` are the centre. In circle mode `radius` wins over
/// `width`/`height` when present.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CollisionObject {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub radius: Option<f64>,
}

impl CollisionObject {
    pub fn rect(id: impl Into<String>, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            width,
            height,
            radius: None,
        }
    }

    pub fn circle(id: impl Into<String>, x: f64, y: f64, radius: f64) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            width: radius * 2.0,
            height: radius * 2.0,
            radius: Some(radius),
        }
    }

    /// A zero-sized probe at a point.
    pub fn point(id: impl Into<String>, x: f64, y: f64) -> Self {
        Self::rect(id, x, y, 0.0, 0.0)
    }

    /// Rejects geometry that would poison subdivision or overlap math.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| CollisionError::InvalidGeometry {
            id: self.id.clone(),
            reason,
        };
        if !self.x.is_finite() || !self.y.is_finite() {
            return Err(invalid(format!("centre ({}, {}) is not finite", self.x, self.y)));
        }
        if !self.width.is_finite() || self.width < 0.0 {
            return Err(invalid(format!("width {} is negative or not finite", self.width)));
        }
        if !self.height.is_finite() || self.height < 0.0 {
            return Err(invalid(format!("height {} is negative or not finite", self.height)));
        }
        if let Some(radius) = self.radius {
            if !radius.is_finite() || radius < 0.0 {
                return Err(invalid(format!("radius {radius} is negative or not finite")));
            }
        }
        Ok(())
    }

    /// Geometry snapshot under `config`.
    pub fn shape(&self, config: &SpaceConfig) -> Shape {
        match config.obj_type {
            ObjectType::Circle => {
                let radius = self
                    .radius
                    .or(config.radius)
                    .unwrap_or_else(|| self.width.min(self.height) * 0.5);
                Shape::circle(self.x, self.y, radius)
            }
            ObjectType::Rect => Shape::rect(self.x, self.y, self.width, self.height),
        }
    }
}

/// Validates every object of a batch before any of it is applied.
pub(crate) fn validate_batch(objects: &[CollisionObject]) -> Result<()> {
    objects.iter().try_for_each(CollisionObject::validate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_geometry() {
        let bad = [
            CollisionObject::rect("nan", f64::NAN, 0.0, 1.0, 1.0),
            CollisionObject::rect("inf", 0.0, f64::INFINITY, 1.0, 1.0),
            CollisionObject::rect("w", 0.0, 0.0, -1.0, 1.0),
            CollisionObject::rect("h", 0.0, 0.0, 1.0, f64::NAN),
            CollisionObject::circle("r", 0.0, 0.0, -2.0),
        ];
        for object in bad {
            match object.validate() {
                Err(CollisionError::InvalidGeometry { id, .. }) => assert_eq!(id, object.id),
                other => panic!("expected invalid geometry for {object:?}, got {other:?}"),
            }
        }
        assert!(CollisionObject::point("p", 3.0, 4.0).validate().is_ok());
    }

    #[test]
    fn circle_radius_resolution() {
        let circle = SpaceConfig::new(ObjectType::Circle);
        let own = CollisionObject::circle("a", 0.0, 0.0, 3.0);
        assert_eq!(own.shape(&circle).radius, 3.0);

        let boxed = CollisionObject::rect("b", 0.0, 0.0, 10.0, 6.0);
        assert_eq!(boxed.shape(&circle).radius, 3.0);
        assert_eq!(boxed.shape(&circle.clone().with_radius(7.0)).radius, 7.0);
        assert_eq!(own.shape(&circle.with_radius(7.0)).radius, 3.0);
    }

    #[test]
    fn rect_shape_uses_extents() {
        let object = CollisionObject::rect("a", 10.0, 10.0, 20.0, 8.0);
        let bounds = object.shape(&SpaceConfig::default()).bounds();
        assert_eq!((bounds.left, bounds.top, bounds.right, bounds.bottom), (0.0, 6.0, 20.0, 14.0));
    }

    #[test]
    fn batch_fails_on_any_bad_member() {
        let batch = [
            CollisionObject::rect("ok", 0.0, 0.0, 1.0, 1.0),
            CollisionObject::rect("bad", 0.0, 0.0, -1.0, 1.0),
        ];
        assert!(validate_batch(&batch).is_err());
        assert!(validate_batch(&batch[..1]).is_ok());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn reads_ui_json() {
        let json = r#"{"id":"col-3","x":40,"y":52.5,"width":32,"height":32}"#;
        let object: CollisionObject = serde_json::from_str(json).unwrap();
        assert_eq!(object, CollisionObject::rect("col-3", 40.0, 52.5, 32.0, 32.0));
        let json = serde_json::to_string(&object).unwrap();
        assert!(!json.contains("radius"));
    }
}
