use std::collections::HashMap;

use crate::config::SpaceConfig;
use crate::error::{CollisionError, Result};
use crate::geometry::Bounds;
use crate::object::{validate_batch, CollisionObject};
use crate::quadtree::Quadtree;
use crate::{CollisionSpace, QuadtreeVisitor};

fn store(residents: &mut Vec<Option<CollisionObject>>, slot: usize, object: &CollisionObject) {
    if residents.len() <= slot {
        residents.resize(slot + 1, None);
    }
    match &mut residents[slot] {
        Some(resident) => resident.clone_from(object),
        vacant => *vacant = Some(object.clone()),
    }
}

pub(crate) fn check_dimensions(width: f64, height: f64) -> Result<()> {
    if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
        Ok(())
    } else {
        Err(CollisionError::InvalidDimensions { width, height })
    }
}

/// Collision space backed by a [`Quadtree`].
///
/// Ids map to element slots in the tree; a resident that is added again
/// keeps its slot and only has its geometry rewritten.
#[derive(Default)]
pub struct QuadtreeSpace {
    dimensions: Option<(f64, f64)>,
    config: SpaceConfig,
    tree: Option<Quadtree>,
    registry: HashMap<String, usize>,
    residents: Vec<Option<CollisionObject>>,
}

impl QuadtreeSpace {
    pub fn new() -> Self {
        Self::default()
    }

    /// A space with its dimensions set, still waiting for `init`.
    pub fn with_dimensions(width: f64, height: f64) -> Result<Self> {
        let mut space = Self::new();
        space.set_dimensions(width, height)?;
        Ok(space)
    }

    pub fn config(&self) -> &SpaceConfig {
        &self.config
    }

    pub fn dimensions(&self) -> Option<(f64, f64)> {
        self.dimensions
    }

    pub fn is_initialized(&self) -> bool {
        self.tree.is_some()
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.registry.contains_key(id)
    }

    /// The stored copy of a resident object.
    pub fn get(&self, id: &str) -> Option<&CollisionObject> {
        let slot = *self.registry.get(id)?;
        self.residents.get(slot)?.as_ref()
    }

    pub fn traverse<V>(&self, visitor: &mut V) -> Result<()>
        where
            V: QuadtreeVisitor,
    {
        let tree = self.tree.as_ref().ok_or(CollisionError::NotInitialized)?;
        let residents = &self.residents;
        tree.traverse(visitor, |slot| {
            residents
                .get(slot)
                .and_then(|r| r.as_ref())
                .map_or("", |r| r.id.as_str())
        });
        Ok(())
    }
}

impl CollisionSpace for QuadtreeSpace {
    fn set_dimensions(&mut self, width: f64, height: f64) -> Result<()> {
        check_dimensions(width, height)?;
        if self.tree.is_some() {
            log::warn!(
                "resizing an initialized collision space to {} x {}, dropping {} objects",
                width,
                height,
                self.registry.len()
            );
            self.reset();
        }
        self.dimensions = Some((width, height));
        Ok(())
    }

    fn init(&mut self) -> Result<()> {
        if self.tree.is_some() {
            return Err(CollisionError::AlreadyInitialized);
        }
        let (width, height) = self.dimensions.ok_or(CollisionError::MissingDimensions)?;
        self.tree = Some(Quadtree::new(
            Bounds::new(0.0, 0.0, width, height),
            self.config.capacity,
            self.config.max_depth,
        ));
        log::debug!(
            "initialized quadtree collision space {} x {} (capacity {}, max depth {})",
            width,
            height,
            self.config.capacity,
            self.config.max_depth
        );
        Ok(())
    }

    fn set_options(&mut self, config: SpaceConfig) -> Result<()> {
        config.validate()?;
        if let Some(tree) = self.tree.as_mut() {
            tree.set_limits(config.capacity, config.max_depth);
            if self.config.reshapes(&config) {
                for (slot, resident) in self.residents.iter().enumerate() {
                    if let Some(resident) = resident {
                        tree.update(slot, resident.shape(&config));
                    }
                }
            }
        }
        log::debug!(
            "collision options: {} objects, {} test, threshold {}",
            config.obj_type,
            config.collision_properties,
            config.threshold
        );
        self.config = config;
        Ok(())
    }

    fn add_objects(&mut self, objects: &[CollisionObject]) -> Result<()> {
        validate_batch(objects)?;
        let tree = self.tree.as_mut().ok_or(CollisionError::NotInitialized)?;
        for object in objects {
            let shape = object.shape(&self.config);
            let slot = match self.registry.get(&object.id) {
                Some(&slot) => {
                    tree.update(slot, shape);
                    slot
                }
                None => {
                    let slot = tree.insert(shape);
                    self.registry.insert(object.id.clone(), slot);
                    slot
                }
            };
            store(&mut self.residents, slot, object);
        }
        Ok(())
    }

    fn del_objects(&mut self, objects: &[CollisionObject]) -> Result<()> {
        validate_batch(objects)?;
        let tree = self.tree.as_mut().ok_or(CollisionError::NotInitialized)?;
        for object in objects {
            if let Some(slot) = self.registry.remove(&object.id) {
                tree.remove(slot);
                self.residents[slot] = None;
            }
        }
        Ok(())
    }

    fn check_collision(&self, object: &CollisionObject) -> Result<Vec<String>> {
        object.validate()?;
        let tree = self.tree.as_ref().ok_or(CollisionError::NotInitialized)?;
        let probe = object.shape(&self.config);
        let omit = self.registry.get(&object.id).copied();
        let property = self.config.collision_properties;
        let threshold = self.config.threshold;

        let hits = tree.query(&probe.bounds(), omit, |other| {
            probe.collides(other, property, threshold)
        });
        Ok(hits
            .into_iter()
            .filter_map(|slot| self.residents.get(slot)?.as_ref())
            .map(|resident| resident.id.clone())
            .collect())
    }

    fn reset(&mut self) {
        log::debug!("resetting collision space with {} objects", self.registry.len());
        self.tree = None;
        self.registry.clear();
        self.residents.clear();
    }
}
