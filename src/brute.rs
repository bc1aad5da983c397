use crate::config::SpaceConfig;
use crate::error::{CollisionError, Result};
use crate::geometry::Shape;
use crate::object::{validate_batch, CollisionObject};
use crate::space::check_dimensions;
use crate::CollisionSpace;

/// Collision space that tests the query against every object.
///
/// Objects are kept in insertion order, so results come back in that order.
#[derive(Default)]
pub struct BruteSpace {
    dimensions: Option<(f64, f64)>,
    config: SpaceConfig,
    initialized: bool,
    objects: Vec<(CollisionObject, Shape)>,
}

impl BruteSpace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dimensions(width: f64, height: f64) -> Result<Self> {
        let mut space = Self::new();
        space.set_dimensions(width, height)?;
        Ok(space)
    }

    pub fn config(&self) -> &SpaceConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    fn ensure_initialized(&self) -> Result<()> {
        if self.initialized {
            Ok(())
        } else {
            Err(CollisionError::NotInitialized)
        }
    }
}

impl CollisionSpace for BruteSpace {
    fn set_dimensions(&mut self, width: f64, height: f64) -> Result<()> {
        check_dimensions(width, height)?;
        if self.initialized {
            log::warn!(
                "resizing an initialized brute collision space to {} x {}, dropping {} objects",
                width,
                height,
                self.objects.len()
            );
            self.reset();
        }
        self.dimensions = Some((width, height));
        Ok(())
    }

    fn init(&mut self) -> Result<()> {
        if self.initialized {
            return Err(CollisionError::AlreadyInitialized);
        }
        let (width, height) = self.dimensions.ok_or(CollisionError::MissingDimensions)?;
        self.initialized = true;
        log::debug!("initialized brute collision space {} x {}", width, height);
        Ok(())
    }

    fn set_options(&mut self, config: SpaceConfig) -> Result<()> {
        config.validate()?;
        for (object, shape) in self.objects.iter_mut() {
            *shape = object.shape(&config);
        }
        self.config = config;
        Ok(())
    }

    fn add_objects(&mut self, objects: &[CollisionObject]) -> Result<()> {
        validate_batch(objects)?;
        self.ensure_initialized()?;
        for object in objects {
            let shape = object.shape(&self.config);
            match self.objects.iter_mut().find(|(o, _)| o.id == object.id) {
                Some(entry) => {
                    entry.0.clone_from(object);
                    entry.1 = shape;
                }
                None => self.objects.push((object.clone(), shape)),
            }
        }
        Ok(())
    }

    fn del_objects(&mut self, objects: &[CollisionObject]) -> Result<()> {
        validate_batch(objects)?;
        self.ensure_initialized()?;
        self.objects
            .retain(|(o, _)| !objects.iter().any(|gone| gone.id == o.id));
        Ok(())
    }

    fn check_collision(&self, object: &CollisionObject) -> Result<Vec<String>> {
        object.validate()?;
        self.ensure_initialized()?;
        let probe = object.shape(&self.config);
        let property = self.config.collision_properties;
        let threshold = self.config.threshold;
        Ok(self
            .objects
            .iter()
            .filter(|(o, shape)| o.id != object.id && probe.collides(shape, property, threshold))
            .map(|(o, _)| o.id.clone())
            .collect())
    }

    fn reset(&mut self) {
        self.initialized = false;
        self.objects.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ObjectType;
    use crate::space::QuadtreeSpace;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    fn rect(id: &str, x: f64, y: f64, w: f64, h: f64) -> CollisionObject {
        CollisionObject::rect(id, x, y, w, h)
    }

    fn ready<S: CollisionSpace + Default>(width: f64, height: f64, config: &SpaceConfig) -> S {
        let mut space = S::default();
        space.set_dimensions(width, height).unwrap();
        space.init().unwrap();
        space.set_options(config.clone()).unwrap();
        space
    }

    #[test]
    fn results_follow_insertion_order() {
        let mut space: BruteSpace = ready(100.0, 100.0, &SpaceConfig::default());
        space
            .add_objects(&[
                rect("z", 50.0, 50.0, 10.0, 10.0),
                rect("a", 52.0, 52.0, 10.0, 10.0),
                rect("m", 48.0, 48.0, 10.0, 10.0),
            ])
            .unwrap();
        let hits = space.check_collision(&rect("q", 50.0, 50.0, 4.0, 4.0)).unwrap();
        assert_eq!(hits, vec!["z", "a", "m"]);
        space.add_objects(&[rect("z", 90.0, 90.0, 2.0, 2.0)]).unwrap();
        assert_eq!(space.len(), 3);
        let hits = space.check_collision(&rect("q", 50.0, 50.0, 4.0, 4.0)).unwrap();
        assert_eq!(hits, vec!["a", "m"]);
    }

    #[test]
    fn lifecycle_matches_quadtree_space() {
        let mut space = BruteSpace::new();
        assert_eq!(space.init(), Err(CollisionError::MissingDimensions));
        space.set_dimensions(10.0, 10.0).unwrap();
        let probe = rect("p", 1.0, 1.0, 1.0, 1.0);
        assert_eq!(space.check_collision(&probe), Err(CollisionError::NotInitialized));
        space.init().unwrap();
        assert_eq!(space.init(), Err(CollisionError::AlreadyInitialized));
        space.add_objects(&[rect("a", 1.0, 1.0, 2.0, 2.0)]).unwrap();
        space.reset();
        assert!(space.is_empty());
        assert_eq!(space.check_collision(&probe), Err(CollisionError::NotInitialized));
    }

    fn random_objects(rng: &mut Pcg32, count: usize, prefix: &str) -> Vec<CollisionObject> {
        (0..count)
            .map(|i| {
                rect(
                    &format!("{prefix}{i}"),
                    rng.random_range(-20.0..420.0),
                    rng.random_range(-20.0..320.0),
                    rng.random_range(0.0..48.0),
                    rng.random_range(0.0..48.0),
                )
            })
            .collect()
    }

    fn agree(config: SpaceConfig, seed: u64) {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut tree: QuadtreeSpace = ready(400.0, 300.0, &config);
        let mut brute: BruteSpace = ready(400.0, 300.0, &config);

        let objects = random_objects(&mut rng, 300, "o");
        tree.add_objects(&objects).unwrap();
        brute.add_objects(&objects).unwrap();

        // Move some, delete some.
        let moved = random_objects(&mut rng, 60, "o");
        tree.add_objects(&moved).unwrap();
        brute.add_objects(&moved).unwrap();
        tree.del_objects(&objects[200..260]).unwrap();
        brute.del_objects(&objects[200..260]).unwrap();
        assert_eq!(tree.len(), brute.len());

        let probes = random_objects(&mut rng, 100, "probe");
        for probe in probes.iter().chain(objects.iter()) {
            let mut from_tree = tree.check_collision(probe).unwrap();
            let mut from_brute = brute.check_collision(probe).unwrap();
            from_tree.sort();
            from_brute.sort();
            assert_eq!(from_tree, from_brute, "probe {probe:?}");
        }

        // Symmetry between residents.
        for object in objects.iter().take(200) {
            let Some(resident) = tree.get(&object.id).cloned() else {
                continue;
            };
            for other in tree.check_collision(&resident).unwrap() {
                let other = tree.get(&other).cloned().unwrap();
                assert!(tree.check_collision(&other).unwrap().contains(&resident.id));
            }
        }
    }

    #[test]
    fn quadtree_agrees_with_brute_force_rects() {
        agree(SpaceConfig::default(), 7);
    }

    #[test]
    fn quadtree_agrees_with_brute_force_circles() {
        agree(SpaceConfig::new(ObjectType::Circle), 11);
    }

    #[test]
    fn quadtree_agrees_with_brute_force_threshold_and_small_capacity() {
        agree(SpaceConfig::default().with_threshold(0.3).with_capacity(2).with_max_depth(7), 23);
    }
}
