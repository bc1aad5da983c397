//! Collision detection for dragged blocks.
//!
//! A [`CollisionSpace`] indexes circles or rectangles by string id and
//! answers which resident objects collide with a query object.
//! [`QuadtreeSpace`] backs this with a [`Quadtree`], [`BruteSpace`] checks
//! every object and serves as a baseline.

mod brute;
mod config;
mod error;
mod geometry;
mod list;
mod object;
mod quadtree;
mod space;

/// Callbacks for [`QuadtreeSpace::traverse`], e.g. to draw the index.
pub trait QuadtreeVisitor {
    fn object(&mut self, id: &str, shape: &Shape);
    fn leaf(&mut self, depth: u8, region: &Bounds);
    fn branch(&mut self, depth: u8, region: &Bounds);
}

/// The contract UI callers program against.
///
/// Call order is `set_dimensions`, `init`, then any mix of the rest.
/// `set_options` may be called at any point.
pub trait CollisionSpace {
    /// Sets the root region `[0, width) x [0, height)`. On an initialized
    /// space this implies [`reset`](CollisionSpace::reset).
    fn set_dimensions(&mut self, width: f64, height: f64) -> Result<()>;

    /// Builds the empty index. Fails if already initialized.
    fn init(&mut self) -> Result<()>;

    /// Replaces the options after validating them.
    fn set_options(&mut self, config: SpaceConfig) -> Result<()>;

    /// Inserts objects, or moves them if their id is already resident.
    fn add_objects(&mut self, objects: &[CollisionObject]) -> Result<()>;

    /// Removes objects by id. Unknown ids are ignored.
    fn del_objects(&mut self, objects: &[CollisionObject]) -> Result<()>;

    /// Ids of resident objects colliding with `object`, never its own id.
    fn check_collision(&self, object: &CollisionObject) -> Result<Vec<String>>;

    /// Drops every object and the index; `init` is needed again.
    fn reset(&mut self);
}

pub use brute::BruteSpace;
pub use config::{CollisionProperty, ObjectType, SpaceConfig};
pub use error::{CollisionError, Result};
pub use geometry::{Bounds, Shape};
pub use list::List;
pub use object::CollisionObject;
pub use quadtree::Quadtree;
pub use space::QuadtreeSpace;
