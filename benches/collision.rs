use collision_space::{BruteSpace, CollisionObject, CollisionSpace, QuadtreeSpace, SpaceConfig};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

const WIDTH: f64 = 1280.0;
const HEIGHT: f64 = 720.0;
const OBJSIZE: f64 = 32.0;

fn blocks(count: usize) -> Vec<CollisionObject> {
    let mut rng = Pcg32::seed_from_u64(42);
    (0..count)
        .map(|i| {
            CollisionObject::rect(
                format!("col-{i}"),
                rng.random_range(OBJSIZE..WIDTH - OBJSIZE),
                rng.random_range(OBJSIZE..HEIGHT - OBJSIZE),
                OBJSIZE,
                OBJSIZE,
            )
        })
        .collect()
}

fn populated<S: CollisionSpace + Default>(objects: &[CollisionObject]) -> S {
    let mut space = S::default();
    space.set_dimensions(WIDTH, HEIGHT).unwrap();
    space.init().unwrap();
    space.set_options(SpaceConfig::default()).unwrap();
    space.add_objects(objects).unwrap();
    space
}

fn bench_check_collision(c: &mut Criterion) {
    let objects = blocks(500);
    let target = CollisionObject::rect("col-target", WIDTH / 2.0, HEIGHT / 2.0, OBJSIZE, OBJSIZE);

    let quadtree: QuadtreeSpace = populated(&objects);
    c.bench_function("quadtree_check_500", |b| {
        b.iter(|| quadtree.check_collision(black_box(&target)).unwrap())
    });

    let brute: BruteSpace = populated(&objects);
    c.bench_function("brute_check_500", |b| {
        b.iter(|| brute.check_collision(black_box(&target)).unwrap())
    });
}

fn bench_drag(c: &mut Criterion) {
    let objects = blocks(500);
    let mut space: QuadtreeSpace = populated(&objects);
    let mut dragged = objects[0].clone();
    let mut step = 0usize;
    c.bench_function("quadtree_move_and_check", |b| {
        b.iter(|| {
            step = (step + 1) % 400;
            dragged.x = OBJSIZE + step as f64 * 3.0;
            space.add_objects(std::slice::from_ref(&dragged)).unwrap();
            space.check_collision(&dragged).unwrap()
        })
    });
}

criterion_group!(benches, bench_check_collision, bench_drag);
criterion_main!(benches);
