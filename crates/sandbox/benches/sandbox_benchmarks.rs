use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rand::prelude::*;
use rand::rngs::SmallRng;
use sandbox::{CellRect, Material, RenderOptions, SandboxConfig, World};

const GRID_SIZES: &[u32] = &[4, 8, 16];
const CHUNK_SIDE: u32 = 64;

/// Scatters sand and water over the upper half of a world standing on a
/// stone floor, then lets it settle a little so the dirty rects are warm.
fn populated_world(grid: u32, seed: u64) -> World {
  let mut world = World::new(SandboxConfig {
    chunk_width: CHUNK_SIDE,
    chunk_height: CHUNK_SIDE,
    grid_width: grid,
    grid_height: grid,
    seed,
  })
  .unwrap();

  let (width, height) = (world.width(), world.height());
  world.fill_rect(CellRect::new(0, height as i32 - 4, width, 4), Material::Stone, None);

  let mut rng = SmallRng::seed_from_u64(seed);
  for _ in 0..(width * height / 8) {
    let x = rng.random_range(0..width as i32);
    let y = rng.random_range(0..height as i32 / 2);
    let material = if rng.random_bool(0.7) {
      Material::Sand
    } else {
      Material::Water
    };
    world.spawn(x, y, material);
  }
  world.step(4);
  world
}

fn bench_tick(c: &mut Criterion) {
  let mut group = c.benchmark_group("tick");
  group.sample_size(20);

  for &grid in GRID_SIZES {
    let side = (grid * CHUNK_SIDE) as u64;
    group.throughput(Throughput::Elements(side * side));

    let id = BenchmarkId::new("grid", format!("{grid}x{grid}"));
    group.bench_with_input(id, &grid, |b, &grid| {
      let mut world = populated_world(grid, 42);
      b.iter(|| world.tick());
    });
  }

  group.finish();
}

fn bench_render(c: &mut Criterion) {
  let mut group = c.benchmark_group("render");

  for &grid in GRID_SIZES {
    let side = (grid * CHUNK_SIDE) as usize;
    group.throughput(Throughput::Bytes((side * side * 4) as u64));

    let id = BenchmarkId::new("grid", format!("{grid}x{grid}"));
    group.bench_with_input(id, &grid, |b, &grid| {
      let world = populated_world(grid, 7);
      let mut buffer = vec![0u8; side * side * 4];
      b.iter(|| world.render_with(&mut buffer, side, RenderOptions::default()).unwrap());
    });
  }

  group.finish();
}

fn bench_parallel_scaling(c: &mut Criterion) {
  let mut group = c.benchmark_group("parallel_scaling");
  group.sample_size(20);

  let grid = 8u32;
  let side = (grid * CHUNK_SIDE) as u64;
  group.throughput(Throughput::Elements(side * side));

  for threads in [1, 2, 4, 8] {
    let id = BenchmarkId::new("threads", threads);

    group.bench_with_input(id, &threads, |b, &threads| {
      let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .unwrap();

      let mut world = populated_world(grid, 42);

      b.iter(|| {
        pool.install(|| world.tick());
      });
    });
  }

  group.finish();
}

criterion_group!(benches, bench_tick, bench_render, bench_parallel_scaling);
criterion_main!(benches);
