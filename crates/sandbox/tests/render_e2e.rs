//! Rendering a simulated world into caller-provided buffers.
//!
//! Run: cargo test -p sandbox --test render_e2e

use sandbox::render::required_len;
use sandbox::{Cell, Material, RenderOptions, Rgba, World};

const PLAIN: RenderOptions = RenderOptions {
  temperature_overlay: false,
};

fn pixel(buffer: &[u8], stride: usize, x: usize, y: usize) -> [u8; 4] {
  let offset = (x + y * stride) * 4;
  buffer[offset..offset + 4].try_into().unwrap()
}

#[test]
fn renders_cells_at_their_world_position() {
  let mut world = World::with_size(64, 64, 3).unwrap();
  world.set_cell(2, 3, Cell::of(Material::Stone));
  world.set_cell(40, 50, Cell::of(Material::Water).with_temperature(-30));

  let buffer = world.render_to_vec(PLAIN);
  assert_eq!(buffer.len(), 64 * 64 * 4);
  assert_eq!(pixel(&buffer, 64, 2, 3), Material::Stone.color().to_array());
  assert_eq!(pixel(&buffer, 64, 40, 50), Material::Water.color().to_array());
  assert_eq!(pixel(&buffer, 64, 3, 3), Rgba::TRANSPARENT.to_array());

  let tinted = world.render_to_vec(RenderOptions::default());
  assert_ne!(pixel(&tinted, 64, 40, 50), Material::Water.color().to_array());
}

#[test]
fn absent_chunks_and_padding_are_left_untouched() {
  let mut world = World::with_size(32, 32, 0).unwrap();
  world.set_cell(1, 1, Cell::of(Material::Wall));

  let stride = 40;
  let mut buffer = vec![0xab; required_len(32, 32, stride)];
  world.render_with(&mut buffer, stride, PLAIN).unwrap();

  assert_eq!(pixel(&buffer, stride, 1, 1), Material::Wall.color().to_array());
  // Same chunk, empty cell.
  assert_eq!(pixel(&buffer, stride, 0, 0), [0, 0, 0, 0]);
  // Chunk that was never created.
  assert_eq!(pixel(&buffer, stride, 30, 30), [0xab; 4]);
  // Row padding past the world width.
  assert_eq!(pixel(&buffer, stride, 35, 0), [0xab; 4]);
}

#[test]
fn frame_follows_the_simulation() {
  let mut world = World::with_size(16, 16, 9).unwrap();
  world.set_cell(4, 0, Cell::of(Material::Sand));
  world.step(20);

  let buffer = world.render_to_vec(PLAIN);
  assert_eq!(pixel(&buffer, 16, 4, 15), Material::Sand.color().to_array());
  assert_eq!(pixel(&buffer, 16, 4, 0), Rgba::TRANSPARENT.to_array());
}
