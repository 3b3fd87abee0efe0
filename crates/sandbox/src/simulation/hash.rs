//! Deterministic hash functions for seeding simulation randomness.
//!
//! # Naming Convention
//!
//! `hash{inputs}{outputs}{input_type}{output_type}{bits}`, e.g. `hash41uu64`
//! takes four `u64` and returns one `u64`.

use crate::coords::ChunkPos;

/// FNV-1a style mixing for 64-bit values.
#[inline]
pub fn mix64(mut h: u64) -> u64 {
  h = h.wrapping_mul(0x517c_c1b7_2722_0a95);
  h ^= h >> 32;
  h = h.wrapping_mul(0x517c_c1b7_2722_0a95);
  h ^= h >> 32;
  h
}

#[inline]
pub fn hash21uu64(a: u64, b: u64) -> u64 {
  mix64(a ^ b.rotate_left(32))
}

#[inline]
pub fn hash41uu64(a: u64, b: u64, c: u64, d: u64) -> u64 {
  mix64(a ^ b.rotate_left(16) ^ c.rotate_left(32) ^ d.rotate_left(48))
}

/// Packs a chunk position into one hash input.
#[inline]
pub fn chunk_key(pos: ChunkPos) -> u64 {
  ((pos.x as u32 as u64) << 32) | pos.y as u32 as u64
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn inputs_are_order_sensitive() {
    assert_ne!(hash21uu64(1, 2), hash21uu64(2, 1));
    assert_ne!(hash41uu64(1, 2, 3, 4), hash41uu64(4, 3, 2, 1));
  }

  #[test]
  fn chunk_keys_are_distinct_for_signed_positions() {
    let keys = [
      chunk_key(ChunkPos::new(0, 1)),
      chunk_key(ChunkPos::new(1, 0)),
      chunk_key(ChunkPos::new(-1, 0)),
      chunk_key(ChunkPos::new(0, -1)),
    ];
    for (i, a) in keys.iter().enumerate() {
      for b in &keys[i + 1..] {
        assert_ne!(a, b);
      }
    }
  }
}
