mod chunk;
mod rect;

pub use chunk::{Chunk, DIRTY_MARGIN, PendingMove};
pub use rect::DirtyRect;
