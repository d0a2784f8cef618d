// ============================================
// Save System - Формат сохранения мира
// ============================================
// Директория с независимыми под-документами, каждый из которых
// пишется в сжатом (ZSTD) или обычном варианте

mod error;
mod kind;
mod persist;
mod palette;
mod chunk_file;
mod chunks;
mod metadata;
mod screenshot;
mod game_file;

pub mod codec;
pub mod resolver;

pub use error::SaveError;
pub use kind::{
    Encoding, FileKind, METADATA_KIND, CHUNK_KIND, CAMERA_KIND, COMPONENTS_KIND, SCREENSHOT_KIND,
};
pub use persist::Persistable;
pub use palette::BlockPalette;
pub use chunk_file::{ChunkFile, ChunkSection, CHUNK_MAGIC, CHUNK_VERSION, SECTION_HEIGHT};
pub use chunks::ChunkCollection;
pub use metadata::MetaData;
pub use screenshot::Screenshot;
pub use game_file::{GameData, GameFile};
