// ============================================
// Core Module - Основные константы и настройки
// ============================================

mod config;

pub use config::{
    SaveSettings, CHUNKS_DIR, METADATA_FILE, CAMERA_FILE, COMPONENTS_FILE,
    ZSTD_LEVEL, DEFAULT_CHUNK_WIDTH, DEFAULT_CHUNK_HEIGHT, DEFAULT_SAVES_ROOT,
    SAVE_VERSION, LEGACY_SAVE_VERSION, MAX_CHUNK_WIDTH, MAX_CHUNK_HEIGHT,
    checked_chunk_volume,
};
