// ============================================
// Config - Константы и настройки сохранения
// ============================================

use std::path::PathBuf;

/// Поддиректория с файлами чанков
pub const CHUNKS_DIR: &str = "Chunks";

/// Имена файлов внутри директории сохранения (без расширения)
pub const METADATA_FILE: &str = "MetaData";
pub const CAMERA_FILE: &str = "Camera";
pub const COMPONENTS_FILE: &str = "Components";

/// Уровень ZSTD сжатия для всех сжатых вариантов
pub const ZSTD_LEVEL: i32 = 3;

/// Размеры чанка по умолчанию
pub const DEFAULT_CHUNK_WIDTH: u32 = 16;
pub const DEFAULT_CHUNK_HEIGHT: u32 = 128;

/// Предельные размеры чанка. Всё больше считается битым файлом.
pub const MAX_CHUNK_WIDTH: u32 = 256;
pub const MAX_CHUNK_HEIGHT: u32 = 1024;

/// Корневая директория сохранений по умолчанию
pub const DEFAULT_SAVES_ROOT: &str = "Saves";

/// Версия формата метаданных
pub const SAVE_VERSION: u32 = 1;

/// Версия сохранений, записанных без поля format_version
pub const LEGACY_SAVE_VERSION: u32 = 1;

/// Переменные окружения
const ENV_SAVES_ROOT: &str = "VOXEL_SAVE_DIR";
const ENV_COMPRESS: &str = "VOXEL_SAVE_COMPRESS";
const ENV_PARALLEL: &str = "VOXEL_SAVE_PARALLEL";

/// Объём чанка в вокселях, если размеры в допустимых пределах
pub fn checked_chunk_volume(width: u32, height: u32) -> Result<usize, String> {
    if width == 0 || height == 0 {
        return Err(format!("chunk dimensions must be positive, got {}x{}", width, height));
    }
    if width > MAX_CHUNK_WIDTH || height > MAX_CHUNK_HEIGHT {
        return Err(format!(
            "chunk dimensions {}x{} exceed the {}x{} limit",
            width, height, MAX_CHUNK_WIDTH, MAX_CHUNK_HEIGHT
        ));
    }
    (width as usize)
        .checked_mul(width as usize)
        .and_then(|layer| layer.checked_mul(height as usize))
        .ok_or_else(|| format!("chunk volume {}x{}x{} overflows", width, height, width))
}

/// Настройки системы сохранения
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveSettings {
    /// Где лежат директории сохранений
    pub saves_root: PathBuf,
    /// Писать сжатые варианты (zmeta, zchunk)
    pub compressed: bool,
    /// Писать чанки параллельно через rayon
    pub parallel_chunk_writes: bool,
}

impl SaveSettings {
    /// Настройки из переменных окружения поверх значений по умолчанию
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// То же, что `from_env`, но с произвольным источником значений
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::default();

        if let Some(root) = lookup(ENV_SAVES_ROOT).filter(|s| !s.trim().is_empty()) {
            settings.saves_root = PathBuf::from(root);
        }
        if let Some(value) = lookup(ENV_COMPRESS) {
            match parse_flag(&value) {
                Some(flag) => settings.compressed = flag,
                None => log::warn!("[SAVE] Ignoring {}={:?}: expected a boolean", ENV_COMPRESS, value),
            }
        }
        if let Some(value) = lookup(ENV_PARALLEL) {
            match parse_flag(&value) {
                Some(flag) => settings.parallel_chunk_writes = flag,
                None => log::warn!("[SAVE] Ignoring {}={:?}: expected a boolean", ENV_PARALLEL, value),
            }
        }

        settings
    }

    /// Путь к именованному сохранению
    pub fn save_path(&self, name: &str) -> PathBuf {
        self.saves_root.join(name)
    }
}

impl Default for SaveSettings {
    fn default() -> Self {
        Self {
            saves_root: PathBuf::from(DEFAULT_SAVES_ROOT),
            compressed: true,
            parallel_chunk_writes: true,
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
