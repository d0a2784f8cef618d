// ============================================
// MetaData - Заголовок сохранения
// ============================================
// Небольшой версионированный документ с параметрами мира.
// Неизвестные поля игнорируются, отсутствие обязательных - ошибка.

use serde::{Serialize, Deserialize};
use ultraviolet::Vec2;

use crate::core::{checked_chunk_volume, LEGACY_SAVE_VERSION, SAVE_VERSION};
use super::codec;
use super::error::SaveError;
use super::persist::Persistable;

fn default_version() -> u32 {
    LEGACY_SAVE_VERSION
}

/// Метаданные мира
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaData {
    /// Версия формата (старые сохранения без поля считаются версией 1)
    #[serde(default = "default_version")]
    format_version: u32,
    /// Файл/ID оверворлда, из которого сгенерирован мир
    #[serde(default)]
    overworld_file: String,
    world_origin: [f32; 2],
    world_scale: f32,
    chunk_width: u32,
    chunk_height: u32,
    /// Время суток на момент сохранения
    #[serde(default)]
    time_of_day: f32,
}

impl MetaData {
    pub fn new(
        overworld_file: impl Into<String>,
        world_origin: Vec2,
        world_scale: f32,
        time_of_day: f32,
        chunk_width: u32,
        chunk_height: u32,
    ) -> Result<Self, SaveError> {
        let meta = Self {
            format_version: SAVE_VERSION,
            overworld_file: overworld_file.into(),
            world_origin: world_origin.into(),
            world_scale,
            chunk_width,
            chunk_height,
            time_of_day,
        };
        meta.validate().map_err(SaveError::InvalidMetaData)?;
        Ok(meta)
    }

    /// Проверка допустимости значений
    fn validate(&self) -> Result<(), String> {
        checked_chunk_volume(self.chunk_width, self.chunk_height)?;
        Ok(())
    }

    pub fn format_version(&self) -> u32 {
        self.format_version
    }

    pub fn overworld_file(&self) -> &str {
        &self.overworld_file
    }

    pub fn world_origin(&self) -> Vec2 {
        Vec2::from(self.world_origin)
    }

    pub fn world_scale(&self) -> f32 {
        self.world_scale
    }

    pub fn chunk_width(&self) -> u32 {
        self.chunk_width
    }

    pub fn chunk_height(&self) -> u32 {
        self.chunk_height
    }

    pub fn time_of_day(&self) -> f32 {
        self.time_of_day
    }
}

impl Persistable for MetaData {
    fn encode(&self, compressed: bool) -> Result<Vec<u8>, SaveError> {
        codec::encode_json(self, compressed)
    }

    fn decode(bytes: &[u8], compressed: bool) -> Result<Self, SaveError> {
        let meta: MetaData = codec::decode_json(bytes, compressed)?;
        meta.validate().map_err(|reason| SaveError::decode("<memory>", reason))?;

        if meta.format_version > SAVE_VERSION {
            log::warn!(
                "[SAVE] MetaData written by newer format v{} (reader v{}), unknown fields ignored",
                meta.format_version, SAVE_VERSION
            );
        }
        Ok(meta)
    }

    fn copy_from(&mut self, other: &Self) {
        self.format_version = other.format_version;
        self.overworld_file = other.overworld_file.clone();
        self.world_origin = other.world_origin;
        self.world_scale = other.world_scale;
        self.chunk_width = other.chunk_width;
        self.chunk_height = other.chunk_height;
        self.time_of_day = other.time_of_day;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta() -> MetaData {
        MetaData::new("overworld_7", Vec2::new(10.0, -4.0), 2.0, 0.25, 16, 128).unwrap()
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let err = MetaData::new("w", Vec2::zero(), 1.0, 0.0, 0, 128).unwrap_err();
        assert!(matches!(err, SaveError::InvalidMetaData(_)));
    }

    #[test]
    fn test_decode_both_variants() {
        for compressed in [false, true] {
            let bytes = meta().encode(compressed).unwrap();
            assert_eq!(MetaData::decode(&bytes, compressed).unwrap(), meta());
        }
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let json = br#"{
            "format_version": 3,
            "overworld_file": "ow",
            "world_origin": [1.0, 2.0],
            "world_scale": 1.5,
            "chunk_width": 16,
            "chunk_height": 64,
            "time_of_day": 0.75,
            "weather": { "rain": true }
        }"#;
        let meta = MetaData::decode(json, false).unwrap();
        assert_eq!(meta.format_version(), 3);
        assert_eq!(meta.chunk_height(), 64);
        assert_eq!(meta.world_origin(), Vec2::new(1.0, 2.0));
    }

    #[test]
    fn test_old_writer_without_optional_fields() {
        let json = br#"{ "world_origin": [0.0, 0.0], "world_scale": 1.0, "chunk_width": 8, "chunk_height": 8 }"#;
        let meta = MetaData::decode(json, false).unwrap();
        assert_eq!(meta.format_version(), 1);
        assert_eq!(meta.overworld_file(), "");
        assert_eq!(meta.time_of_day(), 0.0);
    }

    #[test]
    fn test_missing_required_field_fails() {
        let json = br#"{ "world_origin": [0.0, 0.0], "world_scale": 1.0, "chunk_width": 8 }"#;
        assert!(MetaData::decode(json, false).unwrap_err().is_decode());

        let zero = br#"{ "world_origin": [0.0, 0.0], "world_scale": 1.0, "chunk_width": 0, "chunk_height": 8 }"#;
        assert!(MetaData::decode(zero, false).unwrap_err().is_decode());
    }

    #[test]
    fn test_oversized_dimensions_rejected() {
        let err = MetaData::new("w", Vec2::zero(), 1.0, 0.0, 70_000, 128).unwrap_err();
        assert!(matches!(err, SaveError::InvalidMetaData(_)));

        let json = br#"{ "world_origin": [0.0, 0.0], "world_scale": 1.0, "chunk_width": 16, "chunk_height": 4294967295 }"#;
        assert!(MetaData::decode(json, false).unwrap_err().is_decode());
    }

    #[test]
    fn test_read_into_keeps_value_on_error() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("MetaData.zmeta");
        let bad = dir.path().join("Broken.zmeta");
        meta().write_file(&good, true).unwrap();
        std::fs::write(&bad, b"not zstd").unwrap();

        let mut live = MetaData::new("live", Vec2::zero(), 1.0, 0.0, 32, 32).unwrap();
        let before = live.clone();
        let err = live.read_into(&bad, true).unwrap_err();
        assert!(err.is_decode());
        assert_eq!(live, before);

        live.read_into(&good, true).unwrap();
        assert_eq!(live, meta());
    }

    #[test]
    fn test_copy_from_replaces_all_fields() {
        let mut live = MetaData::new("other", Vec2::zero(), 1.0, 0.0, 32, 32).unwrap();
        live.copy_from(&meta());
        assert_eq!(live, meta());
    }
}
