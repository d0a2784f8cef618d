// ============================================
// Codec - Кодирование под-документов
// ============================================
// JSON для структурированных документов, bincode для чанков.
// Сжатый вариант = ZSTD поверх тех же байтов.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::core::ZSTD_LEVEL;
use super::error::SaveError;

/// Путь-заглушка для ошибок разбора байтов из памяти
const IN_MEMORY: &str = "<memory>";

/// Сжать байты, если нужно
pub fn compress(bytes: Vec<u8>, compressed: bool) -> Result<Vec<u8>, SaveError> {
    if !compressed {
        return Ok(bytes);
    }
    zstd::encode_all(&bytes[..], ZSTD_LEVEL).map_err(|e| SaveError::Encode {
        what: "zstd stream",
        reason: e.to_string(),
    })
}

/// Распаковать байты, если они сжаты
pub fn decompress(bytes: &[u8], compressed: bool) -> Result<Vec<u8>, SaveError> {
    if !compressed {
        return Ok(bytes.to_vec());
    }
    zstd::decode_all(bytes).map_err(|e| SaveError::decode(IN_MEMORY, format!("zstd: {}", e)))
}

/// Значение -> JSON (+ ZSTD)
pub fn encode_json<T: Serialize>(value: &T, compressed: bool) -> Result<Vec<u8>, SaveError> {
    let json = serde_json::to_vec_pretty(value).map_err(|e| SaveError::Encode {
        what: std::any::type_name::<T>(),
        reason: e.to_string(),
    })?;
    compress(json, compressed)
}

/// JSON (+ ZSTD) -> значение
pub fn decode_json<T: DeserializeOwned>(bytes: &[u8], compressed: bool) -> Result<T, SaveError> {
    let json = decompress(bytes, compressed)?;
    serde_json::from_slice(&json).map_err(|e| SaveError::decode(IN_MEMORY, e))
}

/// Значение -> bincode (+ ZSTD)
pub fn encode_bin<T: Serialize>(value: &T, compressed: bool) -> Result<Vec<u8>, SaveError> {
    let body = bincode::serialize(value).map_err(|e| SaveError::Encode {
        what: std::any::type_name::<T>(),
        reason: e.to_string(),
    })?;
    compress(body, compressed)
}

/// bincode (+ ZSTD) -> значение
pub fn decode_bin<T: DeserializeOwned>(bytes: &[u8], compressed: bool) -> Result<T, SaveError> {
    let body = decompress(bytes, compressed)?;
    bincode::deserialize(&body).map_err(|e| SaveError::decode(IN_MEMORY, e))
}

/// Записать байты в файл
pub fn write_bytes(path: &Path, bytes: &[u8]) -> Result<(), SaveError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(bytes)?;
    writer.flush()?;
    Ok(())
}

/// Прочитать файл целиком
pub fn read_bytes(path: &Path) -> Result<Vec<u8>, SaveError> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    Ok(bytes)
}

/// Сохранить значение как JSON-файл
pub fn save_json<T: Serialize>(value: &T, path: &Path, compressed: bool) -> Result<(), SaveError> {
    let bytes = encode_json(value, compressed)?;
    write_bytes(path, &bytes)
}

/// Загрузить значение из JSON-файла
pub fn load_json<T: DeserializeOwned>(path: &Path, compressed: bool) -> Result<T, SaveError> {
    let bytes = read_bytes(path)?;
    decode_json(&bytes, compressed).map_err(|e| e.at(path))
}

/// Путь файла `stem.ext` в директории
pub fn file_path(dir: &Path, stem: &str, ext: &str) -> PathBuf {
    dir.join(format!("{}.{}", stem, ext))
}
