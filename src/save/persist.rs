// ============================================
// Persistable - Общий интерфейс под-документов
// ============================================

use std::path::Path;

use super::codec;
use super::error::SaveError;

/// Под-документ, который умеет кодироваться в байты и обратно
pub trait Persistable: Sized {
    fn encode(&self, compressed: bool) -> Result<Vec<u8>, SaveError>;

    fn decode(bytes: &[u8], compressed: bool) -> Result<Self, SaveError>;

    /// Полная замена полей значениями из `other`
    fn copy_from(&mut self, other: &Self);

    /// Записать в файл
    fn write_file(&self, path: &Path, compressed: bool) -> Result<(), SaveError> {
        let bytes = self.encode(compressed)?;
        codec::write_bytes(path, &bytes)
    }

    /// Прочитать из файла
    fn read_file(path: &Path, compressed: bool) -> Result<Self, SaveError> {
        let bytes = codec::read_bytes(path)?;
        Self::decode(&bytes, compressed).map_err(|e| e.at(path))
    }

    /// Прочитать из файла поверх существующего значения.
    /// При ошибке значение не меняется.
    fn read_into(&mut self, path: &Path, compressed: bool) -> Result<(), SaveError> {
        let file = Self::read_file(path, compressed)?;
        self.copy_from(&file);
        Ok(())
    }
}
