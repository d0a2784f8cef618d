// ============================================
// Save Error - Ошибки сохранения/загрузки
// ============================================

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::world::ChunkId;

/// Ошибки сохранения/загрузки
#[derive(Debug, Error)]
pub enum SaveError {
    /// Обязательный файл или директория отсутствует
    #[error("{what} not found at {}", path.display())]
    NotFound { what: &'static str, path: PathBuf },

    /// Файл есть, но разобрать его не удалось
    #[error("failed to decode {}: {reason}", path.display())]
    Decode { path: PathBuf, reason: String },

    /// Не удалось сериализовать значение
    #[error("failed to encode {what}: {reason}")]
    Encode { what: &'static str, reason: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Метаданные с недопустимыми значениями
    #[error("invalid metadata: {0}")]
    InvalidMetaData(String),

    /// Два файла в Chunks/ описывают один и тот же чанк
    #[error("chunk {id} stored twice: {} and {}", first.display(), second.display())]
    DuplicateChunk { id: ChunkId, first: PathBuf, second: PathBuf },

    /// Координата в имени файла не совпадает с координатой внутри
    #[error("chunk file {} contains chunk {found}, expected {expected}", path.display())]
    ChunkIdMismatch { path: PathBuf, expected: ChunkId, found: ChunkId },

    /// Сохранять нечего: контейнер ещё не заполнен
    #[error("game file is empty")]
    EmptyContainer,

    #[error("failed to load image {}: {reason}", path.display())]
    Image { path: PathBuf, reason: String },
}

impl SaveError {
    pub(crate) fn decode(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        SaveError::Decode {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Привязать ошибку разбора к файлу, из которого читали байты
    pub(crate) fn at(self, file: &Path) -> Self {
        match self {
            SaveError::Decode { reason, .. } => SaveError::Decode {
                path: file.to_path_buf(),
                reason,
            },
            other => other,
        }
    }

    pub(crate) fn not_found(what: &'static str, path: impl Into<PathBuf>) -> Self {
        SaveError::NotFound { what, path: path.into() }
    }

    /// Ошибка отсутствия обязательного файла
    pub fn is_not_found(&self) -> bool {
        matches!(self, SaveError::NotFound { .. })
    }

    /// Ошибка содержимого файла (повреждён, обрезан, несовместим)
    pub fn is_decode(&self) -> bool {
        matches!(
            self,
            SaveError::Decode { .. }
                | SaveError::DuplicateChunk { .. }
                | SaveError::ChunkIdMismatch { .. }
                | SaveError::Image { .. }
        )
    }
}
