// ============================================
// File Kind - Пары расширений для типов файлов
// ============================================
// Каждый сохраняемый тип объявляет обычное и сжатое расширение.
// Дескриптор явно передаётся в резолвер директорий.

use std::path::Path;

/// Как выбирается вариант кодирования файла
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Вариант выбирается флагом compressed
    Selectable,
    /// Всегда без сжатия (Camera.json)
    AlwaysPlain,
    /// Всегда сжат (Components.zcomp)
    AlwaysCompressed,
}

/// Дескриптор типа файла
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileKind {
    /// Имя для логов и ошибок
    pub name: &'static str,
    pub plain: &'static str,
    pub compressed: &'static str,
    pub encoding: Encoding,
}

impl FileKind {
    pub const fn new(name: &'static str, plain: &'static str, compressed: &'static str) -> Self {
        Self { name, plain, compressed, encoding: Encoding::Selectable }
    }

    /// Тип с единственным расширением и фиксированным кодированием
    pub const fn fixed(name: &'static str, ext: &'static str, compressed: bool) -> Self {
        Self {
            name,
            plain: ext,
            compressed: ext,
            encoding: if compressed { Encoding::AlwaysCompressed } else { Encoding::AlwaysPlain },
        }
    }

    /// Расширение для записи
    pub fn extension(&self, compressed: bool) -> &'static str {
        match self.encoding {
            Encoding::Selectable if compressed => self.compressed,
            Encoding::Selectable => self.plain,
            Encoding::AlwaysPlain => self.plain,
            Encoding::AlwaysCompressed => self.compressed,
        }
    }

    /// Действующий флаг сжатия при записи
    pub fn effective_compression(&self, requested: bool) -> bool {
        match self.encoding {
            Encoding::Selectable => requested,
            Encoding::AlwaysPlain => false,
            Encoding::AlwaysCompressed => true,
        }
    }

    /// Вариант файла по его расширению: Some(true) сжатый,
    /// Some(false) обычный, None если файл не этого типа
    pub fn variant_of(&self, path: &Path) -> Option<bool> {
        let ext = path.extension()?.to_str()?;
        let is_compressed = ext.eq_ignore_ascii_case(self.compressed);
        let is_plain = ext.eq_ignore_ascii_case(self.plain);

        match self.encoding {
            Encoding::Selectable if is_compressed => Some(true),
            Encoding::Selectable if is_plain => Some(false),
            Encoding::AlwaysPlain if is_plain => Some(false),
            Encoding::AlwaysCompressed if is_compressed => Some(true),
            _ => None,
        }
    }
}

/// Метаданные мира
pub const METADATA_KIND: FileKind = FileKind::new("metadata", "meta", "zmeta");
/// Файл чанка
pub const CHUNK_KIND: FileKind = FileKind::new("chunk", "chunk", "zchunk");
/// Камера, всегда JSON без сжатия
pub const CAMERA_KIND: FileKind = FileKind::fixed("camera", "json", false);
/// Компоненты, всегда сжаты
pub const COMPONENTS_KIND: FileKind = FileKind::fixed("components", "zcomp", true);
/// Скриншот превью
pub const SCREENSHOT_KIND: FileKind = FileKind::fixed("screenshot", "png", false);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_of_selectable() {
        assert_eq!(METADATA_KIND.variant_of(Path::new("MetaData.zmeta")), Some(true));
        assert_eq!(METADATA_KIND.variant_of(Path::new("MetaData.META")), Some(false));
        assert_eq!(METADATA_KIND.variant_of(Path::new("MetaData.json")), None);
        assert_eq!(METADATA_KIND.variant_of(Path::new("MetaData")), None);
    }

    #[test]
    fn test_fixed_kinds_ignore_flag() {
        assert_eq!(CAMERA_KIND.extension(true), "json");
        assert!(!CAMERA_KIND.effective_compression(true));
        assert_eq!(COMPONENTS_KIND.extension(false), "zcomp");
        assert!(COMPONENTS_KIND.effective_compression(false));
        assert_eq!(COMPONENTS_KIND.variant_of(Path::new("Components.zcomp")), Some(true));
    }
}
