// ============================================
// Chunk ID - Координаты чанка в мире
// ============================================

use std::fmt;

use serde::{Serialize, Deserialize};

/// Координата чанка (в чанках, не в блоках)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkId {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl ChunkId {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Чанк, содержащий блок (x, y, z).
    /// Размеры больше i32::MAX упираются в i32::MAX.
    pub fn containing(x: i32, y: i32, z: i32, chunk_width: u32, chunk_height: u32) -> Self {
        let w = i32::try_from(chunk_width.max(1)).unwrap_or(i32::MAX);
        let h = i32::try_from(chunk_height.max(1)).unwrap_or(i32::MAX);
        Self {
            x: x.div_euclid(w),
            y: y.div_euclid(h),
            z: z.div_euclid(w),
        }
    }

    /// Имя файла без расширения: "{x}_{y}_{z}"
    pub fn file_stem(&self) -> String {
        format!("{}_{}_{}", self.x, self.y, self.z)
    }

    /// Разобрать имя файла обратно в координаты.
    /// Используется только для сверки с содержимым файла.
    pub fn parse_stem(stem: &str) -> Option<Self> {
        let mut parts = stem.split('_');
        let x = parts.next()?.parse().ok()?;
        let y = parts.next()?.parse().ok()?;
        let z = parts.next()?.parse().ok()?;
        if parts.next().is_some() {
            return None;
        }
        Some(Self { x, y, z })
    }
}

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}
