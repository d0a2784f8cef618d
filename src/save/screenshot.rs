// ============================================
// Screenshot - Превью сохранения
// ============================================
// Ядро только читает PNG; пишет его внешний код (рендер или CLI)

use std::path::{Path, PathBuf};

use image::RgbaImage;

use super::error::SaveError;

/// Картинка превью в RGBA8
#[derive(Debug, Clone, PartialEq)]
pub struct Screenshot {
    /// Откуда загружено (пусто для созданных в памяти)
    pub source: PathBuf,
    pub width: u32,
    pub height: u32,
    /// RGBA данные (width * height * 4)
    pub rgba: Vec<u8>,
}

impl Screenshot {
    /// Создать из сырых RGBA данных
    pub fn from_rgba(width: u32, height: u32, rgba: Vec<u8>) -> Option<Self> {
        if rgba.len() != (width as usize) * (height as usize) * 4 {
            return None;
        }
        Some(Self {
            source: PathBuf::new(),
            width,
            height,
            rgba,
        })
    }

    /// Загрузить PNG
    pub fn load(path: &Path) -> Result<Self, SaveError> {
        let image = image::open(path).map_err(|e| SaveError::Image {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let rgba = image.to_rgba8();

        Ok(Self {
            source: path.to_path_buf(),
            width: rgba.width(),
            height: rgba.height(),
            rgba: rgba.into_raw(),
        })
    }

    /// Записать PNG
    pub fn save_png(&self, path: &Path) -> Result<(), SaveError> {
        let image_error = |reason: String| SaveError::Image {
            path: path.to_path_buf(),
            reason,
        };
        let buffer = RgbaImage::from_raw(self.width, self.height, self.rgba.clone())
            .ok_or_else(|| image_error("buffer size does not match dimensions".into()))?;
        buffer.save(path).map_err(|e| image_error(e.to_string()))
    }
}
