// ============================================
// Game File - Сохранение целиком (директория)
// ============================================
// Структура директории:
//
//   <dir>/
//     MetaData.<meta|zmeta>
//     Camera.json            (всегда без сжатия)
//     Components.zcomp       (всегда сжат)
//     <любое>.png            (необязательно, пишет внешний код)
//     Chunks/<x>_<y>_<z>.<chunk|zchunk>
//
// Загрузка идёт строго по порядку: метаданные -> камера -> чанки ->
// компоненты -> скриншот. Первое отсутствие обязательного файла
// прерывает загрузку, и текущие данные контейнера не меняются.
// Запись не атомарна: сбой посреди записи оставляет директорию
// в смешанном состоянии.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::core::{SaveSettings, METADATA_FILE, CAMERA_FILE, COMPONENTS_FILE};
use crate::world::{CameraState, ComponentGraph, SimulationState};
use super::chunk_file::ChunkFile;
use super::chunks::ChunkCollection;
use super::codec;
use super::error::SaveError;
use super::kind::{CAMERA_KIND, COMPONENTS_KIND, METADATA_KIND, SCREENSHOT_KIND};
use super::metadata::MetaData;
use super::persist::Persistable;
use super::resolver;
use super::screenshot::Screenshot;

/// Всё, что лежит в одном сохранении
#[derive(Debug, Clone, PartialEq)]
pub struct GameData {
    pub metadata: MetaData,
    pub camera: CameraState,
    pub components: ComponentGraph,
    pub chunks: ChunkCollection,
    pub screenshot: Option<Screenshot>,
}

impl GameData {
    /// Записать в директорию
    pub fn save_to_directory(&self, dir: &Path, compressed: bool, parallel: bool) -> Result<(), SaveError> {
        fs::create_dir_all(dir)?;

        let meta_path = codec::file_path(dir, METADATA_FILE, METADATA_KIND.extension(compressed));
        self.metadata.write_file(&meta_path, compressed)?;
        // другой вариант метаданных от прошлого сохранения больше не актуален
        let stale_meta = codec::file_path(dir, METADATA_FILE, METADATA_KIND.extension(!compressed));
        if stale_meta.is_file() {
            fs::remove_file(&stale_meta)?;
        }

        let camera_path = codec::file_path(dir, CAMERA_FILE, CAMERA_KIND.extension(compressed));
        codec::save_json(&self.camera, &camera_path, CAMERA_KIND.effective_compression(compressed))?;

        let components_path = codec::file_path(dir, COMPONENTS_FILE, COMPONENTS_KIND.extension(compressed));
        codec::save_json(&self.components, &components_path, COMPONENTS_KIND.effective_compression(compressed))?;

        self.chunks.save_all(dir, compressed, parallel)?;
        Ok(())
    }

    /// Прочитать из директории. Возвращает новый агрегат целиком или ошибку.
    pub fn read_from_directory(dir: &Path, compressed: bool) -> Result<Self, SaveError> {
        if !dir.is_dir() {
            return Err(SaveError::not_found("save directory", dir));
        }

        // 1. Метаданные
        let meta_candidates = resolver::find_candidates(dir, &METADATA_KIND, compressed)?;
        let meta_path = resolver::pick_named(&meta_candidates, METADATA_FILE)
            .ok_or_else(|| SaveError::not_found(METADATA_KIND.name, dir.join(METADATA_FILE)))?;
        let metadata = MetaData::read_file(&meta_path, METADATA_KIND.variant_of(&meta_path).unwrap_or(compressed))?;

        // 2. Камера
        let camera_candidates = resolver::find_candidates(dir, &CAMERA_KIND, false)?;
        let camera_path = resolver::pick_named(&camera_candidates, CAMERA_FILE)
            .ok_or_else(|| SaveError::not_found(CAMERA_KIND.name, dir.join(format!("{}.{}", CAMERA_FILE, CAMERA_KIND.plain))))?;
        let camera: CameraState = codec::load_json(&camera_path, false)?;

        // 3. Чанки
        let chunks = ChunkCollection::load_all(dir, compressed)?;
        Self::check_chunk_sizes(&metadata, &chunks)?;

        // 4. Компоненты (старые сохранения могут быть без них)
        let components = match find_components(dir)? {
            Some(path) => codec::load_json(&path, true)?,
            None => {
                log::warn!("[SAVE] No components file in {}, starting with an empty graph", dir.display());
                ComponentGraph::new()
            }
        };

        // 5. Скриншот (необязателен, битый файл только логируется)
        let screenshot = match resolver::find_candidates(dir, &SCREENSHOT_KIND, false)?.first() {
            Some(path) => match Screenshot::load(path) {
                Ok(shot) => Some(shot),
                Err(e) => {
                    log::warn!("[SAVE] Skipping screenshot: {}", e);
                    None
                }
            },
            None => None,
        };

        Ok(Self {
            metadata,
            camera,
            components,
            chunks,
            screenshot,
        })
    }

    /// Размер каждого чанка обязан совпадать с метаданными
    fn check_chunk_sizes(metadata: &MetaData, chunks: &ChunkCollection) -> Result<(), SaveError> {
        let (w, h) = (metadata.chunk_width(), metadata.chunk_height());
        match chunks.iter().find(|c| c.width() != w || c.height() != h) {
            Some(bad) => Err(SaveError::Decode {
                path: PathBuf::from(bad.id().file_stem()),
                reason: format!(
                    "chunk {} is {}x{}, metadata says {}x{}",
                    bad.id(), bad.width(), bad.height(), w, h
                ),
            }),
            None => Ok(()),
        }
    }

    /// Восстановить живое состояние симуляции
    pub fn to_simulation_state(&self) -> SimulationState {
        let mut state = SimulationState::new(self.metadata.chunk_width(), self.metadata.chunk_height());
        state.world_origin = self.metadata.world_origin();
        state.world_scale = self.metadata.world_scale();
        state.time_of_day = self.metadata.time_of_day();
        state.camera = self.camera.clone();
        state.components = self.components.clone();

        for chunk in self.chunks.iter() {
            state.insert_chunk(chunk.id(), chunk.to_voxels());
        }
        state
    }
}

fn find_components(dir: &Path) -> Result<Option<PathBuf>, SaveError> {
    let candidates = resolver::find_candidates(dir, &COMPONENTS_KIND, true)?;
    Ok(resolver::pick_named(&candidates, COMPONENTS_FILE))
}

/// Контейнер сохранения: пустой или заполненный
#[derive(Debug, Clone, Default)]
pub struct GameFile {
    data: Option<Arc<GameData>>,
}

impl GameFile {
    /// Пустой контейнер
    pub fn new() -> Self {
        Self { data: None }
    }

    pub fn from_data(data: GameData) -> Self {
        Self { data: Some(Arc::new(data)) }
    }

    /// Снимок живого состояния
    pub fn capture(overworld: &str, state: &SimulationState) -> Result<Self, SaveError> {
        let metadata = MetaData::new(
            overworld,
            state.world_origin,
            state.world_scale,
            state.time_of_day,
            state.chunk_width(),
            state.chunk_height(),
        )?;

        let chunks = state
            .chunks()
            .map(|(id, voxels)| ChunkFile::from_voxels(id, state.chunk_width(), state.chunk_height(), voxels))
            .collect::<Result<ChunkCollection, SaveError>>()?;

        Ok(Self::from_data(GameData {
            metadata,
            camera: state.camera.clone(),
            components: state.components.clone(),
            chunks,
            screenshot: None,
        }))
    }

    /// Открыть сохранение с диска
    pub fn open(dir: &Path, compressed: bool) -> Result<Self, SaveError> {
        let mut file = Self::new();
        file.load(dir, compressed)?;
        Ok(file)
    }

    pub fn data(&self) -> Option<&GameData> {
        self.data.as_deref()
    }

    /// Общая ссылка на данные (для передачи в другой поток)
    pub fn shared(&self) -> Option<Arc<GameData>> {
        self.data.clone()
    }

    pub fn is_populated(&self) -> bool {
        self.data.is_some()
    }

    /// Записать в директорию
    pub fn save(&self, dir: &Path, compressed: bool) -> Result<(), SaveError> {
        self.save_inner(dir, compressed, true)
    }

    /// Записать с настройками (сжатие и параллельность из настроек)
    pub fn save_with(&self, dir: &Path, settings: &SaveSettings) -> Result<(), SaveError> {
        self.save_inner(dir, settings.compressed, settings.parallel_chunk_writes)
    }

    fn save_inner(&self, dir: &Path, compressed: bool, parallel: bool) -> Result<(), SaveError> {
        let data = self.data.as_deref().ok_or(SaveError::EmptyContainer)?;
        data.save_to_directory(dir, compressed, parallel)?;
        log::info!(
            "[SAVE] Saved {} ({} chunks, {} entities, compressed: {})",
            dir.display(), data.chunks.len(), data.components.len(), compressed
        );
        Ok(())
    }

    /// Загрузить из директории. Данные публикуются только при полном успехе.
    pub fn load(&mut self, dir: &Path, compressed: bool) -> Result<(), SaveError> {
        let data = GameData::read_from_directory(dir, compressed)?;
        log::info!(
            "[SAVE] Loaded {} ({} chunks, screenshot: {})",
            dir.display(), data.chunks.len(), data.screenshot.is_some()
        );
        self.data = Some(Arc::new(data));
        Ok(())
    }

    /// Подменить данные данными другого контейнера (без копирования)
    pub fn copy_from(&mut self, other: &GameFile) {
        self.data = other.data.clone();
    }

    /// Загрузить только компоненты
    pub fn load_components(dir: &Path) -> Result<ComponentGraph, SaveError> {
        let path = find_components(dir)?
            .ok_or_else(|| SaveError::not_found(COMPONENTS_KIND.name, dir.join(format!("{}.{}", COMPONENTS_FILE, COMPONENTS_KIND.compressed))))?;
        codec::load_json(&path, true)
    }

    /// Директории сохранений в корне (те, где есть файл метаданных)
    pub fn list_saves(root: &Path) -> Result<Vec<PathBuf>, SaveError> {
        if !root.is_dir() {
            return Ok(Vec::new());
        }

        let mut saves = Vec::new();
        for entry in fs::read_dir(root)? {
            let path = entry?.path();
            if path.is_dir() && !resolver::find_candidates(&path, &METADATA_KIND, false)?.is_empty() {
                saves.push(path);
            }
        }
        saves.sort();
        Ok(saves)
    }
}
