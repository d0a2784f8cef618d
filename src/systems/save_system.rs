// ============================================
// Save System - Сохранение и загрузка мира
// ============================================
// Сохранение/загрузка блокируют поток, поэтому игра вызывает их
// из фонового потока, а готовый результат подменяет через copy_from.
// Параллельные сохранения в одну директорию - ответственность вызывающего.

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread::{self, JoinHandle};

use crate::core::{SaveSettings, DEFAULT_CHUNK_WIDTH, DEFAULT_CHUNK_HEIGHT};
use crate::save::{GameFile, SaveError};
use crate::world::SimulationState;

/// Уровень земли для нового мира
const NEW_WORLD_GROUND: i32 = 60;
/// Радиус нового мира в чанках
const NEW_WORLD_RADIUS: i32 = 1;

/// Загрузка, идущая в фоновом потоке
pub struct BackgroundLoad {
    receiver: Receiver<Result<GameFile, SaveError>>,
    handle: Option<JoinHandle<()>>,
}

impl BackgroundLoad {
    /// Проверить без блокировки. None пока загрузка идёт.
    pub fn poll(&mut self) -> Option<Result<GameFile, SaveError>> {
        match self.receiver.try_recv() {
            Ok(result) => {
                self.join();
                Some(result)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.join();
                Some(Err(loader_died()))
            }
        }
    }

    /// Дождаться результата
    pub fn wait(mut self) -> Result<GameFile, SaveError> {
        let result = self.receiver.recv().unwrap_or_else(|_| Err(loader_died()));
        self.join();
        result
    }

    fn join(&mut self) {
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("[SAVE] Loader thread panicked");
            }
        }
    }
}

fn loader_died() -> SaveError {
    SaveError::Io(std::io::Error::other("save loader thread exited without a result"))
}

/// Система сохранения/загрузки
pub struct SaveSystem {
    settings: SaveSettings,
    /// Версия состояния на момент последнего сохранения
    last_saved_version: Option<u64>,
}

impl SaveSystem {
    pub fn new(settings: SaveSettings) -> Self {
        Self {
            settings,
            last_saved_version: None,
        }
    }

    pub fn settings(&self) -> &SaveSettings {
        &self.settings
    }

    /// Загрузить мир из сохранения или создать новый
    pub fn load_or_create(&mut self, name: &str) -> SimulationState {
        let path = self.settings.save_path(name);

        match GameFile::open(&path, self.settings.compressed) {
            Ok(file) => {
                if let Some(data) = file.data() {
                    let state = data.to_simulation_state();
                    log::info!(
                        "[SAVE] Loaded world '{}' from {} (overworld: {}, chunks: {}, entities: {})",
                        name, path.display(), data.metadata.overworld_file(),
                        state.chunk_count(), state.components.len()
                    );
                    self.last_saved_version = Some(state.version());
                    return state;
                }
            }
            Err(e) if e.is_not_found() => {
                log::info!("[SAVE] No save at {} ({}), creating a new world", path.display(), e);
            }
            Err(e) => {
                log::warn!("[SAVE] Failed to load {}: {}, creating a new world", path.display(), e);
            }
        }

        self.last_saved_version = None;
        SimulationState::flat(DEFAULT_CHUNK_WIDTH, DEFAULT_CHUNK_HEIGHT, NEW_WORLD_RADIUS, NEW_WORLD_GROUND)
    }

    /// Сохранить мир. Ok(false) если с прошлого сохранения ничего не менялось.
    pub fn save_world(&mut self, name: &str, overworld: &str, state: &SimulationState) -> Result<bool, SaveError> {
        if self.last_saved_version == Some(state.version()) {
            log::debug!("[SAVE] World '{}' unchanged since last save, skipping", name);
            return Ok(false);
        }

        let file = GameFile::capture(overworld, state)?;
        file.save_with(&self.settings.save_path(name), &self.settings)?;
        self.last_saved_version = Some(state.version());
        Ok(true)
    }

    /// Запустить загрузку в фоновом потоке
    pub fn load_in_background(&self, name: &str) -> Result<BackgroundLoad, SaveError> {
        let path = self.settings.save_path(name);
        let compressed = self.settings.compressed;
        let (sender, receiver) = mpsc::channel();

        let handle = thread::Builder::new()
            .name("save-loader".into())
            .spawn(move || {
                // получатель мог уже уйти, тогда результат просто не нужен
                let _ = sender.send(GameFile::open(&path, compressed));
            })?;

        Ok(BackgroundLoad {
            receiver,
            handle: Some(handle),
        })
    }

    /// Записать готовый снимок в фоновом потоке
    pub fn save_in_background(&self, name: &str, file: GameFile) -> Result<JoinHandle<Result<(), SaveError>>, SaveError> {
        let path = self.settings.save_path(name);
        let settings = self.settings.clone();

        let handle = thread::Builder::new()
            .name("save-writer".into())
            .spawn(move || file.save_with(&path, &settings))?;
        Ok(handle)
    }
}
