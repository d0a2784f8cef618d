// ============================================
// Chunk Collection - Все чанки сохранения
// ============================================
// Каждый чанк - отдельный файл в <save>/Chunks/ с именем "{x}_{y}_{z}.{ext}".
// Запись идёт параллельно (каждый чанк в свой файл),
// загрузка либо читает все чанки, либо падает целиком.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::core::CHUNKS_DIR;
use crate::world::ChunkId;
use super::chunk_file::ChunkFile;
use super::codec;
use super::error::SaveError;
use super::kind::CHUNK_KIND;
use super::persist::Persistable;
use super::resolver;

/// Набор чанков, ключ - координата чанка
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChunkCollection {
    chunks: BTreeMap<ChunkId, ChunkFile>,
}

impl ChunkCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Добавить чанк. Чанк с тем же ID заменяется (последняя запись побеждает),
    /// прежний возвращается.
    pub fn insert(&mut self, chunk: ChunkFile) -> Option<ChunkFile> {
        self.chunks.insert(chunk.id(), chunk)
    }

    pub fn get(&self, id: ChunkId) -> Option<&ChunkFile> {
        self.chunks.get(&id)
    }

    pub fn remove(&mut self, id: ChunkId) -> Option<ChunkFile> {
        self.chunks.remove(&id)
    }

    pub fn contains(&self, id: ChunkId) -> bool {
        self.chunks.contains_key(&id)
    }

    pub fn ids(&self) -> impl Iterator<Item = ChunkId> + '_ {
        self.chunks.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChunkFile> {
        self.chunks.values()
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Путь файла чанка
    pub fn chunk_path(chunk_dir: &Path, id: ChunkId, compressed: bool) -> PathBuf {
        codec::file_path(chunk_dir, &id.file_stem(), CHUNK_KIND.extension(compressed))
    }

    /// Записать все чанки в <base>/Chunks
    pub fn save_all(&self, base: &Path, compressed: bool, parallel: bool) -> Result<(), SaveError> {
        let chunk_dir = base.join(CHUNKS_DIR);
        fs::create_dir_all(&chunk_dir)?;

        let removed = self.remove_stale(&chunk_dir, compressed)?;
        if removed > 0 {
            log::debug!("[SAVE] Removed {} stale chunk files from {}", removed, chunk_dir.display());
        }

        let write = |chunk: &ChunkFile| {
            chunk.write_file(&Self::chunk_path(&chunk_dir, chunk.id(), compressed), compressed)
        };

        if parallel {
            self.chunks.par_iter().try_for_each(|(_, chunk)| write(chunk))?;
        } else {
            self.chunks.values().try_for_each(write)?;
        }

        log::debug!("[SAVE] Wrote {} chunks to {}", self.chunks.len(), chunk_dir.display());
        Ok(())
    }

    /// Удалить файлы чанков, которые не будут перезаписаны этим сохранением
    /// (чанки, которых больше нет, и другой вариант сжатия)
    fn remove_stale(&self, chunk_dir: &Path, compressed: bool) -> Result<usize, SaveError> {
        let mut removed = 0;
        for path in resolver::find_candidates(chunk_dir, &CHUNK_KIND, false)? {
            let keep = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(ChunkId::parse_stem)
                .is_some_and(|id| {
                    self.chunks.contains_key(&id) && path == Self::chunk_path(chunk_dir, id, compressed)
                });

            if !keep {
                fs::remove_file(&path)?;
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Загрузить все чанки из <base>/Chunks
    pub fn load_all(base: &Path, compressed: bool) -> Result<Self, SaveError> {
        let chunk_dir = resolver::find_subdirectory(base, CHUNKS_DIR)?
            .ok_or_else(|| SaveError::not_found("chunk directory", base.join(CHUNKS_DIR)))?;

        let files = resolver::find_candidates(&chunk_dir, &CHUNK_KIND, compressed)?;

        // каждый файл читается своим вариантом (по расширению)
        let decoded: Vec<(PathBuf, ChunkFile)> = files
            .into_par_iter()
            .map(|path| -> Result<(PathBuf, ChunkFile), SaveError> {
                let is_compressed = CHUNK_KIND.variant_of(&path).unwrap_or(compressed);
                let chunk = ChunkFile::read_file(&path, is_compressed)?;
                Self::check_file_name(&path, &chunk)?;
                Ok((path, chunk))
            })
            .collect::<Result<_, SaveError>>()?;

        let mut collection = Self::new();
        let mut origins: HashMap<ChunkId, PathBuf> = HashMap::new();

        for (path, chunk) in decoded {
            let id = chunk.id();
            if let Some(first) = origins.insert(id, path.clone()) {
                return Err(SaveError::DuplicateChunk { id, first, second: path });
            }
            collection.chunks.insert(id, chunk);
        }

        log::debug!("[SAVE] Loaded {} chunks from {}", collection.len(), chunk_dir.display());
        Ok(collection)
    }

    /// ID берётся из содержимого файла. Если имя файла тоже похоже
    /// на координату, оно обязано совпадать.
    fn check_file_name(path: &Path, chunk: &ChunkFile) -> Result<(), SaveError> {
        let named = path.file_stem().and_then(|s| s.to_str()).and_then(ChunkId::parse_stem);
        match named {
            Some(expected) if expected != chunk.id() => Err(SaveError::ChunkIdMismatch {
                path: path.to_path_buf(),
                expected,
                found: chunk.id(),
            }),
            Some(_) => Ok(()),
            None => {
                log::warn!(
                    "[SAVE] Chunk file {} has no coordinate name, using embedded id {}",
                    path.display(), chunk.id()
                );
                Ok(())
            }
        }
    }
}

impl FromIterator<ChunkFile> for ChunkCollection {
    fn from_iter<I: IntoIterator<Item = ChunkFile>>(iter: I) -> Self {
        let mut collection = Self::new();
        collection.extend(iter);
        collection
    }
}

impl Extend<ChunkFile> for ChunkCollection {
    fn extend<I: IntoIterator<Item = ChunkFile>>(&mut self, iter: I) {
        for chunk in iter {
            self.insert(chunk);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{AIR, STONE};

    fn chunk(x: i32, y: i32, z: i32, fill: u8) -> ChunkFile {
        let mut voxels = vec![AIR; 4 * 4 * 16];
        voxels[0] = fill;
        ChunkFile::from_voxels(ChunkId::new(x, y, z), 4, 16, &voxels).unwrap()
    }

    fn file_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_same_id_last_write_wins() {
        let mut chunks = ChunkCollection::new();
        assert!(chunks.insert(chunk(0, 0, 0, STONE)).is_none());
        let previous = chunks.insert(chunk(0, 0, 0, 7)).unwrap();

        assert_eq!(previous.to_voxels()[0], STONE);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks.get(ChunkId::new(0, 0, 0)).unwrap().to_voxels()[0], 7);
    }

    #[test]
    fn test_save_names_files_by_coordinate() {
        let dir = tempfile::tempdir().unwrap();
        let chunks: ChunkCollection = vec![chunk(0, 0, 0, STONE), chunk(-1, 2, 3, STONE)].into_iter().collect();

        chunks.save_all(dir.path(), true, true).unwrap();
        assert_eq!(file_names(&dir.path().join("Chunks")), vec!["-1_2_3.zchunk", "0_0_0.zchunk"]);

        let loaded = ChunkCollection::load_all(dir.path(), true).unwrap();
        assert_eq!(loaded, chunks);
    }

    #[test]
    fn test_missing_chunk_dir_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = ChunkCollection::load_all(dir.path(), false).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_empty_chunk_dir_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("Chunks")).unwrap();
        assert!(ChunkCollection::load_all(dir.path(), true).unwrap().is_empty());
    }

    #[test]
    fn test_both_variants_of_one_chunk_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let chunk_dir = dir.path().join("Chunks");
        fs::create_dir(&chunk_dir).unwrap();

        let c = chunk(1, 0, 0, STONE);
        c.write_file(&chunk_dir.join("1_0_0.chunk"), false).unwrap();
        c.write_file(&chunk_dir.join("1_0_0.zchunk"), true).unwrap();

        // без предпочтения видны оба файла
        let err = ChunkCollection::load_all(dir.path(), false).unwrap_err();
        assert!(matches!(err, SaveError::DuplicateChunk { id, .. } if id == ChunkId::new(1, 0, 0)));

        // с предпочтением сжатого берётся только zchunk
        assert_eq!(ChunkCollection::load_all(dir.path(), true).unwrap().len(), 1);
    }

    #[test]
    fn test_renamed_chunk_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let chunk_dir = dir.path().join("Chunks");
        fs::create_dir(&chunk_dir).unwrap();
        chunk(5, 0, 5, STONE).write_file(&chunk_dir.join("0_0_0.chunk"), false).unwrap();

        let err = ChunkCollection::load_all(dir.path(), false).unwrap_err();
        assert!(matches!(err, SaveError::ChunkIdMismatch { .. }));
    }

    #[test]
    fn test_corrupt_chunk_fails_whole_load() {
        let dir = tempfile::tempdir().unwrap();
        let chunks: ChunkCollection = vec![chunk(0, 0, 0, STONE), chunk(1, 0, 0, STONE)].into_iter().collect();
        chunks.save_all(dir.path(), false, false).unwrap();
        fs::write(dir.path().join("Chunks").join("1_0_0.chunk"), b"garbage").unwrap();

        let err = ChunkCollection::load_all(dir.path(), false).unwrap_err();
        assert!(err.is_decode());
    }

    #[test]
    fn test_resave_removes_stale_files() {
        let dir = tempfile::tempdir().unwrap();
        let before: ChunkCollection = vec![chunk(0, 0, 0, STONE), chunk(9, 9, 9, STONE)].into_iter().collect();
        before.save_all(dir.path(), true, true).unwrap();

        let after: ChunkCollection = vec![chunk(0, 0, 0, 7)].into_iter().collect();
        after.save_all(dir.path(), false, true).unwrap();

        assert_eq!(file_names(&dir.path().join("Chunks")), vec!["0_0_0.chunk"]);
        assert_eq!(ChunkCollection::load_all(dir.path(), false).unwrap(), after);
    }
}
