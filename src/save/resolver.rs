// ============================================
// Directory Resolver - Поиск файлов сохранения
// ============================================
// Ищет в директории (без рекурсии) файлы нужного типа.
// Если просили сжатый вариант и он есть - возвращаем только сжатые,
// иначе всё найденное в порядке перечисления.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::error::SaveError;
use super::kind::FileKind;

/// Источник списка файлов (файловая система или фикстура в тестах)
pub trait DirectoryListing {
    fn is_dir(&self, dir: &Path) -> bool;

    /// Файлы непосредственно в директории
    fn files(&self, dir: &Path) -> io::Result<Vec<PathBuf>>;

    /// Поддиректории непосредственно в директории
    fn subdirectories(&self, dir: &Path) -> io::Result<Vec<PathBuf>>;
}

/// Настоящая файловая система
#[derive(Debug, Clone, Copy, Default)]
pub struct FsListing;

impl FsListing {
    fn entries(dir: &Path, want_dirs: bool) -> io::Result<Vec<PathBuf>> {
        let mut out = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() == want_dirs {
                out.push(entry.path());
            }
        }
        Ok(out)
    }
}

impl DirectoryListing for FsListing {
    fn is_dir(&self, dir: &Path) -> bool {
        dir.is_dir()
    }

    fn files(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        Self::entries(dir, false)
    }

    fn subdirectories(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        Self::entries(dir, true)
    }
}

/// Отобрать кандидатов из готового списка файлов
pub fn select_candidates(
    files: impl IntoIterator<Item = PathBuf>,
    kind: &FileKind,
    prefer_compressed: bool,
) -> Vec<PathBuf> {
    let mut compressed = Vec::new();
    let mut all = Vec::new();

    for path in files {
        match kind.variant_of(&path) {
            Some(true) => {
                compressed.push(path.clone());
                all.push(path);
            }
            Some(false) => all.push(path),
            None => {}
        }
    }

    if prefer_compressed && !compressed.is_empty() {
        compressed
    } else {
        all
    }
}

/// Найти файлы типа `kind` в директории через произвольный листинг
pub fn find_candidates_in(
    listing: &impl DirectoryListing,
    dir: &Path,
    kind: &FileKind,
    prefer_compressed: bool,
) -> Result<Vec<PathBuf>, SaveError> {
    if !listing.is_dir(dir) {
        return Err(SaveError::not_found("directory", dir));
    }
    let files = listing.files(dir)?;
    Ok(select_candidates(files, kind, prefer_compressed))
}

/// Найти файлы типа `kind` в директории на диске
pub fn find_candidates(
    dir: &Path,
    kind: &FileKind,
    prefer_compressed: bool,
) -> Result<Vec<PathBuf>, SaveError> {
    find_candidates_in(&FsListing, dir, kind, prefer_compressed)
}

/// Найти поддиректорию по имени (None если нет)
pub fn find_subdirectory_in(
    listing: &impl DirectoryListing,
    dir: &Path,
    name: &str,
) -> Result<Option<PathBuf>, SaveError> {
    if !listing.is_dir(dir) {
        return Err(SaveError::not_found("directory", dir));
    }
    let found = listing
        .subdirectories(dir)?
        .into_iter()
        .find(|sub| sub.file_name().is_some_and(|n| n == name));
    Ok(found)
}

pub fn find_subdirectory(dir: &Path, name: &str) -> Result<Option<PathBuf>, SaveError> {
    find_subdirectory_in(&FsListing, dir, name)
}

/// Из кандидатов выбрать файл с нужным именем, иначе первый
pub fn pick_named(candidates: &[PathBuf], stem: &str) -> Option<PathBuf> {
    candidates
        .iter()
        .find(|p| p.file_stem().is_some_and(|s| s == stem))
        .or_else(|| candidates.first())
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use crate::save::kind::{CAMERA_KIND, CHUNK_KIND, METADATA_KIND};

    /// Файловая система в памяти: директория -> (файлы, поддиректории)
    #[derive(Default)]
    struct MemoryListing {
        dirs: HashMap<PathBuf, (Vec<PathBuf>, Vec<PathBuf>)>,
    }

    impl MemoryListing {
        fn with_files(mut self, dir: &str, names: &[&str]) -> Self {
            let dir = PathBuf::from(dir);
            let entry = self.dirs.entry(dir.clone()).or_default();
            entry.0.extend(names.iter().map(|n| dir.join(n)));
            self
        }

        fn with_subdir(mut self, dir: &str, name: &str) -> Self {
            let parent = PathBuf::from(dir);
            let child = parent.join(name);
            self.dirs.entry(parent).or_default().1.push(child.clone());
            self.dirs.entry(child).or_default();
            self
        }
    }

    impl DirectoryListing for MemoryListing {
        fn is_dir(&self, dir: &Path) -> bool {
            self.dirs.contains_key(dir)
        }

        fn files(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
            Ok(self.dirs.get(dir).map(|d| d.0.clone()).unwrap_or_default())
        }

        fn subdirectories(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
            Ok(self.dirs.get(dir).map(|d| d.1.clone()).unwrap_or_default())
        }
    }

    #[test]
    fn test_prefers_compressed_metadata() {
        let fs = MemoryListing::default().with_files("/save", &["MetaData.meta", "MetaData.zmeta", "Camera.json"]);

        let found = find_candidates_in(&fs, Path::new("/save"), &METADATA_KIND, true).unwrap();
        assert_eq!(found, vec![PathBuf::from("/save/MetaData.zmeta")]);
    }

    #[test]
    fn test_no_preference_returns_both_variants() {
        let fs = MemoryListing::default().with_files("/save", &["MetaData.meta", "MetaData.zmeta"]);

        let found = find_candidates_in(&fs, Path::new("/save"), &METADATA_KIND, false).unwrap();
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn test_falls_back_to_plain_when_no_compressed() {
        let fs = MemoryListing::default().with_files("/save/Chunks", &["0_0_0.chunk", "1_0_0.chunk", "notes.txt"]);

        let found = find_candidates_in(&fs, Path::new("/save/Chunks"), &CHUNK_KIND, true).unwrap();
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|p| p.extension().unwrap() == "chunk"));
    }

    #[test]
    fn test_empty_result_is_ok() {
        let fs = MemoryListing::default().with_files("/save", &["MetaData.zmeta"]);
        let found = find_candidates_in(&fs, Path::new("/save"), &CAMERA_KIND, false).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_missing_directory_is_not_found() {
        let fs = MemoryListing::default();
        let err = find_candidates_in(&fs, Path::new("/nowhere"), &METADATA_KIND, true).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_find_subdirectory() {
        let fs = MemoryListing::default()
            .with_files("/save", &["Chunks.txt"])
            .with_subdir("/save", "Chunks");

        let found = find_subdirectory_in(&fs, Path::new("/save"), "Chunks").unwrap();
        assert_eq!(found, Some(PathBuf::from("/save/Chunks")));
        assert_eq!(find_subdirectory_in(&fs, Path::new("/save"), "Other").unwrap(), None);
    }

    #[test]
    fn test_pick_named_prefers_exact_stem() {
        let candidates = vec![PathBuf::from("/s/notes.json"), PathBuf::from("/s/Camera.json")];
        assert_eq!(pick_named(&candidates, "Camera"), Some(PathBuf::from("/s/Camera.json")));
        assert_eq!(pick_named(&candidates, "Other"), Some(PathBuf::from("/s/notes.json")));
        assert_eq!(pick_named(&[], "Camera"), None);
    }
}
