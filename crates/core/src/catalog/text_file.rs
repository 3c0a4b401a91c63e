//! Flat text file catalog store.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::{Book, CatalogError, CatalogStore, LoadReport};

/// Catalog store backed by a text file, one encoded book per line.
///
/// Saves go to a temporary file in the same directory which is then renamed
/// over the target, so a failed save leaves the previous file intact. A
/// symlinked catalog is written through to the file it points at, and an
/// existing file keeps its permissions.
#[derive(Debug, Clone)]
pub struct TextFileStore {
    path: PathBuf,
}

impl TextFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load_error(&self, source: std::io::Error) -> CatalogError {
        CatalogError::Load {
            path: self.path.clone(),
            source,
        }
    }

    fn save_error(&self, source: std::io::Error) -> CatalogError {
        CatalogError::Save {
            path: self.path.clone(),
            source,
        }
    }

    /// File the rename lands on: the symlink target when the catalog path is
    /// a link, otherwise the path itself.
    fn save_target(&self) -> PathBuf {
        fs::canonicalize(&self.path).unwrap_or_else(|_| self.path.clone())
    }
}

/// Directory the temporary file is created in.
fn staging_dir(target: &Path) -> &Path {
    match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

impl CatalogStore for TextFileStore {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn load_into(&self, books: &mut Vec<Book>) -> Result<LoadReport, CatalogError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("Catalog file {:?} not found, starting empty", self.path);
                return Ok(LoadReport {
                    file_missing: true,
                    ..LoadReport::default()
                });
            }
            Err(e) => return Err(self.load_error(e)),
        };

        let mut report = LoadReport::default();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| self.load_error(e))?;
            match Book::from_line(&line) {
                Some(book) => {
                    books.push(book);
                    report.loaded += 1;
                }
                None => {
                    tracing::debug!("Skipping malformed catalog line {}", index + 1);
                    report.skipped += 1;
                }
            }
        }

        Ok(report)
    }

    fn save(&self, books: &[Book]) -> Result<(), CatalogError> {
        let target = self.save_target();
        let staged = NamedTempFile::new_in(staging_dir(&target)).map_err(|e| self.save_error(e))?;

        let mut writer = BufWriter::new(staged);
        for book in books {
            writeln!(writer, "{}", book.to_line()).map_err(|e| self.save_error(e))?;
        }
        let staged = writer
            .into_inner()
            .map_err(|e| self.save_error(e.into_error()))?;
        // Temp files are created owner-only.
        if let Ok(metadata) = fs::metadata(&target) {
            staged
                .as_file()
                .set_permissions(metadata.permissions())
                .map_err(|e| self.save_error(e))?;
        }
        staged
            .as_file()
            .sync_all()
            .map_err(|e| self.save_error(e))?;

        staged
            .persist(&target)
            .map_err(|e| self.save_error(e.error))?;

        tracing::debug!("Wrote {} books to {:?}", books.len(), self.path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::BookStatus;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = TextFileStore::new(temp_dir.path().join("books.txt"));

        let mut books = Vec::new();
        let report = store.load_into(&mut books).unwrap();

        assert!(books.is_empty());
        assert!(report.file_missing);
        assert_eq!(report.loaded, 0);
    }

    #[test]
    fn test_save_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let store = TextFileStore::new(temp_dir.path().join("books.txt"));
        let books = vec![
            Book::new("Dune", "Herbert", "111"),
            Book::with_status("Emma", "Austen", "222", BookStatus::Issued),
        ];

        store.save(&books).unwrap();

        let mut loaded = Vec::new();
        let report = store.load_into(&mut loaded).unwrap();
        assert_eq!(loaded, books);
        assert_eq!(report.loaded, 2);
        assert!(!report.file_missing);
    }

    #[test]
    fn test_save_file_format() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("books.txt");
        let store = TextFileStore::new(&path);

        store
            .save(&[
                Book::new("Dune", "Herbert", "111"),
                Book::with_status("Emma", "Austen", "222", BookStatus::Issued),
            ])
            .unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents,
            "Dune|Herbert|111|available\nEmma|Austen|222|issued\n"
        );
    }

    #[test]
    fn test_save_overwrites_previous_contents() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("books.txt");
        std::fs::write(&path, "Old|Entry|1|available\nOther|Entry|2|issued\n").unwrap();
        let store = TextFileStore::new(&path);

        store.save(&[Book::new("Dune", "Herbert", "111")]).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "Dune|Herbert|111|available\n");
    }

    #[test]
    fn test_save_empty_catalog_writes_empty_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("books.txt");
        let store = TextFileStore::new(&path);

        store.save(&[]).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_load_skips_malformed_lines() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("books.txt");
        std::fs::write(
            &path,
            "Dune|Herbert|111|available\n\
             garbage\n\
             \n\
             Too|Many|Fields|Here|issued\n\
             Emma|Austen|222|issued\n",
        )
        .unwrap();
        let store = TextFileStore::new(&path);

        let mut books = Vec::new();
        let report = store.load_into(&mut books).unwrap();

        assert_eq!(report.loaded, 2);
        assert_eq!(report.skipped, 3);
        assert_eq!(books[0].title, "Dune");
        assert_eq!(books[1].title, "Emma");
        assert_eq!(books[1].status, BookStatus::Issued);
    }

    #[test]
    fn test_load_io_error_keeps_partial_records() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("books.txt");
        let mut contents = b"Dune|Herbert|111|available\n".to_vec();
        contents.extend_from_slice(&[0xff, 0xfe, b'\n']);
        contents.extend_from_slice(b"Emma|Austen|222|issued\n");
        std::fs::write(&path, contents).unwrap();
        let store = TextFileStore::new(&path);

        let mut books = Vec::new();
        let result = store.load_into(&mut books);

        assert!(matches!(result, Err(CatalogError::Load { .. })));
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].isbn, "111");
    }

    #[test]
    fn test_load_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let store = TextFileStore::new(temp_dir.path());

        let mut books = Vec::new();
        let result = store.load_into(&mut books);

        assert!(matches!(result, Err(CatalogError::Load { .. })));
        assert!(books.is_empty());
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("no-such-dir").join("books.txt");
        let store = TextFileStore::new(&path);

        let result = store.save(&[Book::new("Dune", "Herbert", "111")]);

        assert!(matches!(result, Err(CatalogError::Save { .. })));
        assert!(!path.exists());
    }

    #[test]
    fn test_failed_save_keeps_previous_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("books.txt");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("marker"), "x").unwrap();
        let store = TextFileStore::new(&path);

        // Renaming a file over a non-empty directory fails.
        let result = store.save(&[Book::new("Dune", "Herbert", "111")]);

        assert!(matches!(result, Err(CatalogError::Save { .. })));
        assert!(path.join("marker").exists());
        let leftovers: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path() != path)
            .collect();
        assert!(leftovers.is_empty(), "temporary file should be cleaned up");
    }

    #[test]
    fn test_staging_dir_for_bare_file_name() {
        assert_eq!(staging_dir(Path::new("books.txt")), Path::new("."));
        assert_eq!(staging_dir(Path::new("data/books.txt")), Path::new("data"));
        assert_eq!(TextFileStore::new("books.txt").location(), "books.txt");
    }

    #[test]
    fn test_whitespace_after_status_survives_save() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("books.txt");
        std::fs::write(&path, "Dune|Herbert|111|available \nEmma|Austen|222|issued\t\n").unwrap();
        let store = TextFileStore::new(&path);

        let mut books = Vec::new();
        let report = store.load_into(&mut books).unwrap();
        assert_eq!(report.loaded, 2);
        assert_eq!(report.skipped, 0);

        store.save(&books).unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "Dune|Herbert|111|available\nEmma|Austen|222|issued\n"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_save_keeps_existing_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("books.txt");
        std::fs::write(&path, "Old|Entry|1|available\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();
        let store = TextFileStore::new(&path);

        store.save(&[Book::new("Dune", "Herbert", "111")]).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    #[cfg(unix)]
    #[test]
    fn test_save_through_symlink_writes_target() {
        let temp_dir = TempDir::new().unwrap();
        let real = temp_dir.path().join("real-books.txt");
        let link = temp_dir.path().join("books.txt");
        std::fs::write(&real, "Old|Entry|1|available\n").unwrap();
        std::os::unix::fs::symlink(&real, &link).unwrap();
        let store = TextFileStore::new(&link);

        store.save(&[Book::new("Dune", "Herbert", "111")]).unwrap();

        assert!(std::fs::symlink_metadata(&link)
            .unwrap()
            .file_type()
            .is_symlink());
        assert_eq!(
            std::fs::read_to_string(&real).unwrap(),
            "Dune|Herbert|111|available\n"
        );
    }
}
