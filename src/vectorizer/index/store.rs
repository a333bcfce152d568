use std::{
    fs,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    time::Instant,
};

use serde::Deserialize;
use tempfile::NamedTempFile;

use crate::error::{BuildError, BuildResult, LoadError, LoadResult};

use super::{Index, FORMAT_VERSION};

/// Write `index` to `target` atomically.
///
/// The artifact is encoded into a temporary file next to `target`, synced,
/// and renamed over it. On any failure the previous artifact is untouched.
pub fn persist<P: AsRef<Path>>(index: &Index, target: P) -> BuildResult<()> {
    let target = target.as_ref();
    let start = Instant::now();
    let persist_err = |source: std::io::Error| BuildError::Persist {
        path: target.to_path_buf(),
        source,
    };

    let dir = parent_dir(target);
    fs::create_dir_all(&dir).map_err(persist_err)?;
    let mut tmp = NamedTempFile::new_in(&dir).map_err(persist_err)?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        serde_cbor::to_writer(&mut writer, index)?;
        writer.flush().map_err(persist_err)?;
    }
    tmp.as_file().sync_all().map_err(persist_err)?;
    tmp.persist(target).map_err(|e| persist_err(e.error))?;

    tracing::info!(
        path = %target.display(),
        documents = index.doc_num(),
        built_at = %index.built_at(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "index persisted"
    );
    Ok(())
}

/// Read an artifact written by [`persist`].
pub fn load<P: AsRef<Path>>(source: P) -> LoadResult<Index> {
    let path = source.as_ref();
    let start = Instant::now();
    let bytes = fs::read(path).map_err(|e| LoadError::from_io(path.to_path_buf(), e))?;

    // ヘッダだけ先に読む: a layout change must surface as a version
    // mismatch, not as a generic decode failure
    #[derive(Deserialize)]
    struct HeaderProbe {
        format_version: u32,
    }
    #[derive(Deserialize)]
    struct Probe {
        header: HeaderProbe,
    }
    let probe: Probe = decode(path, &bytes)?;
    if probe.header.format_version != FORMAT_VERSION {
        return Err(LoadError::SchemaMismatch {
            found: probe.header.format_version,
            expected: FORMAT_VERSION,
        });
    }

    let index: Index = decode(path, &bytes)?;
    tracing::info!(
        path = %path.display(),
        documents = index.doc_num(),
        vocabulary = index.vocab_size(),
        built_at = %index.built_at(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "index loaded"
    );
    Ok(index)
}

fn decode<'a, T: Deserialize<'a>>(path: &Path, bytes: &'a [u8]) -> LoadResult<T> {
    serde_cbor::from_slice(bytes).map_err(|source| LoadError::Corrupt {
        path: path.to_path_buf(),
        source,
    })
}

fn parent_dir(target: &Path) -> PathBuf {
    match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vectorizer::index::{FacultyRecord, IndexEntry};
    use crate::vectorizer::{IdfTable, TermVector};

    fn sample() -> Index {
        let mut vector = TermVector::new();
        vector.insert("robotics".to_string(), 0.75);
        vector.insert("vision".to_string(), 0.25);
        let mut idf = IdfTable::new();
        idf.insert("robotics".to_string(), 1.0);
        idf.insert("vision".to_string(), 1.6931471805599454);
        Index::from_parts(
            vec![IndexEntry {
                vector,
                metadata: FacultyRecord {
                    faculty_id: "7".into(),
                    name: "Ada".into(),
                    pub_links: vec!["https://example.org/p1".into()],
                    ..Default::default()
                },
            }],
            idf,
        )
    }

    #[test]
    fn persist_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("vectors.cbor");
        let index = sample();
        persist(&index, &path).unwrap();
        assert_eq!(load(&path).unwrap(), index);
    }

    #[test]
    fn leaves_no_temporary_files_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vectors.cbor");
        persist(&sample(), &path).unwrap();
        persist(&Index::empty(), &path).unwrap();
        let names: Vec<_> = fs::read_dir(dir.path()).unwrap().map(|e| e.unwrap().file_name()).collect();
        assert_eq!(names, vec![std::ffi::OsString::from("vectors.cbor")]);
        assert!(load(&path).unwrap().is_empty());
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(dir.path().join("absent.cbor")).unwrap_err();
        assert!(matches!(err, LoadError::Missing { .. }));
    }

    #[test]
    fn truncated_file_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vectors.cbor");
        persist(&sample(), &path).unwrap();
        let bytes = fs::read(&path).unwrap();
        fs::write(&path, &bytes[..bytes.len() / 2]).unwrap();
        assert!(matches!(load(&path).unwrap_err(), LoadError::Corrupt { .. }));
    }

    #[test]
    fn other_format_version_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vectors.cbor");
        let mut index = sample();
        index.header.format_version = FORMAT_VERSION + 1;
        persist(&index, &path).unwrap();
        match load(&path).unwrap_err() {
            LoadError::SchemaMismatch { found, expected } => {
                assert_eq!(found, FORMAT_VERSION + 1);
                assert_eq!(expected, FORMAT_VERSION);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
