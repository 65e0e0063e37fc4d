use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::codec::Codec;
use crate::error::{IndexError, Result};
use crate::index::InvertedIndex;

/// Encode, write to a sibling `.tmp` file, then rename over `path`.
/// A failed encode or write leaves nothing at `path`.
pub fn save_index<P: AsRef<Path>>(path: P, codec: &dyn Codec, index: &InvertedIndex) -> Result<()> {
    let path = path.as_ref();
    let bytes = codec.encode(index)?;
    let tmp = tmp_path(path);
    if let Err(err) = write_file(&tmp, &bytes).and_then(|_| fs::rename(&tmp, path).map_err(IndexError::from)) {
        let _ = fs::remove_file(&tmp);
        return Err(err);
    }
    tracing::info!(path = %path.display(), codec = codec.name(), bytes = bytes.len(), "index saved");
    Ok(())
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut f = File::create(path).map_err(|e| IndexError::from_io_at(e, path))?;
    f.write_all(bytes)?;
    f.sync_all()?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_else(|| OsString::from("index"));
    name.push(".tmp");
    path.with_file_name(name)
}

pub fn load_index<P: AsRef<Path>>(path: P, codec: &dyn Codec) -> Result<InvertedIndex> {
    let path = path.as_ref();
    let mut f = File::open(path).map_err(|e| IndexError::from_io_at(e, path))?;
    let mut buf = Vec::new();
    f.read_to_end(&mut buf)?;
    let index = codec.decode(&buf)?;
    tracing::info!(path = %path.display(), codec = codec.name(), terms = index.len(), "index loaded");
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::FixedWidthCodec;
    use tempfile::tempdir;

    fn sample() -> InvertedIndex {
        InvertedIndex::from_postings([("a", vec![1, 2])])
    }

    #[test]
    fn save_leaves_only_the_index_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.idx");
        save_index(&path, &FixedWidthCodec, &sample()).unwrap();
        let names: Vec<_> = fs::read_dir(dir.path()).unwrap().map(|e| e.unwrap().file_name()).collect();
        assert_eq!(names, vec![OsString::from("out.idx")]);
        assert_eq!(load_index(&path, &FixedWidthCodec).unwrap(), sample());
    }

    #[test]
    fn failed_rename_cleans_up_temp_file() {
        let dir = tempdir().unwrap();
        // a non-empty directory at the target path cannot be replaced by a file
        let target = dir.path().join("out.idx");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep"), b"x").unwrap();
        assert!(save_index(&target, &FixedWidthCodec, &sample()).is_err());
        assert!(!dir.path().join("out.idx.tmp").exists());
        assert!(target.join("keep").exists());
    }

    #[test]
    fn failed_save_keeps_previous_index() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.idx");
        save_index(&path, &FixedWidthCodec, &sample()).unwrap();
        assert!(save_index(&path, &FixedWidthCodec, &InvertedIndex::new()).is_err());
        assert_eq!(load_index(&path, &FixedWidthCodec).unwrap(), sample());
    }

    #[test]
    fn missing_directory_is_resource_not_found() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nope").join("out.idx");
        let err = save_index(&path, &FixedWidthCodec, &sample()).unwrap_err();
        assert!(matches!(err, IndexError::ResourceNotFound { .. }));
        assert!(!path.exists());
    }
}
