//! File I/O operations
//!
//! Load and save ropes

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tiny_rope::Rope;

/// Load a file as a single-leaf rope
pub fn load(path: &Path) -> io::Result<Rope> {
    Ok(Rope::from(fs::read(path)?))
}

/// Stream a rope to `w` leaf by leaf, returning the bytes written
pub fn write(rope: &Rope, w: &mut impl Write) -> io::Result<u64> {
    let mut w = BufWriter::new(w);
    let written = rope.write_to(&mut w)?;
    w.flush()?;
    Ok(written)
}

/// Save a rope through a fresh temporary file in the same directory, then
/// rename it over `path`. A failed write removes the temporary file.
pub fn save(rope: &Rope, path: &Path) -> io::Result<u64> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    let written = write(rope, tmp.as_file_mut())?;
    tmp.persist(path)?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.txt");
        let rope = Rope::from("first ") + Rope::from("second");

        assert_eq!(save(&rope, &path).unwrap(), 12);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);

        let loaded = load(&path).unwrap();
        assert_eq!(loaded, rope);
        assert_eq!(loaded.leaf_count(), 1);
    }

    #[test]
    fn test_save_leaves_sibling_tmp_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let sibling = dir.path().join("out.tmp");
        fs::write(&sibling, "keep me").unwrap();

        save(&Rope::from("new"), &path).unwrap();
        assert_eq!(fs::read_to_string(&sibling).unwrap(), "keep me");
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");

        // Saving to a .tmp path replaces exactly that file
        save(&Rope::from("replaced"), &sibling).unwrap();
        assert_eq!(fs::read_to_string(&sibling).unwrap(), "replaced");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_save_into_missing_dir_fails_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent").join("out.txt");
        assert!(save(&Rope::from("x"), &path).is_err());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
