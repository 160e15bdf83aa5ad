//! Moving files and directory trees.

use std::fs;
use std::io;
use std::path::Path;

/// Moves every entry of `from` into `to`, recursing into subdirectories.
///
/// `to` and any missing subdirectories are created. Emptied subdirectories
/// of `from` are removed; `from` itself is left in place, empty.
pub fn move_dir(from: impl AsRef<Path>, to: impl AsRef<Path>) -> io::Result<()> {
    let (from, to) = (from.as_ref(), to.as_ref());
    let entries = fs::read_dir(from)?;
    fs::create_dir_all(to)?;
    for entry in entries {
        let entry = entry?;
        let source = entry.path();
        let target = to.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            move_dir(&source, &target)?;
            fs::remove_dir(&source)?;
        } else {
            move_file(&source, &target)?;
        }
    }
    Ok(())
}

/// Renames `from` to `to`, replacing `to` if it exists.
pub fn move_file(from: impl AsRef<Path>, to: impl AsRef<Path>) -> io::Result<()> {
    fs::rename(from, to)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_dir_merges_tree() {
        let root = tempfile::tempdir().unwrap();
        let from = root.path().join("from");
        let to = root.path().join("to");
        fs::create_dir_all(from.join("nested/deeper")).unwrap();
        fs::write(from.join("a.json"), "{}").unwrap();
        fs::write(from.join("nested/deeper/b.json"), "[]").unwrap();
        fs::create_dir_all(to.join("nested")).unwrap();
        fs::write(to.join("nested/keep.txt"), "x").unwrap();

        move_dir(&from, &to).unwrap();

        assert_eq!(fs::read_to_string(to.join("a.json")).unwrap(), "{}");
        assert_eq!(fs::read_to_string(to.join("nested/deeper/b.json")).unwrap(), "[]");
        assert!(to.join("nested/keep.txt").exists());
        assert!(from.exists());
        assert_eq!(fs::read_dir(&from).unwrap().count(), 0);
    }

    #[test]
    fn test_move_file() {
        let root = tempfile::tempdir().unwrap();
        let a = root.path().join("a");
        let b = root.path().join("b");
        fs::write(&a, "data").unwrap();
        move_file(&a, &b).unwrap();
        assert!(!a.exists());
        assert_eq!(fs::read_to_string(&b).unwrap(), "data");
    }

    #[test]
    fn test_move_missing_source_fails() {
        let root = tempfile::tempdir().unwrap();
        let to = root.path().join("to");
        let err = move_dir(root.path().join("nope"), &to).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(!to.exists());
    }
}
