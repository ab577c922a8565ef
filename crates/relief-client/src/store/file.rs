use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use relief_common::StoreError;
use tracing::debug;

use super::TokenStore;

/// Token persisted as the sole content of a file.
///
/// Writes go to a sibling `.tmp` file first and are renamed into place, so a
/// reader never sees a half-written token.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

/// Create `path` fresh and write `contents`. On unix the file is created
/// owner-only, so the token is never readable by others, not even briefly.
fn write_owner_only(path: &Path, contents: &str) -> io::Result<()> {
    // A leftover file would keep its old mode; start from nothing.
    match fs::remove_file(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => return Err(e),
        _ => {}
    }

    let mut opts = fs::OpenOptions::new();
    opts.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        opts.mode(0o600);
    }
    let mut file = opts.open(path)?;
    file.write_all(contents.as_bytes())?;
    file.sync_all()
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                if token.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(token.to_string()))
                }
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, token: &str) -> Result<(), StoreError> {
        if self.path.file_name().is_none() {
            return Err(StoreError::Path(format!(
                "{} is not a file path",
                self.path.display()
            )));
        }
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = self.tmp_path();
        write_owner_only(&tmp_path, token)?;
        fs::rename(&tmp_path, &self.path)?;

        debug!(path = %self.path.display(), "token persisted");
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "token removed");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in_tmp() -> (FileTokenStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("relief").join("token"));
        (store, dir)
    }

    #[test]
    fn load_missing_file_is_none() {
        let (store, _dir) = store_in_tmp();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn save_then_load_returns_token() {
        let (store, _dir) = store_in_tmp();
        store.save("abc.def.ghi").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("abc.def.ghi"));
        assert!(!store.tmp_path().exists(), "tmp file should be renamed away");
    }

    #[test]
    fn save_overwrites_previous_token() {
        let (store, _dir) = store_in_tmp();
        store.save("first").unwrap();
        store.save("second").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn clear_is_idempotent() {
        let (store, _dir) = store_in_tmp();
        store.save("token").unwrap();
        store.clear().unwrap();
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
        assert!(!store.path().exists());
    }

    #[test]
    fn whitespace_only_file_is_none() {
        let (store, _dir) = store_in_tmp();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "  \n").unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[cfg(unix)]
    #[test]
    fn token_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let (store, _dir) = store_in_tmp();
        store.save("secret").unwrap();
        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn stale_tmp_file_does_not_leak_its_mode() {
        use std::os::unix::fs::PermissionsExt;

        let (store, _dir) = store_in_tmp();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.tmp_path(), "old").unwrap();
        fs::set_permissions(store.tmp_path(), fs::Permissions::from_mode(0o644)).unwrap();

        store.save("secret").unwrap();
        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(store.load().unwrap().as_deref(), Some("secret"));
    }
}
