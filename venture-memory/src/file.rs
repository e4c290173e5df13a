//! File-backed key-value storage: one file per key under a root directory.
//!
//! Writes go to a temp file that is renamed over the target, so readers see
//! either the old or the new value. A sibling `.lock` file serializes access
//! between processes.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use fs4::fs_std::FileExt;
use venture_common::Result;

use crate::traits::{persistence_error, Storage};

pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Use `root` as the storage directory, creating it if needed.
    pub fn new(root: &Path) -> Result<Self> {
        fs::create_dir_all(root)
            .map_err(|e| persistence_error("create", &root.display().to_string(), e))?;
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the data file for `key`. Characters outside `[A-Za-z0-9._-]`
    /// become `_`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", file_stem(key)))
    }

    fn lock(&self, key: &str) -> Result<File> {
        let path = self.root.join(format!("{}.lock", file_stem(key)));
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)
            .map_err(|e| persistence_error("open lock for", key, e))?;
        file.lock_exclusive()
            .map_err(|e| persistence_error("lock", key, e))?;
        Ok(file)
    }
}

fn file_stem(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

impl Storage for FileStorage {
    fn name(&self) -> &str {
        "file"
    }

    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let lock = self.lock(key)?;
        let contents = match fs::read_to_string(self.path_for(key)) {
            Ok(s) => Some(s),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => return Err(persistence_error("read", key, e)),
        };
        FileExt::unlock(&lock).map_err(|e| persistence_error("unlock", key, e))?;
        Ok(contents)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let lock = self.lock(key)?;
        let target = self.path_for(key);
        let tmp = target.with_extension("json.tmp");

        let write = || -> std::io::Result<()> {
            let mut file = File::create(&tmp)?;
            file.write_all(value.as_bytes())?;
            file.sync_all()?;
            fs::rename(&tmp, &target)
        };
        if let Err(e) = write() {
            let _ = fs::remove_file(&tmp);
            return Err(persistence_error("write", key, e));
        }

        FileExt::unlock(&lock).map_err(|e| persistence_error("unlock", key, e))?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let lock = self.lock(key)?;
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(persistence_error("remove", key, e)),
        }
        FileExt::unlock(&lock).map_err(|e| persistence_error("unlock", key, e))?;
        Ok(())
    }
}
