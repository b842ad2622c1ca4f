use crate::domain::ports::Storage;
use crate::utils::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Files on the local file system. Relative paths are resolved against
/// `base_path`.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }

    pub fn current_dir() -> Self {
        Self::new(".".to_string())
    }

    fn resolve(&self, path: &str) -> PathBuf {
        Path::new(&self.base_path).join(path)
    }
}

impl Storage for LocalStorage {
    fn read_to_string(&self, path: &str) -> Result<String> {
        let data = fs::read_to_string(self.resolve(path))?;
        Ok(data)
    }

    fn write_string(&self, path: &str, contents: &str) -> Result<()> {
        let full_path = self.resolve(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(full_path, contents)?;
        Ok(())
    }
}
