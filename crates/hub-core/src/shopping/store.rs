use std::{
    ffi::OsString,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use chrono::Local;

use crate::{errors::Error, shopping::types::ShoppingList, Result};

/// Durable record of the shopping list: one pretty-printed JSON file.
///
/// No locking happens here; `ShoppingService` serializes access.
#[derive(Clone, Debug)]
pub struct ListStore {
    path: PathBuf,
}

impl ListStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current durable state, or the empty list when there is no usable record.
    pub async fn load(&self) -> Result<ShoppingList> {
        let txt = match tokio::fs::read_to_string(&self.path).await {
            Ok(txt) => txt,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(ShoppingList::default()),
            Err(e) => return Err(Error::Io(e)),
        };
        if txt.trim().is_empty() {
            return Ok(ShoppingList::default());
        }

        match serde_json::from_str::<ShoppingList>(&txt) {
            Ok(list) => Ok(list),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "shopping list record is unreadable; starting from an empty list"
                );
                Ok(ShoppingList::default())
            }
        }
    }

    /// Stamp `last_updated` and atomically replace the record.
    pub async fn save(&self, list: &mut ShoppingList) -> Result<()> {
        list.last_updated = Some(Local::now().naive_local());
        self.write(list).await
    }

    /// Replace the record with the empty initial state (no timestamp).
    pub async fn reset(&self) -> Result<ShoppingList> {
        let empty = ShoppingList::default();
        self.write(&empty).await?;
        Ok(empty)
    }

    async fn write(&self, list: &ShoppingList) -> Result<()> {
        let Some(file_name) = self.path.file_name() else {
            return Err(Error::InvalidPath {
                path: self.path.clone(),
                reason: "shopping list path has no file name".to_string(),
            });
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut tmp_name = OsString::from(".");
        tmp_name.push(file_name);
        tmp_name.push(".tmp");
        let tmp = self.path.with_file_name(tmp_name);

        let txt = serde_json::to_string_pretty(list)?;
        tokio::fs::write(&tmp, txt).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}
