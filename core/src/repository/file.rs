use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;

use crate::model::task::Task;
use crate::repository::traits::TaskRepository;

const DEFAULT_DIR_NAME: &str = ".tasklens";
const DEFAULT_FILE_NAME: &str = "tasks.json";

/// `~/.tasklens`
pub fn default_data_dir() -> Result<PathBuf> {
    let home_dir = dirs::home_dir()
        .ok_or_else(|| anyhow!("Could not determine home directory"))?;
    Ok(home_dir.join(DEFAULT_DIR_NAME))
}

/// Resolves `base_dir/file_name`, creating the directory and an empty JSON
/// array file when missing.
pub(crate) fn prepare_json_file<T: Serialize>(base_dir: Option<PathBuf>, file_name: &str) -> Result<PathBuf> {
    let mut path = match base_dir {
        Some(dir) => dir,
        None => default_data_dir()?,
    };
    fs::create_dir_all(&path)
        .with_context(|| format!("Failed to create data directory {}", path.display()))?;
    path.push(file_name);

    if !path.exists() {
        write_json_array::<T>(&path, &[])?;
        info!(path = %path.display(), "initialised empty store");
    }

    Ok(path)
}

pub(crate) fn read_json_array<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let reader = BufReader::new(file);
    let items = serde_json::from_reader(reader)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(items)
}

pub(crate) fn write_json_array<T: Serialize>(path: &Path, items: &[T]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, items)?;
    writer.flush()?;
    Ok(())
}

/// Read-only view over the task document exported by the app.
#[derive(Clone)]
pub struct FileTaskRepository {
    file_path: PathBuf,
}

impl FileTaskRepository {
    pub fn new(base_dir: Option<PathBuf>) -> Result<Self> {
        let file_path = prepare_json_file::<Task>(base_dir, DEFAULT_FILE_NAME)?;
        Ok(FileTaskRepository { file_path })
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }
}

impl TaskRepository for FileTaskRepository {
    fn list(&self) -> Result<Vec<Task>> {
        read_json_array(&self.file_path)
    }
}
