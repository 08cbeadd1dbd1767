use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Result};

use crate::model::smart_list::SmartList;
use crate::repository::file::{prepare_json_file, read_json_array, write_json_array};
use crate::repository::traits::SmartListRepository;

const SMART_LIST_FILE_NAME: &str = "smart_lists.json";

#[derive(Clone)]
pub struct FileSmartListRepository {
    file_path: PathBuf,
}

impl FileSmartListRepository {
    pub fn new(base_dir: Option<PathBuf>) -> Result<Self> {
        let file_path = prepare_json_file::<SmartList>(base_dir, SMART_LIST_FILE_NAME)?;
        Ok(FileSmartListRepository { file_path })
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn read_lists(&self) -> Result<Vec<SmartList>> {
        read_json_array(&self.file_path)
    }

    fn write_lists(&self, lists: &[SmartList]) -> Result<()> {
        write_json_array(&self.file_path, lists)
    }
}

impl SmartListRepository for FileSmartListRepository {
    fn list(&self) -> Result<Vec<SmartList>> {
        self.read_lists()
    }

    fn create(&self, list: SmartList) -> Result<SmartList> {
        let mut lists = self.read_lists()?;
        if lists.iter().any(|l| l.id == list.id) {
            bail!("Smart list with ID {} already exists", list.id);
        }
        lists.push(list.clone());
        self.write_lists(&lists)?;
        Ok(list)
    }

    fn update(&self, list: &SmartList) -> Result<()> {
        let mut lists = self.read_lists()?;
        if let Some(pos) = lists.iter().position(|l| l.id == list.id) {
            lists[pos] = list.clone();
            self.write_lists(&lists)?;
            Ok(())
        } else {
            Err(anyhow!("Smart list with ID {} not found", list.id))
        }
    }

    fn delete(&self, id: &str) -> Result<()> {
        let mut lists = self.read_lists()?;
        let initial_len = lists.len();
        lists.retain(|l| l.id != id);

        if lists.len() == initial_len {
            return Err(anyhow!("Smart list with ID {} not found", id));
        }

        self.write_lists(&lists)?;
        Ok(())
    }
}
