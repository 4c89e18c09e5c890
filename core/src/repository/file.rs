use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use tracing::debug;

use crate::model::user_data::UserData;
use crate::repository::traits::UserDataRepository;

const DEFAULT_FILE_NAME: &str = "user_data.json";

#[derive(Clone)]
pub struct FileUserDataRepository {
    file_path: PathBuf,
}

impl FileUserDataRepository {
    pub fn new(base_dir: Option<PathBuf>) -> Result<Self> {
        let mut path = match base_dir {
            Some(dir) => dir,
            None => default_data_dir()?,
        };
        fs::create_dir_all(&path)
            .with_context(|| format!("could not create data directory {}", path.display()))?;
        path.push(DEFAULT_FILE_NAME);

        let repo = FileUserDataRepository { file_path: path };
        if !repo.file_path.exists() {
            repo.save(&UserData::default())?;
        }
        Ok(repo)
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }
}

pub fn default_data_dir() -> Result<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))?;
    Ok(home_dir.join(".upnext"))
}

impl UserDataRepository for FileUserDataRepository {
    fn load(&self) -> Result<UserData> {
        let file = File::open(&self.file_path)
            .with_context(|| format!("could not open {}", self.file_path.display()))?;
        let reader = BufReader::new(file);
        let data: UserData = serde_json::from_reader(reader)
            .with_context(|| format!("could not read {}", self.file_path.display()))?;
        debug!(
            path = %self.file_path.display(),
            upcoming = data.upcoming.len(),
            completed = data.completed.len(),
            "user data loaded"
        );
        Ok(data)
    }

    fn save(&self, data: &UserData) -> Result<()> {
        // Write a sibling temp file, then rename it over the target.
        let tmp_path = self.file_path.with_extension("json.tmp");
        let file = File::create(&tmp_path)
            .with_context(|| format!("could not create {}", tmp_path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, data)?;
        writer.flush()?;
        fs::rename(&tmp_path, &self.file_path)
            .with_context(|| format!("could not replace {}", self.file_path.display()))?;
        debug!(path = %self.file_path.display(), largest_id = data.largest_id, "user data saved");
        Ok(())
    }
}
