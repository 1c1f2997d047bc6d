use std::fs;
use std::path::PathBuf;

use crate::record::domain::record_store::RecordStore;
use crate::record::domain::redaction_record::RedactionRecord;

/// One JSON document per recording under a records directory.
///
/// Saves write to a `.part` file first and rename into place, so readers
/// never observe a torn record.
pub struct JsonRecordStore {
    dir: PathBuf,
}

impl JsonRecordStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn record_path(&self, recording_id: &str) -> PathBuf {
        self.dir.join(format!("{recording_id}.json"))
    }
}

impl RecordStore for JsonRecordStore {
    fn load(
        &self,
        recording_id: &str,
    ) -> Result<Option<RedactionRecord>, Box<dyn std::error::Error>> {
        let path = self.record_path(recording_id);
        if !path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&json)?))
    }

    fn save(&self, record: &RedactionRecord) -> Result<(), Box<dyn std::error::Error>> {
        fs::create_dir_all(&self.dir)?;
        let path = self.record_path(&record.recording_id);
        let part = path.with_extension("json.part");
        fs::write(&part, serde_json::to_vec_pretty(record)?)?;
        fs::rename(&part, &path)?;
        Ok(())
    }
}
