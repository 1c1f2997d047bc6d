use super::redaction_record::RedactionRecord;

/// Domain interface over the persistence collaborator.
///
/// Writes may fail transiently; callers retry them without repeating any
/// destructive remote operation.
pub trait RecordStore: Send + Sync {
    fn load(&self, recording_id: &str)
        -> Result<Option<RedactionRecord>, Box<dyn std::error::Error>>;
    fn save(&self, record: &RedactionRecord) -> Result<(), Box<dyn std::error::Error>>;
}
