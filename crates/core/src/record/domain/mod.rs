pub mod record_store;
pub mod redaction_record;
