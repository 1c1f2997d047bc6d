/// Domain interface over the externally managed storage system.
///
/// Exposes the three file-transfer primitives the replacement protocol
/// needs. No multi-step atomicity is assumed from implementations: each
/// call stands alone and may fail independently.
pub trait RemoteStore: Send + Sync {
    fn upload(&self, path: &str, bytes: &[u8]) -> Result<(), Box<dyn std::error::Error>>;
    fn delete(&self, path: &str) -> Result<(), Box<dyn std::error::Error>>;
    fn rename(&self, from: &str, to: &str) -> Result<(), Box<dyn std::error::Error>>;
}
