use std::sync::Arc;

use thiserror::Error;

use super::remote_store::RemoteStore;
use super::single_flight::PathLocks;

/// Stages of the replacement protocol, in order. The last phase reached
/// is captured into the failure so partial states stay diagnosable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplacePhase {
    UploadedTemp,
    DeletedOriginal,
    RenamedTemp,
}

impl std::fmt::Display for ReplacePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReplacePhase::UploadedTemp => write!(f, "uploaded_temp"),
            ReplacePhase::DeletedOriginal => write!(f, "deleted_original"),
            ReplacePhase::RenamedTemp => write!(f, "renamed_temp"),
        }
    }
}

#[derive(Error, Debug)]
pub enum ReplaceError {
    #[error("another replacement is already in flight for {target}")]
    Busy { target: String },
    #[error("upload of redacted copy to {temp} failed: {message}")]
    Upload { temp: String, message: String },
    #[error("delete of original {target} failed: {message}")]
    Delete { target: String, message: String },
    #[error(
        "original {target} was deleted but rename from {temp} failed: {message}; \
         the redacted copy may still exist at {temp}"
    )]
    PartialReplace {
        target: String,
        temp: String,
        message: String,
    },
}

impl ReplaceError {
    /// The last phase that completed before the failure, if any.
    pub fn phase_reached(&self) -> Option<ReplacePhase> {
        match self {
            ReplaceError::Busy { .. } | ReplaceError::Upload { .. } => None,
            ReplaceError::Delete { .. } => Some(ReplacePhase::UploadedTemp),
            ReplaceError::PartialReplace { .. } => Some(ReplacePhase::DeletedOriginal),
        }
    }

    /// Whether the original recording is still in place. A failed delete
    /// is assumed intact until proven otherwise; a partial replace is not.
    pub fn original_intact(&self) -> bool {
        !matches!(self, ReplaceError::PartialReplace { .. })
    }
}

/// Replaces the original recording on the external storage system with
/// the redacted copy, via a staged, non-transactional protocol:
///
/// 1. upload the redacted bytes to a unique temp path beside the target
/// 2. delete the original (the irreversible step)
/// 3. rename the temp path onto the target
///
/// A rename failure after the delete succeeded is the single most
/// dangerous state in the subsystem: the original is gone and no
/// validated replacement is in place. It surfaces as the distinct
/// [`ReplaceError::PartialReplace`] class, never as an ordinary retryable
/// failure, so an operator can recover from the known temp path.
pub struct RemoteReplaceWorkflow {
    locks: Arc<PathLocks>,
}

impl RemoteReplaceWorkflow {
    pub fn new(locks: Arc<PathLocks>) -> Self {
        Self { locks }
    }

    /// `attempt_id` scopes the temp path to the recording, keeping
    /// concurrent replacements of different recordings in the same
    /// directory from colliding.
    pub fn replace(
        &self,
        store: &dyn RemoteStore,
        target: &str,
        bytes: &[u8],
        attempt_id: &str,
    ) -> Result<(), ReplaceError> {
        let _guard = self
            .locks
            .try_lock(target)
            .ok_or_else(|| ReplaceError::Busy {
                target: target.to_string(),
            })?;

        let temp = format!("{target}.{attempt_id}.redacted.tmp");

        store.upload(&temp, bytes).map_err(|e| ReplaceError::Upload {
            temp: temp.clone(),
            message: e.to_string(),
        })?;
        log::info!("uploaded redacted copy to {temp} ({} bytes)", bytes.len());

        store.delete(target).map_err(|e| ReplaceError::Delete {
            target: target.to_string(),
            message: e.to_string(),
        })?;
        log::info!("deleted original {target}");

        store.rename(&temp, target).map_err(|e| {
            log::error!(
                "original {target} deleted but rename from {temp} failed; \
                 operator intervention required"
            );
            ReplaceError::PartialReplace {
                target: target.to_string(),
                temp: temp.clone(),
                message: e.to_string(),
            }
        })?;
        log::info!("renamed {temp} into place at {target}");

        Ok(())
    }
}
