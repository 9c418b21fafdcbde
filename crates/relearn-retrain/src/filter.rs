use crate::status::JobStatus;
use crate::storage::StorageReference;
use std::path::Path;

/// File extension of trained model blobs, compared case-sensitively.
pub const ARTIFACT_EXTENSION: &str = "ilearner";

/// True if `reference` points at a trained model blob.
pub fn is_model_artifact(reference: &StorageReference) -> bool {
    Path::new(reference.relative_location())
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext == ARTIFACT_EXTENSION)
}

/// Picks the trained model blobs out of a finished job's results.
///
/// Order follows the result map's iteration order, which is unspecified.
pub fn select_artifacts(status: &JobStatus) -> Vec<StorageReference> {
    status
        .results
        .iter()
        .flat_map(|results| results.values())
        .filter(|reference| is_model_artifact(reference))
        .cloned()
        .collect()
}
