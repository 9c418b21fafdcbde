use crate::storage::StorageReference;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Input slot name the retraining service requires.
pub const INPUT_SLOT: &str = "input2";

/// Output slot name the retraining service requires.
pub const OUTPUT_SLOT: &str = "output2";

/// Batch execution request body for a retrain job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RetrainRequest {
    pub inputs: HashMap<String, StorageReference>,
    #[serde(default)]
    pub global_parameters: HashMap<String, String>,
    pub outputs: HashMap<String, StorageReference>,
}

impl RetrainRequest {
    /// Builds a request with the one input and one output slot the service expects.
    ///
    /// Slot names are fixed; the service rejects anything else.
    pub fn new(input: StorageReference, output: StorageReference) -> Self {
        Self {
            inputs: HashMap::from([(INPUT_SLOT.to_string(), input)]),
            global_parameters: HashMap::new(),
            outputs: HashMap::from([(OUTPUT_SLOT.to_string(), output)]),
        }
    }

    #[must_use]
    pub fn with_global_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.global_parameters.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_uses_fixed_slots() {
        let request = RetrainRequest::new(
            StorageReference::connection_string("conn", "container/input2-looking-name.csv"),
            StorageReference::connection_string("conn", "learnings/out.ilearner"),
        );
        assert_eq!(request.inputs.keys().collect::<Vec<_>>(), vec![INPUT_SLOT]);
        assert_eq!(request.outputs.keys().collect::<Vec<_>>(), vec![OUTPUT_SLOT]);
        assert!(request.global_parameters.is_empty());
    }

    #[test]
    fn test_request_wire_shape() {
        let request = RetrainRequest::new(
            StorageReference::connection_string("conn", "c/in.csv"),
            StorageReference::connection_string("conn", "l/out.ilearner"),
        );
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["Inputs"]["input2"]["RelativeLocation"], json!("c/in.csv"));
        assert_eq!(value["Outputs"]["output2"]["ConnectionString"], json!("conn"));
        assert_eq!(value["GlobalParameters"], json!({}));
    }
}
