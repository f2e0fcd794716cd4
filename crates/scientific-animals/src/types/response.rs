//! Response body of the scientific-name endpoint

use serde::{Deserialize, Serialize};

/// Successful answer, carried verbatim from the language model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScientificNameResponse {
    pub scientific_name: String,
}

impl ScientificNameResponse {
    pub fn new(answer: String) -> Self {
        Self {
            scientific_name: answer,
        }
    }
}
