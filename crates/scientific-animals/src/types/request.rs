//! Incoming request for the scientific-name endpoint

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// Body of `POST /scientific-name`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScientificNameRequest {
    /// Animal to look up
    pub animal: String,
}

impl ScientificNameRequest {
    /// Parse a raw request body
    ///
    /// Anything that is not a JSON object carrying an `animal` key is a
    /// [`Error::MissingAnimal`]. Any present value is accepted; non-strings
    /// are rendered as their JSON text.
    pub fn from_body(body: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(body).map_err(|_| Error::MissingAnimal)?;

        let animal = match value.get("animal") {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => return Err(Error::MissingAnimal),
        };

        Ok(Self { animal })
    }

    /// Natural-language question sent through the pipeline
    pub fn question(&self) -> String {
        format!("What is the scientific name of the animal {}?", self.animal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_template() {
        let request = ScientificNameRequest::from_body(br#"{"animal": "lion"}"#).unwrap();
        assert_eq!(request.question(), "What is the scientific name of the animal lion?");
    }

    #[test]
    fn test_missing_or_invalid_body() {
        for body in [
            &b""[..],
            b"not json",
            b"{}",
            b"[]",
            b"\"animal\"",
            br#"{"name": "lion"}"#,
        ] {
            assert!(
                matches!(ScientificNameRequest::from_body(body), Err(Error::MissingAnimal)),
                "body {:?} should be rejected",
                String::from_utf8_lossy(body)
            );
        }
    }

    #[test]
    fn test_non_string_animal_values() {
        let request = ScientificNameRequest::from_body(br#"{"animal": 42}"#).unwrap();
        assert_eq!(request.animal, "42");

        let request = ScientificNameRequest::from_body(br#"{"animal": null}"#).unwrap();
        assert_eq!(request.question(), "What is the scientific name of the animal null?");

        let request = ScientificNameRequest::from_body(br#"{"animal": ["lion"]}"#).unwrap();
        assert_eq!(request.animal, r#"["lion"]"#);

        let request = ScientificNameRequest::from_body(br#"{"animal": {"name": "lion"}}"#).unwrap();
        assert_eq!(request.animal, r#"{"name":"lion"}"#);

        let request = ScientificNameRequest::from_body(br#"{"animal": "", "extra": 1}"#).unwrap();
        assert_eq!(request.animal, "");
    }
}
