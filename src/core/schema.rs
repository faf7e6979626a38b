use crate::core::contracts::{DynError, ISchemaChecker};
use crate::core::error_relay::RelayError;
use serde_json::Value;

/// [`ISchemaChecker`] backed by the `jsonschema` crate.
///
/// The schema document is compiled once at construction; rule semantics stay
/// with the crate, this adapter only maps its verdicts onto the pipeline
/// contract.
pub struct JsonSchemaChecker {
    validator: jsonschema::Validator,
}

impl JsonSchemaChecker {
    pub fn new(schema: &Value) -> Result<Self, RelayError> {
        let validator = jsonschema::options()
            .build(schema)
            .map_err(|err| RelayError::InvalidSchema(err.to_string()))?;

        Ok(Self { validator })
    }
}

impl ISchemaChecker for JsonSchemaChecker {
    fn check(&self, input: &Value) -> Result<(), DynError> {
        self.validator
            .validate(input)
            .map_err(|err| DynError::from(err.to_string()))
    }
}
