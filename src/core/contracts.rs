use crate::core::error_relay::RelayError;
use async_trait::async_trait;
use serde_json::Value;
use std::error::Error;

pub type DynError = Box<dyn Error + Send + Sync>;

/// Structured view of an inbound request as a nested JSON document.
///
/// Hosting frameworks adapt their native request type by exposing the parts
/// the pipeline may read (conventionally `params` and `body`, but any nested
/// property reachable by dotted path).
pub trait IRequestView: Send + Sync {
    fn document(&self) -> &Value;
}

/// Value-backed [`IRequestView`] for embedding and tests.
pub struct JsonRequest {
    document: Value,
}

impl JsonRequest {
    pub fn new(document: Value) -> Self {
        Self { document }
    }
}

impl IRequestView for JsonRequest {
    fn document(&self) -> &Value {
        &self.document
    }
}

/// Outbound side of the exchange. Writing the JSON body terminates the
/// exchange with a success status; the sink owns everything transport-level.
#[async_trait]
pub trait IResponseSink: Send {
    async fn write_json(&mut self, body: &Value) -> Result<(), DynError>;
}

/// The hosting framework's error continuation. Receives terminal failures
/// only; successful results never pass through it.
#[async_trait]
pub trait IFailureContinuation: Send {
    async fn fail(&mut self, error: RelayError);
}

/// Derives the plain input object from an inbound request. Must be fast and
/// synchronous; failures are funneled into the pipeline's single failure path.
pub trait IInputMapper: Send + Sync {
    fn map(&self, request: &dyn IRequestView) -> Result<Value, DynError>;
}

/// Writes a handler's output onto the response sink. Trusted to terminate the
/// exchange; the executor performs no response action after it returns.
#[async_trait]
pub trait IOutputMapper: Send + Sync {
    async fn write(
        &self,
        output: Value,
        response: &mut (dyn IResponseSink + '_),
    ) -> Result<(), DynError>;
}

/// Checks a mapped input against a declarative schema, raising on violation.
/// Rule semantics live with the provider; the pipeline only consumes verdicts.
pub trait ISchemaChecker: Send + Sync {
    fn check(&self, input: &Value) -> Result<(), DynError>;
}

/// Erased built handler, the shape a hosting framework holds per route.
#[async_trait]
pub trait IEndpointHandler: Send + Sync {
    fn name(&self) -> &str;

    async fn invoke(
        &self,
        request: &(dyn IRequestView),
        response: &mut (dyn IResponseSink + '_),
        next: &mut (dyn IFailureContinuation + '_),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_request_exposes_document() {
        let request = JsonRequest::new(json!({"params": {"id": "42"}}));
        assert_eq!(request.document()["params"]["id"], json!("42"));
    }

    #[test]
    fn test_trait_objects_share_one_document() {
        let request = JsonRequest::new(json!({"body": {"name": "Ada"}}));
        let view: &dyn IRequestView = &request;
        assert_eq!(view.document(), request.document());
    }
}
