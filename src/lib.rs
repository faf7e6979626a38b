pub mod core;

use serde::Serialize;
use serde_json::Value;
use std::error::Error;

pub use crate::core::builder::EndpointBuilder;
pub use crate::core::config::{DEFAULT_ENVIRONMENT, ENVIRONMENT_VAR, environment_from_env};
pub use crate::core::context::{Environment, RequestIdentity, ScopedLogger};
pub use crate::core::error_relay::RelayError;
pub use crate::core::contracts::{
    DynError, IEndpointHandler, IFailureContinuation, IInputMapper, IOutputMapper, IRequestView,
    IResponseSink, ISchemaChecker, JsonRequest,
};
pub use crate::core::executor::EndpointHandler;
pub use crate::core::mappers::{EmptyInputMapper, FieldTableMapper, FnInputMapper, JsonOutputMapper};

#[cfg(feature = "json-schema")]
pub use crate::core::schema::JsonSchemaChecker;

pub fn create<F, Fut, T, E>(name: impl Into<String>, action: F) -> Result<EndpointBuilder, RelayError>
where
    F: Fn(Value, RequestIdentity, Environment) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    T: Serialize + Send + 'static,
    E: Error + Send + Sync + 'static,
{
    EndpointBuilder::create(name, action)
}
