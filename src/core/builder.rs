use crate::core::config::DEFAULT_ENVIRONMENT;
use crate::core::context::{Environment, RequestIdentity};
use crate::core::contracts::{DynError, IInputMapper, IOutputMapper, IRequestView, ISchemaChecker};
use crate::core::error_relay::RelayError;
use crate::core::executor::EndpointHandler;
use crate::core::mappers::{EmptyInputMapper, FieldTableMapper, FnInputMapper, JsonOutputMapper};
use futures::future::BoxFuture;
use serde::Serialize;
use serde_json::Value;
use std::error::Error;
use std::sync::Arc;

pub(crate) type ActionFuture = BoxFuture<'static, Result<Value, RelayError>>;

pub(crate) type ErasedAction =
    dyn Fn(Value, RequestIdentity, Environment) -> ActionFuture + Send + Sync;

/// Immutable snapshot of a builder's configuration, shared read-only by every
/// invocation of the handlers built from it.
pub(crate) struct HandlerDescriptor {
    pub(crate) name: String,
    pub(crate) action: Arc<ErasedAction>,
    pub(crate) input_mapper: Arc<dyn IInputMapper>,
    pub(crate) output_mapper: Arc<dyn IOutputMapper>,
    pub(crate) schema: Option<Arc<dyn ISchemaChecker>>,
    pub(crate) environment: String,
}

/// Accumulates pipeline configuration and produces executors on demand.
///
/// `build` snapshots the configuration by value: handlers built earlier never
/// observe later setter calls.
pub struct EndpointBuilder {
    name: String,
    action: Arc<ErasedAction>,
    input_mapper: Arc<dyn IInputMapper>,
    output_mapper: Arc<dyn IOutputMapper>,
    schema: Option<Arc<dyn ISchemaChecker>>,
    environment: String,
}

impl EndpointBuilder {
    /// Constructs a builder around a business-logic function.
    ///
    /// The function receives the mapped input, the request identity, and the
    /// invocation environment; its output is serialized to JSON when it
    /// resolves. Fails with [`RelayError::EmptyHandlerName`] when `name` is
    /// empty or whitespace-only.
    pub fn create<F, Fut, T, E>(name: impl Into<String>, action: F) -> Result<Self, RelayError>
    where
        F: Fn(Value, RequestIdentity, Environment) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        T: Serialize + Send + 'static,
        E: Error + Send + Sync + 'static,
    {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(RelayError::EmptyHandlerName);
        }

        let handler_name = name.clone();
        let erased: Arc<ErasedAction> = Arc::new(move |input, identity, environment| {
            let fut = action(input, identity, environment);
            let handler_name = handler_name.clone();
            Box::pin(async move {
                let output = fut
                    .await
                    .map_err(|err| RelayError::Handler(handler_name.clone(), err.to_string()))?;
                serde_json::to_value(output)
                    .map_err(|err| RelayError::Serialization(handler_name, err.to_string()))
            })
        });

        Ok(Self {
            name,
            action: erased,
            input_mapper: Arc::new(EmptyInputMapper),
            output_mapper: Arc::new(JsonOutputMapper),
            schema: None,
            environment: DEFAULT_ENVIRONMENT.to_string(),
        })
    }

    /// Replaces the input mapper.
    pub fn set_input_mapper(mut self, mapper: impl IInputMapper + 'static) -> Self {
        self.input_mapper = Arc::new(mapper);
        self
    }

    /// Function form of [`set_input_mapper`](Self::set_input_mapper).
    pub fn set_input_fn<F>(mut self, mapper: F) -> Self
    where
        F: Fn(&dyn IRequestView) -> Result<Value, DynError> + Send + Sync + 'static,
    {
        self.input_mapper = Arc::new(FnInputMapper(mapper));
        self
    }

    /// Declarative form of [`set_input_mapper`](Self::set_input_mapper): a
    /// table of `(target, source)` dotted paths compiled once into a
    /// [`FieldTableMapper`].
    pub fn set_input_fields<I, K, V>(mut self, table: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.input_mapper = Arc::new(FieldTableMapper::new(table));
        self
    }

    /// Stores a schema checker. Absent checker means validation is skipped.
    pub fn set_schema(mut self, checker: impl ISchemaChecker + 'static) -> Self {
        self.schema = Some(Arc::new(checker));
        self
    }

    /// Replaces the output mapper.
    pub fn set_output_mapper(mut self, mapper: impl IOutputMapper + 'static) -> Self {
        self.output_mapper = Arc::new(mapper);
        self
    }

    /// Replaces the deployment alias carried into every invocation
    /// environment. Defaults to [`DEFAULT_ENVIRONMENT`].
    pub fn set_environment(mut self, alias: impl Into<String>) -> Self {
        self.environment = alias.into();
        self
    }

    /// Snapshots the current configuration into an executor. Idempotent;
    /// each call yields an independent handler.
    pub fn build(&self) -> EndpointHandler {
        EndpointHandler::new(Arc::new(HandlerDescriptor {
            name: self.name.clone(),
            action: Arc::clone(&self.action),
            input_mapper: Arc::clone(&self.input_mapper),
            output_mapper: Arc::clone(&self.output_mapper),
            schema: self.schema.as_ref().map(Arc::clone),
            environment: self.environment.clone(),
        }))
    }
}
