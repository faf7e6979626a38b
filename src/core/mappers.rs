use crate::core::contracts::{DynError, IInputMapper, IOutputMapper, IRequestView, IResponseSink};
use crate::core::path;
use async_trait::async_trait;
use serde_json::{Map, Value};

/// Fallback input mapper: an empty object regardless of request contents,
/// for business logic that needs nothing request-derived.
pub struct EmptyInputMapper;

impl IInputMapper for EmptyInputMapper {
    fn map(&self, _request: &dyn IRequestView) -> Result<Value, DynError> {
        Ok(Value::Object(Map::new()))
    }
}

/// Declarative input mapper compiled from a table of
/// `(target path, source path)` pairs. Each source path is read from the
/// request document and written at the target path in a fresh object,
/// creating nested structure as needed. A source that resolves to nothing
/// leaves its target absent.
pub struct FieldTableMapper {
    fields: Vec<(String, String)>,
}

impl FieldTableMapper {
    pub fn new<I, K, V>(table: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: table
                .into_iter()
                .map(|(target, source)| (target.into(), source.into()))
                .collect(),
        }
    }
}

impl IInputMapper for FieldTableMapper {
    fn map(&self, request: &dyn IRequestView) -> Result<Value, DynError> {
        let document = request.document();
        let mut input = Value::Object(Map::new());
        for (target, source) in &self.fields {
            if let Some(found) = path::resolve(document, source) {
                path::insert(&mut input, target, found.clone());
            }
        }
        Ok(input)
    }
}

/// Adapter turning a plain function into an [`IInputMapper`].
pub struct FnInputMapper<F>(pub F);

impl<F> IInputMapper for FnInputMapper<F>
where
    F: Fn(&dyn IRequestView) -> Result<Value, DynError> + Send + Sync,
{
    fn map(&self, request: &dyn IRequestView) -> Result<Value, DynError> {
        (self.0)(request)
    }
}

/// Fallback output mapper: the handler's result, serialized as the entire
/// JSON response body. Failures never reach this mapper.
pub struct JsonOutputMapper;

#[async_trait]
impl IOutputMapper for JsonOutputMapper {
    async fn write(
        &self,
        output: Value,
        response: &mut (dyn IResponseSink + '_),
    ) -> Result<(), DynError> {
        response.write_json(&output).await
    }
}
