use crate::core::builder::HandlerDescriptor;
use crate::core::context::InvocationContext;
use crate::core::contracts::{
    IEndpointHandler, IFailureContinuation, IRequestView, IResponseSink,
};
use crate::core::error_relay::RelayError;
use async_trait::async_trait;
use std::sync::Arc;

/// The build product: executes the mapping/validation/logic/output phases for
/// one request at a time.
///
/// Each invocation reports exactly one terminal outcome: either the output
/// mapper commits the response, or the failure continuation receives the
/// error. Never both, never neither.
pub struct EndpointHandler {
    descriptor: Arc<HandlerDescriptor>,
}

impl EndpointHandler {
    pub(crate) fn new(descriptor: Arc<HandlerDescriptor>) -> Self {
        Self { descriptor }
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    /// Runs the pipeline for one request.
    ///
    /// Phases run strictly in sequence and are never retried; the first
    /// failure skips everything up to the failure path. The only suspension
    /// point besides response writing is the business-logic await.
    pub async fn invoke(
        &self,
        request: &dyn IRequestView,
        response: &mut (dyn IResponseSink + '_),
        next: &mut (dyn IFailureContinuation + '_),
    ) {
        let context = InvocationContext::new(&self.descriptor.name, &self.descriptor.environment);

        match self.run(request, response, &context).await {
            Ok(()) => {}
            Err(error) => {
                tracing::error!(
                    handler = %self.descriptor.name,
                    request_id = %context.identity.request_id,
                    error = %error,
                    "request failed"
                );
                next.fail(error).await;
            }
        }
    }

    async fn run(
        &self,
        request: &dyn IRequestView,
        response: &mut (dyn IResponseSink + '_),
        context: &InvocationContext,
    ) -> Result<(), RelayError> {
        let descriptor = &self.descriptor;
        let logger = &context.environment.logger;

        let input = descriptor
            .input_mapper
            .map(request)
            .map_err(|err| RelayError::InputMapping(descriptor.name.clone(), err.to_string()))?;
        logger.trace("input mapped");

        match &descriptor.schema {
            Some(checker) => {
                checker
                    .check(&input)
                    .map_err(|err| RelayError::Validation(descriptor.name.clone(), err.to_string()))?;
                logger.trace("input validated");
            }
            None => logger.trace("validation skipped"),
        }

        let output = (descriptor.action)(
            input,
            context.identity.clone(),
            context.environment.clone(),
        )
        .await?;

        descriptor
            .output_mapper
            .write(output, response)
            .await
            .map_err(|err| RelayError::OutputMapping(descriptor.name.clone(), err.to_string()))?;

        logger.info("request completed");
        Ok(())
    }
}

#[async_trait]
impl IEndpointHandler for EndpointHandler {
    fn name(&self) -> &str {
        &self.descriptor.name
    }

    async fn invoke(
        &self,
        request: &(dyn IRequestView),
        response: &mut (dyn IResponseSink + '_),
        next: &mut (dyn IFailureContinuation + '_),
    ) {
        EndpointHandler::invoke(self, request, response, next).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::builder::EndpointBuilder;
    use crate::core::contracts::{DynError, ISchemaChecker, JsonRequest};
    use serde_json::{Value, json};
    use std::convert::Infallible;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct RecordingSink {
        written: Vec<Value>,
    }

    #[async_trait]
    impl IResponseSink for RecordingSink {
        async fn write_json(&mut self, body: &Value) -> Result<(), DynError> {
            self.written.push(body.clone());
            Ok(())
        }
    }

    struct FailingSink;

    #[async_trait]
    impl IResponseSink for FailingSink {
        async fn write_json(&mut self, _body: &Value) -> Result<(), DynError> {
            Err("connection reset".into())
        }
    }

    struct RecordingNext {
        failures: Vec<RelayError>,
    }

    #[async_trait]
    impl IFailureContinuation for RecordingNext {
        async fn fail(&mut self, error: RelayError) {
            self.failures.push(error);
        }
    }

    struct RejectEverything;

    impl ISchemaChecker for RejectEverything {
        fn check(&self, _input: &Value) -> Result<(), DynError> {
            Err("id is required".into())
        }
    }

    struct AcceptEverything;

    impl ISchemaChecker for AcceptEverything {
        fn check(&self, _input: &Value) -> Result<(), DynError> {
            Ok(())
        }
    }

    #[derive(Debug)]
    struct TestFailure;

    impl std::fmt::Display for TestFailure {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "TestFailure")
        }
    }

    impl std::error::Error for TestFailure {}

    async fn invoke_once(handler: &EndpointHandler) -> (RecordingSink, RecordingNext) {
        let request = JsonRequest::new(json!({}));
        let mut sink = RecordingSink { written: vec![] };
        let mut next = RecordingNext { failures: vec![] };
        handler.invoke(&request, &mut sink, &mut next).await;
        (sink, next)
    }

    #[tokio::test]
    async fn test_success_commits_response_and_skips_continuation() {
        let handler = EndpointBuilder::create("getUser", |_input, _identity, _environment| {
            async move { Ok::<_, Infallible>(json!({"ok": true})) }
        })
        .unwrap()
        .build();

        let (sink, next) = invoke_once(&handler).await;
        assert_eq!(sink.written, vec![json!({"ok": true})]);
        assert!(next.failures.is_empty());
    }

    #[tokio::test]
    async fn test_default_input_mapper_yields_empty_object() {
        let handler = EndpointBuilder::create("echo", |input, _identity, _environment| {
            async move { Ok::<_, Infallible>(input) }
        })
        .unwrap()
        .build();

        let request = JsonRequest::new(json!({"params": {"id": "42"}}));
        let mut sink = RecordingSink { written: vec![] };
        let mut next = RecordingNext { failures: vec![] };
        handler.invoke(&request, &mut sink, &mut next).await;

        assert_eq!(sink.written, vec![json!({})]);
        assert!(next.failures.is_empty());
    }

    #[tokio::test]
    async fn test_input_mapper_failure_goes_to_continuation() {
        let called = Arc::new(AtomicUsize::new(0));
        let called_by_action = Arc::clone(&called);

        let handler = EndpointBuilder::create("getUser", move |_input, _identity, _environment| {
            let called = Arc::clone(&called_by_action);
            async move {
                called.fetch_add(1, Ordering::SeqCst);
                Ok::<_, Infallible>(json!({}))
            }
        })
        .unwrap()
        .set_input_fn(|_request: &dyn IRequestView| Err("unreadable request".into()))
        .build();

        let (sink, next) = invoke_once(&handler).await;
        assert!(sink.written.is_empty());
        assert_eq!(called.load(Ordering::SeqCst), 0);
        assert_eq!(
            next.failures,
            vec![RelayError::InputMapping(
                "getUser".into(),
                "unreadable request".into()
            )]
        );
    }

    #[tokio::test]
    async fn test_schema_violation_skips_handler() {
        let called = Arc::new(AtomicUsize::new(0));
        let called_by_action = Arc::clone(&called);

        let handler = EndpointBuilder::create("getUser", move |_input, _identity, _environment| {
            let called = Arc::clone(&called_by_action);
            async move {
                called.fetch_add(1, Ordering::SeqCst);
                Ok::<_, Infallible>(json!({}))
            }
        })
        .unwrap()
        .set_schema(RejectEverything)
        .build();

        let (sink, next) = invoke_once(&handler).await;
        assert!(sink.written.is_empty());
        assert_eq!(called.load(Ordering::SeqCst), 0);
        assert_eq!(
            next.failures,
            vec![RelayError::Validation(
                "getUser".into(),
                "id is required".into()
            )]
        );
    }

    #[tokio::test]
    async fn test_passing_schema_reaches_handler() {
        let handler = EndpointBuilder::create("getUser", |input, _identity, _environment| {
            async move { Ok::<_, Infallible>(input) }
        })
        .unwrap()
        .set_schema(AcceptEverything)
        .build();

        let (sink, next) = invoke_once(&handler).await;
        assert_eq!(sink.written.len(), 1);
        assert!(next.failures.is_empty());
    }

    #[tokio::test]
    async fn test_no_schema_accepts_any_input_shape() {
        let handler = EndpointBuilder::create("echo", |input, _identity, _environment| {
            async move { Ok::<_, Infallible>(input) }
        })
        .unwrap()
        .set_input_fn(|request: &dyn IRequestView| Ok(request.document().clone()))
        .build();

        let request = JsonRequest::new(json!({"anything": [1, 2, {"nested": true}]}));
        let mut sink = RecordingSink { written: vec![] };
        let mut next = RecordingNext { failures: vec![] };
        handler.invoke(&request, &mut sink, &mut next).await;

        assert_eq!(sink.written, vec![json!({"anything": [1, 2, {"nested": true}]})]);
        assert!(next.failures.is_empty());
    }

    #[tokio::test]
    async fn test_immediate_and_deferred_handler_failures_match() {
        let immediate = EndpointBuilder::create("getUser", |_input, _identity, _environment| {
            async move { Err::<Value, _>(TestFailure) }
        })
        .unwrap()
        .build();

        let deferred = EndpointBuilder::create("getUser", |_input, _identity, _environment| {
            async move {
                tokio::task::yield_now().await;
                Err::<Value, _>(TestFailure)
            }
        })
        .unwrap()
        .build();

        let (_, next_immediate) = invoke_once(&immediate).await;
        let (_, next_deferred) = invoke_once(&deferred).await;

        let expected = || RelayError::Handler("getUser".into(), "TestFailure".into());
        assert_eq!(next_immediate.failures, vec![expected()]);
        assert_eq!(next_deferred.failures, vec![expected()]);
    }

    #[tokio::test]
    async fn test_output_mapper_failure_goes_to_continuation() {
        let handler = EndpointBuilder::create("getUser", |_input, _identity, _environment| {
            async move { Ok::<_, Infallible>(json!({"ok": true})) }
        })
        .unwrap()
        .build();

        let request = JsonRequest::new(json!({}));
        let mut sink = FailingSink;
        let mut next = RecordingNext { failures: vec![] };
        handler.invoke(&request, &mut sink, &mut next).await;

        assert_eq!(
            next.failures,
            vec![RelayError::OutputMapping(
                "getUser".into(),
                "connection reset".into()
            )]
        );
    }

    #[tokio::test]
    async fn test_identity_is_threaded_into_the_handler() {
        let handler = EndpointBuilder::create("whoami", |_input, identity, environment| {
            async move {
                Ok::<_, Infallible>(json!({
                    "request_id": identity.request_id,
                    "logged_id": environment.logger.request_id(),
                }))
            }
        })
        .unwrap()
        .build();

        let (sink, _) = invoke_once(&handler).await;
        let body = &sink.written[0];
        let request_id = body["request_id"].as_str().unwrap();
        assert_eq!(request_id.len(), 12);
        assert_eq!(body["logged_id"], body["request_id"]);
    }

    #[tokio::test]
    async fn test_concurrent_invocations_get_distinct_ids() {
        let handler = Arc::new(
            EndpointBuilder::create("whoami", |_input, identity, _environment| {
                async move { Ok::<_, Infallible>(json!({"request_id": identity.request_id})) }
            })
            .unwrap()
            .build(),
        );

        let mut ids = Vec::new();
        for _ in 0..4 {
            let (sink, _) = invoke_once(&handler).await;
            ids.push(sink.written[0]["request_id"].as_str().unwrap().to_string());
        }
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 4);
    }

    #[tokio::test]
    async fn test_erased_handler_trait_delegates() {
        let handler: Arc<dyn IEndpointHandler> = Arc::new(
            EndpointBuilder::create("getUser", |_input, _identity, _environment| {
                async move { Ok::<_, Infallible>(json!({"ok": true})) }
            })
            .unwrap()
            .build(),
        );

        assert_eq!(handler.name(), "getUser");

        let request = JsonRequest::new(json!({}));
        let mut sink = RecordingSink { written: vec![] };
        let mut next = RecordingNext { failures: vec![] };
        handler.invoke(&request, &mut sink, &mut next).await;
        assert_eq!(sink.written, vec![json!({"ok": true})]);
    }
}
