use rand::Rng;
use rand::distributions::Alphanumeric;

const REQUEST_ID_LEN: usize = 12;

/// Correlation token handed to the business-logic function as its second
/// argument, for propagation into downstream logs and calls.
#[derive(Clone, Debug)]
pub struct RequestIdentity {
    pub request_id: String,
}

/// Per-invocation environment: the deployment alias and a logger scoped to
/// the handler and request.
#[derive(Clone, Debug)]
pub struct Environment {
    pub alias: String,
    pub logger: ScopedLogger,
}

/// Leveled logger that stamps `handler` and `request_id` as structured fields
/// on every record it emits.
#[derive(Clone, Debug)]
pub struct ScopedLogger {
    handler: String,
    request_id: String,
}

impl ScopedLogger {
    pub(crate) fn new(handler: &str, request_id: &str) -> Self {
        Self {
            handler: handler.to_string(),
            request_id: request_id.to_string(),
        }
    }

    pub fn handler(&self) -> &str {
        &self.handler
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn trace(&self, message: &str) {
        tracing::trace!(handler = %self.handler, request_id = %self.request_id, "{message}");
    }

    pub fn info(&self, message: &str) {
        tracing::info!(handler = %self.handler, request_id = %self.request_id, "{message}");
    }

    pub fn warn(&self, message: &str) {
        tracing::warn!(handler = %self.handler, request_id = %self.request_id, "{message}");
    }

    pub fn error(&self, message: &str) {
        tracing::error!(handler = %self.handler, request_id = %self.request_id, "{message}");
    }
}

/// State owned by exactly one invocation, never shared across requests.
pub(crate) struct InvocationContext {
    pub(crate) identity: RequestIdentity,
    pub(crate) environment: Environment,
}

impl InvocationContext {
    pub(crate) fn new(handler: &str, alias: &str) -> Self {
        let request_id = generate_request_id();
        let logger = ScopedLogger::new(handler, &request_id);
        Self {
            identity: RequestIdentity { request_id },
            environment: Environment {
                alias: alias.to_string(),
                logger,
            },
        }
    }
}

/// Random short id for tracing. Collisions are unlikely but not impossible;
/// nothing may key correctness on uniqueness.
fn generate_request_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(REQUEST_ID_LEN)
        .map(char::from)
        .collect()
}
