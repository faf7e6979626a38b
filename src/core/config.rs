/// Alias used when the process environment does not select one.
pub const DEFAULT_ENVIRONMENT: &str = "development";

/// Process variable consulted by [`environment_from_env`].
pub const ENVIRONMENT_VAR: &str = "RELAY_ENVIRONMENT";

/// Deployment alias from the process environment, with the fixed default.
///
/// The pipeline never consults the process environment on its own; hosts that
/// want env-driven configuration call this and pass the result to
/// `EndpointBuilder::set_environment`.
pub fn environment_from_env() -> String {
    std::env::var(ENVIRONMENT_VAR).unwrap_or_else(|_| DEFAULT_ENVIRONMENT.to_string())
}
