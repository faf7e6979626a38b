use crate::core::contracts::IEndpointHandler;
use crate::core::error_relay::RelayError;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use once_cell::sync::OnceCell;
use std::sync::Arc;

static ENDPOINT_HANDLERS: OnceCell<DashMap<String, Arc<dyn IEndpointHandler>>> = OnceCell::new();

pub(crate) fn get_handlers() -> &'static DashMap<String, Arc<dyn IEndpointHandler>> {
    ENDPOINT_HANDLERS.get_or_init(DashMap::new)
}

/// Registers a built handler under its name so hosts can look it up when
/// wiring routes. Names are unique per process.
pub fn register(handler: Arc<dyn IEndpointHandler>) -> Result<(), RelayError> {
    let name = handler.name().to_string();

    match get_handlers().entry(name.clone()) {
        Entry::Occupied(_) => Err(RelayError::HandlerRegistered(name)),
        Entry::Vacant(entry) => {
            entry.insert(handler);
            Ok(())
        }
    }
}

/// Looks a registered handler up by name.
pub fn resolve(name: &str) -> Result<Arc<dyn IEndpointHandler>, RelayError> {
    get_handlers()
        .get(name)
        .map(|entry| Arc::clone(entry.value()))
        .ok_or_else(|| RelayError::HandlerNotFound(name.to_string()))
}
