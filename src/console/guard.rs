//! Connection-state checks run before a command touches the endpoint.
//!
//! Every check asks the endpoint at call time. Nothing is cached, so a peer
//! dropping the connection is visible to the very next command.

use super::command::{CommandError, Role};
use crate::endpoint::{ClientEndpoint, ServerEndpoint};

/// Whether the endpoint is connected (client) or listening (server).
pub fn is_active<R: Role>(endpoint: &R::Endpoint) -> bool {
    R::is_active(endpoint)
}

/// Reject a host or port change while the endpoint is active.
pub fn ensure_inactive<R: Role>(
    endpoint: &R::Endpoint,
    field: &'static str,
) -> Result<(), CommandError> {
    if is_active::<R>(endpoint) {
        return Err(CommandError::EndpointActive { field });
    }
    Ok(())
}

/// Reject a login while a connection is already open.
pub fn ensure_not_connected(endpoint: &dyn ClientEndpoint) -> Result<(), CommandError> {
    if endpoint.is_connected() {
        return Err(CommandError::AlreadyConnected);
    }
    Ok(())
}

/// Reject a start while the server is already listening.
pub fn ensure_not_listening(endpoint: &dyn ServerEndpoint) -> Result<(), CommandError> {
    if endpoint.is_listening() {
        return Err(CommandError::AlreadyListening);
    }
    Ok(())
}
