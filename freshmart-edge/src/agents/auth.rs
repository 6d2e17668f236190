//! Agent credential verification

use shared::models::DeliveryAgent;

/// Verifies an agent's login secret
pub trait Authenticator: Send + Sync {
    fn verify(&self, agent: &DeliveryAgent, secret: &str) -> bool;
}

/// Compares against the agent's stored demo password.
///
/// The password travels in the synced dataset in plain text, so this is a
/// convenience gate for the demo, not a security boundary.
#[derive(Debug, Clone, Copy, Default)]
pub struct SharedSecretAuthenticator;

impl Authenticator for SharedSecretAuthenticator {
    fn verify(&self, agent: &DeliveryAgent, secret: &str) -> bool {
        !agent.password.is_empty() && agent.password == secret
    }
}
