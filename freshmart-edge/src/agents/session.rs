//! Agent session - the agent logged in on this device
//!
//! Persisted under `currentDeliveryBoy` so a restart keeps the agent logged in.

use shared::error::{AppError, ErrorCode};
use shared::models::DeliveryAgent;
use std::sync::Arc;
use thiserror::Error;

use super::{AgentDirectory, Authenticator};
use crate::storage::PersistentStore;

/// Session errors
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Invalid agent id or password")]
    InvalidCredentials,

    #[error("No delivery agent is logged in")]
    NotLoggedIn,

    #[error("Delivery agent not found: {0}")]
    AgentNotFound(i64),
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::InvalidCredentials => AppError::invalid_credentials(),
            SessionError::NotLoggedIn => AppError::not_authenticated(),
            SessionError::AgentNotFound(id) => super::agent_not_found(id),
        }
    }
}

impl SessionError {
    pub fn code(&self) -> ErrorCode {
        match self {
            SessionError::InvalidCredentials => ErrorCode::InvalidCredentials,
            SessionError::NotLoggedIn => ErrorCode::NotAuthenticated,
            SessionError::AgentNotFound(_) => ErrorCode::AgentNotFound,
        }
    }
}

pub struct AgentSession {
    store: Arc<PersistentStore>,
    directory: AgentDirectory,
    auth: Arc<dyn Authenticator>,
}

impl AgentSession {
    pub fn new(
        store: Arc<PersistentStore>,
        directory: AgentDirectory,
        auth: Arc<dyn Authenticator>,
    ) -> Self {
        Self {
            store,
            directory,
            auth,
        }
    }

    /// Verify credentials, mark the agent online and remember them
    pub fn login(&self, agent_id: i64, secret: &str) -> Result<DeliveryAgent, SessionError> {
        let _guard = self.store.lock();
        let agent = self
            .directory
            .by_id(agent_id)
            .ok_or(SessionError::InvalidCredentials)?;
        if !self.auth.verify(&agent, secret) {
            tracing::warn!(agent_id, "Agent login rejected");
            return Err(SessionError::InvalidCredentials);
        }

        let agent = self
            .directory
            .set_online(agent_id, true)
            .map_err(|_| SessionError::AgentNotFound(agent_id))?;
        self.store.set_current_agent(Some(&agent));

        tracing::info!(agent_id, name = %agent.name, "Agent logged in");
        Ok(agent)
    }

    /// Mark the current agent offline and forget them
    pub fn logout(&self) -> Result<(), SessionError> {
        let _guard = self.store.lock();
        let current = self.store.current_agent().ok_or(SessionError::NotLoggedIn)?;
        if let Err(e) = self.directory.set_online(current.id, false) {
            // 配送员已被移除，仍然清除会话
            tracing::warn!(agent_id = current.id, error = %e, "Logged-in agent missing from directory");
        }
        self.store.set_current_agent(None);

        tracing::info!(agent_id = current.id, "Agent logged out");
        Ok(())
    }

    /// Flip the current agent's online flag
    pub fn toggle_online(&self) -> Result<DeliveryAgent, SessionError> {
        let _guard = self.store.lock();
        let current = self.current().ok_or(SessionError::NotLoggedIn)?;
        self.directory
            .set_online(current.id, !current.online)
            .map_err(|_| SessionError::AgentNotFound(current.id))
    }

    /// Current agent, refreshed from the directory
    pub fn current(&self) -> Option<DeliveryAgent> {
        let current = self.store.current_agent()?;
        Some(self.directory.by_id(current.id).unwrap_or(current))
    }
}
