pub mod add;
pub mod history;
pub mod import;
pub mod run;
pub mod tags;

use anyhow::Result;
use services::{Access, AccessGate, AppServices, Clock, QuizConfig};

/// Resolved configuration plus the secrets the operator submitted.
pub struct Context {
    pub config: QuizConfig,
    pub access_key: Option<String>,
    pub password: Option<String>,
}

impl Context {
    pub async fn services(&self) -> Result<AppServices> {
        Ok(AppServices::from_config(&self.config, Clock::default()).await?)
    }

    /// Check the submitted secrets against the gate.
    pub fn access(&self, gate: &AccessGate) -> Access {
        let mut access = Access::default();
        if let Some(key) = &self.access_key {
            gate.unlock_generator(&mut access, key);
        }
        if let Some(password) = &self.password {
            gate.authenticate(&mut access, password);
        }
        access
    }
}
