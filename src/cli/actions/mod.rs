mod run;

use crate::{descriptor::ConnectionDescriptor, report::Format};

/// Action enum representing each possible command
#[derive(Debug)]
pub enum Action {
    Probe {
        descriptor: ConnectionDescriptor,
        label: Option<String>,
        format: Format,
        exit_code: bool,
    },
}

impl Action {
    /// Execute the action
    ///
    /// # Errors
    ///
    /// Returns an error if the probe fails and `exit_code` was requested, or
    /// if the report can't be written
    pub async fn execute(self) -> anyhow::Result<()> {
        run::execute(self).await
    }
}
