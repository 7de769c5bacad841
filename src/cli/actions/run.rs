use super::Action;
use crate::{
    probe::{PgConnector, ProbeResult, probe},
    report::{Format, Report},
};
use chrono::Utc;
use std::io;

/// Execute the action's business logic by delegating to the probe
pub async fn execute(action: Action) -> anyhow::Result<()> {
    match action {
        Action::Probe {
            descriptor,
            label,
            format,
            exit_code,
        } => {
            let label = label.as_deref();
            let started = Utc::now();

            let result = match format {
                Format::Text => probe(&PgConnector, &descriptor, label, &mut io::stdout()).await,
                Format::Json => {
                    let result = probe(&PgConnector, &descriptor, label, &mut io::sink()).await;
                    let report = Report::new(&descriptor, label, started, result.clone());
                    report.write_json(&mut io::stdout())?;
                    result
                }
            };

            if let (ProbeResult::Failure(err), true) = (&result, exit_code) {
                let target = label.map_or_else(
                    || "the database".to_string(),
                    |label| format!("the {label} database"),
                );
                anyhow::bail!("probe of {target} failed ({}): {err}", err.kind);
            }

            Ok(())
        }
    }
}
