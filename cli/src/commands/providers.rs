//! `summon providers`: list the registered cloud providers.

use anyhow::Result;
use std::process::ExitCode;

use crate::app::AppContext;
use crate::domain::provider::SCHEMA;

/// Run the providers command.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn run(app: &AppContext) -> Result<ExitCode> {
    if app.is_json() {
        let list: Vec<_> = SCHEMA
            .iter()
            .map(|(tag, kind)| {
                serde_json::json!({
                    "cloud-type": tag,
                    "provider": kind.name(),
                    "auth-type": kind.auth_type(),
                    "fields": crate::domain::provider::Provider::new(*kind)
                        .fields()
                        .iter()
                        .map(|f| f.key.clone())
                        .collect::<Vec<_>>(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&list)?);
    } else {
        app.renderer().render_providers();
    }
    Ok(ExitCode::SUCCESS)
}
