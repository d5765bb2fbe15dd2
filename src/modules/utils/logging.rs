use env_logger::{Builder, Env, WriteStyle};
use log::{info, warn};
use std::fs::OpenOptions;
use std::path::Path;

/// Initialize logging. `RUST_LOG` overrides the default `info` level; with a
/// log file configured, output goes there instead of stderr.
pub fn initialize_logging(log_file: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
    builder
        .format_timestamp_secs()
        .format_module_path(true)
        .write_style(WriteStyle::Auto);

    if let Some(path) = log_file {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.try_init()?;
    info!("Logging system initialized");
    Ok(())
}

/// Mask all but the outer two characters of an identifier
pub(crate) fn format_sensitive(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{}***{}", head, tail)
}

/// Structured line for login/registration events
pub fn log_auth_event(event_type: &str, identifier: &str, success: bool, details: Option<&str>) {
    let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    if success {
        info!(
            "Auth event: type={}, identifier={}, success=true, timestamp={}, details={:?}",
            event_type,
            format_sensitive(identifier),
            timestamp,
            details
        );
    } else {
        warn!(
            "Auth event: type={}, identifier={}, success=false, timestamp={}, details={:?}",
            event_type,
            format_sensitive(identifier),
            timestamp,
            details
        );
    }
}

/// Structured line for gallery changes
pub fn log_gallery_event(operation: &str, resource: &str, success: bool, details: Option<&str>) {
    let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    if success {
        info!(
            "Gallery operation: op={}, resource={}, success=true, timestamp={}, details={:?}",
            operation, resource, timestamp, details
        );
    } else {
        warn!(
            "Gallery operation: op={}, resource={}, success=false, timestamp={}, details={:?}",
            operation, resource, timestamp, details
        );
    }
}
