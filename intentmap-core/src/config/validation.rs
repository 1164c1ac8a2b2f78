use crate::config::schema::Config;
use crate::error::{Error, Result};
use crate::layout::LayoutConstants;

pub fn validate_config(config: &Config) -> Result<()> {
    if config.logging.level.trim().is_empty() {
        return Err(Error::Validation("logging level cannot be empty".to_owned()));
    }

    validate_layout("layout.intent", &config.layout.intent_constants())?;
    validate_layout("layout.routing", &config.layout.routing_constants())?;

    if config.session.request_timeout_secs == 0 {
        return Err(Error::Validation(
            "session.request_timeout_secs must be greater than zero".to_owned(),
        ));
    }

    if config.workflow.export_version.trim().is_empty() {
        return Err(Error::Validation(
            "workflow.export_version cannot be empty".to_owned(),
        ));
    }

    if !config.workflow.paste_offset.is_finite() || config.workflow.paste_offset <= 0.0 {
        return Err(Error::Validation(format!(
            "workflow.paste_offset must be a positive number, got {}",
            config.workflow.paste_offset
        )));
    }

    Ok(())
}

fn validate_layout(section: &str, constants: &LayoutConstants) -> Result<()> {
    for (name, value) in [
        ("column_spacing", constants.column_spacing),
        ("row_spacing", constants.row_spacing),
    ] {
        if !value.is_finite() || value <= 0.0 {
            return Err(Error::Validation(format!(
                "{section}.{name} must be a positive number, got {value}"
            )));
        }
    }

    for (name, value) in [
        ("start_x", constants.start_x),
        ("start_y", constants.start_y),
        ("group_gap", constants.group_gap),
    ] {
        if !value.is_finite() {
            return Err(Error::Validation(format!(
                "{section}.{name} must be finite, got {value}"
            )));
        }
    }

    if constants.group_gap < 0.0 {
        return Err(Error::Validation(format!(
            "{section}.group_gap cannot be negative"
        )));
    }

    Ok(())
}
