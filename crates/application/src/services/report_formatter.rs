//! Report formatting
//!
//! Renders a [`ForecastReport`] as a single chat line. Chat relays post one
//! message per line, so the conditions block is kept on the same line.

use crate::ports::CurrentConditions;
use crate::services::ForecastReport;

/// Separator between fields of the conditions block
const FIELD_SEPARATOR: &str = " · ";

/// Format a report for posting
///
/// Without conditions this is exactly the forecast (or fallback) text.
#[must_use]
pub fn format_report(report: &ForecastReport) -> String {
    match &report.conditions {
        Some(conditions) => format!("{} {}", report.forecast, format_conditions(conditions)),
        None => report.forecast.clone(),
    }
}

fn format_conditions(conditions: &CurrentConditions) -> String {
    let mut fields = vec![format!("Now: {}", conditions.summary)];

    if let Some(temperature) = &conditions.temperature {
        fields.push(temperature.to_string());
    }

    match (&conditions.wind_direction, &conditions.wind_speed) {
        (Some(direction), Some(speed)) => fields.push(format!("wind {direction} {speed}")),
        (None, Some(speed)) => fields.push(format!("wind {speed}")),
        _ => {},
    }

    if let Some(pressure) = &conditions.pressure {
        fields.push(pressure.to_string());
    }

    if let Some(precipitation) = &conditions.precipitation_24h {
        fields.push(format!("{precipitation} past 24h"));
    }

    if let Some(link) = &conditions.link {
        fields.push(link.clone());
    }

    format!("({})", fields.join(FIELD_SEPARATOR))
}
