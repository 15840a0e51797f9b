//! Mock weather report.

use crate::extract::Params;
use crate::tools::{ToolContext, ToolOutput};
use crate::types::Result;
use serde_json::json;

pub const DEFAULT_LOCATION: &str = "your location";

pub fn get_weather(_ctx: &ToolContext, params: &Params) -> Result<ToolOutput> {
    let location = params
        .text("location")
        .filter(|l| !l.trim().is_empty())
        .unwrap_or(DEFAULT_LOCATION);

    let message = format!(
        "🌤️ **Weather for {location}:**\n\n\
         **Current Conditions:**\n\
         - Temperature: 72°F (22°C)\n\
         - Condition: Partly Cloudy\n\
         - Humidity: 65%\n\
         - Wind: 8 mph NW\n\n\
         **Today's Forecast:**\n\
         - High: 78°F (26°C)\n\
         - Low: 65°F (18°C)\n\
         - Chance of Rain: 20%\n\n\
         *Mock weather data for demonstration.*"
    );

    Ok(ToolOutput::new(
        json!({
            "location": location,
            "temperature_c": 22,
            "condition": "Partly Cloudy",
            "humidity": 65,
            "high_c": 26,
            "low_c": 18,
            "mock": true,
        }),
        message,
    ))
}
