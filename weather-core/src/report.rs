use chrono::{DateTime, Local, TimeZone};
use serde_json::Value;
use std::{fmt::Display, io::Write};

const HEADER: &str = "=== Current Weather ===";
const FOOTER: &str = "=======================";
const NOT_AVAILABLE: &str = "N/A";

/// Printable view of one current-weather response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherReport {
    pub city: String,
    pub country: String,
    pub condition: String,
    pub temperature: String,
    pub humidity: String,
    pub wind_speed: String,
    pub sunrise: Option<String>,
    pub sunset: Option<String>,
}

impl WeatherReport {
    /// Build a report with sunrise/sunset in the machine's local time.
    pub fn from_json(data: &Value) -> Self {
        Self::from_json_in(data, &Local)
    }

    /// Build a report, rendering sunrise/sunset in `tz`.
    pub fn from_json_in<Tz>(data: &Value, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let text_or = |pointer: &str, default: &str| {
            lookup(data, pointer).map(display_value).unwrap_or_else(|| default.to_string())
        };
        let clock = |pointer: &str| {
            lookup(data, pointer).and_then(epoch_seconds).and_then(|ts| clock_time(ts, tz))
        };

        Self {
            city: text_or("/name", "Unknown"),
            country: text_or("/sys/country", NOT_AVAILABLE),
            condition: title_case(&text_or("/weather/0/description", NOT_AVAILABLE)),
            temperature: text_or("/main/temp", NOT_AVAILABLE),
            humidity: text_or("/main/humidity", NOT_AVAILABLE),
            wind_speed: text_or("/wind/speed", NOT_AVAILABLE),
            sunrise: clock("/sys/sunrise"),
            sunset: clock("/sys/sunset"),
        }
    }

    /// Write the report block; `symbol` follows the temperature.
    pub fn render<W: Write>(&self, out: &mut W, symbol: &str) -> std::io::Result<()> {
        writeln!(out)?;
        writeln!(out, "{HEADER}")?;
        writeln!(out, "Location: {}, {}", self.city, self.country)?;
        writeln!(out, "Condition: {}", self.condition)?;
        writeln!(out, "Temperature: {} {symbol}", self.temperature)?;
        writeln!(out, "Humidity: {}%", self.humidity)?;
        writeln!(out, "Wind Speed: {}", self.wind_speed)?;
        writeln!(out, "Sunrise: {}", self.sunrise.as_deref().unwrap_or_default())?;
        writeln!(out, "Sunset: {}", self.sunset.as_deref().unwrap_or_default())?;
        writeln!(out, "{FOOTER}")?;
        writeln!(out)
    }
}

/// Field at a JSON pointer, with `null` treated as absent.
pub fn lookup<'a>(data: &'a Value, pointer: &str) -> Option<&'a Value> {
    data.pointer(pointer).filter(|v| !v.is_null())
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Unix seconds; zero counts as "no timestamp".
fn epoch_seconds(value: &Value) -> Option<i64> {
    let ts = value.as_i64().or_else(|| value.as_f64().map(|f| f as i64))?;
    (ts != 0).then_some(ts)
}

fn clock_time<Tz>(ts: i64, tz: &Tz) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    DateTime::from_timestamp(ts, 0).map(|utc| utc.with_timezone(tz).format("%H:%M:%S").to_string())
}

/// Upper-case the first letter of every alphabetic run, lower-case the rest.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_alpha = false;

    for c in text.chars() {
        if prev_alpha {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        prev_alpha = c.is_alphabetic();
    }

    out
}
