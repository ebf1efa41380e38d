use std::fmt;

/// Measurement system requested from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Units {
    Metric,
    Imperial,
}

impl Units {
    /// Parse a user answer: `C` or `F`, case-insensitive, surrounding
    /// whitespace ignored.
    pub fn from_choice(choice: &str) -> Option<Self> {
        match choice.trim().to_uppercase().as_str() {
            "C" => Some(Units::Metric),
            "F" => Some(Units::Imperial),
            _ => None,
        }
    }

    /// Value of the `units` query parameter.
    pub fn api_token(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Units::Metric => "°C",
            Units::Imperial => "°F",
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.api_token())
    }
}
