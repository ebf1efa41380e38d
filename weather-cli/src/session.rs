//! Interactive loop: ask for a city, ask for units, fetch, print, repeat.

use anyhow::Result;
use std::io::Write;
use tracing::{debug, info};
use weather_core::{ApiKey, Units, WeatherError, WeatherProvider, WeatherReport};

use crate::prompter::Prompter;

pub const BANNER: &str = "🌦️ Console Weather App (OpenWeatherMap)";
pub const CITY_PROMPT: &str = "Enter a city name (or type 'exit' to quit):";
pub const UNITS_PROMPT: &str = "Choose units (C for Celsius, F for Fahrenheit):";
pub const INVALID_UNITS: &str = "Invalid choice. Please enter C or F.";
pub const FAREWELL: &str = "Goodbye!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The user typed `exit` or closed a prompt.
    Farewell,
    /// No API key; the loop never started.
    MissingCredential,
}

/// Print the banner and run the loop if a credential is available.
pub async fn start<P: Prompter, W: Write>(
    credential: Result<ApiKey, WeatherError>,
    provider: &dyn WeatherProvider,
    prompter: &mut P,
    out: &mut W,
) -> Result<SessionEnd> {
    writeln!(out, "{BANNER}\n")?;

    let api_key = match credential {
        Ok(key) => key,
        Err(e) => {
            writeln!(out, "❌ {e}")?;
            return Ok(SessionEnd::MissingCredential);
        }
    };

    Session::new(provider, &api_key, prompter, out).run().await?;
    Ok(SessionEnd::Farewell)
}

/// Ask until the answer is `C` or `F`. `None` if the user closes the prompt.
pub fn select_units<P: Prompter, W: Write>(
    prompter: &mut P,
    out: &mut W,
) -> Result<Option<Units>> {
    loop {
        let Some(answer) = prompter.text(UNITS_PROMPT)? else {
            return Ok(None);
        };

        if let Some(units) = Units::from_choice(&answer) {
            return Ok(Some(units));
        }

        writeln!(out, "{INVALID_UNITS}")?;
    }
}

pub struct Session<'a, P, W> {
    provider: &'a dyn WeatherProvider,
    api_key: &'a ApiKey,
    prompter: &'a mut P,
    out: &'a mut W,
}

impl<'a, P: Prompter, W: Write> Session<'a, P, W> {
    pub fn new(
        provider: &'a dyn WeatherProvider,
        api_key: &'a ApiKey,
        prompter: &'a mut P,
        out: &'a mut W,
    ) -> Self {
        Self { provider, api_key, prompter, out }
    }

    /// Loop until the user leaves. Fetch errors are printed and the loop
    /// goes on; prompt or output failures end it.
    pub async fn run(self) -> Result<()> {
        let Session { provider, api_key, prompter, out } = self;

        loop {
            let Some(answer) = prompter.text(CITY_PROMPT)? else {
                debug!("city prompt closed");
                break;
            };

            let city = answer.trim();
            if city.eq_ignore_ascii_case("exit") {
                break;
            }

            let Some(units) = select_units(prompter, out)? else {
                debug!("units prompt closed");
                break;
            };

            match provider.current_weather(city, api_key, units).await {
                Ok(data) => WeatherReport::from_json(&data).render(out, units.symbol())?,
                Err(e) => {
                    info!(city, error = %e, "weather lookup failed");
                    writeln!(out, "❌ Error: {e}")?;
                }
            }
        }

        writeln!(out, "{FAREWELL}")?;
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::fake::FakeProvider;
    use super::*;
    use crate::prompter::scripted::ScriptedPrompter;
    use serde_json::json;

    async fn run_script(
        provider: &FakeProvider,
        prompter: &mut ScriptedPrompter,
    ) -> (SessionEnd, String) {
        let mut out = Vec::new();
        let end = start(Ok(ApiKey::new("KEY")), provider, prompter, &mut out)
            .await
            .expect("session must not fail");
        (end, String::from_utf8(out).unwrap())
    }

    #[test]
    fn units_accept_both_cases() {
        let cases = [
            ("c", Units::Metric),
            ("C", Units::Metric),
            ("f", Units::Imperial),
            ("F", Units::Imperial),
        ];

        for (answer, expected) in cases {
            let mut prompter = ScriptedPrompter::new(&[answer]);
            let mut out = Vec::new();

            let units = select_units(&mut prompter, &mut out).unwrap();

            assert_eq!(units, Some(expected));
            assert!(out.is_empty());
        }
    }

    #[test]
    fn invalid_unit_reprompts() {
        let mut prompter = ScriptedPrompter::new(&["x", "kelvin", "f"]);
        let mut out = Vec::new();

        let units = select_units(&mut prompter, &mut out).unwrap();

        assert_eq!(units, Some(Units::Imperial));
        assert_eq!(prompter.asked, vec![UNITS_PROMPT; 3]);
        assert_eq!(String::from_utf8(out).unwrap().matches(INVALID_UNITS).count(), 2);
    }

    #[tokio::test]
    async fn missing_credential_never_prompts() {
        let provider = FakeProvider::default();
        let mut prompter = ScriptedPrompter::default();
        let mut out = Vec::new();

        let err = WeatherError::Configuration("No API key found.".into());
        let end = start(Err(err), &provider, &mut prompter, &mut out).await.unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(end, SessionEnd::MissingCredential);
        assert!(text.contains("❌ No API key found."));
        assert!(prompter.asked.is_empty());
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn env_key_starts_session_despite_broken_config() {
        let provider = FakeProvider::default();
        let mut prompter = ScriptedPrompter::new(&["exit"]);
        let mut out = Vec::new();

        let credential = ApiKey::resolve_with(Some("abc".into()), || {
            Err(anyhow::anyhow!("Failed to parse config file: invalid array"))
        });
        let end = start(credential, &provider, &mut prompter, &mut out).await.unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(end, SessionEnd::Farewell);
        assert!(text.starts_with(BANNER));
        assert!(text.contains(FAREWELL));
        assert_eq!(prompter.asked, vec![CITY_PROMPT]);
    }

    #[tokio::test]
    async fn exit_first_makes_no_request() {
        let provider = FakeProvider::default();
        let mut prompter = ScriptedPrompter::new(&["EXIT"]);

        let (end, text) = run_script(&provider, &mut prompter).await;

        assert_eq!(end, SessionEnd::Farewell);
        assert!(text.starts_with(BANNER));
        assert!(text.trim_end().ends_with(FAREWELL));
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn failed_lookup_keeps_session_alive() {
        let provider = FakeProvider::new(vec![Err(WeatherError::CityNotFound)]);
        let mut prompter = ScriptedPrompter::new(&["Atlantis", "c", "exit"]);

        let (_, text) = run_script(&provider, &mut prompter).await;

        assert_eq!(text.matches("❌ Error: City not found.").count(), 1);
        assert_eq!(text.matches(FAREWELL).count(), 1);
        assert!(text.find("City not found").unwrap() < text.find(FAREWELL).unwrap());
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn successful_lookup_prints_report_with_symbol() {
        let body = json!({
            "name": "Paris",
            "main": { "temp": 64 },
            "weather": [{ "description": "clear sky" }]
        });
        let provider = FakeProvider::new(vec![Ok(body)]);
        let mut prompter = ScriptedPrompter::new(&["  Paris ", "F", "exit"]);

        let (_, text) = run_script(&provider, &mut prompter).await;

        assert!(text.contains("=== Current Weather ==="));
        assert!(text.contains("Location: Paris, N/A"));
        assert!(text.contains("Temperature: 64 °F"));
        assert_eq!(*provider.last_units.lock().unwrap(), Some(Units::Imperial));
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn closing_a_prompt_ends_the_session() {
        let provider = FakeProvider::default();
        let mut prompter = ScriptedPrompter::new(&["Paris"]).then_closed();

        let (end, text) = run_script(&provider, &mut prompter).await;

        assert_eq!(end, SessionEnd::Farewell);
        assert!(text.contains(FAREWELL));
        assert_eq!(provider.calls(), 0);
    }
}
