//! Current weather via wttr.in.
//!
//! wttr.in needs no API key; the `j1` format returns structured JSON.

use serde::Deserialize;

use adda_types::error::CommandError;

const SERVICE: &str = "wttr.in";

#[derive(Deserialize)]
struct WttrReport {
    #[serde(default)]
    current_condition: Vec<WttrCondition>,
}

#[derive(Deserialize)]
struct WttrCondition {
    #[serde(rename = "temp_C")]
    temp_c: String,
    #[serde(rename = "FeelsLikeC")]
    feels_like_c: String,
    humidity: String,
    #[serde(rename = "weatherDesc", default)]
    description: Vec<WttrText>,
}

#[derive(Deserialize)]
struct WttrText {
    value: String,
}

/// Fetch the current weather for `city` and format a one-line reply.
pub(super) async fn current(client: &reqwest::Client, city: &str) -> Result<String, CommandError> {
    let url = format!("https://wttr.in/{}?format=j1", city.replace(' ', "+"));

    let response = client
        .get(&url)
        .timeout(super::COMMAND_TIMEOUT)
        .send()
        .await
        .map_err(|e| CommandError::Network {
            service: SERVICE,
            message: e.to_string(),
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(CommandError::Service {
            service: SERVICE,
            status: status.as_u16(),
        });
    }

    let report: WttrReport = response.json().await.map_err(|e| CommandError::Malformed {
        service: SERVICE,
        message: e.to_string(),
    })?;

    format_report(city, &report)
}

fn format_report(city: &str, report: &WttrReport) -> Result<String, CommandError> {
    let current = report
        .current_condition
        .first()
        .ok_or(CommandError::Malformed {
            service: SERVICE,
            message: "no current_condition in response".to_string(),
        })?;

    let description = current
        .description
        .first()
        .map(|d| d.value.as_str())
        .unwrap_or("Unknown conditions");

    Ok(format!(
        "Weather in {city}: {description}, {}°C (feels like {}°C), humidity {}%",
        current.temp_c, current.feels_like_c, current.humidity
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_the_current_condition() {
        let report: WttrReport = serde_json::from_str(
            r#"{
                "current_condition": [{
                    "temp_C": "31",
                    "FeelsLikeC": "36",
                    "humidity": "74",
                    "weatherDesc": [{"value": "Partly cloudy"}]
                }]
            }"#,
        )
        .unwrap();

        let reply = format_report("Chittagong", &report).unwrap();
        assert_eq!(
            reply,
            "Weather in Chittagong: Partly cloudy, 31°C (feels like 36°C), humidity 74%"
        );
    }

    #[test]
    fn missing_condition_is_malformed() {
        let report: WttrReport = serde_json::from_str(r#"{"current_condition": []}"#).unwrap();
        assert!(matches!(
            format_report("Dhaka", &report),
            Err(CommandError::Malformed { .. })
        ));
    }

    #[test]
    fn missing_description_still_formats() {
        let report: WttrReport = serde_json::from_str(
            r#"{"current_condition": [{"temp_C": "20", "FeelsLikeC": "19", "humidity": "50"}]}"#,
        )
        .unwrap();

        let reply = format_report("Dhaka", &report).unwrap();
        assert!(reply.contains("Unknown conditions"));
    }
}
