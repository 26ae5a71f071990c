//! Instant answers via the DuckDuckGo zero-click API.

use adda_types::error::CommandError;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct InstantAnswer {
    #[serde(rename = "Answer")]
    answer: String,
    #[serde(rename = "AbstractText")]
    abstract_text: String,
    #[serde(rename = "AbstractURL")]
    abstract_url: String,
    #[serde(rename = "RelatedTopics")]
    related_topics: Vec<RelatedTopic>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RelatedTopic {
    #[serde(rename = "Text")]
    text: String,
}

pub(super) async fn instant_answer(
    client: &reqwest::Client,
    query: &str,
) -> Result<String, CommandError> {
    let query = query.trim();
    if query.is_empty() {
        return Ok("Tell me what to search for.".to_string());
    }

    let response = client
        .get("https://api.duckduckgo.com/")
        .query(&[
            ("q", query),
            ("format", "json"),
            ("no_html", "1"),
            ("skip_disambig", "1"),
        ])
        .timeout(super::COMMAND_TIMEOUT)
        .send()
        .await
        .map_err(|e| CommandError::Network {
            service: "search",
            message: e.to_string(),
        })?;

    if !response.status().is_success() {
        return Err(CommandError::Service {
            service: "search",
            status: response.status().as_u16(),
        });
    }

    let answer: InstantAnswer = response.json().await.map_err(|e| CommandError::Malformed {
        service: "search",
        message: e.to_string(),
    })?;

    Ok(format_answer(query, &answer))
}

fn format_answer(query: &str, answer: &InstantAnswer) -> String {
    if !answer.answer.trim().is_empty() {
        return answer.answer.trim().to_string();
    }
    if !answer.abstract_text.trim().is_empty() {
        let text = answer.abstract_text.trim();
        if answer.abstract_url.trim().is_empty() {
            return text.to_string();
        }
        return format!("{} ({})", text, answer.abstract_url.trim());
    }
    if let Some(topic) = answer
        .related_topics
        .iter()
        .find(|t| !t.text.trim().is_empty())
    {
        return topic.text.trim().to_string();
    }
    format!("No quick answer for \"{query}\".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_answer_wins() {
        let answer: InstantAnswer = serde_json::from_str(
            r#"{"Answer": "42", "AbstractText": "The number.", "AbstractURL": "https://e.org"}"#,
        )
        .unwrap();
        assert_eq!(format_answer("q", &answer), "42");
    }

    #[test]
    fn abstract_carries_its_source_url() {
        let answer: InstantAnswer = serde_json::from_str(
            r#"{"AbstractText": "Rust is a systems language.", "AbstractURL": "https://rust-lang.org"}"#,
        )
        .unwrap();
        assert_eq!(
            format_answer("rust", &answer),
            "Rust is a systems language. (https://rust-lang.org)"
        );
    }

    #[test]
    fn falls_back_to_first_related_topic() {
        let answer: InstantAnswer = serde_json::from_str(
            r#"{"RelatedTopics": [{"Text": ""}, {"Text": "Adda - a Bengali word for chat."}]}"#,
        )
        .unwrap();
        assert_eq!(
            format_answer("adda", &answer),
            "Adda - a Bengali word for chat."
        );
    }

    #[test]
    fn empty_payload_names_the_query() {
        let answer: InstantAnswer = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(
            format_answer("nothing", &answer),
            "No quick answer for \"nothing\"."
        );
    }
}
