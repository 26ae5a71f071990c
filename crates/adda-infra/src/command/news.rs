//! Top headlines via the NewsAPI `top-headlines` endpoint.

use adda_types::error::CommandError;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct NewsPage {
    #[serde(default)]
    articles: Vec<NewsArticle>,
}

#[derive(Debug, Deserialize)]
struct NewsArticle {
    title: String,
    source: Option<NewsSource>,
}

#[derive(Debug, Deserialize)]
struct NewsSource {
    name: Option<String>,
}

pub(super) async fn headlines(
    client: &reqwest::Client,
    api_key: Option<&SecretString>,
    key_env: &str,
) -> Result<String, CommandError> {
    let Some(key) = api_key else {
        return Err(CommandError::MissingApiKey(key_env.to_string()));
    };

    let response = client
        .get("https://newsapi.org/v2/top-headlines")
        .query(&[("language", "en"), ("pageSize", "5")])
        .header("X-Api-Key", key.expose_secret())
        .timeout(super::COMMAND_TIMEOUT)
        .send()
        .await
        .map_err(|e| CommandError::Network {
            service: "news",
            message: e.to_string(),
        })?;

    if !response.status().is_success() {
        return Err(CommandError::Service {
            service: "news",
            status: response.status().as_u16(),
        });
    }

    let page: NewsPage = response.json().await.map_err(|e| CommandError::Malformed {
        service: "news",
        message: e.to_string(),
    })?;

    Ok(format_headlines(&page))
}

fn format_headlines(page: &NewsPage) -> String {
    if page.articles.is_empty() {
        return "No headlines right now.".to_string();
    }

    let mut lines = vec!["Top headlines:".to_string()];
    for (index, article) in page.articles.iter().enumerate() {
        let source = article
            .source
            .as_ref()
            .and_then(|s| s.name.as_deref())
            .unwrap_or("unknown source");
        lines.push(format!("{}. {} ({})", index + 1, article.title, source));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_headlines_with_sources() {
        let page: NewsPage = serde_json::from_str(
            r#"{
                "articles": [
                    {"title": "Flood warning issued", "source": {"name": "BBC"}},
                    {"title": "Markets rally", "source": null}
                ]
            }"#,
        )
        .unwrap();

        let text = format_headlines(&page);
        assert_eq!(
            text,
            "Top headlines:\n1. Flood warning issued (BBC)\n2. Markets rally (unknown source)"
        );
    }

    #[test]
    fn empty_feed_has_a_fallback_line() {
        let page: NewsPage = serde_json::from_str(r#"{"articles": []}"#).unwrap();
        assert_eq!(format_headlines(&page), "No headlines right now.");
    }

    #[test]
    fn missing_articles_field_defaults_to_empty() {
        let page: NewsPage = serde_json::from_str(r#"{"status": "ok"}"#).unwrap();
        assert!(page.articles.is_empty());
    }
}
