//! Book lookup via the Open Library search API.

use adda_types::error::CommandError;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct BookPage {
    #[serde(default)]
    docs: Vec<BookDoc>,
}

#[derive(Debug, Deserialize)]
struct BookDoc {
    title: String,
    #[serde(default)]
    author_name: Vec<String>,
    first_publish_year: Option<i32>,
}

pub(super) async fn lookup(client: &reqwest::Client, query: &str) -> Result<String, CommandError> {
    let query = query.trim();
    if query.is_empty() {
        return Ok("Tell me a title or author to look for.".to_string());
    }

    let response = client
        .get("https://openlibrary.org/search.json")
        .query(&[("q", query), ("limit", "5")])
        .timeout(super::COMMAND_TIMEOUT)
        .send()
        .await
        .map_err(|e| CommandError::Network {
            service: "book",
            message: e.to_string(),
        })?;

    if !response.status().is_success() {
        return Err(CommandError::Service {
            service: "book",
            status: response.status().as_u16(),
        });
    }

    let page: BookPage = response.json().await.map_err(|e| CommandError::Malformed {
        service: "book",
        message: e.to_string(),
    })?;

    Ok(format_books(query, &page))
}

fn format_books(query: &str, page: &BookPage) -> String {
    if page.docs.is_empty() {
        return format!("No books found for \"{query}\".");
    }

    let mut lines = vec![format!("Books matching \"{query}\":")];
    for (index, doc) in page.docs.iter().enumerate() {
        let mut line = format!("{}. {}", index + 1, doc.title);
        if let Some(author) = doc.author_name.first() {
            line.push_str(&format!(" by {author}"));
        }
        if let Some(year) = doc.first_publish_year {
            line.push_str(&format!(" ({year})"));
        }
        lines.push(line);
    }
    lines.join("\n")
}
