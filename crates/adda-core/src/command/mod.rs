//! Command interception.
//!
//! Before any provider is contacted, the latest user turn is scanned for
//! trigger phrases, Bengali or English. A match short-circuits the
//! request to a local handler; handler failure is terminal for that
//! request and never falls back to the provider chain.

pub mod handler;

use adda_types::command::Command;
use adda_types::config::CommandTable;
use adda_types::llm::{ChatMessage, MessageRole};

/// Scan `text` for a command trigger.
///
/// Detection order is fixed: weather, news, book, search. The first
/// matching category wins; triggers are never combined. Matching is
/// case-insensitive substring containment.
pub fn detect(text: &str, table: &CommandTable) -> Option<Command> {
    if first_trigger(text, &table.weather_triggers).is_some() {
        let city = table
            .cities
            .iter()
            .find(|alias| find_ignore_case(text, &alias.keyword).is_some())
            .map(|alias| alias.city.clone())
            .unwrap_or_else(|| table.default_city.clone());
        return Some(Command::Weather { city });
    }

    if first_trigger(text, &table.news_triggers).is_some() {
        return Some(Command::News);
    }

    if let Some(range) = first_trigger(text, &table.book_triggers) {
        return Some(Command::Book {
            query: strip_range(text, range),
        });
    }

    if let Some(range) = first_trigger(text, &table.search_triggers) {
        return Some(Command::Search {
            query: strip_range(text, range),
        });
    }

    None
}

/// Find the newest user turn in `conversation` and scan it for a command.
pub fn intercept(conversation: &[ChatMessage], table: &CommandTable) -> Option<Command> {
    let latest_user = conversation
        .iter()
        .rev()
        .find(|msg| msg.role == MessageRole::User)?;
    detect(&latest_user.content, table)
}

/// First trigger from `triggers` that occurs in `text`, in list order.
fn first_trigger(text: &str, triggers: &[String]) -> Option<(usize, usize)> {
    triggers.iter().find_map(|t| find_ignore_case(text, t))
}

/// Case-insensitive substring search.
///
/// Returns the byte range of the first occurrence of `needle` in
/// `haystack`. Comparison is char-by-char, so the returned range indexes
/// the original string correctly even for multi-byte scripts, where
/// lowercasing can change byte lengths.
fn find_ignore_case(haystack: &str, needle: &str) -> Option<(usize, usize)> {
    if needle.is_empty() {
        return None;
    }
    let needle_chars: Vec<char> = needle.chars().collect();
    let indices: Vec<(usize, char)> = haystack.char_indices().collect();

    for window_start in 0..indices.len() {
        let mut matched = 0;
        while matched < needle_chars.len() {
            let Some(&(_, ch)) = indices.get(window_start + matched) else {
                break;
            };
            if !chars_eq_ignore_case(ch, needle_chars[matched]) {
                break;
            }
            matched += 1;
        }
        if matched == needle_chars.len() {
            let start = indices[window_start].0;
            let end = indices
                .get(window_start + matched)
                .map(|&(idx, _)| idx)
                .unwrap_or(haystack.len());
            return Some((start, end));
        }
    }
    None
}

fn chars_eq_ignore_case(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// Remove `range` from `text` and collapse the remaining whitespace.
fn strip_range(text: &str, (start, end): (usize, usize)) -> String {
    let mut remainder = String::with_capacity(text.len());
    remainder.push_str(&text[..start]);
    remainder.push_str(&text[end..]);
    remainder.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> CommandTable {
        CommandTable::default()
    }

    #[test]
    fn detects_bengali_weather_request_with_city() {
        let command = detect("আবহাওয়া চট্টগ্রাম", &table()).unwrap();
        assert_eq!(
            command,
            Command::Weather {
                city: "Chittagong".to_string()
            }
        );
    }

    #[test]
    fn weather_without_city_uses_default() {
        let command = detect("what's the weather like today?", &table()).unwrap();
        assert_eq!(
            command,
            Command::Weather {
                city: "Dhaka".to_string()
            }
        );
    }

    #[test]
    fn weather_resolves_english_city_names() {
        let command = detect("Weather in Sylhet please", &table()).unwrap();
        assert_eq!(
            command,
            Command::Weather {
                city: "Sylhet".to_string()
            }
        );
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert!(matches!(
            detect("WEATHER update", &table()),
            Some(Command::Weather { .. })
        ));
        assert!(matches!(detect("Any NEWS?", &table()), Some(Command::News)));
    }

    #[test]
    fn detects_news_request() {
        assert_eq!(detect("আজকের খবর দাও", &table()), Some(Command::News));
    }

    #[test]
    fn book_wins_over_search_when_both_match() {
        // "বই" (book) is checked before the search triggers.
        let command = detect("বই খুঁজে দাও", &table()).unwrap();
        assert_eq!(
            command,
            Command::Book {
                query: "খুঁজে দাও".to_string()
            }
        );
    }

    #[test]
    fn book_query_strips_only_the_trigger() {
        let command = detect("📚 book Dune", &table()).unwrap();
        assert_eq!(
            command,
            Command::Book {
                query: "📚 Dune".to_string()
            }
        );
    }

    #[test]
    fn search_query_strips_the_trigger() {
        let command = detect("search rust async streams", &table()).unwrap();
        assert_eq!(
            command,
            Command::Search {
                query: "rust async streams".to_string()
            }
        );
    }

    #[test]
    fn plain_chat_is_not_intercepted() {
        assert_eq!(detect("hello there", &table()), None);
    }

    #[test]
    fn intercept_scans_the_latest_user_turn() {
        let conversation = vec![
            ChatMessage::user("weather in Dhaka"),
            ChatMessage::assistant("It is sunny."),
            ChatMessage::user("thanks, that's all"),
        ];
        // The old weather request must not re-trigger.
        assert_eq!(intercept(&conversation, &table()), None);

        let conversation = vec![
            ChatMessage::user("hello"),
            ChatMessage::assistant("hi!"),
            ChatMessage::user("আবহাওয়া ঢাকা"),
        ];
        assert_eq!(
            intercept(&conversation, &table()),
            Some(Command::Weather {
                city: "Dhaka".to_string()
            })
        );
    }

    #[test]
    fn intercept_ignores_conversations_without_user_turns() {
        let conversation = vec![ChatMessage::system("be helpful")];
        assert_eq!(intercept(&conversation, &table()), None);
        assert_eq!(intercept(&[], &table()), None);
    }

    #[test]
    fn find_ignore_case_returns_byte_range_in_original() {
        let (start, end) = find_ignore_case("say HELLO world", "hello").unwrap();
        assert_eq!(&"say HELLO world"[start..end], "HELLO");

        // Multi-byte haystack before the match.
        let text = "📚 Book Dune";
        let (start, end) = find_ignore_case(text, "book").unwrap();
        assert_eq!(&text[start..end], "Book");
    }
}
