//! Token-budget truncation of conversation history.
//!
//! The gateway has no real tokenizer. Cost is approximated as one token
//! per four characters, a crude but monotonic proxy for length that
//! treats multi-byte scripts the same as ASCII.

use adda_types::llm::ChatMessage;

/// Approximate token cost of one message body.
///
/// Counts `char`s, not bytes, so Bengali text is not over-charged.
pub fn estimate_tokens(content: &str) -> u32 {
    content.chars().count().div_ceil(4) as u32
}

/// Keep the newest contiguous suffix of `conversation` whose cumulative
/// estimated cost fits within `budget`.
///
/// Walks newest to oldest, accumulating cost, and stops at the first
/// message that would push the total over budget. The newest message is
/// always kept, even when its cost alone exceeds the budget, so a
/// non-empty conversation never truncates to nothing.
pub fn truncate_to_budget(conversation: &[ChatMessage], budget: u32) -> &[ChatMessage] {
    let mut total: u32 = 0;
    let mut start = conversation.len();

    while start > 0 {
        let cost = estimate_tokens(&conversation[start - 1].content);
        if total.saturating_add(cost) > budget && start < conversation.len() {
            break;
        }
        total = total.saturating_add(cost);
        start -= 1;
    }

    &conversation[start..]
}
