// src/chart.rs
//! Best-effort "label: number" extraction for the bar chart view.
//!
//! This is a heuristic over free text, not a structured-output contract with
//! the assistant. `None` always means "nothing to chart", never an error.

use regex::Regex;
use serde::Serialize;

use crate::types::{ChartRow, Message, Role};

lazy_static::lazy_static! {
    static ref LABEL_VALUE: Regex = Regex::new(r"([^:]+):\s*([0-9]+)").unwrap();
}

/// Appended to the user's text in chart mode so the assistant emits chartable data.
pub const CHART_INSTRUCTION: &str = "If the user's request involves data that could be visualized, please include a bar chart.\n\
Format the data as a list of lists where each inner list contains [label, value].\n\
Example: [[\"Category A\", 10], [\"Category B\", 20]]";

pub fn chart_prompt(user_text: &str) -> String {
    format!("{}\n\n{}", user_text, CHART_INSTRUCTION)
}

/// Pulls every `label: integer` pair out of `text`, in order of appearance.
pub fn extract(text: &str) -> Option<Vec<ChartRow>> {
    let mut rows = Vec::new();
    for caps in LABEL_VALUE.captures_iter(text) {
        // Whatever ended the previous pair ("A: 1, B: 2", "A: 1. B: 2", "- A: 1") is not part of the label.
        let label = caps[1].trim_start_matches(is_separator).trim_end();
        let value = caps[2].parse::<i64>().ok()?;
        rows.push(ChartRow::new(label, value));
    }

    if rows.is_empty() {
        None
    } else {
        Some(rows)
    }
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || matches!(c, ',' | ';' | '.' | '!' | '?' | '-' | '*' | '•')
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageChart {
    /// Index of the assistant message in the session history.
    pub message_index: usize,
    pub rows: Vec<ChartRow>,
}

/// Charts for every assistant message that has any.
pub fn charts(messages: &[Message]) -> Vec<MessageChart> {
    messages
        .iter()
        .enumerate()
        .filter(|(_, m)| m.role == Role::Assistant)
        .filter_map(|(message_index, m)| {
            extract(&m.content).map(|rows| MessageChart { message_index, rows })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_pairs_in_order() {
        let rows = extract("Category A: 71, Category B: 5").unwrap();
        assert_eq!(rows, vec![ChartRow::new("Category A", 71), ChartRow::new("Category B", 5)]);
    }

    #[test]
    fn test_no_pairs_means_no_chart() {
        assert_eq!(extract("no numbers here"), None);
        assert_eq!(extract("Bad: abc"), None);
        assert_eq!(extract(""), None);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let rows = extract("Maize: 3\nMaize: 4\nRice:10").unwrap();
        assert_eq!(
            rows,
            vec![ChartRow::new("Maize", 3), ChartRow::new("Maize", 4), ChartRow::new("Rice", 10)]
        );
    }

    #[test]
    fn test_only_ascii_digits_are_values() {
        assert_eq!(extract("Maize: 5, Rice: \u{0663}"), Some(vec![ChartRow::new("Maize", 5)]));
        assert_eq!(extract("Rice: \u{0663}"), None);
    }

    #[test]
    fn test_sentence_and_bullet_separators_are_trimmed() {
        assert_eq!(
            extract("Maize: 5. Rice: 3"),
            Some(vec![ChartRow::new("Maize", 5), ChartRow::new("Rice", 3)])
        );
        assert_eq!(
            extract("- Maize: 5\n- Rice: 3\n* Beans: 2"),
            Some(vec![ChartRow::new("Maize", 5), ChartRow::new("Rice", 3), ChartRow::new("Beans", 2)])
        );
    }

    #[test]
    fn test_overflowing_value_drops_whole_chart() {
        assert_eq!(extract("Small: 1, Huge: 99999999999999999999999"), None);
    }

    #[test]
    fn test_chart_prompt_keeps_user_text_first() {
        let prompt = chart_prompt("Yield by crop?");
        assert!(prompt.starts_with("Yield by crop?"));
        assert!(prompt.contains("[label, value]"));
    }

    #[test]
    fn test_charts_only_for_assistant_messages() {
        let messages = vec![
            Message::user("Wheat: 5"),
            Message::assistant("Sure. Wheat: 12"),
            Message::user("and now?"),
            Message::assistant("nothing numeric"),
            Message::assistant("Beans: 7"),
        ];

        let found = charts(&messages);

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].message_index, 1);
        assert_eq!(found[0].rows, vec![ChartRow::new("Sure. Wheat", 12)]);
        assert_eq!(found[1].message_index, 4);
    }
}
