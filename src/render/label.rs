//! Renderer-safe node labels.

use crate::graph::{CanonicalGraph, Emphasis, Node, TreeKind};

/// Marker appended to truncated labels.
const ELLIPSIS: &str = "...";

/// Label layout limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelOptions {
    /// Column width for word wrapping.
    pub wrap_width: usize,
    /// Maximum wrapped content length in characters.
    pub max_chars: usize,
}

impl Default for LabelOptions {
    fn default() -> Self {
        Self {
            wrap_width: 40,
            max_chars: 300,
        }
    }
}

/// Greedy word wrap at `width` columns.
///
/// Runs of whitespace (newlines included) collapse to a single break
/// opportunity. Words longer than `width` are split across lines.
pub fn wrap_text(text: &str, width: usize) -> String {
    let width = width.max(1);
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut chars: Vec<char> = word.chars().collect();

        if current_len > 0 && current_len + 1 + chars.len() <= width {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + chars.len();
            continue;
        }

        if current_len > 0 {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        while chars.len() > width {
            let rest = chars.split_off(width);
            lines.push(chars.into_iter().collect());
            chars = rest;
        }
        current = chars.iter().collect();
        current_len = chars.len();
    }

    if current_len > 0 {
        lines.push(current);
    }
    lines.join("\n")
}

/// Cut `text` to `max_chars` characters, appending `...` when cut.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => format!("{}{}", &text[..byte_index], ELLIPSIS),
        None => text.to_string(),
    }
}

/// Wrap then truncate raw content.
pub fn sanitize_content(content: &str, options: &LabelOptions) -> String {
    truncate_chars(&wrap_text(content, options.wrap_width), options.max_chars)
}

/// Full display label for a node of `graph`.
///
/// Standard trees show reward statistics above the content; layered trees
/// show the content alone, with the root prefixed by `Start: `.
pub fn node_label(graph: &CanonicalGraph, node: &Node, options: &LabelOptions) -> String {
    let body = sanitize_content(&node.content, options);
    match graph.kind() {
        TreeKind::Standard => format!(
            "Reward: {:.2}\nVisits: {}\n{}\n{}",
            node.average_reward,
            node.visit_count,
            "-".repeat(10),
            body
        ),
        TreeKind::Layered if node.emphasis == Emphasis::Root => format!("Start: {}", body),
        TreeKind::Layered => body,
    }
}

/// Escape a string for use inside a double-quoted DOT attribute.
pub fn escape_dot(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\r', "")
        .replace('\n', "\\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_short_text_unchanged() {
        assert_eq!(wrap_text("hello world", 40), "hello world");
    }

    #[test]
    fn test_wrap_breaks_on_width() {
        assert_eq!(wrap_text("aaa bbb ccc", 7), "aaa bbb\nccc");
    }

    #[test]
    fn test_wrap_collapses_whitespace() {
        assert_eq!(wrap_text("  a\n\n b\t c  ", 40), "a b c");
        assert_eq!(wrap_text("   ", 10), "");
    }

    #[test]
    fn test_wrap_splits_long_words() {
        assert_eq!(wrap_text("abcdefghij", 4), "abcd\nefgh\nij");
        assert_eq!(wrap_text("xy abcdefgh", 4), "xy\nabcd\nefgh");
    }

    #[test]
    fn test_wrap_counts_characters_not_bytes() {
        assert_eq!(wrap_text("ééé ééé", 7), "ééé ééé");
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 5), "hello");
        assert_eq!(truncate_chars("hello world", 5), "hello...");
        assert_eq!(truncate_chars("日本語テキスト", 3), "日本語...");
    }

    #[test]
    fn test_sanitize_content_applies_both_limits() {
        let options = LabelOptions {
            wrap_width: 5,
            max_chars: 8,
        };
        assert_eq!(sanitize_content("aaaa bbbb cccc", &options), "aaaa\nbbb...");
    }

    #[test]
    fn test_escape_dot() {
        assert_eq!(escape_dot("hello"), "hello");
        assert_eq!(escape_dot("say \"hi\""), "say \\\"hi\\\"");
        assert_eq!(escape_dot("a\nb"), "a\\nb");
        assert_eq!(escape_dot("back\\slash"), "back\\\\slash");
    }

    #[test]
    fn test_standard_label_shows_stats() {
        let mut graph = CanonicalGraph::new(TreeKind::Standard);
        let id = graph.ensure_node("state text");
        graph.record_rewards(&id, &[1.0, 2.0]);
        let node = graph.node(&id).unwrap().clone();
        assert_eq!(
            node_label(&graph, &node, &LabelOptions::default()),
            "Reward: 1.50\nVisits: 2\n----------\nstate text"
        );
    }

    #[test]
    fn test_layered_root_label_prefix() {
        let mut graph = CanonicalGraph::new(TreeKind::Layered);
        let root = graph.set_root("1 2 3 4");
        let child = graph.ensure_node("child");
        let root_node = graph.node(&root).unwrap().clone();
        let child_node = graph.node(&child).unwrap().clone();
        let options = LabelOptions::default();
        assert_eq!(node_label(&graph, &root_node, &options), "Start: 1 2 3 4");
        assert_eq!(node_label(&graph, &child_node, &options), "child");
    }
}
