// ABOUTME: Keyword tables and a multi-pattern matcher for topic detection.
// ABOUTME: Wraps aho-corasick so every topic table is scanned in a single pass per text.

use aho_corasick::{AhoCorasick, BuildError};
use std::collections::BTreeSet;

/// A named list of substrings that signal a topic.
pub type TopicTable = &'static [(&'static str, &'static [&'static str])];

/// Themes detected in article titles.
pub const ARTICLE_THEMES: TopicTable = &[
    ("WordPress", &["wordpress", "wp", "plugin", "theme", "gutenberg"]),
    ("Performance", &["performance", "optimization", "speed", "lighthouse"]),
    (
        "Security",
        &["security", "sécurité", "vulnérabilité", "patch", "cve", "threat", "malware"],
    ),
    ("Accessibility", &["accessibility", "accessibilité", "a11y", "wcag"]),
    ("JavaScript", &["javascript", "js", "react", "vue", "angular"]),
    ("CSS", &["css", "styling", "design", "responsive"]),
    (
        "AI & Machine Learning",
        &["ai", "artificial intelligence", "machine learning", "gpt", "neural", "algorithm"],
    ),
    (
        "Startup & Innovation",
        &["startup", "funding", "venture", "innovation", "product launch"],
    ),
    ("Government & Policy", &["regulation", "policy", "government", "compliance"]),
    ("Technology Trends", &["trend", "future", "emerging", "disruption"]),
    (
        "Research & Analysis",
        &["study", "research", "analysis", "statistics", "report"],
    ),
];

/// Topic groups used to spot overlapping sources by domain name.
pub const SOURCE_GROUPS: TopicTable = &[
    (
        "WordPress",
        &["wordpress", "wp", "plugin", "theme", "gutenberg", "woocommerce"],
    ),
    (
        "JavaScript",
        &["javascript", "js", "react", "vue", "angular", "node", "typescript"],
    ),
    ("CSS/Design", &["css", "design", "ui", "ux", "responsive", "frontend"]),
    (
        "Performance",
        &["performance", "speed", "optimization", "lighthouse", "webpagetest"],
    ),
    (
        "Security",
        &["security", "sécurité", "vulnérabilité", "cve", "threat", "malware"],
    ),
    (
        "AI/ML",
        &["ai", "artificial intelligence", "machine learning", "gpt", "neural"],
    ),
    ("News/Tech", &["news", "tech", "technology", "startup", "innovation"]),
    (
        "Personal blogs",
        &["blog", "personal", "journal", "thoughts", "opinion"],
    ),
];

/// Title patterns per content type.
pub const CONTENT_TYPES: TopicTable = &[
    ("tutorials", &["tutorial", "guide", "how to", "learn"]),
    ("news", &["news", "update", "release", "announces"]),
    ("reviews", &["review", "comparison", "vs", "tested"]),
    ("opinions", &["opinion", "thoughts", "perspective", "commentary"]),
];

/// Vocabulary that raises the complexity score (at most 3 points).
pub const TECHNICAL_WORDS: &[&str] = &[
    "algorithm",
    "architecture",
    "framework",
    "protocol",
    "api",
    "database",
    "optimization",
];

/// Vocabulary that raises the complexity score (at most 2 points).
pub const COMPLEX_WORDS: &[&str] = &[
    "implementation",
    "infrastructure",
    "deployment",
    "scalability",
    "microservices",
];

/// Substring matcher over every keyword of a topic table.
#[derive(Debug, Clone)]
pub struct TopicMatcher {
    automaton: AhoCorasick,
    /// Topic index for each pattern, in pattern order.
    owners: Vec<usize>,
    names: Vec<&'static str>,
}

impl TopicMatcher {
    pub fn new(table: TopicTable) -> Result<Self, BuildError> {
        let mut patterns = Vec::new();
        let mut owners = Vec::new();
        for (idx, (_, keywords)) in table.iter().enumerate() {
            for keyword in keywords.iter() {
                patterns.push(*keyword);
                owners.push(idx);
            }
        }
        Ok(TopicMatcher {
            automaton: AhoCorasick::new(patterns)?,
            owners,
            names: table.iter().map(|(name, _)| *name).collect(),
        })
    }

    /// Builds a matcher over a flat word list, one topic per word.
    pub fn from_words(words: &'static [&'static str]) -> Result<Self, BuildError> {
        Ok(TopicMatcher {
            automaton: AhoCorasick::new(words)?,
            owners: (0..words.len()).collect(),
            names: words.to_vec(),
        })
    }

    /// Indices of every topic with at least one keyword inside `text`.
    pub fn topics_in(&self, text: &str) -> BTreeSet<usize> {
        self.automaton
            .find_overlapping_iter(text)
            .map(|m| self.owners[m.pattern().as_usize()])
            .collect()
    }

    pub fn matches(&self, text: &str) -> bool {
        self.automaton.is_match(text)
    }

    pub fn name(&self, topic: usize) -> &'static str {
        self.names[topic]
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Keywords of the named topic in `table`.
pub fn keywords_for(table: TopicTable, name: &str) -> &'static [&'static str] {
    table
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, k)| *k)
        .unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_overlapping_topics() {
        let matcher = TopicMatcher::new(ARTICLE_THEMES).unwrap();
        let hits: Vec<&str> = matcher
            .topics_in("a wordpress plugin security patch")
            .into_iter()
            .map(|t| matcher.name(t))
            .collect();
        assert_eq!(hits, vec!["WordPress", "Security"]);
    }

    #[test]
    fn word_lists_count_distinct_words() {
        let matcher = TopicMatcher::from_words(TECHNICAL_WORDS).unwrap();
        assert_eq!(matcher.topics_in("api api database").len(), 2);
        assert!(!matcher.matches("nothing here"));
    }

    #[test]
    fn keywords_lookup() {
        assert!(keywords_for(SOURCE_GROUPS, "WordPress").contains(&"wp"));
        assert!(keywords_for(SOURCE_GROUPS, "missing").is_empty());
    }
}
