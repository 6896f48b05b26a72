// ABOUTME: Detection of overlapping subscription sources.
// ABOUTME: Groups domains by shared topic keywords or near-identical names using edit distance.

use super::keywords::{TopicMatcher, SOURCE_GROUPS};
use super::DomainCount;
use aho_corasick::BuildError;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// Mean similarity above which a topic group counts as redundant.
pub const REDUNDANCY_THRESHOLD: f64 = 0.3;
/// Similarity above which two domain names are considered the same source.
pub const SIMILAR_NAME_THRESHOLD: f64 = 0.7;
/// Score reported for groups formed by name similarity.
pub const SIMILAR_NAME_SCORE: f64 = 0.75;
pub const SIMILAR_NAMES_GROUP: &str = "Similar names";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RedundantSource {
    pub domain: String,
    pub count: usize,
    pub engagement: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RedundantGroup {
    pub theme: String,
    pub sources: Vec<RedundantSource>,
    /// Rounded to two decimals.
    pub score: f64,
}

impl RedundantGroup {
    /// Share of the group's articles that were starred.
    pub fn engagement_rate(&self) -> f64 {
        let articles: usize = self.sources.iter().map(|s| s.count).sum();
        let engaged: usize = self.sources.iter().map(|s| s.engagement).sum();
        if articles == 0 {
            0.0
        } else {
            engaged as f64 / articles as f64
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RedundancyReport {
    pub groups: Vec<RedundantGroup>,
    pub total_redundant_sources: usize,
}

/// Edit distance between two strings, counted in chars.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b_chars.len()).collect();
    let mut cur = vec![0; b_chars.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        cur[0] = i + 1;
        for (j, cb) in b_chars.iter().enumerate() {
            cur[j + 1] = if ca == *cb {
                prev[j]
            } else {
                1 + prev[j].min(prev[j + 1]).min(cur[j])
            };
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev[b_chars.len()]
}

/// `(len(longer) - distance) / len(longer)`, 1.0 when both are empty.
pub fn string_similarity(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }
    (longest - levenshtein(a, b)) as f64 / longest as f64
}

/// Mean pairwise similarity of the lower-cased domains, 0 for fewer than two.
pub fn redundancy_score(domains: &[&str]) -> f64 {
    if domains.len() < 2 {
        return 0.0;
    }
    let lowered: Vec<String> = domains.iter().map(|d| d.to_lowercase()).collect();
    let mut total = 0.0;
    let mut comparisons = 0usize;
    for i in 0..lowered.len() {
        for j in (i + 1)..lowered.len() {
            total += string_similarity(&lowered[i], &lowered[j]);
            comparisons += 1;
        }
    }
    total / comparisons as f64
}

/// Reports topic groups whose domains look alike, then groups of
/// near-identically named domains, highest score first.
pub fn analyze_source_redundancy(
    top_domains: &[DomainCount],
    engagement: &BTreeMap<String, usize>,
) -> Result<RedundancyReport, BuildError> {
    let matcher = TopicMatcher::new(SOURCE_GROUPS)?;
    let mut members: Vec<Vec<&DomainCount>> = vec![Vec::new(); matcher.len()];

    for entry in top_domains.iter().filter(|d| d.count > 0) {
        for topic in matcher.topics_in(&entry.domain.to_lowercase()) {
            members[topic].push(entry);
        }
    }

    let mut groups = Vec::new();
    for (topic, sources) in members.iter().enumerate() {
        if sources.len() < 2 {
            continue;
        }
        let names: Vec<&str> = sources.iter().map(|d| d.domain.as_str()).collect();
        let score = redundancy_score(&names);
        if score > REDUNDANCY_THRESHOLD {
            groups.push(RedundantGroup {
                theme: matcher.name(topic).to_string(),
                sources: sources.iter().map(|d| to_source(d, engagement)).collect(),
                score: round2(score),
            });
        }
    }

    groups.extend(find_similar_named_sources(top_domains, engagement));
    groups.sort_by(|a, b| b.score.total_cmp(&a.score));

    let total_redundant_sources = groups.iter().map(|g| g.sources.len()).sum();
    Ok(RedundancyReport {
        groups,
        total_redundant_sources,
    })
}

/// Groups domains whose names are more than 70% similar. Each domain joins
/// at most one group.
pub fn find_similar_named_sources(
    domains: &[DomainCount],
    engagement: &BTreeMap<String, usize>,
) -> Vec<RedundantGroup> {
    let mut groups = Vec::new();
    let mut processed: HashSet<&str> = HashSet::new();

    for (i, first) in domains.iter().enumerate() {
        if processed.contains(first.domain.as_str()) {
            continue;
        }
        let mut similar = vec![to_source(first, engagement)];
        for (j, other) in domains.iter().enumerate() {
            if i == j || processed.contains(other.domain.as_str()) {
                continue;
            }
            if string_similarity(&first.domain, &other.domain) > SIMILAR_NAME_THRESHOLD {
                similar.push(to_source(other, engagement));
                processed.insert(other.domain.as_str());
            }
        }
        if similar.len() > 1 {
            processed.insert(first.domain.as_str());
            groups.push(RedundantGroup {
                theme: SIMILAR_NAMES_GROUP.to_string(),
                sources: similar,
                score: SIMILAR_NAME_SCORE,
            });
        }
    }
    groups
}

fn to_source(entry: &DomainCount, engagement: &BTreeMap<String, usize>) -> RedundantSource {
    RedundantSource {
        domain: entry.domain.clone(),
        count: entry.count,
        engagement: engagement.get(&entry.domain).copied().unwrap_or(0),
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn domains(list: &[(&str, usize)]) -> Vec<DomainCount> {
        list.iter()
            .map(|(d, c)| DomainCount {
                domain: d.to_string(),
                count: *c,
            })
            .collect()
    }

    #[test]
    fn levenshtein_basics() {
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("same", "same"), 0);
        assert_eq!(levenshtein("wp-tutorials.com", "wptutorials.net"), 4);
    }

    #[test]
    fn similarity_bounds() {
        assert_eq!(string_similarity("", ""), 1.0);
        assert_eq!(string_similarity("abc", "abc"), 1.0);
        assert_eq!(string_similarity("abc", "xyz"), 0.0);
        assert_eq!(string_similarity("wp-tutorials.com", "wptutorials.net"), 0.75);
    }

    #[test]
    fn score_needs_two_domains() {
        assert_eq!(redundancy_score(&["only.com"]), 0.0);
        assert_eq!(redundancy_score(&["A.com", "a.com"]), 1.0);
    }

    #[test]
    fn wordpress_lookalikes_are_grouped() {
        let report = analyze_source_redundancy(
            &domains(&[("wp-tutorials.com", 4), ("wptutorials.net", 2)]),
            &BTreeMap::new(),
        )
        .unwrap();
        assert_eq!(report.groups[0].theme, "WordPress");
        assert_eq!(report.groups[0].score, 0.75);
        assert!(report
            .groups
            .iter()
            .any(|g| g.theme == SIMILAR_NAMES_GROUP && g.sources.len() == 2));
    }

    #[test]
    fn unrelated_domains_are_not_grouped() {
        let report = analyze_source_redundancy(
            &domains(&[("kernel.org", 3), ("python.com", 1)]),
            &BTreeMap::new(),
        )
        .unwrap();
        assert!(report.groups.is_empty());
        assert_eq!(report.total_redundant_sources, 0);
    }

    #[test]
    fn similar_names_use_each_domain_once() {
        let groups = find_similar_named_sources(
            &domains(&[("example.com", 5), ("example.org", 3), ("examples.com", 1)]),
            &BTreeMap::from([("example.org".to_string(), 2)]),
        );
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].sources.len(), 3);
        assert_eq!(groups[0].sources[1].engagement, 2);
    }
}
