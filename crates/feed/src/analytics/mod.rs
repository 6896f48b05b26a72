// ABOUTME: Reading-habit analytics over a dump of starred articles.
// ABOUTME: Aggregates domains, authors, keywords, themes and timing, plus redundancy and noise reports.

pub mod keywords;
pub mod recommendations;
pub mod redundancy;

use crate::error::FeedError;
use crate::models::Subscription;
use crate::time_parse::parse_timestamp_value;
use chrono::{DateTime, Datelike, Utc, Weekday};
use keywords::{
    TopicMatcher, ARTICLE_THEMES, COMPLEX_WORDS, CONTENT_TYPES, TECHNICAL_WORDS,
};
use redundancy::{analyze_source_redundancy, RedundancyReport};
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, HashSet};
use url::Url;

pub use recommendations::{recommend, Recommendations};

/// Label for articles without an author.
pub const UNKNOWN_AUTHOR: &str = "Unknown author";
const TOP_AUTHORS: usize = 6;
const TOP_KEYWORDS: usize = 20;
const MIN_READ_SECONDS: f64 = 30.0;
const MAX_READ_SECONDS: f64 = 600.0;
const LOW_ENGAGEMENT: f64 = 0.3;
const INACTIVE_BELOW: usize = 5;

/// One starred article as found in a reader's JSON dump.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Article {
    pub title: Option<String>,
    pub url: Option<String>,
    pub author: Option<String>,
    /// ISO string or epoch seconds/milliseconds.
    pub published: Option<Value>,
    pub content: Option<String>,
    pub summary: Option<String>,
    pub starred: Option<Value>,
    pub favorited: Option<Value>,
}

impl Article {
    /// Reads an article from one dump entry. Fields of an unexpected type
    /// are treated as absent; non-object entries yield `None`.
    pub fn from_value(item: &Value) -> Option<Self> {
        let obj = item.as_object()?;
        let text = |key: &str| obj.get(key).and_then(Value::as_str).map(str::to_string);
        let raw = |key: &str| obj.get(key).filter(|v| !v.is_null()).cloned();
        Some(Article {
            title: text("title"),
            url: text("url"),
            author: text("author"),
            published: raw("published"),
            content: text("content"),
            summary: text("summary"),
            starred: raw("starred"),
            favorited: raw("favorited"),
        })
    }

    fn title(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    fn content(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }

    fn summary(&self) -> &str {
        self.summary.as_deref().unwrap_or("")
    }

    fn published_at(&self) -> Option<DateTime<Utc>> {
        self.published.as_ref().and_then(parse_timestamp_value)
    }

    fn is_engaged(&self) -> bool {
        truthy(&self.starred) || truthy(&self.favorited)
    }

    fn domain(&self) -> Option<String> {
        let url = self.url.as_deref()?;
        Url::parse(url).ok()?.host_str().map(str::to_string)
    }
}

fn truthy(v: &Option<Value>) -> bool {
    match v {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

const NOT_AN_ARTICLE_ARRAY: &str = "Invalid JSON format. Expected an array of articles.";

/// Decodes a JSON array of articles. Anything but a non-empty array is
/// rejected; entries that are not objects are skipped.
pub fn parse_articles(data: &[u8]) -> Result<Vec<Article>, FeedError> {
    let value: Value = serde_json::from_slice(data)
        .map_err(|err| FeedError::validation(format!("Invalid JSON: {}", err)))?;
    let items = match value {
        Value::Array(items) if !items.is_empty() => items,
        _ => return Err(FeedError::validation(NOT_AN_ARTICLE_ARRAY)),
    };
    let articles: Vec<Article> = items.iter().filter_map(Article::from_value).collect();
    if articles.is_empty() {
        return Err(FeedError::validation(NOT_AN_ARTICLE_ARRAY));
    }
    Ok(articles)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomainCount {
    pub domain: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedCount {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThemeCluster {
    pub theme: String,
    pub score: usize,
    pub confidence: f64,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearCount {
    pub year: i32,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Share {
    pub count: usize,
    /// Percentage rounded to one decimal.
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LanguageDistribution {
    pub french: Share,
    pub english: Share,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentTypeCount {
    #[serde(rename = "type")]
    pub kind: String,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingFrequency {
    MultipleDaily,
    Daily,
    Weekly,
    Irregular,
}

impl ReadingFrequency {
    pub fn from_articles_per_day(per_day: f64) -> Self {
        if per_day > 50.0 {
            ReadingFrequency::MultipleDaily
        } else if per_day > 20.0 {
            ReadingFrequency::Daily
        } else if per_day > 5.0 {
            ReadingFrequency::Weekly
        } else {
            ReadingFrequency::Irregular
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ReadingFrequency::MultipleDaily => "Several times a day",
            ReadingFrequency::Daily => "Daily",
            ReadingFrequency::Weekly => "Weekly",
            ReadingFrequency::Irregular => "Irregular",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadingPatterns {
    /// Seconds.
    pub total_read_time: f64,
    pub avg_read_time: f64,
    pub articles_per_day: f64,
    pub frequency: ReadingFrequency,
    pub engagement_score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ComplexityLevel {
    Simple,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Complexity {
    /// Mean per-article score, rounded to one decimal.
    pub score: f64,
    pub level: ComplexityLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublicationPatterns {
    pub weekend_ratio: f64,
    pub weekend_count: usize,
    pub total_with_date: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Freshness {
    /// Most articles are at most 30 days old.
    Recent,
    /// Most articles are more than a year old.
    Old,
    Mixed,
    Unavailable,
}

impl Freshness {
    pub fn description(self) -> &'static str {
        match self {
            Freshness::Recent => "Recent content (mostly under 30 days)",
            Freshness::Old => "Older content (mostly over a year)",
            Freshness::Mixed => "Mixed content (balanced spread)",
            Freshness::Unavailable => "Dates not available",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NoiseReport {
    /// Domains where under 30% of articles were starred.
    pub low_engagement: Vec<String>,
    /// Domains with fewer than 5 articles.
    pub inactive: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubscriptionCoverage {
    pub count: usize,
    /// Subscribed domains with no starred article.
    pub without_starred: Vec<String>,
}

/// Everything derived from one article dump.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub total_articles: usize,
    pub top_domains: Vec<DomainCount>,
    pub top_authors: Vec<NamedCount>,
    pub unique_authors: usize,
    pub top_keywords: Vec<NamedCount>,
    pub thematic_clusters: Vec<ThemeCluster>,
    pub yearly_stats: Vec<YearCount>,
    pub date_range: Option<DateRange>,
    pub language_distribution: LanguageDistribution,
    pub content_types: Vec<ContentTypeCount>,
    pub reading_patterns: ReadingPatterns,
    pub domain_engagement: BTreeMap<String, usize>,
    pub complexity: Complexity,
    pub publication_patterns: PublicationPatterns,
    pub freshness: Freshness,
    pub redundancy: RedundancyReport,
    pub noise: NoiseReport,
    pub subscriptions: Option<SubscriptionCoverage>,
}

impl Analysis {
    /// Starred share for one domain, 0 when unknown.
    pub fn engagement_rate(&self, domain: &DomainCount) -> f64 {
        if domain.count == 0 {
            return 0.0;
        }
        self.domain_engagement.get(&domain.domain).copied().unwrap_or(0) as f64
            / domain.count as f64
    }
}

/// Runs every analysis over `articles`, relative to `now`.
pub fn analyze(
    articles: &[Article],
    subscriptions: Option<&[Subscription]>,
    now: DateTime<Utc>,
) -> Result<Analysis, FeedError> {
    let themes = TopicMatcher::new(ARTICLE_THEMES).map_err(FeedError::invalid_matcher)?;

    let mut domains: HashMap<String, usize> = HashMap::new();
    let mut authors: HashMap<String, usize> = HashMap::new();
    let mut keyword_counts: HashMap<String, usize> = HashMap::new();
    let mut theme_scores: BTreeMap<usize, usize> = BTreeMap::new();
    let mut years: BTreeMap<i32, usize> = BTreeMap::new();
    let mut domain_engagement: BTreeMap<String, usize> = BTreeMap::new();
    let mut total_read_time = 0.0;

    for article in articles {
        let title = article.title().to_lowercase();
        let author = article
            .author
            .as_deref()
            .filter(|a| !a.is_empty())
            .unwrap_or(UNKNOWN_AUTHOR);

        if let Some(domain) = article.domain() {
            if article.is_engaged() {
                *domain_engagement.entry(domain.clone()).or_default() += 1;
            }
            *domains.entry(domain).or_default() += 1;
        }
        *authors.entry(author.to_string()).or_default() += 1;

        if let Some(published) = article.published_at() {
            *years.entry(published.year()).or_default() += 1;
        }

        total_read_time += estimate_read_time(article);

        for word in title.split_whitespace() {
            if is_keyword(word) {
                *keyword_counts.entry(word.to_string()).or_default() += 1;
            }
        }

        for theme in themes.topics_in(&title) {
            *theme_scores.entry(theme).or_default() += 1;
        }
    }

    let top_domains: Vec<DomainCount> = sorted_counts(domains)
        .into_iter()
        .map(|(domain, count)| DomainCount { domain, count })
        .collect();
    let unique_authors = authors.len();
    let top_authors = top_named(authors, TOP_AUTHORS);
    let top_keywords = top_named(keyword_counts, TOP_KEYWORDS);

    let mut thematic_clusters: Vec<ThemeCluster> = theme_scores
        .into_iter()
        .map(|(theme, score)| ThemeCluster {
            theme: themes.name(theme).to_string(),
            score,
            confidence: (score as f64 / 10.0).min(1.0),
            keywords: keywords::keywords_for(ARTICLE_THEMES, themes.name(theme))
                .iter()
                .map(|k| k.to_string())
                .collect(),
        })
        .collect();
    thematic_clusters.sort_by(|a, b| b.score.cmp(&a.score));

    let yearly_stats = years
        .into_iter()
        .map(|(year, count)| YearCount { year, count })
        .collect();

    let total = articles.len();
    let articles_per_day = articles_per_day(articles);
    let reading_patterns = ReadingPatterns {
        total_read_time,
        avg_read_time: if total > 0 {
            total_read_time / total as f64
        } else {
            0.0
        },
        articles_per_day,
        frequency: ReadingFrequency::from_articles_per_day(articles_per_day),
        engagement_score: if total > 0 {
            articles.iter().filter(|a| a.is_engaged()).count() as f64 / total as f64
        } else {
            0.0
        },
    };

    let redundancy = analyze_source_redundancy(&top_domains, &domain_engagement)
        .map_err(FeedError::invalid_matcher)?;
    let noise = noise_report(&top_domains, &domain_engagement);
    let subscriptions = subscriptions.map(|subs| subscription_coverage(subs, &top_domains));

    Ok(Analysis {
        total_articles: total,
        top_domains,
        top_authors,
        unique_authors,
        top_keywords,
        thematic_clusters,
        yearly_stats,
        date_range: date_range(articles),
        language_distribution: language_distribution(articles),
        content_types: content_types(articles)?,
        reading_patterns,
        domain_engagement,
        complexity: complexity(articles)?,
        publication_patterns: publication_patterns(articles),
        freshness: freshness(articles, now),
        redundancy,
        noise,
        subscriptions,
    })
}

impl FeedError {
    fn invalid_matcher(err: aho_corasick::BuildError) -> Self {
        FeedError::invalid(format!("keyword matcher: {}", err))
    }
}

/// Estimated reading time in seconds: five chars per word, 3.33 words per
/// second, clamped to 30..=600.
pub fn estimate_read_time(article: &Article) -> f64 {
    let length = article.title().chars().count()
        + article.content().chars().count()
        + article.summary().chars().count();
    let words = length as f64 / 5.0;
    (words / 3.33).clamp(MIN_READ_SECONDS, MAX_READ_SECONDS)
}

fn is_keyword(word: &str) -> bool {
    const ACCENTED: &str = "àâäéèêëïîôùûüÿç";
    word.chars().count() >= 3
        && word
            .chars()
            .all(|c| c.is_ascii_alphabetic() || ACCENTED.contains(c))
}

/// Counts sorted by count descending, then by key.
fn sorted_counts(counts: HashMap<String, usize>) -> Vec<(String, usize)> {
    let mut entries: Vec<(String, usize)> = counts.into_iter().collect();
    entries.sort_by(|(ka, a), (kb, b)| b.cmp(a).then_with(|| ka.cmp(kb)));
    entries
}

fn top_named(counts: HashMap<String, usize>, limit: usize) -> Vec<NamedCount> {
    sorted_counts(counts)
        .into_iter()
        .take(limit)
        .map(|(name, count)| NamedCount { name, count })
        .collect()
}

fn dated(articles: &[Article]) -> impl Iterator<Item = DateTime<Utc>> + '_ {
    articles.iter().filter_map(Article::published_at)
}

fn date_range(articles: &[Article]) -> Option<DateRange> {
    let start = dated(articles).min()?;
    let end = dated(articles).max()?;
    Some(DateRange { start, end })
}

/// Articles divided by the span in days of their dates; the plain count
/// when the span is zero, 0 without dates.
fn articles_per_day(articles: &[Article]) -> f64 {
    let Some(range) = date_range(articles) else {
        return 0.0;
    };
    let days = (range.end - range.start).num_milliseconds() as f64 / 86_400_000.0;
    if days > 0.0 {
        articles.len() as f64 / days
    } else {
        articles.len() as f64
    }
}

fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (count as f64 / total as f64 * 1000.0).round() / 10.0
}

fn language_distribution(articles: &[Article]) -> LanguageDistribution {
    let french = articles
        .iter()
        .filter(|a| {
            let title = a.title().to_lowercase();
            title.contains("les")
                || title.contains("des")
                || title.contains("une")
                || a.url.as_deref().map(|u| u.contains(".fr")).unwrap_or(false)
        })
        .count();
    let total = articles.len();
    LanguageDistribution {
        french: Share {
            count: french,
            percentage: percentage(french, total),
        },
        english: Share {
            count: total - french,
            percentage: percentage(total - french, total),
        },
    }
}

fn content_types(articles: &[Article]) -> Result<Vec<ContentTypeCount>, FeedError> {
    let matcher = TopicMatcher::new(CONTENT_TYPES).map_err(FeedError::invalid_matcher)?;
    let mut counts = vec![0usize; matcher.len()];
    for article in articles {
        for kind in matcher.topics_in(&article.title().to_lowercase()) {
            counts[kind] += 1;
        }
    }
    let mut types: Vec<ContentTypeCount> = counts
        .into_iter()
        .enumerate()
        .filter(|(_, count)| *count > 0)
        .map(|(kind, count)| ContentTypeCount {
            kind: matcher.name(kind).to_string(),
            count,
            percentage: percentage(count, articles.len()),
        })
        .collect();
    types.sort_by(|a, b| b.count.cmp(&a.count));
    Ok(types)
}

/// Scores length, technical vocabulary and code presence per article.
fn complexity(articles: &[Article]) -> Result<Complexity, FeedError> {
    let technical = TopicMatcher::from_words(TECHNICAL_WORDS).map_err(FeedError::invalid_matcher)?;
    let complex = TopicMatcher::from_words(COMPLEX_WORDS).map_err(FeedError::invalid_matcher)?;

    let mut total_score = 0usize;
    for article in articles {
        let (title, content, summary) = (article.title(), article.content(), article.summary());
        let length = title.chars().count() + content.chars().count() + summary.chars().count();
        let mut score = match length {
            l if l > 5000 => 3,
            l if l > 2000 => 2,
            l if l > 500 => 1,
            _ => 0,
        };
        let text = format!("{} {} {}", title, content, summary).to_lowercase();
        score += technical.topics_in(&text).len().min(3);
        if content.contains("```") || content.contains("<code>") || content.contains("function") {
            score += 2;
        }
        score += complex.topics_in(&text).len().min(2);
        total_score += score;
    }

    let avg = if articles.is_empty() {
        0.0
    } else {
        total_score as f64 / articles.len() as f64
    };
    let level = if avg > 6.0 {
        ComplexityLevel::Advanced
    } else if avg > 3.0 {
        ComplexityLevel::Intermediate
    } else {
        ComplexityLevel::Simple
    };
    Ok(Complexity {
        score: (avg * 10.0).round() / 10.0,
        level,
    })
}

fn publication_patterns(articles: &[Article]) -> PublicationPatterns {
    let mut weekend_count = 0;
    let mut total_with_date = 0;
    for date in dated(articles) {
        if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            weekend_count += 1;
        }
        total_with_date += 1;
    }
    PublicationPatterns {
        weekend_ratio: if total_with_date > 0 {
            weekend_count as f64 / total_with_date as f64
        } else {
            0.0
        },
        weekend_count,
        total_with_date,
    }
}

fn freshness(articles: &[Article], now: DateTime<Utc>) -> Freshness {
    let mut recent = 0usize;
    let mut old = 0usize;
    let mut total = 0usize;
    for date in dated(articles) {
        let days = (now - date).num_milliseconds() as f64 / 86_400_000.0;
        if days <= 30.0 {
            recent += 1;
        } else if days > 365.0 {
            old += 1;
        }
        total += 1;
    }
    if total == 0 {
        Freshness::Unavailable
    } else if recent as f64 / total as f64 > 0.5 {
        Freshness::Recent
    } else if old as f64 / total as f64 > 0.5 {
        Freshness::Old
    } else {
        Freshness::Mixed
    }
}

fn noise_report(top_domains: &[DomainCount], engagement: &BTreeMap<String, usize>) -> NoiseReport {
    let rate = |d: &DomainCount| engagement.get(&d.domain).copied().unwrap_or(0) as f64 / d.count as f64;
    NoiseReport {
        low_engagement: top_domains
            .iter()
            .filter(|d| rate(d) < LOW_ENGAGEMENT)
            .map(|d| d.domain.clone())
            .collect(),
        inactive: top_domains
            .iter()
            .filter(|d| d.count < INACTIVE_BELOW)
            .map(|d| d.domain.clone())
            .collect(),
    }
}

fn subscription_coverage(subs: &[Subscription], top_domains: &[DomainCount]) -> SubscriptionCoverage {
    let starred: HashSet<&str> = top_domains.iter().map(|d| d.domain.as_str()).collect();
    let mut seen = HashSet::new();
    let without_starred = subs
        .iter()
        .map(|s| s.domain.as_str())
        .filter(|d| !d.is_empty() && !starred.contains(d) && seen.insert(*d))
        .map(str::to_string)
        .collect();
    SubscriptionCoverage {
        count: subs.len(),
        without_starred,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn article(title: &str, url: &str, published: Value) -> Article {
        Article {
            title: Some(title.into()),
            url: Some(url.into()),
            published: Some(published),
            ..Article::default()
        }
    }

    #[test]
    fn rejects_non_array_and_empty_input() {
        assert!(parse_articles(b"{}").is_err());
        assert!(parse_articles(b"[]").is_err());
        assert_eq!(parse_articles(br#"[{"title":"x"}]"#).unwrap().len(), 1);
        assert!(parse_articles(b"[1, \"a\", null]").is_err());
        let err = parse_articles(b"not json").unwrap_err();
        assert!(err.to_string().starts_with("Invalid JSON"));
    }

    #[test]
    fn mixed_shape_entries_are_read_leniently() {
        let dump = br#"[
            {"title":"ok","url":"https://a.com/1"},
            {"title":"t","url":"https://a.com/x","summary":{"content":"hi"}},
            {"title":"n","author":42,"published":"2024-01-02T00:00:00Z","starred":true},
            7,
            "stray"
        ]"#;
        let articles = parse_articles(dump).unwrap();
        assert_eq!(articles.len(), 3);
        assert_eq!(articles[1].url.as_deref(), Some("https://a.com/x"));
        assert_eq!(articles[1].summary, None);
        assert_eq!(articles[2].author, None);
        assert!(articles[2].is_engaged());
        assert!(articles[2].published_at().is_some());
    }

    #[test]
    fn read_time_is_clamped() {
        assert_eq!(estimate_read_time(&Article::default()), 30.0);
        let long = Article {
            content: Some("x".repeat(100_000)),
            ..Article::default()
        };
        assert_eq!(estimate_read_time(&long), 600.0);
    }

    #[test]
    fn frequency_thresholds() {
        assert_eq!(ReadingFrequency::from_articles_per_day(51.0), ReadingFrequency::MultipleDaily);
        assert_eq!(ReadingFrequency::from_articles_per_day(50.0), ReadingFrequency::Daily);
        assert_eq!(ReadingFrequency::from_articles_per_day(6.0), ReadingFrequency::Weekly);
        assert_eq!(ReadingFrequency::from_articles_per_day(5.0), ReadingFrequency::Irregular);
    }

    #[test]
    fn keyword_filter() {
        assert!(is_keyword("café"));
        assert!(!is_keyword("an"));
        assert!(!is_keyword("rust2024"));
    }

    #[test]
    fn aggregates_domains_authors_and_years() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let mut articles = vec![
            article("Rust release notes", "https://blog.rust-lang.org/a", json!("2023-05-02T10:00:00Z")),
            article("Rust tutorial guide", "https://blog.rust-lang.org/b", json!(1700000000)),
            article("Les nouveautés", "https://exemple.fr/c", json!("2024-05-20T10:00:00Z")),
        ];
        articles[0].author = Some("Ann".into());
        articles[0].starred = Some(json!(true));

        let analysis = analyze(&articles, None, now).unwrap();
        assert_eq!(analysis.total_articles, 3);
        assert_eq!(
            analysis.top_domains,
            vec![
                DomainCount { domain: "blog.rust-lang.org".into(), count: 2 },
                DomainCount { domain: "exemple.fr".into(), count: 1 },
            ]
        );
        assert_eq!(analysis.top_authors[0], NamedCount { name: UNKNOWN_AUTHOR.into(), count: 2 });
        assert_eq!(
            analysis.yearly_stats,
            vec![YearCount { year: 2023, count: 2 }, YearCount { year: 2024, count: 1 }]
        );
        assert_eq!(analysis.language_distribution.french.count, 1);
        assert_eq!(analysis.language_distribution.french.percentage, 33.3);
        assert_eq!(analysis.top_keywords[0], NamedCount { name: "rust".into(), count: 2 });
        assert_eq!(analysis.domain_engagement.get("blog.rust-lang.org"), Some(&1));
        assert!(analysis.content_types.iter().any(|c| c.kind == "tutorials"));
        assert!(analysis.content_types.iter().any(|c| c.kind == "news"));
        assert_eq!(analysis.freshness, Freshness::Mixed);
    }

    #[test]
    fn themes_are_scored_with_confidence() {
        let articles: Vec<Article> = (0..12)
            .map(|i| article("New WordPress plugin", &format!("https://site{}.example/x", i), json!(null)))
            .collect();
        let analysis = analyze(&articles, None, Utc::now()).unwrap();
        let wp = &analysis.thematic_clusters[0];
        assert_eq!(wp.theme, "WordPress");
        assert_eq!(wp.score, 12);
        assert_eq!(wp.confidence, 1.0);
        assert_eq!(analysis.freshness, Freshness::Unavailable);
        assert_eq!(analysis.date_range, None);
        assert_eq!(analysis.reading_patterns.articles_per_day, 0.0);
    }

    #[test]
    fn complexity_levels() {
        let heavy = Article {
            title: Some("Database architecture".into()),
            content: Some(format!("<code>fn main()</code> implementation deployment api {}", "x".repeat(6000))),
            ..Article::default()
        };
        let result = complexity(&[heavy]).unwrap();
        // 3 (length) + 3 (technical) + 2 (code) + 2 (complex)
        assert_eq!(result.score, 10.0);
        assert_eq!(result.level, ComplexityLevel::Advanced);
        assert_eq!(complexity(&[Article::default()]).unwrap().level, ComplexityLevel::Simple);
    }

    #[test]
    fn weekend_ratio() {
        let articles = vec![
            article("a", "https://a.example/1", json!("2024-06-01T12:00:00Z")), // Saturday
            article("b", "https://a.example/2", json!("2024-06-03T12:00:00Z")), // Monday
        ];
        let patterns = publication_patterns(&articles);
        assert_eq!(patterns.weekend_ratio, 0.5);
        assert_eq!(patterns.total_with_date, 2);
    }

    #[test]
    fn subscriptions_without_starred_articles() {
        let articles = vec![article("a", "https://read.example.com/1", json!(null))];
        let subs = vec![
            Subscription { domain: "read.example.com".into(), ..Subscription::default() },
            Subscription { domain: "quiet.example.org".into(), ..Subscription::default() },
        ];
        let analysis = analyze(&articles, Some(&subs), Utc::now()).unwrap();
        let coverage = analysis.subscriptions.unwrap();
        assert_eq!(coverage.count, 2);
        assert_eq!(coverage.without_starred, vec!["quiet.example.org".to_string()]);
        assert_eq!(analysis.noise.inactive, vec!["read.example.com".to_string()]);
        assert_eq!(analysis.noise.low_engagement, vec!["read.example.com".to_string()]);
    }
}
