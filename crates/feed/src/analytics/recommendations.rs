// ABOUTME: Turns an Analysis into reading and folder recommendations.
// ABOUTME: Suggests priority sources, sources to drop, Feedbin filters and folders.

use super::Analysis;
use serde::Serialize;

const HIGH_ENGAGEMENT: f64 = 0.7;
const LOW_ENGAGEMENT: f64 = 0.3;
/// Average read time (seconds) separating short from long reads.
const LONG_READ_SECONDS: f64 = 300.0;

/// A saved-search query to create in Feedbin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbinFilter {
    pub label: String,
    pub query: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendations {
    /// Top five domains by starred count.
    pub priority_domains: Vec<String>,
    /// Domains where more than 70% of articles were starred.
    pub read_first: Vec<String>,
    /// Domains where under 30% of articles were starred.
    pub reevaluate: Vec<String>,
    pub prefer_long_reads: bool,
    pub filters: Vec<FeedbinFilter>,
    /// One folder per redundant source group.
    pub folders: Vec<String>,
}

/// Builds recommendations from a finished analysis.
pub fn recommend(analysis: &Analysis) -> Recommendations {
    let rate_filter = |keep: fn(f64) -> bool| -> Vec<String> {
        analysis
            .top_domains
            .iter()
            .filter(|d| keep(analysis.engagement_rate(d)))
            .map(|d| d.domain.clone())
            .collect()
    };

    let mut filters = vec![
        FeedbinFilter {
            label: "Unread starred articles (priority)".into(),
            query: "is:unread is:starred".into(),
        },
        FeedbinFilter {
            label: "Unread unstarred articles (to scan)".into(),
            query: "is:unread -is:starred".into(),
        },
    ];
    for cluster in analysis.thematic_clusters.iter().take(3) {
        let theme = cluster.theme.to_lowercase();
        filters.push(FeedbinFilter {
            label: format!("{} articles", theme),
            query: format!("title:({})", theme.split(' ').collect::<Vec<_>>().join(" OR ")),
        });
    }

    Recommendations {
        priority_domains: analysis
            .top_domains
            .iter()
            .take(5)
            .map(|d| d.domain.clone())
            .collect(),
        read_first: rate_filter(|r| r > HIGH_ENGAGEMENT),
        reevaluate: rate_filter(|r| r < LOW_ENGAGEMENT),
        prefer_long_reads: analysis.reading_patterns.avg_read_time >= LONG_READ_SECONDS,
        filters,
        folders: analysis
            .redundancy
            .groups
            .iter()
            .map(|g| g.theme.clone())
            .collect(),
    }
}
