//! Result payload types
//!
//! The backend returns one JSON object keyed by analysis section. Every section
//! is independently optional: a missing section means that analysis did not run
//! or produced nothing. [`ResultPayload::from_value`] decodes each section on
//! its own so a single malformed section never takes the rest of the report
//! down with it.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use tracing::warn;

/// Named sub-report within a result payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Section {
    Crawl,
    SeoAudit,
    Keywords,
    Duplicates,
    PagePower,
    Performance,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::Crawl,
        Section::SeoAudit,
        Section::Keywords,
        Section::Duplicates,
        Section::PagePower,
        Section::Performance,
    ];

    /// JSON key of the section in the result body
    pub fn key(self) -> &'static str {
        match self {
            Self::Crawl => "crawl_results",
            Self::SeoAudit => "seo_audit",
            Self::Keywords => "keywords",
            Self::Duplicates => "duplicates",
            Self::PagePower => "page_power",
            Self::Performance => "performance",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Crawl => "Crawl Summary",
            Self::SeoAudit => "SEO Audit",
            Self::Keywords => "Keywords",
            Self::Duplicates => "Duplicate Content",
            Self::PagePower => "Page Power",
            Self::Performance => "Performance",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Normalized result bundle of a completed scan
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultPayload {
    pub scan_id: Option<String>,
    /// Completion time as reported by the backend (ISO 8601, usually without offset)
    pub timestamp: Option<String>,
    pub crawl: Option<CrawlResults>,
    pub seo_audit: Option<SeoAudit>,
    pub keywords: Option<KeywordAnalysis>,
    pub duplicates: Option<DuplicateReport>,
    pub page_power: Option<PagePowerReport>,
    pub performance: Option<PerformanceReport>,
}

impl ResultPayload {
    /// Decodes a raw result body section by section
    ///
    /// Absent and `null` sections stay `None`. A section that does not match
    /// its expected shape is dropped with a warning. A body that is not a JSON
    /// object yields an empty payload.
    pub fn from_value(value: Value) -> Self {
        let Value::Object(mut map) = value else {
            warn!("Result body is not a JSON object; treating every section as absent");
            return Self::default();
        };

        Self {
            scan_id: take_string(&mut map, "scan_id"),
            timestamp: take_string(&mut map, "timestamp"),
            crawl: take_section(&mut map, Section::Crawl),
            seo_audit: take_section(&mut map, Section::SeoAudit),
            keywords: take_section(&mut map, Section::Keywords),
            duplicates: take_section(&mut map, Section::Duplicates),
            page_power: take_section(&mut map, Section::PagePower),
            performance: take_section(&mut map, Section::Performance),
        }
    }

    /// Completion time parsed as a naive local timestamp
    pub fn completed_at(&self) -> Option<chrono::NaiveDateTime> {
        let raw = self.timestamp.as_deref()?;
        raw.parse::<chrono::NaiveDateTime>()
            .ok()
            .or_else(|| {
                chrono::DateTime::parse_from_rfc3339(raw)
                    .ok()
                    .map(|dt| dt.naive_local())
            })
    }

    pub fn has_section(&self, section: Section) -> bool {
        match section {
            Section::Crawl => self.crawl.is_some(),
            Section::SeoAudit => self.seo_audit.is_some(),
            Section::Keywords => self.keywords.is_some(),
            Section::Duplicates => self.duplicates.is_some(),
            Section::PagePower => self.page_power.is_some(),
            Section::Performance => self.performance.is_some(),
        }
    }

    /// Sections that decoded successfully, in display order
    pub fn present_sections(&self) -> Vec<Section> {
        Section::ALL
            .into_iter()
            .filter(|s| self.has_section(*s))
            .collect()
    }
}

fn take_string(map: &mut Map<String, Value>, key: &str) -> Option<String> {
    match map.remove(key)? {
        Value::String(s) => Some(s),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

fn take_section<T: DeserializeOwned>(map: &mut Map<String, Value>, section: Section) -> Option<T> {
    let raw = map.remove(section.key())?;
    if raw.is_null() {
        return None;
    }
    match serde_json::from_value(raw) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            warn!(section = %section, error = %e, "Dropping malformed result section");
            None
        }
    }
}

// =============================================================================
// Crawl
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlResults {
    pub pages: Vec<CrawledPage>,
    pub links: Vec<String>,
    pub images: Vec<ImageRef>,
    pub stats: Option<CrawlStats>,
    pub link_analysis: Option<LinkAnalysis>,
    /// Target URL to the internal pages linking to it
    pub backlinks_map: BTreeMap<String, Vec<Backlink>>,
}

impl CrawlResults {
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty() && self.stats.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawledPage {
    pub url: String,
    pub status_code: Option<u16>,
    pub title: String,
    pub meta_description: String,
    pub canonical: String,
    pub h1: Vec<String>,
    pub h2: Vec<String>,
    pub word_count: u64,
    pub load_time: Option<f64>,
    pub crawl_depth: Option<u32>,
    pub internal_links: Vec<String>,
    pub external_links: Vec<String>,
    pub backlinks_count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageRef {
    pub url: String,
    pub alt: String,
    pub page_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlStats {
    pub total_pages: u64,
    pub total_words: u64,
    pub avg_word_count: f64,
    pub avg_load_time: f64,
    pub pages_with_title: u64,
    pub pages_with_meta: u64,
    pub total_images: u64,
    pub total_links: u64,
    /// HTTP status code (as a string key) to page count
    pub status_codes: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkAnalysis {
    pub total_internal_links: u64,
    pub total_external_links: u64,
    pub untitled_links: Vec<LinkDetail>,
    pub broken_links: Vec<BrokenLink>,
    pub internal_links_detailed: Vec<LinkDetail>,
    pub external_links_detailed: Vec<LinkDetail>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkDetail {
    pub url: String,
    pub href: String,
    pub anchor_text: String,
    pub title: String,
    pub is_untitled: bool,
    pub internal: bool,
    pub source_page: String,
    pub location: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BrokenLink {
    #[serde(flatten)]
    pub link: LinkDetail,
    #[serde(default)]
    pub issue: String,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Backlink {
    pub from_url: String,
    pub anchor_text: String,
    pub title: String,
}

// =============================================================================
// SEO audit
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeoAudit {
    pub score: f64,
    pub issues: Vec<AuditFinding>,
    pub warnings: Vec<AuditFinding>,
    pub summary: AuditSummary,
}

impl SeoAudit {
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty() && self.warnings.is_empty() && self.summary.total_pages == 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditFinding {
    #[serde(rename = "type")]
    pub kind: String,
    pub severity: String,
    pub page: Option<String>,
    pub message: String,
    pub fix: Option<String>,
    pub example: Option<String>,
    pub location: Option<String>,
    pub impact: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditSummary {
    pub total_issues: u64,
    pub total_warnings: u64,
    pub total_pages: u64,
}

// =============================================================================
// Keywords
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordAnalysis {
    pub keywords: KeywordSets,
    pub keyword_clusters: Vec<KeywordCluster>,
    pub total_keywords: u64,
}

impl KeywordAnalysis {
    pub fn is_empty(&self) -> bool {
        let sets = &self.keywords;
        sets.rake.is_empty()
            && sets.tfidf.is_empty()
            && sets.ngrams.unigrams.is_empty()
            && sets.ngrams.bigrams.is_empty()
            && sets.ngrams.trigrams.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordSets {
    pub rake: Vec<RakeKeyword>,
    pub ngrams: NGrams,
    pub tfidf: Vec<TfidfKeyword>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RakeKeyword {
    pub phrase: String,
    pub score: f64,
    pub length: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NGrams {
    pub unigrams: Vec<TermFrequency>,
    pub bigrams: Vec<TermFrequency>,
    pub trigrams: Vec<TermFrequency>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TermFrequency {
    pub term: String,
    pub frequency: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TfidfKeyword {
    pub term: String,
    pub tfidf_score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordCluster {
    pub theme: String,
    pub keywords: Vec<String>,
    pub size: u32,
}

// =============================================================================
// Duplicates
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DuplicateReport {
    /// Highest-similarity pairs first
    pub duplicates: Vec<DuplicatePair>,
    pub total_duplicates: u64,
    pub methods_used: Vec<String>,
}

impl DuplicateReport {
    pub fn is_empty(&self) -> bool {
        self.duplicates.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DuplicatePair {
    pub page1: String,
    pub page2: String,
    pub similarity: f64,
    pub method: String,
}

// =============================================================================
// Page power
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PagePowerReport {
    pub page_power: BTreeMap<String, PageScore>,
    pub top_pages: Vec<RankedPage>,
    pub average_power: f64,
}

impl PagePowerReport {
    pub fn is_empty(&self) -> bool {
        self.top_pages.is_empty() && self.page_power.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageScore {
    pub total_score: f64,
    pub power_level: String,
    /// Per-factor breakdown; factor shapes differ, so they stay untyped
    pub factors: BTreeMap<String, Value>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankedPage {
    #[serde(default)]
    pub url: String,
    #[serde(flatten)]
    pub score: PageScore,
}

// =============================================================================
// Performance
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceReport {
    pub results: Vec<PagePerformance>,
    pub aggregated: Option<PerformanceSummary>,
    pub sample_size: Option<u32>,
    /// Set when the probe could not run at all
    pub error: Option<String>,
    pub note: Option<String>,
}

impl PerformanceReport {
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PagePerformance {
    pub url: String,
    #[serde(rename = "LCP")]
    pub lcp: Option<Metric>,
    #[serde(rename = "CLS")]
    pub cls: Option<Metric>,
    #[serde(rename = "FID")]
    pub fid: Option<Metric>,
    #[serde(rename = "FCP")]
    pub fcp: Option<Metric>,
    #[serde(rename = "TTI")]
    pub tti: Option<Metric>,
    pub score: Option<f64>,
    pub recommendations: Vec<PerformanceHint>,
    pub note: Option<String>,
    pub error: Option<String>,
}

/// A web-vitals figure, either preformatted ("2.5s") or numeric (0.1)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Metric {
    Number(f64),
    Text(String),
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceHint {
    pub id: String,
    pub title: String,
    pub description: String,
    pub score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceSummary {
    pub avg_score: f64,
    #[serde(rename = "avg_LCP")]
    pub avg_lcp: String,
    #[serde(rename = "avg_CLS")]
    pub avg_cls: f64,
    pub pages_analyzed: u32,
}
