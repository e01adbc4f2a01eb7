//! Section panels
//!
//! Every panel copes with its section being absent: a missing or empty
//! section renders a fixed empty-state message instead of failing.

use sitescan_core::domain::payload::{
    AuditFinding, CrawlResults, DuplicateReport, KeywordAnalysis, PagePowerReport,
    PerformanceReport, ResultPayload, SeoAudit,
};

use super::PanelKind;

const LIST_LIMIT: usize = 10;
const PAGE_LIMIT: usize = 25;

/// A titled block of plain-text lines
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub title: &'static str,
    pub lines: Vec<String>,
    empty: bool,
}

impl Panel {
    fn new(title: &'static str) -> Self {
        Self {
            title,
            lines: Vec::new(),
            empty: false,
        }
    }

    fn empty(title: &'static str, message: &str) -> Self {
        Self {
            title,
            lines: vec![message.to_string()],
            empty: true,
        }
    }

    /// Whether the panel only carries its empty-state message
    pub fn is_empty(&self) -> bool {
        self.empty
    }

    fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    fn more(&mut self, total: usize, shown: usize) {
        if total > shown {
            self.push(format!("  ... and {} more", total - shown));
        }
    }
}

/// Build the panel of one kind from a result payload
pub fn build_panel(kind: PanelKind, payload: &ResultPayload) -> Panel {
    match kind {
        PanelKind::Overview => overview(payload.crawl.as_ref(), payload.seo_audit.as_ref()),
        PanelKind::Pages => pages(payload.crawl.as_ref()),
        PanelKind::Links => links(payload.crawl.as_ref()),
        PanelKind::Issues => issues(payload.seo_audit.as_ref()),
        PanelKind::Keywords => keywords(payload.keywords.as_ref()),
        PanelKind::PagePower => page_power(payload.page_power.as_ref()),
        PanelKind::Duplicates => duplicates(payload.duplicates.as_ref()),
        PanelKind::Performance => performance(payload.performance.as_ref()),
    }
}

fn overview(crawl: Option<&CrawlResults>, audit: Option<&SeoAudit>) -> Panel {
    const TITLE: &str = "Overview";
    let Some(stats) = crawl.and_then(|c| c.stats.as_ref()) else {
        return Panel::empty(TITLE, "No data available");
    };

    let mut panel = Panel::new(TITLE);
    if let Some(audit) = audit {
        panel.push(format!("SEO score:        {:.0}/100", audit.score));
    }
    panel.push(format!("Pages crawled:    {}", stats.total_pages));
    panel.push(format!("Total words:      {}", stats.total_words));
    panel.push(format!("Avg words/page:   {:.0}", stats.avg_word_count));
    panel.push(format!("Avg load time:    {:.2}s", stats.avg_load_time));
    panel.push(format!(
        "With title/meta:  {}/{}",
        stats.pages_with_title, stats.pages_with_meta
    ));
    panel.push(format!("Images:           {}", stats.total_images));
    panel.push(format!("Links:            {}", stats.total_links));

    if stats.status_codes.is_empty() {
        panel.push("No status code data");
    } else {
        let codes = stats
            .status_codes
            .iter()
            .map(|(code, count)| format!("{}: {}", code, count))
            .collect::<Vec<_>>()
            .join(", ");
        panel.push(format!("Status codes:     {}", codes));
    }
    panel
}

fn pages(crawl: Option<&CrawlResults>) -> Panel {
    const TITLE: &str = "Pages";
    let Some(crawl) = crawl.filter(|c| !c.pages.is_empty()) else {
        return Panel::empty(TITLE, "No page data available");
    };

    let mut panel = Panel::new(TITLE);
    for page in crawl.pages.iter().take(PAGE_LIMIT) {
        let status = page
            .status_code
            .map(|s| s.to_string())
            .unwrap_or_else(|| "---".to_string());
        let title = if page.title.is_empty() {
            "(no title)"
        } else {
            page.title.as_str()
        };
        panel.push(format!("[{}] {}", status, page.url));
        panel.push(format!(
            "      {} | {} words | {} backlinks",
            title, page.word_count, page.backlinks_count
        ));
    }
    panel.more(crawl.pages.len(), PAGE_LIMIT);
    panel
}

fn links(crawl: Option<&CrawlResults>) -> Panel {
    const TITLE: &str = "Links";
    let Some(crawl) = crawl else {
        return Panel::empty(TITLE, "No data available");
    };
    let Some(analysis) = crawl.link_analysis.as_ref() else {
        return Panel::empty(TITLE, "No data available");
    };

    let mut panel = Panel::new(TITLE);
    panel.push(format!("Internal links:   {}", analysis.total_internal_links));
    panel.push(format!("External links:   {}", analysis.total_external_links));
    panel.push(format!("Untitled links:   {}", analysis.untitled_links.len()));

    panel.push("");
    if analysis.broken_links.is_empty() {
        panel.push("No broken links found");
    } else {
        panel.push(format!("Broken links ({}):", analysis.broken_links.len()));
        for broken in analysis.broken_links.iter().take(LIST_LIMIT) {
            let reason = if broken.reason.is_empty() {
                broken.issue.as_str()
            } else {
                broken.reason.as_str()
            };
            panel.push(format!("  {} ({})", broken.link.url, reason));
            if !broken.link.source_page.is_empty() {
                panel.push(format!("    on {}", broken.link.source_page));
            }
        }
        panel.more(analysis.broken_links.len(), LIST_LIMIT);
    }

    panel.push("");
    if crawl.backlinks_map.is_empty() {
        panel.push("No backlinks data available");
    } else {
        let mut ranked: Vec<_> = crawl
            .backlinks_map
            .iter()
            .map(|(url, sources)| (url, sources.len()))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        panel.push("Most linked pages:");
        for (url, count) in ranked.iter().take(LIST_LIMIT) {
            panel.push(format!("  {:>4}  {}", count, url));
        }
        panel.more(ranked.len(), LIST_LIMIT);
    }
    panel
}

fn issues(audit: Option<&SeoAudit>) -> Panel {
    const TITLE: &str = "SEO Issues";
    let Some(audit) = audit else {
        return Panel::empty(TITLE, "No audit data available");
    };

    let mut panel = Panel::new(TITLE);
    panel.push(format!(
        "Score {:.0}/100 | {} issues | {} warnings | {} pages",
        audit.score,
        audit.summary.total_issues,
        audit.summary.total_warnings,
        audit.summary.total_pages
    ));

    panel.push("");
    if audit.issues.is_empty() {
        panel.push("No critical issues found");
    } else {
        panel.push(format!("Issues ({}):", audit.issues.len()));
        push_findings(&mut panel, &audit.issues);
    }

    panel.push("");
    if audit.warnings.is_empty() {
        panel.push("No warnings found");
    } else {
        panel.push(format!("Warnings ({}):", audit.warnings.len()));
        push_findings(&mut panel, &audit.warnings);
    }
    panel
}

fn push_findings(panel: &mut Panel, findings: &[AuditFinding]) {
    for finding in findings.iter().take(LIST_LIMIT) {
        let severity = if finding.severity.is_empty() {
            "info"
        } else {
            finding.severity.as_str()
        };
        panel.push(format!("  [{}] {}", severity, finding.message));
        if let Some(page) = &finding.page {
            panel.push(format!("      page: {}", page));
        }
        if let Some(fix) = &finding.fix {
            panel.push(format!("      fix:  {}", fix));
        }
    }
    panel.more(findings.len(), LIST_LIMIT);
}

fn keywords(analysis: Option<&KeywordAnalysis>) -> Panel {
    const TITLE: &str = "Keywords";
    let Some(analysis) = analysis else {
        return Panel::empty(TITLE, "No data available");
    };
    if analysis.is_empty() {
        return Panel::empty(TITLE, "No keyword data available");
    }

    let mut panel = Panel::new(TITLE);
    panel.push(format!("Total keywords: {}", analysis.total_keywords));

    let sets = &analysis.keywords;
    if !sets.rake.is_empty() {
        panel.push("");
        panel.push("Top phrases:");
        for kw in sets.rake.iter().take(LIST_LIMIT) {
            panel.push(format!("  {:>6.2}  {}", kw.score, kw.phrase));
        }
    }
    if !sets.tfidf.is_empty() {
        panel.push("");
        panel.push("Distinctive terms:");
        for kw in sets.tfidf.iter().take(LIST_LIMIT) {
            panel.push(format!("  {:>6.3}  {}", kw.tfidf_score, kw.term));
        }
    }
    if !sets.ngrams.bigrams.is_empty() {
        panel.push("");
        panel.push("Frequent bigrams:");
        for ngram in sets.ngrams.bigrams.iter().take(LIST_LIMIT) {
            panel.push(format!("  {:>6}  {}", ngram.frequency, ngram.term));
        }
    }
    if !analysis.keyword_clusters.is_empty() {
        panel.push("");
        panel.push("Clusters:");
        for cluster in analysis.keyword_clusters.iter().take(LIST_LIMIT) {
            panel.push(format!(
                "  {} ({}): {}",
                cluster.theme,
                cluster.size,
                cluster.keywords.join(", ")
            ));
        }
    }
    panel
}

fn page_power(report: Option<&PagePowerReport>) -> Panel {
    const TITLE: &str = "Page Power";
    let Some(report) = report.filter(|r| !r.is_empty()) else {
        return Panel::empty(TITLE, "No page power data available");
    };

    let mut panel = Panel::new(TITLE);
    panel.push(format!("Average power: {:.1}", report.average_power));
    panel.push("");

    if report.top_pages.is_empty() {
        panel.push("No data available");
        return panel;
    }
    panel.push("Top pages:");
    for page in report.top_pages.iter().take(LIST_LIMIT) {
        let level = if page.score.power_level.is_empty() {
            "-"
        } else {
            page.score.power_level.as_str()
        };
        panel.push(format!(
            "  {:>5.1}  {:<8} {}",
            page.score.total_score, level, page.url
        ));
        if let Some(tip) = page.score.recommendations.first() {
            panel.push(format!("         {}", tip));
        }
    }
    panel.more(report.top_pages.len(), LIST_LIMIT);
    panel
}

fn duplicates(report: Option<&DuplicateReport>) -> Panel {
    const TITLE: &str = "Duplicate Content";
    let Some(report) = report.filter(|r| !r.is_empty()) else {
        return Panel::empty(TITLE, "No duplicate content detected");
    };

    let mut panel = Panel::new(TITLE);
    panel.push(format!(
        "Found {} duplicate content pairs",
        report.total_duplicates.max(report.duplicates.len() as u64)
    ));
    if !report.methods_used.is_empty() {
        panel.push(format!("Methods used: {}", report.methods_used.join(", ")));
    }
    panel.push("");
    for pair in report.duplicates.iter().take(PAGE_LIMIT) {
        panel.push(format!(
            "  {:>3}% similar ({})",
            (pair.similarity * 100.0).round(),
            pair.method
        ));
        panel.push(format!("       {}", pair.page1));
        panel.push(format!("       {}", pair.page2));
    }
    panel.more(report.duplicates.len(), PAGE_LIMIT);
    panel
}

fn performance(report: Option<&PerformanceReport>) -> Panel {
    const TITLE: &str = "Performance";
    let Some(report) = report else {
        return Panel::empty(TITLE, "No performance data available");
    };
    if report.is_empty() {
        let mut panel = Panel::empty(TITLE, "No performance data available");
        if let Some(reason) = report.error.as_ref().or(report.note.as_ref()) {
            panel.push(reason.clone());
        }
        return panel;
    }

    let mut panel = Panel::new(TITLE);
    if let Some(summary) = &report.aggregated {
        panel.push(format!(
            "Avg score {:.0} | avg LCP {} | avg CLS {:.3} | {} pages analyzed",
            summary.avg_score, summary.avg_lcp, summary.avg_cls, summary.pages_analyzed
        ));
    }
    if let Some(note) = &report.note {
        panel.push(note.clone());
    }

    for page in &report.results {
        panel.push("");
        match page.score {
            Some(score) => panel.push(format!("{} (score {:.0})", page.url, score)),
            None => panel.push(page.url.clone()),
        }
        let metrics = [
            ("LCP", &page.lcp),
            ("CLS", &page.cls),
            ("FID", &page.fid),
            ("FCP", &page.fcp),
            ("TTI", &page.tti),
        ]
        .into_iter()
        .filter_map(|(name, metric)| metric.as_ref().map(|m| format!("{} {}", name, m)))
        .collect::<Vec<_>>();
        if !metrics.is_empty() {
            panel.push(format!("  {}", metrics.join(" | ")));
        }
        if let Some(error) = page.error.as_ref().or(page.note.as_ref()) {
            panel.push(format!("  {}", error));
        }
        for hint in page.recommendations.iter().take(3) {
            panel.push(format!("  - {}", hint.title));
        }
    }
    panel
}
