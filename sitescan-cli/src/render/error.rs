//! Failed-scan view

use colored::*;
use sitescan_core::domain::error::{ErrorDescriptor, TIMEOUT_ERROR_KIND};

const TROUBLESHOOTING_TIPS: [&str; 5] = [
    "Make sure the website URL is correct and accessible",
    "Try with a smaller number of pages (10-20)",
    "Check if the website blocks automated crawlers",
    "Try a different website to test",
    "Check the backend terminal for more detailed error logs",
];

const TIMEOUT_TIPS: [&str; 2] = [
    "The backend may still be working; run `sitescan watch <scan-id>` again later",
    "Raise the limit with --timeout-secs or SITESCAN_MAX_DURATION_SECS",
];

/// What gets printed for a failed scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorView<'a> {
    pub message: &'a str,
    pub kind: &'a str,
    /// Traceback, only when it was asked for
    pub trace: Option<&'a str>,
    /// A traceback exists but is hidden
    pub trace_hidden: bool,
    pub tips: &'static [&'static str],
}

impl<'a> ErrorView<'a> {
    pub fn new(error: &'a ErrorDescriptor, show_trace: bool) -> Self {
        let tips: &'static [&'static str] = if error.kind == TIMEOUT_ERROR_KIND {
            &TIMEOUT_TIPS
        } else {
            &TROUBLESHOOTING_TIPS
        };
        Self {
            message: &error.message,
            kind: &error.kind,
            trace: error.detail.as_deref().filter(|_| show_trace),
            trace_hidden: error.detail.is_some() && !show_trace,
            tips,
        }
    }
}

pub fn print_error(view: &ErrorView<'_>) {
    println!("{}", "✗ Scan Error".red().bold());
    println!("  {}", view.message.red());
    println!("  {}", format!("Error Type: {}", view.kind).dimmed());

    if let Some(trace) = view.trace {
        println!();
        println!("{}", "Technical Details (Traceback):".bold());
        println!("{}", "─".repeat(60).dimmed());
        for line in trace.lines() {
            println!("  {}", line.dimmed());
        }
        println!("{}", "─".repeat(60).dimmed());
    } else if view.trace_hidden {
        println!(
            "  {}",
            "Run with --show-trace to see technical details".dimmed()
        );
    }

    println!();
    println!("{}", "Troubleshooting Tips:".bold());
    for tip in view.tips {
        println!("  • {}", tip);
    }
    println!();
    println!(
        "{}",
        "Try another scan: sitescan submit <url> --watch".cyan()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(kind: &str, detail: Option<&str>) -> ErrorDescriptor {
        ErrorDescriptor {
            message: "Failed to crawl website: timeout".to_string(),
            kind: kind.to_string(),
            detail: detail.map(str::to_string),
        }
    }

    #[test]
    fn traceback_hidden_by_default() {
        let error = descriptor("Exception", Some("Traceback (most recent call last): ..."));
        let view = ErrorView::new(&error, false);

        assert!(view.trace.is_none());
        assert!(view.trace_hidden);
        assert_eq!(view.kind, "Exception");
    }

    #[test]
    fn traceback_shown_on_request() {
        let error = descriptor("Exception", Some("Traceback ..."));
        let view = ErrorView::new(&error, true);

        assert_eq!(view.trace, Some("Traceback ..."));
        assert!(!view.trace_hidden);
    }

    #[test]
    fn no_traceback_nothing_to_disclose() {
        let error = descriptor("UnknownError", None);
        let view = ErrorView::new(&error, false);

        assert!(view.trace.is_none());
        assert!(!view.trace_hidden);
        assert_eq!(view.tips.len(), TROUBLESHOOTING_TIPS.len());
    }

    #[test]
    fn timeout_gets_its_own_tips() {
        let error = ErrorDescriptor::timeout("30 status polls");
        let view = ErrorView::new(&error, false);

        assert_eq!(view.tips, &TIMEOUT_TIPS);
    }
}
