//! Markdown stripping for the plain-text download artifact.

/// Convert a markdown document to plain text: links keep their label, and
/// headings, emphasis markers, and horizontal rules are removed. This is a
/// download-artifact cleanup, not a full markdown parser.
pub fn to_plain_text(markdown: &str) -> String {
    let mut out = String::with_capacity(markdown.len());

    for line in markdown.lines() {
        let trimmed = line.trim_start();

        if trimmed == "---" || trimmed == "***" {
            continue;
        }

        let without_heading = if trimmed.starts_with('#') {
            trimmed.trim_start_matches('#').trim_start()
        } else {
            trimmed
        };

        let stripped = strip_links(without_heading)
            .replace("**", "")
            .replace('*', "")
            .replace('`', "");

        out.push_str(stripped.trim_end());
        out.push('\n');
    }

    out
}

/// Replace `[label](url)` with `label`. Stray brackets pass through.
fn strip_links(line: &str) -> String {
    let mut result = String::with_capacity(line.len());
    let mut rest = line;

    loop {
        match rest.find('[') {
            Some(open) => {
                if let Some(mid) = rest[open..].find("](") {
                    let mid = open + mid;
                    if let Some(end) = rest[mid + 2..].find(')') {
                        let end = mid + 2 + end;
                        result.push_str(&rest[..open]);
                        result.push_str(&rest[open + 1..mid]);
                        rest = &rest[end + 1..];
                        continue;
                    }
                }
                result.push_str(&rest[..=open]);
                rest = &rest[open + 1..];
            }
            None => {
                result.push_str(rest);
                break;
            }
        }
    }

    result
}
