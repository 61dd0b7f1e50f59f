//! Fixed-width report layout.
//!
//! Every line of a report is at most 80 columns wide. Headings are truncated rather than wrapped,
//! and centring puts the smaller half of the padding on the left.

use std::fmt::Write as _;

use super::tally::Tally;

/// Width of banners and borders.
pub const WIDTH: usize = 80;

/// Section kinds, as shown in the `h2` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Failure,
    Exception,
    Output,
    Crisis,
}

impl Section {
    pub fn label(self) -> &'static str {
        match self {
            Section::Failure => "Failure",
            Section::Exception => "Exception",
            Section::Output => "Output",
            Section::Crisis => "Crisis",
        }
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Cut `text` to `limit` characters plus `...` once it reaches `limit`.
fn truncate(text: &str, limit: usize) -> String {
    if char_len(text) >= limit {
        let mut cut: String = text.chars().take(limit).collect();
        cut.push_str("...");
        cut
    } else {
        text.to_string()
    }
}

/// Centre `text` in `width` columns; the extra space of an odd padding goes on the right.
pub fn center(text: &str, width: usize) -> String {
    let padding = width.saturating_sub(char_len(text));
    let left = padding / 2;
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(padding - left))
}

/// Top-level banner:
///
/// ```text
/// ################################################################################
/// #                                  heading                                     #
/// ################################################################################
/// ```
pub fn h1(heading: &str) -> String {
    let banner = "#".repeat(WIDTH);
    format!("{banner}\n# {} #\n{banner}\n", center(&truncate(heading, 73), 76))
}

/// Section header for one reported statement.
pub fn h2(section: Section, text: &str, line: i64) -> String {
    let border = format!("+{}+", "-".repeat(WIDTH - 2));
    format!(
        "{border}\n| {:<10}  {}  LINE: {:>4} |\n{border}\n\n",
        section.label().to_uppercase(),
        center(&truncate(text, 49), 52),
        line
    )
}

/// One operand of a failed comparison: its text, a rule, and its value.
pub fn h3(text: &str, value: &str) -> String {
    format!("{}\n{}\n{}\n\n", truncate(text, 73), "-".repeat(WIDTH), value)
}

/// `" 50%"`, or `"   -"` when nothing ran.
pub fn percent_label(percent: Option<u32>) -> String {
    let label = percent.map_or_else(|| "-".to_string(), |p| format!("{p}%"));
    format!("{label:>4}")
}

/// The summary block printed above and below a report.
pub fn summary(heading: &str, tally: &Tally, elapsed_secs: f64) -> String {
    let counters = [
        format!("       passed: {:>4}  ", tally.passes),
        format!("       failed: {:>4}  ", tally.failures),
        format!("   exceptions: {:>4}  ", tally.exceptions),
        " ------------------- ".to_string(),
        format!("  total tests: {:>4}  ", tally.total()),
        format!("      passing: {}  ", percent_label(tally.percent_passing())),
        format!(" other errors: {:>4}  ", tally.other_exceptions),
        "                   ".to_string(),
        format!(" time elapsed: {elapsed_secs:.1}s  "),
    ];
    let framed_blank = format!("#{}#", " ".repeat(WIDTH - 2));

    let mut out = h1(heading);
    let _ = writeln!(out, "{framed_blank}");
    for line in &counters {
        let _ = writeln!(out, "# {} #", center(line, WIDTH - 4));
    }
    let _ = writeln!(out, "{framed_blank}");
    let _ = writeln!(out, "{}", "#".repeat(WIDTH));
    out.push('\n');
    out
}

/// A complete report: summary, captured body, summary.
pub fn render(heading: &str, tally: &Tally, elapsed_secs: f64, body: &str) -> String {
    let summary = summary(heading, tally, elapsed_secs);
    format!("{summary}{body}\n{summary}")
}

/// Heading of an aggregated report over `files` files.
pub fn executive_heading(files: usize) -> String {
    let noun = if files == 1 { "file" } else { "files" };
    format!("EXECUTIVE SUMMARY: {files} {noun}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centring_puts_the_odd_space_on_the_right() {
        assert_eq!(center("ab", 5), " ab  ");
        assert_eq!(center("abc", 5), " abc ");
        assert_eq!(center("toolong", 3), "toolong");
    }

    #[test]
    fn h1_is_three_full_width_lines() {
        let banner = h1("t.py");
        let lines: Vec<&str> = banner.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|line| line.len() == WIDTH));
        assert_eq!(lines[1].trim_matches(|c| c == '#' || c == ' '), "t.py");
    }

    #[test]
    fn long_headings_are_truncated() {
        let heading = "x".repeat(100);
        let line = h1(&heading).lines().nth(1).unwrap().to_string();
        assert_eq!(line.len(), WIDTH);
        assert!(line.contains(&format!("{}...", "x".repeat(73))));
    }

    #[test]
    fn h2_layout() {
        let header = h2(Section::Failure, "1+1==3", 1);
        let lines: Vec<&str> = header.lines().collect();
        assert_eq!(lines[0], format!("+{}+", "-".repeat(78)));
        assert_eq!(lines[1].len(), WIDTH);
        assert!(lines[1].starts_with("| FAILURE     "));
        assert!(lines[1].ends_with("LINE:    1 |"));
        assert!(lines[1].contains("1+1==3"));
        assert_eq!(lines[3], "");
    }

    #[test]
    fn h3_layout() {
        assert_eq!(h3("1 + 1", "2"), format!("1 + 1\n{}\n2\n\n", "-".repeat(80)));
    }

    #[test]
    fn summary_lines_are_framed() {
        let tally = Tally {
            passes: 9,
            failures: 4,
            exceptions: 5,
            other_exceptions: 0,
        };
        let text = summary("t.py", &tally, 0.25);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3 + 1 + 9 + 1 + 1 + 1);
        assert!(lines[..15].iter().all(|line| line.chars().count() == WIDTH));
        assert!(text.contains("      passing:  50%  "));
        assert!(text.contains("  total tests:   18  "));
        assert!(text.contains(" time elapsed: 0.2s  ") || text.contains(" time elapsed: 0.3s  "));
        assert_eq!(lines[15], "");
    }

    #[test]
    fn percent_placeholder() {
        assert_eq!(percent_label(None), "   -");
        assert_eq!(percent_label(Some(100)), "100%");
    }

    #[test]
    fn executive_heading_pluralises() {
        assert_eq!(executive_heading(1), "EXECUTIVE SUMMARY: 1 file");
        assert_eq!(executive_heading(3), "EXECUTIVE SUMMARY: 3 files");
    }
}
