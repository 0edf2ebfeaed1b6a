//! Line-oriented reader for the rule index
//!
//! Produces raw category sections; cross-section checks (duplicate ids)
//! happen in [`crate::catalog`].

use regex::Regex;
use steering_types::{Category, PriorityTier, RuleId};
use tracing::warn;

use crate::error::{CatalogError, Result};

/// A category heading and the entries listed under it
#[derive(Debug)]
pub(crate) struct RawSection {
    pub category: Category,
    pub line: usize,
    pub entries: Vec<RawEntry>,
}

#[derive(Debug)]
pub(crate) struct RawEntry {
    pub id: RuleId,
    pub summary: String,
    pub line: usize,
}

/// Heading levels that may open a category section
const CATEGORY_LEVELS: std::ops::RangeInclusive<usize> = 2..=4;

struct Patterns {
    heading: Regex,
    category_heading: Regex,
    heading_label: Regex,
    list_item: Regex,
    separator_cell: Regex,
}

impl Patterns {
    fn compile() -> Result<Self> {
        Ok(Self {
            heading: Regex::new(r"^ {0,3}(#{1,6})\s+(.*?)\s*#*\s*$")?,
            category_heading: Regex::new(r"^(?:\d+[.)]\s*)?(.+?)\s*\(([^()]+)\)$")?,
            heading_label: Regex::new(r"^(?:\d+[.)]\s*)?(.+?)(?:\s*\([^()]*\))?$")?,
            list_item: Regex::new(r"^\s*(?:[-*+]|\d+[.)])\s+(.*)$")?,
            separator_cell: Regex::new(r"^:?-+:?$")?,
        })
    }
}

pub(crate) fn parse_sections(content: &str) -> Result<Vec<RawSection>> {
    let patterns = Patterns::compile()?;
    let lines: Vec<&str> = content.lines().collect();

    let mut sections: Vec<RawSection> = Vec::new();
    let mut current: Option<RawSection> = None;
    let mut in_fence = false;

    for idx in body_start(&lines)..lines.len() {
        let line = lines[idx];
        let line_no = idx + 1;
        let trimmed = line.trim();

        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence || trimmed.is_empty() {
            continue;
        }

        if let Some(captures) = patterns.heading.captures(line) {
            if let Some(section) = current.take() {
                sections.push(section);
            }
            let level = captures.get(1).map_or(0, |m| m.as_str().len());
            let text = captures.get(2).map_or("", |m| m.as_str());
            let accepted = if CATEGORY_LEVELS.contains(&level) {
                category_heading(&patterns, text, line_no)?
            } else {
                None
            };
            if accepted.is_none() {
                if let Some(category) = unmarked_category(&patterns, text) {
                    warn!(
                        "Heading at line {} names category '{}' but is not a category heading \
                         (expected `{} {} ({})`); entries under it are ignored",
                        line_no,
                        category,
                        "#".repeat(level.clamp(2, 4)),
                        category,
                        category.tier()
                    );
                }
            }
            if let Some(category) = accepted {
                if let Some(first) = sections.iter().find(|s| s.category == category) {
                    return Err(CatalogError::DuplicateCategory {
                        category,
                        first_line: first.line,
                        second_line: line_no,
                    });
                }
                current = Some(RawSection {
                    category,
                    line: line_no,
                    entries: Vec::new(),
                });
            }
            continue;
        }

        let Some(section) = current.as_mut() else {
            continue;
        };

        if trimmed.starts_with('|') {
            let cells = table_cells(trimmed);
            if is_separator_row(&patterns, &cells) {
                continue;
            }
            let next_is_separator = lines
                .get(idx + 1)
                .map(|next| next.trim())
                .filter(|next| next.starts_with('|'))
                .is_some_and(|next| is_separator_row(&patterns, &table_cells(next)));
            if next_is_separator {
                // header row
                continue;
            }
            let entry = table_entry(section.category, &cells, trimmed, line_no)?;
            section.entries.push(entry);
        } else if let Some(captures) = patterns.list_item.captures(line) {
            let text = captures.get(1).map_or("", |m| m.as_str());
            let entry = list_entry(section.category, text, trimmed, line_no)?;
            section.entries.push(entry);
        }
    }

    if let Some(section) = current.take() {
        sections.push(section);
    }

    Ok(sections)
}

/// Index of the first line after a leading frontmatter block
fn body_start(lines: &[&str]) -> usize {
    let opens = lines
        .first()
        .is_some_and(|first| first.trim_start_matches('\u{feff}').trim_end() == "---");
    if !opens {
        return 0;
    }
    lines
        .iter()
        .skip(1)
        .position(|line| line.trim_end() == "---")
        .map_or(0, |pos| pos + 2)
}

/// Category named by a heading that was not accepted as a category heading
fn unmarked_category(patterns: &Patterns, text: &str) -> Option<Category> {
    let label = patterns.heading_label.captures(text)?.get(1)?.as_str();
    label.parse::<Category>().ok()
}

/// Resolve heading text to a category.
///
/// Only headings whose parenthetical is a priority tier are category
/// headings; anything else is ordinary prose structure.
fn category_heading(patterns: &Patterns, text: &str, line: usize) -> Result<Option<Category>> {
    let Some(captures) = patterns.category_heading.captures(text) else {
        return Ok(None);
    };
    let label = captures.get(1).map_or("", |m| m.as_str());
    let tier_label = captures.get(2).map_or("", |m| m.as_str());

    let Ok(declared) = tier_label.parse::<PriorityTier>() else {
        return Ok(None);
    };

    let category = label
        .parse::<Category>()
        .map_err(|_| CatalogError::UnknownCategory {
            label: label.trim().to_string(),
            line,
        })?;

    if category.tier() != declared {
        return Err(CatalogError::TierMismatch {
            category,
            declared,
            expected: category.tier(),
            line,
        });
    }

    Ok(Some(category))
}

/// Split a table row on unescaped pipes; `\|` becomes a literal `|`
fn table_cells(row: &str) -> Vec<String> {
    let row = row.trim();
    let inner = row.strip_prefix('|').unwrap_or(row);

    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'|') => {
                cell.push('|');
                chars.next();
            }
            '|' => cells.push(std::mem::take(&mut cell)),
            _ => cell.push(c),
        }
    }
    // text after the closing pipe, if any
    if !cell.trim().is_empty() {
        cells.push(cell);
    }

    cells.into_iter().map(|cell| cell.trim().to_string()).collect()
}

fn is_separator_row(patterns: &Patterns, cells: &[String]) -> bool {
    !cells.is_empty() && cells.iter().all(|cell| patterns.separator_cell.is_match(cell))
}

fn table_entry(category: Category, cells: &[String], raw: &str, line: usize) -> Result<RawEntry> {
    let malformed = |reason: String| CatalogError::MalformedEntry {
        category,
        line,
        entry: raw.to_string(),
        reason,
    };

    if cells.len() < 2 {
        return Err(malformed("expected `id | summary` cells".to_string()));
    }

    let id = RuleId::parse(&clean_id(&cells[0])).map_err(|e| malformed(e.to_string()))?;
    let summary = cells[1].trim();
    if summary.is_empty() {
        return Err(malformed("summary cannot be empty".to_string()));
    }

    Ok(RawEntry {
        id,
        summary: summary.to_string(),
        line,
    })
}

fn list_entry(category: Category, text: &str, raw: &str, line: usize) -> Result<RawEntry> {
    let malformed = |reason: String| CatalogError::MalformedEntry {
        category,
        line,
        entry: raw.to_string(),
        reason,
    };

    let (id_text, rest) = split_list_item(text.trim());
    if id_text.is_empty() {
        return Err(malformed("missing rule id".to_string()));
    }
    let id = RuleId::parse(&clean_id(id_text)).map_err(|e| malformed(e.to_string()))?;

    let summary = rest
        .trim_start()
        .trim_start_matches([':', '-', '\u{2013}', '\u{2014}', '|'])
        .trim();
    if summary.is_empty() {
        return Err(malformed("summary cannot be empty".to_string()));
    }

    Ok(RawEntry {
        id,
        summary: summary.to_string(),
        line,
    })
}

/// Split a list item into the id token and the remaining text.
///
/// The id may be a link (`[id](steering/id.md)`), code span, bold span or a
/// bare word terminated by whitespace or `:`.
fn split_list_item(text: &str) -> (&str, &str) {
    if let Some(after) = text.strip_prefix('[') {
        if let Some(close) = after.find("](") {
            let rest = &after[close + 2..];
            let rest = rest.find(')').map_or("", |end| &rest[end + 1..]);
            return (&after[..close], rest);
        }
    }
    for delimiter in ["**", "`"] {
        if let Some(after) = text.strip_prefix(delimiter) {
            if let Some(end) = after.find(delimiter) {
                return (&after[..end], &after[end + delimiter.len()..]);
            }
        }
    }
    match text.find(|c: char| c.is_whitespace() || c == ':') {
        Some(end) => (&text[..end], &text[end..]),
        None => (text, ""),
    }
}

fn clean_id(raw: &str) -> String {
    raw.trim()
        .trim_matches(|c| c == '`' || c == '*')
        .trim()
        .to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list_item_forms() {
        assert_eq!(
            split_list_item("`async-parallel` - Use Promise.all()"),
            ("async-parallel", " - Use Promise.all()")
        );
        assert_eq!(
            split_list_item("[async-parallel](steering/async-parallel.md): Use Promise.all()"),
            ("async-parallel", ": Use Promise.all()")
        );
        assert_eq!(
            split_list_item("**js-early-exit** Return early"),
            ("js-early-exit", " Return early")
        );
        assert_eq!(
            split_list_item("js-early-exit: Return early"),
            ("js-early-exit", ": Return early")
        );
        assert_eq!(split_list_item("lonely"), ("lonely", ""));
    }

    #[test]
    fn test_body_start_skips_frontmatter() {
        let lines = vec!["---", "name: x", "---", "# Title"];
        assert_eq!(body_start(&lines), 3);
        assert_eq!(body_start(&["# Title"]), 0);
        assert_eq!(body_start(&["---", "never closed"]), 0);
    }

    #[test]
    fn test_headings_inside_code_fences_are_ignored() {
        let content = "\
## Advanced Patterns (LOW)
- `advanced-use-latest` - Keep a stable ref to the latest callback

```bash
## Eliminating Waterfalls (CRITICAL)
```
";
        let sections = parse_sections(content).unwrap();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].category, Category::AdvancedPatterns);
        assert_eq!(sections[0].entries.len(), 1);
    }

    #[test]
    fn test_non_tier_parenthetical_is_plain_heading() {
        let content = "\
## Troubleshooting (FAQ)
- not an entry at all
";
        let sections = parse_sections(content).unwrap();
        assert!(sections.is_empty());
    }

    #[test]
    fn test_table_with_extra_columns() {
        let content = "\
### 3. Server-Side Performance (HIGH)
| Rule | Description | Impact |
|:-----|:-----------:|-------:|
| server-cache-react | Use React.cache() for per-request deduplication | HIGH |
";
        let sections = parse_sections(content).unwrap();
        let entry = &sections[0].entries[0];
        assert_eq!(entry.id.as_str(), "server-cache-react");
        assert_eq!(entry.summary, "Use React.cache() for per-request deduplication");
        assert_eq!(entry.line, 4);
    }

    #[test]
    fn test_escaped_pipe_in_table_summary() {
        let content = "\
### 6. Rendering Performance (MEDIUM)
| Rule | Description |
|------|-------------|
| `rendering-conditional-render` | Use ternary, not `a \\|\\| b`, for conditionals |
| rendering-hoist-jsx | Hoist static JSX \\| outside components
";
        let sections = parse_sections(content).unwrap();
        let entries = &sections[0].entries;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id.as_str(), "rendering-conditional-render");
        assert_eq!(entries[0].summary, "Use ternary, not `a || b`, for conditionals");
        assert_eq!(entries[1].summary, "Hoist static JSX | outside components");
    }

    #[test]
    fn test_table_cells_split_on_unescaped_pipes() {
        assert_eq!(table_cells("| a | b |"), vec!["a", "b"]);
        assert_eq!(table_cells("| a | b"), vec!["a", "b"]);
        assert_eq!(table_cells(r"| a | x \| y |"), vec!["a", "x | y"]);
        assert_eq!(table_cells(r"| a | back\slash |"), vec!["a", r"back\slash"]);
        assert_eq!(table_cells("| a | |"), vec!["a", ""]);
    }

    #[test]
    fn test_unmarked_category_heading_is_detected() {
        let patterns = Patterns::compile().unwrap();
        assert_eq!(
            unmarked_category(&patterns, "3. Server-Side Performance"),
            Some(Category::ServerSidePerformance)
        );
        assert_eq!(
            unmarked_category(&patterns, "Server-Side Performance (notes)"),
            Some(Category::ServerSidePerformance)
        );
        assert_eq!(unmarked_category(&patterns, "Troubleshooting (FAQ)"), None);
        assert_eq!(unmarked_category(&patterns, "Review checklist"), None);

        let content = "\
### 3. Server-Side Performance
| server-cache-react | Use React.cache() for per-request deduplication |
";
        assert!(parse_sections(content).unwrap().is_empty());
    }

    #[test]
    fn test_category_heading_levels() {
        for heading in [
            "# Eliminating Waterfalls (CRITICAL)",
            "##### Eliminating Waterfalls (CRITICAL)",
        ] {
            let content = format!("{heading}\n- `async-parallel` - Use Promise.all()\n");
            assert!(parse_sections(&content).unwrap().is_empty(), "{heading}");
        }

        for heading in [
            "## Eliminating Waterfalls (CRITICAL)",
            "#### Eliminating Waterfalls (CRITICAL)",
        ] {
            let content = format!("{heading}\n- `async-parallel` - Use Promise.all()\n");
            let sections = parse_sections(&content).unwrap();
            assert_eq!(sections.len(), 1, "{heading}");
            assert_eq!(sections[0].entries.len(), 1, "{heading}");
        }
    }
}
