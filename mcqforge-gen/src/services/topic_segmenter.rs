//! Topic segmentation
//!
//! Splits source text into ordered, labeled sections in a single linear pass.
//! A heading line sets the current topic and contributes no content.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// Topic used before the first heading and when nothing else applies
pub const DEFAULT_TOPIC: &str = "General";

/// Markdown heading (`# Title`) or a capitalized label line ending in a colon
static HEADING_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(#{1,6}\s+.+|[A-Z][A-Za-z0-9\s]{2,}:)$").expect("heading pattern is valid")
});

/// Ordered lines grouped under one topic label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicSection {
    pub topic: String,
    pub lines: Vec<String>,
}

/// Sections ordered by first appearance of their topic
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicSections {
    sections: Vec<TopicSection>,
    index: HashMap<String, usize>,
}

impl TopicSections {
    fn push_line(&mut self, topic: &str, line: String) {
        let idx = match self.index.get(topic) {
            Some(&idx) => idx,
            None => {
                self.sections.push(TopicSection {
                    topic: topic.to_string(),
                    lines: Vec::new(),
                });
                self.index.insert(topic.to_string(), self.sections.len() - 1);
                self.sections.len() - 1
            }
        };
        self.sections[idx].lines.push(line);
    }

    fn general_only() -> Self {
        let mut sections = Self::default();
        sections.sections.push(TopicSection {
            topic: DEFAULT_TOPIC.to_string(),
            lines: Vec::new(),
        });
        sections.index.insert(DEFAULT_TOPIC.to_string(), 0);
        sections
    }

    pub fn iter(&self) -> impl Iterator<Item = &TopicSection> {
        self.sections.iter()
    }

    pub fn get(&self, topic: &str) -> Option<&[String]> {
        self.index
            .get(topic)
            .map(|&idx| self.sections[idx].lines.as_slice())
    }

    pub fn topics(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.topic.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// True if a trimmed line is a topic heading
pub fn is_heading(line: &str) -> bool {
    HEADING_PATTERN.is_match(line)
}

/// Topic label for a heading line: hash marker and trailing colon stripped,
/// then trimmed
pub fn heading_label(line: &str) -> String {
    let label = line.trim_start_matches('#').trim().trim_end_matches(':').trim();
    if label.is_empty() {
        DEFAULT_TOPIC.to_string()
    } else {
        label.to_string()
    }
}

/// Line boundaries: `\n`, `\r` (a `\r\n` pair leaves an empty piece that
/// is filtered out), vertical tab, form feed, the C0 separators, NEL and
/// the Unicode line/paragraph separators
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\u{0b}' | '\u{0c}' | '\u{1c}'..='\u{1e}' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TopicSegmenter;

impl TopicSegmenter {
    pub fn new() -> Self {
        Self
    }

    /// Segment raw text; blank lines are dropped and the rest trimmed
    pub fn segment(&self, text: &str) -> TopicSections {
        self.segment_lines(
            text.split(is_line_break)
                .map(str::trim)
                .filter(|line| !line.is_empty()),
        )
    }

    /// Segment already-trimmed, non-empty lines
    ///
    /// Topics that never receive a line do not appear. When no section
    /// results at all, a single empty "General" section is returned.
    pub fn segment_lines<'a, I>(&self, lines: I) -> TopicSections
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut sections = TopicSections::default();
        let mut topic = DEFAULT_TOPIC.to_string();

        for line in lines {
            if is_heading(line) {
                topic = heading_label(line);
                continue;
            }
            sections.push_line(&topic, line.to_string());
        }

        if sections.is_empty() {
            return TopicSections::general_only();
        }

        tracing::debug!(topics = sections.len(), "Topic segmentation complete");
        sections
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markdown_headings() {
        let text = "# Antibiotics\nPenicillin\nCephalosporins\n# Analgesics\nIbuprofen";
        let sections = TopicSegmenter::new().segment(text);
        assert_eq!(sections.topics(), vec!["Antibiotics", "Analgesics"]);
        assert_eq!(
            sections.get("Antibiotics").unwrap(),
            ["Penicillin".to_string(), "Cephalosporins".to_string()]
        );
        assert_eq!(sections.get("Analgesics").unwrap(), ["Ibuprofen".to_string()]);
    }

    #[test]
    fn test_colon_headings() {
        let text = "Mechanisms of Action:\nBeta-lactams bind PBPs\nside note: not a heading";
        let sections = TopicSegmenter::new().segment(text);
        assert_eq!(sections.topics(), vec!["Mechanisms of Action"]);
        assert_eq!(sections.get("Mechanisms of Action").unwrap().len(), 2);
    }

    #[test]
    fn test_colon_heading_label_is_trimmed() {
        let text = "Mechanisms of Action :\nBeta-lactams bind PBPs\nMechanisms of Action:\nVancomycin binds D-Ala";
        let sections = TopicSegmenter::new().segment(text);
        assert_eq!(sections.topics(), vec!["Mechanisms of Action"]);
        assert_eq!(sections.get("Mechanisms of Action").unwrap().len(), 2);
    }

    #[test]
    fn test_bare_carriage_return_separates_lines() {
        let text = "# Antibiotics\rPenicillin inhibits cell wall synthesis\r# Analgesics\rIbuprofen reduces inflammation\r";
        let sections = TopicSegmenter::new().segment(text);
        assert_eq!(sections.topics(), vec!["Antibiotics", "Analgesics"]);
        assert_eq!(
            sections.get("Antibiotics").unwrap(),
            ["Penicillin inhibits cell wall synthesis".to_string()]
        );
        assert_eq!(
            sections.get("Analgesics").unwrap(),
            ["Ibuprofen reduces inflammation".to_string()]
        );
    }

    #[test]
    fn test_mixed_line_separators() {
        let text = "# Renal\r\nNephron\u{2028}Glomerulus\u{0c}# Hepatic\u{85}Hepatocyte";
        let sections = TopicSegmenter::new().segment(text);
        assert_eq!(sections.topics(), vec!["Renal", "Hepatic"]);
        assert_eq!(
            sections.get("Renal").unwrap(),
            ["Nephron".to_string(), "Glomerulus".to_string()]
        );
        assert_eq!(sections.get("Hepatic").unwrap(), ["Hepatocyte".to_string()]);
    }

    #[test]
    fn test_lines_before_first_heading_are_general() {
        let text = "Intro line\n\n   \n## Renal\nLoop diuretics";
        let sections = TopicSegmenter::new().segment(text);
        assert_eq!(sections.topics(), vec!["General", "Renal"]);
        assert_eq!(sections.get("General").unwrap(), ["Intro line".to_string()]);
    }

    #[test]
    fn test_fallback_without_headings() {
        let sections = TopicSegmenter::new().segment("Line one\nLine two");
        assert_eq!(sections.topics(), vec!["General"]);
        assert_eq!(sections.get("General").unwrap().len(), 2);
    }

    #[test]
    fn test_empty_input_yields_one_empty_general() {
        for text in ["", "\n  \n", "# Only\n# Headings"] {
            let sections = TopicSegmenter::new().segment(text);
            assert_eq!(sections.len(), 1);
            assert_eq!(sections.get("General").unwrap().len(), 0);
        }
    }

    #[test]
    fn test_heading_without_lines_is_dropped() {
        let sections = TopicSegmenter::new().segment("# Empty\n# Full\nbody");
        assert_eq!(sections.topics(), vec!["Full"]);
    }

    #[test]
    fn test_repeated_topic_keeps_first_position() {
        let text = "# A\na1\n# B\nb1\n# A\na2";
        let sections = TopicSegmenter::new().segment(text);
        assert_eq!(sections.topics(), vec!["A", "B"]);
        assert_eq!(sections.get("A").unwrap(), ["a1".to_string(), "a2".to_string()]);
    }

    #[test]
    fn test_heading_detection() {
        assert!(is_heading("# Title"));
        assert!(is_heading("###### Deep"));
        assert!(!is_heading("####### Too deep"));
        assert!(!is_heading("#NoSpace"));
        assert!(is_heading("Pharmacokinetics:"));
        assert!(!is_heading("lowercase start:"));
        assert!(!is_heading("Ab:"));
        assert!(!is_heading("Dose (mg):"));
        assert_eq!(heading_label("## Cardio:"), "Cardio");
        assert_eq!(heading_label("# :"), "General");
    }
}
