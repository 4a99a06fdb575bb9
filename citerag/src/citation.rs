//! Citation formatting and context assembly.
//!
//! The [`CitationFormatter`] turns the ordered passages returned for a query
//! into the context block sent to the language model, and decorates the
//! model's answer with the sources it was given. It holds no state beyond its
//! [`CitationConfig`]; identical inputs always produce identical output.
//!
//! # Example
//!
//! ```
//! use citerag::{CitationConfig, CitationFormatter, CitationStyle, RetrievedPassage};
//!
//! let config = CitationConfig { style: CitationStyle::Inline, ..Default::default() };
//! let formatter = CitationFormatter::new(config);
//! let passages = vec![RetrievedPassage::new("Rent is paid to the owner.", "rules.pdf:4:0", 0.2)];
//!
//! assert_eq!(formatter.build_context(&passages), "Rent is paid to the owner. [1]");
//! assert!(formatter.build_answer("You pay rent [1].", &passages).ends_with("[1] rules.pdf, Page 4"));
//! ```

use std::collections::HashSet;

use crate::config::{CitationConfig, CitationStyle};
use crate::document::RetrievedPassage;
use crate::prompt::PromptTemplate;
use crate::source::CitationEntry;

/// Returned instead of an answer when retrieval finds nothing.
pub const NO_RESULTS_MESSAGE: &str = "No relevant documents found.";

/// Separator placed between annotated passages.
pub const CONTEXT_SEPARATOR: &str = "\n\n---\n\n";

/// Renders source annotations for context blocks and answers.
#[derive(Debug, Clone, Default)]
pub struct CitationFormatter {
    config: CitationConfig,
}

impl CitationFormatter {
    /// Create a formatter with the given display options.
    pub fn new(config: CitationConfig) -> Self {
        Self { config }
    }

    /// Return the display options.
    pub fn config(&self) -> &CitationConfig {
        &self.config
    }

    /// One citation per passage, numbered from 1 in retrieval order.
    pub fn citations(&self, passages: &[RetrievedPassage]) -> Vec<CitationEntry> {
        passages
            .iter()
            .enumerate()
            .map(|(i, passage)| {
                let mut entry = CitationEntry::from_source_id(i + 1, &passage.source);
                entry.filename = self.truncate(&entry.filename);
                entry
            })
            .collect()
    }

    /// The prompt template matching the configured style.
    pub fn prompt_template(&self) -> PromptTemplate {
        if self.config.include_citations {
            PromptTemplate::for_style(self.config.style)
        } else {
            PromptTemplate::plain()
        }
    }

    /// Build the context block for the language model.
    ///
    /// Passages keep their input order and each content appears verbatim
    /// exactly once, preceded (or, for inline style, followed) by its
    /// source annotation.
    pub fn build_context(&self, passages: &[RetrievedPassage]) -> String {
        if !self.config.include_citations {
            return passages
                .iter()
                .map(|p| p.content.as_str())
                .collect::<Vec<_>>()
                .join(CONTEXT_SEPARATOR);
        }

        let citations = self.citations(passages);
        let blocks = passages.iter().zip(&citations).map(|(passage, c)| match self.config.style {
            CitationStyle::Numbered => format!(
                "Source {}: {}, Page {}\nContent: {}",
                c.index, c.filename, c.page, passage.content
            ),
            CitationStyle::Inline => format!("{} [{}]", passage.content, c.index),
            CitationStyle::Bibliography => {
                format!("[Source: {}, Page: {}]\n{}", c.filename, c.page, passage.content)
            }
        });

        let separator = match self.config.style {
            CitationStyle::Bibliography => CONTEXT_SEPARATOR,
            CitationStyle::Numbered | CitationStyle::Inline => "\n\n",
        };
        blocks.collect::<Vec<_>>().join(separator)
    }

    /// Append the source list to the model's raw answer.
    ///
    /// With citations disabled, or no passages, the response is returned
    /// unchanged.
    pub fn build_answer(&self, response: &str, passages: &[RetrievedPassage]) -> String {
        if !self.config.include_citations || passages.is_empty() {
            return response.to_string();
        }

        let citations = self.citations(passages);
        let mut answer = match self.config.style {
            CitationStyle::Numbered => {
                let lines: Vec<String> = citations
                    .iter()
                    .map(|c| format!("Source {}: {} (Page {})", c.index, c.filename, c.page))
                    .collect();
                format!("Answer: {response}\n\nSources Referenced:\n{}", lines.join("\n"))
            }
            CitationStyle::Inline => {
                let lines: Vec<String> = citations
                    .iter()
                    .map(|c| format!("[{}] {}, Page {}", c.index, c.filename, c.page))
                    .collect();
                format!("{response}\n\nReferences:\n{}", lines.join("\n"))
            }
            CitationStyle::Bibliography => {
                let mut seen = HashSet::new();
                let lines: Vec<String> = citations
                    .iter()
                    .filter(|c| seen.insert((c.filename.clone(), c.page.clone())))
                    .map(|c| format!("- {} (Page {})", c.filename, c.page))
                    .collect();
                format!("Response: {response}\n\nSources used:\n{}", lines.join("\n"))
            }
        };

        if self.config.show_similarity_scores {
            let scores: Vec<String> = passages.iter().map(|p| format!("{:.3}", p.score)).collect();
            answer.push_str(&format!("\n\nSimilarity Scores: [{}]", scores.join(", ")));
        }

        answer
    }

    fn truncate(&self, filename: &str) -> String {
        let max = self.config.max_citation_length;
        if filename.chars().count() <= max {
            return filename.to_string();
        }
        let mut cut: String = filename.chars().take(max.saturating_sub(3)).collect();
        cut.push_str("...");
        cut
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formatter(style: CitationStyle) -> CitationFormatter {
        CitationFormatter::new(CitationConfig { style, ..Default::default() })
    }

    fn three_passages() -> Vec<RetrievedPassage> {
        vec![
            RetrievedPassage::new("alpha", "a.pdf:1:0", 0.1),
            RetrievedPassage::new("beta", "a.pdf:1:1", 0.2),
            RetrievedPassage::new("gamma", "b.pdf:4:0", 0.3),
        ]
    }

    #[test]
    fn numbered_context_keeps_order_and_annotations() {
        let context = formatter(CitationStyle::Numbered).build_context(&three_passages());
        assert_eq!(
            context,
            "Source 1: a.pdf, Page 1\nContent: alpha\n\n\
             Source 2: a.pdf, Page 1\nContent: beta\n\n\
             Source 3: b.pdf, Page 4\nContent: gamma"
        );
    }

    #[test]
    fn bibliography_context_uses_rule_separator() {
        let context = formatter(CitationStyle::Bibliography).build_context(&three_passages());
        let sections: Vec<&str> = context.split(CONTEXT_SEPARATOR).collect();
        assert_eq!(
            sections,
            vec![
                "[Source: a.pdf, Page: 1]\nalpha",
                "[Source: a.pdf, Page: 1]\nbeta",
                "[Source: b.pdf, Page: 4]\ngamma",
            ]
        );
    }

    #[test]
    fn inline_markers_follow_each_passage() {
        let passages =
            vec![RetrievedPassage::new("x", "p1", 0.5), RetrievedPassage::new("y", "p2", 0.6)];
        let f = formatter(CitationStyle::Inline);

        assert_eq!(f.build_context(&passages), "x [1]\n\ny [2]");

        let answer = f.build_answer("x and y [1][2]", &passages);
        let (body, references) = answer.split_once("\n\nReferences:\n").unwrap();
        assert_eq!(body, "x and y [1][2]");
        let lines: Vec<&str> = references.lines().collect();
        assert_eq!(lines, vec!["[1] p1, Page Unknown", "[2] p2, Page Unknown"]);
    }

    #[test]
    fn numbered_answer_lists_every_passage() {
        let answer = formatter(CitationStyle::Numbered).build_answer("42", &three_passages());
        assert_eq!(
            answer,
            "Answer: 42\n\nSources Referenced:\n\
             Source 1: a.pdf (Page 1)\n\
             Source 2: a.pdf (Page 1)\n\
             Source 3: b.pdf (Page 4)"
        );
    }

    #[test]
    fn bibliography_answer_deduplicates_pages() {
        let answer = formatter(CitationStyle::Bibliography).build_answer("42", &three_passages());
        assert_eq!(answer, "Response: 42\n\nSources used:\n- a.pdf (Page 1)\n- b.pdf (Page 4)");
    }

    #[test]
    fn scores_are_appended_when_enabled() {
        let f = CitationFormatter::new(CitationConfig {
            show_similarity_scores: true,
            ..Default::default()
        });
        let answer = f.build_answer("42", &three_passages());
        assert!(answer.ends_with("\n\nSimilarity Scores: [0.100, 0.200, 0.300]"));
    }

    #[test]
    fn disabled_citations_pass_text_through() {
        let f = CitationFormatter::new(CitationConfig {
            include_citations: false,
            show_similarity_scores: true,
            ..Default::default()
        });
        let passages = three_passages();

        assert_eq!(f.build_context(&passages), "alpha\n\n---\n\nbeta\n\n---\n\ngamma");
        assert_eq!(f.build_answer("raw", &passages), "raw");
        assert_eq!(f.prompt_template(), PromptTemplate::plain());
    }

    #[test]
    fn long_filenames_are_truncated() {
        let f = CitationFormatter::new(CitationConfig { max_citation_length: 8, ..Default::default() });
        let passages = vec![RetrievedPassage::new("t", "docs/very-long-name.pdf:2:0", 0.0)];

        let citations = f.citations(&passages);
        assert_eq!(citations[0].filename, "very-...");
        assert!(f.build_context(&passages).starts_with("Source 1: very-..., Page 2"));
    }

    #[test]
    fn truncated_label_fits_the_limit() {
        let config = CitationConfig { max_citation_length: 10, ..Default::default() };
        let f = CitationFormatter::new(config);
        let passages = vec![
            RetrievedPassage::new("t", "abcdefghijklmn.pdf:1", 0.0),
            RetrievedPassage::new("t", "abcdefghij:2", 0.0),
        ];

        let citations = f.citations(&passages);
        assert_eq!(citations[0].filename, "abcdefg...");
        assert_eq!(citations[0].filename.chars().count(), 10);
        assert_eq!(citations[1].filename, "abcdefghij");
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let f = CitationFormatter::new(CitationConfig { max_citation_length: 6, ..Default::default() });
        let passages = vec![RetrievedPassage::new("t", "résumé.pdf:1", 0.0)];
        assert_eq!(f.citations(&passages)[0].filename, "rés...");
    }

    #[test]
    fn content_is_included_verbatim_once() {
        let passages = vec![
            RetrievedPassage::new("Source 1: tricky\nContent: text", "a.pdf:1", 0.0),
            RetrievedPassage::new("plain", "b.pdf:2", 0.0),
        ];
        for style in [CitationStyle::Numbered, CitationStyle::Inline, CitationStyle::Bibliography] {
            let context = formatter(style).build_context(&passages);
            assert_eq!(context.matches("Source 1: tricky\nContent: text").count(), 1);
            assert_eq!(context.matches("plain").count(), 1);
        }
    }
}
