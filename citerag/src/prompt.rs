//! Prompt templates for citation-aware answering.

use crate::config::CitationStyle;

const NUMBERED_TEMPLATE: &str = "\
You are an expert assistant that provides accurate answers with proper citations.

Context sources:
{context}

Question: {question}

Instructions:
1. Answer the question using ONLY the information provided in the context above
2. For each fact you state, include a citation in this format: [Doc: filename, Page: X]
3. If multiple sources support the same fact, cite all relevant sources
4. If you cannot find the answer in the provided context, say \"I cannot find this information in the provided sources\"
5. Be specific and accurate with your citations

Answer:";

const INLINE_TEMPLATE: &str = "\
Based on the following context with citation numbers, answer the question and include the citation numbers after relevant facts.

Context:
{context}

Question: {question}

Instructions: Include citation numbers [1], [2], etc. after facts from those sources.

Answer:";

const BIBLIOGRAPHY_TEMPLATE: &str = "\
Answer the question based only on the following context. When stating facts, include citations in square brackets referring to the source document and page.

Context with sources:
{context}

---

Answer the question based on the above context: {question}

Instructions:
- Include citations like [Source: document_name, Page: X] after each fact
- Be specific about which source supports each claim
- If multiple sources support the same fact, cite all relevant sources";

const PLAIN_TEMPLATE: &str = "\
Answer the question based only on the following context:

{context}

---

Answer the question based on the above context: {question}";

/// A prompt with `{context}` and `{question}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    /// Create a template from raw text.
    pub fn new(template: impl Into<String>) -> Self {
        Self { template: template.into() }
    }

    /// The template matching a citation style.
    pub fn for_style(style: CitationStyle) -> Self {
        match style {
            CitationStyle::Numbered => Self::new(NUMBERED_TEMPLATE),
            CitationStyle::Inline => Self::new(INLINE_TEMPLATE),
            CitationStyle::Bibliography => Self::new(BIBLIOGRAPHY_TEMPLATE),
        }
    }

    /// The template used when citations are disabled.
    pub fn plain() -> Self {
        Self::new(PLAIN_TEMPLATE)
    }

    /// Fill in the placeholders.
    ///
    /// Placeholder text appearing inside `context` or `question` is not expanded.
    pub fn render(&self, context: &str, question: &str) -> String {
        let (head, tail) = match self.template.split_once("{context}") {
            Some(parts) => parts,
            None => return self.template.replace("{question}", question),
        };
        format!(
            "{}{}{}",
            head.replace("{question}", question),
            context,
            tail.replace("{question}", question)
        )
    }
}
