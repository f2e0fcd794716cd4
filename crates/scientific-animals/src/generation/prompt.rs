//! Prompt templates for RAG generation

use crate::retrieval::SearchResult;

/// Prompt builder for retrieval QA
pub struct PromptBuilder;

impl PromptBuilder {
    /// Join retrieved chunk texts into the context block
    pub fn build_context(results: &[SearchResult]) -> String {
        results
            .iter()
            .map(|r| r.chunk.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// "Stuff" every retrieved chunk into a single prompt
    pub fn build_qa_prompt(question: &str, context: &str) -> String {
        format!(
            "Use the following pieces of context to answer the question at the end. \
             If you don't know the answer, just say that you don't know, \
             don't try to make up an answer.\n\n\
             {context}\n\n\
             Question: {question}\n\
             Helpful Answer:"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Chunk, Document, SourceKind};

    #[test]
    fn test_build_qa_prompt() {
        let doc = Document::new(SourceKind::Wikipedia, "Lion", "https://en.wikipedia.org/wiki/Lion", "");
        let results = vec![
            SearchResult {
                chunk: Chunk::new(&doc, "The lion (Panthera leo)".into(), 0, 0),
                similarity: 0.9,
            },
            SearchResult {
                chunk: Chunk::new(&doc, "is a large cat.".into(), 448, 1),
                similarity: 0.8,
            },
        ];

        let context = PromptBuilder::build_context(&results);
        assert_eq!(context, "The lion (Panthera leo)\n\nis a large cat.");

        let prompt = PromptBuilder::build_qa_prompt("What is the scientific name of the animal lion?", &context);
        assert!(prompt.starts_with(
            "Use the following pieces of context to answer the question at the end. If you don't know"
        ));
        assert!(prompt.contains("\n\nThe lion (Panthera leo)\n\nis a large cat.\n\n"));
        assert!(prompt.ends_with(
            "Question: What is the scientific name of the animal lion?\nHelpful Answer:"
        ));
    }
}
