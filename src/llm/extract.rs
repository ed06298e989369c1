//! Fenced Mermaid block extraction

use crate::Result;
use anyhow::Context;
use regex::Regex;

/// Diagram source pulled out of a model response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedDiagram {
    pub text: String,
}

/// Find the first ```` ```mermaid ```` block in `response` and return its
/// trimmed body.
///
/// `Ok(None)` means no well-formed, non-empty block was found; the caller is
/// expected to surface the raw response in that case.
pub fn extract_mermaid(response: &str) -> Result<Option<ExtractedDiagram>> {
    let re = Regex::new(r"(?s)```mermaid\s*(.*?)\s*```")
        .context("Failed to compile mermaid block regex")?;

    let text = re
        .captures(response)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|t| !t.is_empty());

    Ok(text.map(|t| ExtractedDiagram {
        text: t.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_trimmed_block() {
        let response = "```mermaid\n  graph LR\n    A((Ada)) -->|wrote| B[Engine]\n\n```";
        let diagram = extract_mermaid(response).unwrap().unwrap();
        assert_eq!(diagram.text, "graph LR\n    A((Ada)) -->|wrote| B[Engine]");
    }

    #[test]
    fn test_ignores_surrounding_chatter() {
        let response = "Sure! Here is the graph:\n```mermaid\ngraph TD\nA-->B\n```\nLet me know.";
        let diagram = extract_mermaid(response).unwrap().unwrap();
        assert_eq!(diagram.text, "graph TD\nA-->B");
    }

    #[test]
    fn test_first_block_wins() {
        let response = "```mermaid\ngraph TD\nA-->B\n```\n```mermaid\ngraph TD\nC-->D\n```";
        let diagram = extract_mermaid(response).unwrap().unwrap();
        assert_eq!(diagram.text, "graph TD\nA-->B");
    }

    #[test]
    fn test_no_block_is_none() {
        assert!(extract_mermaid("graph TD\nA-->B").unwrap().is_none());
        assert!(extract_mermaid("```\ngraph TD\nA-->B\n```").unwrap().is_none());
    }

    #[test]
    fn test_unterminated_or_empty_block_is_none() {
        assert!(extract_mermaid("```mermaid\ngraph TD\nA-->B").unwrap().is_none());
        assert!(extract_mermaid("```mermaid\n\n```").unwrap().is_none());
    }
}
