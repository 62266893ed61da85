use serde::Serialize;

/// Concepts in the order the extractor ranked them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ConceptSet(Vec<String>);

impl ConceptSet {
    /// Normalise raw extractor output: trim entries, drop blanks and later
    /// duplicates. Returns `None` when nothing usable is left.
    pub fn from_extracted(raw: Vec<String>) -> Option<Self> {
        let mut concepts: Vec<String> = Vec::with_capacity(raw.len());
        for concept in raw {
            let trimmed = concept.trim();
            if trimmed.is_empty() || concepts.iter().any(|c| c == trimmed) {
                continue;
            }
            concepts.push(trimmed.to_string());
        }

        if concepts.is_empty() {
            None
        } else {
            Some(Self(concepts))
        }
    }

    /// One `- concept` bullet per line, in extraction order.
    pub fn to_bullet_list(&self) -> String {
        self.0
            .iter()
            .map(|concept| format!("- {}", concept))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}
