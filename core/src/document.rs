use serde::Serialize;

/// A fetched web document taking part in one research request.
///
/// Documents are created by the acquisition step and never change afterwards. The `position` is
/// the document's ordinal within the current batch and doubles as its identifier in the
/// similarity index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    text: String,
    source: String,
    position: usize,
}

impl Document {
    pub fn new(text: impl Into<String>, source: impl Into<String>, position: usize) -> Self {
        Self {
            text: text.into(),
            source: source.into(),
            position,
        }
    }

    /// Plain text extracted from the source.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The URL the text was fetched from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn position(&self) -> usize {
        self.position
    }
}

/// Builds a batch of documents from `(source, text)` pairs, numbering them in order.
pub fn batch<I, S, T>(items: I) -> Vec<Document>
where
    I: IntoIterator<Item = (S, T)>,
    S: Into<String>,
    T: Into<String>,
{
    items.into_iter()
        .enumerate()
        .map(|(position, (source, text))| Document::new(text, source, position))
        .collect()
}
