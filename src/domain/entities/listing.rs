use crate::domain::values::source::Source;
use serde::Serialize;
use uuid::Uuid;

/// One scraped deal: a title and link from a single source.
///
/// Title and link are fixed at construction; everything the pipeline learns
/// about a listing lives on [`AnnotatedListing`](super::annotated_listing::AnnotatedListing).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Listing {
    id: String,
    source: Source,
    title: String,
    link: String,
}

impl Listing {
    pub fn new(source: Source, title: impl Into<String>, link: impl Into<String>) -> Self {
        let title = title.into();
        let link = link.into();
        let id = Uuid::new_v5(
            &Uuid::NAMESPACE_URL,
            format!("{source}|{link}|{title}").as_bytes(),
        )
        .to_string();
        Self {
            id,
            source,
            title,
            link,
        }
    }

    /// Deterministic id derived from source, link and title.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn source(&self) -> Source {
        self.source
    }

    /// Title exactly as scraped.
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn link(&self) -> &str {
        &self.link
    }

    /// Title with whitespace runs collapsed and ends trimmed.
    pub fn normalized_title(&self) -> String {
        crate::application::signals::normalize(&self.title)
    }

    /// Lowercased normalized title, the title-side deduplication key.
    pub fn title_key(&self) -> String {
        self.normalized_title().to_lowercase()
    }
}
