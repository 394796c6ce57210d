//! Markup documents as exchanged with the document store.

use crate::markup::{MarkupObject, Timestamp};
use serde::{Deserialize, Serialize};

/// Which store a document belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentLocation {
    /// Only visible to its author.
    #[default]
    Personal,
    /// Visible to the whole site team.
    Shared,
}

/// Reference to the blueprint image a document is drawn on.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BlueprintRef {
    #[serde(rename = "blueprintUrl")]
    pub url: String,
    #[serde(rename = "blueprintFileName")]
    pub original_file_name: String,
}

/// The payload sent to the store on create/update.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentDraft {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub blueprint: BlueprintRef,
    #[serde(default)]
    pub markup_data: Vec<MarkupObject>,
    #[serde(default)]
    pub location: DocumentLocation,
    /// Construction site the document belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

/// A markup document: blueprint reference plus its ordered markup.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkupDocument {
    /// Present once the store has persisted the document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub blueprint: BlueprintRef,
    /// Markup in paint order, front-most last.
    #[serde(default)]
    pub markup_data: Vec<MarkupObject>,
    #[serde(default)]
    pub location: DocumentLocation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
}

impl MarkupDocument {
    /// Build the stored representation of a draft.
    pub fn from_draft(id: String, draft: DocumentDraft, created_at: Timestamp, updated_at: Timestamp) -> Self {
        Self {
            id: Some(id),
            title: draft.title,
            description: draft.description,
            blueprint: draft.blueprint,
            markup_data: draft.markup_data,
            location: draft.location,
            site: draft.site,
            created_by: draft.created_by,
            created_at: Some(created_at),
            updated_at: Some(updated_at),
        }
    }

    /// Get the list-view summary of this document.
    pub fn summary(&self) -> DocumentSummary {
        DocumentSummary {
            id: self.id.clone().unwrap_or_default(),
            title: self.title.clone(),
            description: self.description.clone(),
            blueprint: self.blueprint.clone(),
            location: self.location,
            site: self.site.clone(),
            object_count: self.markup_data.len(),
            created_by: self.created_by.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// Serialize the document to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a document from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// A document as shown in list views (no markup payload).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummary {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub blueprint: BlueprintRef,
    pub location: DocumentLocation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site: Option<String>,
    pub object_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    ListFilter::DEFAULT_LIMIT
}

/// Query for listing documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFilter {
    #[serde(default)]
    pub location: Option<DocumentLocation>,
    #[serde(default)]
    pub site: Option<String>,
    /// Case-insensitive substring of title or description.
    #[serde(default)]
    pub search: Option<String>,
    /// 1-based page number.
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

impl Default for ListFilter {
    fn default() -> Self {
        Self {
            location: None,
            site: None,
            search: None,
            page: 1,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}

impl ListFilter {
    pub const DEFAULT_LIMIT: u32 = 20;

    /// Check if a document passes the location/site/search criteria.
    pub fn matches(&self, doc: &MarkupDocument) -> bool {
        if self.location.is_some_and(|loc| loc != doc.location) {
            return false;
        }
        if let Some(site) = self.site.as_deref().filter(|s| !s.is_empty()) {
            if doc.site.as_deref() != Some(site) {
                return false;
            }
        }
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let needle = search.to_lowercase();
            let in_title = doc.title.to_lowercase().contains(&needle);
            let in_description = doc
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&needle));
            if !in_title && !in_description {
                return false;
            }
        }
        true
    }

    /// Order summaries newest first and cut out the requested page.
    pub fn paginate(&self, mut summaries: Vec<DocumentSummary>) -> DocumentPage {
        summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then_with(|| a.id.cmp(&b.id)));
        let total = summaries.len();
        let page = self.page.max(1);
        let limit = self.limit.max(1);
        let start = (page as usize - 1).saturating_mul(limit as usize);
        let items = summaries
            .into_iter()
            .skip(start)
            .take(limit as usize)
            .collect();
        DocumentPage {
            items,
            total,
            page,
            limit,
        }
    }
}

/// One page of document summaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentPage {
    pub items: Vec<DocumentSummary>,
    /// Number of matching documents across all pages.
    pub total: usize,
    pub page: u32,
    pub limit: u32,
}
