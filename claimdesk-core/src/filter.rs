//! Ephemeral query filters for claim search and history views.

use serde::{Deserialize, Serialize};

use crate::UserId;

/// Claim search filters. Not persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SearchFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpt_id: Option<i64>,
    /// End of the service date range, canonical `YYYY-MM-DD`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_end: Option<String>,
}

impl SearchFilters {
    pub fn is_empty(&self) -> bool {
        self.patient_id.is_none() && self.cpt_id.is_none() && self.service_end.is_none()
    }
}

/// Filters for the global change-log view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct HistoryFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpt_id: Option<i64>,
    /// Inclusive lower bound on `changed_at`, canonical `YYYY-MM-DD`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    /// Inclusive upper bound on `changed_at`, canonical `YYYY-MM-DD`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

/// One-based page selector with a bounded page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Page {
    pub page: u32,
    pub limit: u32,
}

impl Page {
    pub const DEFAULT_LIMIT: u32 = 50;
    pub const MAX_LIMIT: u32 = 500;

    /// Build a page from optional query parameters, clamping to sane bounds.
    pub fn from_params(page: Option<u32>, limit: Option<u32>) -> Self {
        let page = page.unwrap_or(1).max(1);
        let limit = limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(1, Self::MAX_LIMIT);
        Self { page, limit }
    }

    /// Row offset for SQL pagination.
    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.limit)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            page: 1,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_defaults_and_clamping() {
        let page = Page::from_params(None, None);
        assert_eq!(page, Page { page: 1, limit: 50 });

        let page = Page::from_params(Some(0), Some(10_000));
        assert_eq!(page, Page { page: 1, limit: Page::MAX_LIMIT });
    }

    #[test]
    fn test_page_offset() {
        assert_eq!(Page { page: 1, limit: 50 }.offset(), 0);
        assert_eq!(Page { page: 3, limit: 25 }.offset(), 50);
    }

    #[test]
    fn test_empty_search_filters() {
        assert!(SearchFilters::default().is_empty());
        let filters = SearchFilters {
            cpt_id: Some(99213),
            ..SearchFilters::default()
        };
        assert!(!filters.is_empty());
    }
}
