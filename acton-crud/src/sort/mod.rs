//! Sort parameters for list views
//!
//! Lists are sorted through the `sort` and `sort_dir` query parameters.
//! Unknown or unsortable fields are ignored rather than rejected.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::config::TableSettings;
use crate::model::Entity;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    /// Ascending
    #[default]
    Asc,
    /// Descending
    Desc,
}

impl SortDir {
    /// Query parameter value
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    /// Parse a `sort_dir` parameter; anything but `desc` is ascending
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("desc") {
            Self::Desc
        } else {
            Self::Asc
        }
    }

    /// The opposite direction
    #[must_use]
    pub const fn reverse(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

/// Raw `sort` / `sort_dir` query parameters
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SortParams {
    /// Field name to sort by
    pub sort: Option<String>,
    /// `asc` or `desc`
    pub sort_dir: Option<String>,
}

impl SortParams {
    /// Parameters sorting by `field` in direction `dir`
    #[must_use]
    pub fn new(field: impl Into<String>, dir: SortDir) -> Self {
        Self {
            sort: Some(field.into()),
            sort_dir: Some(dir.as_str().to_string()),
        }
    }
}

/// A requested ordering by one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    /// Field name
    pub field: String,
    /// Direction
    pub dir: SortDir,
}

impl SortSpec {
    /// Ascending order by `field`
    #[must_use]
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            dir: SortDir::Asc,
        }
    }

    /// Descending order by `field`
    #[must_use]
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            dir: SortDir::Desc,
        }
    }

    /// Resolve request parameters against the sortable field names
    ///
    /// Returns `None` when no field was requested or the field is not
    /// sortable.
    #[must_use]
    pub fn from_params(params: &SortParams, sortable: &[String]) -> Option<Self> {
        let field = params.sort.as_deref()?.trim();
        if !sortable.iter().any(|name| name == field) {
            tracing::debug!(field, "ignoring unknown sort field");
            return None;
        }
        Some(Self {
            field: field.to_string(),
            dir: params
                .sort_dir
                .as_deref()
                .map(SortDir::parse)
                .unwrap_or_default(),
        })
    }

    /// Compare two entities by this field
    #[must_use]
    pub fn compare<E: Entity>(&self, a: &E, b: &E) -> Ordering {
        self.dir
            .apply(a.get(&self.field).compare(&b.get(&self.field)))
    }
}

/// Direction a header link for `field` should request
///
/// Descending when the list is currently sorted ascending by `field`,
/// ascending otherwise.
#[must_use]
pub fn next_dir(current: Option<&SortSpec>, field: &str) -> SortDir {
    match current {
        Some(spec) if spec.field == field && spec.dir == SortDir::Asc => SortDir::Desc,
        _ => SortDir::Asc,
    }
}

/// Header suffix showing the current sort of `field`, empty when unsorted
#[must_use]
pub fn indicator<'a>(current: Option<&SortSpec>, field: &str, settings: &'a TableSettings) -> &'a str {
    match current {
        Some(spec) if spec.field == field => match spec.dir {
            SortDir::Asc => settings.asc_indicator.as_str(),
            SortDir::Desc => settings.desc_indicator.as_str(),
        },
        _ => "",
    }
}

/// Compare by each spec in turn until one differs
#[must_use]
pub fn compare_by<E: Entity>(a: &E, b: &E, order: &[SortSpec]) -> Ordering {
    order
        .iter()
        .map(|spec| spec.compare(a, b))
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}
