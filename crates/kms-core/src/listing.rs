//! Filtering and sorting of element listings.

use strum::{Display, EnumString};

use crate::element::Element;

/// Column a listing is sorted by.
///
/// Unrecognized keys are kept verbatim; they sort every element as equal,
/// which leaves the filtered order untouched.
#[derive(Debug, Clone, PartialEq, Eq, EnumString)]
pub enum SortKey {
    #[strum(serialize = "name")]
    Name,
    #[strum(serialize = "status")]
    Status,
    #[strum(default)]
    Other(String),
}

impl SortKey {
    /// Key as written in sort commands.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Name => "name",
            Self::Status => "status",
            Self::Other(key) => key.as_str(),
        }
    }

    fn value<'e>(&self, element: &'e Element) -> &'e str {
        match self {
            Self::Name => element.display_name(),
            Self::Status => element.status.as_ref(),
            Self::Other(_) => "",
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    /// The opposite direction.
    pub fn reverse(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    /// Arrow for column headers.
    pub fn arrow(self) -> &'static str {
        match self {
            Self::Ascending => "↑",
            Self::Descending => "↓",
        }
    }
}

/// Current sort column and direction. No key means listing order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SortConfig {
    pub key: Option<SortKey>,
    pub direction: SortDirection,
}

impl SortConfig {
    /// Sort by `key` in `direction`.
    pub fn by(key: SortKey, direction: SortDirection) -> Self {
        Self {
            key: Some(key),
            direction,
        }
    }

    /// Header click: the same key flips direction, a new key starts ascending.
    pub fn toggle(&self, key: SortKey) -> Self {
        let direction = if self.key.as_ref() == Some(&key) {
            self.direction.reverse()
        } else {
            SortDirection::Ascending
        };
        Self::by(key, direction)
    }

    /// Check if the listing is sorted by `key`.
    pub fn is_sorted_by(&self, key: &SortKey) -> bool {
        self.key.as_ref() == Some(key)
    }
}

/// Filter `list` by a case-insensitive substring of the display name, then
/// stable-sort it according to `sort`.
pub fn filter_and_sort<'a, I>(list: I, query: &str, sort: &SortConfig) -> Vec<&'a Element>
where
    I: IntoIterator<Item = &'a Element>,
{
    let needle = query.to_lowercase();
    let mut filtered: Vec<&Element> = list
        .into_iter()
        .filter(|e| needle.is_empty() || e.display_name().to_lowercase().contains(&needle))
        .collect();

    if let Some(key) = &sort.key {
        filtered.sort_by(|a, b| {
            let ord = key.value(a).cmp(key.value(b));
            match sort.direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            }
        });
    }

    filtered
}
