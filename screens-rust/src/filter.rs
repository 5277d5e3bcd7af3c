/// User-entered filter values. An empty value matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Case-insensitive substring searched in the record's text fields.
    pub search: String,
    /// Exact match against the record's category.
    pub category: String,
    /// Exact match against the record's location.
    pub location: String,
}

impl FilterCriteria {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.search.is_empty() && self.category.is_empty() && self.location.is_empty()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Fields a record exposes to [`FilterCriteria`].
pub trait Filterable {
    fn category(&self) -> &str;

    /// Records without a location ignore the location criterion.
    fn location(&self) -> Option<&str> {
        None
    }

    fn search_fields(&self) -> Vec<&str>;
}

/// Whether `record` satisfies every non-empty criterion.
pub fn matches<T: Filterable>(record: &T, criteria: &FilterCriteria) -> bool {
    let category_match = criteria.category.is_empty() || record.category() == criteria.category;

    let location_match = criteria.location.is_empty()
        || record
            .location()
            .is_none_or(|location| location == criteria.location);

    let search_match = criteria.search.is_empty() || {
        let needle = criteria.search.to_lowercase();
        record
            .search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    };

    category_match && location_match && search_match
}

/// The records that satisfy `criteria`, in their original order.
pub fn filter_records<'a, T: Filterable>(records: &'a [T], criteria: &FilterCriteria) -> Vec<&'a T> {
    records
        .iter()
        .filter(|record| matches(*record, criteria))
        .collect()
}
