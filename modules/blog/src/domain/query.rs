use uuid::Uuid;

use crate::contract::model::{ListOptions, SortField, SortOrder};

/// Which posts a listing returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostFilter {
    All,
    /// Exact author id match.
    Author(Uuid),
    /// Tag membership, case-sensitive.
    Tag(String),
}

/// Fully resolved ordering. Ties are broken by post id, ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PostSort {
    pub field: SortField,
    pub order: SortOrder,
}

impl PostSort {
    pub fn new(field: SortField, order: SortOrder) -> Self {
        Self { field, order }
    }

    /// Fill the unset parts of `options` from `self`.
    pub fn resolve(self, options: ListOptions) -> Self {
        Self {
            field: options.sort_by.unwrap_or(self.field),
            order: options.sort_order.unwrap_or(self.order),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_sort_is_newest_first() {
        let sort = PostSort::default();
        assert_eq!(sort.field, SortField::CreatedAt);
        assert_eq!(sort.order, SortOrder::Descending);
    }

    #[test]
    fn resolve_overrides_only_given_parts() {
        let base = PostSort::default();

        let only_order = base.resolve(ListOptions {
            sort_by: None,
            sort_order: Some(SortOrder::Ascending),
        });
        assert_eq!(only_order, PostSort::new(SortField::CreatedAt, SortOrder::Ascending));

        let only_field = base.resolve(ListOptions {
            sort_by: Some(SortField::Title),
            sort_order: None,
        });
        assert_eq!(only_field, PostSort::new(SortField::Title, SortOrder::Descending));

        assert_eq!(base.resolve(ListOptions::default()), base);
    }
}
