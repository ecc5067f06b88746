use serde::{Deserialize, Serialize};

use crate::contract::model::{SortField, SortOrder};
use crate::domain::error::DomainError;
use crate::domain::post_service::PostServiceConfig;
use crate::domain::query::PostSort;

/// Configuration for the blog module (`modules.blog` in the app config).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct BlogConfig {
    #[serde(default = "default_sort_by")]
    pub default_sort_by: String,
    #[serde(default = "default_sort_order")]
    pub default_sort_order: String,
    #[serde(default = "default_max_title_length")]
    pub max_title_length: usize,
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            default_sort_by: default_sort_by(),
            default_sort_order: default_sort_order(),
            max_title_length: default_max_title_length(),
        }
    }
}

fn default_sort_by() -> String {
    SortField::default().as_str().to_string()
}

fn default_sort_order() -> String {
    SortOrder::default().as_str().to_string()
}

fn default_max_title_length() -> usize {
    200
}

impl BlogConfig {
    /// Parse the string settings into the service configuration.
    pub fn service_config(&self) -> Result<PostServiceConfig, DomainError> {
        let field: SortField = self.default_sort_by.parse()?;
        let order: SortOrder = self.default_sort_order.parse()?;
        if self.max_title_length == 0 {
            return Err(DomainError::validation(
                "max_title_length",
                "must be greater than zero",
            ));
        }
        Ok(PostServiceConfig {
            max_title_length: self.max_title_length,
            default_sort: PostSort::new(field, order),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_service_defaults() {
        let cfg = BlogConfig::default().service_config().unwrap();
        let expected = PostServiceConfig::default();
        assert_eq!(cfg.max_title_length, expected.max_title_length);
        assert_eq!(cfg.default_sort, expected.default_sort);
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let cfg: BlogConfig = serde_json::from_value(serde_json::json!({
            "default_sort_by": "title",
            "default_sort_order": "asc"
        }))
        .unwrap();
        let svc = cfg.service_config().unwrap();
        assert_eq!(svc.default_sort, PostSort::new(SortField::Title, SortOrder::Ascending));
        assert_eq!(svc.max_title_length, 200);
    }

    #[test]
    fn bad_values_are_rejected() {
        let cfg = BlogConfig {
            default_sort_by: "author".into(),
            ..Default::default()
        };
        assert!(matches!(cfg.service_config(), Err(DomainError::InvalidSort(_))));

        let cfg = BlogConfig {
            max_title_length: 0,
            ..Default::default()
        };
        assert!(cfg.service_config().is_err());

        let unknown = serde_json::from_value::<BlogConfig>(serde_json::json!({ "page_size": 5 }));
        assert!(unknown.is_err());
    }
}
