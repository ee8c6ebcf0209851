//! Declarative entity sources: which endpoints feed a category and how its
//! entities become URLs.

use crate::acquisition::endpoint::{Endpoint, PayloadShape};
use crate::cartography::record::{page_location, ChangeFrequency, Priority};
use crate::error::{Result, SitemapError};
use serde::{Deserialize, Serialize};
use std::fmt;
use url::form_urlencoded;

const ID_PLACEHOLDER: &str = "{id}";

/// Kind of catalogue entity a source yields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityCategory {
    Product,
    Collection,
    Movement,
    Blog,
}

impl EntityCategory {
    pub fn label(self) -> &'static str {
        match self {
            Self::Product => "product",
            Self::Collection => "collection",
            Self::Movement => "movement",
            Self::Blog => "blog",
        }
    }
}

impl fmt::Display for EntityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-category URL template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityTemplate {
    /// Page path relative to the frontend base, containing `{id}`.
    pub path_pattern: String,
    pub change_frequency: ChangeFrequency,
    pub priority: Priority,
}

impl EntityTemplate {
    pub fn new(path_pattern: &str, change_frequency: ChangeFrequency, priority: f32) -> Self {
        Self {
            path_pattern: path_pattern.to_string(),
            change_frequency,
            priority: Priority::new(priority),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.path_pattern.contains(ID_PLACEHOLDER) {
            Ok(())
        } else {
            Err(SitemapError::Template(self.path_pattern.clone()))
        }
    }

    /// Absolute location of the entity page for `id`.
    ///
    /// The id is form-urlencoded, so reserved characters (`&`, `=`, `#`,
    /// spaces) stay inside the value they were substituted into.
    pub fn location(&self, frontend_base: &str, id: &str) -> Result<String> {
        self.validate()?;
        let encoded: String = form_urlencoded::byte_serialize(id.as_bytes()).collect();
        let path = self.path_pattern.replace(ID_PLACEHOLDER, &encoded);
        Ok(page_location(frontend_base, &path))
    }
}

/// One entity category, the endpoints that feed it, and its URL template.
///
/// Entities from all endpoints are concatenated in endpoint order before
/// deduplication, so an identifier seen in an earlier endpoint wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySource {
    pub category: EntityCategory,
    pub endpoints: Vec<Endpoint>,
    pub template: EntityTemplate,
}

impl EntitySource {
    pub fn new(
        category: EntityCategory,
        endpoints: Vec<Endpoint>,
        template: EntityTemplate,
    ) -> Self {
        Self {
            category,
            endpoints,
            template,
        }
    }
}

/// The storefront catalogue, in sitemap order: products, collections,
/// movements, blogs.
pub fn tornado_sources() -> Vec<EntitySource> {
    vec![
        EntitySource::new(
            EntityCategory::Product,
            vec![
                Endpoint::new("/products/new-arrivals", PayloadShape::country_map("data")),
                Endpoint::new("/products/all", PayloadShape::country_map("data")),
            ],
            EntityTemplate::new(
                "products-details?productId={id}",
                ChangeFrequency::Weekly,
                0.9,
            ),
        ),
        EntitySource::new(
            EntityCategory::Collection,
            vec![Endpoint::new("/collection", PayloadShape::wrapped_list(&["data"]))],
            EntityTemplate::new("collection?id={id}", ChangeFrequency::Weekly, 0.8),
        ),
        EntitySource::new(
            EntityCategory::Movement,
            vec![Endpoint::new("/categories/all", PayloadShape::wrapped_list(&["data"]))],
            EntityTemplate::new("movement?id={id}", ChangeFrequency::Weekly, 0.7),
        ),
        EntitySource::new(
            EntityCategory::Blog,
            vec![Endpoint::new("/blogs", PayloadShape::wrapped_list(&["blogs", "data"]))],
            EntityTemplate::new("blog-details?id={id}", ChangeFrequency::Monthly, 0.6),
        ),
    ]
}
