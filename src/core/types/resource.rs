//! Catalog types
//!
//! A catalog is an ordered mapping from category name to the resources filed
//! under it. The engine only ever reads snapshots of it.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Unique, stable resource identifier
pub type ResourceId = u64;

/// Strings the catalog uses to mean "no link"
const NO_LINK_SENTINELS: [&str; 3] = ["", "#", "none"];

/// Where a resource card navigates to
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResourceLink {
    /// External or internal URL
    Url(String),
    /// Resource has no page to open
    #[default]
    NoLink,
}

impl ResourceLink {
    /// URL of the link, if there is one
    pub fn url(&self) -> Option<&str> {
        match self {
            ResourceLink::Url(url) => Some(url),
            ResourceLink::NoLink => None,
        }
    }
}

impl From<Option<String>> for ResourceLink {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(url) if !NO_LINK_SENTINELS.contains(&url.trim().to_lowercase().as_str()) => {
                ResourceLink::Url(url.trim().to_string())
            }
            _ => ResourceLink::NoLink,
        }
    }
}

impl From<ResourceLink> for Option<String> {
    fn from(value: ResourceLink) -> Self {
        match value {
            ResourceLink::Url(url) => Some(url),
            ResourceLink::NoLink => None,
        }
    }
}

impl Serialize for ResourceLink {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ResourceLink::Url(url) => serializer.serialize_str(url),
            ResourceLink::NoLink => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for ResourceLink {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<String>::deserialize(deserializer).map(ResourceLink::from)
    }
}

/// One shareable piece of equipment or space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    /// Stable positive identifier
    pub id: ResourceId,

    /// Display name
    pub name: String,

    /// Owning category; filled from the catalog key when absent
    #[serde(default)]
    pub category: String,

    #[serde(default)]
    pub description: String,

    /// Legacy long-form text with alias and use-case callouts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,

    /// Alternate names the resource is known by
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,

    /// Short phrases describing what the resource is used for
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub use_cases: Vec<String>,

    /// Ordered tag strings shown on the resource card
    #[serde(default)]
    pub chips: Vec<String>,

    #[serde(default)]
    pub locations: Vec<String>,

    /// Loan duration, free text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,

    #[serde(default)]
    pub navigate_to: ResourceLink,

    #[serde(default)]
    pub image: String,
}

impl Resource {
    /// Create a resource with only the required fields set
    pub fn new(id: ResourceId, name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            category: category.into(),
            description: String::new(),
            details: None,
            aliases: Vec::new(),
            use_cases: Vec::new(),
            chips: Vec::new(),
            locations: Vec::new(),
            duration: None,
            navigate_to: ResourceLink::NoLink,
            image: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_chips<I, S>(mut self, chips: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.chips = chips.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_locations<I, S>(mut self, locations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.locations = locations.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_use_cases<I, S>(mut self, use_cases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.use_cases = use_cases.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_duration(mut self, duration: impl Into<String>) -> Self {
        self.duration = Some(duration.into());
        self
    }

    pub fn with_link(mut self, url: impl Into<String>) -> Self {
        self.navigate_to = ResourceLink::from(Some(url.into()));
        self
    }
}

/// One category and its resources, in catalog order
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogCategory {
    pub name: String,
    pub resources: Vec<Resource>,
}

/// Ordered catalog snapshot
///
/// Category order is the order of the source document. Serde maps are read
/// entry by entry so no re-sorting happens on load.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Catalog {
    categories: Vec<CatalogCategory>,
}

impl Catalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Append resources under a category, creating it on first use
    ///
    /// Each resource's `category` is set to `name` so a resource never
    /// references more than one category.
    pub fn insert(&mut self, name: impl Into<String>, resources: Vec<Resource>) {
        let name = name.into();
        let resources: Vec<Resource> = resources
            .into_iter()
            .map(|mut resource| {
                resource.category = name.clone();
                resource
            })
            .collect();

        match self.categories.iter_mut().find(|c| c.name == name) {
            Some(existing) => existing.resources.extend(resources),
            None => self.categories.push(CatalogCategory { name, resources }),
        }
    }

    /// Builder form of [`Catalog::insert`]
    pub fn with_category(mut self, name: impl Into<String>, resources: Vec<Resource>) -> Self {
        self.insert(name, resources);
        self
    }

    pub fn categories(&self) -> &[CatalogCategory] {
        &self.categories
    }

    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.name.as_str())
    }

    /// Resources of one category, empty if the category is unknown
    pub fn resources_in(&self, category: &str) -> &[Resource] {
        self.categories
            .iter()
            .find(|c| c.name == category)
            .map(|c| c.resources.as_slice())
            .unwrap_or(&[])
    }

    /// All `(category, resource)` pairs in catalog iteration order
    pub fn iter_resources(&self) -> impl Iterator<Item = (&str, &Resource)> {
        self.categories
            .iter()
            .flat_map(|c| c.resources.iter().map(move |r| (c.name.as_str(), r)))
    }

    /// Look up a resource by id
    pub fn find(&self, id: ResourceId) -> Option<&Resource> {
        self.iter_resources().map(|(_, r)| r).find(|r| r.id == id)
    }

    pub fn resource_count(&self) -> usize {
        self.categories.iter().map(|c| c.resources.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.resource_count() == 0
    }
}

impl Serialize for Catalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.categories.len()))?;
        for category in &self.categories {
            map.serialize_entry(&category.name, &category.resources)?;
        }
        map.end()
    }
}

struct CatalogVisitor;

impl<'de> Visitor<'de> for CatalogVisitor {
    type Value = Catalog;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map from category name to a list of resources")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Catalog, A::Error> {
        let mut catalog = Catalog::new();
        while let Some((name, resources)) = access.next_entry::<String, Vec<Resource>>()? {
            catalog.insert(name, resources);
        }
        Ok(catalog)
    }
}

impl<'de> Deserialize<'de> for Catalog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(CatalogVisitor)
    }
}
