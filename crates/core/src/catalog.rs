use std::{
  collections::{HashMap, hash_map::Entry},
  fs,
  path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Product {
  pub id: String,
  pub name: String,
  /// Display name of the owning category.
  pub category: String,
  pub description: String,
  pub icon: String,
  pub slug: String,
  #[serde(default)]
  pub features: Vec<String>,
  #[serde(default)]
  pub industries: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Subcategory {
  pub id: String,
  pub name: String,
  pub description: String,
  pub icon: String,
  #[serde(default)]
  pub features: Vec<String>,
  #[serde(default)]
  pub industries: Vec<String>,
  #[serde(default)]
  pub model_count: u32,
  #[serde(default)]
  pub use_cases: Vec<String>,
}

/// A category lists either products or subcategories, never both.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CategoryContents {
  Products(Vec<Product>),
  Subcategories(Vec<Subcategory>),
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Category {
  pub id: String,
  pub name: String,
  pub slug: String,
  pub description: String,
  pub icon: String,
  pub meta_title: String,
  pub meta_description: String,
  #[serde(default)]
  pub benefits: Vec<String>,
  #[serde(flatten)]
  pub contents: CategoryContents,
}

impl Category {
  pub fn products(&self) -> &[Product] {
    match &self.contents {
      CategoryContents::Products(products) => products,
      CategoryContents::Subcategories(_) => &[],
    }
  }

  pub fn subcategories(&self) -> &[Subcategory] {
    match &self.contents {
      CategoryContents::Subcategories(subcategories) => subcategories,
      CategoryContents::Products(_) => &[],
    }
  }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
  #[error("failed to read catalog {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
  #[error("invalid catalog: {0}")]
  Parse(#[from] serde_json::Error),
  #[error("duplicate {kind} slug `{slug}`")]
  DuplicateSlug { kind: &'static str, slug: String },
}

#[derive(Deserialize)]
struct CatalogFile {
  categories: Vec<Category>,
}

/// Ordered category list with slug indexes for constant-time lookups.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
  categories: Vec<Category>,
  category_index: HashMap<String, usize>,
  product_index: HashMap<String, (usize, usize)>,
}

impl Catalog {
  pub fn new(categories: Vec<Category>) -> Result<Self, CatalogError> {
    let mut category_index = HashMap::with_capacity(categories.len());
    let mut product_index = HashMap::new();

    for (ci, category) in categories.iter().enumerate() {
      match category_index.entry(category.slug.clone()) {
        Entry::Occupied(_) => {
          return Err(CatalogError::DuplicateSlug {
            kind: "category",
            slug: category.slug.clone(),
          });
        }
        Entry::Vacant(slot) => {
          slot.insert(ci);
        }
      }

      for (pi, product) in category.products().iter().enumerate() {
        if product_index.insert(product.slug.clone(), (ci, pi)).is_some() {
          return Err(CatalogError::DuplicateSlug {
            kind: "product",
            slug: product.slug.clone(),
          });
        }
      }
    }

    Ok(Self {
      categories,
      category_index,
      product_index,
    })
  }

  /// Parse `{"categories": [...]}`.
  pub fn from_json(json: &str) -> Result<Self, CatalogError> {
    let file: CatalogFile = serde_json::from_str(json)?;
    Self::new(file.categories)
  }

  pub fn load(path: &Path) -> Result<Self, CatalogError> {
    let json = fs::read_to_string(path).map_err(|source| CatalogError::Io {
      path: path.to_owned(),
      source,
    })?;
    Self::from_json(&json)
  }

  pub fn categories(&self) -> &[Category] {
    &self.categories
  }

  pub fn category(&self, slug: &str) -> Option<&Category> {
    self
      .category_index
      .get(slug)
      .map(|&index| &self.categories[index])
  }

  pub fn product(&self, slug: &str) -> Option<&Product> {
    self
      .product_index
      .get(slug)
      .map(|&(ci, pi)| &self.categories[ci].products()[pi])
  }

  /// Products of a category; empty for unknown slugs or subcategory-only categories.
  pub fn products_in(&self, category_slug: &str) -> &[Product] {
    self.category(category_slug).map_or(&[], Category::products)
  }

  pub fn all_products(&self) -> impl Iterator<Item = &Product> {
    self.categories.iter().flat_map(Category::products)
  }

  pub fn category_slugs(&self) -> impl Iterator<Item = &str> {
    self.categories.iter().map(|category| category.slug.as_str())
  }

  pub fn is_empty(&self) -> bool {
    self.categories.is_empty()
  }
}
