//! Item catalog loading and validation.
//!
//! The catalog is a JSON document with an `items` array and an optional
//! `packs` array. A built-in catalog ships with the crate.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use crate::domain::{Item, Tier};

const BUILTIN_CATALOG: &str = include_str!("../../data/catalog.json");

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
  #[error("failed to read catalog: {0}")]
  Io(#[from] std::io::Error),
  #[error("failed to parse catalog: {0}")]
  Parse(#[from] serde_json::Error),
  #[error("duplicate item id: {0}")]
  DuplicateId(String),
  #[error("item {0} has an empty {1}")]
  EmptyField(String, &'static str),
  #[error("pack {pack} references unknown item {item}")]
  UnknownPackItem { pack: String, item: String },
  #[error("duplicate pack id: {0}")]
  DuplicatePack(String),
}

/// A purchasable bundle of items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyPack {
  pub id: String,
  pub name: String,
  pub description: String,
  pub price: u32,
  pub item_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
  items: Vec<Item>,
  #[serde(default)]
  packs: Vec<CurrencyPack>,
}

/// Read-only reference data, loaded once at startup
#[derive(Debug, Clone)]
pub struct Catalog {
  items: Vec<Item>,
  packs: Vec<CurrencyPack>,
  index: HashMap<String, usize>,
}

impl Catalog {
  pub fn from_json(json: &str) -> Result<Self, CatalogError> {
    let file: CatalogFile = serde_json::from_str(json)?;
    Self::build(file.items, file.packs)
  }

  pub fn load(path: &Path) -> Result<Self, CatalogError> {
    let contents = fs::read_to_string(path)?;
    let catalog = Self::from_json(&contents)?;
    tracing::info!(
      "Loaded catalog from {}: {} items, {} packs",
      path.display(),
      catalog.items.len(),
      catalog.packs.len()
    );
    Ok(catalog)
  }

  /// The catalog embedded in the binary
  pub fn builtin() -> Result<Self, CatalogError> {
    Self::from_json(BUILTIN_CATALOG)
  }

  fn build(items: Vec<Item>, packs: Vec<CurrencyPack>) -> Result<Self, CatalogError> {
    let mut index = HashMap::with_capacity(items.len());

    for (i, item) in items.iter().enumerate() {
      validate_item(item)?;
      if index.insert(item.id.clone(), i).is_some() {
        return Err(CatalogError::DuplicateId(item.id.clone()));
      }
    }

    let mut pack_ids = HashSet::new();
    for pack in &packs {
      if !pack_ids.insert(pack.id.as_str()) {
        return Err(CatalogError::DuplicatePack(pack.id.clone()));
      }
      if let Some(missing) = pack.item_ids.iter().find(|id| !index.contains_key(*id)) {
        return Err(CatalogError::UnknownPackItem {
          pack: pack.id.clone(),
          item: missing.clone(),
        });
      }
    }

    Ok(Self { items, packs, index })
  }

  pub fn items(&self) -> &[Item] {
    &self.items
  }

  pub fn packs(&self) -> &[CurrencyPack] {
    &self.packs
  }

  pub fn get(&self, id: &str) -> Option<&Item> {
    self.index.get(id).map(|&i| &self.items[i])
  }

  pub fn pack(&self, id: &str) -> Option<&CurrencyPack> {
    self.packs.iter().find(|p| p.id == id)
  }

  pub fn len(&self) -> usize {
    self.items.len()
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  /// Items a brand new player starts with: every common-tier item
  pub fn starter_ids(&self) -> HashSet<String> {
    self
      .items
      .iter()
      .filter(|item| item.tier == Tier::Common)
      .map(|item| item.id.clone())
      .collect()
  }
}

fn validate_item(item: &Item) -> Result<(), CatalogError> {
  let fields = [
    ("id", &item.id),
    ("name", &item.name),
    ("country_code", &item.country_code),
    ("country_name", &item.country_name),
  ];
  for (field, value) in fields {
    if value.trim().is_empty() {
      return Err(CatalogError::EmptyField(item.id.clone(), field));
    }
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::{Category, Region};
  use tempfile::TempDir;

  const SMALL: &str = r#"{
    "items": [
      {"id": "eur_1", "name": "1 Euro", "category": "coin", "region": "Europe", "tier": 1,
       "country_code": "DE", "country_name": "Germany", "image_url": "images/eur_1.png"},
      {"id": "jpy_1000", "name": "1000 Yen", "category": "banknote", "region": "Asia", "tier": 2,
       "country_code": "JP", "country_name": "Japan", "image_url": "images/jpy_1000.png"}
    ],
    "packs": [
      {"id": "asia", "name": "Asia Pack", "description": "Notes from Asia", "price": 200,
       "item_ids": ["jpy_1000"]}
    ]
  }"#;

  #[test]
  fn test_from_json_parses_items_and_packs() {
    let catalog = Catalog::from_json(SMALL).unwrap();
    assert_eq!(catalog.len(), 2);
    let yen = catalog.get("jpy_1000").unwrap();
    assert_eq!(yen.category, Category::Banknote);
    assert_eq!(yen.region, Region::Asia);
    assert_eq!(yen.tier, Tier::Uncommon);
    assert_eq!(catalog.pack("asia").unwrap().price, 200);
  }

  #[test]
  fn test_packs_are_optional() {
    let json = r#"{"items": []}"#;
    let catalog = Catalog::from_json(json).unwrap();
    assert!(catalog.is_empty());
    assert!(catalog.packs().is_empty());
  }

  #[test]
  fn test_duplicate_id_rejected() {
    let json = SMALL.replace("jpy_1000\", \"name\"", "eur_1\", \"name\"");
    let err = Catalog::from_json(&json).unwrap_err();
    assert!(matches!(err, CatalogError::DuplicateId(id) if id == "eur_1"));
  }

  #[test]
  fn test_unknown_pack_item_rejected() {
    let json = SMALL.replace("[\"jpy_1000\"]", "[\"jpy_5000\"]");
    let err = Catalog::from_json(&json).unwrap_err();
    assert!(matches!(err, CatalogError::UnknownPackItem { .. }));
  }

  #[test]
  fn test_empty_name_rejected() {
    let json = SMALL.replace("\"1 Euro\"", "\"  \"");
    let err = Catalog::from_json(&json).unwrap_err();
    assert!(matches!(err, CatalogError::EmptyField(_, "name")));
  }

  #[test]
  fn test_invalid_tier_rejected() {
    let json = SMALL.replace("\"tier\": 2", "\"tier\": 7");
    assert!(matches!(Catalog::from_json(&json), Err(CatalogError::Parse(_))));
  }

  #[test]
  fn test_load_from_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("catalog.json");
    fs::write(&path, SMALL).unwrap();
    let catalog = Catalog::load(&path).unwrap();
    assert!(catalog.get("eur_1").is_some());
  }

  #[test]
  fn test_load_missing_file_is_io_error() {
    let temp = TempDir::new().unwrap();
    let err = Catalog::load(&temp.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, CatalogError::Io(_)));
  }

  #[test]
  fn test_builtin_catalog_is_valid() {
    let catalog = Catalog::builtin().unwrap();
    assert!(catalog.len() >= 40);
    for region in Region::ALL {
      assert!(catalog.items().iter().any(|i| i.region == region), "no items for {}", region);
    }
    for category in Category::ALL {
      assert!(catalog.items().iter().any(|i| i.category == category));
    }
  }

  #[test]
  fn test_starter_ids_are_common_tier() {
    let catalog = Catalog::builtin().unwrap();
    let starters = catalog.starter_ids();
    assert!(!starters.is_empty());
    for id in &starters {
      assert_eq!(catalog.get(id).unwrap().tier, Tier::Common);
    }
  }
}
