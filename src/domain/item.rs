use serde::{Deserialize, Serialize};

/// Physical form of a currency item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
  Coin,
  Banknote,
}

impl Category {
  pub const ALL: [Category; 2] = [Category::Coin, Category::Banknote];

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Coin => "coin",
      Self::Banknote => "banknote",
    }
  }

  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "coin" => Some(Self::Coin),
      "banknote" => Some(Self::Banknote),
      _ => None,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
  Europe,
  Asia,
  #[serde(rename = "North America")]
  NorthAmerica,
  #[serde(rename = "South America")]
  SouthAmerica,
  Africa,
  Oceania,
}

impl Region {
  pub const ALL: [Region; 6] = [
    Region::Europe,
    Region::Asia,
    Region::NorthAmerica,
    Region::SouthAmerica,
    Region::Africa,
    Region::Oceania,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Europe => "Europe",
      Self::Asia => "Asia",
      Self::NorthAmerica => "North America",
      Self::SouthAmerica => "South America",
      Self::Africa => "Africa",
      Self::Oceania => "Oceania",
    }
  }

  /// Accepts display names ("North America") and snake_case ("north_america")
  pub fn from_str(s: &str) -> Option<Self> {
    match s.to_lowercase().replace('_', " ").as_str() {
      "europe" => Some(Self::Europe),
      "asia" => Some(Self::Asia),
      "north america" => Some(Self::NorthAmerica),
      "south america" => Some(Self::SouthAmerica),
      "africa" => Some(Self::Africa),
      "oceania" => Some(Self::Oceania),
      _ => None,
    }
  }
}

impl std::fmt::Display for Region {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// Popularity tier: 1 = common/easy, 3 = rare/hard.
/// Serialized as the bare number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Tier {
  Common = 1,
  Uncommon = 2,
  Rare = 3,
}

impl Tier {
  pub fn from_u8(value: u8) -> Option<Self> {
    match value {
      1 => Some(Self::Common),
      2 => Some(Self::Uncommon),
      3 => Some(Self::Rare),
      _ => None,
    }
  }

  pub fn as_u8(&self) -> u8 {
    *self as u8
  }
}

impl TryFrom<u8> for Tier {
  type Error = String;

  fn try_from(value: u8) -> Result<Self, Self::Error> {
    Tier::from_u8(value).ok_or_else(|| format!("Invalid tier: {} (expected 1-3)", value))
  }
}

impl From<Tier> for u8 {
  fn from(tier: Tier) -> u8 {
    tier.as_u8()
  }
}

/// Round difficulty. Each level admits an inclusive set of tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Difficulty {
  Easy,
  Medium,
  Hard,
}

impl Difficulty {
  pub fn allowed_tiers(&self) -> &'static [Tier] {
    match self {
      Self::Easy => &[Tier::Common],
      Self::Medium => &[Tier::Common, Tier::Uncommon],
      Self::Hard => &[Tier::Common, Tier::Uncommon, Tier::Rare],
    }
  }

  pub fn allows(&self, tier: Tier) -> bool {
    self.allowed_tiers().contains(&tier)
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Easy => "easy",
      Self::Medium => "medium",
      Self::Hard => "hard",
    }
  }

  pub fn from_str(s: &str) -> Option<Self> {
    match s.to_lowercase().as_str() {
      "easy" => Some(Self::Easy),
      "medium" => Some(Self::Medium),
      "hard" => Some(Self::Hard),
      _ => None,
    }
  }
}

/// A single quiz subject from the static catalog. Never mutated after load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
  pub id: String,
  pub name: String,
  pub category: Category,
  pub region: Region,
  pub tier: Tier,
  pub country_code: String,
  pub country_name: String,
  pub image_url: String,
}
