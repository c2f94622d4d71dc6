use serde::{Deserialize, Serialize};

/// Fixed set of shelf categories for pantry and grocery items.
///
/// Unknown names coming from persisted or remote data decode to `Others`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Fruits & Vegetables")]
    FruitsVegetables,
    #[serde(rename = "Proteins")]
    Proteins,
    #[serde(rename = "Dairy")]
    Dairy,
    #[serde(rename = "Grains & Legumes")]
    GrainsLegumes,
    #[serde(rename = "Spices & Herbs")]
    SpicesHerbs,
    #[serde(rename = "Sauces & Condiments")]
    SaucesCondiments,
    #[serde(rename = "Baking Essentials")]
    BakingEssentials,
    #[serde(rename = "Others", other)]
    Others,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::FruitsVegetables,
        Category::Proteins,
        Category::Dairy,
        Category::GrainsLegumes,
        Category::SpicesHerbs,
        Category::SaucesCondiments,
        Category::BakingEssentials,
        Category::Others,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::FruitsVegetables => "Fruits & Vegetables",
            Category::Proteins => "Proteins",
            Category::Dairy => "Dairy",
            Category::GrainsLegumes => "Grains & Legumes",
            Category::SpicesHerbs => "Spices & Herbs",
            Category::SaucesCondiments => "Sauces & Condiments",
            Category::BakingEssentials => "Baking Essentials",
            Category::Others => "Others",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| format!("Invalid category: {}", s))
    }
}
