//! Static info-panel texts keyed by category label.

use crate::scene::Category;

/// Title and body shown for a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InfoEntry {
    /// Category label, or "Unknown" for the fallback.
    pub label: &'static str,
    pub title: &'static str,
    pub text: &'static str,
}

pub const UNKNOWN_TITLE: &str = "Unknown";
pub const UNKNOWN_TEXT: &str = "No information available.";

const UNKNOWN: InfoEntry = InfoEntry {
    label: UNKNOWN_TITLE,
    title: UNKNOWN_TITLE,
    text: UNKNOWN_TEXT,
};

pub fn entry(category: Category) -> InfoEntry {
    let (title, text) = match category {
        Category::Water => (
            "Pond Water",
            "Water receives runoff containing nutrients. High nitrate and phosphate levels can lead to algal blooms, oxygen depletion, and harm aquatic life.",
        ),
        Category::Topsoil => (
            "Topsoil",
            "The upper layer of soil where plants grow. It intercepts and temporarily stores runoff, affecting nutrient availability.",
        ),
        Category::Subsoil => (
            "Subsoil",
            "Layer beneath topsoil that stores water and nutrients. It influences nutrient leaching into deeper layers or groundwater.",
        ),
        Category::Bedrock => (
            "Bedrock",
            "The underlying rock layer. Cracks or porous sections can allow groundwater movement and transport dissolved nutrients.",
        ),
        Category::Algae => (
            "Algal Bloom",
            "Excess nutrients, especially nitrogen and phosphorus, cause rapid algal growth, which reduces oxygen levels and harms aquatic organisms.",
        ),
        Category::Grass => (
            "Riparian Vegetation",
            "Vegetation along water bodies filters runoff, stabilizes banks, and reduces nutrient input into the pond.",
        ),
        Category::Fish => (
            "Fish",
            "Fish require oxygen-rich water. Eutrophication and algal blooms can reduce oxygen, leading to stress or die-offs.",
        ),
        Category::Bacteria => (
            "Bacteria",
            "Bacteria are crucial in the nitrogen cycle. They can convert nitrates into nitrogen gas through denitrification, reducing nutrient loads.",
        ),
        Category::Ammonium => (
            "Ammonium (NH₄⁺)",
            "Ammonium is a nitrogen compound produced by bacterial conversion of nitrates. Plants can absorb it, and it can also convert back to nitrate under certain conditions.",
        ),
        Category::Nitrate => (
            "Nitrate (NO₃⁻)",
            "Nitrate is a soluble nitrogen form that can leach into groundwater or be taken up by plants. Bacteria can convert it into ammonium or nitrogen gas.",
        ),
    };
    InfoEntry {
        label: category.label(),
        title,
        text,
    }
}

/// Look up a raw label as supplied by a host. Unknown labels get the
/// generic fallback instead of an error.
pub fn lookup(label: &str) -> InfoEntry {
    label.parse::<Category>().map(entry).unwrap_or(UNKNOWN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_category_has_text() {
        for category in Category::ALL {
            let info = entry(category);
            assert!(!info.title.is_empty());
            assert!(!info.text.is_empty());
            assert_ne!(info.title, UNKNOWN_TITLE);
        }
    }

    #[test]
    fn test_unknown_label_falls_back() {
        assert_eq!(lookup("Heron"), UNKNOWN);
        assert_eq!(lookup(""), UNKNOWN);
        assert_eq!(lookup("Grass").title, "Riparian Vegetation");
    }
}
