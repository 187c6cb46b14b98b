//! Diagram-type suggestions.

use rand::Rng;
use rand::seq::SliceRandom;

/// The standard diagram types offered for visualizing a concept breakdown.
pub const DIAGRAM_TYPES: [&str; 8] = [
    "Flowchart",
    "Venn Diagram",
    "UML Diagram",
    "Mind Map",
    "Fishbone Diagram",
    "Concept Map",
    "Affinity Diagram",
    "Relationship Diagram",
];

/// A fixed list of diagram names to recommend from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramCatalog {
    names: Vec<String>,
}

impl DiagramCatalog {
    /// Catalog of [`DIAGRAM_TYPES`].
    pub fn standard() -> Self {
        Self::new(DIAGRAM_TYPES)
    }

    /// Builds a catalog from custom names.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Picks one name uniformly at random; `None` for an empty catalog.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
        self.names.choose(rng).map(String::as_str)
    }
}

impl Default for DiagramCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn test_standard_catalog_has_eight_distinct_names() {
        let catalog = DiagramCatalog::standard();
        let unique: HashSet<_> = catalog.names().iter().collect();
        assert_eq!(unique.len(), 8);
    }

    #[test]
    fn test_pick_stays_in_range_and_varies() {
        let catalog = DiagramCatalog::standard();
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            let name = catalog.pick(&mut rng).unwrap();
            assert!(DIAGRAM_TYPES.contains(&name));
            seen.insert(name.to_string());
        }
        assert!(seen.len() > 1);
    }

    #[test]
    fn test_empty_catalog_picks_nothing() {
        let catalog = DiagramCatalog::new(Vec::<String>::new());
        let mut rng = StdRng::seed_from_u64(1);
        assert!(catalog.pick(&mut rng).is_none());
    }
}
