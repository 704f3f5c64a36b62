//! Plant kind registry and garden layouts.

use serde::Deserialize;

use crate::error::GardenError;
use crate::plant::{Carrot, Corn, Pineapple, Plant, Position, Species, Watermelon};

#[derive(Debug, Clone, Copy)]
struct CatalogEntry {
    species: &'static dyn Species,
    home: Position,
}

/// Maps a kind name to the species that builds it. Names match
/// case-insensitively.
#[derive(Debug, Clone)]
pub struct PlantCatalog {
    entries: Vec<CatalogEntry>,
}

impl PlantCatalog {
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// The four kinds of the reference garden at their fixed beds.
    pub fn standard() -> Self {
        let mut catalog = Self::empty();
        catalog.register(&Corn, Position::new(7, 5));
        catalog.register(&Pineapple, Position::new(3, 3));
        catalog.register(&Watermelon, Position::new(4, 2));
        catalog.register(&Carrot, Position::new(1, 5));
        catalog
    }

    /// Adds a kind, replacing any kind registered under the same name.
    pub fn register(&mut self, species: &'static dyn Species, home: Position) {
        let entry = CatalogEntry { species, home };
        match self
            .entries
            .iter_mut()
            .find(|existing| existing.species.name().eq_ignore_ascii_case(species.name()))
        {
            Some(slot) => *slot = entry,
            None => self.entries.push(entry),
        }
    }

    pub fn lookup(&self, name: &str) -> Result<&'static dyn Species, GardenError> {
        self.entry(name).map(|entry| entry.species)
    }

    pub fn home_position(&self, name: &str) -> Result<Position, GardenError> {
        self.entry(name).map(|entry| entry.home)
    }

    /// Builds a plant at the kind's home bed.
    pub fn create(&self, name: &str) -> Result<Plant, GardenError> {
        let entry = self.entry(name)?;
        Ok(Plant::new(entry.species, entry.home))
    }

    pub fn create_at(&self, name: &str, position: Position) -> Result<Plant, GardenError> {
        let species = self.lookup(name)?;
        Ok(Plant::new(species, position))
    }

    pub fn kinds(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.species.name())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry(&self, name: &str) -> Result<CatalogEntry, GardenError> {
        self.entries
            .iter()
            .find(|entry| entry.species.name().eq_ignore_ascii_case(name))
            .copied()
            .ok_or_else(|| GardenError::InvalidArgument(name.to_string()))
    }
}

impl Default for PlantCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

/// One bed of a garden layout. Position and pests fall back to the
/// catalog home bed and the standard vulnerability table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlantSpec {
    pub kind: String,
    #[serde(default)]
    pub position: Option<Position>,
    #[serde(default)]
    pub parasites: Option<Vec<String>>,
}

impl PlantSpec {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            position: None,
            parasites: None,
        }
    }

    pub fn at(mut self, row: u32, col: u32) -> Self {
        self.position = Some(Position::new(row, col));
        self
    }

    pub fn with_parasites<I, P>(mut self, parasites: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        self.parasites = Some(parasites.into_iter().map(Into::into).collect());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GardenLayout {
    pub plants: Vec<PlantSpec>,
}

impl GardenLayout {
    pub fn reference() -> Self {
        Self {
            plants: ["Corn", "Pineapple", "Watermelon", "Carrot"]
                .into_iter()
                .map(PlantSpec::new)
                .collect(),
        }
    }
}

impl Default for GardenLayout {
    fn default() -> Self {
        Self::reference()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_catalog_builds_every_kind() {
        let catalog = PlantCatalog::standard();
        let kinds: Vec<_> = catalog.kinds().collect();
        assert_eq!(kinds, vec!["Corn", "Pineapple", "Watermelon", "Carrot"]);
        for kind in kinds {
            let plant = catalog.create(kind).expect("kind is registered");
            assert_eq!(plant.name(), kind);
        }
    }

    #[test]
    fn lookup_ignores_case() {
        let catalog = PlantCatalog::standard();
        let plant = catalog.create("wAtErMeLoN").unwrap();
        assert_eq!(plant.name(), "Watermelon");
        assert_eq!(plant.position(), Position::new(4, 2));
    }

    #[test]
    fn unknown_kind_is_invalid_argument() {
        let catalog = PlantCatalog::standard();
        let err = catalog.create("Tomato").unwrap_err();
        assert_eq!(err, GardenError::InvalidArgument("Tomato".into()));
        assert_eq!(err.to_string(), "Unknown plant type: Tomato");
    }

    #[test]
    fn surrounding_whitespace_is_not_ignored() {
        let catalog = PlantCatalog::standard();
        let err = catalog.create(" Corn ").unwrap_err();
        assert_eq!(err, GardenError::InvalidArgument(" Corn ".into()));
    }

    #[test]
    fn create_at_overrides_home_bed() {
        let catalog = PlantCatalog::standard();
        let corn = catalog.create_at("Corn", Position::new(0, 0)).unwrap();
        assert_eq!(corn.position(), Position::new(0, 0));
        assert_eq!(catalog.home_position("corn").unwrap(), Position::new(7, 5));
    }

    #[test]
    fn register_replaces_same_name() {
        let mut catalog = PlantCatalog::standard();
        catalog.register(&Corn, Position::new(9, 9));
        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog.create("Corn").unwrap().position(), Position::new(9, 9));
    }

    #[test]
    fn layout_parses_from_yaml() {
        let yaml = r#"
plants:
  - kind: Corn
  - kind: Carrot
    position: { row: 2, col: 2 }
    parasites: [Aphid]
"#;
        let layout: GardenLayout = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            layout,
            GardenLayout {
                plants: vec![
                    PlantSpec::new("Corn"),
                    PlantSpec::new("Carrot").at(2, 2).with_parasites(["Aphid"]),
                ]
            }
        );
    }
}
