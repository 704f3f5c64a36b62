use std::collections::HashMap;

/// Which pest types can damage which plant kind. Pest names match exactly;
/// kinds without an entry are immune to everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PestVulnerabilityTable {
    by_kind: HashMap<String, Vec<String>>,
}

impl PestVulnerabilityTable {
    pub fn standard() -> Self {
        let mut table = Self::default();
        table.insert("Corn", ["Spider", "Caterpillar"]);
        table.insert("Pineapple", ["Caterpillar"]);
        table.insert("Watermelon", ["Spider"]);
        table.insert("Carrot", ["Spider"]);
        table
    }

    /// Sets the pests for a kind, replacing any previous set. Duplicates
    /// are dropped, first occurrence wins.
    pub fn insert<I, P>(&mut self, kind: &str, pests: I)
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        let mut set: Vec<String> = Vec::new();
        for pest in pests {
            let pest = pest.into();
            if !set.contains(&pest) {
                set.push(pest);
            }
        }
        self.by_kind.insert(kind.to_string(), set);
    }

    pub fn vulnerabilities(&self, kind: &str) -> &[String] {
        self.by_kind.get(kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_vulnerable(&self, kind: &str, pest: &str) -> bool {
        self.vulnerabilities(kind).iter().any(|p| p == pest)
    }

    pub fn len(&self) -> usize {
        self.by_kind.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_kind.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_matches_reference_garden() {
        let table = PestVulnerabilityTable::standard();
        assert_eq!(table.len(), 4);
        assert_eq!(table.vulnerabilities("Corn"), ["Spider", "Caterpillar"]);
        assert_eq!(table.vulnerabilities("Pineapple"), ["Caterpillar"]);
        assert_eq!(table.vulnerabilities("Watermelon"), ["Spider"]);
        assert_eq!(table.vulnerabilities("Carrot"), ["Spider"]);
    }

    #[test]
    fn matching_is_exact() {
        let table = PestVulnerabilityTable::standard();
        assert!(table.is_vulnerable("Carrot", "Spider"));
        assert!(!table.is_vulnerable("Carrot", "spider"));
        assert!(!table.is_vulnerable("Pineapple", "Spider"));
        assert!(!table.is_vulnerable("Tomato", "Spider"));
        assert!(table.vulnerabilities("Tomato").is_empty());
    }

    #[test]
    fn insert_replaces_and_dedups() {
        let mut table = PestVulnerabilityTable::standard();
        table.insert("Carrot", ["Aphid", "Aphid", "Beetle"]);
        assert_eq!(table.vulnerabilities("Carrot"), ["Aphid", "Beetle"]);
        assert!(!table.is_vulnerable("Carrot", "Spider"));
    }
}
