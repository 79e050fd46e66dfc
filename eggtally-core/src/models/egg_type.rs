use serde::{Deserialize, Serialize};
use std::fmt;

/// What a collection category records on the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryKind {
    /// Dead roosters
    MaleMortality,
    /// Dead hens
    FemaleMortality,
    /// Egg condition counted in trays and units
    Egg,
    /// Water usage
    Water,
}

impl CategoryKind {
    pub fn for_id(id: &str) -> Self {
        match id {
            "1" => CategoryKind::MaleMortality,
            "2" => CategoryKind::FemaleMortality,
            "11" => CategoryKind::Water,
            _ => CategoryKind::Egg,
        }
    }
}

/// Running tally for one collection category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EggTypeCounter {
    pub id: String,
    pub name: String,
    /// Derived total in units
    pub count: u32,
    pub trays: u32,
    pub units: u32,
    pub use_trays: bool,
}

impl EggTypeCounter {
    pub fn new(id: impl Into<String>, name: impl Into<String>, use_trays: bool) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            count: 0,
            trays: 0,
            units: 0,
            use_trays,
        }
    }

    pub fn kind(&self) -> CategoryKind {
        CategoryKind::for_id(&self.id)
    }

    /// Total units for the given entry. Trays only count for tray-based categories.
    pub fn compute_count(&self, trays: u32, units: u32, tray_value: u32) -> u32 {
        if self.use_trays {
            trays.saturating_mul(tray_value).saturating_add(units)
        } else {
            units
        }
    }

    /// Stores an entry and recomputes `count`.
    pub fn record(&mut self, trays: u32, units: u32, tray_value: u32) {
        self.count = self.compute_count(trays, units, tray_value);
        self.trays = trays;
        self.units = units;
    }

    pub fn reset(&mut self) {
        self.count = 0;
        self.trays = 0;
        self.units = 0;
    }

    pub fn has_entry(&self) -> bool {
        self.count != 0 || self.trays != 0 || self.units != 0
    }
}

impl fmt::Display for EggTypeCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.use_trays {
            write!(
                f,
                "{}: {} ({} trays + {} units)",
                self.name, self.count, self.trays, self.units
            )
        } else {
            write!(f, "{}: {}", self.name, self.count)
        }
    }
}

/// The fixed set of collection categories, in display order.
pub fn default_catalog() -> Vec<EggTypeCounter> {
    vec![
        EggTypeCounter::new("1", "Aves Macho", false),
        EggTypeCounter::new("2", "Aves Fêmea", false),
        EggTypeCounter::new("3", "Ovos Trincados", true),
        EggTypeCounter::new("4", "Ovos Sujos de Ninho", true),
        EggTypeCounter::new("5", "Ovos Pequenos", true),
        EggTypeCounter::new("6", "Ovos Incubáveis", true),
        EggTypeCounter::new("7", "Ovos Quebrados", true),
        EggTypeCounter::new("8", "Ovos Deformados", true),
        EggTypeCounter::new("9", "Ovos Casca Fina", true),
        EggTypeCounter::new("10", "Eliminados", true),
        EggTypeCounter::new("11", "Água", false),
    ]
}
