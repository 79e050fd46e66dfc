mod aviary;
mod batch;
mod egg_type;
mod settings;

pub use aviary::Aviary;
pub use batch::Batch;
pub use egg_type::{default_catalog, CategoryKind, EggTypeCounter};
pub use settings::{CollectionMode, Settings};

/// Eggs per tray used when no aviary is selected.
pub const DEFAULT_TRAY_VALUE: u32 = 30;
