/// Keys under which state snapshots are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnapshotKey {
    Eggs,
    Batches,
    EggSettings,
}

impl SnapshotKey {
    /// Returns the store key for this snapshot.
    pub fn key(&self) -> &'static str {
        match self {
            SnapshotKey::Eggs => "eggs",
            SnapshotKey::Batches => "batches",
            SnapshotKey::EggSettings => "eggSettings",
        }
    }
}
