/// Machine-level termination status.
///
/// The engine executes only while the status is [`Status::Aok`]; every other
/// value is sticky and turns further steps into no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u8)]
pub enum Status {
    /// Normal operation.
    #[default]
    Aok = 1,
    /// The `halt` instruction retired.
    Hlt = 2,
    /// A memory access was rejected.
    Adr = 3,
    /// An illegal instruction encoding was encountered.
    Ins = 4,
}

impl Status {
    /// Returns the stable numeric value reported in trace snapshots.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Converts a stable numeric value back into a status.
    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Aok),
            2 => Some(Self::Hlt),
            3 => Some(Self::Adr),
            4 => Some(Self::Ins),
            _ => None,
        }
    }

    /// Returns `true` while the machine is permitted to execute.
    #[must_use]
    pub const fn is_aok(self) -> bool {
        matches!(self, Self::Aok)
    }
}
