use std::fmt;

use serde::{Deserialize, Serialize};

/// Protocol versions of the beacon state, in activation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForkName {
    Base,
    Altair,
    Bellatrix,
    Capella,
    Deneb,
    Electra,
    Badger,
}

impl ForkName {
    pub const ALL: [ForkName; 7] = [
        ForkName::Base,
        ForkName::Altair,
        ForkName::Bellatrix,
        ForkName::Capella,
        ForkName::Deneb,
        ForkName::Electra,
        ForkName::Badger,
    ];

    /// Withdrawal sweeps and their cursors exist from Capella onwards.
    pub fn supports_withdrawals(self) -> bool {
        self >= ForkName::Capella
    }

    /// The pending partial withdrawal queue exists from Electra onwards.
    pub fn supports_pending_partial_withdrawals(self) -> bool {
        self >= ForkName::Electra
    }

    /// From Badger, partial withdrawals also lower ``principal_balance`` when the remaining
    /// balance falls below it.
    pub fn adjusts_principal_balance(self) -> bool {
        self >= ForkName::Badger
    }
}

impl fmt::Display for ForkName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ForkName::Base => "base",
            ForkName::Altair => "altair",
            ForkName::Bellatrix => "bellatrix",
            ForkName::Capella => "capella",
            ForkName::Deneb => "deneb",
            ForkName::Electra => "electra",
            ForkName::Badger => "badger",
        };
        write!(f, "{name}")
    }
}
