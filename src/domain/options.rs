use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Stock the part is machined from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Material {
    #[default]
    #[serde(rename = "Aluminum 6061-T6")]
    Aluminum6061,
    #[serde(rename = "Stainless Steel 304")]
    StainlessSteel304,
    #[serde(rename = "ABS Plastic")]
    AbsPlastic,
    #[serde(rename = "Titanium Grade 5")]
    TitaniumGrade5,
    #[serde(rename = "PEEK")]
    Peek,
}

impl Material {
    pub const ALL: [Material; 5] = [
        Material::Aluminum6061,
        Material::StainlessSteel304,
        Material::AbsPlastic,
        Material::TitaniumGrade5,
        Material::Peek,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Material::Aluminum6061 => "Aluminum 6061-T6",
            Material::StainlessSteel304 => "Stainless Steel 304",
            Material::AbsPlastic => "ABS Plastic",
            Material::TitaniumGrade5 => "Titanium Grade 5",
            Material::Peek => "PEEK",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Finish {
    #[default]
    #[serde(rename = "As Machined")]
    AsMachined,
    #[serde(rename = "Bead Blast")]
    BeadBlast,
    #[serde(rename = "Anodized (Clear)")]
    AnodizedClear,
    #[serde(rename = "Anodized (Black)")]
    AnodizedBlack,
    #[serde(rename = "Polished")]
    Polished,
}

impl Finish {
    pub const ALL: [Finish; 5] = [
        Finish::AsMachined,
        Finish::BeadBlast,
        Finish::AnodizedClear,
        Finish::AnodizedBlack,
        Finish::Polished,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Finish::AsMachined => "As Machined",
            Finish::BeadBlast => "Bead Blast",
            Finish::AnodizedClear => "Anodized (Clear)",
            Finish::AnodizedBlack => "Anodized (Black)",
            Finish::Polished => "Polished",
        }
    }
}

/// Desired turnaround. Ordered from slowest to fastest.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LeadTime {
    #[default]
    #[serde(rename = "Standard (2 Weeks)")]
    Standard,
    #[serde(rename = "Expedited (1 Week)")]
    Expedited,
    #[serde(rename = "Rush (3 Days)")]
    Rush,
}

impl LeadTime {
    pub const ALL: [LeadTime; 3] = [LeadTime::Standard, LeadTime::Expedited, LeadTime::Rush];

    pub fn label(&self) -> &'static str {
        match self {
            LeadTime::Standard => "Standard (2 Weeks)",
            LeadTime::Expedited => "Expedited (1 Week)",
            LeadTime::Rush => "Rush (3 Days)",
        }
    }
}

macro_rules! label_conversions {
    ($($ty:ident),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.label())
                }
            }

            impl FromStr for $ty {
                type Err = UnknownOption;

                fn from_str(raw: &str) -> Result<Self, Self::Err> {
                    $ty::ALL
                        .iter()
                        .copied()
                        .find(|candidate| candidate.label() == raw.trim())
                        .ok_or_else(|| UnknownOption(raw.to_string()))
                }
            }
        )*
    };
}

label_conversions!(Material, Finish, LeadTime);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown option value: {0}")]
pub struct UnknownOption(pub String);

/// Snapshot of the user's quoting parameters. Every edit replaces the whole value.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteOptions {
    pub quantity: u32,
    pub material: Material,
    pub finish: Finish,
    pub lead_time: LeadTime,
}

impl Default for QuoteOptions {
    fn default() -> Self {
        Self {
            quantity: 1,
            material: Material::default(),
            finish: Finish::default(),
            lead_time: LeadTime::default(),
        }
    }
}

impl QuoteOptions {
    /// Returns a copy with the quantity taken from raw form input.
    pub fn with_quantity_input(&self, raw: &str) -> Self {
        Self {
            quantity: parse_quantity(raw),
            ..self.clone()
        }
    }

    pub fn with_material(&self, material: Material) -> Self {
        Self {
            material,
            ..self.clone()
        }
    }

    pub fn with_finish(&self, finish: Finish) -> Self {
        Self {
            finish,
            ..self.clone()
        }
    }

    pub fn with_lead_time(&self, lead_time: LeadTime) -> Self {
        Self {
            lead_time,
            ..self.clone()
        }
    }

    /// Clamps the quantity to the minimum orderable amount.
    pub fn normalized(&self) -> Self {
        Self {
            quantity: self.quantity.max(1),
            ..self.clone()
        }
    }

    /// Human readable list of what changed from `previous` to `self`.
    pub fn changes_since(&self, previous: &QuoteOptions) -> Vec<String> {
        let mut changes = Vec::new();
        if self.quantity != previous.quantity {
            changes.push(format!(
                "Quantity: {} -> {}",
                previous.quantity, self.quantity
            ));
        }
        if self.material != previous.material {
            changes.push(format!("Material: {} -> {}", previous.material, self.material));
        }
        if self.finish != previous.finish {
            changes.push(format!("Finish: {} -> {}", previous.finish, self.finish));
        }
        if self.lead_time != previous.lead_time {
            changes.push(format!(
                "Desired Lead Time: {} -> {}",
                previous.lead_time, self.lead_time
            ));
        }
        changes
    }
}

/// Zero, negative, empty and non-numeric input all fall back to a quantity of one.
pub fn parse_quantity(raw: &str) -> u32 {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|value| *value >= 1)
        .map(|value| value.min(u32::MAX as i64) as u32)
        .unwrap_or(1)
}
