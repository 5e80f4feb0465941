//! Static chemical and equipment reference data.
//!
//! Backs the tooltip and info panel: every interactive element is identified by
//! its display name, which resolves to either a [`Chemical`] or an
//! [`Equipment`] entry.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Color;

/// Any substance that can appear in the beaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Chemical {
    SalicylicAcid,
    AceticAnhydride,
    SulfuricAcid,
    Aspirin,
}

/// Display properties of a chemical.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChemicalProperties {
    pub color: Color,
    pub formula: &'static str,
    pub description: &'static str,
}

impl Chemical {
    pub const ALL: [Chemical; 4] = [
        Chemical::SalicylicAcid,
        Chemical::AceticAnhydride,
        Chemical::SulfuricAcid,
        Chemical::Aspirin,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Chemical::SalicylicAcid => "Salicylic Acid",
            Chemical::AceticAnhydride => "Acetic Anhydride",
            Chemical::SulfuricAcid => "Sulfuric Acid",
            Chemical::Aspirin => "Aspirin",
        }
    }

    pub fn properties(self) -> ChemicalProperties {
        match self {
            Chemical::SalicylicAcid => ChemicalProperties {
                color: Color::rgba(100, 149, 237, 0.7),
                formula: "C₇H₆O₃",
                description: "A phenolic acid used as the starting material for aspirin synthesis. \
                              White crystalline powder.",
            },
            Chemical::AceticAnhydride => ChemicalProperties {
                color: Color::rgba(144, 238, 144, 0.7),
                formula: "C₄H₆O₃",
                description: "The acetylating agent that reacts with salicylic acid. \
                              Colorless liquid with strong odor.",
            },
            Chemical::SulfuricAcid => ChemicalProperties {
                color: Color::rgba(255, 99, 71, 0.5),
                formula: "H₂SO₄",
                description: "Strong mineral acid used as a catalyst. \
                              Highly corrosive and viscous liquid.",
            },
            Chemical::Aspirin => ChemicalProperties {
                color: Color::rgba(255, 255, 255, 0.9),
                formula: "C₉H₈O₄",
                description: "Acetylsalicylic acid, the final product. \
                              White crystalline powder with mild odor.",
            },
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

impl fmt::Display for Chemical {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The three reagents, in the only order the procedure accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Reagent {
    SalicylicAcid,
    AceticAnhydride,
    SulfuricAcid,
}

impl Reagent {
    /// Required addition order.
    pub const EXPECTED_ORDER: [Reagent; 3] = [
        Reagent::SalicylicAcid,
        Reagent::AceticAnhydride,
        Reagent::SulfuricAcid,
    ];

    pub fn chemical(self) -> Chemical {
        match self {
            Reagent::SalicylicAcid => Chemical::SalicylicAcid,
            Reagent::AceticAnhydride => Chemical::AceticAnhydride,
            Reagent::SulfuricAcid => Chemical::SulfuricAcid,
        }
    }

    pub fn name(self) -> &'static str {
        self.chemical().name()
    }

    /// Resolve a flask's display name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::EXPECTED_ORDER.into_iter().find(|r| r.name() == name)
    }
}

impl fmt::Display for Reagent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Non-chemical lab equipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Equipment {
    Beaker,
    BuchnerFunnel,
    WaterBath,
    IceBath,
}

impl Equipment {
    pub const ALL: [Equipment; 4] = [
        Equipment::Beaker,
        Equipment::BuchnerFunnel,
        Equipment::WaterBath,
        Equipment::IceBath,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Equipment::Beaker => "Beaker",
            Equipment::BuchnerFunnel => "Buchner Funnel",
            Equipment::WaterBath => "Water Bath Machine",
            Equipment::IceBath => "Ice Bath",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Equipment::Beaker => "Container for mixing and reacting chemicals",
            Equipment::BuchnerFunnel => {
                "Used for vacuum filtration to separate solids from liquids"
            }
            Equipment::WaterBath => "Provides controlled heating for chemical reactions",
            Equipment::IceBath => "Used to cool solutions and promote crystallization",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.name() == name)
    }
}

/// Text shown in the tooltip or info panel for a named element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementInfo {
    pub title: String,
    pub formula: Option<&'static str>,
    pub description: Option<&'static str>,
}

/// Look up tooltip / info panel text by element name.
///
/// Chemicals take precedence over equipment. Unknown names yield a bare title.
pub fn lookup(name: &str) -> ElementInfo {
    if let Some(chemical) = Chemical::from_name(name) {
        let props = chemical.properties();
        return ElementInfo {
            title: name.to_string(),
            formula: Some(props.formula),
            description: Some(props.description),
        };
    }

    ElementInfo {
        title: name.to_string(),
        formula: None,
        description: Equipment::from_name(name).map(Equipment::description),
    }
}

impl fmt::Display for ElementInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)?;
        if let Some(formula) = self.formula {
            write!(f, "\nFormula: {formula}")?;
        }
        if let Some(description) = self.description {
            write!(f, "\n{description}")?;
        }
        Ok(())
    }
}
