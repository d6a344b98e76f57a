use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use wear_core::{ConfidenceLevel, ToolState};

#[derive(Debug, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub seeds: SeedSpec,
    #[serde(default = "default_experiments")]
    pub experiments: u32,
    pub cases: Vec<Case>,
    #[serde(default)]
    pub overrides: HashMap<String, serde_json::Value>,
}

fn default_experiments() -> u32 {
    5000
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SeedSpec {
    List(Vec<u64>),
    Range { range: [u64; 2] },
}

impl SeedSpec {
    pub fn expand(&self) -> Vec<u64> {
        match self {
            SeedSpec::List(seeds) => seeds.clone(),
            SeedSpec::Range { range } => (range[0]..=range[1]).collect(),
        }
    }
}

/// One estimator input set. Confidence is a fraction in `(0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Case {
    Interval {
        durability: u32,
        enchant_level: u32,
        confidence: f64,
    },
    Probability {
        durability: u32,
        enchant_level: u32,
        blocks: u64,
    },
}

impl Case {
    pub fn tool(&self) -> Result<ToolState> {
        let (Case::Interval {
            durability,
            enchant_level,
            ..
        }
        | Case::Probability {
            durability,
            enchant_level,
            ..
        }) = self;
        Ok(ToolState::new(*durability, *enchant_level)?)
    }

    /// Short label for tables, e.g. `interval D=100 U=2 c=0.95`.
    pub fn label(&self) -> String {
        match self {
            Case::Interval {
                durability,
                enchant_level,
                confidence,
            } => format!("interval D={durability} U={enchant_level} c={confidence}"),
            Case::Probability {
                durability,
                enchant_level,
                blocks,
            } => format!("probability D={durability} U={enchant_level} B={blocks}"),
        }
    }

    fn validate(&self) -> Result<()> {
        self.tool()?;
        match self {
            Case::Interval { confidence, .. } => {
                ConfidenceLevel::new(*confidence)?;
            }
            Case::Probability { blocks, .. } => {
                if *blocks == 0 {
                    bail!("probability case 'blocks' must be > 0");
                }
            }
        }
        Ok(())
    }
}

pub fn load_scenario(path: &Path) -> Result<Scenario> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading scenario file: {}", path.display()))?;
    let scenario: Scenario = serde_json::from_str(&json)
        .with_context(|| format!("parsing scenario file: {}", path.display()))?;
    if scenario.name.is_empty() {
        bail!("scenario 'name' must not be empty");
    }
    if scenario.experiments == 0 {
        bail!("scenario 'experiments' must be > 0");
    }
    if scenario.cases.is_empty() {
        bail!("scenario 'cases' must list at least one case");
    }
    for (index, case) in scenario.cases.iter().enumerate() {
        case.validate()
            .with_context(|| format!("scenario case {index}"))?;
    }
    let seeds = scenario.seeds.expand();
    if seeds.is_empty() {
        bail!("scenario 'seeds' must produce at least one seed");
    }
    Ok(scenario)
}
