use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CostItem {
    pub item: String,
    pub cost: f64,
}

/// Structured estimate returned by the quote provider. Never edited locally.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub part_name: String,
    pub material: String,
    pub manufacturing_process: String,
    pub finish: String,
    pub cost_breakdown: Vec<CostItem>,
    pub total_cost: f64,
    pub lead_time: String,
    pub assumptions: Vec<String>,
}

#[cfg(test)]
pub(crate) fn sample_quote(part_name: &str, total_cost: f64) -> Quote {
    Quote {
        part_name: part_name.to_string(),
        material: "Aluminum 6061-T6".to_string(),
        manufacturing_process: "3-Axis CNC Milling".to_string(),
        finish: "As Machined".to_string(),
        cost_breakdown: vec![
            CostItem {
                item: "Setup Costs".to_string(),
                cost: total_cost * 0.4,
            },
            CostItem {
                item: "Material Costs".to_string(),
                cost: total_cost * 0.6,
            },
        ],
        total_cost,
        lead_time: "10 business days".to_string(),
        assumptions: vec!["Tolerances of +/- 0.1mm".to_string()],
    }
}
