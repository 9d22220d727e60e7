use dioxus::prelude::*;

use crate::{
    domain::Quote,
    ui::components::{info_card::InfoCard, loader::Loader},
    util::format::format_usd,
};

/// Rows shown in the breakdown list, already formatted for display.
#[derive(Clone, Debug, PartialEq)]
pub struct BreakdownRow {
    pub label: String,
    pub amount: String,
}

pub fn breakdown_rows(quote: &Quote) -> Vec<BreakdownRow> {
    quote
        .cost_breakdown
        .iter()
        .map(|entry| BreakdownRow {
            label: entry.item.clone(),
            amount: format_usd(entry.cost),
        })
        .collect()
}

#[component]
pub fn QuoteDisplay(quote: Quote, refreshing: bool) -> Element {
    let rows = breakdown_rows(&quote);
    let total = format_usd(quote.total_cost);

    rsx! {
        div { class: "panel",
            if refreshing {
                div { class: "overlay",
                    Loader { message: "Updating quote with new options...".to_string() }
                }
            }
            div { class: "quote-header",
                h2 { "Manufacturing Quote" }
                p { "For part: {quote.part_name}" }
            }
            div { class: "info-grid",
                InfoCard { title: "Material".to_string(), value: quote.material.clone() }
                InfoCard { title: "Process".to_string(), value: quote.manufacturing_process.clone() }
                InfoCard { title: "Finish".to_string(), value: quote.finish.clone() }
                InfoCard { title: "Lead Time".to_string(), value: quote.lead_time.clone() }
            }
            div { class: "quote-columns",
                div {
                    h3 { class: "section-title", "Cost Breakdown" }
                    ul { class: "line-items",
                        for row in rows {
                            li { class: "line-item",
                                span { class: "label", "{row.label}" }
                                span { class: "amount", "{row.amount}" }
                            }
                        }
                    }
                    div { class: "total-row",
                        span { class: "label", "Total Cost" }
                        span { class: "amount", "{total}" }
                    }
                }
                div {
                    h3 { class: "section-title", "Assumptions Made" }
                    ul { class: "line-items",
                        for assumption in quote.assumptions.iter() {
                            li { class: "assumption",
                                span { class: "check", "✔" }
                                span { "{assumption}" }
                            }
                        }
                    }
                }
            }
            div { class: "disclaimer",
                "This is an AI-generated estimate. Prices are indicative and subject to change upon detailed design review."
            }
        }
    }
}
