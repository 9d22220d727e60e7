//! Natural-language prompts sent to the model.

use crate::domain::{CadFile, PreviousQuote, QuoteOptions, QuoteRequest};
use crate::util::format::format_kb;

pub fn build_prompt(request: &QuoteRequest) -> String {
    let options = request.options.normalized();
    match &request.previous {
        Some(previous) => update_prompt(previous, &options),
        None => initial_prompt(&request.file, &options),
    }
}

fn requirements(options: &QuoteOptions) -> String {
    format!(
        "- Quantity: {}\n- Material: {}\n- Finish: {}\n- Desired Lead Time: {}",
        options.quantity, options.material, options.finish, options.lead_time
    )
}

fn initial_prompt(file: &CadFile, options: &QuoteOptions) -> String {
    format!(
        "You are an expert CNC machinist and advanced manufacturing cost estimator.
A user has uploaded a CAD file and specified the following requirements:
- File Name: {name}
- File Size: {size}
- File Type: {mime}
{requirements}

Based on this information, generate a detailed manufacturing quote.
Because you cannot see the file's geometry, make reasonable assumptions for a moderately complex part that could fit within a 15cm x 10cm x 5cm bounding box.

Your cost estimation should realistically reflect the specified quantity, material, finish, and lead time.
- Higher quantities should have a lower per-unit cost due to amortization of setup costs.
- Exotic materials (like Titanium or PEEK) should be more expensive than common ones (like Aluminum or ABS).
- Finishes like anodizing add cost over an 'As Machined' finish.
- Shorter lead times should incur expedite fees.

Produce a realistic quote that includes setup costs, material costs, machining time costs, and a finishing cost. The 'leadTime' in the response should reflect what is achievable for the request, which may differ from the user's desired lead time.
The final output must be a valid JSON object that strictly adheres to the provided schema.",
        name = file.name,
        size = format_kb(file.size_bytes),
        mime = file.mime.as_deref().unwrap_or("unknown"),
        requirements = requirements(options),
    )
}

fn update_prompt(previous: &PreviousQuote, options: &QuoteOptions) -> String {
    let previous_json = serde_json::to_string_pretty(&previous.quote)
        .unwrap_or_else(|_| format!("{:?}", previous.quote));
    let changes = options.changes_since(&previous.options);
    let changes = if changes.is_empty() {
        "- None; re-confirm the previous quote.".to_string()
    } else {
        changes
            .iter()
            .map(|change| format!("- {change}"))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "You are an expert CNC machinist and cost estimator.
A user is updating a manufacturing quote for a part named \"{part}\".

The previous quote was:
{previous_json}

The new user requirements are:
{requirements}

Changes since the previous quote:
{changes}

Please provide an updated quote reflecting ONLY the changes in the new requirements.
The part geometry and complexity remain the same. Your calculations should be logical adjustments based on the changes. For example:
- A change in quantity should affect per-unit cost by amortizing 'Setup Costs' and scaling 'Material Costs'.
- A change in material should affect 'Material Costs' and potentially 'Machining Costs'.
- A change in finish should affect 'Finishing Costs'.
- A shorter lead time should add or increase an 'Expedite Fee'.

The final output must be a valid JSON object that strictly adheres to the provided schema, reflecting the updated costs and parameters.",
        part = previous.quote.part_name,
        requirements = requirements(options),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{quote::sample_quote, Command, LeadTime, Session, SessionEvent};

    fn first_request(file: CadFile) -> QuoteRequest {
        let mut session = Session::default();
        session
            .apply(SessionEvent::FileSelected(file))
            .into_iter()
            .find_map(|command| match command {
                Command::IssueRequest(request) => Some(request),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn initial_prompt_describes_file_and_options() {
        let request = first_request(CadFile::new("bracket.stl", 2048, "/tmp/bracket.stl"));
        let prompt = build_prompt(&request);
        assert!(prompt.contains("- File Name: bracket.stl"));
        assert!(prompt.contains("- File Size: 2.00 KB"));
        assert!(prompt.contains("- File Type: model/stl"));
        assert!(prompt.contains("- Material: Aluminum 6061-T6"));
        assert!(prompt.contains("15cm x 10cm x 5cm"));
    }

    #[test]
    fn unknown_mime_is_spelled_out() {
        let request = first_request(CadFile::new("part.bin", 10, "/tmp/part.bin"));
        assert!(build_prompt(&request).contains("- File Type: unknown"));
    }

    #[test]
    fn update_prompt_carries_previous_quote_and_delta() {
        let mut request = first_request(CadFile::new("bracket.stl", 2048, "/tmp/bracket.stl"));
        request.previous = Some(PreviousQuote {
            quote: sample_quote("Bracket", 300.0),
            options: QuoteOptions::default(),
        });
        request.options = QuoteOptions::default().with_lead_time(LeadTime::Rush);

        let prompt = build_prompt(&request);
        assert!(prompt.contains("part named \"Bracket\""));
        assert!(prompt.contains("\"totalCost\": 300.0"));
        assert!(prompt.contains("- Desired Lead Time: Standard (2 Weeks) -> Rush (3 Days)"));
        assert!(prompt.contains("'Expedite Fee'"));
        assert!(!prompt.contains("File Size"));
    }
}
