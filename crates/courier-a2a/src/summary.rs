//! Outreach summary formatting
//!
//! Pure and deterministic: peers appear in the order they were probed, and
//! long replies are clipped to a short preview.

use crate::outreach::OutreachSummary;

const MAX_RESPONSE_PREVIEW_LINES: usize = 6;
const MAX_RESPONSE_PREVIEW_CHARS: usize = 1_200;

/// Render one outreach round as a report for the reply generator.
pub fn build_summary(summary: &OutreachSummary) -> String {
    let mut lines = vec![
        "Autonomous outreach summary".to_string(),
        format!("relay_id: {}", summary.relay_id),
        format!("agent: {}", summary.agent_name),
        format!("self: {}", summary.self_url.as_deref().unwrap_or("unknown")),
        format!("objective: {}", summary.objective),
        format!(
            "origin: {} ({})",
            summary.origin_name,
            if summary.origin_url.is_empty() {
                "unknown"
            } else {
                summary.origin_url.as_str()
            }
        ),
        format!("remaining_hops={}", summary.remaining_hops),
        format!("detected agents: {}", summary.discovered.len()),
        format!("contacted peers: {}", summary.relayed.len()),
    ];

    if summary.remaining_hops == 0 {
        lines.push("note: remaining_hops=0, no further outreach performed.".to_string());
    }

    for peer in &summary.discovered {
        lines.push(format!("- detected {} ({})", peer.card.name, peer.url));
    }

    for result in &summary.relayed {
        if !result.success {
            lines.push(format!(
                "- contact {} ({}): ERROR {}",
                result.peer_name, result.peer_url, result.detail
            ));
            continue;
        }
        lines.push(format!("- contact {} ({}): OK", result.peer_name, result.peer_url));
        for preview_line in response_preview(&result.detail) {
            lines.push(format!("  | {}", preview_line));
        }
    }

    lines.join("\n")
}

/// Clip a reply to a few lines for the report.
fn response_preview(text: &str) -> Vec<String> {
    if text.is_empty() {
        return vec!["(empty)".to_string()];
    }

    let mut clipped = false;
    let mut clipped_text = text;
    if clipped_text.chars().count() > MAX_RESPONSE_PREVIEW_CHARS {
        let cut = clipped_text
            .char_indices()
            .nth(MAX_RESPONSE_PREVIEW_CHARS)
            .map(|(index, _)| index)
            .unwrap_or(clipped_text.len());
        clipped_text = &clipped_text[..cut];
        clipped = true;
    }

    let mut lines: Vec<String> = clipped_text
        .lines()
        .map(|line| line.trim_end().to_string())
        .collect();
    if lines.len() > MAX_RESPONSE_PREVIEW_LINES {
        lines.truncate(MAX_RESPONSE_PREVIEW_LINES);
        clipped = true;
    }

    if clipped {
        lines.push("(truncated)".to_string());
    }
    if lines.is_empty() {
        lines.push("(empty)".to_string());
    }
    lines
}
