pub const CARD_ARTWORK_INSTRUCTION: &str =
    "Based on the following title and description, generate card artwork for a trading card";

/// Build the three-line artwork prompt. Title and description are inserted verbatim.
pub fn card_artwork(title: &str, description: &str) -> String {
    [
        CARD_ARTWORK_INSTRUCTION.to_string(),
        format!("title: {}", title),
        format!("description: {}", description),
    ]
    .join("\n")
}
