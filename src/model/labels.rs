// Class index to disease name mapping

/// The 15 wheat leaf classes the model was trained on, in output order.
pub const CLASS_LABELS: [&str; 15] = [
    "Aphid",
    "Black Rust",
    "Blast",
    "Brown Rust",
    "Common Root Rot",
    "Fusarium Head Blight",
    "Healthy",
    "Leaf Blight",
    "Mildew",
    "Mite",
    "Septoria",
    "Smut",
    "Stem Fly",
    "Tan Spot",
    "Yellow Rust",
];

/// Fallback label for class indices outside the table.
pub const UNKNOWN_LABEL: &str = "Unknown Disease";

pub fn label_for(index: usize) -> &'static str {
    CLASS_LABELS.get(index).copied().unwrap_or(UNKNOWN_LABEL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_indices() {
        assert_eq!(label_for(0), "Aphid");
        assert_eq!(label_for(6), "Healthy");
        assert_eq!(label_for(14), "Yellow Rust");
    }

    #[test]
    fn test_out_of_range_falls_back() {
        assert_eq!(label_for(15), UNKNOWN_LABEL);
        assert_eq!(label_for(usize::MAX), UNKNOWN_LABEL);
    }

    #[test]
    fn test_table_has_fifteen_entries() {
        assert_eq!(CLASS_LABELS.len(), 15);
    }
}
