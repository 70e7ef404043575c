use super::session::{CompletionReason, RoundOutcome};

/// Presentation-ready results of a finished round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundResultsView {
    pub title: String,
    pub message: String,
    pub button_text: String,
}

impl RoundResultsView {
    /// Pick title and button for `outcome`; `message` is the statistics summary.
    #[must_use]
    pub fn for_outcome(outcome: &RoundOutcome, message: String) -> Self {
        let (title, button_text) = match outcome.reason {
            CompletionReason::SupplierExhausted => ("Out of questions", "Play again"),
            CompletionReason::QuotaReached if outcome.result.is_perfect() => {
                ("Perfect!", "Play again")
            }
            CompletionReason::QuotaReached => ("This round is over!", "Try again"),
        };
        Self {
            title: title.to_owned(),
            message,
            button_text: button_text.to_owned(),
        }
    }
}
