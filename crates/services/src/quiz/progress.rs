/// Aggregated view of round progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizProgress {
    pub total: u32,
    pub asked: u32,
    pub correct: u32,
    pub remaining: u32,
    pub is_complete: bool,
}
