/// A component removed because it was no longer compatible.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrunedComponent {
    pub sequence: Option<usize>,
    pub stage: String,
    pub component: String,
}

/// A mandatory stage left empty after pruning and defaults.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IncompleteStage {
    pub sequence: Option<usize>,
    pub stage: String,
    /// False when no registered component could currently fill the stage.
    pub has_candidates: bool,
}

/// What a regenerate pass changed or could not complete.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegenerateReport {
    pub pruned: Vec<PrunedComponent>,
    pub incomplete: Vec<IncompleteStage>,
    /// Number of steps committed.
    pub steps: usize,
}

impl RegenerateReport {
    pub fn is_complete(&self) -> bool {
        self.incomplete.is_empty()
    }
}
