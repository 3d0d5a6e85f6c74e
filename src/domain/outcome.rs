#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionOutcome {
    Applied,
    Skipped(SkipReason),
    Failed(Failure),
}

impl ActionOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, ActionOutcome::Applied)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SkipReason {
    Disabled,
    EmptyBuffer,
    NoSelection,
    NoWord,
    NoMarker,
    UnsupportedLayout,
    NotConverted,
}

impl SkipReason {
    pub fn as_str(self) -> &'static str {
        match self {
            SkipReason::Disabled => "disabled",
            SkipReason::EmptyBuffer => "empty_buffer",
            SkipReason::NoSelection => "no_selection",
            SkipReason::NoWord => "no_word",
            SkipReason::NoMarker => "no_marker",
            SkipReason::UnsupportedLayout => "unsupported_layout",
            SkipReason::NotConverted => "not_converted",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Failure {
    LayoutError,
    SelectionError,
    InputError,
}

impl Failure {
    pub fn as_str(self) -> &'static str {
        match self {
            Failure::LayoutError => "layout_error",
            Failure::SelectionError => "selection_error",
            Failure::InputError => "input_error",
        }
    }
}
