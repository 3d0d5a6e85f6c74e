use layout_switcher_core::text::{ConversionDirection, convert_text, detect_language};

use crate::{
    domain::outcome::{ActionOutcome, Failure, SkipReason},
    platform::{LayoutInfo, Platform},
};

/// Rewrites the selected text and switches to the layout it was converted into.
#[derive(Debug, Clone, Default)]
pub struct SelectionMode;

impl SelectionMode {
    pub fn new() -> Self {
        Self
    }

    pub fn execute(&self, platform: &mut Platform) -> (ActionOutcome, Option<LayoutInfo>) {
        let selected = match platform.selection.selection() {
            Ok(info) => info.text,
            Err(e) => {
                tracing::warn!(error = %e, "selection: read failed");
                return (ActionOutcome::Failed(Failure::SelectionError), None);
            }
        };
        if selected.is_empty() {
            return (ActionOutcome::Skipped(SkipReason::NoSelection), None);
        }

        let direction = ConversionDirection::from_source(detect_language(&selected));
        let converted = convert_text(&selected, Some(direction));

        match platform.selection.replace_selection(&converted) {
            Ok(true) => {}
            Ok(false) => {
                tracing::warn!("selection: replace refused");
                return (ActionOutcome::Failed(Failure::SelectionError), None);
            }
            Err(e) => {
                tracing::warn!(error = %e, "selection: replace failed");
                return (ActionOutcome::Failed(Failure::SelectionError), None);
            }
        }

        let target = direction.target();
        let switched = platform
            .layouts
            .find_layout(target)
            .and_then(|found| match found {
                Some(layout) => platform.layouts.switch_layout(Some(&layout)),
                None => Err(crate::error::Error::LayoutNotFound(target.tag().to_string())),
            });

        match switched {
            Ok(layout) => {
                tracing::debug!(
                    chars = converted.chars().count(),
                    target = %target,
                    "selection converted"
                );
                (ActionOutcome::Applied, Some(layout))
            }
            Err(e) => {
                tracing::warn!(error = %e, target = %target, "selection: converted but layout switch failed");
                (ActionOutcome::Failed(Failure::LayoutError), None)
            }
        }
    }
}
