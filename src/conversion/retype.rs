use std::time::Duration;

use layout_switcher_core::keys::KEY_BACKSPACE;

use super::replay_plan;
use crate::{
    domain::outcome::{ActionOutcome, Failure, SkipReason},
    platform::{LayoutInfo, Platform},
    state::StateContext,
};

/// Deletes the typed characters, cycles the layout and replays the same physical keys.
#[derive(Debug, Clone)]
pub struct RetypeMode {
    delay: Duration,
}

impl RetypeMode {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn execute(
        &self,
        ctx: &StateContext,
        platform: &mut Platform,
    ) -> (ActionOutcome, Option<LayoutInfo>) {
        let chars = ctx.chars_in_buffer();
        if chars == 0 {
            return (ActionOutcome::Skipped(SkipReason::EmptyBuffer), None);
        }
        let snapshot = ctx.strokes().to_vec();
        let plan = replay_plan(&snapshot);

        if let Err(e) = platform.keyboard.tap_key(KEY_BACKSPACE, chars) {
            tracing::warn!(error = %e, "retype: deleting typed text failed");
            return (ActionOutcome::Failed(Failure::InputError), None);
        }

        let layout = match platform.layouts.switch_layout(None) {
            Ok(layout) => layout,
            Err(e) => {
                tracing::warn!(error = %e, "retype: layout switch failed, restoring text");
                if let Err(e) = platform.keyboard.replay_events(&plan) {
                    tracing::warn!(error = %e, "retype: restoring text failed");
                }
                return (ActionOutcome::Failed(Failure::LayoutError), None);
            }
        };

        std::thread::sleep(self.delay);

        if let Err(e) = platform.keyboard.replay_events(&plan) {
            tracing::warn!(error = %e, "retype: replay failed");
            return (ActionOutcome::Failed(Failure::InputError), Some(layout));
        }

        tracing::debug!(chars, layout = %layout.name, "retyped in next layout");
        (ActionOutcome::Applied, Some(layout))
    }
}
