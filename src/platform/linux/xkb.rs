//! Layout backend on top of the `xkb-switch` tool.

use std::{sync::Arc, time::Duration};

use super::command::checked;
use crate::{
    error::{Error, Result},
    platform::{LayoutBackend, LayoutInfo, System},
};

const PROGRAM: &str = "xkb-switch";
const TIMEOUT: Duration = Duration::from_millis(500);

/// Short tag for an xkb symbol such as `us`, `us(intl)` or `ru`.
pub fn tag_for_symbol(symbol: &str) -> String {
    let base = symbol.split('(').next().unwrap_or(symbol).trim();
    match base {
        "us" | "gb" | "en" => "en".to_string(),
        other => other.to_string(),
    }
}

pub struct XkbSwitch {
    system: Arc<dyn System>,
}

impl XkbSwitch {
    pub fn new(system: Arc<dyn System>) -> Self {
        Self { system }
    }

    /// Checks that the tool runs and reports at least one layout.
    pub fn probe(system: Arc<dyn System>) -> Result<Self> {
        let backend = Self::new(system);
        let layouts = backend
            .layouts()
            .map_err(|e| Error::PlatformUnavailable(format!("{PROGRAM}: {e}")))?;
        if layouts.is_empty() {
            return Err(Error::PlatformUnavailable(format!("{PROGRAM} reports no layouts")));
        }
        Ok(backend)
    }

    fn run(&self, args: &[&str]) -> Result<String> {
        checked(self.system.as_ref(), PROGRAM, args, None, TIMEOUT)
    }
}

impl LayoutBackend for XkbSwitch {
    fn layouts(&self) -> Result<Vec<LayoutInfo>> {
        Ok(self
            .run(&["-l"])?
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .enumerate()
            .map(|(index, symbol)| LayoutInfo::new(tag_for_symbol(symbol), index, symbol))
            .collect())
    }

    fn current_layout(&self) -> Result<LayoutInfo> {
        let current = self.run(&["-p"])?;
        let current = current.trim();
        self.layouts()?
            .into_iter()
            .find(|l| l.native_name == current)
            .ok_or_else(|| Error::LayoutNotFound(current.to_string()))
    }

    fn switch_layout(&self, target: Option<&LayoutInfo>) -> Result<LayoutInfo> {
        let target = match target {
            Some(target) => target.clone(),
            None => {
                let layouts = self.layouts()?;
                let current = self.current_layout()?;
                let next = (current.index + 1) % layouts.len().max(1);
                layouts
                    .into_iter()
                    .nth(next)
                    .ok_or_else(|| Error::LayoutNotFound(format!("index {next}")))?
            }
        };
        self.run(&["-s", &target.native_name])?;
        tracing::trace!(layout = %target.name, symbol = %target.native_name, "layout switched");
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::memory::MemorySystem;

    fn backend() -> (MemorySystem, XkbSwitch) {
        let sys = MemorySystem::new();
        sys.respond("xkb-switch -l", "us\nru\nde(nodeadkeys)\n");
        sys.respond("xkb-switch -p", "ru\n");
        (sys.clone(), XkbSwitch::new(Arc::new(sys)))
    }

    #[test]
    fn symbols_map_to_tags() {
        assert_eq!(tag_for_symbol("us"), "en");
        assert_eq!(tag_for_symbol("us(intl)"), "en");
        assert_eq!(tag_for_symbol("ru"), "ru");
        assert_eq!(tag_for_symbol("de(nodeadkeys)"), "de");
    }

    #[test]
    fn lists_and_finds_current_layout() {
        let (_, xkb) = backend();
        let layouts = xkb.layouts().unwrap();
        assert_eq!(layouts.len(), 3);
        assert_eq!(layouts[0], LayoutInfo::new("en", 0, "us"));
        assert_eq!(xkb.current_layout().unwrap(), LayoutInfo::new("ru", 1, "ru"));
    }

    #[test]
    fn cycling_switches_to_next_symbol() {
        let (sys, xkb) = backend();
        let next = xkb.switch_layout(None).unwrap();
        assert_eq!(next.native_name, "de(nodeadkeys)");
        assert!(
            sys.calls()
                .iter()
                .any(|(line, _)| line == "xkb-switch -s de(nodeadkeys)")
        );
    }

    #[test]
    fn explicit_switch_uses_native_name() {
        let (sys, xkb) = backend();
        let en = LayoutInfo::new("en", 0, "us");
        assert_eq!(xkb.switch_layout(Some(&en)).unwrap(), en);
        assert_eq!(sys.calls().last().map(|(l, _)| l.clone()), Some("xkb-switch -s us".into()));
    }

    #[test]
    fn failing_tool_makes_probe_unavailable() {
        let sys = MemorySystem::new();
        sys.fail("xkb-switch -l", "cannot open display");
        let err = XkbSwitch::probe(Arc::new(sys)).err().unwrap();
        assert!(matches!(err, Error::PlatformUnavailable(_)));
    }
}
