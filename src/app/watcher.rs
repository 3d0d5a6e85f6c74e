use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread::JoinHandle,
    time::Duration,
};

use crate::platform::SelectionBackend;

/// Polls the selection source and raises a shared flag when it changes.
///
/// The polling thread stops and is joined on drop.
pub struct SelectionWatcher {
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl SelectionWatcher {
    pub fn spawn(
        selection: Arc<dyn SelectionBackend>,
        fresh: Arc<AtomicBool>,
        interval: Duration,
    ) -> std::io::Result<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);

        let thread = std::thread::Builder::new()
            .name("selection-watcher".into())
            .spawn(move || {
                while !stop_flag.load(Ordering::Acquire) {
                    if selection.has_fresh_selection() {
                        fresh.store(true, Ordering::Release);
                        tracing::trace!("fresh selection observed");
                    }
                    std::thread::park_timeout(interval);
                }
            })?;

        Ok(Self {
            stop,
            thread: Some(thread),
        })
    }
}

impl Drop for SelectionWatcher {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(thread) = self.thread.take() {
            thread.thread().unpark();
            if thread.join().is_err() {
                tracing::warn!("selection watcher panicked");
            }
        }
    }
}
