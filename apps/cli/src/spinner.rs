use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

const FRAMES: &[&str] = &["|", "/", "-", "\\"];
const TICK: Duration = Duration::from_millis(120);

/// Cosmetic progress indicator on stderr. Shares no data with the stores.
pub struct Spinner {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Spinner {
    pub fn start(label: &str) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let flag = running.clone();
        let label = label.to_string();
        let handle = thread::spawn(move || {
            let mut frame = 0usize;
            while flag.load(Ordering::Relaxed) {
                eprint!("\r{} {}", FRAMES[frame % FRAMES.len()], label);
                let _ = io::stderr().flush();
                frame += 1;
                thread::sleep(TICK);
            }
            eprint!("\r{}\r", " ".repeat(label.len() + 2));
            let _ = io::stderr().flush();
        });
        Self {
            running,
            handle: Some(handle),
        }
    }

    pub fn stop(self) {
        // Drop does the work.
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
