use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

pub trait Host: Send + Sync {
    fn adjust_height(&self);
}

#[derive(Debug, Clone, Default)]
pub struct HeightSignal {
    requests: Arc<AtomicU64>,
}

impl HeightSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> u64 {
        self.requests.load(Ordering::SeqCst)
    }
}

impl Host for HeightSignal {
    fn adjust_height(&self) {
        self.requests.fetch_add(1, Ordering::SeqCst);
    }
}
