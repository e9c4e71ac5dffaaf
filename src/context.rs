use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::DecodeError;
use crate::options::{DecoderOptions, ProgressCallback};

/// Cooperative cancellation handle shared between the caller and a running
/// decode operation.
///
/// Cancellation is polled between mip levels and at chunk boundaries; an
/// observed cancellation aborts the operation with
/// [`DecodeError::Cancelled`] without producing output.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation of every operation holding a clone of this token.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Monotone block counter feeding the optional progress callback.
///
/// The counter only ever advances; reporting happens under a lock so the
/// callback observes a non-decreasing sequence ending at exactly 1.0 even
/// when chunks finish on different worker threads.
pub(crate) struct OperationProgress {
    total_blocks: u64,
    processed_blocks: AtomicU64,
    callback: Option<ProgressCallback>,
    report_lock: Mutex<()>,
}

impl OperationProgress {
    fn new(total_blocks: u64, callback: Option<ProgressCallback>) -> Self {
        Self {
            total_blocks,
            processed_blocks: AtomicU64::new(0),
            callback,
            report_lock: Mutex::new(()),
        }
    }

    fn advance(&self, blocks: u64) {
        self.processed_blocks.fetch_add(blocks, Ordering::Release);

        if let Some(callback) = &self.callback {
            // Progress stays best-effort after a callback panic.
            let _guard = self
                .report_lock
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            let processed = self.processed_blocks.load(Ordering::Acquire);
            let total = self.total_blocks.max(1);
            callback(processed.min(total) as f64 / total as f64);
        }
    }
}

/// Per-call control block threaded through kernels and the orchestrator.
pub(crate) struct OperationContext {
    token: CancellationToken,
    is_parallel: bool,
    task_count: usize,
    progress: OperationProgress,
}

impl OperationContext {
    pub(crate) fn new(
        options: &DecoderOptions,
        token: CancellationToken,
        total_blocks: u64,
    ) -> Self {
        Self {
            token,
            is_parallel: options.is_parallel,
            task_count: options.task_count.max(1) as usize,
            progress: OperationProgress::new(total_blocks, options.progress.clone()),
        }
    }

    pub(crate) fn is_parallel(&self) -> bool {
        self.is_parallel
    }

    /// Chunk length that spreads `item_count` items over the configured
    /// number of tasks.
    pub(crate) fn chunk_len(&self, item_count: usize) -> usize {
        item_count.div_ceil(self.task_count).max(1)
    }

    pub(crate) fn check_cancelled(&self) -> Result<(), DecodeError> {
        if self.token.is_cancelled() {
            Err(DecodeError::Cancelled)
        } else {
            Ok(())
        }
    }

    pub(crate) fn advance_progress(&self, blocks: u64) {
        self.progress.advance(blocks);
    }
}
