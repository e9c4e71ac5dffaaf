use std::fmt;
use std::sync::Arc;
use std::thread;

/// Progress sink invoked with values in `[0, 1]`.
///
/// The callback may run on any worker thread and must be reentrant.
pub type ProgressCallback = Arc<dyn Fn(f64) + Send + Sync + 'static>;

/// Tunables applied to every operation of a [`BcDecoder`](crate::BcDecoder).
#[derive(Clone)]
pub struct DecoderOptions {
    /// Replicate the decoded red channel into green and blue for the
    /// single-channel formats (BC4 and raw R).
    pub red_as_luminance: bool,
    /// Treat DDS BC1 surfaces as carrying 1-bit alpha even when the header
    /// does not set `DDPF_ALPHAPIXELS`.
    pub dds_bc1_expect_alpha: bool,
    /// Decode blocks on a worker pool instead of the calling thread.
    pub is_parallel: bool,
    /// Number of contiguous chunks the block range is partitioned into when
    /// decoding in parallel. Defaults to the hardware parallelism.
    pub task_count: u32,
    /// Optional progress sink.
    pub progress: Option<ProgressCallback>,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            red_as_luminance: false,
            dds_bc1_expect_alpha: false,
            is_parallel: true,
            task_count: thread::available_parallelism().map_or(1, |count| count.get() as u32),
            progress: None,
        }
    }
}

impl fmt::Debug for DecoderOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecoderOptions")
            .field("red_as_luminance", &self.red_as_luminance)
            .field("dds_bc1_expect_alpha", &self.dds_bc1_expect_alpha)
            .field("is_parallel", &self.is_parallel)
            .field("task_count", &self.task_count)
            .field("progress", &self.progress.as_ref().map(|_| ".."))
            .finish()
    }
}
