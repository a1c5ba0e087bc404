/// Encoder options.
///
/// Keep this small; the native descriptor carries attachment setup.
#[derive(Debug, Clone, Default)]
pub struct EncoderConfig {
    /// Debug label applied right after the pass begins.
    pub label: Option<String>,

    /// Log `EncoderStats` at debug level when the pass ends.
    pub report_stats: bool,
}

impl EncoderConfig {
    pub fn labeled(label: impl Into<String>) -> Self {
        Self { label: Some(label.into()), ..Self::default() }
    }
}

/// Per-pass counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EncoderStats {
    /// Cached-state setters that reached the native pass.
    pub state_changes: u32,
    /// Cached-state setters dropped because the value was already current.
    pub redundant_state_sets: u32,
    pub draw_calls: u32,
}
