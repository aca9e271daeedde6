//! Configuration for tracing and explanations.

use crate::trace::{TraceOutput, TracerConfig};

/// Configuration for the debug layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DebugConfig {
    /// Whether tracing is enabled (false = zero overhead).
    pub enabled: bool,

    /// Trace ring buffer size (number of records to retain).
    pub buffer_size: usize,

    /// Output format: true for JSON, false for human-readable.
    pub json_output: bool,

    /// Output trace to stderr as records arrive.
    pub trace_to_stderr: bool,

    /// Deepest condition-tree level included by
    /// [`explain_with_config`](crate::explain::explain_with_config).
    pub explain_depth: usize,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            buffer_size: 10_000,
            json_output: false,
            trace_to_stderr: false,
            explain_depth: 16,
        }
    }
}

impl DebugConfig {
    /// Creates a new configuration with tracing enabled.
    #[must_use]
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            ..Self::default()
        }
    }

    /// Creates a configuration for interactive debugging.
    #[must_use]
    pub fn debug() -> Self {
        Self {
            enabled: true,
            buffer_size: 50_000,
            json_output: false,
            trace_to_stderr: true,
            explain_depth: usize::MAX,
        }
    }

    /// Builder method to set enabled state.
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Builder method to set buffer size.
    #[must_use]
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size;
        self
    }

    /// Builder method to enable/disable JSON output.
    #[must_use]
    pub fn with_json_output(mut self, json: bool) -> Self {
        self.json_output = json;
        self
    }

    /// Builder method to enable/disable stderr tracing.
    #[must_use]
    pub fn with_trace_to_stderr(mut self, trace: bool) -> Self {
        self.trace_to_stderr = trace;
        self
    }

    /// Builder method to set explanation depth.
    #[must_use]
    pub fn with_explain_depth(mut self, depth: usize) -> Self {
        self.explain_depth = depth;
        self
    }

    /// The tracer configuration these settings describe.
    #[must_use]
    pub fn tracer_config(&self) -> TracerConfig {
        TracerConfig {
            enabled: self.enabled,
            buffer_size: self.buffer_size,
            output: if self.trace_to_stderr {
                TraceOutput::Stderr
            } else {
                TraceOutput::None
            },
            json_format: self.json_output,
            event_filter: Vec::new(),
        }
    }
}
