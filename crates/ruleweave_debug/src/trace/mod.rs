//! Evaluation tracing.
//!
//! A [`Tracer`] plugs into condition evaluation as an
//! [`EvalObserver`] and records what the evaluator did: nodes entered and
//! left, every candidate fact a pattern tried, binding conflicts, and the
//! outcome of each rule. Records go into a bounded [`TraceBuffer`] and can
//! be rendered as text or JSON.
//!
//! Recording costs nothing beyond a branch when the tracer is disabled.

pub mod buffer;
pub mod format;
pub mod record;

pub use buffer::{TraceBuffer, TraceBufferStats};
pub use format::{HumanFormatter, JsonFormatter, TraceFormatter};
pub use record::{TraceEvent, TraceRecord};

use std::io::{self, Write};
use std::time::Instant;

use ruleweave_engine::{
    BindingEnvironment, ConditionNode, EvalObserver, MatchFailure, MatchState, Pattern, Rule,
};
use ruleweave_foundation::FactId;
use ruleweave_storage::{FactShape, FactStore};

// =============================================================================
// Trace Output
// =============================================================================

/// Where each record goes besides the buffer.
#[derive(Clone, Debug, Default)]
pub enum TraceOutput {
    /// Buffer only.
    #[default]
    None,
    /// Also echo every record to stderr as it is recorded.
    Stderr,
}

// =============================================================================
// Tracer Configuration
// =============================================================================

/// Settings for a [`Tracer`].
#[derive(Clone, Debug)]
pub struct TracerConfig {
    /// Record events at all.
    pub enabled: bool,
    /// Capacity of the record buffer.
    pub buffer_size: usize,
    /// Echo target.
    pub output: TraceOutput,
    /// Render records as JSON instead of text.
    pub json_format: bool,
    /// Event types to keep, by [`TraceEvent::event_type`]. Empty keeps all.
    pub event_filter: Vec<String>,
}

impl Default for TracerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            buffer_size: 10_000,
            output: TraceOutput::default(),
            json_format: false,
            event_filter: Vec::new(),
        }
    }
}

impl TracerConfig {
    /// Disabled, buffer-only, text output.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Turns recording on.
    #[must_use]
    pub fn enabled(self) -> Self {
        Self {
            enabled: true,
            ..self
        }
    }

    /// Sets the buffer capacity.
    #[must_use]
    pub fn with_buffer_size(self, buffer_size: usize) -> Self {
        Self {
            buffer_size,
            ..self
        }
    }

    /// Echoes records to stderr.
    #[must_use]
    pub fn to_stderr(self) -> Self {
        Self {
            output: TraceOutput::Stderr,
            ..self
        }
    }

    /// Renders records as JSON.
    #[must_use]
    pub fn json(self) -> Self {
        Self {
            json_format: true,
            ..self
        }
    }

    /// Keeps only the named event types.
    #[must_use]
    pub fn filter_events(self, event_filter: Vec<String>) -> Self {
        Self {
            event_filter,
            ..self
        }
    }

    fn keeps(&self, event: &TraceEvent) -> bool {
        self.event_filter.is_empty()
            || self.event_filter.iter().any(|t| t == event.event_type())
    }
}

// =============================================================================
// Tracer
// =============================================================================

/// Records condition evaluation events.
pub struct Tracer {
    config: TracerConfig,
    buffer: TraceBuffer,
    cycle: u64,
    epoch: Instant,
    text: HumanFormatter,
    json: JsonFormatter,
}

impl Tracer {
    /// Builds a tracer from its settings.
    #[must_use]
    pub fn new(config: TracerConfig) -> Self {
        Self {
            buffer: TraceBuffer::new(config.buffer_size),
            config,
            cycle: 0,
            epoch: Instant::now(),
            text: HumanFormatter::new(),
            json: JsonFormatter::new(),
        }
    }

    /// A tracer that records nothing until enabled.
    #[must_use]
    pub fn disabled() -> Self {
        Self::new(TracerConfig::new())
    }

    /// An enabled tracer that records into its buffer only.
    #[must_use]
    pub fn recording() -> Self {
        Self::new(TracerConfig::new().enabled())
    }

    /// True if events are being recorded.
    #[must_use]
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Starts recording.
    pub fn enable(&mut self) {
        self.config.enabled = true;
    }

    /// Stops recording. Buffered records are kept.
    pub fn disable(&mut self) {
        self.config.enabled = false;
    }

    /// The cycle new records are tagged with.
    #[must_use]
    pub fn current_cycle(&self) -> u64 {
        self.cycle
    }

    /// Starts a new evaluation cycle and returns its number.
    pub fn next_cycle(&mut self) -> u64 {
        self.cycle += 1;
        self.cycle
    }

    /// Switches between JSON and text rendering.
    pub fn set_json_format(&mut self, json: bool) {
        self.config.json_format = json;
    }

    /// Changes the echo target.
    pub fn set_output(&mut self, output: TraceOutput) {
        self.config.output = output;
    }

    /// Records an event in the current cycle, unless disabled or filtered out.
    #[inline]
    pub fn record(&mut self, event: TraceEvent) {
        if self.config.enabled && self.config.keeps(&event) {
            self.push(event);
        }
    }

    fn push(&mut self, event: TraceEvent) {
        let elapsed = u64::try_from(self.epoch.elapsed().as_nanos()).unwrap_or(u64::MAX);
        self.buffer.push(self.cycle, elapsed, event);

        if matches!(self.config.output, TraceOutput::Stderr) {
            if let Some(line) = self.buffer.last().map(|r| self.format_record(r)) {
                let _ = writeln!(io::stderr().lock(), "{line}");
            }
        }
    }

    /// Renders one record in the configured format.
    #[must_use]
    pub fn format_record(&self, record: &TraceRecord) -> String {
        self.formatter().format(record)
    }

    /// Renders records in the configured format, one per line.
    #[must_use]
    pub fn format_records(&self, records: &[&TraceRecord]) -> String {
        self.formatter().format_many(records)
    }

    fn formatter(&self) -> &dyn TraceFormatter {
        if self.config.json_format {
            &self.json
        } else {
            &self.text
        }
    }

    /// The recorded events.
    #[must_use]
    pub fn buffer(&self) -> &TraceBuffer {
        &self.buffer
    }

    /// Drops all buffered records.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Summary of the buffered records.
    #[must_use]
    pub fn stats(&self) -> TraceBufferStats {
        self.buffer.stats()
    }

    // -------------------------------------------------------------------------
    // Traced evaluation
    // -------------------------------------------------------------------------

    /// Evaluates a rule in a new cycle, recording every step.
    ///
    /// Returns the same result as [`Rule::is_satisfied`].
    pub fn trace_rule(&mut self, rule: &Rule, facts: &FactStore) -> (bool, BindingEnvironment) {
        self.next_cycle();
        let (matched, state) = rule.evaluate_observed(facts, self);
        let bindings = if matched {
            state.bindings
        } else {
            BindingEnvironment::new()
        };
        self.record(TraceEvent::RuleEvaluated {
            rule: rule.name().to_string(),
            matched,
            bindings: bindings.to_vec(),
        });
        (matched, bindings)
    }

    /// Evaluates a bare condition tree in a new cycle.
    pub fn trace_condition(
        &mut self,
        node: &ConditionNode,
        facts: &FactStore,
        state: &mut MatchState,
    ) -> bool {
        self.next_cycle();
        node.evaluate_observed(facts, state, self)
    }
}

impl Default for Tracer {
    fn default() -> Self {
        Self::disabled()
    }
}

impl EvalObserver for Tracer {
    fn node_entered(&mut self, node: &ConditionNode, depth: usize) {
        self.record(TraceEvent::NodeEntered {
            kind: node.kind_name(),
            depth,
        });
    }

    fn node_exited(&mut self, node: &ConditionNode, depth: usize, matched: bool) {
        self.record(TraceEvent::NodeExited {
            kind: node.kind_name(),
            depth,
            matched,
        });
    }

    fn fact_skipped(&mut self, pattern: &Pattern, fact: FactId, shape: FactShape) {
        self.record(TraceEvent::FactSkipped {
            pattern: pattern.fact_name().to_string(),
            fact,
            shape,
        });
    }

    fn pattern_tried(
        &mut self,
        pattern: &Pattern,
        fact: FactId,
        outcome: &Result<(), MatchFailure>,
    ) {
        if !self.is_enabled() {
            return;
        }
        self.record(TraceEvent::PatternTried {
            pattern: pattern.fact_name().to_string(),
            fact,
            failure: outcome.as_ref().err().map(ToString::to_string),
        });
        if let Err(MatchFailure::BindingConflict {
            variable,
            bound,
            found,
        }) = outcome
        {
            self.record(TraceEvent::BindingConflict {
                variable: variable.clone(),
                bound: bound.clone(),
                found: found.clone(),
            });
        }
    }
}
