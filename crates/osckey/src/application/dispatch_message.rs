//! DispatchMessageUseCase: the per-message pipeline run by the listener.
//!
//! For every decoded [`InboundMessage`] the pipeline:
//!
//! 1. resolves it against the shared [`ShortcutRegistry`],
//! 2. executes the resulting action through the [`ActionExecutor`],
//! 3. logs the outcome with `tracing`, and
//! 4. hands a [`MessageRecord`] to the optional [`MessageSink`].
//!
//! No outcome is fatal: an unknown address, an unparsable chord, or an OS
//! failure is logged and the pipeline is ready for the next message.

use std::fmt;
use std::sync::Arc;

use osckey_core::{
    classify, resolve, DispatchKind, InboundMessage, KeyCombination, ResolvedAction,
    ShortcutRegistry, UnresolvedReason,
};
use tracing::{error, info, warn};

use super::execute_action::{ActionExecutor, ExecutionError};

/// What happened to one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageOutcome {
    /// The chord was delivered to the OS.
    Executed {
        combination: KeyCombination,
        kind: DispatchKind,
    },
    /// No chord could be derived from the message.
    Unresolved(UnresolvedReason),
    /// A chord was derived but the backend failed.
    ExecutionFailed {
        combination: KeyCombination,
        kind: DispatchKind,
        error: ExecutionError,
    },
}

impl MessageOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, MessageOutcome::Executed { .. })
    }
}

impl fmt::Display for MessageOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageOutcome::Executed { combination, .. } => write!(f, "pressed {combination}"),
            MessageOutcome::Unresolved(reason) => write!(f, "unresolved: {reason}"),
            MessageOutcome::ExecutionFailed {
                combination, error, ..
            } => write!(f, "failed to press {combination}: {error}"),
        }
    }
}

/// The record passed to the [`MessageSink`] for every message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRecord {
    pub address: String,
    pub args: Vec<String>,
    pub outcome: MessageOutcome,
}

/// Callback invoked once per processed message.
pub type MessageSink = Arc<dyn Fn(&MessageRecord) + Send + Sync>;

/// The Dispatch Message use case.
pub struct DispatchPipeline {
    registry: Arc<ShortcutRegistry>,
    executor: ActionExecutor,
    sink: Option<MessageSink>,
}

impl DispatchPipeline {
    pub fn new(registry: Arc<ShortcutRegistry>, executor: ActionExecutor) -> Self {
        Self {
            registry,
            executor,
            sink: None,
        }
    }

    /// Attaches a callback that receives every [`MessageRecord`].
    pub fn with_sink(mut self, sink: MessageSink) -> Self {
        self.sink = Some(sink);
        self
    }

    /// The registry this pipeline resolves against.
    pub fn registry(&self) -> &Arc<ShortcutRegistry> {
        &self.registry
    }

    /// Resolves, executes, and logs one message.
    pub fn handle(&self, message: &InboundMessage) -> MessageOutcome {
        let address = message.address.as_str();
        let args = message.args.join(" ");
        info!(address, args = %args, "OSC received");

        let action = resolve(&self.registry, address, &message.args);
        let outcome = match &action {
            ResolvedAction::Unresolved { reason } => {
                warn!(address, args = %args, reason = %reason, "no shortcut for message");
                MessageOutcome::Unresolved(reason.clone())
            }
            ResolvedAction::KeyPress { combination }
            | ResolvedAction::ScriptedAction { combination } => {
                let combination = *combination;
                let kind = classify(&combination);
                match self.executor.execute(&action) {
                    Ok(()) => {
                        info!(address, chord = %combination, ?kind, "shortcut executed");
                        MessageOutcome::Executed { combination, kind }
                    }
                    Err(e) => {
                        error!(address, chord = %combination, error = %e, "shortcut failed");
                        MessageOutcome::ExecutionFailed {
                            combination,
                            kind,
                            error: e,
                        }
                    }
                }
            }
        };

        if let Some(sink) = &self.sink {
            sink(&MessageRecord {
                address: message.address.clone(),
                args: message.args.clone(),
                outcome: outcome.clone(),
            });
        }

        outcome
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
