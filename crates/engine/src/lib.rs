pub mod commands;
pub mod completion;
pub mod context;
pub mod document;
pub mod domain;
pub mod error;
pub mod session;
pub mod sources;

pub use commands::{filter_by_query, CommandAggregator, CommandContext, CommandDescriptor, CommandSource, Perform};
pub use completion::{Completion, CompletionCandidate, CompletionEngine, CompletionSource};
pub use context::{classify, CompletionContext, TriggerKind};
pub use document::{DocumentEditor, DocumentMode, TextDocument};
pub use domain::{ChartKind, DomainSnapshot, DriverKind, ServerInfo, TableInfo, CHART_KINDS};
pub use error::SourceError;
pub use session::{CommandPalette, CompletionSession};
pub use sources::{Action, ActionCommandSource, RecentDocumentsCommandSource, SnippetCommandSource};
