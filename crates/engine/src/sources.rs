//! Built-in command sources: host actions, snippets, and recent documents.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use querypad_config::{MsgKey, RecentDocuments, SnippetLibrary};
use querypad_core::{IconRef, Keystroke};

use crate::commands::{CommandContext, CommandDescriptor, CommandSource, Perform};
use crate::error::SourceError;

// ============================================================================
// Actions
// ============================================================================

/// A host-registered action. `enabled` is shared, so the host can flip it
/// after registration and the next palette open sees the change.
#[derive(Clone)]
pub struct Action {
    pub id: &'static str,
    pub title: String,
    pub detail: String,
    pub keystroke: Option<Keystroke>,
    pub icon: Option<IconRef>,
    enabled: Arc<AtomicBool>,
    handler: Perform,
}

impl Action {
    pub fn new(id: &'static str, title: impl Into<String>, handler: Perform) -> Self {
        Self {
            id,
            title: title.into(),
            detail: String::new(),
            keystroke: None,
            icon: Some(IconRef::COMMAND),
            enabled: Arc::new(AtomicBool::new(true)),
            handler,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = detail.into();
        self
    }

    pub fn with_keystroke(mut self, keystroke: Keystroke) -> Self {
        self.keystroke = Some(keystroke);
        self
    }

    pub fn with_icon(mut self, icon: Option<IconRef>) -> Self {
        self.icon = icon;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    fn descriptor(&self) -> CommandDescriptor {
        let mut cmd = CommandDescriptor::new(self.title.clone(), self.handler.clone())
            .with_detail(self.detail.clone())
            .with_keystroke(self.keystroke.clone());
        cmd.icon = self.icon.clone();
        cmd
    }
}

#[derive(Default)]
pub struct ActionCommandSource {
    actions: Vec<Action>,
}

impl ActionCommandSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, action: Action) {
        self.actions.push(action);
    }

    /// Returns false if no action has that id.
    pub fn set_enabled(&self, id: &str, enabled: bool) -> bool {
        match self.actions.iter().find(|a| a.id == id) {
            Some(action) => {
                action.set_enabled(enabled);
                true
            }
            None => false,
        }
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }
}

impl CommandSource for ActionCommandSource {
    fn name(&self) -> &'static str {
        "actions"
    }

    fn commands(&self, _ctx: &CommandContext<'_>) -> Result<Vec<CommandDescriptor>, SourceError> {
        Ok(self
            .actions
            .iter()
            .filter(|a| a.is_enabled())
            .map(Action::descriptor)
            .collect())
    }
}

// ============================================================================
// Snippets
// ============================================================================

/// Receives text the user asked to insert into the active document.
pub type InsertionSink = Arc<dyn Fn(&str) + Send + Sync>;

pub struct SnippetCommandSource {
    library: SnippetLibrary,
    sink: InsertionSink,
}

impl SnippetCommandSource {
    pub fn new(library: SnippetLibrary, sink: InsertionSink) -> Self {
        Self { library, sink }
    }
}

impl CommandSource for SnippetCommandSource {
    fn name(&self) -> &'static str {
        "snippets"
    }

    fn commands(&self, ctx: &CommandContext<'_>) -> Result<Vec<CommandDescriptor>, SourceError> {
        Ok(self
            .library
            .iter()
            .map(|snippet| {
                let body = snippet.body.clone();
                let sink = Arc::clone(&self.sink);
                CommandDescriptor::new(
                    ctx.strings.format(MsgKey::InsertSnippet, &snippet.title),
                    Perform::new(move || sink(body.as_str())),
                )
                .with_detail(snippet.preview())
                .with_icon(IconRef::SNIPPET)
                .with_keystroke(snippet.keystroke.clone())
            })
            .collect())
    }
}

// ============================================================================
// Recent documents
// ============================================================================

pub type DocumentOpener = Arc<dyn Fn(&Path) + Send + Sync>;

/// One "Open Recent" command per remembered path, most recent first.
pub struct RecentDocumentsCommandSource {
    paths: Vec<PathBuf>,
    opener: DocumentOpener,
}

impl RecentDocumentsCommandSource {
    pub fn new(paths: Vec<PathBuf>, opener: DocumentOpener) -> Self {
        Self { paths, opener }
    }

    pub fn from_recent(recent: &RecentDocuments, opener: DocumentOpener) -> Self {
        Self::new(recent.paths().to_vec(), opener)
    }

    /// Replace the snapshot after the recent list changes.
    pub fn set_paths(&mut self, paths: Vec<PathBuf>) {
        self.paths = paths;
    }
}

impl CommandSource for RecentDocumentsCommandSource {
    fn name(&self) -> &'static str {
        "recent_documents"
    }

    fn commands(&self, ctx: &CommandContext<'_>) -> Result<Vec<CommandDescriptor>, SourceError> {
        Ok(self
            .paths
            .iter()
            .map(|path| {
                let file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.to_string_lossy().into_owned());
                let folder = path
                    .parent()
                    .map(|p| p.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let target = path.clone();
                let opener = Arc::clone(&self.opener);
                CommandDescriptor::new(
                    ctx.strings.format(MsgKey::OpenRecent, &file_name),
                    Perform::new(move || opener(target.as_path())),
                )
                .with_detail(folder)
                .with_icon(IconRef::DOCUMENT)
            })
            .collect())
    }
}
