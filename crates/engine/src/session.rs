//! Interaction sessions: the completion popup and the command palette.
//!
//! Both wrap a [`SelectionController`] around a list produced by the engine
//! or aggregator. Neither draws anything; a frontend reads `results()` /
//! `highlighted()` and forwards keys.

use std::cell::RefCell;
use std::rc::Rc;

use querypad_config::Settings;
use querypad_core::{SelectionController, TaskQueue};

use crate::commands::{filter_by_query, CommandAggregator, CommandContext, CommandDescriptor, CommandSource};
use crate::completion::{CompletionCandidate, CompletionEngine};
use crate::context::CompletionContext;
use crate::document::DocumentEditor;
use crate::domain::DomainSnapshot;

// ============================================================================
// Completion popup
// ============================================================================

/// Completion state for one editor.
///
/// Every `update`, `accept` and `dismiss` bumps a generation counter. A host
/// that computes completions off the UI thread tags the request with the
/// value `update` returned and drops the result unless `is_current` still
/// holds.
pub struct CompletionSession {
    engine: CompletionEngine,
    selection: SelectionController<CompletionCandidate>,
    context: CompletionContext,
    generation: u64,
    enabled: bool,
}

impl CompletionSession {
    pub fn new(engine: CompletionEngine) -> Self {
        Self {
            engine,
            selection: SelectionController::new(),
            context: CompletionContext::None,
            generation: 0,
            enabled: true,
        }
    }

    pub fn from_settings(engine: CompletionEngine, settings: &Settings) -> Self {
        let mut session = Self::new(engine);
        session.enabled = settings.completion_enabled;
        session
    }

    pub fn engine_mut(&mut self) -> &mut CompletionEngine {
        &mut self.engine
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.close();
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Listener called whenever the highlighted candidate changes.
    pub fn set_listener(&mut self, listener: impl FnMut(Option<&CompletionCandidate>) + 'static) {
        self.selection.set_listener(listener);
    }

    /// Re-classify at the document's caret and replace the candidate list.
    pub fn update(&mut self, document: &dyn DocumentEditor, domain: Option<&DomainSnapshot>) -> u64 {
        self.generation += 1;
        if !self.enabled {
            self.context = CompletionContext::None;
            self.selection.set_items(Vec::new());
            return self.generation;
        }

        let result = self
            .engine
            .complete(document.text(), document.caret_offset(), document.mode(), domain);
        self.context = result.context;
        self.selection.set_items(result.candidates);
        self.generation
    }

    /// Whether `generation` is still the latest request.
    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_open(&self) -> bool {
        !self.selection.is_empty()
    }

    pub fn context(&self) -> &CompletionContext {
        &self.context
    }

    pub fn candidates(&self) -> &[CompletionCandidate] {
        self.selection.items()
    }

    pub fn highlighted(&self) -> Option<&CompletionCandidate> {
        self.selection.highlighted()
    }

    pub fn highlighted_index(&self) -> Option<usize> {
        self.selection.highlighted_index()
    }

    pub fn move_by(&mut self, delta: isize) {
        self.selection.move_by(delta);
    }

    /// Insert the highlighted candidate and close. Returns what was inserted.
    pub fn accept(&mut self, document: &mut dyn DocumentEditor) -> Option<CompletionCandidate> {
        let candidate = self.selection.commit().cloned()?;
        document.insert_at_caret(&candidate.insertion_text);
        self.close();
        Some(candidate)
    }

    /// Like [`accept`](Self::accept), but the insertion runs on the next
    /// drain of `queue` instead of inline.
    pub fn accept_deferred<D>(&mut self, document: Rc<RefCell<D>>, queue: &TaskQueue) -> Option<CompletionCandidate>
    where
        D: DocumentEditor + 'static,
    {
        let candidate = self.selection.commit().cloned()?;
        let text = candidate.insertion_text.clone();
        queue.defer(move || document.borrow_mut().insert_at_caret(&text));
        self.close();
        Some(candidate)
    }

    pub fn dismiss(&mut self) {
        self.generation += 1;
        self.context = CompletionContext::None;
        self.selection.cancel();
    }

    fn close(&mut self) {
        self.generation += 1;
        self.context = CompletionContext::None;
        self.selection.set_items(Vec::new());
    }
}

impl Default for CompletionSession {
    fn default() -> Self {
        Self::new(CompletionEngine::default())
    }
}

// ============================================================================
// Command palette
// ============================================================================

pub const DEFAULT_MAX_RESULTS: usize = 50;

/// The "show all commands" palette.
///
/// Sources are polled once on `open`; typing filters that cached list, so a
/// source is never asked twice for the same palette session.
pub struct CommandPalette {
    aggregator: CommandAggregator,
    selection: SelectionController<CommandDescriptor>,
    all: Vec<CommandDescriptor>,
    query: String,
    total_matches: usize,
    max_results: usize,
    open: bool,
}

impl CommandPalette {
    pub fn new(aggregator: CommandAggregator) -> Self {
        Self {
            aggregator,
            selection: SelectionController::new(),
            all: Vec::new(),
            query: String::new(),
            total_matches: 0,
            max_results: DEFAULT_MAX_RESULTS,
            open: false,
        }
    }

    pub fn from_settings(aggregator: CommandAggregator, settings: &Settings) -> Self {
        Self::new(aggregator).with_max_results(settings.palette_max_results)
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn register(&mut self, source: Box<dyn CommandSource>) {
        self.aggregator.register(source);
    }

    pub fn set_listener(&mut self, listener: impl FnMut(Option<&CommandDescriptor>) + 'static) {
        self.selection.set_listener(listener);
    }

    /// Poll every source and show the full list.
    pub fn open(&mut self, ctx: &CommandContext<'_>) {
        self.all = self.aggregator.collect(ctx);
        self.query.clear();
        self.open = true;
        self.refilter();
    }

    pub fn set_query(&mut self, query: &str) {
        if !self.open {
            return;
        }
        self.query = query.to_string();
        self.refilter();
    }

    pub fn insert_char(&mut self, c: char) {
        if !self.open {
            return;
        }
        self.query.push(c);
        self.refilter();
    }

    pub fn backspace(&mut self) {
        if !self.open || self.query.pop().is_none() {
            return;
        }
        self.refilter();
    }

    pub fn move_by(&mut self, delta: isize) {
        if self.open {
            self.selection.move_by(delta);
        }
    }

    /// Queue the highlighted command's action and close. With nothing
    /// highlighted the palette just closes. Returns the queued command.
    pub fn commit(&mut self, queue: &TaskQueue) -> Option<CommandDescriptor> {
        if !self.open {
            return None;
        }
        let chosen = self.selection.commit().cloned();
        if let Some(cmd) = &chosen {
            log::debug!("palette: queueing '{}'", cmd.title);
            let perform = cmd.performer();
            queue.defer(move || perform.call());
        }
        self.close();
        chosen
    }

    pub fn cancel(&mut self) {
        if !self.open {
            return;
        }
        self.selection.cancel();
        self.reset();
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Visible results, capped at `max_results`.
    pub fn results(&self) -> &[CommandDescriptor] {
        self.selection.items()
    }

    pub fn highlighted(&self) -> Option<&CommandDescriptor> {
        self.selection.highlighted()
    }

    pub fn highlighted_index(&self) -> Option<usize> {
        self.selection.highlighted_index()
    }

    /// Matches before the cap was applied.
    pub fn total_matches(&self) -> usize {
        self.total_matches
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }

    fn refilter(&mut self) {
        let mut matches = filter_by_query(&self.all, &self.query);
        self.total_matches = matches.len();
        matches.truncate(self.max_results);
        self.selection.set_items(matches);
    }

    fn close(&mut self) {
        self.selection.set_items(Vec::new());
        self.reset();
    }

    fn reset(&mut self) {
        self.open = false;
        self.all.clear();
        self.query.clear();
        self.total_matches = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Perform;
    use crate::document::{DocumentMode, TextDocument};
    use crate::sources::{Action, ActionCommandSource};
    use querypad_config::platform::DesktopPlatform;
    use querypad_config::Strings;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn domain() -> DomainSnapshot {
        DomainSnapshot::new().with_tables(["trades", "quotes", "orders"])
    }

    #[test]
    fn test_session_update_and_accept() {
        let mut session = CompletionSession::default();
        let mut doc = TextDocument::new("select * from ", DocumentMode::Query);

        session.update(&doc, Some(&domain()));
        assert!(session.is_open());
        assert_eq!(session.context(), &CompletionContext::TableAfterFrom);
        assert_eq!(session.highlighted().map(|c| c.display_label.as_str()), Some("trades"));

        session.move_by(1);
        let accepted = session.accept(&mut doc).map(|c| c.insertion_text);
        assert_eq!(accepted.as_deref(), Some("quotes"));
        assert_eq!(doc.text(), "select * from quotes");
        assert!(!session.is_open());
    }

    #[test]
    fn test_session_move_clamps() {
        let mut session = CompletionSession::default();
        let doc = TextDocument::new("select * from ", DocumentMode::Query);
        session.update(&doc, Some(&domain()));
        for _ in 0..3 {
            session.move_by(1);
        }
        assert_eq!(session.highlighted_index(), Some(2));
    }

    #[test]
    fn test_session_generation_supersedes() {
        let mut session = CompletionSession::default();
        let doc = TextDocument::new("select * from ", DocumentMode::Query);
        let first = session.update(&doc, Some(&domain()));
        let second = session.update(&doc, Some(&domain()));
        assert!(!session.is_current(first));
        assert!(session.is_current(second));
        session.dismiss();
        assert!(!session.is_current(second));
    }

    #[test]
    fn test_session_dismiss_and_accept_nothing() {
        let mut session = CompletionSession::default();
        let mut doc = TextDocument::new("select * from ", DocumentMode::Query);
        session.update(&doc, Some(&domain()));
        session.dismiss();
        assert!(!session.is_open());
        assert!(session.accept(&mut doc).is_none());
        assert_eq!(doc.text(), "select * from ");
    }

    #[test]
    fn test_session_disabled() {
        let settings = Settings { completion_enabled: false, ..Settings::default() };
        let mut session = CompletionSession::from_settings(CompletionEngine::default(), &settings);
        let doc = TextDocument::new("select * from ", DocumentMode::Query);
        session.update(&doc, Some(&domain()));
        assert!(!session.is_open());
    }

    #[test]
    fn test_session_deferred_accept() {
        let mut session = CompletionSession::default();
        let doc = Rc::new(RefCell::new(TextDocument::new("```sql type='", DocumentMode::Markup)));
        let queue = TaskQueue::new();

        session.update(&*doc.borrow(), Some(&DomainSnapshot::new()));
        session.move_by(2);
        assert!(session.accept_deferred(doc.clone(), &queue).is_some());
        assert_eq!(doc.borrow().text(), "```sql type='");

        assert_eq!(queue.run_pending(), 1);
        assert_eq!(doc.borrow().text(), "```sql type='line'");
    }

    fn palette_with(titles: &[&'static str], counter: Arc<AtomicUsize>) -> CommandPalette {
        let mut actions = ActionCommandSource::new();
        for title in titles {
            let c = counter.clone();
            actions.register(Action::new("test", *title, Perform::new(move || {
                c.fetch_add(1, Ordering::SeqCst);
            })));
        }
        let mut palette = CommandPalette::new(CommandAggregator::new());
        palette.register(Box::new(actions));
        palette
    }

    fn open(palette: &mut CommandPalette) {
        let strings = Strings::english();
        let platform = DesktopPlatform;
        palette.open(&CommandContext::new(&strings, &platform, DocumentMode::Markup));
    }

    fn titles(palette: &CommandPalette) -> Vec<&str> {
        palette.results().iter().map(|c| c.title.as_str()).collect()
    }

    #[test]
    fn test_palette_filter_and_commit() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut palette = palette_with(&["Run Query", "Save", "Run All"], counter.clone());
        open(&mut palette);
        assert_eq!(titles(&palette), vec!["Run Query", "Save", "Run All"]);

        palette.set_query("run");
        assert_eq!(titles(&palette), vec!["Run Query", "Run All"]);
        palette.move_by(1);

        let queue = TaskQueue::new();
        let chosen = palette.commit(&queue).map(|c| c.title);
        assert_eq!(chosen.as_deref(), Some("Run All"));
        assert!(!palette.is_open());
        assert_eq!(counter.load(Ordering::SeqCst), 0, "perform must be deferred");

        queue.run_pending();
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_palette_typing() {
        let mut palette = palette_with(&["Save", "Save As"], Arc::new(AtomicUsize::new(0)));
        open(&mut palette);
        for c in "as".chars() {
            palette.insert_char(c);
        }
        assert_eq!(titles(&palette), vec!["Save As"]);
        palette.backspace();
        assert_eq!(palette.query(), "a");
        assert_eq!(titles(&palette).len(), 2);
    }

    #[test]
    fn test_palette_listener_hears_only_highlight_changes() {
        let mut palette = palette_with(&["Save", "Save As"], Arc::new(AtomicUsize::new(0)));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        palette.set_listener(move |cmd| sink.borrow_mut().push(cmd.map(|c| c.title.clone())));

        open(&mut palette);
        palette.insert_char('a');
        assert_eq!(*seen.borrow(), vec![Some("Save".to_string())]);

        palette.insert_char('s');
        assert_eq!(*seen.borrow(), vec![Some("Save".to_string()), Some("Save As".to_string())]);
    }

    #[test]
    fn test_palette_caps_results() {
        let mut palette = palette_with(&["A1", "A2", "A3", "A4"], Arc::new(AtomicUsize::new(0)))
            .with_max_results(2);
        open(&mut palette);
        assert_eq!(palette.results().len(), 2);
        assert_eq!(palette.total_matches(), 4);
    }

    #[test]
    fn test_palette_cancel_runs_nothing() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut palette = palette_with(&["Save"], counter.clone());
        open(&mut palette);
        palette.cancel();
        assert!(!palette.is_open());

        let queue = TaskQueue::new();
        assert!(palette.commit(&queue).is_none());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_closed_palette_ignores_input() {
        let mut palette = palette_with(&["Save"], Arc::new(AtomicUsize::new(0)));
        palette.set_query("x");
        palette.move_by(1);
        assert_eq!(palette.query(), "");
        assert!(palette.results().is_empty());
    }

    #[test]
    fn test_palette_no_match_commit_closes() {
        let mut palette = palette_with(&["Save"], Arc::new(AtomicUsize::new(0)));
        open(&mut palette);
        palette.set_query("zzz");
        let queue = TaskQueue::new();
        assert!(palette.commit(&queue).is_none());
        assert!(!palette.is_open());
    }
}
