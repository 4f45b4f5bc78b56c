//! Commands: the data model for one invocable action, the source contract
//! that produces them, and the aggregator that merges every source into one
//! list for the palette.

use std::fmt;
use std::sync::Arc;

use querypad_config::{PlatformIntegration, Strings};
use querypad_core::{IconRef, Keystroke};

use crate::document::DocumentMode;
use crate::error::{poll_isolated, SourceError};

/// Side-effecting operation behind a command. Cloning shares the closure.
#[derive(Clone)]
pub struct Perform(Arc<dyn Fn() + Send + Sync>);

impl Perform {
    pub fn new(f: impl Fn() + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn noop() -> Self {
        Self::new(|| {})
    }

    pub fn call(&self) {
        (self.0)()
    }
}

/// Two performers are equal when they share the same closure.
impl PartialEq for Perform {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// A single user-facing action, built fresh every time a source is polled.
#[derive(Clone, PartialEq)]
pub struct CommandDescriptor {
    pub title: String,
    /// Empty when the command has nothing extra to say.
    pub detail: String,
    pub icon: Option<IconRef>,
    pub keystroke: Option<Keystroke>,
    perform: Perform,
}

impl CommandDescriptor {
    pub fn new(title: impl Into<String>, perform: Perform) -> Self {
        Self {
            title: title.into(),
            detail: String::new(),
            icon: None,
            keystroke: None,
            perform,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = detail.into();
        self
    }

    pub fn with_icon(mut self, icon: IconRef) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn with_keystroke(mut self, keystroke: Option<Keystroke>) -> Self {
        self.keystroke = keystroke;
        self
    }

    /// Run the command's side effect. Hosts normally defer this onto a
    /// [`querypad_core::TaskQueue`] rather than calling it inline.
    pub fn perform(&self) {
        self.perform.call()
    }

    pub fn performer(&self) -> Perform {
        self.perform.clone()
    }

    /// Detail text for display: the explicit detail, else the keystroke as
    /// the platform writes it, else empty.
    pub fn detail_or_keystroke(&self, platform: &dyn PlatformIntegration) -> String {
        if !self.detail.is_empty() {
            return self.detail.clone();
        }
        self.keystroke
            .as_ref()
            .map(|k| platform.format_keystroke(k))
            .unwrap_or_default()
    }
}

impl fmt::Debug for CommandDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("title", &self.title)
            .field("detail", &self.detail)
            .field("icon", &self.icon)
            .field("keystroke", &self.keystroke)
            .finish_non_exhaustive()
    }
}

/// What sources may look at while producing commands.
#[derive(Clone, Copy)]
pub struct CommandContext<'a> {
    pub strings: &'a Strings,
    pub platform: &'a dyn PlatformIntegration,
    pub mode: DocumentMode,
}

impl<'a> CommandContext<'a> {
    pub fn new(strings: &'a Strings, platform: &'a dyn PlatformIntegration, mode: DocumentMode) -> Self {
        Self { strings, platform, mode }
    }
}

/// An independent producer of commands.
pub trait CommandSource: Send + Sync {
    /// Source name for logging
    fn name(&self) -> &'static str;

    /// Commands available right now. Called once per palette open.
    fn commands(&self, ctx: &CommandContext<'_>) -> Result<Vec<CommandDescriptor>, SourceError>;
}

/// Polls registered sources in registration order and concatenates their
/// results.
#[derive(Default)]
pub struct CommandAggregator {
    sources: Vec<Box<dyn CommandSource>>,
}

impl CommandAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, source: Box<dyn CommandSource>) {
        self.sources.push(source);
    }

    pub fn source_names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Every available command. A failing source contributes nothing.
    pub fn collect(&self, ctx: &CommandContext<'_>) -> Vec<CommandDescriptor> {
        let commands: Vec<_> = self
            .sources
            .iter()
            .flat_map(|s| poll_isolated(s.name(), || s.commands(ctx)))
            .collect();
        log::debug!("collected {} command(s) from {} source(s)", commands.len(), self.sources.len());
        commands
    }
}

/// Commands whose title contains `query`, ignoring case. Order is kept; a
/// blank query matches everything.
pub fn filter_by_query(items: &[CommandDescriptor], query: &str) -> Vec<CommandDescriptor> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return items.to_vec();
    }
    items
        .iter()
        .filter(|c| c.title.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use querypad_config::platform::DesktopPlatform;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Fixed(&'static str, Vec<&'static str>);

    impl CommandSource for Fixed {
        fn name(&self) -> &'static str {
            self.0
        }

        fn commands(&self, _: &CommandContext<'_>) -> Result<Vec<CommandDescriptor>, SourceError> {
            Ok(self.1.iter().map(|t| CommandDescriptor::new(*t, Perform::noop())).collect())
        }
    }

    struct Failing;

    impl CommandSource for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn commands(&self, _: &CommandContext<'_>) -> Result<Vec<CommandDescriptor>, SourceError> {
            Err(SourceError::failed("failing", "no backing data"))
        }
    }

    fn titles(items: &[CommandDescriptor]) -> Vec<&str> {
        items.iter().map(|c| c.title.as_str()).collect()
    }

    fn with_ctx<R>(f: impl FnOnce(&CommandContext<'_>) -> R) -> R {
        let strings = Strings::english();
        let platform = DesktopPlatform;
        f(&CommandContext::new(&strings, &platform, DocumentMode::Markup))
    }

    #[test]
    fn test_collect_in_registration_order() {
        let mut agg = CommandAggregator::new();
        agg.register(Box::new(Fixed("b", vec!["Zeta", "Alpha"])));
        agg.register(Box::new(Fixed("empty", vec![])));
        agg.register(Box::new(Fixed("a", vec!["Beta"])));
        let all = with_ctx(|ctx| agg.collect(ctx));
        assert_eq!(titles(&all), vec!["Zeta", "Alpha", "Beta"]);
    }

    #[test]
    fn test_failing_source_is_skipped() {
        let mut agg = CommandAggregator::new();
        agg.register(Box::new(Fixed("a", vec!["One"])));
        agg.register(Box::new(Failing));
        agg.register(Box::new(Fixed("b", vec!["Two"])));
        let all = with_ctx(|ctx| agg.collect(ctx));
        assert_eq!(titles(&all), vec!["One", "Two"]);
    }

    #[test]
    fn test_filter_is_case_insensitive_contains() {
        let items: Vec<_> = ["Open Recent: a.md", "Insert Snippet: Top Rows", "Toggle Sidebar"]
            .into_iter()
            .map(|t| CommandDescriptor::new(t, Perform::noop()))
            .collect();
        assert_eq!(titles(&filter_by_query(&items, "RECENT")), vec!["Open Recent: a.md"]);
        assert_eq!(titles(&filter_by_query(&items, "o")).len(), 3);
        assert_eq!(filter_by_query(&items, "   ").len(), 3);
        assert!(filter_by_query(&items, "xyz").is_empty());
    }

    #[test]
    fn test_perform_runs_closure() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        let cmd = CommandDescriptor::new("Count", Perform::new(move || {
            c.fetch_add(1, Ordering::SeqCst);
        }));
        cmd.perform();
        cmd.clone().perform();
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_detail_falls_back_to_keystroke() {
        let platform = DesktopPlatform;
        let keyed = CommandDescriptor::new("Palette", Perform::noop())
            .with_keystroke(Some(Keystroke::parse("ctrl-shift-p").unwrap()));
        assert_eq!(keyed.detail_or_keystroke(&platform), "Ctrl+Shift+P");

        let explicit = keyed.clone().with_detail("Show all commands");
        assert_eq!(explicit.detail_or_keystroke(&platform), "Show all commands");

        let bare = CommandDescriptor::new("Bare", Perform::noop());
        assert_eq!(bare.detail_or_keystroke(&platform), "");
    }
}
