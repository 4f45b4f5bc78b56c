//! Completion sources and the engine that routes a classified caret position
//! to them.
//!
//! Sources are pure: they read the context and the domain snapshot and return
//! candidates in snapshot order. Every candidate's insertion text is already
//! relative to what the user typed, so the editor just inserts it at the caret.

use serde::Serialize;

use querypad_config::{MsgKey, Strings};
use querypad_core::IconRef;

use crate::context::{classify, CompletionContext, TriggerKind};
use crate::document::DocumentMode;
use crate::domain::DomainSnapshot;
use crate::error::{poll_isolated, SourceError};

/// One proposed insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionCandidate {
    pub insertion_text: String,
    pub display_label: String,
    pub icon: Option<IconRef>,
}

impl CompletionCandidate {
    pub fn new(display_label: impl Into<String>, insertion_text: impl Into<String>) -> Self {
        Self {
            insertion_text: insertion_text.into(),
            display_label: display_label.into(),
            icon: None,
        }
    }

    pub fn with_icon(mut self, icon: Option<IconRef>) -> Self {
        self.icon = icon;
        self
    }
}

/// A producer of candidates for one trigger kind.
pub trait CompletionSource: Send + Sync {
    /// Source name for logging
    fn name(&self) -> &'static str;

    /// The trigger this source answers.
    fn trigger(&self) -> TriggerKind;

    /// Candidates for `context`, in domain order. Must not mutate anything.
    fn provide(
        &self,
        context: &CompletionContext,
        domain: &DomainSnapshot,
    ) -> Result<Vec<CompletionCandidate>, SourceError>;
}

// ============================================================================
// Built-in sources
// ============================================================================

/// Offers a ready-made query block per table with an example query.
pub struct CodeFenceSource {
    label_template: String,
}

impl CodeFenceSource {
    pub fn new(strings: &Strings) -> Self {
        Self { label_template: strings.get(MsgKey::CodeBlockFor).to_string() }
    }

    /// The full block, starting with the opening fence.
    pub fn template(query: &str, server: &str) -> String {
        format!("```sql type='grid' server='{server}'\n{query}\n```\n")
    }
}

impl Default for CodeFenceSource {
    fn default() -> Self {
        Self::new(&Strings::english())
    }
}

impl CompletionSource for CodeFenceSource {
    fn name(&self) -> &'static str {
        "code_fence"
    }

    fn trigger(&self) -> TriggerKind {
        TriggerKind::CodeFence
    }

    fn provide(
        &self,
        context: &CompletionContext,
        domain: &DomainSnapshot,
    ) -> Result<Vec<CompletionCandidate>, SourceError> {
        let CompletionContext::CodeFence { prefix } = context else {
            return Ok(Vec::new());
        };
        let server = domain.selected_server.as_deref().unwrap_or("");

        Ok(domain
            .tables
            .iter()
            .filter_map(|table| {
                let query = table.first_example()?;
                let template = Self::template(query, server);
                let insert = template.strip_prefix(prefix.as_str()).unwrap_or(&template);
                Some(
                    CompletionCandidate::new(self.label_template.replacen("{}", &table.name, 1), insert)
                        .with_icon(Some(IconRef::SNIPPET)),
                )
            })
            .collect())
    }
}

/// `prefix + value + closing quote`, minus the prefix the user already typed.
fn attribute_suffix(prefix: &str, value: &str) -> String {
    let quote = prefix.chars().last().filter(|c| *c == '\'' || *c == '"');
    let mut full = format!("{prefix}{value}");
    if let Some(q) = quote {
        full.push(q);
    }
    full[prefix.len()..].to_string()
}

pub struct ChartTypeSource;

impl CompletionSource for ChartTypeSource {
    fn name(&self) -> &'static str {
        "chart_type"
    }

    fn trigger(&self) -> TriggerKind {
        TriggerKind::ChartTypeAttribute
    }

    fn provide(
        &self,
        context: &CompletionContext,
        domain: &DomainSnapshot,
    ) -> Result<Vec<CompletionCandidate>, SourceError> {
        let CompletionContext::ChartTypeAttribute { prefix } = context else {
            return Ok(Vec::new());
        };
        Ok(domain
            .chart_kinds
            .iter()
            .map(|kind| {
                CompletionCandidate::new(kind.token, attribute_suffix(prefix, kind.token))
                    .with_icon(kind.icon())
            })
            .collect())
    }
}

pub struct ServerSource;

impl CompletionSource for ServerSource {
    fn name(&self) -> &'static str {
        "server"
    }

    fn trigger(&self) -> TriggerKind {
        TriggerKind::ServerAttribute
    }

    fn provide(
        &self,
        context: &CompletionContext,
        domain: &DomainSnapshot,
    ) -> Result<Vec<CompletionCandidate>, SourceError> {
        let CompletionContext::ServerAttribute { prefix } = context else {
            return Ok(Vec::new());
        };
        Ok(domain
            .servers
            .iter()
            .map(|server| {
                CompletionCandidate::new(&server.name, attribute_suffix(prefix, &server.name))
                    .with_icon(Some(server.driver.icon()))
            })
            .collect())
    }
}

pub struct TableSource;

impl CompletionSource for TableSource {
    fn name(&self) -> &'static str {
        "table"
    }

    fn trigger(&self) -> TriggerKind {
        TriggerKind::TableAfterFrom
    }

    fn provide(
        &self,
        context: &CompletionContext,
        domain: &DomainSnapshot,
    ) -> Result<Vec<CompletionCandidate>, SourceError> {
        if *context != CompletionContext::TableAfterFrom {
            return Ok(Vec::new());
        }
        Ok(domain
            .tables
            .iter()
            .map(|table| {
                CompletionCandidate::new(&table.name, &table.name).with_icon(Some(IconRef::TABLE))
            })
            .collect())
    }
}

// ============================================================================
// Engine
// ============================================================================

/// What the engine found for one caret position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub context: CompletionContext,
    pub candidates: Vec<CompletionCandidate>,
}

/// Routes a classified caret position to every registered source for its
/// trigger, in registration order.
pub struct CompletionEngine {
    sources: Vec<Box<dyn CompletionSource>>,
}

impl CompletionEngine {
    pub fn new() -> Self {
        Self { sources: Vec::new() }
    }

    /// Engine with the four built-in sources.
    pub fn with_defaults(strings: &Strings) -> Self {
        let mut engine = Self::new();
        engine.register(Box::new(CodeFenceSource::new(strings)));
        engine.register(Box::new(ChartTypeSource));
        engine.register(Box::new(ServerSource));
        engine.register(Box::new(TableSource));
        engine
    }

    pub fn register(&mut self, source: Box<dyn CompletionSource>) {
        self.sources.push(source);
    }

    pub fn source_names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Candidates for an already-classified context. A missing snapshot
    /// gives no candidates.
    pub fn candidates(
        &self,
        context: &CompletionContext,
        domain: Option<&DomainSnapshot>,
    ) -> Vec<CompletionCandidate> {
        let (Some(trigger), Some(domain)) = (context.trigger(), domain) else {
            return Vec::new();
        };
        self.sources
            .iter()
            .filter(|s| s.trigger() == trigger)
            .flat_map(|s| poll_isolated(s.name(), || s.provide(context, domain)))
            .collect()
    }

    /// Classify the caret and collect candidates.
    pub fn complete(
        &self,
        text: &str,
        caret: usize,
        mode: DocumentMode,
        domain: Option<&DomainSnapshot>,
    ) -> Completion {
        let context = classify(text, caret, mode);
        let candidates = self.candidates(&context, domain);
        log::debug!(
            "completion at {}: {:?} -> {} candidate(s)",
            caret,
            context.trigger().map(|t| t.name()),
            candidates.len()
        );
        Completion { context, candidates }
    }
}

impl Default for CompletionEngine {
    fn default() -> Self {
        Self::with_defaults(&Strings::english())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DriverKind, ServerInfo, TableInfo, CHART_KINDS};

    fn engine() -> CompletionEngine {
        CompletionEngine::default()
    }

    fn inserts(candidates: &[CompletionCandidate]) -> Vec<&str> {
        candidates.iter().map(|c| c.insertion_text.as_str()).collect()
    }

    #[test]
    fn test_tables_after_from_in_order() {
        let domain = DomainSnapshot::new().with_tables(["trades", "quotes"]);
        let result = engine().complete("select * from ", 14, DocumentMode::Query, Some(&domain));
        assert_eq!(result.context, CompletionContext::TableAfterFrom);
        assert_eq!(inserts(&result.candidates), vec!["trades", "quotes"]);
        assert!(result.candidates.iter().all(|c| c.icon == Some(IconRef::TABLE)));
    }

    #[test]
    fn test_chart_types_strip_prefix() {
        let text = "```sql type='";
        let result = engine().complete(text, text.len(), DocumentMode::Markup, Some(&DomainSnapshot::new()));
        assert_eq!(result.candidates.len(), CHART_KINDS.len());
        for (candidate, kind) in result.candidates.iter().zip(CHART_KINDS) {
            let full = format!("type='{}'", kind.token);
            assert_eq!(candidate.insertion_text, full["type='".len()..]);
            assert_eq!(candidate.display_label, kind.token);
        }
    }

    #[test]
    fn test_chart_types_follow_double_quote() {
        let text = "```sql type=\"";
        let result = engine().complete(text, text.len(), DocumentMode::Markup, Some(&DomainSnapshot::new()));
        assert_eq!(result.candidates[2].insertion_text, "line\"");
    }

    #[test]
    fn test_servers_with_driver_icons() {
        let domain = DomainSnapshot::new()
            .with_server(ServerInfo::new("localhost:5000", DriverKind::Kdb))
            .with_server(ServerInfo::new("warehouse", DriverKind::Postgres));
        let text = "```sql server='";
        let result = engine().complete(text, text.len(), DocumentMode::Markup, Some(&domain));
        assert_eq!(inserts(&result.candidates), vec!["localhost:5000'", "warehouse'"]);
        assert_eq!(result.candidates[0].icon, Some(DriverKind::Kdb.icon()));
    }

    #[test]
    fn test_code_fence_only_tables_with_examples() {
        let domain = DomainSnapshot::new()
            .with_table(TableInfo::new("trades").with_example("select from trades"))
            .with_table(TableInfo::new("empty"))
            .with_selected_server("prod");
        let result = engine().complete("``", 2, DocumentMode::Markup, Some(&domain));

        assert_eq!(result.candidates.len(), 1);
        let expected = CodeFenceSource::template("select from trades", "prod");
        assert_eq!(result.candidates[0].insertion_text, expected[2..]);
        assert_eq!(result.candidates[0].display_label, "Code block for trades");
    }

    #[test]
    fn test_missing_or_empty_domain_gives_nothing() {
        let e = engine();
        assert!(e.complete("select * from ", 14, DocumentMode::Query, None).candidates.is_empty());
        let empty = DomainSnapshot::empty();
        assert!(e.complete("type='", 6, DocumentMode::Markup, Some(&empty)).candidates.is_empty());
    }

    #[test]
    fn test_no_context_no_candidates() {
        let domain = DomainSnapshot::new().with_tables(["t"]);
        let result = engine().complete("select 1", 8, DocumentMode::Query, Some(&domain));
        assert!(result.context.is_none());
        assert!(result.candidates.is_empty());
    }

    struct Broken;

    impl CompletionSource for Broken {
        fn name(&self) -> &'static str {
            "broken"
        }

        fn trigger(&self) -> TriggerKind {
            TriggerKind::TableAfterFrom
        }

        fn provide(&self, _: &CompletionContext, _: &DomainSnapshot) -> Result<Vec<CompletionCandidate>, SourceError> {
            Err(SourceError::failed("broken", "catalog offline"))
        }
    }

    struct Panicky;

    impl CompletionSource for Panicky {
        fn name(&self) -> &'static str {
            "panicky"
        }

        fn trigger(&self) -> TriggerKind {
            TriggerKind::TableAfterFrom
        }

        fn provide(&self, _: &CompletionContext, _: &DomainSnapshot) -> Result<Vec<CompletionCandidate>, SourceError> {
            panic!("boom")
        }
    }

    #[test]
    fn test_failing_sources_are_isolated() {
        let mut e = CompletionEngine::new();
        e.register(Box::new(Broken));
        e.register(Box::new(Panicky));
        e.register(Box::new(TableSource));
        let domain = DomainSnapshot::new().with_tables(["trades"]);
        let result = e.complete("select * from ", 14, DocumentMode::Query, Some(&domain));
        assert_eq!(inserts(&result.candidates), vec!["trades"]);
    }
}
