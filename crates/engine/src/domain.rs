//! Live domain data that completion draws on: tables, servers, chart kinds.
//!
//! The host builds a fresh [`DomainSnapshot`] from its catalog and connection
//! registry; sources only read it.

use std::fmt;
use std::str::FromStr;

use querypad_core::IconRef;

/// A chart type token accepted in `type='...'`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartKind {
    pub token: &'static str,
    pub icon: Option<&'static str>,
}

impl ChartKind {
    pub fn icon(&self) -> Option<IconRef> {
        self.icon.map(IconRef::from_static)
    }
}

/// All supported chart types, in menu order.
pub static CHART_KINDS: &[ChartKind] = &[
    ChartKind { token: "grid", icon: Some("table") },
    ChartKind { token: "timeseries", icon: Some("chart-timeseries") },
    ChartKind { token: "line", icon: Some("chart-line") },
    ChartKind { token: "area", icon: Some("chart-area") },
    ChartKind { token: "bar", icon: Some("chart-bar") },
    ChartKind { token: "stack", icon: Some("chart-stack") },
    ChartKind { token: "bar_horizontal", icon: Some("chart-bar-horizontal") },
    ChartKind { token: "stack_horizontal", icon: Some("chart-stack-horizontal") },
    ChartKind { token: "pie", icon: Some("chart-pie") },
    ChartKind { token: "scatter", icon: Some("chart-scatter") },
    ChartKind { token: "bubble", icon: Some("chart-bubble") },
    ChartKind { token: "candle", icon: Some("chart-candle") },
    ChartKind { token: "heatmap", icon: Some("chart-heatmap") },
    ChartKind { token: "radar", icon: Some("chart-radar") },
    ChartKind { token: "sankey", icon: Some("chart-sankey") },
    ChartKind { token: "sunburst", icon: Some("chart-sunburst") },
    ChartKind { token: "treemap", icon: Some("chart-treemap") },
    ChartKind { token: "boxplot", icon: Some("chart-boxplot") },
    ChartKind { token: "calendar", icon: Some("chart-calendar") },
    ChartKind { token: "funnel", icon: Some("chart-funnel") },
    ChartKind { token: "metrics", icon: None },
    ChartKind { token: "3dbar", icon: Some("chart-3d") },
    ChartKind { token: "3dsurface", icon: Some("chart-3d") },
    ChartKind { token: "empty", icon: None },
];

/// Database driver behind a server connection. Only used to pick an icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DriverKind {
    Kdb,
    Postgres,
    MySql,
    Sqlite,
    DuckDb,
    ClickHouse,
    MsSql,
    #[default]
    Other,
}

impl DriverKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Kdb => "kdb",
            Self::Postgres => "postgres",
            Self::MySql => "mysql",
            Self::Sqlite => "sqlite",
            Self::DuckDb => "duckdb",
            Self::ClickHouse => "clickhouse",
            Self::MsSql => "mssql",
            Self::Other => "other",
        }
    }

    pub fn icon(&self) -> IconRef {
        match self {
            Self::Kdb => IconRef::from_static("server-kdb"),
            Self::Postgres => IconRef::from_static("server-postgres"),
            Self::MySql => IconRef::from_static("server-mysql"),
            Self::Sqlite => IconRef::from_static("server-sqlite"),
            Self::DuckDb => IconRef::from_static("server-duckdb"),
            Self::ClickHouse => IconRef::from_static("server-clickhouse"),
            Self::MsSql => IconRef::from_static("server-mssql"),
            Self::Other => IconRef::from_static("server"),
        }
    }
}

impl fmt::Display for DriverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DriverKind {
    type Err = std::convert::Infallible;

    /// Unrecognised names map to `Other`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "kdb" | "kdb+" | "q" => Self::Kdb,
            "postgres" | "postgresql" | "pg" => Self::Postgres,
            "mysql" | "mariadb" => Self::MySql,
            "sqlite" => Self::Sqlite,
            "duckdb" => Self::DuckDb,
            "clickhouse" => Self::ClickHouse,
            "mssql" | "sqlserver" => Self::MsSql,
            _ => Self::Other,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerInfo {
    pub name: String,
    pub driver: DriverKind,
}

impl ServerInfo {
    pub fn new(name: impl Into<String>, driver: DriverKind) -> Self {
        Self { name: name.into(), driver }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableInfo {
    /// Fully qualified name (`schema.table` where the catalog has schemas).
    pub name: String,
    pub example_queries: Vec<String>,
}

impl TableInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), example_queries: Vec::new() }
    }

    pub fn with_example(mut self, query: impl Into<String>) -> Self {
        self.example_queries.push(query.into());
        self
    }

    pub fn first_example(&self) -> Option<&str> {
        self.example_queries.first().map(String::as_str)
    }
}

/// Read-only bundle of everything completion sources may draw on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainSnapshot {
    pub tables: Vec<TableInfo>,
    pub servers: Vec<ServerInfo>,
    pub chart_kinds: &'static [ChartKind],
    pub selected_server: Option<String>,
}

impl DomainSnapshot {
    /// Standard chart kinds, no tables or servers.
    pub fn new() -> Self {
        Self {
            tables: Vec::new(),
            servers: Vec::new(),
            chart_kinds: CHART_KINDS,
            selected_server: None,
        }
    }

    /// Nothing at all, not even chart kinds.
    pub fn empty() -> Self {
        Self { chart_kinds: &[], ..Self::new() }
    }

    pub fn with_table(mut self, table: TableInfo) -> Self {
        self.tables.push(table);
        self
    }

    pub fn with_tables<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tables.extend(names.into_iter().map(TableInfo::new));
        self
    }

    pub fn with_server(mut self, server: ServerInfo) -> Self {
        self.servers.push(server);
        self
    }

    pub fn with_selected_server(mut self, name: impl Into<String>) -> Self {
        self.selected_server = Some(name.into());
        self
    }

    pub fn with_chart_kinds(mut self, kinds: &'static [ChartKind]) -> Self {
        self.chart_kinds = kinds;
        self
    }
}

impl Default for DomainSnapshot {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_kind_table() {
        assert_eq!(CHART_KINDS.len(), 24);
        let mut tokens: Vec<_> = CHART_KINDS.iter().map(|k| k.token).collect();
        tokens.sort_unstable();
        tokens.dedup();
        assert_eq!(tokens.len(), 24, "chart tokens must be unique");
    }

    #[test]
    fn test_driver_parse() {
        assert_eq!("PostgreSQL".parse::<DriverKind>().unwrap(), DriverKind::Postgres);
        assert_eq!("kdb".parse::<DriverKind>().unwrap(), DriverKind::Kdb);
        assert_eq!("oracle".parse::<DriverKind>().unwrap(), DriverKind::Other);
    }

    #[test]
    fn test_snapshot_builders() {
        let snapshot = DomainSnapshot::new()
            .with_tables(["trades", "quotes"])
            .with_server(ServerInfo::new("prod", DriverKind::Kdb))
            .with_selected_server("prod");
        assert_eq!(snapshot.tables.len(), 2);
        assert_eq!(snapshot.selected_server.as_deref(), Some("prod"));
        assert!(DomainSnapshot::empty().chart_kinds.is_empty());
    }
}
