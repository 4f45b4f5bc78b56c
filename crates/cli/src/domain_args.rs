// Parsing for --table / --server values

use querypad_engine::{DriverKind, ServerInfo, TableInfo};

/// `NAME` or `NAME=QUERY`. The query becomes the table's example.
pub fn parse_table(s: &str) -> Result<TableInfo, String> {
    let (name, query) = match s.split_once('=') {
        Some((name, query)) => (name.trim(), Some(query.trim())),
        None => (s.trim(), None),
    };
    if name.is_empty() {
        return Err(format!("empty table name in {:?}", s));
    }
    let table = TableInfo::new(name);
    Ok(match query {
        Some(q) if !q.is_empty() => table.with_example(q),
        _ => table,
    })
}

/// `NAME` or `NAME:DRIVER`. Server names may contain ':' (host:port), so
/// only a trailing segment that names a known driver is split off.
pub fn parse_server(s: &str) -> Result<ServerInfo, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty server name".to_string());
    }
    if let Some((name, driver)) = s.rsplit_once(':') {
        let kind: DriverKind = driver.parse().unwrap_or_default();
        if kind != DriverKind::Other || driver.eq_ignore_ascii_case("other") {
            if name.is_empty() {
                return Err(format!("empty server name in {:?}", s));
            }
            return Ok(ServerInfo::new(name, kind));
        }
    }
    Ok(ServerInfo::new(s, DriverKind::Other))
}
