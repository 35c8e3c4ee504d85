use crate::config::Settings;
use crate::resolve::cache::{CachedTree, TreeCache};
use crate::resolve::errors::ResolveError;
use crate::resolve::lines::LineIndex;
use crate::resolve::loader::{FsSourceLoader, SourceLoader};
use crate::statement::{self, Statement};
use crate::tree::{Node, NodeId, TreeIndex};
use crate::ts::{SyntaxInfo, SyntaxTreeBuilder};
use std::sync::Arc;
use tracing::debug;

/// A runtime execution point: source identifier, 1-based line, optional byte column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Probe {
    pub source_id: String,
    pub line: usize,
    pub column: Option<usize>,
}

impl Probe {
    pub fn new(source_id: impl Into<String>, line: usize) -> Self {
        Self {
            source_id: source_id.into(),
            line,
            column: None,
        }
    }

    pub fn with_column(mut self, column: usize) -> Self {
        self.column = Some(column);
        self
    }
}

/// The node executing at a probe, with the tree it belongs to.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub tree: Arc<TreeIndex<SyntaxInfo>>,
    pub node: NodeId,
}

impl Resolution {
    pub fn node(&self) -> &Node<SyntaxInfo> {
        &self.tree[self.node]
    }

    pub fn top_statement(&self) -> Option<NodeId> {
        statement::top_statement(&self.tree, self.node)
    }

    pub fn statement(&self) -> Option<Statement> {
        statement::statement(&self.tree, self.node)
    }
}

/// Resolve `(line, column)` against any tree.
///
/// `line` is in the tree's numbering (shifted by `start_lineno`); `lines`
/// indexes the text the tree was built from. Lines outside the text and
/// points only the root covers resolve to `None`. A missing column means
/// the first non-whitespace character of the line, so a blank line without
/// a column resolves to `None`; columns past the end of the line are
/// clamped to its last character.
pub fn resolve_point<T>(
    tree: &TreeIndex<T>,
    lines: &LineIndex,
    line: usize,
    column: Option<usize>,
) -> Option<NodeId> {
    let text_line = line.checked_sub(tree.config().line_offset())?;
    let content = lines.line(text_line)?;
    let column = match column {
        Some(column) => column,
        None => lines.first_non_whitespace(text_line)?,
    };
    let column = column.min(content.len().saturating_sub(1));
    let offset = lines.offset(text_line, column)?;

    let root = tree.root()?;
    let found = tree.find_best_match_where(offset, offset, |node| {
        node.position().contains_point(line, column)
    })?;
    (found != root).then_some(found)
}

/// Maps execution probes to syntax nodes, building and caching trees on demand.
///
/// ```no_run
/// use std::collections::HashMap;
/// use tree_interval::resolve::{ExecutionPositionResolver, Probe};
///
/// let mut sources = HashMap::new();
/// sources.insert("job.py".to_string(), "result = job.run()\n".to_string());
/// let mut resolver = ExecutionPositionResolver::with_loader(sources);
///
/// let hit = resolver.resolve(&Probe::new("job.py", 1).with_column(9)).unwrap().unwrap();
/// assert_eq!(hit.node().info().text, "job");
/// ```
pub struct ExecutionPositionResolver<L = FsSourceLoader> {
    loader: L,
    cache: TreeCache,
    settings: Settings,
}

impl ExecutionPositionResolver<FsSourceLoader> {
    pub fn new() -> Self {
        Self::with_loader(FsSourceLoader::new())
    }
}

impl Default for ExecutionPositionResolver<FsSourceLoader> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: SourceLoader> ExecutionPositionResolver<L> {
    pub fn with_loader(loader: L) -> Self {
        let settings = Settings::default();
        Self {
            loader,
            cache: TreeCache::new(settings.resolver.cache_capacity),
            settings,
        }
    }

    /// Replace the settings. Cached trees are dropped.
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.cache = TreeCache::new(settings.resolver.cache_capacity);
        self.settings = settings;
        self
    }

    pub fn cache(&self) -> &TreeCache {
        &self.cache
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Load `source_id` and return its tree, rebuilding only when the text changed.
    pub fn tree_for(&mut self, source_id: &str) -> Result<CachedTree, ResolveError> {
        let text = self.loader.load(source_id)?;
        let settings = &self.settings;
        self.cache.get_or_build(source_id, &text, || {
            SyntaxTreeBuilder::new(source_id, text.as_str())
                .with_settings(settings)
                .build()
                .map_err(|source| ResolveError::Parse {
                    source_id: source_id.to_string(),
                    source,
                })
        })
    }

    /// The node executing at `probe`, or `None` when no node other than the root covers it.
    pub fn resolve(&mut self, probe: &Probe) -> Result<Option<Resolution>, ResolveError> {
        let cached = self.tree_for(&probe.source_id)?;
        let node = resolve_point(&cached.tree, &cached.lines, probe.line, probe.column);
        debug!(
            source = %probe.source_id,
            line = probe.line,
            column = ?probe.column,
            resolved = node.is_some(),
            "resolved probe"
        );
        Ok(node.map(|node| Resolution {
            tree: cached.tree,
            node,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position;
    use std::collections::HashMap;

    const SOURCE: &str = "import os\n\ndef main():\n    value = os.path.join(a, b)\n    return value\n";

    fn resolver() -> ExecutionPositionResolver<HashMap<String, String>> {
        let mut sources = HashMap::new();
        sources.insert("main.py".to_string(), SOURCE.to_string());
        ExecutionPositionResolver::with_loader(sources)
    }

    fn resolve_text(line: usize, column: Option<usize>) -> Option<String> {
        let mut probe = Probe::new("main.py", line);
        probe.column = column;
        resolver()
            .resolve(&probe)
            .unwrap()
            .map(|hit| hit.node().info().text.clone())
    }

    #[test]
    fn column_selects_innermost_node() {
        assert_eq!(resolve_text(4, Some(12)).as_deref(), Some("os"));
        assert_eq!(resolve_text(4, Some(20)).as_deref(), Some("join"));
        assert_eq!(resolve_text(4, Some(25)).as_deref(), Some("a"));
    }

    #[test]
    fn missing_column_uses_first_code_character() {
        assert_eq!(resolve_text(5, None).as_deref(), Some("return value"));
        assert_eq!(resolve_text(1, None).as_deref(), Some("import os"));
    }

    #[test]
    fn blank_and_out_of_range_lines_resolve_to_none() {
        assert_eq!(resolve_text(2, None), None);
        assert_eq!(resolve_text(0, None), None);
        assert_eq!(resolve_text(99, Some(0)), None);
    }

    #[test]
    fn blank_line_inside_a_node_resolves_with_column() {
        let mut sources = HashMap::new();
        sources.insert(
            "call.py".to_string(),
            "total = combine(\n    first,\n\n    second,\n)\n".to_string(),
        );
        let mut resolver = ExecutionPositionResolver::with_loader(sources);

        let hit = resolver
            .resolve(&Probe::new("call.py", 3).with_column(0))
            .unwrap()
            .unwrap();
        assert_eq!(hit.node().info().kind, "argument_list");
        assert!(resolver.resolve(&Probe::new("call.py", 3)).unwrap().is_none());
    }

    #[test]
    fn blank_line_between_statements_stays_unresolved() {
        assert_eq!(resolve_text(2, Some(0)), None);
        assert_eq!(resolve_text(2, Some(7)), None);
    }

    #[test]
    fn wide_columns_are_clamped() {
        assert_eq!(resolve_text(5, Some(500)).as_deref(), Some("value"));
    }

    #[test]
    fn resolution_exposes_statement() {
        let mut resolver = resolver();
        let hit = resolver
            .resolve(&Probe::new("main.py", 4).with_column(15))
            .unwrap()
            .unwrap();
        assert_eq!(hit.node().info().text, "path");
        let stmt = hit.statement().unwrap();
        assert_eq!(stmt.top.before, "value = ");
        assert_eq!(stmt.current, "path");
        assert_eq!(stmt.after, ".join(a, b)");
    }

    #[test]
    fn trees_are_cached_between_probes() {
        let mut resolver = resolver();
        let first = resolver.resolve(&Probe::new("main.py", 1)).unwrap().unwrap();
        let second = resolver.resolve(&Probe::new("main.py", 5)).unwrap().unwrap();
        assert!(Arc::ptr_eq(&first.tree, &second.tree));
        assert_eq!(resolver.cache().len(), 1);
    }

    #[test]
    fn loader_and_parse_failures_are_errors() {
        let mut sources = HashMap::new();
        sources.insert("bad.py".to_string(), "def broken(:\n".to_string());
        let mut resolver = ExecutionPositionResolver::with_loader(sources);
        assert!(matches!(
            resolver.resolve(&Probe::new("bad.py", 1)),
            Err(ResolveError::Parse { .. })
        ));
        assert!(matches!(
            resolver.resolve(&Probe::new("other.py", 1)),
            Err(ResolveError::UnknownSource { .. })
        ));
    }

    #[test]
    fn start_lineno_shifts_probe_lines() {
        let mut sources = HashMap::new();
        sources.insert("snippet.py".to_string(), "x = 1\ny = 2\n".to_string());
        let mut settings = Settings::default();
        settings.tree.start_lineno = Some(40);
        let mut resolver = ExecutionPositionResolver::with_loader(sources).with_settings(settings);

        let hit = resolver.resolve(&Probe::new("snippet.py", 41)).unwrap().unwrap();
        assert_eq!(hit.node().info().text, "y");
        assert_eq!(hit.node().position().lineno(), 41);
        assert!(resolver.resolve(&Probe::new("snippet.py", 2)).unwrap().is_none());
    }

    #[test]
    fn resolve_point_works_on_plain_trees() {
        let lines = LineIndex::new("abcdef\n");
        let mut tree: TreeIndex<&str> = TreeIndex::new("plain");
        let line1 = |start, end| {
            Position::new(start, end)
                .unwrap()
                .with_lines(1, 1)
                .unwrap()
                .with_columns(Some(start), Some(end))
        };
        tree.insert(line1(0, 7), "root").unwrap();
        let inner = tree.insert(line1(2, 4), "inner").unwrap();

        assert_eq!(resolve_point(&tree, &lines, 1, Some(3)), Some(inner));
        assert_eq!(resolve_point(&tree, &lines, 1, Some(4)), None);
        assert_eq!(resolve_point(&tree, &lines, 1, Some(0)), None);
    }
}
