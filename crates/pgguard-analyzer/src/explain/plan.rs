//! Query Plan Model - Data structures for representing query execution plans
//!
//! A [`QueryPlan`] owns a single root [`PlanNode`]; every node owns its
//! children by value. Trees are built once by the EXPLAIN parser and are
//! only read afterwards.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Represents a complete query execution plan
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueryPlan {
    /// Root node of the plan tree
    pub root: PlanNode,
    /// Planning time in milliseconds (if the source plan carried timing)
    pub planning_time_ms: Option<f64>,
}

impl QueryPlan {
    /// Creates a new query plan with the given root node
    pub fn new(root: PlanNode) -> Self {
        Self {
            root,
            planning_time_ms: None,
        }
    }

    /// Sets the planning time
    pub fn with_planning_time(mut self, ms: f64) -> Self {
        self.planning_time_ms = Some(ms);
        self
    }

    /// Returns an iterator over all nodes in the plan (pre-order, depth-first)
    pub fn iter_nodes(&self) -> impl Iterator<Item = &PlanNode> {
        self.root.iter_nodes()
    }
}

/// Represents a single operator node in the query plan tree
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanNode {
    /// Operator type tag exactly as reported by the planner (e.g. "Seq Scan")
    pub node_type: String,
    /// Estimated number of rows
    pub rows: Option<i64>,
    /// Estimated width of each row in bytes
    pub width: Option<i64>,
    /// Cost to return the first row
    pub startup_cost: Option<f64>,
    /// Cost to return all rows
    pub total_cost: Option<f64>,
    /// Relation/table name (if applicable)
    pub relation: Option<String>,
    /// Alias used in the query (if applicable)
    pub alias: Option<String>,
    /// Index name used (for index scans)
    pub index_name: Option<String>,
    /// Index condition (for index scans)
    pub index_cond: Option<String>,
    /// Filter condition applied
    pub filter: Option<String>,
    /// Join type (for joins), verbatim
    pub join_type: Option<String>,
    /// Sort keys (for sort operations)
    pub sort_keys: Vec<String>,
    /// Sort method used ("quicksort", "external", ...)
    pub sort_method: Option<String>,
    /// Parallel workers the planner asked for
    pub workers_planned: Option<u64>,
    /// Parallel workers actually launched
    pub workers_launched: Option<u64>,
    /// Buffer blocks found in shared cache
    pub shared_hit_blocks: Option<u64>,
    /// Buffer blocks read from disk
    pub shared_read_blocks: Option<u64>,
    /// Child nodes
    pub children: Vec<PlanNode>,
    /// Additional properties not captured by specific fields
    pub extra: HashMap<String, serde_json::Value>,
}

impl PlanNode {
    /// Creates a new plan node with the given type tag
    pub fn new(node_type: impl Into<String>) -> Self {
        Self {
            node_type: node_type.into(),
            rows: None,
            width: None,
            startup_cost: None,
            total_cost: None,
            relation: None,
            alias: None,
            index_name: None,
            index_cond: None,
            filter: None,
            join_type: None,
            sort_keys: Vec::new(),
            sort_method: None,
            workers_planned: None,
            workers_launched: None,
            shared_hit_blocks: None,
            shared_read_blocks: None,
            children: Vec::new(),
            extra: HashMap::new(),
        }
    }

    /// Creates a node from a known operator type
    pub fn of(kind: NodeType) -> Self {
        Self::new(kind.as_str())
    }

    /// Sets the relation/table name
    pub fn with_relation(mut self, relation: impl Into<String>) -> Self {
        self.relation = Some(relation.into());
        self
    }

    /// Sets the cost information
    pub fn with_cost(mut self, startup: f64, total: f64) -> Self {
        self.startup_cost = Some(startup);
        self.total_cost = Some(total);
        self
    }

    /// Sets the estimated rows
    pub fn with_rows(mut self, rows: i64) -> Self {
        self.rows = Some(rows);
        self
    }

    /// Sets the row width
    pub fn with_width(mut self, width: i64) -> Self {
        self.width = Some(width);
        self
    }

    /// Adds a child node
    pub fn with_child(mut self, child: PlanNode) -> Self {
        self.children.push(child);
        self
    }

    /// Sets the index name
    pub fn with_index(mut self, index_name: impl Into<String>) -> Self {
        self.index_name = Some(index_name.into());
        self
    }

    /// Sets the filter condition
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Sets the sort method
    pub fn with_sort_method(mut self, method: impl Into<String>) -> Self {
        self.sort_method = Some(method.into());
        self
    }

    /// Sets buffer usage counters
    pub fn with_buffers(mut self, hit: u64, read: u64) -> Self {
        self.shared_hit_blocks = Some(hit);
        self.shared_read_blocks = Some(read);
        self
    }

    /// Sets planned and launched worker counts
    pub fn with_workers(mut self, planned: u64, launched: u64) -> Self {
        self.workers_planned = Some(planned);
        self.workers_launched = Some(launched);
        self
    }

    /// Returns the parsed operator kind
    pub fn kind(&self) -> NodeType {
        NodeType::from_postgres_str(&self.node_type)
    }

    /// Returns the estimated rows, treating an absent estimate as zero
    pub fn rows_or_zero(&self) -> i64 {
        self.rows.unwrap_or(0)
    }

    /// Returns true if a non-empty filter expression is attached
    pub fn has_filter(&self) -> bool {
        self.filter.as_deref().is_some_and(|f| !f.is_empty())
    }

    /// Returns the total number of nodes in this subtree (including self)
    pub fn node_count(&self) -> usize {
        self.iter_nodes().count()
    }

    /// Returns the maximum depth of this subtree
    pub fn depth(&self) -> usize {
        self.walk().map(|(depth, _)| depth + 1).max().unwrap_or(1)
    }

    /// Returns true if this is a leaf node (no children)
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns an iterator over this subtree in pre-order
    pub fn iter_nodes(&self) -> impl Iterator<Item = &PlanNode> {
        self.walk().map(|(_, node)| node)
    }

    /// Returns a pre-order iterator that also yields each node's depth
    /// (the receiver is depth 0)
    pub fn walk(&self) -> PlanNodeIterator<'_> {
        PlanNodeIterator::new(self)
    }
}

/// Known PostgreSQL operator types
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    // Scan operations
    SeqScan,
    IndexScan,
    IndexOnlyScan,
    BitmapIndexScan,
    BitmapHeapScan,
    SubqueryScan,
    FunctionScan,
    CteScan,
    ForeignScan,

    // Join operations
    NestedLoop,
    HashJoin,
    MergeJoin,

    // Aggregation operations
    Aggregate,
    GroupAggregate,
    HashAggregate,
    WindowAgg,

    // Sort operations
    Sort,
    IncrementalSort,

    Append,
    Limit,
    Materialize,
    Memoize,
    Hash,
    Unique,
    ModifyTable,
    Result,
    Gather,
    GatherMerge,
    LockRows,

    Unknown,
}

impl NodeType {
    /// Parses a node type from PostgreSQL EXPLAIN output
    pub fn from_postgres_str(s: &str) -> Self {
        match s {
            "Seq Scan" => Self::SeqScan,
            "Index Scan" => Self::IndexScan,
            "Index Only Scan" => Self::IndexOnlyScan,
            "Bitmap Index Scan" => Self::BitmapIndexScan,
            "Bitmap Heap Scan" => Self::BitmapHeapScan,
            "Subquery Scan" => Self::SubqueryScan,
            "Function Scan" => Self::FunctionScan,
            "CTE Scan" => Self::CteScan,
            "Foreign Scan" => Self::ForeignScan,
            "Nested Loop" => Self::NestedLoop,
            "Hash Join" => Self::HashJoin,
            "Merge Join" => Self::MergeJoin,
            "Aggregate" => Self::Aggregate,
            "GroupAggregate" | "Group Aggregate" => Self::GroupAggregate,
            "HashAggregate" | "Hash Aggregate" => Self::HashAggregate,
            "WindowAgg" | "Window Aggregate" => Self::WindowAgg,
            "Sort" => Self::Sort,
            "Incremental Sort" => Self::IncrementalSort,
            "Append" => Self::Append,
            "Limit" => Self::Limit,
            "Materialize" => Self::Materialize,
            "Memoize" => Self::Memoize,
            "Hash" => Self::Hash,
            "Unique" => Self::Unique,
            "ModifyTable" | "Modify Table" => Self::ModifyTable,
            "Result" => Self::Result,
            "Gather" => Self::Gather,
            "Gather Merge" => Self::GatherMerge,
            "LockRows" | "Lock Rows" => Self::LockRows,
            _ => Self::Unknown,
        }
    }

    /// Returns the canonical PostgreSQL spelling of this node type
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SeqScan => "Seq Scan",
            Self::IndexScan => "Index Scan",
            Self::IndexOnlyScan => "Index Only Scan",
            Self::BitmapIndexScan => "Bitmap Index Scan",
            Self::BitmapHeapScan => "Bitmap Heap Scan",
            Self::SubqueryScan => "Subquery Scan",
            Self::FunctionScan => "Function Scan",
            Self::CteScan => "CTE Scan",
            Self::ForeignScan => "Foreign Scan",
            Self::NestedLoop => "Nested Loop",
            Self::HashJoin => "Hash Join",
            Self::MergeJoin => "Merge Join",
            Self::Aggregate => "Aggregate",
            Self::GroupAggregate => "GroupAggregate",
            Self::HashAggregate => "HashAggregate",
            Self::WindowAgg => "WindowAgg",
            Self::Sort => "Sort",
            Self::IncrementalSort => "Incremental Sort",
            Self::Append => "Append",
            Self::Limit => "Limit",
            Self::Materialize => "Materialize",
            Self::Memoize => "Memoize",
            Self::Hash => "Hash",
            Self::Unique => "Unique",
            Self::ModifyTable => "ModifyTable",
            Self::Result => "Result",
            Self::Gather => "Gather",
            Self::GatherMerge => "Gather Merge",
            Self::LockRows => "LockRows",
            Self::Unknown => "Unknown",
        }
    }
}

/// Pre-order iterator over a plan subtree, yielding `(depth, node)`
pub struct PlanNodeIterator<'a> {
    stack: Vec<(usize, &'a PlanNode)>,
}

impl<'a> PlanNodeIterator<'a> {
    fn new(root: &'a PlanNode) -> Self {
        Self {
            stack: vec![(0, root)],
        }
    }
}

impl<'a> Iterator for PlanNodeIterator<'a> {
    type Item = (usize, &'a PlanNode);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        // Push children in reverse order so we visit them in order
        for child in node.children.iter().rev() {
            self.stack.push((depth + 1, child));
        }
        Some((depth, node))
    }
}
