//! Tree visualization for expressions.
//!
//! Pretty-prints expression trees as ASCII for debugging and logs.

use std::cell::RefCell;
use std::collections::HashSet;
use std::io;
use std::{borrow::Cow, rc::Rc};

use ptree::{Style, TreeItem};

use crate::expr::{Expr, ExprKind, ExprRef};

/// Wrapper for compact tree rendering with back-references for shared nodes.
///
/// Children may be shared between parents, so a sub-tree can appear more
/// than once. This renderer shows `[id] → (see above)` for already-visited
/// nodes.
#[derive(Clone)]
pub struct ExprTreeCompact {
    expr: ExprRef,
    visited: Rc<RefCell<HashSet<u64>>>,
    /// True if this node was already visited when write_self was called
    is_backref: RefCell<bool>,
}

impl ExprTreeCompact {
    /// Create a new compact tree renderer.
    pub fn new(expr: &ExprRef) -> Self {
        Self { expr: expr.clone(), visited: Rc::new(RefCell::new(HashSet::new())), is_backref: RefCell::new(false) }
    }

    fn from_child(expr: ExprRef, visited: Rc<RefCell<HashSet<u64>>>) -> Self {
        Self { expr, visited, is_backref: RefCell::new(false) }
    }
}

impl TreeItem for ExprTreeCompact {
    type Child = ExprTreeCompact;

    fn write_self<W: io::Write>(&self, f: &mut W, _style: &Style) -> io::Result<()> {
        let mut visited = self.visited.borrow_mut();
        if visited.contains(&self.expr.id()) {
            // Already visited - show back-reference
            *self.is_backref.borrow_mut() = true;
            write!(f, "[{}] → (see above)", self.expr.id())
        } else {
            visited.insert(self.expr.id());
            write!(f, "{}", format_node(&self.expr))
        }
    }

    fn children(&self) -> Cow<'_, [Self::Child]> {
        // Don't show children for back-references
        if *self.is_backref.borrow() {
            return Cow::Borrowed(&[]);
        }

        let children: Vec<_> = self
            .expr
            .children()
            .into_iter()
            .map(|child| ExprTreeCompact::from_child(child.clone(), self.visited.clone()))
            .collect();
        Cow::Owned(children)
    }
}

/// Wrapper for full tree rendering that expands shared nodes every time.
#[derive(Clone)]
pub struct ExprTreeFull {
    expr: ExprRef,
}

impl ExprTreeFull {
    /// Create a new full tree renderer.
    pub fn new(expr: &ExprRef) -> Self {
        Self { expr: expr.clone() }
    }
}

impl TreeItem for ExprTreeFull {
    type Child = ExprTreeFull;

    fn write_self<W: io::Write>(&self, f: &mut W, _style: &Style) -> io::Result<()> {
        write!(f, "{}", format_node(&self.expr))
    }

    fn children(&self) -> Cow<'_, [Self::Child]> {
        let children: Vec<_> =
            self.expr.children().into_iter().map(|child| ExprTreeFull { expr: child.clone() }).collect();
        Cow::Owned(children)
    }
}

/// Format a single expression node for display.
///
/// Output format: `[id] KIND : dtype`
fn format_node(expr: &Expr) -> String {
    let kind_str = match expr.kind() {
        ExprKind::Var(var) => format!("VAR({})", var),
        ExprKind::IntImm(value) => format!("INT({})", value),
        ExprKind::UIntImm(value) => format!("UINT({})", value),
        ExprKind::FloatImm(value) => format!("FLOAT({})", value),
        ExprKind::StringImm(value) => format!("STR('{}')", value),
        ExprKind::Cast { .. } => "CAST".to_string(),
        ExprKind::Not { .. } => "NOT".to_string(),
        ExprKind::Binary(op, ..) => format!("{:?}", op).to_uppercase(),
        ExprKind::Select { .. } => "SELECT".to_string(),
        ExprKind::Load { buffer, .. } => format!("LOAD({})", buffer),
        ExprKind::Ramp { lanes, .. } => format!("RAMP(lanes={})", lanes),
        ExprKind::Broadcast { lanes, .. } => format!("BROADCAST(lanes={})", lanes),
        ExprKind::Shuffle { vectors, indices } => {
            format!("SHUFFLE(vectors={}, indices={})", vectors.len(), indices.len())
        }
        ExprKind::Call { name, call_type, .. } => format!("CALL('{}', {})", name, call_type),
        ExprKind::Let { var, .. } => format!("LET({})", var),
        ExprKind::Reduce { axis, value_index, .. } => {
            let axis_ids: Vec<u64> = axis.iter().map(|a| a.id().get()).collect();
            format!("REDUCE(axis={:?}, slot={})", axis_ids, value_index)
        }
    };

    format!("[{}] {} : {}", expr.id(), kind_str, expr.dtype())
}

impl Expr {
    /// Render this expression and its operands as a compact ASCII tree.
    ///
    /// Shared nodes are shown as back-references: `[id] → (see above)`
    pub fn tree(self: &ExprRef) -> String {
        render_tree_compact(self)
    }

    /// Render this expression and its operands as a full ASCII tree.
    ///
    /// Shared nodes are expanded every time they appear (verbose but
    /// complete). Use this when you need to see the full subtree at every
    /// occurrence.
    pub fn tree_full(self: &ExprRef) -> String {
        render_tree_full(self)
    }
}

/// Render an expression as a compact ASCII tree string.
///
/// Shared nodes are shown as back-references: `[id] → (see above)`
pub fn render_tree_compact(expr: &ExprRef) -> String {
    let tree = ExprTreeCompact::new(expr);
    let mut buf = Vec::new();
    ptree::write_tree(&tree, &mut buf).expect("tree rendering failed");
    String::from_utf8(buf).expect("invalid utf8 in tree")
}

/// Render an expression as a full ASCII tree string.
///
/// Shared nodes are expanded every time they appear (verbose but complete).
pub fn render_tree_full(expr: &ExprRef) -> String {
    let tree = ExprTreeFull::new(expr);
    let mut buf = Vec::new();
    ptree::write_tree(&tree, &mut buf).expect("tree rendering failed");
    String::from_utf8(buf).expect("invalid utf8 in tree")
}
