//! Path-tracked, non-fatal error accumulation for one decode call.
//!
//! [`DiagnosticContext::create`] wraps any backend in a [`DiagnosticOps`] and
//! hands back the context that collects errors while codecs decode through
//! it. Every combinator that descends into a field or element goes through
//! [`attempt`], which keeps the path stack balanced and files the failure at
//! its deepest path exactly once.
//!
//! ```
//! use dyncodec::diagnostics::DiagnosticContext;
//! use dyncodec::ops::JsonOps;
//! use dyncodec_path::Segment;
//!
//! let (_ops, context) = DiagnosticContext::create(JsonOps);
//! {
//!     let _outer = context.enter(Segment::key("a"));
//!     let _inner = context.enter(Segment::index(0));
//!     context.report_error("bad value");
//! }
//! assert_eq!(context.depth(), 0);
//! let leaves = context.error_root(None).erred_leaves();
//! assert_eq!(leaves.len(), 1);
//! assert_eq!(leaves.keys().next().unwrap().to_string(), "a[0]");
//! ```

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use dyncodec_path::{PathAddress, Segment};
use indexmap::IndexMap;

use crate::codec::Codec;
use crate::error::CodecError;
use crate::ops::Ops;

/// One level of the error tree.
///
/// `messages` are attached at exactly this path; `children` route to deeper
/// paths in the order they were first reached.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorNode {
    messages: Vec<String>,
    children: IndexMap<Segment, ErrorNode>,
}

impl ErrorNode {
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn children(&self) -> &IndexMap<Segment, ErrorNode> {
        &self.children
    }

    pub fn child(&self, segment: &Segment) -> Option<&ErrorNode> {
        self.children.get(segment)
    }

    /// The node at `path` below this one, if anything was reported there or
    /// deeper.
    pub fn node_at(&self, path: &PathAddress) -> Option<&ErrorNode> {
        path.iter().try_fold(self, |node, segment| node.child(segment))
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty() && self.children.is_empty()
    }

    /// Every node carrying its own messages, keyed by its path relative to
    /// this node. Pass-through ancestors are not included.
    pub fn erred_leaves(&self) -> IndexMap<PathAddress, Vec<String>> {
        let mut out = IndexMap::new();
        let mut prefix = Vec::new();
        self.collect_leaves(&mut prefix, &mut out);
        out
    }

    fn collect_leaves(
        &self,
        prefix: &mut Vec<Segment>,
        out: &mut IndexMap<PathAddress, Vec<String>>,
    ) {
        if !self.messages.is_empty() {
            out.insert(PathAddress::from(prefix.clone()), self.messages.clone());
        }
        for (segment, child) in &self.children {
            prefix.push(segment.clone());
            child.collect_leaves(prefix, out);
            prefix.pop();
        }
    }

    /// All messages of the subtree as one line: descendants before the
    /// node's own messages, joined by `"; "`.
    pub fn flattened_message(&self) -> String {
        let mut parts = Vec::new();
        self.collect_messages(&mut parts);
        parts.join("; ")
    }

    fn collect_messages<'a>(&'a self, parts: &mut Vec<&'a str>) {
        for child in self.children.values() {
            child.collect_messages(parts);
        }
        parts.extend(self.messages.iter().map(String::as_str));
    }

    fn node_mut(&mut self, path: &[Segment]) -> &mut ErrorNode {
        let mut node = self;
        for segment in path {
            node = node.children.entry(segment.clone()).or_default();
        }
        node
    }
}

/// The error tree of one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryErrors {
    category: Option<String>,
    root: ErrorNode,
}

impl CategoryErrors {
    /// `None` is the default category.
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn root(&self) -> &ErrorNode {
        &self.root
    }

    pub fn erred_leaves(&self) -> IndexMap<PathAddress, Vec<String>> {
        self.root.erred_leaves()
    }
}

/// Per-decode-call error accumulator.
///
/// Holds the traversal path stack and one error tree per category. A context
/// belongs to exactly one top-level decode: it is created together with its
/// [`DiagnosticOps`] and is neither `Send` nor `Sync`.
#[derive(Debug)]
pub struct DiagnosticContext {
    path: RefCell<Vec<Segment>>,
    roots: RefCell<IndexMap<Option<String>, ErrorNode>>,
    reported: Cell<usize>,
    failures: Cell<usize>,
}

impl DiagnosticContext {
    /// Wrap `base` for one decode call.
    pub fn create<O>(base: O) -> (DiagnosticOps<O>, Rc<DiagnosticContext>) {
        let context = Rc::new(DiagnosticContext {
            path: RefCell::new(Vec::new()),
            roots: RefCell::new(IndexMap::new()),
            reported: Cell::new(0),
            failures: Cell::new(0),
        });
        let ops = DiagnosticOps {
            base,
            context: Rc::clone(&context),
        };
        (ops, context)
    }

    pub fn push(&self, segment: Segment) {
        self.path.borrow_mut().push(segment);
    }

    /// Remove the innermost segment. Popping the empty stack is a no-op.
    pub fn pop(&self) -> Option<Segment> {
        let popped = self.path.borrow_mut().pop();
        if popped.is_none() {
            tracing::trace!("diagnostic path popped at root");
        }
        popped
    }

    /// Push `segment` until the returned guard is dropped.
    pub fn enter(&self, segment: Segment) -> PathGuard<'_> {
        self.push(segment);
        PathGuard { context: self }
    }

    pub fn current_path(&self) -> PathAddress {
        PathAddress::from(self.path.borrow().clone())
    }

    pub fn depth(&self) -> usize {
        self.path.borrow().len()
    }

    /// File `message` at the current path in the default category.
    pub fn report_error(&self, message: impl Into<String>) {
        self.report(None, message.into());
    }

    /// File `message` at the current path under `category`.
    pub fn report_error_in(&self, category: impl Into<String>, message: impl Into<String>) {
        self.report(Some(category.into()), message.into());
    }

    fn report(&self, category: Option<String>, message: String) {
        if category.is_none() {
            self.failures.set(self.failures.get() + 1);
        }
        let path = self.path.borrow();
        tracing::trace!(
            path = %PathAddress::from(path.clone()),
            category = category.as_deref().unwrap_or("default"),
            "{message}"
        );
        let mut roots = self.roots.borrow_mut();
        roots
            .entry(category)
            .or_default()
            .node_mut(&path)
            .messages
            .push(message);
        self.reported.set(self.reported.get() + 1);
    }

    /// Snapshot of the error tree of `category` (`None` for the default).
    pub fn error_root(&self, category: Option<&str>) -> ErrorNode {
        self.roots
            .borrow()
            .iter()
            .find(|(k, _)| k.as_deref() == category)
            .map(|(_, node)| node.clone())
            .unwrap_or_default()
    }

    /// One entry per category reported so far, in first-report order.
    pub fn errors(&self) -> Vec<CategoryErrors> {
        self.roots
            .borrow()
            .iter()
            .map(|(category, root)| CategoryErrors {
                category: category.clone(),
                root: root.clone(),
            })
            .collect()
    }

    /// Number of `report_error` calls so far, across categories.
    pub fn reported_count(&self) -> usize {
        self.reported.get()
    }

    pub fn has_errors(&self) -> bool {
        self.reported.get() > 0
    }

    /// Number of reports filed in the default category. Custom categories
    /// carry notes that do not locate a decode failure.
    pub fn failure_count(&self) -> usize {
        self.failures.get()
    }
}

/// Pops the segment pushed by [`DiagnosticContext::enter`] on every exit
/// path.
#[derive(Debug)]
#[must_use = "the segment is popped as soon as the guard is dropped"]
pub struct PathGuard<'a> {
    context: &'a DiagnosticContext,
}

impl Drop for PathGuard<'_> {
    fn drop(&mut self) {
        self.context.pop();
    }
}

/// A backend wrapped with a [`DiagnosticContext`].
#[derive(Debug)]
pub struct DiagnosticOps<O> {
    base: O,
    context: Rc<DiagnosticContext>,
}

impl<V, O: Ops<V>> Ops<V> for DiagnosticOps<O> {
    fn null(&self) -> V {
        self.base.null()
    }

    fn is_null(&self, input: &V) -> bool {
        self.base.is_null(input)
    }

    fn create_bool(&self, value: bool) -> V {
        self.base.create_bool(value)
    }

    fn get_bool(&self, input: &V) -> Result<bool, CodecError> {
        self.base.get_bool(input)
    }

    fn create_i64(&self, value: i64) -> V {
        self.base.create_i64(value)
    }

    fn get_i64(&self, input: &V) -> Result<i64, CodecError> {
        self.base.get_i64(input)
    }

    fn create_f64(&self, value: f64) -> V {
        self.base.create_f64(value)
    }

    fn get_f64(&self, input: &V) -> Result<f64, CodecError> {
        self.base.get_f64(input)
    }

    fn create_string(&self, value: &str) -> V {
        self.base.create_string(value)
    }

    fn get_string(&self, input: &V) -> Result<String, CodecError> {
        self.base.get_string(input)
    }

    fn create_list(&self, items: Vec<V>) -> V {
        self.base.create_list(items)
    }

    fn is_list(&self, input: &V) -> bool {
        self.base.is_list(input)
    }

    fn get_list(&self, input: &V) -> Result<Vec<V>, CodecError> {
        self.base.get_list(input)
    }

    fn create_map(&self, entries: Vec<(String, V)>) -> V {
        self.base.create_map(entries)
    }

    fn is_map(&self, input: &V) -> bool {
        self.base.is_map(input)
    }

    fn get_entries(&self, input: &V) -> Result<Vec<(String, V)>, CodecError> {
        self.base.get_entries(input)
    }

    fn get_field(&self, input: &V, key: &str) -> Result<Option<V>, CodecError> {
        self.base.get_field(input, key)
    }

    fn context(&self) -> Option<&DiagnosticContext> {
        Some(&self.context)
    }
}

/// Run one nested decode step under `at`.
///
/// With an active context the segment is pushed for the duration of `f`, and
/// a failure nobody below filed in the default category is filed at this path. The failure is
/// returned wrapped as an enclosing coercion failure at `at`.
pub fn attempt<V, T>(
    ops: &dyn Ops<V>,
    at: Segment,
    f: impl FnOnce() -> Result<T, CodecError>,
) -> Result<T, CodecError> {
    let Some(context) = ops.context() else {
        return f().map_err(|err| err.nested(at));
    };

    let before = context.failure_count();
    let result = {
        let _guard = context.enter(at.clone());
        let result = f();
        if let Err(err) = &result {
            if context.failure_count() == before {
                context.report_error(err.to_string());
            }
        }
        result
    };
    result.map_err(|err| err.nested(at))
}

/// Outcome of [`decode_diagnosed`]: the all-or-nothing result plus every
/// error collected along the way.
#[derive(Debug)]
pub struct Diagnosed<T> {
    pub result: Result<T, CodecError>,
    pub context: Rc<DiagnosticContext>,
}

impl<T> Diagnosed<T> {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    /// The one-line summary of the failure, innermost cause first.
    pub fn root_message(&self) -> Option<String> {
        self.result.as_ref().err().map(ToString::to_string)
    }

    pub fn into_result(self) -> Result<T, CodecError> {
        self.result
    }
}

/// Decode `input` with a fresh diagnostic context wrapped around `base`.
///
/// A failure that no nested combinator filed in the default category is
/// filed at the root.
pub fn decode_diagnosed<T, V, C, O>(codec: &C, base: O, input: &V) -> Diagnosed<T>
where
    C: Codec<T, V> + ?Sized,
    O: Ops<V>,
{
    let (ops, context) = DiagnosticContext::create(base);
    let result = codec.decode(&ops, input);
    if let Err(err) = &result {
        if context.failure_count() == 0 {
            context.report_error(err.to_string());
        }
        tracing::debug!(errors = context.reported_count(), "decode failed: {err}");
    }
    Diagnosed { result, context }
}
