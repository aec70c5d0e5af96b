//! # chain
//!
//! why: give the rest of the crate one cycle-safe way to walk error causes
//! relations: used by resolver.rs to find domain errors, by errlog-store to render detail text
//! what: Chain iterator, FaultRef handle into a chain, root cause message, trace rendering

use std::backtrace::BacktraceStatus;
use std::collections::HashSet;
use std::error::Error as StdError;
use std::fmt::{self, Write as _};
use std::io;
use std::sync::Arc;

use crate::DomainError;

/// Iterator over an error and its `source()` ancestors
///
/// Stops as soon as it would revisit a node, so a chain whose `source()`
/// links loop back on themselves is still walked once.
pub struct Chain<'a> {
    next: Option<&'a (dyn StdError + 'static)>,
    // address plus vtable: a wrapper and a source stored at its offset 0
    // share an address but are different nodes
    seen: HashSet<*const (dyn StdError + 'static)>,
}

impl<'a> Chain<'a> {
    pub fn new(head: &'a (dyn StdError + 'static)) -> Self {
        Self {
            next: Some(head),
            seen: HashSet::new(),
        }
    }
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a (dyn StdError + 'static);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        if !self.seen.insert(current as *const _) {
            return None;
        }
        self.next = current.source();
        Some(current)
    }
}

/// Owned reference to one node of an error chain
///
/// Keeps the whole top-level error alive and remembers how many `source()`
/// hops lead to the referenced node. Cloning is an `Arc` bump.
#[derive(Clone)]
pub struct FaultRef {
    root: Arc<anyhow::Error>,
    depth: usize,
}

impl FaultRef {
    /// Reference the top-level error itself
    pub fn new(error: anyhow::Error) -> Self {
        Self::at(Arc::new(error), 0)
    }

    pub(crate) fn at(root: Arc<anyhow::Error>, depth: usize) -> Self {
        Self { root, depth }
    }

    /// The referenced node
    pub fn error(&self) -> &(dyn StdError + 'static) {
        let head: &(dyn StdError + 'static) = &**self.root;
        Chain::new(head).nth(self.depth).unwrap_or(head)
    }

    /// The top-level error this reference was taken from
    pub fn root(&self) -> &anyhow::Error {
        &self.root
    }

    /// Number of `source()` hops from the top-level error
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The node's own message, without its causes
    pub fn message(&self) -> String {
        self.error().to_string()
    }

    /// Full trace text: the node's message, its causes, and the stack
    /// backtrace captured with the top-level error when there is one
    pub fn render_trace(&self) -> String {
        let node = self.error();
        let mut out = node.to_string();

        let mut causes = Chain::new(node).skip(1).peekable();
        if causes.peek().is_some() {
            out.push_str("\n\nCaused by:");
            for (i, cause) in causes.enumerate() {
                let _ = write!(out, "\n    {i}: {cause}");
            }
        }

        let backtrace = self.root.backtrace();
        if backtrace.status() == BacktraceStatus::Captured {
            let _ = write!(out, "\n\nStack backtrace:\n{backtrace}");
        }
        out
    }
}

impl fmt::Display for FaultRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.error(), f)
    }
}

impl fmt::Debug for FaultRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FaultRef")
            .field("depth", &self.depth)
            .field("error", &self.error())
            .finish()
    }
}

/// One line naming the deepest cause of `err`: `"{kind}: {message}"`
pub fn root_cause_message(err: &(dyn StdError + 'static)) -> String {
    let root = Chain::new(err).last().unwrap_or(err);
    format!("{}: {}", kind_name(root), root)
}

fn kind_name(err: &(dyn StdError + 'static)) -> String {
    if err.is::<DomainError>() {
        return "DomainError".to_owned();
    }
    if let Some(io_err) = err.downcast_ref::<io::Error>() {
        return format!("{:?}", io_err.kind());
    }

    // derived Debug output is `Name`, `Name { .. }` or `Name(..)`; anything
    // else is a Debug that prints the message and names nothing
    let debug = format!("{err:?}");
    let end = debug
        .find(|c: char| !(c.is_alphanumeric() || c == '_'))
        .unwrap_or(debug.len());
    let (ident, rest) = debug.split_at(end);
    let derived = rest.is_empty() || rest.starts_with(" {") || rest.starts_with('(');
    match ident.chars().next() {
        Some(c) if derived && c.is_ascii_uppercase() => ident.to_owned(),
        _ => "Error".to_owned(),
    }
}
