//! Logging and debugging facilities.
//!
//! This module provides:
//! - Target names for filtering the `tracing` output of each subsystem
//! - Debug visualization for widget trees
//! - Performance tracing hooks for profiling
//!
//! # Tracing Integration
//!
//! panelkit uses the `tracing` crate for instrumentation. To see logs,
//! install a tracing subscriber in your application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("panelkit=debug,panelkit_core::timer=trace")
//!     .init();
//! ```
//!
//! # Debug Visualization
//!
//! Any hierarchy implementing [`DebugTree`] can be printed with a
//! [`TreeFormatter`]:
//!
//! ```ignore
//! let text = TreeFormatter::new().format_all(&native_tree);
//! println!("{text}");
//! ```

use std::fmt::{self, Write as _};

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Event loop target.
    pub const EVENT_LOOP: &str = "panelkit_core::event_loop";
    /// Timer system target.
    pub const TIMER: &str = "panelkit_core::timer";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "panelkit_core::signal";
    /// Widget state changes.
    pub const WIDGET: &str = "panelkit::widget";
    /// Container membership changes.
    pub const CONTAINER: &str = "panelkit::container";
    /// Backend selection and application lifecycle.
    pub const BACKEND: &str = "panelkit::backend";
    /// Performance spans.
    pub const PERF: &str = "panelkit::perf";
}

/// A hierarchy that can be printed for debugging.
pub trait DebugTree {
    /// Handle of one node.
    type Node: Copy + fmt::Debug;

    /// Nodes without a parent, in a stable order.
    fn roots(&self) -> Vec<Self::Node>;

    /// Children of a node, in order.
    fn children(&self, node: Self::Node) -> Vec<Self::Node>;

    /// Human readable label of a node (may be empty).
    fn label(&self, node: Self::Node) -> String;

    /// Short type name of a node.
    fn type_name(&self, node: Self::Node) -> &'static str;

    /// Total number of nodes.
    fn node_count(&self) -> usize;
}

/// Style options for tree visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeStyle {
    /// ASCII characters for tree branches.
    Ascii,
    /// Unicode box-drawing characters.
    #[default]
    Unicode,
    /// Compact dash-prefixed lines.
    Compact,
}

/// Configuration for tree debug output.
#[derive(Debug, Clone)]
pub struct TreeFormatOptions {
    /// The style of tree visualization.
    pub style: TreeStyle,
    /// Whether to show node handles.
    pub show_ids: bool,
    /// Whether to show type names.
    pub show_types: bool,
    /// Maximum depth to traverse (None for unlimited).
    pub max_depth: Option<usize>,
    /// Indent size for each level.
    pub indent_size: usize,
}

impl Default for TreeFormatOptions {
    fn default() -> Self {
        Self {
            style: TreeStyle::default(),
            show_ids: true,
            show_types: true,
            max_depth: None,
            indent_size: 2,
        }
    }
}

impl TreeFormatOptions {
    /// Create options for minimal output (labels only).
    pub fn minimal() -> Self {
        Self {
            show_ids: false,
            show_types: false,
            ..Default::default()
        }
    }
}

/// Formats a [`DebugTree`] into text.
#[derive(Debug, Clone, Default)]
pub struct TreeFormatter {
    options: TreeFormatOptions,
}

impl TreeFormatter {
    /// Create a formatter with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a formatter with custom options.
    pub fn with_options(options: TreeFormatOptions) -> Self {
        Self { options }
    }

    /// Format every root of the tree and its descendants.
    pub fn format_all<T: DebugTree>(&self, tree: &T) -> String {
        let mut output = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_all(tree, &mut output);
        output
    }

    /// Format a subtree starting from `root`.
    pub fn format_subtree<T: DebugTree>(&self, tree: &T, root: T::Node) -> String {
        let mut output = String::new();
        let _ = self.write_node(tree, root, &mut Vec::new(), &mut output);
        output
    }

    fn write_all<T: DebugTree>(&self, tree: &T, out: &mut impl fmt::Write) -> fmt::Result {
        writeln!(out, "Widget Tree ({} total widgets):", tree.node_count())?;
        let roots = tree.roots();
        if roots.is_empty() {
            return writeln!(out, "  (empty)");
        }
        for root in roots {
            self.write_node(tree, root, &mut Vec::new(), out)?;
        }
        Ok(())
    }

    /// `path` holds one "is last sibling" flag per ancestor level below the root.
    fn write_node<T: DebugTree>(
        &self,
        tree: &T,
        node: T::Node,
        path: &mut Vec<bool>,
        out: &mut impl fmt::Write,
    ) -> fmt::Result {
        if self.options.max_depth.is_some_and(|max| path.len() > max) {
            return Ok(());
        }

        out.write_str(&self.build_prefix(path))?;
        let label = tree.label(node);
        out.write_str(if label.is_empty() { "(unnamed)" } else { label.as_str() })?;
        if self.options.show_ids {
            write!(out, " [{node:?}]")?;
        }
        if self.options.show_types {
            write!(out, " ({})", tree.type_name(node))?;
        }
        out.write_char('\n')?;

        let children = tree.children(node);
        let count = children.len();
        for (i, child) in children.into_iter().enumerate() {
            path.push(i + 1 == count);
            self.write_node(tree, child, path, out)?;
            path.pop();
        }
        Ok(())
    }

    fn build_prefix(&self, path: &[bool]) -> String {
        let Some((&is_last, ancestors)) = path.split_last() else {
            return String::new();
        };

        let (branch, tee, corner) = match self.options.style {
            TreeStyle::Ascii => ("|", "+--", "`--"),
            TreeStyle::Unicode => ("\u{2502}", "\u{251c}\u{2500}\u{2500}", "\u{2514}\u{2500}\u{2500}"),
            TreeStyle::Compact => ("", "-", "-"),
        };

        let mut prefix = String::new();
        for &ancestor_last in ancestors {
            if ancestor_last || branch.is_empty() {
                prefix.push(' ');
            } else {
                prefix.push_str(branch);
            }
            prefix.extend(std::iter::repeat_n(' ', self.options.indent_size));
        }
        prefix.push_str(if is_last { corner } else { tee });
        prefix.push(' ');
        prefix
    }
}

/// A guard that keeps a tracing span entered until dropped.
///
/// This is useful for tracking the duration of operations.
#[derive(Debug)]
pub struct PerfSpan {
    _span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: targets::PERF, "perf", operation = name);
        Self {
            _span: span.entered(),
        }
    }
}
