use std::sync::Arc;

use crate::domain::entities::column::ColumnDescriptor;

/// Invoked by the driver when the user types into a column's search box.
/// Arguments are the column index in descriptor order and the new term.
pub type ColumnSearchHandler = Arc<dyn Fn(usize, &str) + Send + Sync>;

/// The rendering side of the grid. Implementations own every widget and
/// listener; the page controller only tells them when to act.
pub trait GridDriver: Send + Sync {
    /// Renders the static markup the grid mounts into. Called once.
    fn render_static(&self) {}

    /// Builds the grid widget itself. Called once, after `render_static`.
    fn construct(&self, columns: &[ColumnDescriptor]);

    /// Installs per-attach helpers such as the fixed header and resize
    /// listener, and wires column search inputs to `handler`.
    fn on_column_search(&self, handler: ColumnSearchHandler);

    /// Asks the grid to request its current page again.
    fn reload(&self);

    /// Re-aligns overlays (fixed header clone) after the grid redrew.
    fn reposition_overlay(&self);

    /// Tears down everything `on_column_search` installed, including nodes
    /// living outside the grid's own subtree.
    fn destroy(&self);
}
