//! In-memory DOM used as a hydration host
//!
//! A small arena tree with just enough of the DOM surface for hydration:
//! elements with ordered attributes, text, comments, sibling navigation,
//! `insertBefore`-style moves and text splitting. Tests, benchmarks and
//! non-browser hosts hydrate against it; browser bindings implement
//! [`HydrationHost`](crate::host::HydrationHost) over the real DOM instead.

mod document;
mod node;

pub use document::Document;
pub use node::{Namespace, Node, NodeId, NodeKind};
