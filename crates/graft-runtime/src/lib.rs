//! Graft runtime: the component accessor bridge as typed Rust.
//!
//! A host contract embeds component storage in its own fields. For every
//! inclusion a binding marker implements [`HasComponent`], which projects
//! the host onto a [`ComponentState`] view and nests component events into
//! the host's event enum. A view borrows its host for its whole lifetime,
//! so recovering the host from a view never outlives the host itself.
//!
//! [`component!`] declares a binding marker; [`embeddable_as!`] declares a
//! host-facing wrapper that forwards an interface through a binding.

mod component;
mod macros;
mod state;

pub use component::{Component, Contract, HasComponent};
pub use state::{ComponentKind, ComponentState, ComponentStateMut, HostKind, StateKind};
