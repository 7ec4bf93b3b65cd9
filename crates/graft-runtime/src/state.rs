//! Component state views.
//!
//! A view is a borrow of the host plus the binding that says which field
//! of the host it addresses. Equality is host identity: two views are equal
//! when they borrow the same host instance.

use std::fmt;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};

use crate::component::{Component, HasComponent};

type StorageOf<B> = <<B as HasComponent>::Component as Component>::Storage;

/// Read-only view of one component inclusion.
pub struct ComponentState<'h, B: HasComponent> {
    pub(crate) host: &'h B::Host,
    binding: PhantomData<B>,
}

/// Mutable view of one component inclusion.
pub struct ComponentStateMut<'h, B: HasComponent> {
    pub(crate) host: &'h mut B::Host,
    binding: PhantomData<B>,
}

impl<'h, B: HasComponent> ComponentState<'h, B> {
    pub(crate) fn new(host: &'h B::Host) -> Self {
        Self {
            host,
            binding: PhantomData,
        }
    }

    pub fn storage(&self) -> &'h StorageOf<B> {
        B::storage(self.host)
    }

    pub fn contract(&self) -> &'h B::Host {
        self.host
    }
}

impl<'h, B: HasComponent> ComponentStateMut<'h, B> {
    pub(crate) fn new(host: &'h mut B::Host) -> Self {
        Self {
            host,
            binding: PhantomData,
        }
    }

    pub fn contract(&self) -> &B::Host {
        &*self.host
    }

    pub fn contract_mut(&mut self) -> &mut B::Host {
        &mut *self.host
    }

    /// Give the host borrow back, ending the view.
    pub fn into_contract(self) -> &'h mut B::Host {
        self.host
    }

    /// A read-only view borrowing this one.
    pub fn as_view(&self) -> ComponentState<'_, B> {
        ComponentState::new(&*self.host)
    }

    /// A shorter-lived mutable view, for passing on without giving this one up.
    pub fn reborrow(&mut self) -> ComponentStateMut<'_, B> {
        ComponentStateMut::new(&mut *self.host)
    }
}

impl<B: HasComponent> Clone for ComponentState<'_, B> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<B: HasComponent> Copy for ComponentState<'_, B> {}

impl<B: HasComponent> Deref for ComponentState<'_, B> {
    type Target = StorageOf<B>;

    fn deref(&self) -> &Self::Target {
        B::storage(self.host)
    }
}

impl<B: HasComponent> Deref for ComponentStateMut<'_, B> {
    type Target = StorageOf<B>;

    fn deref(&self) -> &Self::Target {
        B::storage(self.host)
    }
}

impl<B: HasComponent> DerefMut for ComponentStateMut<'_, B> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        B::storage_mut(&mut *self.host)
    }
}

impl<B: HasComponent> PartialEq for ComponentState<'_, B> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.host, other.host)
    }
}

impl<B: HasComponent> Eq for ComponentState<'_, B> {}

impl<B: HasComponent> fmt::Debug for ComponentState<'_, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentState")
            .field("storage", &B::STORAGE_FIELD)
            .field("host", &(self.host as *const B::Host))
            .finish()
    }
}

impl<B: HasComponent> fmt::Debug for ComponentStateMut<'_, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentStateMut")
            .field("storage", &B::STORAGE_FIELD)
            .field("host", &(&*self.host as *const B::Host))
            .finish()
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// State Kinds
// ══════════════════════════════════════════════════════════════════════════════

/// Which state an interface implementation receives.
///
/// Interfaces are generic over a `StateKind` so that one trait can be
/// implemented both by a component (over [`ComponentKind`]) and by the
/// wrapper that embeds it in a host (over [`HostKind`]).
pub trait StateKind {
    /// `self: @State`
    type Ref<'a>
    where
        Self: 'a;
    /// `ref self: State`
    type Mut<'a>
    where
        Self: 'a;
}

/// The host state itself.
pub struct HostKind<H>(PhantomData<H>);

/// A component view reached through binding `B`.
pub struct ComponentKind<B>(PhantomData<B>);

impl<H> StateKind for HostKind<H> {
    type Ref<'a> = &'a H where Self: 'a;
    type Mut<'a> = &'a mut H where Self: 'a;
}

impl<B: HasComponent> StateKind for ComponentKind<B> {
    type Ref<'a> = ComponentState<'a, B> where Self: 'a;
    type Mut<'a> = ComponentStateMut<'a, B> where Self: 'a;
}
