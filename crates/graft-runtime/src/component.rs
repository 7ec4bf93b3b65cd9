//! Component, contract and binding traits.

use crate::state::{ComponentState, ComponentStateMut};

/// A reusable bundle of storage and events.
pub trait Component {
    type Storage;
    type Event;
}

/// A host that owns storage and emits events.
pub trait Contract {
    type Event;

    fn emit_event(&mut self, event: Self::Event);
}

/// One inclusion of a component in a host.
///
/// Implemented by a zero-sized binding marker, usually through
/// [`component!`](crate::component). Two inclusions of the same component
/// use two markers, each projecting a different storage field.
pub trait HasComponent: Sized + 'static {
    type Component: Component;
    type Host: Contract + 'static;

    /// Host field holding the component's storage.
    const STORAGE_FIELD: &'static str;
    /// Host event variant nesting the component's events.
    const EVENT_VARIANT: &'static str;

    fn storage(host: &Self::Host) -> &<Self::Component as Component>::Storage;

    fn storage_mut(host: &mut Self::Host) -> &mut <Self::Component as Component>::Storage;

    fn nest_event(
        event: <Self::Component as Component>::Event,
    ) -> <Self::Host as Contract>::Event;

    // ── Accessor ──────────────────────────────────────────────────────────────

    fn get_component(host: &Self::Host) -> ComponentState<'_, Self> {
        ComponentState::new(host)
    }

    fn get_component_mut(host: &mut Self::Host) -> ComponentStateMut<'_, Self> {
        ComponentStateMut::new(host)
    }

    fn get_contract<'h>(state: &ComponentState<'h, Self>) -> &'h Self::Host {
        state.host
    }

    fn get_contract_mut<'s>(state: &'s mut ComponentStateMut<'_, Self>) -> &'s mut Self::Host {
        &mut *state.host
    }

    /// Nest `event` under this binding's variant and emit it on the host.
    fn emit<E>(state: &mut ComponentStateMut<'_, Self>, event: E)
    where
        E: Into<<Self::Component as Component>::Event>,
    {
        tracing::trace!(
            storage = Self::STORAGE_FIELD,
            variant = Self::EVENT_VARIANT,
            "component event"
        );
        let nested = Self::nest_event(event.into());
        Self::get_contract_mut(state).emit_event(nested);
    }
}
