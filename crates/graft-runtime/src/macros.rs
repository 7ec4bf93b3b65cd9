//! Declarative macros for bindings and embedded wrappers.

/// Declare a binding marker for one component inclusion.
///
/// ```ignore
/// graft_runtime::component! {
///     pub struct OwnableBinding {
///         component: Ownable,
///         host: Vault,
///         storage: ownable,
///         event: VaultEvent::OwnableEvent,
///     }
/// }
/// ```
///
/// The host must have a field `storage` holding the component's storage,
/// and the event enum a tuple variant wrapping the component's event.
#[macro_export]
macro_rules! component {
    (
        $(#[$meta:meta])*
        $vis:vis struct $marker:ident {
            component: $component:ty,
            host: $host:ty,
            storage: $field:ident,
            event: $event:ident :: $variant:ident $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        $vis struct $marker;

        impl $crate::HasComponent for $marker {
            type Component = $component;
            type Host = $host;

            const STORAGE_FIELD: &'static str = stringify!($field);
            const EVENT_VARIANT: &'static str = stringify!($variant);

            fn storage(host: &Self::Host) -> &<$component as $crate::Component>::Storage {
                &host.$field
            }

            fn storage_mut(
                host: &mut Self::Host,
            ) -> &mut <$component as $crate::Component>::Storage {
                &mut host.$field
            }

            fn nest_event(
                event: <$component as $crate::Component>::Event,
            ) -> <$host as $crate::Contract>::Event {
                $event::$variant(event)
            }
        }
    };
}

/// Declare a host-facing wrapper that forwards an interface to a component
/// implementation through any binding of that component.
///
/// The interface must be generic over a [`StateKind`](crate::StateKind),
/// taking `S::Ref<'a>` for view methods and `S::Mut<'a>` for external ones,
/// each declared with `where S: 'a`.
/// Each forwarded method obtains the component view from the binding and
/// returns the component's result unchanged.
///
/// ```ignore
/// graft_runtime::embeddable_as! {
///     pub struct OwnableImpl: IOwnable for Ownable => OwnableLogic {
///         view fn owner() -> Address;
///         external fn transfer_ownership(new_owner: Address) -> Result<(), OwnableError>;
///     }
/// }
/// ```
#[macro_export]
macro_rules! embeddable_as {
    (
        $(#[$meta:meta])*
        $vis:vis struct $alias:ident : $iface:ident for $component:ty => $imp:ty {
            $($methods:tt)*
        }
    ) => {
        $(#[$meta])*
        $vis struct $alias<B>(::core::marker::PhantomData<B>);

        impl<B> $iface<$crate::HostKind<<B as $crate::HasComponent>::Host>> for $alias<B>
        where
            B: $crate::HasComponent<Component = $component>,
            $imp: $iface<$crate::ComponentKind<B>>,
        {
            $crate::__embeddable_methods! { [$iface, $imp] $($methods)* }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __embeddable_methods {
    ([$iface:ident, $imp:ty]) => {};

    (
        [$iface:ident, $imp:ty]
        view fn $name:ident ( $($arg:ident : $argty:ty),* $(,)? ) $(-> $ret:ty)? ;
        $($rest:tt)*
    ) => {
        fn $name<'a>(
            state: &'a <B as $crate::HasComponent>::Host,
            $($arg: $argty),*
        ) $(-> $ret)?
        where
            $crate::HostKind<<B as $crate::HasComponent>::Host>: 'a,
        {
            let component = <B as $crate::HasComponent>::get_component(state);
            <$imp as $iface<$crate::ComponentKind<B>>>::$name(component, $($arg),*)
        }

        $crate::__embeddable_methods! { [$iface, $imp] $($rest)* }
    };

    (
        [$iface:ident, $imp:ty]
        external fn $name:ident ( $($arg:ident : $argty:ty),* $(,)? ) $(-> $ret:ty)? ;
        $($rest:tt)*
    ) => {
        fn $name<'a>(
            state: &'a mut <B as $crate::HasComponent>::Host,
            $($arg: $argty),*
        ) $(-> $ret)?
        where
            $crate::HostKind<<B as $crate::HasComponent>::Host>: 'a,
        {
            let component = <B as $crate::HasComponent>::get_component_mut(state);
            <$imp as $iface<$crate::ComponentKind<B>>>::$name(component, $($arg),*)
        }

        $crate::__embeddable_methods! { [$iface, $imp] $($rest)* }
    };
}
