//! Global pointer surface.
//!
//! Move and release events are delivered surface-wide rather than to the
//! control under the pointer, so a drag keeps tracking after the pointer
//! leaves the knob. Each mounted control holds a [`Listener`]; dropping it
//! de-registers the control from the surface.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::{Rc, Weak};

use kitpanel_types::ControlId;

/// Pointer input, identical for mouse and touch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Press on a specific control. Starts a drag.
    Down { control: ControlId, y: f64 },
    /// Movement anywhere on the surface.
    Move { y: f64 },
    /// Release anywhere on the surface. Ends every drag.
    Up,
}

#[derive(Debug, Default)]
struct Registry {
    next_id: u64,
    live: BTreeSet<u64>,
}

/// Registry of controls currently listening for surface-wide pointer events.
#[derive(Debug, Clone, Default)]
pub struct PointerSurface {
    registry: Rc<RefCell<Registry>>,
}

impl PointerSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. It stays registered until the guard is dropped.
    pub fn listen(&self) -> Listener {
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.live.insert(id);
        Listener {
            id,
            registry: Rc::downgrade(&self.registry),
        }
    }

    pub fn listener_count(&self) -> usize {
        self.registry.borrow().live.len()
    }

    pub fn is_listening(&self, listener: &Listener) -> bool {
        listener.registry.ptr_eq(&Rc::downgrade(&self.registry))
            && self.registry.borrow().live.contains(&listener.id)
    }
}

/// Registration guard for one control.
#[derive(Debug)]
pub struct Listener {
    id: u64,
    registry: Weak<RefCell<Registry>>,
}

impl Listener {
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.borrow_mut().live.remove(&self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guards_deregister_on_drop() {
        let surface = PointerSurface::new();
        let a = surface.listen();
        let b = surface.listen();
        assert_eq!(surface.listener_count(), 2);
        assert_ne!(a.id(), b.id());
        drop(a);
        assert_eq!(surface.listener_count(), 1);
        assert!(surface.is_listening(&b));
        drop(b);
        assert_eq!(surface.listener_count(), 0);
    }

    #[test]
    fn listener_from_another_surface_is_not_listening() {
        let one = PointerSurface::new();
        let two = PointerSurface::new();
        let guard = one.listen();
        let _other = two.listen();
        assert!(one.is_listening(&guard));
        assert!(!two.is_listening(&guard));
    }

    #[test]
    fn guard_outliving_surface_is_harmless() {
        let guard = {
            let surface = PointerSurface::new();
            surface.listen()
        };
        drop(guard);
    }

    #[test]
    fn clones_share_one_registry() {
        let surface = PointerSurface::new();
        let view = surface.clone();
        let _guard = surface.listen();
        assert_eq!(view.listener_count(), 1);
    }
}
