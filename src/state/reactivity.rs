// ============================================================================
// REACTIVITY - Sistema de notificaciones/subscribers para reactividad
// ============================================================================

use std::cell::{Ref, RefCell};
use std::rc::Rc;

type Callback = Rc<dyn Fn()>;

/// Estado reactivo con sistema de notificaciones.
/// Los clones comparten valor y subscribers.
pub struct ReactiveState<T> {
    value: Rc<RefCell<T>>,
    subscribers: Rc<RefCell<Vec<Callback>>>,
}

impl<T> ReactiveState<T> {
    /// Crear nuevo estado reactivo
    pub fn new(value: T) -> Self {
        Self {
            value: Rc::new(RefCell::new(value)),
            subscribers: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Prestar el valor actual
    pub fn borrow(&self) -> Ref<'_, T> {
        self.value.borrow()
    }

    /// Referencia compartida al valor interno (para lectores)
    pub fn shared(&self) -> Rc<RefCell<T>> {
        self.value.clone()
    }

    /// Establecer nuevo valor y notificar subscribers
    pub fn set(&self, new_value: T) {
        *self.value.borrow_mut() = new_value;
        self.notify();
    }

    /// Actualizar valor usando closure; notifica solo si devuelve true
    pub fn update<F>(&self, updater: F) -> bool
    where
        F: FnOnce(&mut T) -> bool,
    {
        let changed = updater(&mut *self.value.borrow_mut());
        if changed {
            self.notify();
        }
        changed
    }

    /// Suscribirse a cambios
    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn() + 'static,
    {
        self.subscribers.borrow_mut().push(Rc::new(callback));
    }

    /// Notificar a todos los subscribers.
    /// Se copia la lista antes para que un callback pueda suscribir o leer.
    fn notify(&self) {
        let callbacks: Vec<Callback> = self.subscribers.borrow().clone();
        for callback in callbacks {
            callback();
        }
    }
}

impl<T: Clone> ReactiveState<T> {
    /// Copia del valor actual
    pub fn get(&self) -> T {
        self.value.borrow().clone()
    }
}

impl<T> Clone for ReactiveState<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            subscribers: self.subscribers.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_set_notifies_subscribers() {
        let state = ReactiveState::new(0);
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        state.subscribe(move || counter.set(counter.get() + 1));

        state.set(5);
        assert_eq!(state.get(), 5);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_update_without_change_is_silent() {
        let state = ReactiveState::new(1);
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        state.subscribe(move || counter.set(counter.get() + 1));

        assert!(!state.update(|_| false));
        assert!(state.update(|v| {
            *v += 1;
            true
        }));
        assert_eq!(state.get(), 2);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_subscriber_can_read_state() {
        let state = ReactiveState::new(String::new());
        let seen = Rc::new(RefCell::new(String::new()));
        let (reader, sink) = (state.clone(), seen.clone());
        state.subscribe(move || *sink.borrow_mut() = reader.get());

        state.set("hola".to_string());
        assert_eq!(*seen.borrow(), "hola");
    }
}
