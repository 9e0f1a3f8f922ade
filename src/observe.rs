//! Replay-latest observable value
//!
//! Holds exactly one current value. Observers are called synchronously, in
//! registration order, right after each change. A new observer immediately
//! receives the current value.

use std::fmt;

/// Handle returned by [`Observable::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type Callback<T> = Box<dyn FnMut(&T)>;

pub struct Observable<T> {
    value: T,
    observers: Vec<(ObserverId, Callback<T>)>,
    next_id: u64,
}

impl<T> Observable<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            observers: Vec::new(),
            next_id: 1,
        }
    }

    /// Current value
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Register an observer; it is called once right away with the current value
    pub fn subscribe(&mut self, mut observer: impl FnMut(&T) + 'static) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        observer(&self.value);
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Returns false if the id was not registered
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(oid, _)| *oid != id);
        self.observers.len() != before
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Replace the value and notify
    pub fn set(&mut self, value: T) {
        self.value = value;
        self.notify();
    }

    /// Mutate in place and notify
    pub fn update(&mut self, f: impl FnOnce(&mut T)) {
        f(&mut self.value);
        self.notify();
    }

    fn notify(&mut self) {
        for (_, observer) in self.observers.iter_mut() {
            observer(&self.value);
        }
    }
}

impl<T: Default> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("value", &self.value)
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_subscribe_replays_current_value() {
        let mut obs = Observable::new(7);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        obs.subscribe(move |v| sink.borrow_mut().push(*v));
        assert_eq!(*seen.borrow(), vec![7]);

        obs.set(8);
        obs.update(|v| *v += 1);
        assert_eq!(*seen.borrow(), vec![7, 8, 9]);
    }

    #[test]
    fn test_notification_order_and_unsubscribe() {
        let mut obs = Observable::new(0);
        let log = Rc::new(RefCell::new(Vec::new()));

        let l1 = log.clone();
        let first = obs.subscribe(move |v| l1.borrow_mut().push(("a", *v)));
        let l2 = log.clone();
        obs.subscribe(move |v| l2.borrow_mut().push(("b", *v)));
        log.borrow_mut().clear();

        obs.set(1);
        assert_eq!(*log.borrow(), vec![("a", 1), ("b", 1)]);

        assert!(obs.unsubscribe(first));
        assert!(!obs.unsubscribe(first));
        obs.set(2);
        assert_eq!(log.borrow().last(), Some(&("b", 2)));
        assert_eq!(obs.observer_count(), 1);
    }
}
