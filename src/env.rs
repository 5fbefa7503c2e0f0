//! Insertion-ordered binding environments.
//!
//! Rebinding a name removes the old entry and appends the new one, so
//! iteration order always reflects the most recent binding sequence. The
//! refinement checker relies on that order when it rewraps bindings as
//! nested `let`s.

use std::rc::Rc;

#[derive(Debug)]
pub struct Env<T> {
    elems: Vec<(String, Rc<T>)>,
}

impl<T> Env<T> {
    pub fn new() -> Self {
        Env { elems: Vec::new() }
    }

    /// A copy of this environment with `name` bound to `val`.
    pub fn append(&self, name: &str, val: Rc<T>) -> Self {
        let mut elems = self.elems.clone();
        elems.retain(|(existing, _)| existing != name);
        elems.push((name.to_string(), val));
        Env { elems }
    }

    pub fn lookup(&self, name: &str) -> Option<Rc<T>> {
        self.elems
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, val)| Rc::clone(val))
    }

    /// Bindings oldest-first.
    pub fn elems(&self) -> &[(String, Rc<T>)] {
        &self.elems
    }
}

impl<T> Default for Env<T> {
    fn default() -> Self {
        Env::new()
    }
}

impl<T> Clone for Env<T> {
    fn clone(&self) -> Self {
        Env {
            elems: self.elems.clone(),
        }
    }
}
