//! Saved questions
//!
//! An id-keyed set of questions, kept in insertion order and persisted on
//! every change.

use crate::consts::FAVORITES_KEY;
use crate::model::Question;
use crate::observe::ObserverId;
use crate::persistence::{Diagnostic, Persisted, SharedStorage};

#[derive(Debug)]
pub struct FavoritesStore {
    cell: Persisted<Vec<Question>>,
}

impl FavoritesStore {
    /// Load favorites from storage; missing or corrupt data starts empty
    pub fn load(storage: SharedStorage) -> Self {
        let (cell, _) = Persisted::load_or(FAVORITES_KEY, storage, Vec::new);
        log::info!("{} favorites available", cell.get().len());
        Self { cell }
    }

    /// All favorites, oldest first
    pub fn favorites(&self) -> &[Question] {
        self.cell.get()
    }

    /// Add a question. Returns false, changing nothing, if its id is already saved.
    pub fn add(&mut self, question: Question) -> bool {
        if self.exists(&question.id) {
            return false;
        }
        log::debug!("Adding favorite {}", question.id);
        self.cell.update(|favorites| favorites.push(question));
        true
    }

    /// Remove by id. Returns false if it was not saved.
    pub fn remove(&mut self, id: &str) -> bool {
        if !self.exists(id) {
            return false;
        }
        log::debug!("Removing favorite {}", id);
        self.cell.update(|favorites| favorites.retain(|q| q.id != id));
        true
    }

    /// Remove if saved, add otherwise. Returns whether it is saved afterwards.
    pub fn toggle(&mut self, question: Question) -> bool {
        if self.remove(&question.id) {
            false
        } else {
            self.add(question)
        }
    }

    pub fn exists(&self, id: &str) -> bool {
        self.cell.get().iter().any(|q| q.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&Question> {
        self.cell.get().iter().find(|q| q.id == id)
    }

    pub fn clear(&mut self) {
        self.cell.set(Vec::new());
    }

    pub fn count(&self) -> usize {
        self.cell.get().len()
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&Vec<Question>) + 'static) -> ObserverId {
        self.cell.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.cell.unsubscribe(id)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.cell.diagnostics()
    }
}
