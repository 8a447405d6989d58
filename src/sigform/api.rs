//! Editing sessions: the facade frontends drive.
//!
//! An [`EditorSession`] owns the working copy of one document, the gateway
//! it persists through, and the renderer that builds views for the
//! frontend. Every mutation returns the view to show next, mirroring a
//! list page that redraws after each action.
//!
//! Persistence is deliberately explicit: nothing is written until `save`,
//! and both `save` and `reload` run their destructive step only after the
//! caller's confirm closure approves it.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::Result;
use crate::gateway::PersistenceGateway;
use crate::model::{FixedText, Record, Signature};
use crate::render::{EditorContext, Renderer};
use crate::store::RecordStore;

/// Prompt shown before overwriting the stored document.
pub const SAVE_PROMPT: &str = "Are you sure to overwrite?";

/// Prompt shown before discarding in-memory changes on reload.
pub const RELOAD_PROMPT: &str = "Are you sure to discard all changes?";

/// Outcome of a [`EditorSession::save`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStatus {
    Saved,
    Declined,
}

/// A session over the signatures document.
pub type SignatureSession<G, V> = EditorSession<Signature, G, V>;

/// A session over the fixed-form texts document.
pub type TextSession<G, V> = EditorSession<FixedText, G, V>;

pub struct EditorSession<R: Record, G: PersistenceGateway, V: Renderer<R>> {
    store: RecordStore<R>,
    gateway: G,
    renderer: V,
    path: PathBuf,
    accounts: Vec<String>,
}

impl<R: Record, G: PersistenceGateway, V: Renderer<R>> EditorSession<R, G, V> {
    /// Opens a session with an empty store. Call [`EditorSession::load`] to
    /// pull in the persisted document.
    pub fn new(gateway: G, renderer: V, accounts: Vec<String>) -> Self {
        let path = gateway.resolve(R::KIND);
        EditorSession {
            store: RecordStore::new(),
            gateway,
            renderer,
            path,
            accounts,
        }
    }

    pub fn store(&self) -> &RecordStore<R> {
        &self.store
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn accounts(&self) -> &[String] {
        &self.accounts
    }

    /// (Re)reads the persisted document into the working copy and renders
    /// the list. Missing, unreadable, and malformed documents all fall back
    /// to an empty store, so a fresh profile starts editable.
    pub fn load(&mut self) -> V::View {
        let source = match self.gateway.read(&self.path) {
            Ok(source) => source,
            Err(err) => {
                warn!(path = %self.path.display(), %err, "cannot read document, starting empty");
                None
            }
        };
        self.store = RecordStore::load(source.as_deref());
        self.render_list()
    }

    /// Persists the committed records once `confirm` approves overwriting.
    /// An open draft is not part of the document; saving mid-draft persists
    /// the last committed state.
    pub fn save(&mut self, confirm: impl FnOnce(&str) -> bool) -> Result<SaveStatus> {
        if !confirm(SAVE_PROMPT) {
            debug!(kind = %R::KIND, "save declined");
            return Ok(SaveStatus::Declined);
        }
        let contents = self.store.serialize()?;
        self.gateway.write(&self.path, &contents)?;
        info!(path = %self.path.display(), records = self.store.len(), "document saved");
        Ok(SaveStatus::Saved)
    }

    /// Replaces the working copy with the persisted document once `confirm`
    /// approves discarding everything unsaved, the open draft included.
    /// `None` when declined.
    pub fn reload(&mut self, confirm: impl FnOnce(&str) -> bool) -> Option<V::View> {
        if !confirm(RELOAD_PROMPT) {
            debug!(kind = %R::KIND, "reload declined");
            return None;
        }
        Some(self.load())
    }

    /// Opens a create draft and renders the editing form.
    pub fn create(&mut self) -> Result<V::View> {
        let draft = self.store.begin_create()?;
        let context = EditorContext {
            accounts: &self.accounts,
        };
        Ok(self.renderer.render_editor(draft.record(), &context))
    }

    /// Opens an edit draft over the record at `position` and renders the
    /// editing form.
    pub fn edit(&mut self, position: usize) -> Result<V::View> {
        let draft = self.store.begin_edit(position)?;
        let context = EditorContext {
            accounts: &self.accounts,
        };
        Ok(self.renderer.render_editor(draft.record(), &context))
    }

    /// Commits the open draft with `fields` and renders the updated list.
    pub fn commit_edit(&mut self, fields: R) -> Result<V::View> {
        self.store.commit(fields)?;
        Ok(self.render_list())
    }

    /// Cancels the open draft and renders the unchanged list.
    pub fn cancel_edit(&mut self) -> Result<V::View> {
        self.store.cancel()?;
        Ok(self.render_list())
    }

    /// Removes the record at `position`, returning it with the updated list.
    pub fn remove(&mut self, position: usize) -> Result<(R, V::View)> {
        let removed = self.store.remove(position)?;
        Ok((removed, self.render_list()))
    }

    /// Moves the record at `position` one slot towards the head. The flag
    /// is false when it was already first and nothing changed.
    pub fn up(&mut self, position: usize) -> Result<(bool, V::View)> {
        let moved = self.store.move_up(position)?;
        Ok((moved, self.render_list()))
    }

    /// Moves the record at `position` one slot towards the tail. The flag
    /// is false when it was already last and nothing changed.
    pub fn down(&mut self, position: usize) -> Result<(bool, V::View)> {
        let moved = self.store.move_down(position)?;
        Ok((moved, self.render_list()))
    }

    fn render_list(&mut self) -> V::View {
        self.renderer.render_list(self.store.records())
    }
}
