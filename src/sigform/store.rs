//! In-memory record store with draft/commit editing.
//!
//! The store is the single working copy of one profile document. Callers
//! mutate it through positional operations (1-based, display order) and a
//! one-at-a-time draft protocol:
//!
//! - `begin_create` / `begin_edit` open a draft;
//! - `commit` validates replacement fields and folds them in;
//! - `cancel` drops the draft without a trace.
//!
//! While a draft is open, structural operations that would move or remove
//! the draft's target are refused, so a committed edit always lands on the
//! record the user was looking at. Nothing here touches disk; persistence
//! is the caller's explicit `serialize` + gateway write.

use tracing::{debug, warn};

use crate::error::{Result, SigformError};
use crate::model::{Record, Signature};
use crate::xml;

/// Target of an open draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftTarget {
    /// Commit appends a new record at the tail.
    New,
    /// Commit replaces the record at this 1-based position.
    Existing(usize),
}

/// An open editing transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct Draft<R> {
    target: DraftTarget,
    record: R,
}

impl<R> Draft<R> {
    pub fn target(&self) -> DraftTarget {
        self.target
    }

    /// The working copy backing the editor form: blank for a create draft,
    /// a snapshot of the target record for an edit draft.
    pub fn record(&self) -> &R {
        &self.record
    }
}

/// Ordered collection of records plus at most one open draft.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordStore<R: Record> {
    records: Vec<R>,
    draft: Option<Draft<R>>,
}

impl<R: Record> Default for RecordStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> RecordStore<R> {
    pub fn new() -> Self {
        RecordStore {
            records: Vec::new(),
            draft: None,
        }
    }

    pub fn from_records(records: Vec<R>) -> Self {
        RecordStore {
            records,
            draft: None,
        }
    }

    /// Builds a store from an optional document source. A missing document
    /// is an ordinary first run and a malformed one is discarded with a
    /// warning; both yield an empty, fully usable store.
    pub fn load(source: Option<&str>) -> Self {
        match source {
            None => {
                debug!(kind = %R::KIND, "no document found, starting empty");
                Self::new()
            }
            Some(text) => match Self::from_xml(text) {
                Ok(store) => store,
                Err(err) => {
                    warn!(kind = %R::KIND, %err, "discarding unreadable document");
                    Self::new()
                }
            },
        }
    }

    /// Strict parse. Unlike [`RecordStore::load`] this surfaces the error.
    pub fn from_xml(source: &str) -> Result<Self> {
        Ok(Self::from_records(xml::read_document(source)?))
    }

    /// Serializes the committed records. An open draft is not part of the
    /// document and never leaks into the output.
    pub fn serialize(&self) -> Result<String> {
        xml::write_document(&self.records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    /// Record at a 1-based position.
    pub fn get(&self, position: usize) -> Option<&R> {
        position
            .checked_sub(1)
            .and_then(|idx| self.records.get(idx))
    }

    pub fn draft(&self) -> Option<&Draft<R>> {
        self.draft.as_ref()
    }

    /// Opens a draft for a new record.
    pub fn begin_create(&mut self) -> Result<&Draft<R>> {
        if self.draft.is_some() {
            return Err(SigformError::DraftAlreadyOpen);
        }
        Ok(self.draft.insert(Draft {
            target: DraftTarget::New,
            record: R::blank(),
        }))
    }

    /// Opens a draft over the record at `position`.
    pub fn begin_edit(&mut self, position: usize) -> Result<&Draft<R>> {
        if self.draft.is_some() {
            return Err(SigformError::DraftAlreadyOpen);
        }
        let record = self
            .get(position)
            .cloned()
            .ok_or_else(|| self.no_such(position))?;
        Ok(self.draft.insert(Draft {
            target: DraftTarget::Existing(position),
            record,
        }))
    }

    /// Commits the open draft with `fields` as the record's new contents,
    /// returning the committed record's position. Validation failure leaves
    /// the draft open and the records untouched.
    pub fn commit(&mut self, fields: R) -> Result<usize> {
        let target = match &self.draft {
            Some(draft) => draft.target,
            None => return Err(SigformError::NoOpenDraft),
        };
        fields.validate()?;
        let position = match target {
            DraftTarget::New => {
                self.records.push(fields);
                self.records.len()
            }
            DraftTarget::Existing(position) => {
                self.records[position - 1] = fields;
                position
            }
        };
        self.draft = None;
        Ok(position)
    }

    /// Drops the open draft. The records are exactly as they were before
    /// the draft opened.
    pub fn cancel(&mut self) -> Result<()> {
        match self.draft.take() {
            Some(_) => Ok(()),
            None => Err(SigformError::NoOpenDraft),
        }
    }

    /// Removes and returns the record at `position`.
    pub fn remove(&mut self, position: usize) -> Result<R> {
        self.check_position(position)?;
        if let Some(draft) = &self.draft {
            let blocked = match draft.target() {
                DraftTarget::New => true,
                // Removal shifts every later record and the target itself.
                DraftTarget::Existing(target) => target >= position,
            };
            if blocked {
                return Err(SigformError::DraftOpen);
            }
        }
        Ok(self.records.remove(position - 1))
    }

    /// Swaps the record at `position` with its predecessor. `Ok(false)`
    /// when it is already first.
    pub fn move_up(&mut self, position: usize) -> Result<bool> {
        self.check_position(position)?;
        if position == 1 {
            return Ok(false);
        }
        self.check_swap(position - 1, position)?;
        self.records.swap(position - 2, position - 1);
        Ok(true)
    }

    /// Swaps the record at `position` with its successor. `Ok(false)` when
    /// it is already last.
    pub fn move_down(&mut self, position: usize) -> Result<bool> {
        self.check_position(position)?;
        if position == self.records.len() {
            return Ok(false);
        }
        self.check_swap(position, position + 1)?;
        self.records.swap(position - 1, position);
        Ok(true)
    }

    fn check_position(&self, position: usize) -> Result<()> {
        if position == 0 || position > self.records.len() {
            return Err(self.no_such(position));
        }
        Ok(())
    }

    /// Refuses a swap of positions `a` and `b` while a draft points at
    /// either, or while a create draft holds the tail slot.
    fn check_swap(&self, a: usize, b: usize) -> Result<()> {
        match &self.draft {
            None => Ok(()),
            Some(draft) => match draft.target() {
                DraftTarget::New => Err(SigformError::DraftOpen),
                DraftTarget::Existing(target) if target == a || target == b => {
                    Err(SigformError::DraftOpen)
                }
                DraftTarget::Existing(_) => Ok(()),
            },
        }
    }

    fn no_such(&self, position: usize) -> SigformError {
        SigformError::NoSuchRecord {
            position,
            len: self.records.len(),
        }
    }
}

impl RecordStore<Signature> {
    /// All signatures applying to `account`, in document order.
    pub fn matching(&self, account: &str) -> Vec<&Signature> {
        self.records
            .iter()
            .filter(|sig| sig.matches_account(account))
            .collect()
    }

    /// First signature for `account` with the given name.
    pub fn find(&self, account: &str, name: &str) -> Option<&Signature> {
        self.records
            .iter()
            .find(|sig| sig.matches_account(account) && sig.name == name)
    }

    /// First default signature applying to `account`.
    pub fn default_for(&self, account: &str) -> Option<&Signature> {
        self.records
            .iter()
            .find(|sig| sig.matches_account(account) && sig.is_default)
    }
}
