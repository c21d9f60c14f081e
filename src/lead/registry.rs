//! Leads accepted during the lifetime of the process.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Identity of a lead: normalised email plus phone digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LeadKey {
    email: String,
    phone: String,
}

impl LeadKey {
    pub fn new(email: &str, phone_digits: &str) -> Self {
        Self {
            email: email.trim().to_lowercase(),
            phone: phone_digits.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum LeadState {
    /// Delivery in progress
    Pending,
    Accepted(DateTime<Utc>),
}

/// In-memory record of leads. Cleared on restart.
///
/// A key is reserved before its notification is sent, so concurrent
/// submissions of the same lead see it as a duplicate.
#[derive(Debug, Default)]
pub struct LeadRegistry {
    entries: Mutex<HashMap<LeadKey, LeadState>>,
}

impl LeadRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<LeadKey, LeadState>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Reserve `key` for delivery. Returns `None` if the lead is already
    /// accepted or being delivered.
    ///
    /// Dropping the reservation without confirming releases the key.
    pub fn reserve(&self, key: LeadKey) -> Option<Reservation<'_>> {
        let mut entries = self.entries();
        if entries.contains_key(&key) {
            return None;
        }
        entries.insert(key.clone(), LeadState::Pending);

        Some(Reservation {
            registry: self,
            key: Some(key),
        })
    }

    /// Check whether a lead with this key was accepted.
    pub fn contains(&self, key: &LeadKey) -> bool {
        matches!(self.entries().get(key), Some(LeadState::Accepted(_)))
    }

    /// When a lead was accepted.
    pub fn accepted_at(&self, key: &LeadKey) -> Option<DateTime<Utc>> {
        match self.entries().get(key) {
            Some(LeadState::Accepted(at)) => Some(*at),
            _ => None,
        }
    }

    /// Number of accepted leads.
    pub fn len(&self) -> usize {
        self.entries()
            .values()
            .filter(|state| matches!(state, LeadState::Accepted(_)))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A pending lead, held while its notification is delivered.
#[derive(Debug)]
pub struct Reservation<'a> {
    registry: &'a LeadRegistry,
    key: Option<LeadKey>,
}

impl Reservation<'_> {
    /// Mark the lead as accepted.
    pub fn confirm(mut self) {
        if let Some(key) = self.key.take() {
            self.registry
                .entries()
                .insert(key, LeadState::Accepted(Utc::now()));
        }
    }
}

impl Drop for Reservation<'_> {
    fn drop(&mut self) {
        if let Some(key) = self.key.take() {
            self.registry.entries().remove(&key);
        }
    }
}
