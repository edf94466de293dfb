//! Per-actor campaign counting with scoped acquisition.

use std::{cell::RefCell, collections::HashMap, rc::Rc};

use seedfall_core::ActorId;

/// Shared registry of in-flight campaigns per actor.
///
/// Counting is advisory: [`ConcurrencyLedger::acquire`] always succeeds, and
/// the trigger surface is expected to refuse a new campaign while
/// [`ConcurrencyLedger::active`] reports a nonzero count. Counting is
/// campaign-granular — one increment per session, regardless of how many
/// units the session launches.
#[derive(Clone, Debug, Default)]
pub struct ConcurrencyLedger {
    counts: Rc<RefCell<HashMap<ActorId, u32>>>,
}

impl ConcurrencyLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of campaigns currently in flight for the provided actor.
    #[must_use]
    pub fn active(&self, actor: ActorId) -> u32 {
        self.counts.borrow().get(&actor).copied().unwrap_or(0)
    }

    /// Registers one campaign for the actor and returns its scoped guard.
    ///
    /// The count decrements when the guard drops, on every exit path; entries
    /// that reach zero are removed so the ledger never grows unbounded.
    #[must_use]
    pub fn acquire(&self, actor: ActorId) -> CampaignGuard {
        {
            let mut counts = self.counts.borrow_mut();
            *counts.entry(actor).or_insert(0) += 1;
        }
        CampaignGuard {
            counts: Rc::clone(&self.counts),
            actor,
        }
    }
}

/// Scoped registration of one campaign in a [`ConcurrencyLedger`].
#[derive(Debug)]
pub struct CampaignGuard {
    counts: Rc<RefCell<HashMap<ActorId, u32>>>,
    actor: ActorId,
}

impl CampaignGuard {
    /// Actor the guarded campaign belongs to.
    #[must_use]
    pub const fn actor(&self) -> ActorId {
        self.actor
    }
}

impl Drop for CampaignGuard {
    fn drop(&mut self) {
        let mut counts = self.counts.borrow_mut();
        if let Some(count) = counts.get_mut(&self.actor) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                let _ = counts.remove(&self.actor);
            }
        }
    }
}
