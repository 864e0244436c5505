use std::sync::atomic::{AtomicU64, Ordering};

/// Ticket handed out for one issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

/// Last-issued-wins filter for asynchronous results.
///
/// Every request takes a ticket; a result may be applied only while its
/// ticket is still the most recent one. Older results are dropped no matter
/// when they arrive.
#[derive(Debug, Default)]
pub struct RequestGate {
    issued: AtomicU64,
    settled: AtomicU64,
}

impl RequestGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Supersede everything issued so far and return the new latest ticket.
    pub fn issue(&self) -> Ticket {
        Ticket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.issued.load(Ordering::SeqCst) == ticket.0
    }

    /// Mark `ticket` as resolved if it is still current.
    ///
    /// Returns whether the caller may apply its result.
    pub fn settle(&self, ticket: Ticket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.settled.fetch_max(ticket.0, Ordering::SeqCst);
        true
    }

    /// True while the latest ticket has not been settled.
    pub fn is_pending(&self) -> bool {
        self.settled.load(Ordering::SeqCst) < self.issued.load(Ordering::SeqCst)
    }

    /// Drop interest in the latest request without issuing a new one.
    pub fn cancel(&self) {
        let ticket = self.issue();
        self.settled.fetch_max(ticket.0, Ordering::SeqCst);
    }
}
