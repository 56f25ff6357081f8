// src/gigs/lifecycle.rs
//! Gig lifecycle state machine.
//!
//! A gig moves `available -> claimed -> submitted -> approved`; payment
//! flips `unpaid -> paid` only once the gig is approved. This module is
//! the single authority on which moves exist; the conditional writes in
//! `queries` enforce them against concurrent callers.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GigStatus {
    Available,
    Claimed,
    Submitted,
    Approved,
}

impl GigStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GigStatus::Available => "available",
            GigStatus::Claimed => "claimed",
            GigStatus::Submitted => "submitted",
            GigStatus::Approved => "approved",
        }
    }

    pub fn parse(s: &str) -> Option<GigStatus> {
        match s {
            "available" => Some(GigStatus::Available),
            "claimed" => Some(GigStatus::Claimed),
            "submitted" => Some(GigStatus::Submitted),
            "approved" => Some(GigStatus::Approved),
            _ => None,
        }
    }

    /// Whether a writer currently holds this gig exclusively.
    /// `claimed_by` must be non-null exactly in these states.
    pub fn is_assigned(&self) -> bool {
        !matches!(self, GigStatus::Available)
    }
}

/// Legal status moves. Everything else is an out-of-order request.
pub fn can_transition(from: GigStatus, to: GigStatus) -> bool {
    matches!(
        (from, to),
        (GigStatus::Available, GigStatus::Claimed)
            | (GigStatus::Claimed, GigStatus::Submitted)
            | (GigStatus::Submitted, GigStatus::Approved)
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Unpaid,
    Paid,
}

impl PaymentStatus {
    pub fn parse(s: &str) -> Option<PaymentStatus> {
        match s {
            "unpaid" => Some(PaymentStatus::Unpaid),
            "paid" => Some(PaymentStatus::Paid),
            _ => None,
        }
    }
}
