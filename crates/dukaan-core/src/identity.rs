//! # Customer Identity
//!
//! The `(name, phone)` pair that joins customers to their sales.
//!
//! ## Background
//! The journal has no foreign key to the customer registry; a sale belongs to
//! whichever customer has the same trimmed name and phone. Matching is exact
//! and case-sensitive:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  "Ali Traders" / "0300-1234567"   ==   "Ali Traders" / "0300-1234567"  │
//! │  "Ali Traders" / "0300-1234567"   !=   "ali traders" / "0300-1234567"  │
//! │  "Ali Traders" / "0300-1234567"   ==   "Ali Traders " / "0300-1234567" │
//! │                                        (whitespace is trimmed away)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A case difference between a sale and the registry silently produces a
//! ghost "normal" customer. That fragility is inherent to string identity and
//! is kept for the compatibility path; newly recorded sales additionally
//! carry a surrogate `customer_id` so registered customers survive renames.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical `(name, phone)` identity of a customer.
///
/// Construction trims both parts; no case folding, no phone normalization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomerIdentity {
    pub name: String,
    pub phone: String,
}

impl CustomerIdentity {
    /// Builds an identity, trimming surrounding whitespace from both parts.
    pub fn new(name: &str, phone: &str) -> Self {
        CustomerIdentity {
            name: name.trim().to_string(),
            phone: phone.trim().to_string(),
        }
    }

    /// Returns the canonical string key, `"{name}-{phone}"`.
    ///
    /// This is the same key format the legacy system used to dedupe
    /// registered vs normal customers.
    pub fn key(&self) -> String {
        format!("{}-{}", self.name, self.phone)
    }

    /// Exact match against a raw (untrimmed) name/phone pair.
    pub fn matches(&self, name: &str, phone: &str) -> bool {
        self.name == name.trim() && self.phone == phone.trim()
    }
}

impl fmt::Display for CustomerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.phone)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trims_on_construction() {
        let identity = CustomerIdentity::new("  Ali Traders ", " 0300-1234567  ");
        assert_eq!(identity.name, "Ali Traders");
        assert_eq!(identity.phone, "0300-1234567");
        assert_eq!(identity.key(), "Ali Traders-0300-1234567");
    }

    #[test]
    fn test_exact_match_with_trim() {
        let identity = CustomerIdentity::new("Ali Traders", "0300-1234567");
        assert!(identity.matches("Ali Traders ", "0300-1234567"));
        assert!(identity.matches(" Ali Traders", " 0300-1234567 "));
    }

    /// Case differences do NOT match. A sale recorded as "ali traders"
    /// groups under a separate ghost customer - documented legacy behavior.
    #[test]
    fn test_case_sensitive_no_fold() {
        let identity = CustomerIdentity::new("Ali Traders", "0300-1234567");
        assert!(!identity.matches("ali traders", "0300-1234567"));
        assert!(!identity.matches("ALI TRADERS", "0300-1234567"));
    }

    #[test]
    fn test_phone_not_normalized() {
        let identity = CustomerIdentity::new("Ali Traders", "0300-1234567");
        assert!(!identity.matches("Ali Traders", "03001234567"));
    }
}
