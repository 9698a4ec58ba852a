//! Claim guard.

use super::error::AllowanceError;
use super::types::Allowance;

/// The exact phrase a caller must supply to claim an allowance.
pub const CONFIRMATION_PHRASE: &str = "confirm";

/// Stateless guard for the irreversible unclaimed → claimed transition.
pub struct ClaimService;

impl ClaimService {
    /// Checks whether `allowance` may be claimed with `confirmation`.
    ///
    /// The phrase must equal [`CONFIRMATION_PHRASE`] exactly, with no
    /// trimming or case folding.
    ///
    /// # Errors
    ///
    /// * `AlreadyClaimed` if the allowance is already claimed
    /// * `ConfirmationMismatch` if the phrase does not match
    pub fn check(allowance: &Allowance, confirmation: &str) -> Result<(), AllowanceError> {
        if allowance.claimed {
            return Err(AllowanceError::AlreadyClaimed(allowance.id.into_inner()));
        }
        Self::check_phrase(confirmation)
    }

    /// Checks only the confirmation phrase.
    ///
    /// # Errors
    ///
    /// Returns `ConfirmationMismatch` if the phrase does not match.
    pub fn check_phrase(confirmation: &str) -> Result<(), AllowanceError> {
        if confirmation == CONFIRMATION_PHRASE {
            Ok(())
        } else {
            Err(AllowanceError::ConfirmationMismatch)
        }
    }
}
