//! Create-wallet form state: signer list and approval threshold.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("signatory index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("at least one signatory is required")]
    LastSignatory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateWalletForm {
    /// Raw address inputs, in display order. Never empty.
    pub signatories: Vec<String>,
    /// Not range-checked until submission.
    pub required_approvals: u64,
}

impl Default for CreateWalletForm {
    fn default() -> Self {
        Self {
            signatories: vec![String::new()],
            required_approvals: 1,
        }
    }
}

impl CreateWalletForm {
    pub fn add_signatory(&mut self) {
        self.signatories.push(String::new());
    }

    pub fn remove_signatory(&mut self, index: usize) -> Result<String, FormError> {
        self.check_index(index)?;
        if self.signatories.len() == 1 {
            return Err(FormError::LastSignatory);
        }
        Ok(self.signatories.remove(index))
    }

    pub fn update_signatory(&mut self, index: usize, value: impl Into<String>) -> Result<(), FormError> {
        self.check_index(index)?;
        self.signatories[index] = value.into();
        Ok(())
    }

    pub fn set_required_approvals(&mut self, approvals: u64) {
        self.required_approvals = approvals;
    }

    /// Upper bound offered by the approvals input.
    pub fn max_required_approvals(&self) -> u64 {
        self.signatories.len() as u64
    }

    pub fn can_remove_signatory(&self) -> bool {
        self.signatories.len() > 1
    }

    fn check_index(&self, index: usize) -> Result<(), FormError> {
        if index >= self.signatories.len() {
            return Err(FormError::IndexOutOfRange {
                index,
                len: self.signatories.len(),
            });
        }
        Ok(())
    }
}
