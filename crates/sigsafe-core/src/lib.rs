pub mod domain;
pub mod form;
pub mod ports;
pub mod state_machine;
pub mod submission;
pub mod validation;

pub use domain::{
    ContractWrite, CreateWalletError, Notification, NotificationKind, SubmissionOutcome,
    WalletCreationRequest, CREATE_WALLET_FUNCTION,
};
pub use form::{CreateWalletForm, FormError};
pub use ports::{FactoryAbiPort, LoaderPort, NotifierPort, PortError, WalletPort};
pub use state_machine::{
    submission_transition, StateTransition, SubmissionAction, SubmissionState,
};
pub use submission::SubmissionHandler;
pub use validation::{
    is_valid_address, normalize_signatory, validate_address, validate_form, AddressValidation,
};
