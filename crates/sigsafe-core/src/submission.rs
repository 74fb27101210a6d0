use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use alloy::primitives::{Address, B256, U256};

use crate::domain::{
    ContractWrite, CreateWalletError, Notification, SubmissionOutcome, WalletCreationRequest,
    CREATE_WALLET_FUNCTION,
};
use crate::form::CreateWalletForm;
use crate::ports::{FactoryAbiPort, LoaderPort, NotifierPort, PortError, WalletPort};
use crate::state_machine::{submission_transition, SubmissionAction, SubmissionState};
use crate::validation::{normalize_signatory, validate_form};

const TITLE_VALIDATION: &str = "Validation Error";
const TITLE_CONNECTION: &str = "Connection Required";
const TITLE_CREATED: &str = "Wallet Created";
const TITLE_CREATION_ERROR: &str = "Creation Error";
const MSG_CREATED: &str = "Multi-signature wallet created successfully!";
const MSG_CREATION_FAILED: &str = "Failed to create wallet. Please try again.";

/// Drives one `createWallet` write per submit, at most one at a time.
///
/// Synchronous shells call [`SubmissionHandler::submit`]. Shells whose wallet
/// call is asynchronous call [`SubmissionHandler::begin`], perform the write
/// themselves and hand the result to [`SubmissionHandler::complete`].
pub struct SubmissionHandler<W, A, N, L>
where
    W: WalletPort,
    A: FactoryAbiPort,
    N: NotifierPort,
    L: LoaderPort,
{
    pub wallet: W,
    pub abi: A,
    pub notifier: N,
    pub loader: L,
    factory_address: Address,
    in_flight: AtomicBool,
    state: Mutex<SubmissionState>,
}

impl<W, A, N, L> SubmissionHandler<W, A, N, L>
where
    W: WalletPort,
    A: FactoryAbiPort,
    N: NotifierPort,
    L: LoaderPort,
{
    pub fn new(wallet: W, abi: A, notifier: N, loader: L, factory_address: Address) -> Self {
        Self {
            wallet,
            abi,
            notifier,
            loader,
            factory_address,
            in_flight: AtomicBool::new(false),
            state: Mutex::new(SubmissionState::Idle),
        }
    }

    pub fn factory_address(&self) -> Address {
        self.factory_address
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn state(&self) -> SubmissionState {
        match self.state.lock() {
            Ok(g) => *g,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    pub fn submit(&self, form: &CreateWalletForm) -> SubmissionOutcome {
        match self.begin(form) {
            Ok(call) => {
                let result = self.wallet.write_contract(&call);
                self.complete(result)
            }
            Err(outcome) => outcome,
        }
    }

    /// Runs every check that precedes the wallet call. On success loading has
    /// started and the caller owns the in-flight slot until `complete`.
    pub fn begin(&self, form: &CreateWalletForm) -> Result<ContractWrite, SubmissionOutcome> {
        if self.is_in_flight() {
            tracing::warn!("create wallet ignored: submission already in flight");
            return Err(SubmissionOutcome::Blocked(CreateWalletError::InFlight));
        }

        if let Err(err) = validate_form(form) {
            tracing::warn!(error = %err, "create wallet blocked by validation");
            self.notifier
                .show_message(Notification::error(TITLE_VALIDATION, err.to_string()));
            return Err(SubmissionOutcome::Blocked(err));
        }

        let account = match self.wallet.account() {
            Ok(Some(account)) => account,
            Ok(None) => {
                let err = CreateWalletError::NotConnected;
                tracing::warn!("create wallet blocked: no connected account");
                self.notifier
                    .show_message(Notification::error(TITLE_CONNECTION, err.to_string()));
                return Err(SubmissionOutcome::Blocked(err));
            }
            Err(e) => {
                tracing::warn!(error = %e, "create wallet blocked: account lookup failed");
                self.notifier.show_message(
                    Notification::error(TITLE_CONNECTION, CreateWalletError::NotConnected.to_string())
                        .with_detail(e.to_string()),
                );
                return Err(SubmissionOutcome::Blocked(CreateWalletError::Port(e)));
            }
        };

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::warn!("create wallet ignored: submission already in flight");
            return Err(SubmissionOutcome::Blocked(CreateWalletError::InFlight));
        }
        self.advance(SubmissionAction::Begin);
        self.loader.start_loading();

        match self.prepare(form, account) {
            Ok(call) => {
                tracing::info!(
                    factory = %call.to,
                    from = %call.from,
                    signatories = call.request.signatories.len(),
                    required_approvals = %call.request.required_approvals,
                    "submitting createWallet"
                );
                Ok(call)
            }
            Err(err) => {
                self.report_failure(&err);
                Err(SubmissionOutcome::Failed(err))
            }
        }
    }

    /// Settles a submission started by `begin`. Every branch stops loading
    /// and notifies exactly once.
    pub fn complete(&self, result: Result<Option<B256>, PortError>) -> SubmissionOutcome {
        match result {
            Ok(Some(tx_hash)) => {
                self.advance(SubmissionAction::Confirmed);
                self.release();
                tracing::info!(%tx_hash, "multisig wallet created");
                self.notifier
                    .show_message(Notification::success(TITLE_CREATED, MSG_CREATED));
                SubmissionOutcome::Created { tx_hash }
            }
            Ok(None) => {
                self.report_failure(&CreateWalletError::EmptyResult);
                SubmissionOutcome::NoResult
            }
            Err(e) => {
                let err = CreateWalletError::Port(e);
                self.report_failure(&err);
                SubmissionOutcome::Failed(err)
            }
        }
    }

    fn prepare(
        &self,
        form: &CreateWalletForm,
        account: Address,
    ) -> Result<ContractWrite, CreateWalletError> {
        let signatories = form
            .signatories
            .iter()
            .map(String::as_str)
            .map(normalize_signatory)
            .collect::<Result<Vec<_>, _>>()?;
        let request = WalletCreationRequest {
            required_approvals: U256::from(form.required_approvals),
            signatories,
        };
        let data = self.abi.encode_create_wallet(&request)?;
        Ok(ContractWrite {
            from: account,
            to: self.factory_address,
            function: CREATE_WALLET_FUNCTION.to_owned(),
            data,
            request,
        })
    }

    /// Returns a settled submission to `Idle` once its result has been
    /// acknowledged. A submission still in flight is left alone.
    pub fn reset(&self) {
        if self.is_in_flight() {
            tracing::debug!("reset ignored: submission in flight");
            return;
        }
        self.advance(SubmissionAction::Reset);
    }

    fn report_failure(&self, err: &CreateWalletError) {
        self.advance(SubmissionAction::Errored);
        self.release();
        tracing::error!(error = %err, "create wallet failed");
        self.notifier.show_message(
            Notification::error(TITLE_CREATION_ERROR, MSG_CREATION_FAILED)
                .with_detail(err.to_string()),
        );
    }

    fn release(&self) {
        self.loader.stop_loading();
        self.in_flight.store(false, Ordering::SeqCst);
    }

    fn advance(&self, action: SubmissionAction) {
        let mut guard = match self.state.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        match submission_transition(*guard, action) {
            Ok((next, transition)) => {
                tracing::debug!(
                    from = ?transition.from,
                    to = ?transition.to,
                    reason = transition.reason,
                    "submission transition"
                );
                *guard = next;
            }
            Err(e) => tracing::warn!(error = %e, "submission transition rejected"),
        }
    }
}
