//! Same-chain native transfer with explicit confirmation.
//!
//! A descriptor is only produced once the user has answered "yes"; without
//! an answer the call yields a confirmation prompt.

use crate::error::{DomainError, DomainResult};
use crate::models::{
    AddressField, AddressScheme, Confirmation, NativeTransferDescriptor, NativeTransferRequest,
    Prepared, ToolResponse,
};

/// Where a transfer stands in the confirmation flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferStep {
    /// Details shown, waiting for "yes" or "no".
    AwaitingConfirmation(String),
    Cancelled,
    Confirmed(Prepared),
}

impl From<TransferStep> for ToolResponse {
    fn from(step: TransferStep) -> Self {
        match step {
            TransferStep::AwaitingConfirmation(prompt) => ToolResponse::message(prompt),
            TransferStep::Cancelled => ToolResponse::message("Transfer cancelled by user."),
            TransferStep::Confirmed(prepared) => prepared.into(),
        }
    }
}

/// Validate a transfer and advance it according to the user's answer.
///
/// Inputs are validated before prompting, so a confirmed transfer never
/// fails on data the user already approved.
pub fn prepare_native_transfer(request: &NativeTransferRequest) -> DomainResult<TransferStep> {
    if !request.amount.is_positive() {
        return Err(DomainError::NonPositiveAmount {
            subject: "the transfer amount",
        });
    }
    let units = request.amount.to_minimal_units(request.token.decimals())?;

    AddressScheme::Ss58.require(&request.recipient, AddressField::Recipient)?;
    if let Some(sender) = &request.sender {
        AddressScheme::Ss58.require(sender, AddressField::Sender)?;
    }

    match request.confirmation {
        None => Ok(TransferStep::AwaitingConfirmation(format!(
            "You are about to transfer {} {} to {} on {}. Are you sure? Type 'yes' to confirm.",
            request.amount,
            request.token,
            request.recipient,
            request.token.network()
        ))),
        Some(Confirmation::No) => Ok(TransferStep::Cancelled),
        Some(Confirmation::Yes) => {
            let message = format!(
                "A transfer of {} {} to {} on {} has been prepared. Please sign and submit the transaction using your wallet.",
                request.amount,
                request.token,
                request.recipient,
                request.token.network()
            );
            Ok(TransferStep::Confirmed(Prepared::new(
                NativeTransferDescriptor {
                    to: request.recipient.clone(),
                    amount: units,
                    token: request.token,
                    sender_address: request.sender.clone(),
                },
                message,
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RejectionKind;
    use crate::models::{Amount, NativeToken, PreparedTransaction};

    const ALICE: &str = "5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY";

    fn request(amount: &str, confirmation: Option<Confirmation>) -> NativeTransferRequest {
        NativeTransferRequest {
            sender: None,
            recipient: ALICE.into(),
            amount: Amount::parse(amount).unwrap(),
            token: NativeToken::Dot,
            confirmation,
        }
    }

    // Test critique: jamais de descripteur sans "yes" explicite
    #[test]
    fn test_prompt_without_confirmation() {
        let step = prepare_native_transfer(&request("2", None)).unwrap();
        let TransferStep::AwaitingConfirmation(prompt) = step else {
            panic!("expected a prompt");
        };
        assert!(prompt.contains("2 DOT") && prompt.contains(ALICE));
        assert!(prompt.contains("Type 'yes' to confirm"));

        let response = ToolResponse::from(prepare_native_transfer(&request("2", None)).unwrap());
        assert!(response.tx.is_none());
        assert!(!response.is_rejected());
    }

    #[test]
    fn test_cancelled_and_confirmed() {
        let cancelled = prepare_native_transfer(&request("2", Some(Confirmation::No))).unwrap();
        assert_eq!(cancelled, TransferStep::Cancelled);

        let TransferStep::Confirmed(prepared) =
            prepare_native_transfer(&request("2", Some(Confirmation::Yes))).unwrap()
        else {
            panic!("expected a transaction");
        };
        let PreparedTransaction::NativeTransfer(tx) = prepared.tx else {
            panic!("expected a native transfer");
        };
        assert_eq!(tx.amount, "20000000000");
        assert_eq!(tx.to, ALICE);
    }

    #[test]
    fn test_invalid_input_rejected_before_prompt() {
        let err = prepare_native_transfer(&request("0", None)).unwrap_err();
        assert_eq!(err.kind(), RejectionKind::InvalidAmount);

        let mut bad = request("1", None);
        bad.recipient = "5Grw".into();
        let err = prepare_native_transfer(&bad).unwrap_err();
        assert_eq!(err.kind(), RejectionKind::InvalidAddress);
    }
}
