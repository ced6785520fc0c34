use std::future::Future;

use hs_common::{PaymentRequest, PaymentResponse};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("The payment gateway could not be reached. {0}")]
    Unreachable(String),
    #[error("The payment gateway did not answer within {0} seconds")]
    Timeout(u64),
    #[error("The payment gateway refused the request with status {status}. {body}")]
    Refused { status: u16, body: String },
}

/// Submits payment requests to the payment gateway.
///
/// A dispatcher only reports whether the gateway *accepted* the request. The outcome of the payment arrives later, via
/// the webhook.
pub trait PaymentDispatcher: Clone + Send + Sync + 'static {
    fn dispatch(&self, request: PaymentRequest) -> impl Future<Output = Result<PaymentResponse, DispatchError>> + Send;
}
