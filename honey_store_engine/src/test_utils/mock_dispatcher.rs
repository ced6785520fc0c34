use std::sync::{Arc, Mutex, MutexGuard};

use hs_common::{PaymentRequest, PaymentResponse};

use crate::{DispatchError, PaymentDispatcher};

#[derive(Default)]
struct MockState {
    requests: Vec<PaymentRequest>,
    failure: Option<DispatchError>,
}

/// A [`PaymentDispatcher`] that records every request and either accepts it or fails with a preset error.
#[derive(Clone, Default)]
pub struct MockDispatcher {
    state: Arc<Mutex<MockState>>,
}

impl MockDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Makes every subsequent dispatch fail with `failure`, or succeed again if `None`.
    pub fn set_failure(&self, failure: Option<DispatchError>) {
        self.state().failure = failure;
    }

    pub fn requests(&self) -> Vec<PaymentRequest> {
        self.state().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.state().requests.len()
    }
}

impl PaymentDispatcher for MockDispatcher {
    async fn dispatch(&self, request: PaymentRequest) -> Result<PaymentResponse, DispatchError> {
        let mut state = self.state();
        state.requests.push(request);
        match &state.failure {
            Some(e) => Err(e.clone()),
            None => Ok(PaymentResponse::processing()),
        }
    }
}
