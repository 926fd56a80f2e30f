//! Test double for [`LandmarkProvider`].
//!
//! [`MockProvider`] is handed to the code under test; the paired
//! [`MockHandle`] stays with the test to deliver results at a chosen moment,
//! script failures and inspect what was submitted.
//!
//! ```rust,ignore
//! let (provider, handle) = MockProvider::new();
//! // ... session.initialize(Box::new(provider), options).await ...
//! handle.deliver(vec![hand]);
//! ```

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::gesture::Hand;
use crate::pipeline::sequencer::{RequestId, ResultSink};

use super::{Frame, LandmarkProvider, ProviderError, ProviderOptions};

#[derive(Default)]
struct MockState {
    sink: Option<ResultSink>,
    configured: Option<ProviderOptions>,
    configure_error: Option<String>,
    fail_next_submit: bool,
    auto_reply: Option<Vec<Hand>>,
    submitted: Vec<(u32, u32)>,
    sink_registrations: usize,
    closed: bool,
}

/// Provider half, owned by the code under test.
pub struct MockProvider {
    state: Arc<Mutex<MockState>>,
}

/// Test half, sharing state with its [`MockProvider`].
#[derive(Clone)]
pub struct MockHandle {
    state: Arc<Mutex<MockState>>,
}

impl MockProvider {
    pub fn new() -> (Self, MockHandle) {
        let state = Arc::new(Mutex::new(MockState::default()));
        (
            Self {
                state: Arc::clone(&state),
            },
            MockHandle { state },
        )
    }

    /// A provider whose `configure` always fails with `message`.
    pub fn failing_configure(message: &str) -> (Self, MockHandle) {
        let (provider, handle) = Self::new();
        handle.state.lock().unwrap().configure_error = Some(message.to_string());
        (provider, handle)
    }
}

#[async_trait]
impl LandmarkProvider for MockProvider {
    fn register_sink(&mut self, sink: ResultSink) {
        let mut st = self.state.lock().unwrap();
        st.sink = Some(sink);
        st.sink_registrations += 1;
    }

    async fn configure(&mut self, options: &ProviderOptions) -> Result<(), ProviderError> {
        let mut st = self.state.lock().unwrap();
        if let Some(message) = &st.configure_error {
            return Err(ProviderError::Configure(message.clone()));
        }
        st.configured = Some(options.clone());
        Ok(())
    }

    fn submit_frame(&mut self, frame: &Frame) -> Result<(), ProviderError> {
        let reply = {
            let mut st = self.state.lock().unwrap();
            if st.closed {
                return Err(ProviderError::Closed);
            }
            if std::mem::take(&mut st.fail_next_submit) {
                return Err(ProviderError::Submit("scripted failure".into()));
            }
            st.submitted.push((frame.width(), frame.height()));
            st.auto_reply.clone().zip(st.sink.clone())
        };

        if let Some((hands, sink)) = reply {
            sink.deliver(hands);
        }
        Ok(())
    }

    fn close(&mut self) {
        self.state.lock().unwrap().closed = true;
    }
}

impl MockHandle {
    /// Deliver a result through the registered sink.
    pub fn deliver(&self, hands: Vec<Hand>) -> Option<RequestId> {
        let sink = self.state.lock().unwrap().sink.clone();
        sink.and_then(|s| s.deliver(hands))
    }

    /// Answer every future submission immediately with `hands`.
    pub fn set_auto_reply(&self, hands: Option<Vec<Hand>>) {
        self.state.lock().unwrap().auto_reply = hands;
    }

    pub fn fail_next_submit(&self) {
        self.state.lock().unwrap().fail_next_submit = true;
    }

    /// Number of frames accepted by the provider.
    pub fn submitted(&self) -> usize {
        self.state.lock().unwrap().submitted.len()
    }

    pub fn configured(&self) -> Option<ProviderOptions> {
        self.state.lock().unwrap().configured.clone()
    }

    pub fn sink_registrations(&self) -> usize {
        self.state.lock().unwrap().sink_registrations
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().unwrap().closed
    }
}
