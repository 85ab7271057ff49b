//! The USB channel the protocol runs over.
//!
//! Implementations own the device handle and whatever platform policy goes
//! with it (kernel driver detach, permissions). The protocol only needs
//! three transfers and a descriptor snapshot.

use crate::descriptor::DescriptorTree;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    /// Nothing moved within the timeout.
    #[error("transfer timed out")]
    Timeout,

    #[error("device disconnected")]
    Disconnected,

    #[error("transfer failed: {0}")]
    Failure(String),
}

impl TransferError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, TransferError::Timeout)
    }
}

pub trait UsbChannel {
    /// Snapshot of the active configuration's descriptor tree.
    fn descriptor_tree(&self) -> Result<DescriptorTree, TransferError>;

    /// Take ownership of `interface_number` for interrupt transfers.
    fn claim(&mut self, interface_number: u8) -> Result<(), TransferError>;

    /// Write `data` to the OUT endpoint, returning the number of bytes sent.
    fn send(&mut self, endpoint: u8, data: &[u8], timeout: Duration)
    -> Result<usize, TransferError>;

    /// Read up to `capacity` bytes from the IN endpoint.
    fn receive(
        &mut self,
        endpoint: u8,
        capacity: usize,
        timeout: Duration,
    ) -> Result<Vec<u8>, TransferError>;
}

impl<C: UsbChannel + ?Sized> UsbChannel for &mut C {
    fn descriptor_tree(&self) -> Result<DescriptorTree, TransferError> {
        (**self).descriptor_tree()
    }

    fn claim(&mut self, interface_number: u8) -> Result<(), TransferError> {
        (**self).claim(interface_number)
    }

    fn send(
        &mut self,
        endpoint: u8,
        data: &[u8],
        timeout: Duration,
    ) -> Result<usize, TransferError> {
        (**self).send(endpoint, data, timeout)
    }

    fn receive(
        &mut self,
        endpoint: u8,
        capacity: usize,
        timeout: Duration,
    ) -> Result<Vec<u8>, TransferError> {
        (**self).receive(endpoint, capacity, timeout)
    }
}

pub mod mock {
    //! Scripted in-memory channel for tests.

    use super::*;
    use std::collections::VecDeque;

    /// A sent frame as recorded by [`MockUsbChannel`].
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct SentFrame {
        pub endpoint: u8,
        pub data: Vec<u8>,
    }

    pub struct MockUsbChannel {
        tree: DescriptorTree,
        claimed: Vec<u8>,
        sent: Vec<SentFrame>,
        send_results: VecDeque<Result<(), TransferError>>,
        receive_queue: VecDeque<Result<Vec<u8>, TransferError>>,
        receive_calls: usize,
    }

    impl MockUsbChannel {
        pub fn new(tree: DescriptorTree) -> Self {
            Self {
                tree,
                claimed: Vec::new(),
                sent: Vec::new(),
                send_results: VecDeque::new(),
                receive_queue: VecDeque::new(),
                receive_calls: 0,
            }
        }

        /// Queue a report for the next `receive`.
        pub fn queue_report(&mut self, data: impl Into<Vec<u8>>) {
            self.receive_queue.push_back(Ok(data.into()));
        }

        /// Queue an error for the next `receive`.
        pub fn queue_receive_error(&mut self, error: TransferError) {
            self.receive_queue.push_back(Err(error));
        }

        /// Script the outcome of the next `send`. Unscripted sends succeed.
        pub fn queue_send_result(&mut self, result: Result<(), TransferError>) {
            self.send_results.push_back(result);
        }

        pub fn sent(&self) -> &[SentFrame] {
            &self.sent
        }

        pub fn claimed(&self) -> &[u8] {
            &self.claimed
        }

        pub fn receive_calls(&self) -> usize {
            self.receive_calls
        }

        pub fn pending_reports(&self) -> usize {
            self.receive_queue.len()
        }
    }

    impl UsbChannel for MockUsbChannel {
        fn descriptor_tree(&self) -> Result<DescriptorTree, TransferError> {
            Ok(self.tree.clone())
        }

        fn claim(&mut self, interface_number: u8) -> Result<(), TransferError> {
            self.claimed.push(interface_number);
            Ok(())
        }

        fn send(
            &mut self,
            endpoint: u8,
            data: &[u8],
            _timeout: Duration,
        ) -> Result<usize, TransferError> {
            self.send_results.pop_front().unwrap_or(Ok(()))?;
            self.sent.push(SentFrame {
                endpoint,
                data: data.to_vec(),
            });
            Ok(data.len())
        }

        /// An exhausted queue reports [`TransferError::Disconnected`].
        fn receive(
            &mut self,
            _endpoint: u8,
            capacity: usize,
            _timeout: Duration,
        ) -> Result<Vec<u8>, TransferError> {
            self.receive_calls += 1;
            let mut data = self
                .receive_queue
                .pop_front()
                .unwrap_or(Err(TransferError::Disconnected))?;
            data.truncate(capacity);
            Ok(data)
        }
    }
}
