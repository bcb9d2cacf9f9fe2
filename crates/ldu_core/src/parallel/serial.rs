// crates/ldu_core/src/parallel/serial.rs

use super::{Communicator, Payload};
use ldu_foundation::LduResult;

/// 单分区通信器
#[derive(Debug, Clone, Copy, Default)]
pub struct SerialCommunicator;

impl Communicator for SerialCommunicator {
    fn n_procs(&self) -> usize {
        1
    }

    fn my_proc_no(&self) -> usize {
        0
    }

    fn all_gather(&self, value: Payload) -> LduResult<Vec<Payload>> {
        Ok(vec![value])
    }
}
