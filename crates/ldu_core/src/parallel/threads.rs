// crates/ldu_core/src/parallel/threads.rs

//! 线程分区通信器
//!
//! 每个分区一个线程，通过共享槽位与屏障交换载荷：
//!
//! 1. 写入本分区槽位
//! 2. 屏障：所有分区写入完成
//! 3. 读取全部槽位
//! 4. 屏障：所有分区读取完成
//! 5. 清空本分区槽位
//!
//! 第二个屏障保证下一轮写入不会覆盖尚未读取的数据。

use super::{Communicator, Payload};
use ldu_foundation::{LduError, LduResult};
use parking_lot::Mutex;
use std::fmt;
use std::sync::{Arc, Barrier};

struct Shared {
    slots: Mutex<Vec<Option<Payload>>>,
    barrier: Barrier,
}

/// 线程分区通信器
#[derive(Clone)]
pub struct ThreadCommunicator {
    proc_no: usize,
    n_procs: usize,
    shared: Arc<Shared>,
}

impl ThreadCommunicator {
    /// 创建 `n_procs` 个相互连接的通信器，第 i 个的编号为 i
    ///
    /// 每个通信器应移交给各自的线程使用。
    pub fn world(n_procs: usize) -> Vec<Self> {
        let shared = Arc::new(Shared {
            slots: Mutex::new(vec![None; n_procs]),
            barrier: Barrier::new(n_procs),
        });
        (0..n_procs)
            .map(|proc_no| Self {
                proc_no,
                n_procs,
                shared: Arc::clone(&shared),
            })
            .collect()
    }
}

impl fmt::Debug for ThreadCommunicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThreadCommunicator")
            .field("proc_no", &self.proc_no)
            .field("n_procs", &self.n_procs)
            .finish()
    }
}

impl Communicator for ThreadCommunicator {
    fn n_procs(&self) -> usize {
        self.n_procs
    }

    fn my_proc_no(&self) -> usize {
        self.proc_no
    }

    fn all_gather(&self, value: Payload) -> LduResult<Vec<Payload>> {
        self.shared.slots.lock()[self.proc_no] = Some(value);
        self.shared.barrier.wait();

        let gathered: LduResult<Vec<Payload>> = self
            .shared
            .slots
            .lock()
            .iter()
            .enumerate()
            .map(|(proc_no, slot)| {
                slot.clone().ok_or_else(|| {
                    LduError::communication(format!("分区 {} 未提交数据", proc_no))
                })
            })
            .collect();

        self.shared.barrier.wait();
        self.shared.slots.lock()[self.proc_no] = None;
        gathered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_world_numbering() {
        let comms = ThreadCommunicator::world(4);
        assert_eq!(comms.len(), 4);
        for (i, c) in comms.iter().enumerate() {
            assert_eq!(c.my_proc_no(), i);
            assert_eq!(c.n_procs(), 4);
            assert_eq!(c.is_master(), i == 0);
            assert!(c.is_parallel());
        }
    }

    #[test]
    fn test_single_thread_world_is_serial() {
        let comms = ThreadCommunicator::world(1);
        assert!(!comms[0].is_parallel());
        let out = comms[0].all_gather(Arc::new(7usize)).unwrap();
        assert_eq!(out[0].downcast_ref::<usize>(), Some(&7));
    }

    #[test]
    fn test_all_gather_order_and_reuse() {
        let handles: Vec<_> = ThreadCommunicator::world(3)
            .into_iter()
            .map(|comm| {
                std::thread::spawn(move || {
                    let mut rounds = Vec::new();
                    for round in 0..5usize {
                        let v = comm.my_proc_no() * 10 + round;
                        let out = comm.all_gather(Arc::new(v)).unwrap();
                        rounds.push(
                            out.iter()
                                .map(|p| *p.downcast_ref::<usize>().unwrap())
                                .collect::<Vec<_>>(),
                        );
                    }
                    rounds
                })
            })
            .collect();

        for h in handles {
            let rounds = h.join().unwrap();
            for (round, values) in rounds.iter().enumerate() {
                assert_eq!(values, &vec![round, 10 + round, 20 + round]);
            }
        }
    }
}
