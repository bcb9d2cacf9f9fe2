// crates/ldu_core/src/parallel/mod.rs

//! 分区间归约
//!
//! 求解器中所有全局量（残差范数、内积、平均值）都经由 [`Communicator`] 归约，
//! 因此同一套求解器代码既能串行运行，也能在多个分区上协同运行。
//!
//! # 约定
//!
//! - 每个分区必须以相同的顺序调用相同的归约（集合操作）
//! - [`all_reduce`] 按分区编号顺序折叠，结果在所有分区上逐位一致
//!
//! # 实现
//!
//! - [`SerialCommunicator`]: 单分区，归约为恒等操作
//! - [`ThreadCommunicator`]: 同一进程内以线程模拟多个分区

mod serial;
mod threads;

pub use serial::SerialCommunicator;
pub use threads::ThreadCommunicator;

use crate::performance::SolverPerformance;
use crate::vector_ops;
use ldu_foundation::{require, LduError, LduResult, Scalar};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// 分区间通信的类型擦除载荷
pub type Payload = Arc<dyn Any + Send + Sync>;

/// 分区通信器
pub trait Communicator: Send + Sync + fmt::Debug {
    /// 分区总数
    fn n_procs(&self) -> usize;

    /// 本分区编号（0 起）
    fn my_proc_no(&self) -> usize;

    /// 是否为主分区
    fn is_master(&self) -> bool {
        self.my_proc_no() == 0
    }

    /// 是否多分区运行
    fn is_parallel(&self) -> bool {
        self.n_procs() > 1
    }

    /// 收集所有分区的载荷，按分区编号排列
    fn all_gather(&self, value: Payload) -> LduResult<Vec<Payload>>;
}

/// 全局归约：所有分区得到 `op` 按分区编号顺序折叠的结果
pub fn all_reduce<T, F>(comm: &dyn Communicator, value: T, op: F) -> LduResult<T>
where
    T: Clone + Send + Sync + 'static,
    F: Fn(T, T) -> T,
{
    if !comm.is_parallel() {
        return Ok(value);
    }

    let gathered = comm.all_gather(Arc::new(value))?;
    let mut values = gathered.iter().enumerate().map(|(proc_no, payload)| {
        payload.downcast_ref::<T>().cloned().ok_or_else(|| {
            LduError::communication(format!("分区 {} 提交的归约数据类型不一致", proc_no))
        })
    });

    let first = require!(values.next(), LduError::communication("归约结果为空"))?;
    values.try_fold(first, |acc, v| Ok(op(acc, v?)))
}

/// 全局求和
pub fn g_sum(comm: &dyn Communicator, value: Scalar) -> LduResult<Scalar> {
    all_reduce(comm, value, |a, b| a + b)
}

/// 全局最大值
pub fn g_max(comm: &dyn Communicator, value: Scalar) -> LduResult<Scalar> {
    all_reduce(comm, value, Scalar::max)
}

/// 全局最小值
pub fn g_min(comm: &dyn Communicator, value: Scalar) -> LduResult<Scalar> {
    all_reduce(comm, value, Scalar::min)
}

/// 全局 Σ|x|
pub fn g_sum_mag(comm: &dyn Communicator, x: &[Scalar]) -> LduResult<Scalar> {
    g_sum(comm, vector_ops::sum_mag(x))
}

/// 全局 Σx²
pub fn g_sum_sqr(comm: &dyn Communicator, x: &[Scalar]) -> LduResult<Scalar> {
    g_sum(comm, vector_ops::sum_sqr(x))
}

/// 全局内积 Σx·y
pub fn g_sum_prod(comm: &dyn Communicator, x: &[Scalar], y: &[Scalar]) -> LduResult<Scalar> {
    g_sum(comm, vector_ops::sum_prod(x, y))
}

/// 全局平均值（按元素个数加权）
///
/// 所有分区合计没有元素时返回 0。
pub fn g_average(comm: &dyn Communicator, x: &[Scalar]) -> LduResult<Scalar> {
    let (sum, count) = all_reduce(
        comm,
        (vector_ops::sum(x), x.len()),
        |(s0, n0), (s1, n1)| (s0 + s1, n0 + n1),
    )?;
    Ok(if count > 0 { sum / count as Scalar } else { 0.0 })
}

/// 跨分区合并求解结果（逐字段取最大）
pub fn reduce_performance(
    comm: &dyn Communicator,
    perf: &SolverPerformance,
) -> LduResult<SolverPerformance> {
    all_reduce(comm, perf.clone(), |a, b| SolverPerformance::max(&a, &b))
}
