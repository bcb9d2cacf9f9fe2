// crates/ldu_core/src/solvers/mod.rs

//! 迭代线性求解器
//!
//! 求解 A * psi = source，返回 [`SolverPerformance`]。
//!
//! # 求解器类型
//!
//! - [`PcgSolver`]: 预条件共轭梯度法（仅对称矩阵）
//! - [`PBiCgStabSolver`]: 预条件双共轭梯度稳定法（对称/非对称）
//! - [`SmoothSolver`]: 以光顺器迭代（对称/非对称）
//! - [`DiagonalSolver`]: 纯对角矩阵直接求解
//!
//! # 残差归一化
//!
//! 所有求解器使用同一归一化因子：
//!
//! ```text
//! normFactor = Σ(|A·psi - sumA·ψ̄| + |source - sumA·ψ̄|) + SMALL_RESIDUAL
//! ```
//!
//! 其中 ψ̄ 为 psi 的全局平均，sumA 为行和。这样残差与 psi 的量级无关。
//!
//! # 迭代控制
//!
//! 先检查初始残差是否已收敛；否则迭代直到
//! `(converged || n >= maxIter) && n >= minIter`。
//! `maxIter = 0` 且 `minIter = 0` 时不迭代。

mod diagonal;
mod pbicgstab;
mod pcg;
mod registry;
mod smooth;
pub mod smoothers;

pub use diagonal::DiagonalSolver;
pub use pbicgstab::PBiCgStabSolver;
pub use pcg::PcgSolver;
pub use registry::{SolverFactory, SolverRegistry};
pub use smooth::SmoothSolver;

use crate::matrix::LduMatrix;
use crate::parallel::{g_average, g_sum, Communicator, SerialCommunicator};
use crate::performance::{SolverPerformance, SMALL_RESIDUAL};
use ldu_config::SolverControls;
use ldu_foundation::{LduError, LduResult, Scalar};

/// 线性求解器 trait
pub trait LduSolver {
    /// 求解，`psi` 作为初值并被更新为解
    ///
    /// # 错误
    ///
    /// 向量长度与矩阵不符、预条件器/光顺器构造失败、分区通信失败。
    /// 奇异与未收敛不是错误。
    fn solve(&mut self, psi: &mut [Scalar], source: &[Scalar]) -> LduResult<SolverPerformance>;

    /// 求解器类型名
    fn type_name(&self) -> &'static str;

    /// 场名
    fn field_name(&self) -> &str;
}

/// 求解器构造参数
#[derive(Debug, Clone, Copy)]
pub struct SolverArgs<'a> {
    /// 场名
    pub field_name: &'a str,
    /// 系数矩阵
    pub matrix: &'a LduMatrix<'a>,
    /// 控制参数
    pub controls: &'a SolverControls,
    /// 分区通信器
    pub comm: &'a dyn Communicator,
}

/// 求解器公共部分
#[derive(Debug)]
pub(crate) struct SolverBase<'a> {
    pub field_name: String,
    pub matrix: &'a LduMatrix<'a>,
    pub controls: SolverControls,
    pub comm: &'a dyn Communicator,
}

impl<'a> SolverBase<'a> {
    pub fn new(args: SolverArgs<'a>) -> Self {
        Self {
            field_name: args.field_name.to_string(),
            matrix: args.matrix,
            controls: args.controls.clone(),
            comm: args.comm,
        }
    }

    pub fn check_sizes(&self, psi: &[Scalar], source: &[Scalar]) -> LduResult<()> {
        let n = self.matrix.n_cells();
        LduError::check_size("psi", n, psi.len())?;
        LduError::check_size("source", n, source.len())
    }

    /// 归一化因子；返回时 `w_a = A·psi`，`tmp` 为 `sumA·ψ̄`
    pub fn norm_factor(
        &self,
        psi: &[Scalar],
        source: &[Scalar],
        w_a: &mut [Scalar],
        tmp: &mut [Scalar],
    ) -> LduResult<Scalar> {
        self.matrix.sum_a(tmp);
        self.matrix.amul(psi, w_a);

        let psi_ref = g_average(self.comm, psi)?;
        for t in tmp.iter_mut() {
            *t *= psi_ref;
        }

        let local: Scalar = w_a
            .iter()
            .zip(tmp.iter())
            .zip(source.iter())
            .map(|((&w, &t), &s)| (w - t).abs() + (s - t).abs())
            .sum();

        let norm_factor = g_sum(self.comm, local)? + SMALL_RESIDUAL;
        if self.controls.verbose {
            log::trace!("{}: 归一化因子 = {}", self.field_name, norm_factor);
        }
        Ok(norm_factor)
    }

    /// 是否需要进入迭代（初始残差已检查收敛）
    pub fn needs_iteration(&self, perf: &mut SolverPerformance) -> bool {
        let c = &self.controls;
        let converged = perf.check_convergence(c.tolerance, c.rel_tol, 0, c.min_iter);
        !converged && (c.max_iter > 0 || c.min_iter > 0)
    }

    /// 更新收敛状态并判断是否停止迭代
    pub fn finished(&self, perf: &mut SolverPerformance, n_iter: usize) -> bool {
        let c = &self.controls;
        let converged = perf.check_convergence(c.tolerance, c.rel_tol, n_iter, c.min_iter);
        (converged || n_iter >= c.max_iter) && n_iter >= c.min_iter
    }

    pub fn log_iteration(&self, solver: &str, n_iter: usize, residual: Scalar) {
        if self.controls.verbose {
            log::trace!(
                "{}: {} 第 {} 次迭代, 残差 = {:.6e}",
                solver,
                self.field_name,
                n_iter,
                residual
            );
        }
    }
}

/// 按控制参数选择求解器并求解（内置选择表），输出求解摘要
pub fn solve_matrix(
    matrix: &LduMatrix<'_>,
    field_name: &str,
    psi: &mut [Scalar],
    source: &[Scalar],
    controls: &SolverControls,
    comm: &dyn Communicator,
) -> LduResult<SolverPerformance> {
    SolverRegistry::default().solve(matrix, field_name, psi, source, controls, comm)
}

impl<'a> LduMatrix<'a> {
    /// 单分区求解（内置选择表）
    pub fn solve(
        &self,
        field_name: &str,
        psi: &mut [Scalar],
        source: &[Scalar],
        controls: &SolverControls,
    ) -> LduResult<SolverPerformance> {
        solve_matrix(self, field_name, psi, source, controls, &SerialCommunicator)
    }
}
