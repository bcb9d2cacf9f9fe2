// crates/ldu_core/src/solvers/smooth.rs

//! 光顺求解器：反复调用光顺器直到收敛
//!
//! 每轮执行 `n_sweeps` 次光顺后重新计算残差，迭代数按光顺次数累加。

use super::{smoothers, LduSolver, SolverArgs, SolverBase};
use crate::parallel::g_sum_mag;
use crate::performance::SolverPerformance;
use ldu_foundation::{LduResult, Scalar};

/// smoothSolver
#[derive(Debug)]
pub struct SmoothSolver<'a> {
    base: SolverBase<'a>,
}

impl<'a> SmoothSolver<'a> {
    /// 创建求解器
    pub fn new(args: SolverArgs<'a>) -> Self {
        Self {
            base: SolverBase::new(args),
        }
    }
}

impl<'a> LduSolver for SmoothSolver<'a> {
    fn solve(&mut self, psi: &mut [Scalar], source: &[Scalar]) -> LduResult<SolverPerformance> {
        let base = &self.base;
        base.check_sizes(psi, source)?;

        let matrix = base.matrix;
        let comm = base.comm;
        let controls = &base.controls;
        let n = matrix.n_cells();

        let mut perf = SolverPerformance::new(controls.smoother.as_str(), base.field_name.as_str());

        let mut w_a = vec![0.0; n];
        let mut tmp = vec![0.0; n];
        let norm_factor = base.norm_factor(psi, source, &mut w_a, &mut tmp)?;

        for ((r, s), w) in tmp.iter_mut().zip(source).zip(&w_a) {
            *r = s - w;
        }
        perf.initial_residual = g_sum_mag(comm, &tmp)? / norm_factor;
        perf.final_residual = perf.initial_residual;

        if base.needs_iteration(&mut perf) {
            let smoother = smoothers::select(&controls.smoother, matrix)?;
            let n_sweeps = controls.n_sweeps.max(1);

            let mut n_iter = 0;
            loop {
                smoother.smooth(psi, source, n_sweeps);

                matrix.residual(&mut tmp, psi, source);
                perf.final_residual = g_sum_mag(comm, &tmp)? / norm_factor;
                n_iter += n_sweeps;
                base.log_iteration(self.type_name(), n_iter, perf.final_residual);

                if base.finished(&mut perf, n_iter) {
                    break;
                }
            }
            perf.n_iterations = n_iter;
        }

        Ok(perf)
    }

    fn type_name(&self) -> &'static str {
        "smoothSolver"
    }

    fn field_name(&self) -> &str {
        &self.base.field_name
    }
}
