// crates/ldu_core/src/solvers/pcg.rs

//! 预条件共轭梯度法（PCG）
//!
//! 仅适用于对称矩阵。预条件器从对称选择表中按 `controls.preconditioner` 选取。

use super::{LduSolver, SolverArgs, SolverBase};
use crate::parallel::{g_sum_mag, g_sum_prod};
use crate::performance::SolverPerformance;
use crate::preconditioners;
use crate::vector_ops::{axpy, xpay};
use ldu_foundation::{LduResult, Scalar};

/// PCG 求解器
#[derive(Debug)]
pub struct PcgSolver<'a> {
    base: SolverBase<'a>,
}

impl<'a> PcgSolver<'a> {
    /// 创建求解器
    pub fn new(args: SolverArgs<'a>) -> Self {
        Self {
            base: SolverBase::new(args),
        }
    }
}

/// 带预条件器前缀的求解器名，例如 `DICPCG`
pub(crate) fn prefixed_name(preconditioner: &str, solver: &str) -> String {
    if preconditioner == "none" {
        solver.to_string()
    } else {
        format!("{}{}", preconditioner, solver)
    }
}

impl<'a> LduSolver for PcgSolver<'a> {
    fn solve(&mut self, psi: &mut [Scalar], source: &[Scalar]) -> LduResult<SolverPerformance> {
        let base = &self.base;
        base.check_sizes(psi, source)?;

        let matrix = base.matrix;
        let comm = base.comm;
        let n = matrix.n_cells();

        let mut perf = SolverPerformance::new(
            prefixed_name(&base.controls.preconditioner, self.type_name()),
            base.field_name.as_str(),
        );

        let mut w_a = vec![0.0; n];
        let mut p_a = vec![0.0; n];
        let norm_factor = base.norm_factor(psi, source, &mut w_a, &mut p_a)?;

        // rA = source - A·psi，w_a 中已是 A·psi
        let mut r_a: Vec<Scalar> = source.iter().zip(&w_a).map(|(s, w)| s - w).collect();

        perf.initial_residual = g_sum_mag(comm, &r_a)? / norm_factor;
        perf.final_residual = perf.initial_residual;

        if base.needs_iteration(&mut perf) {
            let precon = preconditioners::select(&base.controls.preconditioner, matrix)?;

            let mut w_ar_a: Scalar = 0.0;
            let mut n_iter = 0;
            loop {
                let w_ar_a_old = w_ar_a;

                precon.precondition(&mut w_a, &r_a);
                w_ar_a = g_sum_prod(comm, &w_a, &r_a)?;

                if n_iter == 0 {
                    p_a.copy_from_slice(&w_a);
                } else {
                    let beta = w_ar_a / w_ar_a_old;
                    xpay(&w_a, beta, &mut p_a);
                }

                // w_a <- A·pA
                matrix.amul(&p_a, &mut w_a);
                let w_ap_a = g_sum_prod(comm, &w_a, &p_a)?;

                if perf.check_singularity(w_ap_a.abs() / norm_factor) {
                    break;
                }

                let alpha = w_ar_a / w_ap_a;
                axpy(alpha, &p_a, psi);
                axpy(-alpha, &w_a, &mut r_a);

                perf.final_residual = g_sum_mag(comm, &r_a)? / norm_factor;
                n_iter += 1;
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
        "PCG"
    }

    fn field_name(&self) -> &str {
        &self.base.field_name
    }
}
