// crates/ldu_core/src/solvers/pbicgstab.rs

//! 预条件双共轭梯度稳定法（PBiCGStab）
//!
//! 适用于对称与非对称矩阵。每次迭代做两次矩阵乘法与两次预条件，
//! 中间残差 sA 已满足容差时提前结束（只计一次迭代）。

use super::pcg::prefixed_name;
use super::{LduSolver, SolverArgs, SolverBase};
use crate::parallel::{g_sum_mag, g_sum_prod, g_sum_sqr};
use crate::performance::SolverPerformance;
use crate::preconditioners;
use crate::vector_ops::axpy;
use ldu_foundation::{LduResult, Scalar};

/// PBiCGStab 求解器
#[derive(Debug)]
pub struct PBiCgStabSolver<'a> {
    base: SolverBase<'a>,
}

impl<'a> PBiCgStabSolver<'a> {
    /// 创建求解器
    pub fn new(args: SolverArgs<'a>) -> Self {
        Self {
            base: SolverBase::new(args),
        }
    }
}

impl<'a> LduSolver for PBiCgStabSolver<'a> {
    fn solve(&mut self, psi: &mut [Scalar], source: &[Scalar]) -> LduResult<SolverPerformance> {
        let base = &self.base;
        base.check_sizes(psi, source)?;

        let matrix = base.matrix;
        let comm = base.comm;
        let controls = &base.controls;
        let n = matrix.n_cells();

        let mut perf = SolverPerformance::new(
            prefixed_name(&controls.preconditioner, self.type_name()),
            base.field_name.as_str(),
        );

        let mut y_a = vec![0.0; n];
        let mut p_a = vec![0.0; n];
        let norm_factor = base.norm_factor(psi, source, &mut y_a, &mut p_a)?;

        let mut r_a: Vec<Scalar> = source.iter().zip(&y_a).map(|(s, y)| s - y).collect();

        perf.initial_residual = g_sum_mag(comm, &r_a)? / norm_factor;
        perf.final_residual = perf.initial_residual;

        if base.needs_iteration(&mut perf) {
            let precon = preconditioners::select(&controls.preconditioner, matrix)?;

            // 影子残差，整个迭代过程中保持不变
            let r_a0 = r_a.clone();
            let mut ay_a = vec![0.0; n];
            let mut s_a = vec![0.0; n];
            let mut z_a = vec![0.0; n];
            let mut t_a = vec![0.0; n];

            let mut r_a0r_a: Scalar = 0.0;
            let mut alpha: Scalar = 0.0;
            let mut omega: Scalar = 0.0;
            let mut n_iter = 0;

            loop {
                let r_a0r_a_old = r_a0r_a;
                r_a0r_a = g_sum_prod(comm, &r_a0, &r_a)?;

                if perf.check_singularity(r_a0r_a.abs()) {
                    break;
                }

                if n_iter == 0 {
                    p_a.copy_from_slice(&r_a);
                } else {
                    if perf.check_singularity(omega.abs()) {
                        break;
                    }
                    let beta = (r_a0r_a / r_a0r_a_old) * (alpha / omega);
                    for i in 0..n {
                        p_a[i] = r_a[i] + beta * (p_a[i] - omega * ay_a[i]);
                    }
                }

                precon.precondition(&mut y_a, &p_a);
                matrix.amul(&y_a, &mut ay_a);

                let r_a0ay_a = g_sum_prod(comm, &r_a0, &ay_a)?;
                if perf.check_singularity(r_a0ay_a.abs() / norm_factor) {
                    break;
                }
                alpha = r_a0r_a / r_a0ay_a;

                for i in 0..n {
                    s_a[i] = r_a[i] - alpha * ay_a[i];
                }

                perf.final_residual = g_sum_mag(comm, &s_a)? / norm_factor;
                if base.finished(&mut perf, n_iter + 1) && perf.converged {
                    axpy(alpha, &y_a, psi);
                    n_iter += 1;
                    base.log_iteration(self.type_name(), n_iter, perf.final_residual);
                    break;
                }

                precon.precondition(&mut z_a, &s_a);
                matrix.amul(&z_a, &mut t_a);

                let t_at_a = g_sum_sqr(comm, &t_a)?;
                if perf.check_singularity(t_at_a) {
                    // sA 无法进一步修正，接受半步更新
                    axpy(alpha, &y_a, psi);
                    r_a.copy_from_slice(&s_a);
                    n_iter += 1;
                    break;
                }
                omega = g_sum_prod(comm, &t_a, &s_a)? / t_at_a;

                for i in 0..n {
                    psi[i] += alpha * y_a[i] + omega * z_a[i];
                    r_a[i] = s_a[i] - omega * t_a[i];
                }

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
        "PBiCGStab"
    }

    fn field_name(&self) -> &str {
        &self.base.field_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LduAddressing, LduMatrix, SerialCommunicator};
    use ldu_config::SolverControls;

    /// 一维对流扩散（迎风），非对称
    fn convection_diffusion(addr: &LduAddressing) -> LduMatrix<'_> {
        let mut m = LduMatrix::new(addr);
        let (lower, upper) = m.lower_upper_mut();
        lower.fill(-1.5);
        upper.fill(-1.0);
        m.neg_sum_diag();
        let n = addr.n_cells();
        m.diag_mut()[0] += 2.0;
        m.diag_mut()[n - 1] += 2.0;
        m
    }

    fn solve_with(m: &LduMatrix<'_>, precon: &str, source: &[Scalar]) -> (Vec<Scalar>, SolverPerformance) {
        let controls = SolverControls::new("PBiCGStab")
            .with_preconditioner(precon)
            .with_tolerance(1e-12, 0.0);
        let comm = SerialCommunicator;
        let mut solver = PBiCgStabSolver::new(SolverArgs {
            field_name: "T",
            matrix: m,
            controls: &controls,
            comm: &comm,
        });
        let mut psi = vec![0.0; m.n_cells()];
        let perf = solver.solve(&mut psi, source).unwrap();
        (psi, perf)
    }

    #[test]
    fn test_solves_asymmetric_system() {
        let n = 25;
        let addr = LduAddressing::from_pairs(n, (0..n - 1).map(|i| (i, i + 1))).unwrap();
        let m = convection_diffusion(&addr);
        assert!(m.is_asymmetric());

        let exact: Vec<Scalar> = (0..n).map(|i| 1.0 + 0.1 * i as Scalar).collect();
        let mut source = vec![0.0; n];
        m.amul(&exact, &mut source);

        for precon in ["none", "diagonal", "DILU"] {
            let (psi, perf) = solve_with(&m, precon, &source);
            assert!(perf.converged, "{}: {}", precon, perf);
            assert_eq!(perf.solver_name, prefixed_name(precon, "PBiCGStab"));
            for (a, b) in psi.iter().zip(&exact) {
                assert!((a - b).abs() < 1e-8, "{}: {} vs {}", precon, a, b);
            }
        }
    }

    #[test]
    fn test_unpreconditioned_runs_several_iterations() {
        // 多次迭代时 beta 依赖上一轮的 alpha 与 omega
        let n = 40;
        let addr = LduAddressing::from_pairs(n, (0..n - 1).map(|i| (i, i + 1))).unwrap();
        let m = convection_diffusion(&addr);
        let source: Vec<Scalar> = (0..n).map(|i| (i % 3) as Scalar - 1.0).collect();

        let (psi, perf) = solve_with(&m, "none", &source);
        assert!(perf.converged, "{}", perf);
        assert!(perf.n_iterations > 1);
        let r = m.residual_field(&psi, &source);
        assert!(r.iter().all(|v| v.abs() < 1e-9));
    }

    #[test]
    fn test_solves_symmetric_system() {
        let n = 10;
        let addr = LduAddressing::from_pairs(n, (0..n - 1).map(|i| (i, i + 1))).unwrap();
        let mut m = LduMatrix::new(&addr);
        m.upper_mut().fill(-1.0);
        m.neg_sum_diag();
        m.diag_mut().iter_mut().for_each(|d| *d += 0.5);

        let source = vec![1.0; n];
        let (psi, perf) = solve_with(&m, "DIC", &source);
        assert!(perf.converged, "{}", perf);
        let r = m.residual_field(&psi, &source);
        assert!(r.iter().all(|v| v.abs() < 1e-9));
    }
}
