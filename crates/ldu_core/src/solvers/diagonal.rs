// crates/ldu_core/src/solvers/diagonal.rs

//! 纯对角矩阵的直接求解：psi = source / diag

use super::{LduSolver, SolverArgs, SolverBase};
use crate::performance::SolverPerformance;
use ldu_foundation::{LduResult, Scalar};

/// 对角求解器
#[derive(Debug)]
pub struct DiagonalSolver<'a> {
    base: SolverBase<'a>,
}

impl<'a> DiagonalSolver<'a> {
    /// 创建求解器
    pub fn new(args: SolverArgs<'a>) -> Self {
        Self {
            base: SolverBase::new(args),
        }
    }
}

impl<'a> LduSolver for DiagonalSolver<'a> {
    fn solve(&mut self, psi: &mut [Scalar], source: &[Scalar]) -> LduResult<SolverPerformance> {
        self.base.check_sizes(psi, source)?;
        let diag = self.base.matrix.try_diag()?;

        for ((p, s), d) in psi.iter_mut().zip(source).zip(diag) {
            *p = s / d;
        }

        Ok(SolverPerformance::with_values(
            self.type_name(),
            self.base.field_name.as_str(),
            0.0,
            0.0,
            0,
            true,
            false,
        ))
    }

    fn type_name(&self) -> &'static str {
        "diagonal"
    }

    fn field_name(&self) -> &str {
        &self.base.field_name
    }
}

#[cfg(test)]
mod tests {
    use crate::{LduAddressing, LduMatrix};
    use ldu_config::SolverControls;

    #[test]
    fn test_diagonal_solve() {
        let addr = LduAddressing::new(3, vec![0, 1], vec![1, 2]).unwrap();
        let mut m = LduMatrix::new(&addr);
        m.diag_mut().copy_from_slice(&[2.0, 4.0, 8.0]);

        let mut psi = vec![0.0; 3];
        let perf = m
            .solve("p", &mut psi, &[1.0, 1.0, 1.0], &SolverControls::new("PCG"))
            .unwrap();
        assert_eq!(psi, vec![0.5, 0.25, 0.125]);
        assert_eq!(perf.solver_name, "diagonal");
        assert_eq!(perf.n_iterations, 0);
        assert!(perf.converged);
        assert!(!perf.singular);
        assert_eq!(perf.initial_residual, 0.0);
    }
}
