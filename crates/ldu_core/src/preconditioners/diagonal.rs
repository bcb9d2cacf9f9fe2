// crates/ldu_core/src/preconditioners/diagonal.rs

use super::LduPreconditioner;
use crate::matrix::LduMatrix;
use crate::vector_ops::hadamard;
use ldu_foundation::{LduResult, Scalar};

/// 恒等预条件器（无预条件）
///
/// M = I，即 wA = rA
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPreconditioner;

impl LduPreconditioner for NoPreconditioner {
    fn precondition(&self, w_a: &mut [Scalar], r_a: &[Scalar]) {
        w_a.copy_from_slice(r_a);
    }

    fn name(&self) -> &'static str {
        "none"
    }
}

/// 对角（Jacobi）预条件器
///
/// M = diag(A)，即 wA_i = rA_i / A_ii
#[derive(Debug, Clone)]
pub struct DiagonalPreconditioner {
    r_d: Vec<Scalar>,
}

impl DiagonalPreconditioner {
    /// 由矩阵对角创建
    pub fn new(matrix: &LduMatrix<'_>) -> LduResult<Self> {
        let r_d = matrix.try_diag()?.iter().map(|&d| 1.0 / d).collect();
        Ok(Self { r_d })
    }
}

impl LduPreconditioner for DiagonalPreconditioner {
    fn precondition(&self, w_a: &mut [Scalar], r_a: &[Scalar]) {
        hadamard(&self.r_d, r_a, w_a);
    }

    fn name(&self) -> &'static str {
        "diagonal"
    }
}
