// crates/ldu_core/src/preconditioners/dic.rs

//! DIC - 对角不完全 Cholesky 预条件器
//!
//! 仅修改对角的 IC(0) 变体，适用于对称矩阵：
//!
//! ```text
//! rD[u] -= upper[f]² / rD[l]     (按面顺序)
//! rD = 1 / rD
//! ```
//!
//! 应用时先按面顺序前代，再按面逆序回代。

use super::LduPreconditioner;
use crate::matrix::LduMatrix;
use crate::vector_ops::hadamard;
use ldu_foundation::{LduResult, Scalar};

/// DIC 预条件器
#[derive(Debug, Clone)]
pub struct DicPreconditioner<'a> {
    matrix: &'a LduMatrix<'a>,
    r_d: Vec<Scalar>,
}

impl<'a> DicPreconditioner<'a> {
    /// 由对称矩阵构造，计算修正对角的倒数
    pub fn new(matrix: &'a LduMatrix<'a>) -> LduResult<Self> {
        let mut r_d = matrix.try_diag()?.to_vec();
        let upper = matrix.try_upper()?;
        Self::calc_reciprocal_d(matrix, upper, &mut r_d);
        Ok(Self { matrix, r_d })
    }

    fn calc_reciprocal_d(matrix: &LduMatrix<'_>, upper: &[Scalar], r_d: &mut [Scalar]) {
        let addr = matrix.addressing();
        let l = addr.lower_addr();
        let u = addr.upper_addr();

        for face in 0..l.len() {
            r_d[u[face]] -= upper[face] * upper[face] / r_d[l[face]];
        }
        for d in r_d.iter_mut() {
            *d = 1.0 / *d;
        }
    }
}

impl<'a> LduPreconditioner for DicPreconditioner<'a> {
    fn precondition(&self, w_a: &mut [Scalar], r_a: &[Scalar]) {
        let addr = self.matrix.addressing();
        let l = addr.lower_addr();
        let u = addr.upper_addr();
        let upper = self.matrix.upper();
        let r_d = &self.r_d;

        hadamard(r_d, r_a, w_a);

        for face in 0..l.len() {
            w_a[u[face]] -= r_d[u[face]] * upper[face] * w_a[l[face]];
        }
        for face in (0..l.len()).rev() {
            w_a[l[face]] -= r_d[l[face]] * upper[face] * w_a[u[face]];
        }
    }

    fn name(&self) -> &'static str {
        "DIC"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LduAddressing;

    #[test]
    fn test_tridiagonal_is_exact() {
        // 三对角矩阵的 IC(0) 没有填充，即完全 Cholesky 分解
        let addr = LduAddressing::new(3, vec![0, 1], vec![1, 2]).unwrap();
        let mut m = LduMatrix::new(&addr);
        m.diag_mut().copy_from_slice(&[2.0, 2.0, 2.0]);
        m.upper_mut().fill(-1.0);

        let p = DicPreconditioner::new(&m).unwrap();
        let b = [1.0, 0.0, 1.0];
        let mut x = [0.0; 3];
        p.precondition(&mut x, &b);

        for (xi, expected) in x.iter().zip([1.0, 1.0, 1.0]) {
            assert!((xi - expected).abs() < 1e-14);
        }
    }

    #[test]
    fn test_reciprocal_d() {
        let addr = LduAddressing::new(2, vec![0], vec![1]).unwrap();
        let mut m = LduMatrix::new(&addr);
        m.diag_mut().copy_from_slice(&[4.0, 4.0]);
        m.upper_mut().fill(-2.0);
        let p = DicPreconditioner::new(&m).unwrap();
        // rD[1] = 1 / (4 - 4/4) = 1/3
        assert_eq!(p.r_d, vec![0.25, 1.0 / 3.0]);
    }
}
