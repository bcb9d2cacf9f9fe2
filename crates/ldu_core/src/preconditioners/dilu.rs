// crates/ldu_core/src/preconditioners/dilu.rs

//! DILU - 对角不完全 LU 预条件器（非对称矩阵）
//!
//! 前代按 `losort`（upper 单元升序）遍历面，保证 wA[l] 在被使用前已完成更新。

use super::LduPreconditioner;
use crate::matrix::LduMatrix;
use crate::vector_ops::hadamard;
use ldu_foundation::{LduResult, Scalar};

/// DILU 预条件器
#[derive(Debug, Clone)]
pub struct DiluPreconditioner<'a> {
    matrix: &'a LduMatrix<'a>,
    r_d: Vec<Scalar>,
}

impl<'a> DiluPreconditioner<'a> {
    /// 构造并计算修正对角的倒数
    pub fn new(matrix: &'a LduMatrix<'a>) -> LduResult<Self> {
        let mut r_d = matrix.try_diag()?.to_vec();
        let lower = matrix.try_lower()?;
        let upper = matrix.try_upper()?;

        let addr = matrix.addressing();
        let l = addr.lower_addr();
        let u = addr.upper_addr();
        for face in 0..l.len() {
            r_d[u[face]] -= upper[face] * lower[face] / r_d[l[face]];
        }
        for d in r_d.iter_mut() {
            *d = 1.0 / *d;
        }

        Ok(Self { matrix, r_d })
    }
}

impl<'a> LduPreconditioner for DiluPreconditioner<'a> {
    fn precondition(&self, w_a: &mut [Scalar], r_a: &[Scalar]) {
        let addr = self.matrix.addressing();
        let l = addr.lower_addr();
        let u = addr.upper_addr();
        let losort = addr.losort_addr();
        let lower = self.matrix.lower();
        let upper = self.matrix.upper();
        let r_d = &self.r_d;

        hadamard(r_d, r_a, w_a);

        for &face in losort {
            w_a[u[face]] -= r_d[u[face]] * lower[face] * w_a[l[face]];
        }
        for face in (0..l.len()).rev() {
            w_a[l[face]] -= r_d[l[face]] * upper[face] * w_a[u[face]];
        }
    }

    fn name(&self) -> &'static str {
        "DILU"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LduAddressing;

    #[test]
    fn test_bidiagonal_pair_is_exact() {
        // 两单元系统的 ILU(0) 即完全 LU
        let addr = LduAddressing::new(2, vec![0], vec![1]).unwrap();
        let mut m = LduMatrix::new(&addr);
        m.diag_mut().copy_from_slice(&[4.0, 3.0]);
        m.upper_mut().fill(1.0);
        m.lower_mut().fill(2.0);

        let p = DiluPreconditioner::new(&m).unwrap();
        // A = [[4,1],[2,3]], x = [1,2] => b = [6, 8]
        let mut x = [0.0; 2];
        p.precondition(&mut x, &[6.0, 8.0]);
        assert!((x[0] - 1.0).abs() < 1e-14);
        assert!((x[1] - 2.0).abs() < 1e-14);
    }

    #[test]
    fn test_symmetric_matches_dic() {
        let addr = LduAddressing::from_pairs(4, [(0, 1), (0, 2), (1, 3), (2, 3)]).unwrap();
        let mut m = LduMatrix::new(&addr);
        m.diag_mut().fill(4.0);
        m.upper_mut().fill(-1.0);

        let dic = crate::preconditioners::DicPreconditioner::new(&m).unwrap();
        let dilu = DiluPreconditioner::new(&m).unwrap();
        let r = [1.0, 2.0, 3.0, 4.0];
        let (mut a, mut b) = ([0.0; 4], [0.0; 4]);
        dic.precondition(&mut a, &r);
        dilu.precondition(&mut b, &r);
        for i in 0..4 {
            assert!((a[i] - b[i]).abs() < 1e-14);
        }
    }
}
