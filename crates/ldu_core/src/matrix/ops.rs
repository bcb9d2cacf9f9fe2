// crates/ldu_core/src/matrix/ops.rs

//! 矩阵内核
//!
//! 面循环按面序号散射累加，对角部分逐元素计算（`parallel` 特性下并行）。
//! 未分配的对角或非对角数组按零处理。
//!
//! # Panics
//!
//! 输入/输出向量长度与单元数不符（与 CSR 矩阵的 `mul_vec` 约定一致）。

use super::LduMatrix;
use crate::vector_ops::hadamard;
use ldu_foundation::{LduResult, Scalar};

impl<'a> LduMatrix<'a> {
    #[track_caller]
    fn check_cell_field(&self, name: &str, len: usize) {
        assert_eq!(
            len,
            self.n_cells(),
            "{} 长度必须等于单元数",
            name
        );
    }

    /// 矩阵-向量乘法: Apsi = A * psi
    pub fn amul(&self, psi: &[Scalar], a_psi: &mut [Scalar]) {
        self.check_cell_field("psi", psi.len());
        self.check_cell_field("Apsi", a_psi.len());

        match &self.diag {
            Some(diag) => hadamard(diag, psi, a_psi),
            None => a_psi.fill(0.0),
        }

        if let Some((lower, upper)) = self.off_diag.pair() {
            let l = self.addr.lower_addr();
            let u = self.addr.upper_addr();
            for face in 0..l.len() {
                a_psi[u[face]] += lower[face] * psi[l[face]];
                a_psi[l[face]] += upper[face] * psi[u[face]];
            }
        }
    }

    /// 转置矩阵-向量乘法: Tpsi = Aᵀ * psi
    pub fn tmul(&self, psi: &[Scalar], t_psi: &mut [Scalar]) {
        self.check_cell_field("psi", psi.len());
        self.check_cell_field("Tpsi", t_psi.len());

        match &self.diag {
            Some(diag) => hadamard(diag, psi, t_psi),
            None => t_psi.fill(0.0),
        }

        if let Some((lower, upper)) = self.off_diag.pair() {
            let l = self.addr.lower_addr();
            let u = self.addr.upper_addr();
            for face in 0..l.len() {
                t_psi[u[face]] += upper[face] * psi[l[face]];
                t_psi[l[face]] += lower[face] * psi[u[face]];
            }
        }
    }

    /// 行和: sumA[c] = Σ_j A[c][j]
    pub fn sum_a(&self, sum_a: &mut [Scalar]) {
        self.check_cell_field("sumA", sum_a.len());

        match &self.diag {
            Some(diag) => sum_a.copy_from_slice(diag),
            None => sum_a.fill(0.0),
        }

        if let Some((lower, upper)) = self.off_diag.pair() {
            let l = self.addr.lower_addr();
            let u = self.addr.upper_addr();
            for face in 0..l.len() {
                sum_a[u[face]] += lower[face];
                sum_a[l[face]] += upper[face];
            }
        }
    }

    /// 残差: rA = source - A * psi
    pub fn residual(&self, r_a: &mut [Scalar], psi: &[Scalar], source: &[Scalar]) {
        self.check_cell_field("psi", psi.len());
        self.check_cell_field("source", source.len());
        self.check_cell_field("rA", r_a.len());

        r_a.copy_from_slice(source);
        if let Some(diag) = &self.diag {
            for ((r, &d), &p) in r_a.iter_mut().zip(diag.iter()).zip(psi.iter()) {
                *r -= d * p;
            }
        }

        if let Some((lower, upper)) = self.off_diag.pair() {
            let l = self.addr.lower_addr();
            let u = self.addr.upper_addr();
            for face in 0..l.len() {
                r_a[u[face]] -= lower[face] * psi[l[face]];
                r_a[l[face]] -= upper[face] * psi[u[face]];
            }
        }
    }

    /// 残差（分配返回）
    pub fn residual_field(&self, psi: &[Scalar], source: &[Scalar]) -> Vec<Scalar> {
        let mut r_a = vec![0.0; self.n_cells()];
        self.residual(&mut r_a, psi, source);
        r_a
    }

    /// 非对角作用的负值: H[c] = -Σ_{j≠c} A[c][j] * psi[j]
    pub fn h(&self, psi: &[Scalar]) -> Vec<Scalar> {
        self.check_cell_field("psi", psi.len());

        let mut h = vec![0.0; self.n_cells()];
        if let Some((lower, upper)) = self.off_diag.pair() {
            let l = self.addr.lower_addr();
            let u = self.addr.upper_addr();
            for face in 0..l.len() {
                h[u[face]] -= lower[face] * psi[l[face]];
                h[l[face]] -= upper[face] * psi[u[face]];
            }
        }
        h
    }

    /// 非对角行和的负值: H1[c] = -Σ_{j≠c} A[c][j]
    pub fn h1(&self) -> Vec<Scalar> {
        let mut h1 = vec![0.0; self.n_cells()];
        if let Some((lower, upper)) = self.off_diag.pair() {
            let l = self.addr.lower_addr();
            let u = self.addr.upper_addr();
            for face in 0..l.len() {
                h1[u[face]] -= lower[face];
                h1[l[face]] -= upper[face];
            }
        }
        h1
    }

    /// 对角加上所在列的非对角系数（分配对角）
    pub fn sum_diag(&mut self) {
        self.accumulate_diag(1.0);
    }

    /// 对角减去所在列的非对角系数（分配对角）
    ///
    /// 对零行和的扩散算子，`neg_sum_diag` 后对角等于非对角绝对值之和。
    pub fn neg_sum_diag(&mut self) {
        self.accumulate_diag(-1.0);
    }

    fn accumulate_diag(&mut self, sign: Scalar) {
        let n = self.n_cells();
        let diag = self.diag.get_or_insert_with(|| vec![0.0; n]);
        if let Some((lower, upper)) = self.off_diag.pair() {
            let l = self.addr.lower_addr();
            let u = self.addr.upper_addr();
            for face in 0..l.len() {
                diag[l[face]] += sign * lower[face];
                diag[u[face]] += sign * upper[face];
            }
        }
    }

    /// 累加每行非对角系数绝对值: sumOff[c] += Σ_{j≠c} |A[c][j]|
    pub fn sum_mag_off_diag(&self, sum_off: &mut [Scalar]) {
        self.check_cell_field("sumOff", sum_off.len());

        if let Some((lower, upper)) = self.off_diag.pair() {
            let l = self.addr.lower_addr();
            let u = self.addr.upper_addr();
            for face in 0..l.len() {
                sum_off[u[face]] += lower[face].abs();
                sum_off[l[face]] += upper[face].abs();
            }
        }
    }

    /// 隐式欠松弛
    ///
    /// 对角替换为 `max(|D|, Σ|offdiag|) / alpha`，并把对角增量乘以当前解加入源项，
    /// 使不动点不变。`alpha <= 0` 时不做任何处理。
    ///
    /// # 错误
    ///
    /// 对角未分配。
    pub fn relax(&mut self, psi: &[Scalar], source: &mut [Scalar], alpha: Scalar) -> LduResult<()> {
        if alpha <= 0.0 {
            return Ok(());
        }
        self.try_diag()?;
        self.check_cell_field("psi", psi.len());
        self.check_cell_field("source", source.len());

        let mut sum_off = vec![0.0; self.n_cells()];
        self.sum_mag_off_diag(&mut sum_off);

        let diag = self.diag_mut();
        for c in 0..diag.len() {
            let d0 = diag[c];
            let d = d0.abs().max(sum_off[c]) / alpha;
            source[c] += (d - d0) * psi[c];
            diag[c] = d;
        }

        log::debug!("矩阵隐式松弛: alpha = {}", alpha);
        Ok(())
    }
}
