// crates/ldu_core/src/matrix/arith.rs

//! 矩阵算术
//!
//! 加减法的分配规则：结果至少与两个操作数中“更一般”的一方同样一般。
//! 对称 + 非对称会先把左操作数展开为两个独立的三角。

use super::{LduMatrix, OffDiag};
use ldu_foundation::{LduError, LduResult, Scalar};

impl<'a> LduMatrix<'a> {
    /// 取负
    pub fn negate(&mut self) {
        if let Some(diag) = &mut self.diag {
            diag.iter_mut().for_each(|v| *v = -*v);
        }
        match &mut self.off_diag {
            OffDiag::Unallocated => {}
            OffDiag::Lower(v) | OffDiag::Upper(v) => v.iter_mut().for_each(|x| *x = -*x),
            OffDiag::Both { lower, upper } => {
                lower.iter_mut().for_each(|x| *x = -*x);
                upper.iter_mut().for_each(|x| *x = -*x);
            }
        }
    }

    /// `self += other`
    ///
    /// # 错误
    ///
    /// 两个矩阵的寻址不同。
    pub fn add_assign(&mut self, other: &LduMatrix<'_>) -> LduResult<()> {
        self.combine("+=", other, 1.0)
    }

    /// `self -= other`
    ///
    /// # 错误
    ///
    /// 两个矩阵的寻址不同。
    pub fn sub_assign(&mut self, other: &LduMatrix<'_>) -> LduResult<()> {
        self.combine("-=", other, -1.0)
    }

    fn combine(
        &mut self,
        operation: &'static str,
        other: &LduMatrix<'_>,
        sign: Scalar,
    ) -> LduResult<()> {
        if !std::ptr::eq(self.addr, other.addr) && self.addr != other.addr {
            return Err(LduError::incompatible(
                operation,
                describe(self),
                describe(other),
            ));
        }

        if let Some(rhs) = &other.diag {
            add_scaled(self.diag_mut(), rhs, sign);
        }

        match &other.off_diag {
            OffDiag::Unallocated => {}
            OffDiag::Lower(rhs) | OffDiag::Upper(rhs) => {
                if matches!(self.off_diag, OffDiag::Unallocated) {
                    let zeros = vec![0.0; self.n_faces()];
                    self.off_diag = match &other.off_diag {
                        OffDiag::Lower(_) => OffDiag::Lower(zeros),
                        _ => OffDiag::Upper(zeros),
                    };
                }
                match &mut self.off_diag {
                    OffDiag::Unallocated => {}
                    OffDiag::Lower(lhs) | OffDiag::Upper(lhs) => add_scaled(lhs, rhs, sign),
                    OffDiag::Both { lower, upper } => {
                        add_scaled(lower, rhs, sign);
                        add_scaled(upper, rhs, sign);
                    }
                }
            }
            OffDiag::Both {
                lower: rhs_lower,
                upper: rhs_upper,
            } => {
                let (lower, upper) = self.lower_upper_mut();
                add_scaled(lower, rhs_lower, sign);
                add_scaled(upper, rhs_upper, sign);
            }
        }

        log::trace!("矩阵 {} 完成: 结果类型 {}", operation, self.matrix_type());
        Ok(())
    }

    /// 整体缩放: A *= s
    pub fn scale(&mut self, s: Scalar) {
        if let Some(diag) = &mut self.diag {
            diag.iter_mut().for_each(|v| *v *= s);
        }
        match &mut self.off_diag {
            OffDiag::Unallocated => {}
            OffDiag::Lower(v) | OffDiag::Upper(v) => v.iter_mut().for_each(|x| *x *= s),
            OffDiag::Both { lower, upper } => {
                lower.iter_mut().for_each(|x| *x *= s);
                upper.iter_mut().for_each(|x| *x *= s);
            }
        }
    }

    /// 逐行缩放: A[c][*] *= sf[c]
    ///
    /// 对称矩阵会被展开为非对称（两个三角的行因子不同）。
    ///
    /// # Panics
    ///
    /// `sf` 长度与单元数不符。
    pub fn scale_rows(&mut self, sf: &[Scalar]) {
        assert_eq!(sf.len(), self.n_cells(), "sf 长度必须等于单元数");

        if let Some(diag) = &mut self.diag {
            diag.iter_mut().zip(sf.iter()).for_each(|(v, &s)| *v *= s);
        }
        if matches!(self.off_diag, OffDiag::Unallocated) {
            return;
        }

        let addr = self.addr;
        let l = addr.lower_addr();
        let u = addr.upper_addr();
        let (lower, upper) = self.lower_upper_mut();
        for face in 0..l.len() {
            upper[face] *= sf[l[face]];
            lower[face] *= sf[u[face]];
        }
    }
}

fn describe(m: &LduMatrix<'_>) -> String {
    format!("{} ({} 单元, {} 面)", m.matrix_type(), m.n_cells(), m.n_faces())
}

fn add_scaled(lhs: &mut [Scalar], rhs: &[Scalar], sign: Scalar) {
    for (a, &b) in lhs.iter_mut().zip(rhs.iter()) {
        *a += sign * b;
    }
}
