// crates/ldu_core/src/solvers/smoothers.rs

//! 光顺器
//!
//! 按行 Gauss-Seidel 扫描：单元 c 的上三角邻居经 `owner_start` 找到，
//! 下三角邻居经 `losort_start`/`losort` 找到，因此每一行都使用邻居的最新值。
//!
//! | 名称             | 扫描方式         |
//! |------------------|------------------|
//! | `GaussSeidel`    | 正向             |
//! | `symGaussSeidel` | 正向 + 反向      |

use crate::matrix::LduMatrix;
use ldu_foundation::{LduError, LduResult, Scalar};

/// 光顺器 trait
pub trait LduSmoother {
    /// 对 psi 执行 `n_sweeps` 次光顺
    fn smooth(&self, psi: &mut [Scalar], source: &[Scalar], n_sweeps: usize);

    /// 光顺器名称
    fn name(&self) -> &'static str;
}

/// 光顺器构造函数
pub type SmootherFactory = for<'a> fn(&'a LduMatrix<'a>) -> LduResult<Box<dyn LduSmoother + 'a>>;

fn new_gauss_seidel<'a>(matrix: &'a LduMatrix<'a>) -> LduResult<Box<dyn LduSmoother + 'a>> {
    Ok(Box::new(GaussSeidelSmoother::new(matrix)?))
}

fn new_sym_gauss_seidel<'a>(matrix: &'a LduMatrix<'a>) -> LduResult<Box<dyn LduSmoother + 'a>> {
    Ok(Box::new(SymGaussSeidelSmoother::new(matrix)?))
}

/// 可用光顺器（对称与非对称矩阵相同）
pub const SMOOTHERS: &[(&str, SmootherFactory)] = &[
    ("GaussSeidel", new_gauss_seidel),
    ("symGaussSeidel", new_sym_gauss_seidel),
];

/// 按名称选择光顺器
pub fn select<'a>(name: &str, matrix: &'a LduMatrix<'a>) -> LduResult<Box<dyn LduSmoother + 'a>> {
    match SMOOTHERS.iter().find(|(key, _)| *key == name) {
        Some((_, factory)) => factory(matrix),
        None => Err(LduError::unknown_selection(
            "光顺器",
            name,
            SMOOTHERS.iter().map(|(key, _)| key.to_string()).collect(),
        )),
    }
}

/// 单元 c 的一行更新：psi[c] = (b[c] - Σ offdiag·psi[nb]) / diag[c]
#[inline]
fn relax_row(matrix: &LduMatrix<'_>, c: usize, psi: &mut [Scalar], source: &[Scalar]) {
    let mut acc = source[c];

    if let Some((lower, upper)) = matrix.off_diag_pair() {
        let addr = matrix.addressing();
        let l = addr.lower_addr();
        let u = addr.upper_addr();
        let owner_start = addr.owner_start_addr();
        let losort = addr.losort_addr();
        let losort_start = addr.losort_start_addr();

        for face in owner_start[c]..owner_start[c + 1] {
            acc -= upper[face] * psi[u[face]];
        }
        for &face in &losort[losort_start[c]..losort_start[c + 1]] {
            acc -= lower[face] * psi[l[face]];
        }
    }

    psi[c] = acc / matrix.diag()[c];
}

/// 正向 Gauss-Seidel
#[derive(Debug, Clone, Copy)]
pub struct GaussSeidelSmoother<'a> {
    matrix: &'a LduMatrix<'a>,
}

impl<'a> GaussSeidelSmoother<'a> {
    /// 构造，要求矩阵有对角
    pub fn new(matrix: &'a LduMatrix<'a>) -> LduResult<Self> {
        matrix.try_diag()?;
        Ok(Self { matrix })
    }
}

impl<'a> LduSmoother for GaussSeidelSmoother<'a> {
    fn smooth(&self, psi: &mut [Scalar], source: &[Scalar], n_sweeps: usize) {
        let n = self.matrix.n_cells();
        for _ in 0..n_sweeps {
            for c in 0..n {
                relax_row(self.matrix, c, psi, source);
            }
        }
    }

    fn name(&self) -> &'static str {
        "GaussSeidel"
    }
}

/// 对称 Gauss-Seidel：每次光顺先正向再反向
#[derive(Debug, Clone, Copy)]
pub struct SymGaussSeidelSmoother<'a> {
    matrix: &'a LduMatrix<'a>,
}

impl<'a> SymGaussSeidelSmoother<'a> {
    /// 构造，要求矩阵有对角
    pub fn new(matrix: &'a LduMatrix<'a>) -> LduResult<Self> {
        matrix.try_diag()?;
        Ok(Self { matrix })
    }
}

impl<'a> LduSmoother for SymGaussSeidelSmoother<'a> {
    fn smooth(&self, psi: &mut [Scalar], source: &[Scalar], n_sweeps: usize) {
        let n = self.matrix.n_cells();
        for _ in 0..n_sweeps {
            for c in 0..n {
                relax_row(self.matrix, c, psi, source);
            }
            for c in (0..n).rev() {
                relax_row(self.matrix, c, psi, source);
            }
        }
    }

    fn name(&self) -> &'static str {
        "symGaussSeidel"
    }
}
