// crates/ldu_core/src/addressing.rs

//! LDU 寻址
//!
//! 每个内部面连接两个单元：`lower[f] < upper[f]`。面按 `lower` 非降序排列，
//! 这样 `owner_start` 可以把每个单元作为 lower 的面组织成连续区间。
//!
//! 系数位置约定：
//!
//! - `upper[f]` 系数位于 (行 `lower_addr[f]`, 列 `upper_addr[f]`)
//! - `lower[f]` 系数位于 (行 `upper_addr[f]`, 列 `lower_addr[f]`)
//!
//! 派生寻址：
//!
//! - `owner_start[c]..owner_start[c+1]`: 以 c 为 lower 的面
//! - `losort`: 按 upper 稳定排序的面序号
//! - `losort_start[c]..losort_start[c+1]`: `losort` 中以 c 为 upper 的区间

use ldu_foundation::stream::{TokenReader, TokenWriter};
use ldu_foundation::{ensure, Label, LduError, LduResult};
use std::io::Write;

/// 基于面的 LDU 寻址
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LduAddressing {
    n_cells: usize,
    lower: Vec<Label>,
    upper: Vec<Label>,
    owner_start: Vec<Label>,
    losort: Vec<Label>,
    losort_start: Vec<Label>,
}

impl LduAddressing {
    /// 由单元数与 lower/upper 面寻址创建
    ///
    /// # 错误
    ///
    /// - 两个寻址数组长度不同（[`LduError::SizeMismatch`]）
    /// - 某个面 `upper >= n_cells`（[`LduError::IndexOutOfBounds`]）
    /// - 某个面 `lower >= upper`，或 `lower` 不是非降序（[`LduError::InvalidAddressing`]）
    pub fn new(n_cells: usize, lower: Vec<Label>, upper: Vec<Label>) -> LduResult<Self> {
        LduError::check_size("upperAddr", lower.len(), upper.len())?;

        for (face, (&l, &u)) in lower.iter().zip(upper.iter()).enumerate() {
            LduError::check_index("upperAddr", u, n_cells)?;
            ensure!(
                l < u,
                LduError::invalid_addressing(format!(
                    "面 {} 的 lower 单元 {} 不小于 upper 单元 {}",
                    face, l, u
                ))
            );
        }
        if let Some(face) = lower.windows(2).position(|w| w[0] > w[1]) {
            return Err(LduError::invalid_addressing(format!(
                "lowerAddr 必须非降序: 面 {} 与 {} 逆序",
                face,
                face + 1
            )));
        }

        let owner_start = Self::compute_owner_start(n_cells, &lower);
        let (losort, losort_start) = Self::compute_losort(n_cells, &upper);

        Ok(Self {
            n_cells,
            lower,
            upper,
            owner_start,
            losort,
            losort_start,
        })
    }

    /// 由无序的单元对创建
    ///
    /// 每对会被调整为 `(min, max)` 并按 (lower, upper) 排序。
    /// 自连接与重复的单元对视为错误。
    pub fn from_pairs<I>(n_cells: usize, pairs: I) -> LduResult<Self>
    where
        I: IntoIterator<Item = (Label, Label)>,
    {
        let mut faces: Vec<(Label, Label)> = pairs
            .into_iter()
            .map(|(a, b)| (a.min(b), a.max(b)))
            .collect();
        if let Some(&(c, _)) = faces.iter().find(|(a, b)| a == b) {
            return Err(LduError::invalid_addressing(format!("单元 {} 自连接", c)));
        }

        faces.sort_unstable();
        if let Some(w) = faces.windows(2).find(|w| w[0] == w[1]) {
            return Err(LduError::invalid_addressing(format!(
                "单元对 ({}, {}) 重复",
                w[0].0, w[0].1
            )));
        }

        let (lower, upper) = faces.into_iter().unzip();
        Self::new(n_cells, lower, upper)
    }

    fn compute_owner_start(n_cells: usize, lower: &[Label]) -> Vec<Label> {
        let mut start = vec![0; n_cells + 1];
        for &l in lower {
            start[l + 1] += 1;
        }
        for c in 0..n_cells {
            start[c + 1] += start[c];
        }
        start
    }

    fn compute_losort(n_cells: usize, upper: &[Label]) -> (Vec<Label>, Vec<Label>) {
        let mut start = vec![0; n_cells + 1];
        for &u in upper {
            start[u + 1] += 1;
        }
        for c in 0..n_cells {
            start[c + 1] += start[c];
        }

        let mut next = start.clone();
        let mut losort = vec![0; upper.len()];
        for (face, &u) in upper.iter().enumerate() {
            losort[next[u]] = face;
            next[u] += 1;
        }
        (losort, start)
    }

    /// 单元数（矩阵行数）
    #[inline]
    pub fn n_cells(&self) -> usize {
        self.n_cells
    }

    /// 内部面数（每个非对角三角的系数个数）
    #[inline]
    pub fn n_faces(&self) -> usize {
        self.lower.len()
    }

    /// 每个面的 lower 单元
    #[inline]
    pub fn lower_addr(&self) -> &[Label] {
        &self.lower
    }

    /// 每个面的 upper 单元
    #[inline]
    pub fn upper_addr(&self) -> &[Label] {
        &self.upper
    }

    /// 按 lower 单元分组的面区间起点，长度 `n_cells + 1`
    #[inline]
    pub fn owner_start_addr(&self) -> &[Label] {
        &self.owner_start
    }

    /// 按 upper 单元排序的面序号
    #[inline]
    pub fn losort_addr(&self) -> &[Label] {
        &self.losort
    }

    /// `losort` 中按 upper 单元分组的区间起点，长度 `n_cells + 1`
    #[inline]
    pub fn losort_start_addr(&self) -> &[Label] {
        &self.losort_start
    }

    /// 写出为 `nCells N lowerAddr M(...) upperAddr M(...)`
    pub fn write<W: Write>(&self, w: &mut TokenWriter<W>) -> LduResult<()> {
        w.write_keyword("nCells")?;
        w.write_label(self.n_cells)?;
        w.newline()?;
        w.write_keyword("lowerAddr")?;
        w.write_label_list(&self.lower)?;
        w.newline()?;
        w.write_keyword("upperAddr")?;
        w.write_label_list(&self.upper)?;
        w.newline()
    }

    /// 从流读取并验证
    pub fn read(r: &mut TokenReader) -> LduResult<Self> {
        r.expect_keyword("nCells")?;
        let n_cells = r.read_label("nCells")?;
        r.skip_semicolon();

        r.expect_keyword("lowerAddr")?;
        let lower = r.read_label_list("lowerAddr")?;
        r.skip_semicolon();

        r.expect_keyword("upperAddr")?;
        let (line, column) = r.position();
        let upper = r.read_list_exact("upperAddr", lower.len(), |r| r.read_label("upperAddr"))?;
        r.skip_semicolon();

        Self::new(n_cells, lower, upper).map_err(|e| match e {
            LduError::InvalidAddressing { .. } | LduError::IndexOutOfBounds { .. } => {
                LduError::parse(line, column, "upperAddr", e.to_string())
            }
            other => other,
        })
    }
}
