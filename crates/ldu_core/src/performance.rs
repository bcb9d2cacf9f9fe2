// crates/ldu_core/src/performance.rs

//! SolverPerformance - 一次线性求解的结果记录
//!
//! 奇异与未收敛不作为错误返回，而是记录在 `singular` / `converged` 字段中，
//! 由调用方决定如何处理。
//!
//! # 流格式
//!
//! ```text
//! (PCG p 1 2.5e-7 12 true false)
//! ```
//!
//! 依次为 solverName、fieldName、initialResidual、finalResidual、nIterations、
//! converged、singular。

use ldu_foundation::stream::{TokenReader, TokenWriter};
use ldu_foundation::{Label, LduError, LduResult, Scalar, VSMALL};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;

/// 相对收敛判据生效的下限
///
/// `rel_tol` 不大于该值时只使用绝对容差。
pub const SMALL_RESIDUAL: Scalar = 1.0e-20;

/// 线性求解结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolverPerformance {
    /// 求解器名称
    pub solver_name: String,
    /// 场名
    pub field_name: String,
    /// 初始（归一化）残差
    pub initial_residual: Scalar,
    /// 最终（归一化）残差
    pub final_residual: Scalar,
    /// 迭代次数
    pub n_iterations: Label,
    /// 是否收敛
    pub converged: bool,
    /// 是否奇异
    pub singular: bool,
}

impl Default for SolverPerformance {
    fn default() -> Self {
        Self::new("", "")
    }
}

impl SolverPerformance {
    /// 创建记录：残差为 0、迭代 0 次、未收敛、非奇异
    pub fn new(solver_name: impl Into<String>, field_name: impl Into<String>) -> Self {
        Self {
            solver_name: solver_name.into(),
            field_name: field_name.into(),
            initial_residual: 0.0,
            final_residual: 0.0,
            n_iterations: 0,
            converged: false,
            singular: false,
        }
    }

    /// 以全部字段创建
    pub fn with_values(
        solver_name: impl Into<String>,
        field_name: impl Into<String>,
        initial_residual: Scalar,
        final_residual: Scalar,
        n_iterations: Label,
        converged: bool,
        singular: bool,
    ) -> Self {
        Self {
            solver_name: solver_name.into(),
            field_name: field_name.into(),
            initial_residual,
            final_residual,
            n_iterations,
            converged,
            singular,
        }
    }

    /// 根据残差判定奇异性：`residual <= VSMALL`
    ///
    /// 结果写入 `singular` 并返回。
    pub fn check_singularity(&mut self, residual: Scalar) -> bool {
        self.singular = residual <= VSMALL;
        self.singular
    }

    /// 收敛判定
    ///
    /// 满足以下条件时收敛：
    /// - `final < tolerance`，或 `rel_tol > SMALL_RESIDUAL` 且 `final <= rel_tol * initial`
    /// - 且 `iteration >= min_iter`
    ///
    /// 结果写入 `converged` 并返回。
    pub fn check_convergence(
        &mut self,
        tolerance: Scalar,
        rel_tol: Scalar,
        iteration: Label,
        min_iter: Label,
    ) -> bool {
        let absolute = self.final_residual < tolerance;
        let relative =
            rel_tol > SMALL_RESIDUAL && self.final_residual <= rel_tol * self.initial_residual;
        self.converged = (absolute || relative) && iteration >= min_iter;
        self.converged
    }

    /// 仅按绝对容差判定收敛，等价于 `rel_tol = 0`
    pub fn check_convergence_abs(
        &mut self,
        tolerance: Scalar,
        iteration: Label,
        min_iter: Label,
    ) -> bool {
        self.check_convergence(tolerance, 0.0, iteration, min_iter)
    }

    /// 逐字段合并：名称取 `a`，残差与迭代次数取最大值，
    /// `converged` 取与，`singular` 取或
    pub fn max(a: &Self, b: &Self) -> Self {
        Self {
            solver_name: a.solver_name.clone(),
            field_name: a.field_name.clone(),
            initial_residual: a.initial_residual.max(b.initial_residual),
            final_residual: a.final_residual.max(b.final_residual),
            n_iterations: a.n_iterations.max(b.n_iterations),
            converged: a.converged && b.converged,
            singular: a.singular || b.singular,
        }
    }

    /// 以 info 级别输出求解摘要
    pub fn print(&self) {
        if self.singular {
            log::warn!("{}", self);
        } else {
            log::info!("{}", self);
        }
    }

    /// 写出为 `(solver field init final nIter converged singular)`
    pub fn write<W: Write>(&self, w: &mut TokenWriter<W>) -> LduResult<()> {
        w.begin_list()?;
        w.write_word(&self.solver_name)?;
        w.write_word(&self.field_name)?;
        w.write_scalar(self.initial_residual)?;
        w.write_scalar(self.final_residual)?;
        w.write_label(self.n_iterations)?;
        w.write_bool(self.converged)?;
        w.write_bool(self.singular)?;
        w.end_list()
    }

    /// 从流读取
    pub fn read(r: &mut TokenReader) -> LduResult<Self> {
        r.expect_punct('(', "SolverPerformance")?;
        let perf = Self {
            solver_name: r.read_word("solverName")?,
            field_name: r.read_word("fieldName")?,
            initial_residual: r.read_scalar("initialResidual")?,
            final_residual: r.read_scalar("finalResidual")?,
            n_iterations: r.read_label("nIterations")?,
            converged: r.read_bool("converged")?,
            singular: r.read_bool("singular")?,
        };
        r.expect_punct(')', "SolverPerformance")?;
        Ok(perf)
    }

    /// 流格式文本
    pub fn to_stream_string(&self) -> LduResult<String> {
        let mut w = TokenWriter::new(Vec::new());
        self.write(&mut w)?;
        String::from_utf8(w.into_inner()).map_err(|e| LduError::internal(e.to_string()))
    }

    /// 从流格式文本解析
    pub fn parse_str(text: &str) -> LduResult<Self> {
        let mut r = TokenReader::new(text)?;
        Self::read(&mut r)
    }
}

impl fmt::Display for SolverPerformance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.singular {
            write!(
                f,
                "{}:  Solving for {}:  solution singular",
                self.solver_name, self.field_name
            )
        } else {
            write!(
                f,
                "{}:  Solving for {}, Initial residual = {}, Final residual = {}, No Iterations {}",
                self.solver_name,
                self.field_name,
                self.initial_residual,
                self.final_residual,
                self.n_iterations
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SolverPerformance {
        SolverPerformance::with_values("PCG", "p", 0.5, 1e-4, 3, false, false)
    }

    #[test]
    fn test_new_defaults() {
        let p = SolverPerformance::new("PCG", "p");
        assert_eq!(p.initial_residual, 0.0);
        assert_eq!(p.final_residual, 0.0);
        assert_eq!(p.n_iterations, 0);
        assert!(!p.converged);
        assert!(!p.singular);
    }

    #[test]
    fn test_check_singularity() {
        let mut p = sample();
        assert!(p.check_singularity(0.0));
        assert!(p.singular);
        assert!(p.check_singularity(VSMALL));
        assert!(!p.check_singularity(1e-299));
        assert!(!p.singular);
    }

    #[test]
    fn test_check_convergence_absolute() {
        let mut p = sample();
        p.final_residual = 1e-7;
        assert!(p.check_convergence(1e-6, 0.0, 0, 0));
        assert!(p.converged);

        p.final_residual = 1e-6;
        assert!(!p.check_convergence(1e-6, 0.0, 5, 0));
        assert!(!p.converged);
    }

    #[test]
    fn test_check_convergence_relative() {
        let mut p = sample();
        p.initial_residual = 1.0;
        p.final_residual = 0.01;
        assert!(p.check_convergence(1e-12, 0.01, 1, 0));
        assert!(!p.check_convergence(1e-12, 0.009, 1, 0));
        // rel_tol 低于阈值时关闭相对判据
        p.final_residual = 0.0;
        p.initial_residual = 0.0;
        assert!(!p.check_convergence(0.0, 1e-21, 1, 0));
    }

    #[test]
    fn test_check_convergence_min_iter() {
        let mut p = sample();
        p.final_residual = 1e-10;
        assert!(!p.check_convergence(1e-6, 0.0, 1, 2));
        assert!(p.check_convergence(1e-6, 0.0, 2, 2));
        assert!(!p.check_convergence_abs(1e-6, 1, 2));
        assert!(p.check_convergence_abs(1e-6, 2, 2));

        // 绝对判据为严格小于
        p.final_residual = 1e-6;
        assert!(!p.check_convergence_abs(1e-6, 2, 0));
    }

    #[test]
    fn test_equality() {
        let a = sample();
        let mut b = a.clone();
        assert_eq!(a, b);
        b.singular = true;
        assert_ne!(a, b);
        let mut c = a.clone();
        c.field_name = "U".into();
        assert_ne!(a, c);
    }

    #[test]
    fn test_max() {
        let a = SolverPerformance::with_values("PCG", "p", 0.5, 1e-3, 3, true, false);
        let b = SolverPerformance::with_values("other", "q", 0.7, 1e-4, 5, false, true);
        let m = SolverPerformance::max(&a, &b);
        assert_eq!(m.solver_name, "PCG");
        assert_eq!(m.field_name, "p");
        assert_eq!(m.initial_residual, 0.7);
        assert_eq!(m.final_residual, 1e-3);
        assert_eq!(m.n_iterations, 5);
        assert!(!m.converged);
        assert!(m.singular);
    }

    #[test]
    fn test_stream_format() {
        let p = SolverPerformance::with_values("PCG", "p", 0.5, 1e-4, 3, true, false);
        assert_eq!(p.to_stream_string().unwrap(), "(PCG p 0.5 0.0001 3 true false)");
    }

    #[test]
    fn test_stream_round_trip_exact() {
        let p = SolverPerformance::with_values("DICPCG", "T", 0.1 + 0.2, 1.0 / 3.0e9, 17, false, true);
        let back = SolverPerformance::parse_str(&p.to_stream_string().unwrap()).unwrap();
        assert_eq!(back, p);
        assert_eq!(back.initial_residual.to_bits(), p.initial_residual.to_bits());
    }

    #[test]
    fn test_stream_round_trip_comment_like_names() {
        let p = SolverPerformance::with_values("//PCG", "/*p", 1.0, 1e-3, 2, true, false);
        let text = p.to_stream_string().unwrap();
        assert_eq!(text, r#"("//PCG" "/*p" 1 0.001 2 true false)"#);
        assert_eq!(SolverPerformance::parse_str(&text).unwrap(), p);
    }

    #[test]
    fn test_read_accepts_alternate_booleans() {
        let p = SolverPerformance::parse_str("(GAMG U 1 0.001 4 yes off)").unwrap();
        assert!(p.converged);
        assert!(!p.singular);
    }

    #[test]
    fn test_read_truncated_stream() {
        let err = SolverPerformance::parse_str("(PCG p 0.5 1e-4").unwrap_err();
        assert!(err.to_string().contains("nIterations"));
    }

    #[test]
    fn test_read_bad_number_names_field() {
        let err = SolverPerformance::parse_str("(PCG p abc 1e-4 3 true false)").unwrap_err();
        assert!(err.to_string().contains("initialResidual"));
    }

    #[test]
    fn test_display() {
        let p = sample();
        assert_eq!(
            p.to_string(),
            "PCG:  Solving for p, Initial residual = 0.5, Final residual = 0.0001, No Iterations 3"
        );
        let mut s = sample();
        s.singular = true;
        assert!(s.to_string().contains("solution singular"));
    }

    #[test]
    fn test_json_serialization() {
        let p = sample();
        let json = serde_json::to_string(&p).unwrap();
        assert!(json.contains("\"initialResidual\":0.5"));
        let back: SolverPerformance = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }
}
