// crates/ldu_config/src/solver_controls.rs

//! SolverControls - 单个方程的线性求解器控制参数
//!
//! 键名与 fvSolution 字典保持一致（`relTol`、`maxIter` 等）：
//!
//! ```json
//! {
//!   "solver": "PCG",
//!   "preconditioner": "DIC",
//!   "tolerance": 1e-6,
//!   "relTol": 0.05
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// 线性求解器控制参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolverControls {
    /// 求解器名称（运行时选择键）
    pub solver: String,

    /// 预条件器名称
    #[serde(default = "default_preconditioner")]
    pub preconditioner: String,

    /// 光顺器名称（smoothSolver 使用）
    #[serde(default = "default_smoother")]
    pub smoother: String,

    /// 绝对收敛容差
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    /// 相对收敛容差，0 表示关闭相对判据
    #[serde(default)]
    pub rel_tol: f64,

    /// 最大迭代次数
    #[serde(default = "default_max_iter")]
    pub max_iter: usize,

    /// 最小迭代次数，即使残差已满足也必须达到
    #[serde(default)]
    pub min_iter: usize,

    /// 每次收敛检查之间的光顺次数
    #[serde(default = "default_n_sweeps")]
    pub n_sweeps: usize,

    /// 逐次迭代输出残差
    #[serde(default)]
    pub verbose: bool,
}

fn default_preconditioner() -> String {
    "none".to_string()
}
fn default_smoother() -> String {
    "GaussSeidel".to_string()
}
fn default_tolerance() -> f64 {
    1e-6
}
fn default_max_iter() -> usize {
    1000
}
fn default_n_sweeps() -> usize {
    1
}

impl Default for SolverControls {
    fn default() -> Self {
        Self::new("PCG")
    }
}

impl SolverControls {
    /// 以默认参数创建指定求解器的控制参数
    pub fn new(solver: impl Into<String>) -> Self {
        Self {
            solver: solver.into(),
            preconditioner: default_preconditioner(),
            smoother: default_smoother(),
            tolerance: default_tolerance(),
            rel_tol: 0.0,
            max_iter: default_max_iter(),
            min_iter: 0,
            n_sweeps: default_n_sweeps(),
            verbose: false,
        }
    }

    /// 设置预条件器
    pub fn with_preconditioner(mut self, name: impl Into<String>) -> Self {
        self.preconditioner = name.into();
        self
    }

    /// 设置光顺器
    pub fn with_smoother(mut self, name: impl Into<String>) -> Self {
        self.smoother = name.into();
        self
    }

    /// 设置绝对与相对容差
    pub fn with_tolerance(mut self, tolerance: f64, rel_tol: f64) -> Self {
        self.tolerance = tolerance;
        self.rel_tol = rel_tol;
        self
    }

    /// 设置迭代次数上下限
    pub fn with_iterations(mut self, min_iter: usize, max_iter: usize) -> Self {
        self.min_iter = min_iter;
        self.max_iter = max_iter;
        self
    }

    /// 设置光顺次数
    pub fn with_sweeps(mut self, n_sweeps: usize) -> Self {
        self.n_sweeps = n_sweeps;
        self
    }

    /// 启用逐次迭代输出
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    /// 验证参数有效性
    ///
    /// `scope` 用于错误信息中的键前缀（通常为场名）。
    pub fn validate(&self, scope: &str) -> Result<(), ConfigError> {
        if self.solver.trim().is_empty() {
            return Err(ConfigError::invalid(
                format!("{scope}.solver"),
                &self.solver,
                "求解器名称不能为空",
            ));
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(ConfigError::invalid(
                format!("{scope}.tolerance"),
                self.tolerance,
                "必须为有限非负数",
            ));
        }
        if self.rel_tol.is_nan() || self.rel_tol < 0.0 || self.rel_tol >= 1.0 {
            return Err(ConfigError::invalid(
                format!("{scope}.relTol"),
                self.rel_tol,
                "必须在 [0, 1) 范围内",
            ));
        }
        if self.n_sweeps == 0 {
            return Err(ConfigError::invalid(
                format!("{scope}.nSweeps"),
                self.n_sweeps,
                "至少为 1",
            ));
        }
        Ok(())
    }
}
