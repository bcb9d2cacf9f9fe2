// crates/ldu_config/src/solution.rs

//! SolutionConfig - 按场名组织的求解配置
//!
//! ```json
//! {
//!   "solvers": {
//!     "p": { "solver": "PCG", "preconditioner": "DIC", "tolerance": 1e-7 },
//!     "default": { "solver": "smoothSolver", "smoother": "GaussSeidel" }
//!   },
//!   "relaxation": { "equations": { "U": 0.7 } }
//! }
//! ```
//!
//! 未单独配置的场回退到 `"default"` 条目。

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::ConfigError;
use crate::solver_controls::SolverControls;

/// 回退条目的键名
pub const DEFAULT_ENTRY: &str = "default";

/// 方程松弛因子
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelaxationFactors {
    /// 场名 → 松弛因子
    #[serde(default)]
    pub equations: BTreeMap<String, f64>,
}

impl RelaxationFactors {
    /// 查询场的松弛因子，未配置时回退到 `"default"`
    pub fn factor(&self, field: &str) -> Option<f64> {
        self.equations
            .get(field)
            .or_else(|| self.equations.get(DEFAULT_ENTRY))
            .copied()
    }
}

/// 求解配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SolutionConfig {
    /// 场名 → 求解器控制参数
    #[serde(default)]
    pub solvers: BTreeMap<String, SolverControls>,

    /// 松弛因子
    #[serde(default)]
    pub relaxation: RelaxationFactors,
}

impl SolutionConfig {
    /// 从 JSON 文件加载并验证
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json(&content)
    }

    /// 从 JSON 文本解析并验证
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: SolutionConfig =
            serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// 保存到 JSON 文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))?;
        std::fs::write(path, content).map_err(ConfigError::Io)?;
        Ok(())
    }

    /// 设置某个场的求解器控制参数
    pub fn insert(&mut self, field: impl Into<String>, controls: SolverControls) {
        self.solvers.insert(field.into(), controls);
    }

    /// 查询场的求解器控制参数，未配置时回退到 `"default"`
    pub fn controls(&self, field: &str) -> Result<&SolverControls, ConfigError> {
        self.solvers
            .get(field)
            .or_else(|| self.solvers.get(DEFAULT_ENTRY))
            .ok_or_else(|| ConfigError::Missing(format!("solvers.{field}")))
    }

    /// 验证所有条目
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, controls) in &self.solvers {
            controls.validate(field)?;
        }
        for (field, &alpha) in &self.relaxation.equations {
            if !(0.0..=1.0).contains(&alpha) {
                return Err(ConfigError::invalid(
                    format!("relaxation.equations.{field}"),
                    alpha,
                    "松弛因子必须在 [0, 1] 范围内",
                ));
            }
        }
        Ok(())
    }
}
