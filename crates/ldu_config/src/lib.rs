// crates/ldu_config/src/lib.rs

//! LDU Config Layer
//!
//! 配置层，提供线性求解器控制参数和松弛因子。
//! 本层完全无泛型，所有数值使用 f64，便于 JSON 序列化。
//!
//! # 模块概览
//!
//! - [`solver_controls`]: 单个方程的求解器控制参数
//! - [`solution`]: 按场名组织的求解配置与松弛因子
//! - [`error`]: 配置错误类型
//!
//! # 层级架构
//!
//! ```text
//! Layer 5: ldu_cli        ─> uses SolutionConfig
//! Layer 3: ldu_core       ─> consumes SolverControls
//! Layer 2: ldu_config     ─> SolverControls, SolutionConfig (本层)
//! Layer 1: ldu_foundation
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod solution;
pub mod solver_controls;

/// 层级标识
pub const LAYER: u8 = 2;

pub use error::ConfigError;
pub use solution::{RelaxationFactors, SolutionConfig, DEFAULT_ENTRY};
pub use solver_controls::SolverControls;
