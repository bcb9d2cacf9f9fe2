// crates/ldu_core/src/lib.rs

//! LDU Core Layer
//!
//! 有限体积离散得到的线性系统 Ax = b 的存储与求解核心。
//!
//! # 模块概览
//!
//! - [`addressing`]: 基于面的稀疏寻址（lower/upper 单元索引）
//! - [`matrix`]: `LduMatrix` 系数存储、矩阵内核、算术与流读写
//! - [`performance`]: `SolverPerformance` 收敛/奇异性记录
//! - [`parallel`]: 分区间归约（`Communicator`）
//! - [`preconditioners`]: none / diagonal / DIC / DILU
//! - [`solvers`]: PCG / PBiCGStab / smoothSolver / diagonal 与运行时选择表
//!
//! # 数据流
//!
//! ```text
//! LduAddressing ──(借用)──> LduMatrix ──> LduSolver::solve ──> SolverPerformance
//!                                                              │
//!                                         reduce_performance <─┘ (跨分区)
//! ```
//!
//! # 示例
//!
//! ```
//! use ldu_config::SolverControls;
//! use ldu_core::{LduAddressing, LduMatrix};
//!
//! // 3 个单元的一维链: 0-1, 1-2
//! let addr = LduAddressing::new(3, vec![0, 1], vec![1, 2]).unwrap();
//! let mut m = LduMatrix::new(&addr);
//! m.diag_mut().copy_from_slice(&[2.0, 2.0, 2.0]);
//! m.upper_mut().copy_from_slice(&[-1.0, -1.0]);
//!
//! let mut psi = vec![0.0; 3];
//! let source = vec![1.0, 0.0, 1.0];
//! let controls = SolverControls::new("PCG")
//!     .with_preconditioner("DIC")
//!     .with_tolerance(1e-12, 0.0);
//! let perf = m.solve("T", &mut psi, &source, &controls).unwrap();
//! assert!(perf.converged);
//! assert!((psi[1] - 1.0).abs() < 1e-10);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod addressing;
pub mod matrix;
pub mod parallel;
pub mod performance;
pub mod preconditioners;
pub mod solvers;
pub mod vector_ops;

/// 层级标识
pub const LAYER: u8 = 3;

pub use addressing::LduAddressing;
pub use matrix::{LduMatrix, MatrixType};
pub use parallel::{
    all_reduce, g_average, g_max, g_sum, g_sum_mag, g_sum_prod, reduce_performance,
    Communicator, SerialCommunicator, ThreadCommunicator,
};
pub use performance::{SolverPerformance, SMALL_RESIDUAL};
pub use preconditioners::LduPreconditioner;
pub use solvers::{solve_matrix, LduSolver, SolverArgs, SolverFactory, SolverRegistry};

/// Prelude 模块
pub mod prelude {
    //! 常用类型预导入
    pub use crate::{
        Communicator, LduAddressing, LduMatrix, LduSolver, MatrixType, SerialCommunicator,
        SolverPerformance, SolverRegistry,
    };
    pub use ldu_config::SolverControls;
    pub use ldu_foundation::{LduError, LduResult, Scalar};
}
