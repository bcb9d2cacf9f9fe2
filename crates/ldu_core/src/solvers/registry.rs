// crates/ldu_core/src/solvers/registry.rs

//! 求解器运行时选择表
//!
//! 对称与非对称矩阵各有一张 名称 → 构造函数 表。纯对角矩阵不查表，
//! 总是使用 [`DiagonalSolver`]。
//!
//! ```
//! use ldu_core::solvers::{LduSolver, SolverArgs, SolverRegistry, PcgSolver};
//! use ldu_foundation::LduResult;
//!
//! fn my_cg<'a>(args: SolverArgs<'a>) -> LduResult<Box<dyn LduSolver + 'a>> {
//!     Ok(Box::new(PcgSolver::new(args)))
//! }
//!
//! let mut registry = SolverRegistry::default();
//! registry.register_symmetric("myCG", my_cg);
//! assert!(registry.symmetric_names().contains(&"myCG".to_string()));
//! ```

use super::{
    DiagonalSolver, LduSolver, PBiCgStabSolver, PcgSolver, SmoothSolver, SolverArgs,
};
use crate::matrix::{LduMatrix, MatrixType};
use crate::parallel::Communicator;
use crate::performance::SolverPerformance;
use ldu_config::SolverControls;
use ldu_foundation::{LduError, LduResult, Scalar};
use std::collections::BTreeMap;

/// 求解器构造函数
pub type SolverFactory = for<'a> fn(SolverArgs<'a>) -> LduResult<Box<dyn LduSolver + 'a>>;

fn new_pcg<'a>(args: SolverArgs<'a>) -> LduResult<Box<dyn LduSolver + 'a>> {
    Ok(Box::new(PcgSolver::new(args)))
}

fn new_pbicgstab<'a>(args: SolverArgs<'a>) -> LduResult<Box<dyn LduSolver + 'a>> {
    Ok(Box::new(PBiCgStabSolver::new(args)))
}

fn new_smooth<'a>(args: SolverArgs<'a>) -> LduResult<Box<dyn LduSolver + 'a>> {
    Ok(Box::new(SmoothSolver::new(args)))
}

/// 求解器选择表
#[derive(Debug, Clone)]
pub struct SolverRegistry {
    symmetric: BTreeMap<String, SolverFactory>,
    asymmetric: BTreeMap<String, SolverFactory>,
}

impl Default for SolverRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl SolverRegistry {
    /// 空选择表
    pub fn empty() -> Self {
        Self {
            symmetric: BTreeMap::new(),
            asymmetric: BTreeMap::new(),
        }
    }

    /// 内置求解器：对称 PCG / PBiCGStab / smoothSolver，非对称 PBiCGStab / smoothSolver
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        registry.register_symmetric("PCG", new_pcg);
        registry.register("PBiCGStab", new_pbicgstab);
        registry.register("smoothSolver", new_smooth);
        registry
    }

    /// 注册对称矩阵求解器（同名覆盖）
    pub fn register_symmetric(&mut self, name: impl Into<String>, factory: SolverFactory) {
        self.symmetric.insert(name.into(), factory);
    }

    /// 注册非对称矩阵求解器（同名覆盖）
    pub fn register_asymmetric(&mut self, name: impl Into<String>, factory: SolverFactory) {
        self.asymmetric.insert(name.into(), factory);
    }

    /// 同时注册到两张表
    pub fn register(&mut self, name: impl Into<String>, factory: SolverFactory) {
        let name = name.into();
        self.symmetric.insert(name.clone(), factory);
        self.asymmetric.insert(name, factory);
    }

    /// 对称表中的名称（有序）
    pub fn symmetric_names(&self) -> Vec<String> {
        self.symmetric.keys().cloned().collect()
    }

    /// 非对称表中的名称（有序）
    pub fn asymmetric_names(&self) -> Vec<String> {
        self.asymmetric.keys().cloned().collect()
    }

    /// 按矩阵结构与 `controls.solver` 构造求解器
    ///
    /// # 错误
    ///
    /// - 矩阵缺少对角（空矩阵或仅有非对角）
    /// - 名称不在对应选择表中
    pub fn create<'a>(&self, args: SolverArgs<'a>) -> LduResult<Box<dyn LduSolver + 'a>> {
        let name = args.controls.solver.as_str();
        let (kind, table) = match args.matrix.matrix_type() {
            MatrixType::Diagonal => return Ok(Box::new(DiagonalSolver::new(args))),
            MatrixType::Symmetric => ("对称矩阵求解器", &self.symmetric),
            MatrixType::Asymmetric => ("非对称矩阵求解器", &self.asymmetric),
            other => {
                return Err(LduError::invalid_input(format!(
                    "无法为 {} 矩阵选择求解器（缺少对角系数）",
                    other
                )))
            }
        };

        match table.get(name) {
            Some(factory) => factory(args),
            None => Err(LduError::unknown_selection(
                kind,
                name,
                table.keys().cloned().collect(),
            )),
        }
    }

    /// 选择、求解并输出摘要
    pub fn solve(
        &self,
        matrix: &LduMatrix<'_>,
        field_name: &str,
        psi: &mut [Scalar],
        source: &[Scalar],
        controls: &SolverControls,
        comm: &dyn Communicator,
    ) -> LduResult<SolverPerformance> {
        let mut solver = self.create(SolverArgs {
            field_name,
            matrix,
            controls,
            comm,
        })?;
        let perf = solver.solve(psi, source)?;

        if comm.is_master() {
            perf.print();
            if !perf.converged && !perf.singular {
                log::warn!(
                    "{}: {} 在 {} 次迭代内未收敛",
                    perf.solver_name,
                    perf.field_name,
                    perf.n_iterations
                );
            }
        }
        Ok(perf)
    }
}
