// apps/ldu_cli/src/commands/solve.rs

//! 求解命令
//!
//! 读取系统文件，按配置（或矩阵结构）选择求解器，输出求解记录。

use super::default_controls;
use crate::system;
use anyhow::{Context, Result};
use clap::Args;
use ldu_config::SolutionConfig;
use ldu_core::{solve_matrix, LduMatrix, SerialCommunicator};
use ldu_foundation::stream::TokenWriter;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

/// 求解参数
#[derive(Args)]
pub struct SolveArgs {
    /// 系统文件路径
    #[arg(short, long)]
    pub system: PathBuf,

    /// JSON 求解配置（缺省时按矩阵结构选择 PCG/DIC 或 PBiCGStab/DILU）
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 场名，用于查找配置条目
    #[arg(short, long, default_value = "psi")]
    pub field: String,

    /// 将解与求解记录写入文件
    #[arg(long)]
    pub write_solution: Option<PathBuf>,

    /// 以 JSON 输出求解记录
    #[arg(long)]
    pub json: bool,
}

/// 执行求解命令
pub fn execute(args: SolveArgs) -> Result<()> {
    let (addr, mut reader) = system::open(&args.system)?;
    let mut matrix = LduMatrix::read(&addr, &mut reader)
        .with_context(|| format!("{}: 矩阵系数无效", args.system.display()))?;
    let fields = system::read_fields(&mut reader, addr.n_cells())
        .with_context(|| format!("{}: 场数据无效", args.system.display()))?;

    info!(
        "系统: {} 单元, {} 面, {} 矩阵",
        addr.n_cells(),
        addr.n_faces(),
        matrix.matrix_type()
    );

    let (controls, relaxation) = match &args.config {
        Some(path) => {
            let config = SolutionConfig::from_file(path)
                .with_context(|| format!("无法加载配置 {}", path.display()))?;
            let controls = config.controls(&args.field)?.clone();
            (controls, config.relaxation.factor(&args.field))
        }
        None => (default_controls(matrix.matrix_type()), None),
    };

    let mut source = fields.source;
    let mut psi = fields.psi.unwrap_or_else(|| vec![0.0; addr.n_cells()]);

    if let Some(alpha) = relaxation {
        info!("{}: 松弛因子 {}", args.field, alpha);
        matrix.relax(&psi, &mut source, alpha)?;
    }

    let start = Instant::now();
    let perf = solve_matrix(
        &matrix,
        &args.field,
        &mut psi,
        &source,
        &controls,
        &SerialCommunicator,
    )?;
    info!("求解耗时: {:.3} ms", start.elapsed().as_secs_f64() * 1000.0);

    if perf.singular {
        warn!("{}: 矩阵奇异，解未更新", args.field);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&perf)?);
    } else {
        println!("{}", perf.to_stream_string()?);
    }

    if let Some(path) = &args.write_solution {
        let file = File::create(path).with_context(|| format!("无法创建 {}", path.display()))?;
        let mut w = TokenWriter::new(BufWriter::new(file));
        system::write_field(&mut w, "psi", &psi)?;
        perf.write(&mut w)?;
        w.newline()?;
        w.flush()?;
        info!("解已写入 {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ldu_core::LduAddressing;
    use ldu_foundation::stream::TokenReader;

    fn chain_system(dir: &std::path::Path) -> PathBuf {
        let path = dir.join("chain.sys");
        let addr = LduAddressing::new(3, vec![0, 1], vec![1, 2]).unwrap();
        let mut m = LduMatrix::new(&addr);
        m.diag_mut().fill(2.0);
        m.upper_mut().fill(-1.0);
        system::write_system(&path, &m, &[1.0, 0.0, 1.0], None).unwrap();
        path
    }

    #[test]
    fn test_solve_writes_solution() {
        let dir = tempfile::tempdir().unwrap();
        let system = chain_system(dir.path());
        let out = dir.path().join("psi.out");

        execute(SolveArgs {
            system,
            config: None,
            field: "T".into(),
            write_solution: Some(out.clone()),
            json: false,
        })
        .unwrap();

        let text = std::fs::read_to_string(&out).unwrap();
        let mut r = TokenReader::new(&text).unwrap();
        r.expect_keyword("psi").unwrap();
        let psi = r.read_scalar_list("psi").unwrap();
        for v in psi {
            assert!((v - 1.0).abs() < 1e-5);
        }
        let perf = ldu_core::SolverPerformance::read(&mut r).unwrap();
        assert_eq!(perf.solver_name, "DICPCG");
        assert!(perf.converged);
    }

    #[test]
    fn test_solve_with_config() {
        let dir = tempfile::tempdir().unwrap();
        let system = chain_system(dir.path());
        let config = dir.path().join("solution.json");
        std::fs::write(
            &config,
            r#"{ "solvers": { "default": { "solver": "smoothSolver", "smoother": "symGaussSeidel" } } }"#,
        )
        .unwrap();

        execute(SolveArgs {
            system,
            config: Some(config),
            field: "T".into(),
            write_solution: None,
            json: true,
        })
        .unwrap();
    }

    #[test]
    fn test_missing_system_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = execute(SolveArgs {
            system: dir.path().join("missing.sys"),
            config: None,
            field: "T".into(),
            write_solution: None,
            json: false,
        });
        assert!(result.is_err());
    }
}
