// apps/ldu_cli/src/system.rs

//! 系统文件
//!
//! 一个系统文件依次包含寻址、矩阵系数块、源项以及可选的初值：
//!
//! ```text
//! nCells 3
//! lowerAddr 2(0 1)
//! upperAddr 2(1 2)
//! diag 3(2 2 2)
//! upper 2(-1 -1)
//! source 3(1 0 1)
//! psi 3{0}
//! ```

use anyhow::{bail, Context, Result};
use ldu_core::{LduAddressing, LduMatrix};
use ldu_foundation::stream::{TokenReader, TokenWriter};
use ldu_foundation::{LduResult, Scalar};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// 矩阵之后的场数据
#[derive(Debug, Clone, PartialEq)]
pub struct Fields {
    pub source: Vec<Scalar>,
    pub psi: Option<Vec<Scalar>>,
}

/// 打开系统文件并读取寻址，返回的读取器停在矩阵块之前
pub fn open(path: &Path) -> Result<(LduAddressing, TokenReader)> {
    let file = File::open(path).with_context(|| format!("无法打开系统文件 {}", path.display()))?;
    let mut reader = TokenReader::from_reader(file)
        .with_context(|| format!("无法读取系统文件 {}", path.display()))?;
    let addr = LduAddressing::read(&mut reader)
        .with_context(|| format!("{}: 寻址无效", path.display()))?;
    Ok((addr, reader))
}

/// 读取可选的单元场块 `keyword N(...)`
fn read_field(r: &mut TokenReader, keyword: &str, n_cells: usize) -> LduResult<Option<Vec<Scalar>>> {
    if !r.peek_keyword(keyword) {
        return Ok(None);
    }
    r.expect_keyword(keyword)?;
    let values = r.read_scalar_list_exact(keyword, n_cells)?;
    r.skip_semicolon();
    Ok(Some(values))
}

/// 读取 `source` 与可选的 `psi`，之后必须到达文件末尾
pub fn read_fields(r: &mut TokenReader, n_cells: usize) -> Result<Fields> {
    let source = match read_field(r, "source", n_cells)? {
        Some(source) => source,
        None => bail!(r.error("source", "缺少 source 块")),
    };
    let psi = read_field(r, "psi", n_cells)?;

    if !r.is_eof() {
        bail!(r.error("system", "源项与初值之后存在多余内容"));
    }
    Ok(Fields { source, psi })
}

/// 写出单元场块
pub fn write_field<W: Write>(w: &mut TokenWriter<W>, keyword: &str, values: &[Scalar]) -> LduResult<()> {
    w.write_keyword(keyword)?;
    w.write_scalar_list(values)?;
    w.newline()
}

/// 写出完整系统文件
pub fn write_system(
    path: &Path,
    matrix: &LduMatrix<'_>,
    source: &[Scalar],
    psi: Option<&[Scalar]>,
) -> Result<()> {
    let file = File::create(path).with_context(|| format!("无法创建 {}", path.display()))?;
    let mut w = TokenWriter::new(BufWriter::new(file));

    matrix.addressing().write(&mut w)?;
    matrix.write(&mut w)?;
    write_field(&mut w, "source", source)?;
    if let Some(psi) = psi {
        write_field(&mut w, "psi", psi)?;
    }
    w.flush()?;
    Ok(())
}
