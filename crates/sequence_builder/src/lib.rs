//! Sequence Builder Library
//!
//! 시퀀스 카탈로그 (JSON/YAML) → MessagePack → LZ4 압축 → SHA256 체크섬
//! plus the schema and simulation helpers behind the CLI.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use bc_core::{FrameTrace, SchedulerConfig, SequenceCatalog, SequenceTemplate};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{info, warn};

/// 카탈로그 메타데이터
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogMetadata {
    /// 스키마 버전 (예: "v1")
    pub schema_version: String,
    /// SHA256 체크섬 (hex 문자열)
    pub checksum: String,
    /// 생성 시각 (RFC3339 형식)
    pub created_at: String,
    /// 프리셋 개수
    pub preset_count: usize,
    /// 원본 파일 크기 (bytes)
    pub original_size: u64,
    /// 압축 후 크기 (bytes)
    pub compressed_size: u64,
    /// 압축률 (압축 후 / 원본)
    pub compression_ratio: f64,
}

/// Which document `schema_json` describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum SchemaKind {
    Template,
    Catalog,
    Trace,
    Config,
}

fn checksum_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// 카탈로그 파일을 MessagePack+LZ4로 변환
///
/// # Arguments
///
/// * `input` - 입력 카탈로그 (.json / .yaml / .yml)
/// * `output` - 출력 MsgPack+LZ4 파일 경로
/// * `schema_version` - 스키마 버전 문자열
pub fn build_catalog(input: &Path, output: &Path, schema_version: &str) -> Result<CatalogMetadata> {
    // 1. 카탈로그 읽기 (형식은 확장자로 결정)
    let original_size = fs::metadata(input)
        .with_context(|| format!("Failed to stat catalog file: {}", input.display()))?
        .len();
    let catalog = SequenceCatalog::from_path(input)
        .with_context(|| format!("Failed to load catalog: {}", input.display()))?;

    for (name, template) in catalog.iter() {
        let unknown = template.unknown_actions();
        if !unknown.is_empty() {
            warn!(preset = name, ?unknown, "preset contains unknown actions");
        }
    }

    // 2. MessagePack 직렬화
    let msgpack_bytes =
        rmp_serde::to_vec_named(&catalog).context("Failed to serialize to MessagePack")?;

    // 3. LZ4 압축 (크기 정보 포함)
    let compressed = lz4_flex::compress_prepend_size(&msgpack_bytes);
    let compressed_size = compressed.len() as u64;

    // 4. SHA256 체크섬
    let checksum = checksum_hex(&compressed);

    // 5. 출력 파일 쓰기
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }
    fs::write(output, &compressed)
        .with_context(|| format!("Failed to write output file: {}", output.display()))?;

    let compression_ratio = if original_size == 0 {
        1.0
    } else {
        compressed_size as f64 / original_size as f64
    };
    info!(presets = catalog.len(), %checksum, "catalog packed");

    Ok(CatalogMetadata {
        schema_version: schema_version.to_string(),
        checksum,
        created_at: chrono::Utc::now().to_rfc3339(),
        preset_count: catalog.len(),
        original_size,
        compressed_size,
        compression_ratio,
    })
}

/// 팩 파일의 무결성 검증 (체크섬 일치 여부)
pub fn verify_catalog(pack_file: &Path, expected_checksum: &str) -> Result<bool> {
    let bytes = fs::read(pack_file)
        .with_context(|| format!("Failed to read pack file: {}", pack_file.display()))?;
    Ok(checksum_hex(&bytes).eq_ignore_ascii_case(expected_checksum))
}

/// 팩 파일을 압축 해제하여 카탈로그로 디코딩
///
/// With `expected_checksum`, a mismatch is an error and nothing is decoded.
pub fn load_catalog(pack_file: &Path, expected_checksum: Option<&str>) -> Result<SequenceCatalog> {
    // 1. 파일 읽기
    let compressed = fs::read(pack_file)
        .with_context(|| format!("Failed to read pack file: {}", pack_file.display()))?;

    if let Some(expected) = expected_checksum {
        let actual = checksum_hex(&compressed);
        if !actual.eq_ignore_ascii_case(expected) {
            bail!(
                "Checksum mismatch for {}: expected {}, got {}",
                pack_file.display(),
                expected,
                actual
            );
        }
    }

    // 2. LZ4 압축 해제
    let msgpack_bytes =
        lz4_flex::decompress_size_prepended(&compressed).context("Failed to decompress LZ4")?;

    // 3. MessagePack 디코딩
    let catalog: SequenceCatalog =
        rmp_serde::from_slice(&msgpack_bytes).context("Failed to deserialize MessagePack")?;

    Ok(catalog)
}

/// JSON schema for one of the authored document kinds.
pub fn schema_json(kind: SchemaKind) -> Result<String> {
    let schema = match kind {
        SchemaKind::Template => schemars::schema_for!(SequenceTemplate),
        SchemaKind::Catalog => schemars::schema_for!(SequenceCatalog),
        SchemaKind::Trace => schemars::schema_for!(FrameTrace),
        SchemaKind::Config => schemars::schema_for!(SchedulerConfig),
    };
    serde_json::to_string_pretty(&schema).context("Failed to serialize schema")
}

/// Resolve a template by preset name (external catalog over built-ins) or file.
pub fn resolve_template(
    preset: Option<&str>,
    template_file: Option<&Path>,
    catalog_file: Option<&Path>,
) -> Result<SequenceTemplate> {
    match (preset, template_file) {
        (Some(name), None) => {
            let catalog = match catalog_file {
                Some(path) => SequenceCatalog::from_path(path)
                    .with_context(|| format!("Failed to load catalog: {}", path.display()))?
                    .merged_over_builtin(),
                None => SequenceCatalog::builtin().clone(),
            };
            Ok(catalog.require(name)?.clone())
        }
        (None, Some(path)) => SequenceTemplate::from_path(path)
            .with_context(|| format!("Failed to load template: {}", path.display())),
        (Some(_), Some(_)) => bail!("Give either a preset name or a template file, not both"),
        (None, None) => bail!("No sequence given: pass a preset name or a template file"),
    }
}
