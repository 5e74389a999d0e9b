//! CLI 모듈
//!
//! faq-search CLI 명령어 정의 및 구현

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use crate::config::SearchConfig;
use crate::corpus::{read_json_records, CorpusStore};
use crate::embedding::{create_encoder, has_api_key};
use crate::engine::{SearchEngine, Strategy};

// ============================================================================
// CLI Definition
// ============================================================================

#[derive(Parser)]
#[command(name = "faq-search")]
#[command(version, about = "FAQ 검색 엔진 (Boolean / TF-IDF / 임베딩)", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// JSON 파일로 코퍼스 전체 교체
    Import {
        /// FAQ JSON 파일 경로 ([{"question": ..., "answer": ...}])
        file: PathBuf,
    },

    /// FAQ 레코드 추가
    Add {
        /// 질문
        #[arg(short, long)]
        question: String,

        /// 답변
        #[arg(short, long)]
        answer: String,
    },

    /// FAQ 검색
    Search {
        /// 검색 쿼리
        query: String,

        /// 검색 전략 (exact, extended, lexical, semantic)
        #[arg(short, long, default_value = "lexical")]
        strategy: String,

        /// 결과 개수 제한 (랭킹 전략)
        #[arg(short, long)]
        limit: Option<usize>,

        /// JSON 출력
        #[arg(long)]
        json: bool,
    },

    /// 저장된 FAQ 목록
    List {
        /// 결과 개수 제한
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// 상태 확인
    Status,
}

// ============================================================================
// CLI Runner
// ============================================================================

/// CLI 명령어 실행
pub async fn run(cli: Cli) -> Result<()> {
    let config = SearchConfig::from_env();

    match cli.command {
        Commands::Import { file } => cmd_import(&config, &file).await,
        Commands::Add { question, answer } => cmd_add(&config, &question, &answer).await,
        Commands::Search {
            query,
            strategy,
            limit,
            json,
        } => {
            let limit = limit.unwrap_or(config.top_n);
            cmd_search(&config, &query, &strategy, limit, json).await
        }
        Commands::List { limit } => cmd_list(&config, limit),
        Commands::Status => cmd_status(&config),
    }
}

/// 엔진 생성 (최초 리로드 포함)
///
/// 임베딩은 semantic 검색에서만 필요하므로 그때만 Gemini 인코더를 붙입니다.
/// 나머지 명령은 API 키 없이 동작합니다.
async fn open_engine(config: &SearchConfig, with_encoder: bool) -> Result<SearchEngine> {
    let store = CorpusStore::open(&config.db_path)?;

    let engine = if with_encoder {
        if !has_api_key() {
            bail!("API 키가 설정되지 않았습니다. GEMINI_API_KEY 환경변수를 설정하세요.");
        }
        let encoder = create_encoder(config.embedding_dimension)?;
        SearchEngine::open(store, Arc::new(encoder), config.clone()).await
    } else {
        SearchEngine::open_lexical(store, config.clone()).await
    };

    engine.context("Failed to build search indexes")
}

/// 전략 이름이 임베딩을 필요로 하는지 여부 (알 수 없는 이름은 엔진이 복구)
fn needs_encoder(strategy: &str) -> bool {
    matches!(strategy.parse::<Strategy>(), Ok(Strategy::Semantic))
}

// ============================================================================
// Command Implementations
// ============================================================================

/// JSON 가져오기 (코퍼스 전체 교체)
async fn cmd_import(config: &SearchConfig, file: &Path) -> Result<()> {
    println!("[*] 파일 읽는 중: {}", file.display());
    let records = read_json_records(file)?;

    if records.is_empty() {
        println!("[!] 가져올 FAQ가 없습니다.");
        return Ok(());
    }

    let engine = open_engine(config, false).await?;
    let count = engine
        .load(&records)
        .await
        .context("Failed to load corpus")?;

    println!("[OK] {} 건의 FAQ를 가져왔습니다", count);
    Ok(())
}

/// FAQ 추가
async fn cmd_add(config: &SearchConfig, question: &str, answer: &str) -> Result<()> {
    let engine = open_engine(config, false).await?;
    let id = engine
        .insert(question, answer)
        .await
        .context("Failed to add FAQ")?;

    println!("[OK] FAQ가 추가되었습니다 (ID: {})", id);
    println!("     질문: {}", truncate_text(question, 80));
    Ok(())
}

/// 검색
async fn cmd_search(
    config: &SearchConfig,
    query: &str,
    strategy: &str,
    limit: usize,
    json: bool,
) -> Result<()> {
    let engine = open_engine(config, needs_encoder(strategy)).await?;

    if !json {
        println!("[*] 검색 중 ({}): \"{}\"", strategy, query);
    }

    let response = engine.search_by_name(query, strategy, limit).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    if let Some(err) = &response.error {
        println!("\n[!] 검색 실패: {}", err);
        return Ok(());
    }

    if response.hits.is_empty() {
        println!("\n[!] 검색 결과가 없습니다.");
        return Ok(());
    }

    println!("\n[OK] 검색 결과 ({} 건):\n", response.hits.len());

    let ranked = response.strategy.is_some_and(|s| s.is_ranked());

    for (i, hit) in response.hits.iter().enumerate() {
        match hit.score.filter(|_| ranked) {
            Some(score) => println!(
                "{}. [#{}] (점수: {:.4}) {}",
                i + 1,
                hit.record.id,
                score,
                truncate_text(&hit.record.question, 80)
            ),
            None => println!(
                "{}. [#{}] {}",
                i + 1,
                hit.record.id,
                truncate_text(&hit.record.question, 80)
            ),
        }
        println!("   답변: {}", truncate_text(&hit.record.answer, 200));
        println!();
    }

    Ok(())
}

/// FAQ 목록
fn cmd_list(config: &SearchConfig, limit: usize) -> Result<()> {
    let store = CorpusStore::open(&config.db_path)?;
    let records = store.list(limit)?;

    if records.is_empty() {
        println!("[!] 저장된 FAQ가 없습니다.");
        return Ok(());
    }

    println!("[OK] 저장된 FAQ ({} 건):\n", records.len());

    for record in records {
        println!("  #{:<4} {}", record.id, truncate_text(&record.question, 60));
        println!("        {}", truncate_text(&record.answer, 60));
        println!();
    }

    Ok(())
}

/// 상태 확인
fn cmd_status(config: &SearchConfig) -> Result<()> {
    println!("faq-search v{}", env!("CARGO_PKG_VERSION"));
    println!();

    println!("[*] 데이터베이스: {}", config.db_path.display());
    println!("[*] 기본 결과 개수: {}", config.top_n);
    println!("[*] 인코더 타임아웃: {}초", config.encoder_timeout.as_secs());

    if has_api_key() {
        println!("[OK] API 키: 설정됨");
    } else {
        println!("[!] API 키: 미설정");
        println!("    설정: export GEMINI_API_KEY=your-key");
    }

    match CorpusStore::open(&config.db_path) {
        Ok(store) => match store.stats() {
            Ok(stats) => {
                println!("[OK] 저장된 FAQ: {} 건", stats.record_count);
                println!("     텍스트 크기: {}", format_bytes(stats.total_text_bytes));
            }
            Err(e) => {
                println!("[!] 통계 조회 실패: {}", e);
            }
        },
        Err(e) => {
            println!("[!] CorpusStore 열기 실패: {}", e);
        }
    }

    Ok(())
}

// ============================================================================
// Helper Functions
// ============================================================================

/// 텍스트 자르기 (UTF-8 안전)
fn truncate_text(text: &str, max_chars: usize) -> String {
    let cleaned = text.replace('\n', " ").replace('\r', "");
    let cleaned = cleaned.trim();

    if cleaned.chars().count() <= max_chars {
        cleaned.to_string()
    } else {
        let truncated: String = cleaned.chars().take(max_chars).collect();
        format!("{}...", truncated)
    }
}

/// 바이트 크기 포맷팅
fn format_bytes(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("hello", 10), "hello");
        assert_eq!(truncate_text("hello world", 5), "hello...");
        assert_eq!(truncate_text("hello\nworld", 20), "hello world");
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(500), "500 B");
        assert_eq!(format_bytes(1536), "1.50 KB");
        assert_eq!(format_bytes(1048576), "1.00 MB");
    }

    #[test]
    fn test_truncate_unicode() {
        let korean = "두바이 비자 요건";
        assert_eq!(truncate_text(korean, 3), "두바이...");
    }

    #[test]
    fn test_parse_search_command() {
        let cli = Cli::parse_from([
            "faq-search",
            "search",
            "dubai NOT weather",
            "--strategy",
            "extended",
            "--limit",
            "3",
        ]);

        match cli.command {
            Commands::Search {
                query,
                strategy,
                limit,
                json,
            } => {
                assert_eq!(query, "dubai NOT weather");
                assert_eq!(strategy, "extended");
                assert_eq!(limit, Some(3));
                assert!(!json);
            }
            _ => panic!("expected search command"),
        }
    }

    #[test]
    fn test_only_semantic_needs_encoder() {
        assert!(needs_encoder("semantic"));
        assert!(needs_encoder("bert"));
        assert!(!needs_encoder("exact"));
        assert!(!needs_encoder("extended_boolean"));
        assert!(!needs_encoder("lexical"));
        assert!(!needs_encoder("fuzzy"));
    }

    #[test]
    fn test_parse_add_command() {
        let cli = Cli::parse_from(["faq-search", "add", "-q", "Dubai visa", "-a", "Apply online"]);
        assert!(matches!(cli.command, Commands::Add { .. }));
    }
}
