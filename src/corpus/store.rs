//! Corpus Store - rusqlite 기반 FAQ 저장소
//!
//! 질문/답변 레코드의 원본(single source of truth)입니다.
//! 인덱스는 이 저장소의 스냅샷에서만 파생됩니다.
//! 기본 저장 위치: ~/.faq-search/faqs.db (`SearchConfig::db_path`)

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OpenFlags, Row};
use serde::{Deserialize, Serialize};

use crate::error::SearchError;

// ============================================================================
// Types
// ============================================================================

/// 저장된 FAQ 레코드
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: i64,
    pub question: String,
    pub answer: String,
}

impl Record {
    /// 질문 + 답변을 공백 하나로 이어붙인 문서 텍스트
    pub fn document_text(&self) -> String {
        format!("{} {}", self.question, self.answer)
    }
}

/// 코퍼스 (삽입 순서 = id 오름차순)
pub type Corpus = Vec<Record>;

/// 새 레코드 입력용 구조체 (JSON 가져오기 형식과 동일)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRecord {
    pub question: String,
    pub answer: String,
}

impl NewRecord {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// 저장소 통계
#[derive(Debug, Clone, Serialize)]
pub struct StoreStats {
    pub record_count: usize,
    pub total_text_bytes: usize,
    /// 인메모리 저장소이면 None
    pub db_path: Option<PathBuf>,
}

// ============================================================================
// CorpusStore
// ============================================================================

/// Corpus Store - 동기 FAQ 저장소
///
/// 쓰기 직렬화는 내부 Mutex가 담당하고,
/// insert + reload 트랜잭션 단위의 직렬화는 `SearchEngine`이 담당합니다.
#[derive(Clone)]
pub struct CorpusStore {
    conn: Arc<Mutex<Connection>>,
    db_path: Option<PathBuf>,
}

impl CorpusStore {
    /// 저장소 열기 (없으면 생성)
    ///
    /// # Arguments
    /// * `path` - DB 파일 경로
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)
                    .context("Failed to create database directory")?;
            }
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .context("Failed to open SQLite database")?;

        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
            db_path: Some(path.to_path_buf()),
        };

        store.initialize()?;
        Ok(store)
    }

    /// 인메모리 저장소 (테스트, 임베디드 용도)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;

        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
            db_path: None,
        };

        store.initialize()?;
        Ok(store)
    }

    /// DB 경로 반환
    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock error: {}", e))
    }

    /// 스키마 초기화
    fn initialize(&self) -> Result<()> {
        let conn = self.lock()?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS faqs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                question TEXT NOT NULL,
                answer TEXT NOT NULL
            )",
            [],
        )
        .context("Failed to create faqs table")?;

        tracing::debug!("Corpus store initialized at {:?}", self.db_path);
        Ok(())
    }

    /// 코퍼스 전체 교체
    ///
    /// 기존 레코드를 모두 삭제하고 `records`를 순서대로 삽입합니다.
    /// 하나라도 검증에 실패하면 아무것도 바뀌지 않습니다.
    pub fn load(&self, records: &[NewRecord]) -> Result<Corpus> {
        for record in records {
            validate_record(&record.question, &record.answer)?;
        }

        let mut conn = self.lock()?;
        let tx = conn.transaction().context("Failed to begin transaction")?;

        tx.execute("DELETE FROM faqs", [])
            .context("Failed to clear faqs table")?;

        {
            let mut stmt = tx.prepare("INSERT INTO faqs (question, answer) VALUES (?1, ?2)")?;
            for record in records {
                stmt.execute(params![record.question, record.answer])
                    .context("Failed to insert record")?;
            }
        }

        tx.commit().context("Failed to commit corpus load")?;
        drop(conn);

        let corpus = self.corpus()?;
        tracing::info!("Loaded {} FAQs into the corpus store", corpus.len());
        Ok(corpus)
    }

    /// 레코드 추가
    ///
    /// 질문 또는 답변이 비어있으면 `SearchError::Validation`으로 실패합니다.
    /// 인덱스는 다시 빌드하지 않습니다.
    pub fn insert(&self, question: &str, answer: &str) -> Result<i64> {
        validate_record(question, answer)?;

        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO faqs (question, answer) VALUES (?1, ?2)",
            params![question, answer],
        )
        .context("Failed to insert FAQ")?;

        let id = conn.last_insert_rowid();
        tracing::info!("Added new FAQ (id={}): {}", id, question);

        Ok(id)
    }

    /// 코퍼스 스냅샷 (id 오름차순)
    pub fn corpus(&self) -> Result<Corpus> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT id, question, answer FROM faqs ORDER BY id ASC")?;

        let records = stmt
            .query_map([], row_to_record)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("Failed to read corpus")?;

        Ok(records)
    }

    /// ID로 레코드 조회
    pub fn get(&self, id: i64) -> Result<Option<Record>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT id, question, answer FROM faqs WHERE id = ?1")?;

        let mut rows = stmt.query_map(params![id], row_to_record)?;
        rows.next()
            .transpose()
            .context("Failed to read record")
    }

    /// 레코드 목록 (id 오름차순, 최대 `limit`개)
    pub fn list(&self, limit: usize) -> Result<Vec<Record>> {
        let conn = self.lock()?;
        let mut stmt =
            conn.prepare("SELECT id, question, answer FROM faqs ORDER BY id ASC LIMIT ?1")?;

        let records = stmt
            .query_map(params![limit as i64], row_to_record)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("Failed to list records")?;

        Ok(records)
    }

    /// 레코드 수
    pub fn len(&self) -> Result<usize> {
        let conn = self.lock()?;
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM faqs", [], |row| row.get(0))
            .context("Failed to count records")?;
        Ok(count as usize)
    }

    /// 비어있는지 여부
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// 저장소 통계
    pub fn stats(&self) -> Result<StoreStats> {
        let conn = self.lock()?;

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM faqs", [], |row| row.get(0))
            .context("Failed to count records")?;

        let total_size: i64 = conn
            .query_row(
                "SELECT COALESCE(SUM(LENGTH(question) + LENGTH(answer)), 0) FROM faqs",
                [],
                |row| row.get(0),
            )
            .context("Failed to measure corpus size")?;

        Ok(StoreStats {
            record_count: count as usize,
            total_text_bytes: total_size as usize,
            db_path: self.db_path.clone(),
        })
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<Record> {
    Ok(Record {
        id: row.get(0)?,
        question: row.get(1)?,
        answer: row.get(2)?,
    })
}

/// 질문/답변 검증 (공백만 있는 경우도 빈 값으로 취급)
pub fn validate_record(question: &str, answer: &str) -> std::result::Result<(), SearchError> {
    if question.trim().is_empty() {
        return Err(SearchError::Validation("question must not be empty".to_string()));
    }
    if answer.trim().is_empty() {
        return Err(SearchError::Validation("answer must not be empty".to_string()));
    }
    Ok(())
}

/// JSON 파일에서 레코드 읽기
///
/// 형식: `[{"question": "...", "answer": "..."}, ...]`
pub fn read_json_records(path: &Path) -> Result<Vec<NewRecord>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let records: Vec<NewRecord> = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse FAQ records from {}", path.display()))?;

    Ok(records)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (TempDir, CorpusStore) {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("test.db");
        let store = CorpusStore::open(&db_path).unwrap();
        (dir, store)
    }

    #[test]
    fn test_insert_and_get() {
        let (_dir, store) = create_test_store();

        let id = store
            .insert("What is a tourist visa?", "A visa for short visits.")
            .unwrap();
        assert!(id > 0);

        let record = store.get(id).unwrap().unwrap();
        assert_eq!(record.question, "What is a tourist visa?");
        assert_eq!(record.answer, "A visa for short visits.");

        assert!(store.get(id + 100).unwrap().is_none());
    }

    #[test]
    fn test_insert_rejects_empty_fields() {
        let store = CorpusStore::open_in_memory().unwrap();

        let err = store.insert("", "answer").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SearchError>(),
            Some(SearchError::Validation(_))
        ));

        let err = store.insert("question", "   ").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SearchError>(),
            Some(SearchError::Validation(_))
        ));

        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_corpus_is_insertion_ordered() {
        let store = CorpusStore::open_in_memory().unwrap();
        let first = store.insert("q1", "a1").unwrap();
        let second = store.insert("q2", "a2").unwrap();
        let third = store.insert("q3", "a3").unwrap();

        let ids: Vec<i64> = store.corpus().unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![first, second, third]);
    }

    #[test]
    fn test_load_replaces_corpus() {
        let store = CorpusStore::open_in_memory().unwrap();
        store.insert("old question", "old answer").unwrap();

        let corpus = store
            .load(&[
                NewRecord::new("Dubai visa requirements", "Apply online."),
                NewRecord::new("Dubai weather", "Hot in summer."),
            ])
            .unwrap();

        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus[0].question, "Dubai visa requirements");
        assert_eq!(corpus[1].question, "Dubai weather");
        assert!(corpus[0].id < corpus[1].id);
        assert_eq!(store.len().unwrap(), 2);
    }

    #[test]
    fn test_load_is_all_or_nothing() {
        let store = CorpusStore::open_in_memory().unwrap();
        store.insert("kept", "record").unwrap();

        let result = store.load(&[NewRecord::new("valid", "row"), NewRecord::new("", "bad")]);
        assert!(result.is_err());

        let corpus = store.corpus().unwrap();
        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus[0].question, "kept");
    }

    #[test]
    fn test_ids_not_reused_after_load() {
        let store = CorpusStore::open_in_memory().unwrap();
        let old_id = store.insert("q", "a").unwrap();

        let corpus = store.load(&[NewRecord::new("q2", "a2")]).unwrap();
        assert!(corpus[0].id > old_id);
    }

    #[test]
    fn test_list_limit() {
        let store = CorpusStore::open_in_memory().unwrap();
        for i in 0..5 {
            store
                .insert(&format!("Question {}", i), &format!("Answer {}", i))
                .unwrap();
        }

        assert_eq!(store.list(3).unwrap().len(), 3);
        assert_eq!(store.list(10).unwrap().len(), 5);
    }

    #[test]
    fn test_stats() {
        let (_dir, store) = create_test_store();
        store.insert("12345", "67890").unwrap(); // 10 bytes

        let stats = store.stats().unwrap();
        assert_eq!(stats.record_count, 1);
        assert_eq!(stats.total_text_bytes, 10);
        assert!(stats.db_path.is_some());
    }

    #[test]
    fn test_stats_reports_sql_failure() {
        let (_dir, store) = create_test_store();
        store.insert("q", "a").unwrap();
        store.lock().unwrap().execute("DROP TABLE faqs", []).unwrap();

        let err = store.stats().unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to count records"));
        assert!(store.len().is_err());
    }

    #[test]
    fn test_reopen_persists() {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("persist.db");

        {
            let store = CorpusStore::open(&db_path).unwrap();
            store.insert("persisted question", "persisted answer").unwrap();
        }

        let store = CorpusStore::open(&db_path).unwrap();
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_read_json_records() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("faqs.json");
        std::fs::write(
            &path,
            r#"[{"question": "Q1", "answer": "A1"}, {"question": "Q2", "answer": "A2"}]"#,
        )
        .unwrap();

        let records = read_json_records(&path).unwrap();
        assert_eq!(records, vec![NewRecord::new("Q1", "A1"), NewRecord::new("Q2", "A2")]);
    }

    #[test]
    fn test_document_text() {
        let record = Record {
            id: 1,
            question: "Dubai visa".to_string(),
            answer: "Apply online".to_string(),
        };
        assert_eq!(record.document_text(), "Dubai visa Apply online");
    }
}
