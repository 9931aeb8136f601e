use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::constants::PFL_ADD_SEARCHER_BUNDLE;
use crate::mev::bundle::Bundle;
use crate::types::{RelayResponse, SearcherError};

/// 번들 제출 인터페이스. 테스트/드라이런에서는 mock으로 대체된다.
#[async_trait]
pub trait BundleRelay: Send + Sync {
    async fn submit_bundle(&self, bundle: &Bundle) -> Result<RelayResponse, SearcherError>;
}

/// FastLane 릴레이 클라이언트
///
/// 완성된 번들을 PFL 릴레이에 JSON-RPC 한 번으로 제출한다. 재시도 없음 —
/// 릴레이가 거절한 번들은 논스 재산출과 기회 재검증 없이는 다시 낼 수
/// 없으므로, 재제출 판단은 호출자 몫이다.
pub struct FastLaneClient {
    relay_url: String,
    auth_username: String,
    auth_key: String,
    http: HttpClient,
    stats: RelayStats,
}

/// 제출 통계
#[derive(Debug, Default)]
pub struct RelayStats {
    bundles_submitted: AtomicU64,
    bundles_rejected: AtomicU64,
    last_submission: Mutex<Option<DateTime<Utc>>>,
}

#[derive(Debug, Serialize)]
struct BundleSubmissionRequest {
    jsonrpc: &'static str,
    id: u64,
    method: &'static str,
    params: Vec<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct BundleSubmissionResponse {
    result: Option<serde_json::Value>,
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

impl FastLaneClient {
    pub fn new(
        relay_url: String,
        auth_username: String,
        auth_key: String,
        timeout: Duration,
    ) -> Result<Self, SearcherError> {
        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SearcherError::Network(format!("HTTP client build failed: {e}")))?;

        info!("🔌 FastLane 릴레이 클라이언트 초기화: {}", relay_url);
        Ok(Self {
            relay_url,
            auth_username,
            auth_key,
            http,
            stats: RelayStats::default(),
        })
    }

    pub fn bundles_submitted(&self) -> u64 {
        self.stats.bundles_submitted.load(Ordering::Relaxed)
    }

    pub fn bundles_rejected(&self) -> u64 {
        self.stats.bundles_rejected.load(Ordering::Relaxed)
    }

    pub fn last_submission(&self) -> Option<DateTime<Utc>> {
        *self.stats.last_submission.lock().unwrap()
    }

    /// 릴레이 응답 본문 해석. HTTP 비성공, JSON-RPC 에러 객체, 깨진
    /// payload는 전부 RelayRejected로 보고한다.
    fn interpret_response(http_success: bool, body: &str) -> Result<RelayResponse, SearcherError> {
        if !http_success {
            return Err(SearcherError::RelayRejected {
                reason: format!("relay returned non-success status: {body}"),
            });
        }

        let parsed: BundleSubmissionResponse =
            serde_json::from_str(body).map_err(|e| SearcherError::RelayRejected {
                reason: format!("malformed relay payload: {e}"),
            })?;

        if let Some(error) = parsed.error {
            return Err(SearcherError::RelayRejected {
                reason: format!("relay error {}: {}", error.code, error.message),
            });
        }

        match parsed.result {
            Some(result) => Ok(RelayResponse { result }),
            None => Err(SearcherError::RelayRejected {
                reason: "relay response carried no result".to_string(),
            }),
        }
    }
}

#[async_trait]
impl BundleRelay for FastLaneClient {
    async fn submit_bundle(&self, bundle: &Bundle) -> Result<RelayResponse, SearcherError> {
        let request = BundleSubmissionRequest {
            jsonrpc: "2.0",
            id: 1,
            method: PFL_ADD_SEARCHER_BUNDLE,
            params: vec![bundle.to_hex_txs()],
        };

        debug!("🚀 번들을 FastLane 릴레이에 제출 중...");
        self.stats.bundles_submitted.fetch_add(1, Ordering::Relaxed);
        *self.stats.last_submission.lock().unwrap() = Some(Utc::now());

        // 도달 불가/타임아웃은 NetworkError. 그 이후의 실패는 전부
        // RelayRejected.
        let response = self
            .http
            .post(&self.relay_url)
            .basic_auth(&self.auth_username, Some(&self.auth_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| SearcherError::Network(format!("relay unreachable: {e}")))?;

        let http_success = response.status().is_success();
        let body = response
            .text()
            .await
            .map_err(|e| SearcherError::Network(format!("relay body read failed: {e}")))?;
        debug!("📨 릴레이 응답: {}", body);

        match Self::interpret_response(http_success, &body) {
            Ok(accepted) => {
                info!("✅ 번들 제출 성공");
                Ok(accepted)
            }
            Err(rejected) => {
                self.stats.bundles_rejected.fetch_add(1, Ordering::Relaxed);
                warn!("❌ 번들 거절: {}", rejected);
                Err(rejected)
            }
        }
    }
}
