use std::str::FromStr;
use std::time::Duration;

use alloy::primitives::Address;
use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::constants::{BOR_GET_AUTHOR, ETH_GET_TRANSACTION_COUNT};
use crate::types::SearcherError;

/// 체인 조회 인터페이스
///
/// 파이프라인이 bor 노드에 요구하는 최소한의 표면. 테스트에서는
/// mock 구현으로 대체된다.
#[async_trait]
pub trait ChainApi: Send + Sync {
    /// 다음 블록 제안자 조회
    async fn current_proposer(&self) -> Result<Address, SearcherError>;

    /// 계정의 트랜잭션 카운트(논스) 조회
    async fn transaction_count(&self, address: Address) -> Result<u64, SearcherError>;
}

/// bor 노드 JSON-RPC 클라이언트
///
/// 로컬 bor 노드에 직접 JSON-RPC를 보낸다. `bor_getAuthor`는 표준
/// 메서드가 아니므로 raw 요청으로 처리한다.
pub struct ChainClient {
    endpoint: String,
    http: HttpClient,
}

#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    method: &'a str,
    params: serde_json::Value,
    id: u64,
}

#[derive(Debug, Deserialize)]
struct JsonRpcReply {
    result: Option<serde_json::Value>,
    error: Option<JsonRpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcErrorObject {
    code: i64,
    message: String,
}

impl ChainClient {
    pub fn new(endpoint: String, timeout: Duration) -> Result<Self, SearcherError> {
        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SearcherError::Network(format!("HTTP client build failed: {e}")))?;

        info!("🔌 bor RPC 클라이언트 초기화: {}", endpoint);
        Ok(Self { endpoint, http })
    }

    /// 단일 JSON-RPC 호출. 전송 실패/타임아웃만 여기서 NetworkError로
    /// 수렴하고, 응답 본문 해석은 호출자 몫이다.
    async fn call_raw(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<String, SearcherError> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id: 1,
        };

        let response = self
            .http
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| SearcherError::Network(format!("{method} request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(SearcherError::Network(format!(
                "{method} returned HTTP {}",
                response.status()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| SearcherError::Network(format!("{method} body read failed: {e}")))
    }
}

#[async_trait]
impl ChainApi for ChainClient {
    async fn current_proposer(&self) -> Result<Address, SearcherError> {
        let body = self.call_raw(BOR_GET_AUTHOR, serde_json::json!([])).await?;

        // 응답이 비었거나 형식이 어긋나면 sentinel 문자열 대신
        // UnknownValidator를 돌려준다.
        let reply: JsonRpcReply = serde_json::from_str(&body)
            .map_err(|e| SearcherError::UnknownValidator(format!("unparseable response: {e}")))?;

        if let Some(error) = reply.error {
            return Err(SearcherError::UnknownValidator(format!(
                "node error {}: {}",
                error.code, error.message
            )));
        }

        let author = reply
            .result
            .as_ref()
            .and_then(|v| v.as_str())
            .ok_or_else(|| SearcherError::UnknownValidator("missing result".to_string()))?;

        let validator = Address::from_str(author)
            .map_err(|e| SearcherError::UnknownValidator(format!("bad address {author}: {e}")))?;

        debug!("현재 제안자: {}", validator);
        Ok(validator)
    }

    async fn transaction_count(&self, address: Address) -> Result<u64, SearcherError> {
        let params = serde_json::json!([address, "latest"]);
        let body = self.call_raw(ETH_GET_TRANSACTION_COUNT, params).await?;

        let reply: JsonRpcReply = serde_json::from_str(&body)
            .map_err(|e| SearcherError::Encoding(format!("unparseable nonce response: {e}")))?;

        if let Some(error) = reply.error {
            return Err(SearcherError::Network(format!(
                "eth_getTransactionCount error {}: {}",
                error.code, error.message
            )));
        }

        let hex_nonce = reply
            .result
            .as_ref()
            .and_then(|v| v.as_str())
            .ok_or_else(|| SearcherError::Encoding("missing nonce result".to_string()))?;

        u64::from_str_radix(hex_nonce.trim_start_matches("0x"), 16)
            .map_err(|e| SearcherError::Encoding(format!("bad nonce {hex_nonce}: {e}")))
    }
}
