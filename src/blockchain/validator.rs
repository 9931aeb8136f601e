use std::collections::HashSet;
use std::sync::Arc;

use alloy::primitives::Address;
use tracing::debug;

use crate::blockchain::ChainApi;
use crate::types::SearcherError;

/// 현재 블록 제안자를 조회하고 FastLane 경매 참여 여부를 판정한다.
pub struct ValidatorMonitor<C: ChainApi> {
    chain: Arc<C>,
    participating: HashSet<Address>,
}

impl<C: ChainApi> ValidatorMonitor<C> {
    pub fn new(chain: Arc<C>, participating: HashSet<Address>) -> Self {
        Self {
            chain,
            participating,
        }
    }

    /// 다음 블록을 제안할 validator 주소. 재시도 없음; 한 번 실패하면
    /// 이번 사이클은 끝난다.
    pub async fn current_validator(&self) -> Result<Address, SearcherError> {
        let validator = self.chain.current_proposer().await?;
        debug!("validator: {}", validator);
        Ok(validator)
    }

    /// 해당 validator가 FastLane 경매에 참여하는지 여부.
    pub fn is_participating(&self, validator: &Address) -> bool {
        self.participating.contains(validator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::MockChainApi;

    #[tokio::test]
    async fn reports_proposer_from_chain() {
        let proposer = Address::repeat_byte(0x11);
        let chain = Arc::new(MockChainApi::with_proposer(proposer));
        let monitor = ValidatorMonitor::new(chain, HashSet::new());

        assert_eq!(monitor.current_validator().await.unwrap(), proposer);
    }

    #[tokio::test]
    async fn propagates_unknown_validator() {
        let chain = Arc::new(MockChainApi::with_proposer_failure());
        let monitor = ValidatorMonitor::new(chain, HashSet::new());

        assert!(matches!(
            monitor.current_validator().await,
            Err(SearcherError::UnknownValidator(_))
        ));
    }

    #[test]
    fn membership_follows_allow_list() {
        let member = Address::repeat_byte(0x22);
        let outsider = Address::repeat_byte(0x33);
        let chain = Arc::new(MockChainApi::with_proposer(member));
        let monitor = ValidatorMonitor::new(chain, [member].into_iter().collect());

        assert!(monitor.is_participating(&member));
        assert!(!monitor.is_participating(&outsider));
    }
}
