use alloy::primitives::{Address, Bytes, U256};
use tracing::{debug, info};

use crate::account::Account;
use crate::blockchain::{ChainApi, ValidatorMonitor};
use crate::config::Config;
use crate::mev::bundle::assemble;
use crate::mev::fee::match_fee_model;
use crate::mev::relay::BundleRelay;
use crate::mev::TransactionBuilder;
use crate::types::{CycleOutcome, OpportunityTx, SearcherError};

/// 빌더 전반에 공유되는 불변 컨텍스트. 전역 가변 상태 대신 한 번 만들어
/// 참조로 넘긴다.
#[derive(Debug, Clone)]
pub struct BuildContext {
    pub chain_id: u64,
    pub gas_limit: u64,
    pub auction_contract: Address,
    pub searcher_contract: Option<Address>,
}

impl BuildContext {
    pub fn from_config(config: &Config) -> Self {
        Self {
            chain_id: config.network.chain_id,
            gas_limit: config.searcher.gas_limit,
            auction_contract: config.fastlane.auction_contract,
            searcher_contract: config.searcher.contract_address,
        }
    }
}

/// 기회 1건 처리 파이프라인
///
/// `Idle → ValidatorQueried → {NotEligible → Skipped} | {Eligible →
/// BundleBuilt → Submitted → Result}`. 사이클 동안 Account를 배타적으로
/// 소유하므로 같은 계정 위에서 논스가 경합할 수 없다. 기회마다 새
/// 사이클을 돌린다.
pub struct SubmissionPipeline<C: ChainApi, R: BundleRelay> {
    monitor: ValidatorMonitor<C>,
    relay: R,
    account: Account,
    context: BuildContext,
}

impl<C: ChainApi, R: BundleRelay> SubmissionPipeline<C, R> {
    pub fn new(
        monitor: ValidatorMonitor<C>,
        relay: R,
        account: Account,
        context: BuildContext,
    ) -> Self {
        Self {
            monitor,
            relay,
            account,
            context,
        }
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    pub fn account_mut(&mut self) -> &mut Account {
        &mut self.account
    }

    pub fn relay(&self) -> &R {
        &self.relay
    }

    /// 기회 1건에 대해 번들을 만들어 제출한다.
    ///
    /// 논스는 번들이 실제로 만들어진 시점에 전진한다. 릴레이 수락 여부와는
    /// 무관하다. validator 조회나 수수료 매칭에서 실패하면 논스는 그대로다.
    pub async fn run_cycle(
        &mut self,
        opportunity: &OpportunityTx,
        bid_amount: U256,
        payload: Bytes,
    ) -> Result<CycleOutcome, SearcherError> {
        info!("🔎 validator 조회: opp={}", opportunity.hash);
        let validator = self.monitor.current_validator().await?;

        if !self.monitor.is_participating(&validator) {
            info!("⏭️ validator {} 는 FastLane 미참여 - 사이클 종료", validator);
            return Ok(CycleOutcome::Skipped { validator });
        }

        let fee = match_fee_model(opportunity)?;
        debug!("수수료 모델 매칭: {:?}", fee);

        let builder = TransactionBuilder::new(
            &self.account,
            self.context.chain_id,
            self.context.gas_limit,
            self.context.auction_contract,
            self.context.searcher_contract,
        );

        let backrun = builder.build_backrun(opportunity, &fee, validator, payload)?;
        let bid = builder.build_bid(bid_amount, opportunity, &fee, validator)?;

        let bundle = assemble(opportunity, backrun, bid);
        // 번들이 완성됐으니 백런/입찰 논스 두 개가 소비된 것으로 본다.
        self.account.advance_nonce(2);

        info!("📦 번들 완성 (validator={}, bid={})", validator, bid_amount);
        let response = self.relay.submit_bundle(&bundle).await?;

        Ok(CycleOutcome::Submitted { response })
    }
}
