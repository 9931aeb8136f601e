use alloy::consensus::{SignableTransaction, Signed, TxEip1559, TxEnvelope, TxLegacy};
use alloy::eips::eip2718::Encodable2718;
use alloy::network::TxSignerSync;
use alloy::primitives::{Address, Bytes, Signature, TxKind, U256};
use tracing::debug;

use crate::abi::encode_submit_bid;
use crate::account::Account;
use crate::mev::fee::FeeVariant;
use crate::types::{OpportunityTx, SearcherError, SignedTx};

/// 백런/입찰 트랜잭션 빌더
///
/// 두 트랜잭션 모두 기회 트랜잭션의 수수료 모델을 그대로 미러링해야
/// 하고, 같은 EOA에서 연속된 논스로 나가야 한다. 논스는 빌드 시작 시점의
/// `account.nonce` 한 번만 읽는다: 백런이 `nonce`, 입찰이 `nonce + 1`.
pub struct TransactionBuilder<'a> {
    account: &'a Account,
    chain_id: u64,
    gas_limit: u64,
    auction_contract: Address,
    searcher_contract: Option<Address>,
}

impl<'a> TransactionBuilder<'a> {
    pub fn new(
        account: &'a Account,
        chain_id: u64,
        gas_limit: u64,
        auction_contract: Address,
        searcher_contract: Option<Address>,
    ) -> Self {
        Self {
            account,
            chain_id,
            gas_limit,
            auction_contract,
            searcher_contract,
        }
    }

    /// 백런 트랜잭션 생성
    ///
    /// 전략 payload를 싣고 searcher 컨트랙트(없으면 자기 자신)를 호출한다.
    /// `nonce = account.nonce`.
    pub fn build_backrun(
        &self,
        opportunity: &OpportunityTx,
        fee: &FeeVariant,
        validator: Address,
        payload: Bytes,
    ) -> Result<SignedTx, SearcherError> {
        let to = self.searcher_contract.unwrap_or_else(|| self.account.address());
        debug!(
            "백런 빌드: opp={} validator={} nonce={}",
            opportunity.hash,
            validator,
            self.account.nonce()
        );

        self.build_and_sign(fee, self.account.nonce(), to, U256::ZERO, payload)
    }

    /// 입찰 트랜잭션 생성
    ///
    /// `submitBid(opportunityHash, validator, searcher)` 호출에
    /// `value = bid_amount`를 실어 경매 컨트랙트로 보낸다. 백런 바로 뒤에
    /// 실행되므로 `nonce = account.nonce + 1`.
    /// 입찰 금액은 decimal 스케일 없이 wei 단위 그대로다.
    pub fn build_bid(
        &self,
        bid_amount: U256,
        opportunity: &OpportunityTx,
        fee: &FeeVariant,
        validator: Address,
    ) -> Result<SignedTx, SearcherError> {
        let calldata = encode_submit_bid(opportunity.hash, validator, self.account.address());
        debug!(
            "입찰 빌드: opp={} bid={} nonce={}",
            opportunity.hash,
            bid_amount,
            self.account.nonce() + 1
        );

        self.build_and_sign(
            fee,
            self.account.nonce() + 1,
            self.auction_contract,
            bid_amount,
            calldata,
        )
    }

    fn build_and_sign(
        &self,
        fee: &FeeVariant,
        nonce: u64,
        to: Address,
        value: U256,
        input: Bytes,
    ) -> Result<SignedTx, SearcherError> {
        match *fee {
            FeeVariant::Legacy { gas_price } => self.sign(TxLegacy {
                chain_id: Some(self.chain_id),
                nonce,
                gas_price,
                gas_limit: self.gas_limit,
                to: TxKind::Call(to),
                value,
                input,
            }),
            FeeVariant::DynamicFee {
                max_priority_fee_per_gas,
                max_fee_per_gas,
            } => self.sign(TxEip1559 {
                chain_id: self.chain_id,
                nonce,
                gas_limit: self.gas_limit,
                max_fee_per_gas,
                max_priority_fee_per_gas,
                to: TxKind::Call(to),
                value,
                access_list: Default::default(),
                input,
            }),
        }
    }

    fn sign<T>(&self, mut tx: T) -> Result<SignedTx, SearcherError>
    where
        T: SignableTransaction<Signature>,
        TxEnvelope: From<Signed<T>>,
    {
        let signature = TxSignerSync::sign_transaction_sync(self.account.signer(), &mut tx)
            .map_err(|e| SearcherError::Signing(e.to_string()))?;
        let envelope: TxEnvelope = tx.into_signed(signature).into();

        Ok(SignedTx {
            hash: *envelope.tx_hash(),
            raw: envelope.encoded_2718().into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::consensus::Transaction;
    use alloy::eips::eip2718::Decodable2718;
    use alloy::primitives::B256;

    const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const GAS_LIMIT: u64 = 500_000;

    fn account(nonce: u64) -> Account {
        Account::from_private_key(TEST_KEY, nonce).unwrap()
    }

    fn auction() -> Address {
        Address::repeat_byte(0xbb)
    }

    fn validator() -> Address {
        Address::repeat_byte(0xcc)
    }

    fn legacy_opportunity() -> OpportunityTx {
        OpportunityTx {
            raw: vec![0xde, 0xad].into(),
            hash: B256::repeat_byte(0x0f),
            gas_price: Some(30_000_000_000),
            max_priority_fee_per_gas: None,
            max_fee_per_gas: None,
        }
    }

    fn dynamic_opportunity() -> OpportunityTx {
        OpportunityTx {
            raw: vec![0xbe, 0xef].into(),
            hash: B256::repeat_byte(0x0e),
            gas_price: None,
            max_priority_fee_per_gas: Some(2_000_000_000),
            max_fee_per_gas: Some(40_000_000_000),
        }
    }

    fn decode(tx: &SignedTx) -> TxEnvelope {
        TxEnvelope::decode_2718(&mut tx.raw.as_ref()).unwrap()
    }

    #[test]
    fn scenario_legacy_nonce_5() {
        // account.nonce = 5, Legacy{30 gwei}, bid = 0.1 native unit
        let account = account(5);
        let builder = TransactionBuilder::new(&account, 137, GAS_LIMIT, auction(), None);
        let opp = legacy_opportunity();
        let fee = FeeVariant::Legacy {
            gas_price: 30_000_000_000,
        };

        let backrun = builder
            .build_backrun(&opp, &fee, validator(), Bytes::new())
            .unwrap();
        let bid = builder
            .build_bid(
                U256::from(100_000_000_000_000_000u128),
                &opp,
                &fee,
                validator(),
            )
            .unwrap();

        let backrun_tx = decode(&backrun);
        let bid_tx = decode(&bid);

        assert_eq!(backrun_tx.nonce(), 5);
        assert_eq!(backrun_tx.gas_price(), Some(30_000_000_000));
        assert_eq!(backrun_tx.to(), Some(account.address()));
        assert_eq!(backrun_tx.value(), U256::ZERO);

        assert_eq!(bid_tx.nonce(), 6);
        assert_eq!(bid_tx.gas_price(), Some(30_000_000_000));
        assert_eq!(bid_tx.to(), Some(auction()));
        assert_eq!(bid_tx.value(), U256::from(100_000_000_000_000_000u128));
        assert_eq!(
            bid_tx.input().as_ref(),
            encode_submit_bid(opp.hash, validator(), account.address()).as_ref()
        );
    }

    #[test]
    fn dynamic_fee_is_mirrored_on_both_transactions() {
        let account = account(0);
        let builder = TransactionBuilder::new(&account, 137, GAS_LIMIT, auction(), None);
        let opp = dynamic_opportunity();
        let fee = FeeVariant::DynamicFee {
            max_priority_fee_per_gas: 2_000_000_000,
            max_fee_per_gas: 40_000_000_000,
        };

        let backrun = builder
            .build_backrun(&opp, &fee, validator(), Bytes::new())
            .unwrap();
        let bid = builder
            .build_bid(U256::from(1u64), &opp, &fee, validator())
            .unwrap();

        for tx in [decode(&backrun), decode(&bid)] {
            assert_eq!(tx.gas_price(), None);
            assert_eq!(tx.max_fee_per_gas(), 40_000_000_000);
            assert_eq!(tx.max_priority_fee_per_gas(), Some(2_000_000_000));
            assert_eq!(tx.gas_limit(), GAS_LIMIT);
        }
    }

    #[test]
    fn bid_nonce_is_backrun_nonce_plus_one() {
        let account = account(41);
        let builder = TransactionBuilder::new(&account, 137, GAS_LIMIT, auction(), None);
        let opp = legacy_opportunity();
        let fee = FeeVariant::Legacy { gas_price: 7 };

        let backrun = builder
            .build_backrun(&opp, &fee, validator(), Bytes::new())
            .unwrap();
        let bid = builder
            .build_bid(U256::from(1u64), &opp, &fee, validator())
            .unwrap();

        assert_eq!(decode(&bid).nonce(), decode(&backrun).nonce() + 1);
    }

    #[test]
    fn backrun_targets_searcher_contract_when_configured() {
        let account = account(0);
        let contract = Address::repeat_byte(0x77);
        let builder =
            TransactionBuilder::new(&account, 137, GAS_LIMIT, auction(), Some(contract));
        let fee = FeeVariant::Legacy { gas_price: 7 };

        let backrun = builder
            .build_backrun(&legacy_opportunity(), &fee, validator(), Bytes::new())
            .unwrap();

        assert_eq!(decode(&backrun).to(), Some(contract));
    }

    #[test]
    fn identical_inputs_produce_identical_encodings() {
        let account = account(5);
        let builder = TransactionBuilder::new(&account, 137, GAS_LIMIT, auction(), None);
        let opp = legacy_opportunity();
        let fee = FeeVariant::Legacy {
            gas_price: 30_000_000_000,
        };
        let bid_amount = U256::from(100_000_000_000_000_000u128);

        let first = (
            builder
                .build_backrun(&opp, &fee, validator(), Bytes::new())
                .unwrap(),
            builder
                .build_bid(bid_amount, &opp, &fee, validator())
                .unwrap(),
        );
        let second = (
            builder
                .build_backrun(&opp, &fee, validator(), Bytes::new())
                .unwrap(),
            builder
                .build_bid(bid_amount, &opp, &fee, validator())
                .unwrap(),
        );

        assert_eq!(first.0.raw, second.0.raw);
        assert_eq!(first.1.raw, second.1.raw);
    }
}
