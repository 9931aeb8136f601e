use crate::types::{OpportunityTx, SearcherError};

/// Gas-pricing model mirrored from the opportunity transaction.
///
/// Produced once by [`match_fee_model`] and consumed everywhere else;
/// downstream code never re-inspects raw fee fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeeVariant {
    Legacy {
        gas_price: u128,
    },
    DynamicFee {
        max_priority_fee_per_gas: u128,
        max_fee_per_gas: u128,
    },
}

/// Decide which fee model the opportunity uses.
///
/// The backrun and bid must mirror the opportunity's fee parameters
/// exactly, so an opportunity that populates neither model, or both,
/// cannot be legally mirrored and is rejected here before anything
/// gets signed.
pub fn match_fee_model(opportunity: &OpportunityTx) -> Result<FeeVariant, SearcherError> {
    let legacy = opportunity.gas_price;
    let priority = opportunity.max_priority_fee_per_gas;
    let cap = opportunity.max_fee_per_gas;

    match (legacy, priority, cap) {
        (Some(_), Some(_), _) | (Some(_), _, Some(_)) => Err(SearcherError::AmbiguousFeeModel(
            "both legacy and dynamic fee fields populated".to_string(),
        )),
        (Some(gas_price), None, None) => Ok(FeeVariant::Legacy { gas_price }),
        (None, Some(max_priority_fee_per_gas), Some(max_fee_per_gas)) => {
            Ok(FeeVariant::DynamicFee {
                max_priority_fee_per_gas,
                max_fee_per_gas,
            })
        }
        (None, Some(_), None) | (None, None, Some(_)) => Err(SearcherError::AmbiguousFeeModel(
            "dynamic fee fields incomplete".to_string(),
        )),
        (None, None, None) => Err(SearcherError::AmbiguousFeeModel(
            "no fee fields populated".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::B256;

    fn opportunity(
        gas_price: Option<u128>,
        priority: Option<u128>,
        cap: Option<u128>,
    ) -> OpportunityTx {
        OpportunityTx {
            raw: vec![0x01].into(),
            hash: B256::repeat_byte(0xaa),
            gas_price,
            max_priority_fee_per_gas: priority,
            max_fee_per_gas: cap,
        }
    }

    #[test]
    fn legacy_opportunity_matches_legacy() {
        let opp = opportunity(Some(30_000_000_000), None, None);
        assert_eq!(
            match_fee_model(&opp).unwrap(),
            FeeVariant::Legacy {
                gas_price: 30_000_000_000
            }
        );
    }

    #[test]
    fn dynamic_opportunity_matches_dynamic() {
        let opp = opportunity(None, Some(2_000_000_000), Some(40_000_000_000));
        assert_eq!(
            match_fee_model(&opp).unwrap(),
            FeeVariant::DynamicFee {
                max_priority_fee_per_gas: 2_000_000_000,
                max_fee_per_gas: 40_000_000_000,
            }
        );
    }

    #[test]
    fn no_fee_fields_is_ambiguous() {
        let opp = opportunity(None, None, None);
        assert!(matches!(
            match_fee_model(&opp),
            Err(SearcherError::AmbiguousFeeModel(_))
        ));
    }

    #[test]
    fn both_models_is_ambiguous() {
        let opp = opportunity(Some(1), Some(2), Some(3));
        assert!(matches!(
            match_fee_model(&opp),
            Err(SearcherError::AmbiguousFeeModel(_))
        ));
    }

    #[test]
    fn partial_dynamic_is_ambiguous() {
        let opp = opportunity(None, Some(2), None);
        assert!(matches!(
            match_fee_model(&opp),
            Err(SearcherError::AmbiguousFeeModel(_))
        ));
    }
}
