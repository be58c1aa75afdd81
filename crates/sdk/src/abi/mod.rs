//! Event declarations of the perpetual contracts.
//!
//! Only events are declared, one `interface` per deployed contract, so that
//! alloy generates a [`alloy::sol_types::SolEvent`] type per event and a
//! `<Contract>Events` enum decoding any event of the contract.
//!
//! Facets of the perpetual (`P1Admin`, `P1Margin`, `P1Trade`,
//! `P1Settlement`, `P1FinalSettlement`, `P1Operator`) emit their events from
//! the perpetual proxy address, so they are all part of
//! [`perpetual::PerpetualV1`].
//!
//! Values named `balance`, `makerBalance`, `takerBalance`, `index` and
//! `fundingRate` are packed words, see [`crate::types::Balance`] and
//! [`crate::types::Index`].

pub mod liquidation;
pub mod oracle;
pub mod orders;
pub mod perpetual;
pub mod proxy;
pub mod token;

#[cfg(test)]
mod tests {
    use alloy::{
        primitives::{B256, b256},
        sol_types::SolEvent,
    };

    use super::*;

    fn check<E: SolEvent>(expected: B256) {
        assert_eq!(E::SIGNATURE_HASH, expected, "{}", E::SIGNATURE);
    }

    #[test]
    fn test_signature_hashes_match_deployed_abi() {
        use perpetual::PerpetualV1 as P;
        check::<P::LogAccountSettled>(b256!(
            "022694ffbbd957d26de6b85c040be68ec582d13d40114b29130581793a1bf31e"
        ));
        check::<P::LogDeposit>(b256!(
            "40a9cb3a9707d3a68091d8ef7ffd4158d01d0b2ad92b1e489abe8312dd543023"
        ));
        check::<P::LogIndex>(b256!(
            "995e61c355733308eab39a59e1e1ac167274cdd1ad707fe4d13e127a01076428"
        ));
        check::<P::LogSetOracle>(b256!(
            "ad675642c3cba5442815383698d42cd28889533d9671a6d32cffea58ef0874da"
        ));
        check::<P::LogTrade>(b256!(
            "5171a2ba3550a103fd09ca39b7dcfdf328a5acef18e290c7802d69c8ba73d8d9"
        ));
        check::<P::LogWithdraw>(b256!(
            "74348e8cb927b5536fe550310d0cdf05914498fcb04ad61b99c29e3899b0bce9"
        ));

        use orders::P1Orders as O;
        check::<O::LogOrderApproved>(b256!(
            "bd06df5febc1b0cd2e8ba37a6bb524ae77524c4aa2dc5e0f5ac64f5d11a50b1b"
        ));
        check::<O::LogOrderCanceled>(b256!(
            "4117a4c82505f7102c183e1fb9daa8f8e06d56d6af04479fc417fa8c04902893"
        ));
        check::<O::LogOrderFilled>(b256!(
            "5760b5a80923536b02524ebe3b1f92cc973195ac25559c60564e8db9e02d15ad"
        ));

        check::<oracle::P1FundingOracle::LogFundingRateUpdated>(b256!(
            "2ebf65220b5046a8d9cff102710ef15de0a0bf3709dcc11c3af50abe472e1c22"
        ));
        check::<oracle::P1MirrorOracle::LogMedianPrice>(b256!(
            "b78ebc573f1f889ca9e1e0fb62c843c836f3d3a2e1f43ef62940e9b894f4ea4c"
        ));
        check::<oracle::P1MakerOracle::LogRouteSet>(b256!(
            "16f50a0fb14e340612b259bd02dedc506aae22cf39d7215c0b8d5e85030e87b3"
        ));

        check::<liquidation::P1Deleveraging::LogDeleveraged>(b256!(
            "750eb1daab9f5a06890a5126e981abeeb7d50b590d48e4a9e523016de22985bb"
        ));
        check::<liquidation::P1Liquidation::LogLiquidated>(b256!(
            "6a35c9c914a0cd15e436f6ff44611a525491fdeb755e1044e9841d7e74ba4242"
        ));
        check::<liquidation::P1LiquidatorProxy::LogLiquidatorProxyUsed>(b256!(
            "56f54e5e291f84831023c9ddf34fe42973dae320af11193db2b5f7af27719ba6"
        ));

        check::<proxy::P1CurrencyConverterProxy::LogConvertedDeposit>(b256!(
            "b82979dec0b27d2050fc2ec2e499e291b29e8ce7d4cfd1f711b2557d5e609c08"
        ));
        check::<proxy::P1SoloBridgeProxy::LogTransferred>(b256!(
            "44704b4f0be8f8a46df98e25b1b154fd1305d5c952ca3edee386cb73b34ae241"
        ));
        check::<proxy::AdminUpgradeabilityProxy::AdminChanged>(b256!(
            "7e644d79422f17c01e4894b5f4f588d331ebfa28653d42ae832dc59e38c9798f"
        ));

        check::<token::CollateralToken::Transfer>(b256!(
            "ddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef"
        ));
    }
}
