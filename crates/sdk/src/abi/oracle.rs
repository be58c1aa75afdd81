alloy::sol! {
    /// Events of P1FundingOracle and P1InverseFundingOracle.
    #[sol(all_derives)]
    interface P1FundingOracle {
        event LogFundingRateUpdated(bytes32 fundingRate);
        event LogFundingRateProviderSet(address fundingRateProvider);
        event OwnershipTransferred(address indexed previousOwner, address indexed newOwner);
    }

    /// Events of P1MirrorOracle and P1MirrorOracleETHUSD.
    #[sol(all_derives)]
    interface P1MirrorOracle {
        event LogMedianPrice(uint256 val, uint256 age);
        event LogSetSigner(address signer, bool authorized);
        event LogSetBar(uint256 bar);
        event LogSetReader(address reader, bool authorized);
        event OwnershipTransferred(address indexed previousOwner, address indexed newOwner);
    }

    /// Events of the P1MakerOracle price router.
    #[sol(all_derives)]
    interface P1MakerOracle {
        event LogRouteSet(address indexed sender, address oracle);
        event LogAdjustmentSet(address indexed oracle, uint256 adjustment);
        event OwnershipTransferred(address indexed previousOwner, address indexed newOwner);
    }
}
