alloy::sol! {
    #[sol(all_derives)]
    interface P1Deleveraging {
        event LogDeleveraged(
            address indexed maker,
            address indexed taker,
            uint256 amount,
            bool isBuy,
            uint256 oraclePrice
        );
        event LogMarkedForDeleveraging(address indexed account);
        event LogUnmarkedForDeleveraging(address indexed account);
        event LogDeleveragingOperatorSet(address deleveragingOperator);
        event OwnershipTransferred(address indexed previousOwner, address indexed newOwner);
    }

    #[sol(all_derives)]
    interface P1Liquidation {
        event LogLiquidated(
            address indexed maker,
            address indexed taker,
            uint256 amount,
            bool isBuy,
            uint256 oraclePrice
        );
    }

    #[sol(all_derives)]
    interface P1LiquidatorProxy {
        event LogLiquidatorProxyUsed(
            address indexed liquidatee,
            address indexed liquidator,
            bool isBuy,
            uint256 liquidationAmount,
            uint256 feeAmount
        );
        event LogInsuranceFundSet(address insuranceFund);
        event LogInsuranceFeeSet(uint256 insuranceFee);
        event OwnershipTransferred(address indexed previousOwner, address indexed newOwner);
    }
}
