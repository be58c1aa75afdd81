alloy::sol! {
    /// Events of the PerpetualV1 contract and all of its facets.
    #[sol(all_derives)]
    interface PerpetualV1 {
        // P1Settlement
        event LogIndex(bytes32 index);
        event LogAccountSettled(
            address indexed account,
            bool isPositive,
            uint256 amount,
            bytes32 balance
        );

        // P1Admin
        event LogSetGlobalOperator(address operator, bool approved);
        event LogSetOracle(address oracle);
        event LogSetFunder(address funder);
        event LogSetMinCollateral(uint256 minCollateral);
        event LogFinalSettlementEnabled(uint256 settlementPrice);

        // P1Margin
        event LogDeposit(address indexed account, uint256 amount, bytes32 balance);
        event LogWithdraw(
            address indexed account,
            address destination,
            uint256 amount,
            bytes32 balance
        );

        // P1Operator
        event LogSetLocalOperator(address indexed sender, address operator, bool approved);

        // P1Trade
        event LogTrade(
            address indexed maker,
            address indexed taker,
            address trader,
            uint256 marginAmount,
            uint256 positionAmount,
            bool isBuy,
            bytes32 makerBalance,
            bytes32 takerBalance
        );

        // P1FinalSettlement
        event LogWithdrawFinalSettlement(address indexed account, uint256 amount, bytes32 balance);
    }
}
