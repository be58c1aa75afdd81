alloy::sol! {
    /// Events of the P1Orders trader contract. P1InverseOrders emits the same
    /// events.
    #[sol(all_derives)]
    interface P1Orders {
        struct Fill {
            uint256 amount;
            uint256 price;
            uint256 fee;
            bool isNegativeFee;
        }

        event LogOrderCanceled(address indexed maker, bytes32 orderHash);
        event LogOrderApproved(address indexed maker, bytes32 orderHash);
        event LogOrderFilled(bytes32 orderHash, bytes32 flags, uint256 triggerPrice, Fill fill);
    }
}
