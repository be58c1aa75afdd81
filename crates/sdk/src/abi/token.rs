alloy::sol! {
    /// ERC-20 events of the collateral token.
    #[sol(all_derives)]
    interface CollateralToken {
        event Transfer(address indexed from, address indexed to, uint256 value);
        event Approval(address indexed owner, address indexed spender, uint256 value);
    }
}
