alloy::sol! {
    /// Events of the upgradeable proxies (PerpetualProxy,
    /// AdminUpgradeabilityProxy).
    #[sol(all_derives)]
    interface AdminUpgradeabilityProxy {
        event AdminChanged(address previousAdmin, address newAdmin);
        event Upgraded(address indexed implementation);
    }

    #[sol(all_derives)]
    interface P1CurrencyConverterProxy {
        event LogConvertedDeposit(
            address indexed account,
            address source,
            address perpetual,
            address exchangeWrapper,
            address tokenFrom,
            address tokenTo,
            uint256 tokenFromAmount,
            uint256 tokenToAmount
        );
        event LogConvertedWithdrawal(
            address indexed account,
            address destination,
            address perpetual,
            address exchangeWrapper,
            address tokenFrom,
            address tokenTo,
            uint256 tokenFromAmount,
            uint256 tokenToAmount
        );
    }

    #[sol(all_derives)]
    interface P1SoloBridgeProxy {
        event LogTransferred(
            address indexed account,
            address perpetual,
            uint256 soloAccountNumber,
            uint256 soloMarketId,
            bool toPerpetual,
            uint256 amount
        );
        event LogSignatureInvalidated(address indexed account, bytes32 transferHash);
    }
}
