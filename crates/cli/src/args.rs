use alloy::primitives::{Address, B256, TxHash};
use clap::{Args, Parser, Subcommand, ValueEnum};

pub(crate) const DEFAULT_RPC_PROVIDER: &str = "https://exchaintestrpc.okex.org";
pub(crate) const DEFAULT_RPC_THROTTLING: u32 = 10;

#[derive(Parser, Debug)]
#[command(name = "perpetual-events-cli", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// RPC endpoint to connect to
    #[arg(long, global = true, default_value_t = DEFAULT_RPC_PROVIDER.to_string())]
    pub rpc: String,

    /// RPC throttling (req/sec) [default: 10 for default RPC provider and
    /// none for custom]
    #[arg(long, global = true)]
    pub rpc_throttle: Option<u32>,

    /// PerpetualV1 proxy address [default: testnet deployment]
    #[arg(long, global = true)]
    pub perpetual: Option<Address>,

    /// P1Orders address [default: testnet deployment]
    #[arg(long, global = true)]
    pub orders: Option<Address>,

    /// P1MakerOracle address [default: testnet deployment]
    #[arg(long, global = true)]
    pub maker_oracle: Option<Address>,

    /// Margin token address [default: testnet deployment]
    #[arg(long, global = true)]
    pub margin: Option<Address>,

    /// Maximum number of blocks per `eth_getLogs` request
    #[arg(long, global = true, default_value_t = 5_000)]
    pub max_block_range: u64,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Query historical events
    Filter {
        #[command(flatten)]
        event: EventArgs,

        /// Maximum number of events to show [default: all]
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Watch live events until terminated (Ctrl+C)
    Watch {
        #[command(flatten)]
        event: EventArgs,

        /// Number of events to wait for [default: unlimited]
        #[arg(long)]
        num_events: Option<usize>,
    },
    /// Decode events of the known contracts emitted by a transaction
    Parse {
        /// Transaction hash
        tx: TxHash,
    },
}

#[derive(Args, Debug)]
pub struct EventArgs {
    /// Contract emitting the event
    #[arg(value_enum)]
    pub contract: Contract,

    /// Event name, e.g. `LogTrade`
    pub event: String,

    /// First block to include [default: deployment block for `filter`, next
    /// block for `watch`]
    #[arg(long)]
    pub from_block: Option<u64>,

    /// Last block to include [default: latest block for `filter`, unbounded
    /// for `watch`]
    #[arg(long)]
    pub to_block: Option<u64>,

    /// Allowed values of the first indexed field (32-byte hex)
    #[arg(long)]
    pub topic1: Vec<B256>,

    /// Allowed values of the second indexed field (32-byte hex)
    #[arg(long)]
    pub topic2: Vec<B256>,

    /// Allowed values of the third indexed field (32-byte hex)
    #[arg(long)]
    pub topic3: Vec<B256>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Contract {
    Perpetual,
    Orders,
    MakerOracle,
    Margin,
}
