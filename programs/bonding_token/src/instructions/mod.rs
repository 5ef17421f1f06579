pub mod init_protocol;
pub mod launch_coin;
pub mod quote;
pub mod trade_coin;

pub use init_protocol::*;
pub use launch_coin::*;
pub use quote::*;
pub use trade_coin::*;
