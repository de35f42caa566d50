pub mod agent;
pub mod blokus_duo;
pub mod dtp_server;

pub mod utils {
    pub mod prelude {
        pub use anyhow::{anyhow, Context, Error};
        pub type Result<T> = anyhow::Result<T, Error>;
        pub use primitive_types::U256;

        pub use std::{
            collections::HashSet,
            ops::{Add, Sub},
        };
    }
}

pub mod prelude {
    pub use super::agent::*;
    pub use super::blokus_duo::prelude::*;
    pub use super::dtp_server::*;
    pub use super::utils::prelude::*;
}
