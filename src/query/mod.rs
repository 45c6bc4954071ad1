//! Query client for the remote variant database.
//!
//! Arguments arrive as loose strings and numbers; they are normalized,
//! validated and compiled into `pbs` requests before a single RPC is issued.

pub mod chrom;
pub mod cli;
pub mod dispatch;
pub mod filter;
pub mod output;
pub mod pagination;
pub mod pedigree;
pub mod region;
pub mod service;
pub mod tokens;

#[cfg(test)]
pub(crate) mod testing;

pub use dispatch::{PageArgs, QueryClient, RegionArgs};
pub use filter::RawFilters;
pub use service::{GrpcVariantService, VariantService};
