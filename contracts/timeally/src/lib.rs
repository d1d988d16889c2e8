#![no_std]

mod actions;
mod admin;
mod contract;
mod error;
mod event;
mod plan;
mod position;
mod release_pool;
mod storage_types;
mod token_interaction;

pub use crate::contract::TimeAllyClient;
pub use crate::error::TimeAllyError;
