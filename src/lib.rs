// src/lib.rs

//! BookShelf storefront library

pub mod affiliate;
pub mod catalog;
pub mod config;
pub mod error;
pub mod interaction;
pub mod inventory;
pub mod page;
pub mod render;
pub mod search;
pub mod sections;
pub mod session;
pub mod storage;
