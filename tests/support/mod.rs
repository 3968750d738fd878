#![allow(dead_code)]

pub mod fixtures;
pub mod redis_container;
