#![allow(dead_code)]

pub mod describe_server;
