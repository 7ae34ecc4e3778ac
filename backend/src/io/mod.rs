//! # IO Module
//!
//! Interface layer exposing the domain over HTTP.

pub mod rest;
