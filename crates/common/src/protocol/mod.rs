// Wire contracts: the worker stdio protocol and the front-end event channel.

pub mod events;
pub mod jsonrpc;
pub mod methods;
