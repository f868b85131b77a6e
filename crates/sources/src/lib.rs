#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/valuescore-rs/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod http;

mod krx;
pub use krx::{KrxClient, KrxConfig, parse_number};

mod fnguide;
pub use fnguide::{FnGuideClient, FnGuideConfig, parse_statement_tables};

mod yahoo;
pub use yahoo::{YahooConfig, YahooPriceHistory, yahoo_symbol};
