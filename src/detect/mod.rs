//! Detection strategies. Each is a pure decision function from baseline and
//! candidate responses (plus the payload that produced them) to a tagged
//! verdict; the coordinator owns sequencing, short-circuiting, and turning
//! verdicts into findings.

pub mod boolean;
pub mod dom_sinks;
pub mod error_sql;
pub mod reflection;
pub mod timing;
