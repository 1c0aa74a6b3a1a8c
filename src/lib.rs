// ============================================================================
// Strict linting - Dangerous or non-idiomatic practices are forbidden
// ============================================================================

#![deny(warnings)]                    // All warnings are treated as errors
#![deny(unsafe_code)]                 // Unsafe code is forbidden
#![deny(missing_docs)]                // All public items must be documented
#![deny(dead_code)]                   // Unused code is forbidden
#![deny(non_camel_case_types)]        // Types must follow CamelCase convention

// Additional strictness - Leave nothing unchecked
#![deny(unused_imports)]              // Unused imports are forbidden
#![deny(unused_variables)]            // Unused variables are forbidden
#![deny(unused_must_use)]             // Must handle Result and Option explicitly
#![deny(non_snake_case)]              // Variables and functions must be snake_case
#![deny(non_upper_case_globals)]      // Constants must be UPPER_CASE
#![deny(nonstandard_style)]           // Non-standard code style is forbidden
#![forbid(unsafe_op_in_unsafe_fn)]    // Unsafe ops in unsafe fns are forbidden

// Clippy lints (warnings only)
#![warn(clippy::all)]                 // All standard Clippy lints
#![warn(clippy::pedantic)]            // Very strict Clippy lints
#![warn(clippy::nursery)]             // Experimental lints
#![warn(clippy::unwrap_used)]         // unwrap() warning
#![warn(clippy::expect_used)]         // expect() warning
#![warn(clippy::panic)]               // panic!() warning
#![warn(clippy::print_stdout)]        // println!() warning
#![warn(clippy::todo)]                // TODO warning
#![warn(clippy::unimplemented)]       // unimplemented!() warning
#![warn(clippy::missing_const_for_fn)] // Force const when possible
#![warn(clippy::unwrap_in_result)]    // unwrap() in Result warning
#![warn(clippy::module_inception)]    // Module with same name as crate warning
#![warn(clippy::redundant_clone)]     // Useless clones warning
#![warn(clippy::shadow_unrelated)]    // Shadowing unrelated variables warning
#![warn(clippy::too_many_arguments)]  // Limit function arguments
#![warn(clippy::cognitive_complexity)] // Limit cognitive complexity

// Safety and robustness lints
#![deny(overflowing_literals)]        // Overflowing literals are forbidden
#![deny(arithmetic_overflow)]         // Arithmetic overflow is forbidden

// ============================================================================
// Crate Documentation
// ============================================================================

//! # Oraclust
//!
//! A declarative provisioning tool that registers Oracle RAC clusters with a
//! cluster management service.
//!
//! ## Overview
//!
//! Oraclust discovers a running RAC installation from a single node and
//! registers it end to end:
//!
//! - Describe the cluster once in a YAML configuration file
//! - Discover hosts, resource pools and databases through the management API
//! - Keep only databases whose every instance is reachable
//! - Register the assembled cluster under a chosen alias
//!
//! ## Architecture
//!
//! Provisioning is a strictly sequential pipeline over the management API:
//!
//! 1. **Discovery**: hosts, pools and databases are found from one node IP
//! 2. **Enrichment**: connectivity probes filter databases and attach
//!    service names
//! 3. **Registration**: the full payload is submitted and the new cluster id
//!    is resolved by alias
//!
//! ## Modules
//!
//! - [`config`]: Configuration parsing and validation
//! - [`api`]: Management API client, response schemas and typed facade
//! - [`provisioner`]: Sequential provisioning workflow
//! - [`cli`]: Command-line interface
//!
//! ## Example
//!
//! ```yaml
//! api:
//!   host: 192.168.1.10
//!   port: 11100
//!   username: admin
//!
//! cluster:
//!   alias: prod-rac
//!   node_ip: 10.0.0.1
//!   ssh:
//!     username: grid
//!   oracle:
//!     home: /u01/app/oracle/product/19.3.0/dbhome_1
//!     user: oracle
//!   grid:
//!     home: /u01/app/19.3.0/grid
//!     user: grid
//!   monitor:
//!     user: c##monitor
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod provisioner;

// ============================================================================
// Re-exports
// ============================================================================

pub use api::{ApiClient, ClusterApi, Schema};
pub use cli::{Cli, Commands, OutputFormatter};
pub use config::{ConfigParser, ConfigValidator, ProvisionConfig};
pub use error::{OraclustError, Result};
pub use provisioner::ClusterProvisioner;
