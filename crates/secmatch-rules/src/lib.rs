//! # secmatch-rules
//!
//! Built-in security rules for secmatch.
//!
//! Every rule is a thin caller of the `secmatch-core` matching primitives:
//! it walks a unit with a [`Visit`](secmatch_core::Visit) implementation
//! and reports an [`Issue`] when a call, composite literal or import
//! matches.
//!
//! ## Available Rules
//!
//! | Code | Name | Description |
//! |------|------|-------------|
//! | G106 | `insecure-ignore-host-key` | Use of `ssh.InsecureIgnoreHostKey` |
//! | G113 | `rat-setstring-overflow` | `big.Rat.SetString` exponent overflow (CVE-2022-23772) |
//! | G302 | `file-permissions` | Permissive mode in `os.Chmod` / `os.OpenFile` |
//! | G307 | `os-create-perms` | `os.Create` when a mode stricter than `0666` is required |
//! | G402 | `tls-insecure-config` | `tls.Config` with `InsecureSkipVerify` or an old `MinVersion` |
//! | G404 | `weak-rand` | `math/rand` used instead of `crypto/rand` |
//! | G501 | `blocklisted-import-md5` | Import of `crypto/md5` |
//! | G502 | `blocklisted-import-des` | Import of `crypto/des` |
//! | G503 | `blocklisted-import-rc4` | Import of `crypto/rc4` |
//! | G504 | `blocklisted-import-cgi` | Import of `net/http/cgi` |
//! | G505 | `blocklisted-import-sha1` | Import of `crypto/sha1` |
//!
//! ## Usage
//!
//! ```ignore
//! use secmatch_core::Analyzer;
//! use secmatch_rules::{TlsInsecureConfig, WeakRand};
//!
//! let analyzer = Analyzer::builder()
//!     .root("./build/units")
//!     .rule(WeakRand::new())
//!     .rule(TlsInsecureConfig::new())
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod blocklisted_import;
pub mod file_permissions;
pub mod insecure_ignore_host_key;
pub mod os_create_perms;
pub mod rat_setstring_overflow;
pub mod tls_insecure_config;
pub mod weak_rand;

mod presets;

pub use blocklisted_import::BlocklistedImport;
pub use file_permissions::FilePermissions;
pub use insecure_ignore_host_key::InsecureIgnoreHostKey;
pub use os_create_perms::OsCreatePerms;
pub use presets::{all_rules, minimal_rules, recommended_rules, rule_by_id, strict_rules, Preset};
pub use rat_setstring_overflow::RatSetStringOverflow;
pub use tls_insecure_config::TlsInsecureConfig;
pub use weak_rand::WeakRand;

/// Re-export core types for convenience.
pub use secmatch_core::{Issue, Rule, Severity};
