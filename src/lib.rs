//! mkdep - Makefile dependency generator
//!
//! A build-file generator that statically analyzes a tree of C++
//! header/source files and rewrites the autogenerated portions of a
//! hand-maintained `Makefile` (target lists and per-file compile/link
//! rules) so they stay in sync with the actual include graph, without any
//! manual bookkeeping.
//!
//! # Architecture Overview
//!
//! One invocation is a single synchronous pass:
//!
//! 1. **Discovery** ([`discovery`]) enumerates every `.h`/`.cpp` file under
//!    the project root, excluding version-control metadata.
//! 2. **Parsing** ([`unit`]) turns each file into a [`unit::SourceUnit`]:
//!    its quoted includes, external-library references, `main`-function
//!    presence, and optional header-implementation override.
//! 3. **Graph construction** ([`graph`]) resolves every quoted include to
//!    another unit and wires header-implementation back-references; a
//!    quoted include that resolves to nothing is a fatal error.
//! 4. **Library assignment** ([`library`]) partitions units into static
//!    archives per the manifest, with exclusive, irrevocable ownership.
//! 5. **Rendering and splicing** ([`makefile`]) emits compile, link, and
//!    archive rules plus the `BINARIES`/`TESTS` lists, and replaces the
//!    marked regions of the existing Makefile, leaving every byte outside
//!    them untouched.
//!
//! The whole graph is materialized before any rule is rendered, and the
//! file is fully rendered in memory before one atomic write - a failure at
//! any point leaves the Makefile exactly as it was.
//!
//! # Key Properties
//!
//! - **Deterministic**: dependency lists are self-first-then-lexicographic
//!   and rules are emitted in ascending path order, so output is identical
//!   for any file-discovery order.
//! - **Idempotent**: running `update` twice on an unchanged tree leaves the
//!   file byte-identical.
//! - **Cycle-safe**: mutual or circular includes terminate and contribute
//!   each unit once.
//!
//! # Manifest (mkdep.toml)
//!
//! ```toml
//! [[libraries]]
//! path = "mwclient/libmwclient.a"
//! sort-key = 2
//! roots = ["mwclient/"]
//! exclude = ["mwclient/tests/"]
//!
//! [external-libraries]
//! "curl/curl.h" = "curl"
//! ```
//!
//! # Command-Line Usage
//!
//! ```bash
//! mkdep init        # write a starter mkdep.toml
//! mkdep update      # resync the Makefile with the include graph
//! mkdep check       # CI gate: fail if the Makefile is stale
//! mkdep list        # print binary/test targets
//! mkdep tree wiki.cpp   # show one file's include closure
//! ```

pub mod cli;
pub mod constants;
pub mod core;
pub mod discovery;
pub mod graph;
pub mod library;
pub mod makefile;
pub mod manifest;
pub mod project;
pub mod unit;
pub mod utils;
