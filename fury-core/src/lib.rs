// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! # Fury Core
//!
//! Runtime primitives of the Fury cross-language serialization framework:
//! the byte-level memory buffer every codec reads and writes, the class-level
//! security gate consulted before any type is serialized or deserialized,
//! and the field-grouping optimizer that sizes generated codec methods for
//! inlining.
//!
//! ## Architecture
//!
//! - **`buffer`**: little-endian [`buffer::MemoryBuffer`] with separate
//!   reader/writer cursors, checked and unchecked fixed-width accessors, and
//!   the positive-varint framing codec
//! - **`resolver`**: [`resolver::AllowListChecker`] allow/deny policy engine
//!   and the [`resolver::ClassResolver`] that caches its decisions
//! - **`codegen`**: [`codegen::ObjectCodecOptimizer`] field grouping for the
//!   external code generator
//! - **`config`**: options shared across the components
//! - **`error`**: error kinds and the `FURY_PANIC_ON_ERROR` debug switch
//!
//! The serialization driver, reflection over user types, and code generation
//! itself live outside this crate; they interact with the core only through
//! the surfaces above.
//!
//! ## Usage
//!
//! ```rust
//! use fury_core::buffer::MemoryBuffer;
//! use fury_core::error::Error;
//!
//! fn frame(values: &[u32]) -> Result<Vec<u8>, Error> {
//!     let mut buffer = MemoryBuffer::allocate(16)?;
//!     for &value in values {
//!         buffer.write_varuint32(value)?;
//!     }
//!     Ok(buffer.dump())
//! }
//! ```

pub mod buffer;
pub mod codegen;
pub mod config;
pub mod error;
pub mod resolver;

pub use buffer::MemoryBuffer;
pub use config::Config;
pub use error::Error;
