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

use crate::resolver::CheckLevel;

/// Default number of bytes a freshly allocated [`crate::buffer::MemoryBuffer`]
/// addresses.
pub const DEFAULT_BUFFER_INITIAL_CAPACITY: usize = 64;

/// Configuration for the Fury serialization core.
///
/// Holds the options the embedding driver threads through to the three core
/// components: the initial size of owned buffers, the security level of the
/// class checker, and whether boxed fields are read with reference tracking
/// (which shrinks the boxed read groups emitted by the codec optimizer).
#[derive(Clone, Debug)]
pub struct Config {
    /// Initial capacity, in bytes, of owned buffers created from this config.
    pub buffer_initial_capacity: usize,
    /// Security level applied by class checkers created from this config.
    pub check_level: CheckLevel,
    /// Whether boxed fields track references during deserialization.
    /// Tracked reads decode more code per field, so read-side field groups
    /// are capped lower.
    pub boxed_ref_tracking: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            buffer_initial_capacity: DEFAULT_BUFFER_INITIAL_CAPACITY,
            check_level: CheckLevel::default(),
            boxed_ref_tracking: false,
        }
    }
}

impl Config {
    /// Creates a new Config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the initial capacity of owned buffers.
    #[inline(always)]
    pub fn buffer_initial_capacity(&self) -> usize {
        self.buffer_initial_capacity
    }

    /// Get the class checker security level.
    #[inline(always)]
    pub fn check_level(&self) -> CheckLevel {
        self.check_level
    }

    /// Check if boxed reference tracking is enabled.
    #[inline(always)]
    pub fn is_boxed_ref_tracking(&self) -> bool {
        self.boxed_ref_tracking
    }
}
