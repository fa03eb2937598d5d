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

//! Splits a class's fields into groups small enough that the methods the
//! code generator wraps around them stay under the host runtime's inlining
//! threshold.
//!
//! The group bounds come from measured compiled-code sizes per field kind
//! with reference tracking enabled: ~22 bytes to write a primitive, 40/81
//! bytes to write/read a boxed primitive with ref tracking, 41/82 bytes per
//! final field, and 200+ bytes for collection-typed fields. When the codegen
//! size profile changes, the bounds must be re-derived.

use crate::codegen::descriptor::{Descriptor, DescriptorGrouper};
use crate::config::Config;

const PRIMITIVE_GROUP_SIZE: usize = 24;
const BOXED_WRITE_GROUP_SIZE: usize = 7;
const BOXED_READ_GROUP_SIZE: usize = 7;
// tracked boxed reads decode twice the code, so read groups shrink
const BOXED_READ_TRACKING_GROUP_SIZE: usize = 4;
const FINAL_WRITE_GROUP_SIZE: usize = 9;
const FINAL_READ_GROUP_SIZE: usize = 5;
const OTHER_WRITE_GROUP_SIZE: usize = 9;
const OTHER_READ_GROUP_SIZE: usize = 5;

/// Builds the call-site expression for one generated group method.
///
/// Implemented by the external code generator; the optimizer only hands it
/// groups and method names, keeping grouping and code emission decoupled.
pub trait MethodInvokerBuilder {
    fn build_invoke(&self, method_name: &str, group: &[Descriptor]) -> String;
}

/// Partitions each field category into inline-sized groups at construction;
/// immutable and freely shareable afterwards.
///
/// For every category the concatenation of its groups equals the input list
/// in order, every group is non-empty, and only the last group may be
/// smaller than the category bound.
pub struct ObjectCodecOptimizer {
    descriptor_grouper: DescriptorGrouper,
    boxed_ref_tracking: bool,
    primitive_groups: Vec<Vec<Descriptor>>,
    boxed_write_groups: Vec<Vec<Descriptor>>,
    boxed_read_groups: Vec<Vec<Descriptor>>,
    final_write_groups: Vec<Vec<Descriptor>>,
    final_read_groups: Vec<Vec<Descriptor>>,
    other_write_groups: Vec<Vec<Descriptor>>,
    other_read_groups: Vec<Vec<Descriptor>>,
}

impl ObjectCodecOptimizer {
    pub fn new(descriptor_grouper: DescriptorGrouper, boxed_ref_tracking: bool) -> ObjectCodecOptimizer {
        let boxed_read_size = if boxed_ref_tracking {
            BOXED_READ_TRACKING_GROUP_SIZE
        } else {
            BOXED_READ_GROUP_SIZE
        };
        let primitive_groups =
            chunked(descriptor_grouper.primitive_descriptors(), PRIMITIVE_GROUP_SIZE);
        let boxed_write_groups =
            chunked(descriptor_grouper.boxed_descriptors(), BOXED_WRITE_GROUP_SIZE);
        let boxed_read_groups = chunked(descriptor_grouper.boxed_descriptors(), boxed_read_size);
        let final_write_groups =
            chunked(descriptor_grouper.final_descriptors(), FINAL_WRITE_GROUP_SIZE);
        let final_read_groups =
            chunked(descriptor_grouper.final_descriptors(), FINAL_READ_GROUP_SIZE);
        let other_write_groups =
            chunked(descriptor_grouper.other_descriptors(), OTHER_WRITE_GROUP_SIZE);
        let other_read_groups =
            chunked(descriptor_grouper.other_descriptors(), OTHER_READ_GROUP_SIZE);
        ObjectCodecOptimizer {
            descriptor_grouper,
            boxed_ref_tracking,
            primitive_groups,
            boxed_write_groups,
            boxed_read_groups,
            final_write_groups,
            final_read_groups,
            other_write_groups,
            other_read_groups,
        }
    }

    pub fn from_config(descriptor_grouper: DescriptorGrouper, config: &Config) -> ObjectCodecOptimizer {
        Self::new(descriptor_grouper, config.is_boxed_ref_tracking())
    }

    pub fn descriptor_grouper(&self) -> &DescriptorGrouper {
        &self.descriptor_grouper
    }

    pub fn is_boxed_ref_tracking(&self) -> bool {
        self.boxed_ref_tracking
    }

    /// One list serves both the write and the read side; primitive accessors
    /// compile small enough either way.
    pub fn primitive_groups(&self) -> &[Vec<Descriptor>] {
        &self.primitive_groups
    }

    pub fn boxed_write_groups(&self) -> &[Vec<Descriptor>] {
        &self.boxed_write_groups
    }

    pub fn boxed_read_groups(&self) -> &[Vec<Descriptor>] {
        &self.boxed_read_groups
    }

    pub fn final_write_groups(&self) -> &[Vec<Descriptor>] {
        &self.final_write_groups
    }

    pub fn final_read_groups(&self) -> &[Vec<Descriptor>] {
        &self.final_read_groups
    }

    pub fn other_write_groups(&self) -> &[Vec<Descriptor>] {
        &self.other_write_groups
    }

    pub fn other_read_groups(&self) -> &[Vec<Descriptor>] {
        &self.other_read_groups
    }

    /// Names each group method `{prefix}{index}` and asks the builder for the
    /// call-site expression the outer generated method will emit, in group
    /// order.
    pub fn invoke_generated<B>(
        &self,
        builder: &B,
        groups: &[Vec<Descriptor>],
        method_prefix: &str,
    ) -> Vec<String>
    where
        B: MethodInvokerBuilder + ?Sized,
    {
        groups
            .iter()
            .enumerate()
            .map(|(index, group)| {
                builder.build_invoke(&format!("{}{}", method_prefix, index), group)
            })
            .collect()
    }
}

// Emits full groups front to back, then the remainder; slice::chunks is
// exactly that partition.
fn chunked(descriptors: &[Descriptor], group_size: usize) -> Vec<Vec<Descriptor>> {
    descriptors
        .chunks(group_size)
        .map(<[Descriptor]>::to_vec)
        .collect()
}
