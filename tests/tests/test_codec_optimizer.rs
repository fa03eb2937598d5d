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

use fury_core::codegen::{Descriptor, DescriptorGrouper, MethodInvokerBuilder, ObjectCodecOptimizer};
use fury_core::config::Config;

fn descriptors(prefix: &str, count: usize) -> Vec<Descriptor> {
    (0..count)
        .map(|index| Descriptor::new(format!("{}{}", prefix, index), "java.lang.Object", 0))
        .collect()
}

// order-preserving partition: full groups, then at most one short tail
fn assert_partition(groups: &[Vec<Descriptor>], input: &[Descriptor], bound: usize) {
    let flattened: Vec<Descriptor> = groups.iter().flatten().cloned().collect();
    assert_eq!(flattened, input);
    for (index, group) in groups.iter().enumerate() {
        assert!(!group.is_empty());
        assert!(group.len() <= bound);
        if index + 1 < groups.len() {
            assert_eq!(group.len(), bound);
        }
    }
}

#[test]
fn test_group_bounds() {
    let primitives = descriptors("p", 53);
    let boxed = descriptors("b", 16);
    let finals = descriptors("f", 23);
    let others = descriptors("o", 11);
    let grouper = DescriptorGrouper::new(
        primitives.clone(),
        boxed.clone(),
        finals.clone(),
        others.clone(),
    );
    let optimizer = ObjectCodecOptimizer::new(grouper, false);

    assert_partition(optimizer.primitive_groups(), &primitives, 24);
    assert_partition(optimizer.boxed_write_groups(), &boxed, 7);
    assert_partition(optimizer.boxed_read_groups(), &boxed, 7);
    assert_partition(optimizer.final_write_groups(), &finals, 9);
    assert_partition(optimizer.final_read_groups(), &finals, 5);
    assert_partition(optimizer.other_write_groups(), &others, 9);
    assert_partition(optimizer.other_read_groups(), &others, 5);

    assert_eq!(optimizer.primitive_groups().len(), 3);
    assert_eq!(optimizer.boxed_write_groups().len(), 3);
    assert_eq!(optimizer.final_read_groups().len(), 5);
    assert_eq!(optimizer.other_write_groups().len(), 2);
}

#[test]
fn test_boxed_ref_tracking_shrinks_read_groups() {
    let boxed = descriptors("b", 16);
    let grouper = DescriptorGrouper::new(vec![], boxed.clone(), vec![], vec![]);
    let tracked = ObjectCodecOptimizer::new(grouper, true);
    assert_partition(tracked.boxed_read_groups(), &boxed, 4);
    assert_eq!(tracked.boxed_read_groups().len(), 4);
    // the write side is unaffected by tracking
    assert_partition(tracked.boxed_write_groups(), &boxed, 7);
    assert!(tracked.is_boxed_ref_tracking());

    let grouper = DescriptorGrouper::new(vec![], boxed.clone(), vec![], vec![]);
    let untracked = ObjectCodecOptimizer::new(grouper, false);
    assert_partition(untracked.boxed_read_groups(), &boxed, 7);
    assert_eq!(untracked.boxed_read_groups().len(), 3);
}

#[test]
fn test_exact_multiples_leave_no_short_group() {
    let primitives = descriptors("p", 48);
    let grouper = DescriptorGrouper::new(primitives.clone(), vec![], vec![], vec![]);
    let optimizer = ObjectCodecOptimizer::new(grouper, false);
    assert_eq!(optimizer.primitive_groups().len(), 2);
    for group in optimizer.primitive_groups() {
        assert_eq!(group.len(), 24);
    }
}

#[test]
fn test_empty_categories_produce_no_groups() {
    let grouper = DescriptorGrouper::new(vec![], vec![], vec![], vec![]);
    let optimizer = ObjectCodecOptimizer::new(grouper, true);
    assert!(optimizer.primitive_groups().is_empty());
    assert!(optimizer.boxed_write_groups().is_empty());
    assert!(optimizer.boxed_read_groups().is_empty());
    assert!(optimizer.final_write_groups().is_empty());
    assert!(optimizer.final_read_groups().is_empty());
    assert!(optimizer.other_write_groups().is_empty());
    assert!(optimizer.other_read_groups().is_empty());
}

#[test]
fn test_single_short_group() {
    let finals = descriptors("f", 3);
    let grouper = DescriptorGrouper::new(vec![], vec![], finals.clone(), vec![]);
    let optimizer = ObjectCodecOptimizer::new(grouper, false);
    assert_eq!(optimizer.final_write_groups().len(), 1);
    assert_eq!(optimizer.final_write_groups()[0], finals);
    assert_eq!(optimizer.final_read_groups().len(), 1);
}

#[test]
fn test_from_config() {
    let config = Config {
        boxed_ref_tracking: true,
        ..Config::default()
    };
    let grouper = DescriptorGrouper::new(vec![], descriptors("b", 5), vec![], vec![]);
    let optimizer = ObjectCodecOptimizer::from_config(grouper, &config);
    assert_eq!(optimizer.boxed_read_groups().len(), 2);
    assert_eq!(optimizer.descriptor_grouper().boxed_descriptors().len(), 5);
}

struct CallSiteBuilder;

impl MethodInvokerBuilder for CallSiteBuilder {
    fn build_invoke(&self, method_name: &str, group: &[Descriptor]) -> String {
        format!("this.{}(buffer, obj); // {} fields", method_name, group.len())
    }
}

#[test]
fn test_invoke_generated_names_groups_in_order() {
    let grouper = DescriptorGrouper::new(descriptors("p", 30), vec![], vec![], vec![]);
    let optimizer = ObjectCodecOptimizer::new(grouper, false);
    let calls = optimizer.invoke_generated(
        &CallSiteBuilder,
        optimizer.primitive_groups(),
        "writePrimitives",
    );
    assert_eq!(
        calls,
        vec![
            "this.writePrimitives0(buffer, obj); // 24 fields".to_string(),
            "this.writePrimitives1(buffer, obj); // 6 fields".to_string(),
        ]
    );
}
