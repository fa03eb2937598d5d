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

/// One field of a user type, as produced by the upstream reflection pass.
///
/// The codec optimizer treats descriptors as opaque: only identity and order
/// matter for grouping; name, declared type and modifiers are carried through
/// for the code generator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Descriptor {
    name: String,
    type_name: String,
    modifiers: u32,
}

impl Descriptor {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>, modifiers: u32) -> Descriptor {
        Descriptor {
            name: name.into(),
            type_name: type_name.into(),
            modifiers,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn modifiers(&self) -> u32 {
        self.modifiers
    }
}

/// The four category lists a class's fields arrive in, already sorted and
/// categorized by the upstream descriptor pass.
///
/// Primitive fields have fixed-width unboxed encodings; boxed fields are
/// nullable primitive wrappers; final fields are reference fields whose
/// declared type cannot be subtyped; everything else is polymorphic.
pub struct DescriptorGrouper {
    primitive_descriptors: Vec<Descriptor>,
    boxed_descriptors: Vec<Descriptor>,
    final_descriptors: Vec<Descriptor>,
    other_descriptors: Vec<Descriptor>,
}

impl DescriptorGrouper {
    pub fn new(
        primitive_descriptors: Vec<Descriptor>,
        boxed_descriptors: Vec<Descriptor>,
        final_descriptors: Vec<Descriptor>,
        other_descriptors: Vec<Descriptor>,
    ) -> DescriptorGrouper {
        DescriptorGrouper {
            primitive_descriptors,
            boxed_descriptors,
            final_descriptors,
            other_descriptors,
        }
    }

    pub fn primitive_descriptors(&self) -> &[Descriptor] {
        &self.primitive_descriptors
    }

    pub fn boxed_descriptors(&self) -> &[Descriptor] {
        &self.boxed_descriptors
    }

    pub fn final_descriptors(&self) -> &[Descriptor] {
        &self.final_descriptors
    }

    pub fn other_descriptors(&self) -> &[Descriptor] {
        &self.other_descriptors
    }
}
