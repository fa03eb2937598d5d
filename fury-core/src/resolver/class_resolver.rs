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

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use tracing::debug;

use crate::error::Error;
use crate::resolver::class_checker::{AllowListChecker, CheckerListener, PatternAction};

/// Consults the active [`AllowListChecker`] for every class identity seen on
/// the serialize and deserialize paths, memoizing decisions per class name.
///
/// The resolver retains the checker; the checker only ever holds the resolver
/// weakly, as a listener. Register the resolver with
/// [`AllowListChecker::add_listener`] so pattern mutations drop the memoized
/// decisions; otherwise stale permissions survive until the checker is
/// replaced.
pub struct ClassResolver {
    checker: RwLock<Option<Arc<AllowListChecker>>>,
    permit_cache: Mutex<HashMap<String, bool>>,
}

impl Default for ClassResolver {
    fn default() -> Self {
        ClassResolver {
            checker: RwLock::new(None),
            permit_cache: Mutex::new(HashMap::new()),
        }
    }
}

impl ClassResolver {
    pub fn new() -> ClassResolver {
        Self::default()
    }

    /// Installs the active checker, replacing any previous one and dropping
    /// all cached decisions.
    pub fn set_class_checker(&self, checker: Arc<AllowListChecker>) {
        *self
            .checker
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(checker);
        self.clear_permit_cache();
    }

    /// Returns whether `class_name` is permitted. Without an installed
    /// checker every class is permitted.
    pub fn is_allowed(&self, class_name: &str) -> bool {
        if let Some(&permitted) = self
            .permit_cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(class_name)
        {
            return permitted;
        }
        let permitted = match self
            .checker
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            Some(checker) => checker.check(class_name),
            None => true,
        };
        self.permit_cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(class_name.to_string(), permitted);
        permitted
    }

    /// Gate called once per class identity on both the serialize and
    /// deserialize paths; a denial aborts the current top-level operation
    /// with [`Error::Insecure`].
    pub fn ensure_allowed(&self, class_name: &str) -> Result<(), Error> {
        if self.is_allowed(class_name) {
            Ok(())
        } else {
            Err(Error::insecure(format!(
                "class {} is disallowed by the class checker",
                class_name
            )))
        }
    }

    fn clear_permit_cache(&self) {
        self.permit_cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl CheckerListener for ClassResolver {
    fn on_pattern_update(&self, pattern: &str, _action: PatternAction) -> Result<(), Error> {
        debug!(pattern, "checker patterns changed, dropping cached permissions");
        self.clear_permit_cache();
        Ok(())
    }
}
