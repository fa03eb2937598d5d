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

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock, Weak};

use tracing::warn;

use crate::config::Config;
use crate::ensure;
use crate::error::Error;

/// Security level of an [`AllowListChecker`].
///
/// `Strict` denies every class not explicitly allowed; `Warn` permits every
/// class not explicitly disallowed, logging the ones no allow pattern covers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CheckLevel {
    Strict,
    #[default]
    Warn,
}

/// Direction of a pattern mutation, as delivered to listeners.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PatternAction {
    Allow,
    Disallow,
}

/// Receives synchronous notifications for every allow/deny mutation.
///
/// Class resolvers implement this to drop memoized permission decisions. A
/// listener must tolerate patterns it has never seen before. Returning an
/// error does not stop the fan-out; the checker notifies the remaining
/// listeners and surfaces the first error afterwards.
pub trait CheckerListener: Send + Sync {
    fn on_pattern_update(&self, pattern: &str, action: PatternAction) -> Result<(), Error>;
}

/// Allow/deny patterns split into exact names and `prefix.*` wildcards, so a
/// query is one hash lookup plus a prefix scan.
#[derive(Default)]
struct PatternSet {
    exact: HashSet<String>,
    prefixes: HashSet<String>,
}

impl PatternSet {
    fn insert(&mut self, pattern: &str) {
        match pattern.strip_suffix('*') {
            Some(prefix) => {
                self.prefixes.insert(prefix.to_string());
            }
            None => {
                self.exact.insert(pattern.to_string());
            }
        }
    }

    fn matches(&self, class_name: &str) -> bool {
        if self.exact.contains(class_name) {
            return true;
        }
        self.prefixes
            .iter()
            .any(|prefix| class_name.starts_with(prefix.as_str()))
    }
}

// Resets the notification flag even if a listener panics.
struct NotifyGuard<'a>(&'a AtomicBool);

impl Drop for NotifyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Gates every class entering or leaving the serializer.
///
/// Patterns are either exact fully-qualified class names or wildcards of the
/// form `prefix.*`, which cover the named package and its sub-hierarchy.
/// Deny patterns override allow patterns. [`AllowListChecker::check`] is safe
/// to call from many threads concurrently with a mutation; mutations
/// themselves must be serialized by the caller, and listener notification
/// completes before the mutating call returns.
pub struct AllowListChecker {
    check_level: CheckLevel,
    allow_list: RwLock<PatternSet>,
    disallow_list: RwLock<PatternSet>,
    listeners: RwLock<Vec<Weak<dyn CheckerListener>>>,
    notifying: AtomicBool,
}

impl Default for AllowListChecker {
    fn default() -> Self {
        Self::new(CheckLevel::default())
    }
}

impl AllowListChecker {
    pub fn new(check_level: CheckLevel) -> AllowListChecker {
        AllowListChecker {
            check_level,
            allow_list: RwLock::new(PatternSet::default()),
            disallow_list: RwLock::new(PatternSet::default()),
            listeners: RwLock::new(Vec::new()),
            notifying: AtomicBool::new(false),
        }
    }

    pub fn from_config(config: &Config) -> AllowListChecker {
        Self::new(config.check_level())
    }

    pub fn check_level(&self) -> CheckLevel {
        self.check_level
    }

    /// Returns whether `class_name` is permitted under the current rules.
    ///
    /// Total: never fails, only denies. Deny patterns are consulted first;
    /// a class matching none of them is then subject to the check level.
    pub fn check(&self, class_name: &str) -> bool {
        if self
            .disallow_list
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .matches(class_name)
        {
            return false;
        }
        let allowed = self
            .allow_list
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .matches(class_name);
        match self.check_level {
            CheckLevel::Strict => allowed,
            CheckLevel::Warn => {
                if !allowed {
                    warn!(class_name, "class matches no allow pattern");
                }
                true
            }
        }
    }

    /// Adds `pattern` to the allow set and notifies all listeners before
    /// returning.
    pub fn allow(&self, pattern: &str) -> Result<(), Error> {
        self.check_reentry("allow")?;
        self.allow_list
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(pattern);
        self.notify(pattern, PatternAction::Allow)
    }

    /// Adds `pattern` to the deny set and notifies all listeners before
    /// returning.
    pub fn disallow(&self, pattern: &str) -> Result<(), Error> {
        self.check_reentry("disallow")?;
        self.disallow_list
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(pattern);
        self.notify(pattern, PatternAction::Disallow)
    }

    /// Registers a listener. The checker keeps only a weak reference; drop
    /// the `Arc` and the listener silently falls out of the fan-out.
    pub fn add_listener(&self, listener: &Arc<dyn CheckerListener>) -> Result<(), Error> {
        self.check_reentry("add_listener")?;
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::downgrade(listener));
        Ok(())
    }

    pub fn remove_listener(&self, listener: &Arc<dyn CheckerListener>) -> Result<(), Error> {
        self.check_reentry("remove_listener")?;
        let target = Arc::downgrade(listener);
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|candidate| !Weak::ptr_eq(candidate, &target));
        Ok(())
    }

    fn check_reentry(&self, operation: &str) -> Result<(), Error> {
        ensure!(
            !self.notifying.load(Ordering::Acquire),
            Error::programmer_error(format!(
                "{} called from inside a checker listener callback",
                operation
            ))
        );
        Ok(())
    }

    // Delivered in registration order; dead weak references are pruned along
    // the way. Errors are collected so every listener still hears the event,
    // then the first one is surfaced.
    fn notify(&self, pattern: &str, action: PatternAction) -> Result<(), Error> {
        let callbacks: Vec<Arc<dyn CheckerListener>> = {
            let mut listeners = self
                .listeners
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            let mut upgraded = Vec::with_capacity(listeners.len());
            listeners.retain(|candidate| match candidate.upgrade() {
                Some(listener) => {
                    upgraded.push(listener);
                    true
                }
                None => false,
            });
            upgraded
        };
        self.notifying.store(true, Ordering::Release);
        let _guard = NotifyGuard(&self.notifying);
        let mut first_error = None;
        for listener in callbacks {
            if let Err(error) = listener.on_pattern_update(pattern, action) {
                first_error.get_or_insert(error);
            }
        }
        match first_error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}
