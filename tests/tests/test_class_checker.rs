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

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use fury_core::config::Config;
use fury_core::error::Error;
use fury_core::resolver::{
    AllowListChecker, CheckLevel, CheckerListener, ClassResolver, PatternAction,
};

#[derive(Default)]
struct RecordingListener {
    events: Mutex<Vec<(String, PatternAction)>>,
}

impl RecordingListener {
    fn events(&self) -> Vec<(String, PatternAction)> {
        self.events.lock().unwrap().clone()
    }
}

impl CheckerListener for RecordingListener {
    fn on_pattern_update(&self, pattern: &str, action: PatternAction) -> Result<(), Error> {
        self.events.lock().unwrap().push((pattern.to_string(), action));
        Ok(())
    }
}

struct FailingListener;

impl CheckerListener for FailingListener {
    fn on_pattern_update(&self, pattern: &str, _action: PatternAction) -> Result<(), Error> {
        Err(Error::programmer_error(format!(
            "listener rejected {}",
            pattern
        )))
    }
}

#[test]
fn test_strict_default_deny() {
    let checker = Arc::new(AllowListChecker::new(CheckLevel::Strict));
    assert!(!checker.check("io.example.A"));

    let resolver = Arc::new(ClassResolver::new());
    resolver.set_class_checker(checker);
    let err = resolver.ensure_allowed("io.example.A").unwrap_err();
    assert!(matches!(err, Error::Insecure(_)));
    assert!(err.to_string().contains("io.example.A"));
}

#[test]
fn test_check_class() {
    let checker = Arc::new(AllowListChecker::new(CheckLevel::Strict));
    let resolver = Arc::new(ClassResolver::new());
    resolver.set_class_checker(Arc::clone(&checker));
    assert!(matches!(
        resolver.ensure_allowed("io.example.A").unwrap_err(),
        Error::Insecure(_)
    ));

    let recording = Arc::new(RecordingListener::default());
    let recording_listener: Arc<dyn CheckerListener> = recording.clone();
    checker.add_listener(&recording_listener).unwrap();

    checker.allow("io.example.A").unwrap();
    // write path permitted
    resolver.ensure_allowed("io.example.A").unwrap();

    let resolver_listener: Arc<dyn CheckerListener> = resolver.clone();
    checker.add_listener(&resolver_listener).unwrap();
    checker.disallow("io.example.A").unwrap();
    // both paths now fail and the listener saw both events in order
    assert!(matches!(
        resolver.ensure_allowed("io.example.A").unwrap_err(),
        Error::Insecure(_)
    ));
    assert!(matches!(
        resolver.ensure_allowed("io.example.A").unwrap_err(),
        Error::Insecure(_)
    ));
    assert_eq!(
        recording.events(),
        vec![
            ("io.example.A".to_string(), PatternAction::Allow),
            ("io.example.A".to_string(), PatternAction::Disallow),
        ]
    );
}

#[test]
fn test_check_class_wildcard() {
    let checker = Arc::new(AllowListChecker::new(CheckLevel::Strict));
    let resolver = Arc::new(ClassResolver::new());
    resolver.set_class_checker(Arc::clone(&checker));
    let resolver_listener: Arc<dyn CheckerListener> = resolver.clone();
    checker.add_listener(&resolver_listener).unwrap();

    assert!(matches!(
        resolver.ensure_allowed("io.fury.ClassResolver").unwrap_err(),
        Error::Insecure(_)
    ));
    checker.allow("io.fury.*").unwrap();
    resolver.ensure_allowed("io.fury.ClassResolver").unwrap();
    // wildcard covers the sub-hierarchy too
    resolver.ensure_allowed("io.fury.resolver.Inner").unwrap();

    checker.disallow("io.fury.*").unwrap();
    // a payload produced earlier now fails to come back in
    assert!(matches!(
        resolver.ensure_allowed("io.fury.ClassResolver").unwrap_err(),
        Error::Insecure(_)
    ));
}

#[test]
fn test_warn_default_allow() {
    let checker = Arc::new(AllowListChecker::new(CheckLevel::Warn));
    assert!(checker.check("io.example.A"));
    assert!(checker.check("anything.at.All"));

    let resolver = Arc::new(ClassResolver::new());
    resolver.set_class_checker(Arc::clone(&checker));
    let resolver_listener: Arc<dyn CheckerListener> = resolver.clone();
    checker.add_listener(&resolver_listener).unwrap();

    resolver.ensure_allowed("io.example.A").unwrap();
    checker.disallow("io.example.A").unwrap();
    assert!(matches!(
        resolver.ensure_allowed("io.example.A").unwrap_err(),
        Error::Insecure(_)
    ));
    // only the denied class is affected
    resolver.ensure_allowed("io.example.B").unwrap();
}

#[test]
fn test_warn_is_default_level() {
    let checker = AllowListChecker::default();
    assert_eq!(checker.check_level(), CheckLevel::Warn);
}

#[test]
fn test_from_config() {
    let config = Config {
        check_level: CheckLevel::Strict,
        ..Config::default()
    };
    let checker = AllowListChecker::from_config(&config);
    assert_eq!(checker.check_level(), CheckLevel::Strict);
    assert!(!checker.check("io.example.A"));
    checker.allow("io.example.A").unwrap();
    assert!(checker.check("io.example.A"));

    // the default config carries the default level
    let checker = AllowListChecker::from_config(&Config::default());
    assert_eq!(checker.check_level(), CheckLevel::Warn);
    assert!(checker.check("io.example.A"));
}

#[test]
fn test_deny_overrides_allow() {
    let checker = AllowListChecker::new(CheckLevel::Strict);
    checker.allow("io.example.*").unwrap();
    checker.disallow("io.example.Blocked").unwrap();
    assert!(checker.check("io.example.Open"));
    assert!(!checker.check("io.example.Blocked"));
}

#[test]
fn test_resolver_without_checker_permits() {
    let resolver = ClassResolver::new();
    resolver.ensure_allowed("any.Class").unwrap();
}

#[test]
fn test_listener_error_isolation() {
    let checker = Arc::new(AllowListChecker::new(CheckLevel::Strict));
    let failing: Arc<dyn CheckerListener> = Arc::new(FailingListener);
    let recording = Arc::new(RecordingListener::default());
    let recording_listener: Arc<dyn CheckerListener> = recording.clone();
    checker.add_listener(&failing).unwrap();
    checker.add_listener(&recording_listener).unwrap();

    // the first listener fails, the second is still notified, and the first
    // error surfaces after the fan-out
    let err = checker.allow("io.example.A").unwrap_err();
    assert!(matches!(err, Error::ProgrammerError(_)));
    assert_eq!(
        recording.events(),
        vec![("io.example.A".to_string(), PatternAction::Allow)]
    );
    // the mutation itself took effect
    assert!(checker.check("io.example.A"));
}

#[test]
fn test_removed_and_dropped_listeners() {
    let checker = Arc::new(AllowListChecker::new(CheckLevel::Strict));
    let recording = Arc::new(RecordingListener::default());
    let recording_listener: Arc<dyn CheckerListener> = recording.clone();
    checker.add_listener(&recording_listener).unwrap();

    let dropped = Arc::new(RecordingListener::default());
    let dropped_listener: Arc<dyn CheckerListener> = dropped.clone();
    checker.add_listener(&dropped_listener).unwrap();
    drop(dropped_listener);
    drop(dropped);

    checker.allow("io.example.A").unwrap();
    assert_eq!(recording.events().len(), 1);

    checker.remove_listener(&recording_listener).unwrap();
    checker.disallow("io.example.A").unwrap();
    assert_eq!(recording.events().len(), 1);
}

struct RecursiveListener {
    checker: Mutex<Option<Arc<AllowListChecker>>>,
}

impl CheckerListener for RecursiveListener {
    fn on_pattern_update(&self, _pattern: &str, _action: PatternAction) -> Result<(), Error> {
        let checker = self.checker.lock().unwrap().clone().unwrap();
        checker.allow("recursive.Attempt")
    }
}

#[test]
fn test_recursive_mutation_rejected() {
    let checker = Arc::new(AllowListChecker::new(CheckLevel::Strict));
    let recursive = Arc::new(RecursiveListener {
        checker: Mutex::new(Some(Arc::clone(&checker))),
    });
    let listener: Arc<dyn CheckerListener> = recursive;
    checker.add_listener(&listener).unwrap();

    let err = checker.allow("io.example.A").unwrap_err();
    assert!(matches!(err, Error::ProgrammerError(_)));
    // the recursive pattern never landed
    assert!(!checker.check("recursive.Attempt"));
    assert!(checker.check("io.example.A"));
}

#[test]
fn test_concurrent_check_and_mutation() {
    let checker = Arc::new(AllowListChecker::new(CheckLevel::Strict));
    checker.allow("io.example.*").unwrap();

    let stop = Arc::new(AtomicBool::new(false));
    let mut handles = Vec::new();
    for _ in 0..4 {
        let checker = Arc::clone(&checker);
        let stop = Arc::clone(&stop);
        handles.push(thread::spawn(move || {
            let mut denied_seen = false;
            while !stop.load(Ordering::Acquire) {
                // only two states are observable: allowed by the wildcard, or
                // denied after the mutation below
                if !checker.check("io.example.Point") {
                    denied_seen = true;
                }
                assert!(checker.check("io.example.Other"));
            }
            denied_seen
        }));
    }

    let mutator = {
        let checker = Arc::clone(&checker);
        thread::spawn(move || checker.disallow("io.example.Point").unwrap())
    };
    mutator.join().unwrap();
    stop.store(true, Ordering::Release);
    for handle in handles {
        handle.join().unwrap();
    }
    // the mutation is visible to every later check
    assert!(!checker.check("io.example.Point"));
    assert!(checker.check("io.example.Other"));
}

#[test]
fn test_resolver_cache_refreshed_by_listener() {
    let checker = Arc::new(AllowListChecker::new(CheckLevel::Strict));
    checker.allow("io.example.Cached").unwrap();
    let resolver = Arc::new(ClassResolver::new());
    resolver.set_class_checker(Arc::clone(&checker));

    // prime the cache, then register the resolver late
    assert!(resolver.is_allowed("io.example.Cached"));
    let resolver_listener: Arc<dyn CheckerListener> = resolver.clone();
    checker.add_listener(&resolver_listener).unwrap();

    checker.disallow("io.example.Cached").unwrap();
    assert!(!resolver.is_allowed("io.example.Cached"));
}
