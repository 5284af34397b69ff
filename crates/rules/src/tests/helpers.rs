// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Rule, RuleContext};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;

#[derive(Debug, Clone)]
pub struct Address {
    pub street: String,
    pub city: String,
}

#[derive(Debug, Clone)]
pub struct Order {
    pub reference: String,
    pub owner: Option<String>,
    pub approver: Option<String>,
    pub shipping: Option<Address>,
    pub billing: Option<Address>,
}

pub fn create_order() -> Order {
    Order {
        reference: String::from("R-1"),
        owner: Some(String::from("alice")),
        approver: Some(String::from("bob")),
        shipping: Some(Address {
            street: String::from("1 Main St"),
            city: String::from("Springfield"),
        }),
        billing: None,
    }
}

/// Context that records prefetch batches and answers from a fixed set.
#[derive(Default)]
pub struct TestContext {
    pub active: HashSet<String>,
    pub batches: Mutex<Vec<Vec<String>>>,
    pub fail_prefetch: bool,
}

impl TestContext {
    pub fn with_active(names: &[&str]) -> Self {
        Self {
            active: names.iter().map(|n| (*n).to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn batches(&self) -> Vec<Vec<String>> {
        self.batches.lock().unwrap().clone()
    }
}

#[async_trait]
impl RuleContext for TestContext {
    type Error = String;

    async fn prefetch(&self, keys: Vec<String>) -> Result<(), Self::Error> {
        if self.fail_prefetch {
            return Err(String::from("directory unavailable"));
        }
        self.batches.lock().unwrap().push(keys);
        Ok(())
    }
}

/// Async rule requiring the selected person to be active.
pub struct ActivePerson {
    pub field: &'static str,
    pub select: fn(&Order) -> Option<&str>,
}

#[async_trait]
impl Rule<Order, TestContext> for ActivePerson {
    fn field(&self) -> &str {
        self.field
    }

    fn prefetch_keys(&self, target: &Order, keys: &mut Vec<String>) {
        if let Some(name) = (self.select)(target) {
            keys.push(name.to_string());
        }
    }

    async fn evaluate(&self, target: &Order, ctx: &TestContext) -> Result<Option<String>, String> {
        let Some(name) = (self.select)(target) else {
            return Ok(None);
        };
        if ctx.active.contains(name) {
            Ok(None)
        } else {
            Ok(Some(format!("'{name}' is not active")))
        }
    }
}
