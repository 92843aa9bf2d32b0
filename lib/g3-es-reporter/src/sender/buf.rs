/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use std::sync::{Arc, Mutex};

use super::BulkSink;

#[derive(Clone, Default)]
pub(crate) struct BufBulkSink {
    bodies: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl BufBulkSink {
    pub(crate) fn take_bodies(&self) -> Vec<Vec<u8>> {
        std::mem::take(&mut *self.bodies.lock().unwrap())
    }
}

impl BulkSink for BufBulkSink {
    fn send_bulk(&self, body: Vec<u8>) -> anyhow::Result<()> {
        self.bodies.lock().unwrap().push(body);
        Ok(())
    }
}
